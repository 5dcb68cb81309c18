use crate::models::StreamCandidate;

/// Pick the candidate to play.
///
/// The provider already orders candidates by preference, so this is always
/// the first one. No health checks, no fallback to later entries.
pub fn select_stream(candidates: &[StreamCandidate]) -> Option<&StreamCandidate> {
    candidates.first()
}

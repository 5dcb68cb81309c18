//! Service layer
//!
//! Orchestrates the source clients into the playback pipeline:
//! cross-reference → stream fetch → selection → proxy URL.
//! Services depend on the source traits, not on the HTTP clients.

pub mod playback_resolver;
pub mod stream_selector;

pub use playback_resolver::PlaybackResolver;
pub use stream_selector::select_stream;

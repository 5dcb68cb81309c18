//! Error type definitions for cineproxy
//!
//! The playback pipeline and the proxy handler each have their own
//! discriminated failure enum. `AppError` covers the startup-time failures
//! (configuration file, HTTP client construction).

use serde::Serialize;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Filesystem errors (config file reads/writes)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Pipeline stage a `ResolutionError` originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStage {
    CrossReference,
    Transport,
    UpstreamStatus,
    NoStreams,
    Cancelled,
}

impl ResolutionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CrossReference => "cross_reference",
            Self::Transport => "transport",
            Self::UpstreamStatus => "upstream_status",
            Self::NoStreams => "no_streams",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Failures of the resolve → fetch → select → build pipeline.
///
/// Every variant is terminal for the playback attempt that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// No external cross-reference id could be obtained for the catalog id
    #[error("Cross-reference lookup failed for {catalog_id}: {reason}")]
    CrossReference { catalog_id: String, reason: String },

    /// The stream provider could not be reached (connect error or timeout)
    #[error("Stream provider unreachable: {message}")]
    Transport { message: String },

    /// The stream provider answered with a non-success status
    #[error("Stream provider returned status {status}")]
    UpstreamStatus { status: u16 },

    /// The stream provider answered but offered nothing playable.
    /// `message` carries the provider's own error text when it sent one.
    #[error("No streams available: {message}")]
    NoStreams { message: String },

    /// The caller cancelled the resolution before it completed
    #[error("Resolution cancelled")]
    Cancelled,
}

impl ResolutionError {
    pub fn cross_reference<C: Into<String>, R: Into<String>>(catalog_id: C, reason: R) -> Self {
        Self::CrossReference {
            catalog_id: catalog_id.into(),
            reason: reason.into(),
        }
    }

    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn no_streams<S: Into<String>>(message: S) -> Self {
        Self::NoStreams {
            message: message.into(),
        }
    }

    pub fn stage(&self) -> ResolutionStage {
        match self {
            Self::CrossReference { .. } => ResolutionStage::CrossReference,
            Self::Transport { .. } => ResolutionStage::Transport,
            Self::UpstreamStatus { .. } => ResolutionStage::UpstreamStatus,
            Self::NoStreams { .. } => ResolutionStage::NoStreams,
            Self::Cancelled => ResolutionStage::Cancelled,
        }
    }

    /// Message suitable for showing to the viewer in place of the player
    pub fn user_message(&self) -> String {
        match self {
            Self::CrossReference { .. } => "Content not found.".to_string(),
            Self::Transport { .. } => "The streaming service is not responding.".to_string(),
            Self::UpstreamStatus { .. } => "The streaming service is not responding.".to_string(),
            Self::NoStreams { message } => message.clone(),
            Self::Cancelled => "Playback request was cancelled.".to_string(),
        }
    }
}

/// Stage a `ProxyError` originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyStage {
    BadRequest,
    OriginUnreachable,
    OriginStatus,
}

impl ProxyStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::OriginUnreachable => "origin_unreachable",
            Self::OriginStatus => "origin_status",
        }
    }
}

/// Failures of the playback proxy handler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// Malformed or disallowed proxy parameters; no outbound call was made
    #[error("Invalid proxy request: {message}")]
    BadRequest { message: String },

    /// Transport error or timeout while replaying to the origin
    #[error("Origin unreachable: {message}")]
    OriginUnreachable { message: String },

    /// The origin answered with a non-success status
    #[error("Origin returned status {status}")]
    OriginStatus { status: u16 },
}

impl ProxyError {
    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn origin_unreachable<S: Into<String>>(message: S) -> Self {
        Self::OriginUnreachable {
            message: message.into(),
        }
    }

    pub fn stage(&self) -> ProxyStage {
        match self {
            Self::BadRequest { .. } => ProxyStage::BadRequest,
            Self::OriginUnreachable { .. } => ProxyStage::OriginUnreachable,
            Self::OriginStatus { .. } => ProxyStage::OriginStatus,
        }
    }
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

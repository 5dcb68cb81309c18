//! Playback proxy
//!
//! Two halves of the same contract: `url_builder` encodes a stream candidate
//! into a relative `/proxy` URL, `request` decodes it again on the way in and
//! `http_stream` replays it against the origin.

pub mod header_policy;
pub mod http_stream;
pub mod request;
pub mod url_builder;

pub use http_stream::proxy_http_stream;
pub use request::ProxyRequest;
pub use url_builder::{PROXY_PATH, build_proxy_url};

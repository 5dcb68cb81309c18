//! Web handlers module
//!
//! Thin handlers: parameter extraction here, work in the services and the
//! proxy module.

pub mod health;
pub mod playback;
pub mod proxy;

//! Core types shared across the crate
//!
//! - `PortalError` / `PortalResult` - Error types

pub mod error;

pub use error::{PortalError, PortalResult};

#![forbid(unsafe_code)]
//! gvbuf-core: shared types for the gvbuf crates.
//!
//! Holds the configuration document and the error type that the allocation
//! layer and the extensible buffer both depend on. No allocation policy or
//! buffer logic lives here.

pub mod config;
pub mod error;

pub use config::XbufConfig;
pub use error::{Error, Result};

#![forbid(unsafe_code)]
//! gvbuf-alloc: allocation wrappers that exit on failure.
//!
//! Most callers of the text-building primitives are not in a position to
//! recover from a failed allocation. Every function here either returns valid,
//! zero-filled memory or hands an [`AllocError`] to the fatal hook (see
//! [`fatal`]), which by default prints a diagnostic and exits the process.
//!
//! Memory is represented as owned `Vec<u8>` whose length is the allocated
//! extent; callers track their own logical length inside it.

pub mod error;
pub mod fatal;
pub mod heap;
pub mod tracking;

use gvbuf_core::XbufConfig;
use once_cell::sync::Lazy;

pub use error::AllocError;
pub use heap::{alloc, calloc, realloc, recalloc, strdup, strndup};
pub use tracking::AllocStats;

static CONFIG: Lazy<XbufConfig> = Lazy::new(XbufConfig::from_env);

/// Process-wide configuration, read from the environment on first use.
pub fn config() -> &'static XbufConfig {
    &CONFIG
}

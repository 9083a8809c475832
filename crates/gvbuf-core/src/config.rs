//! Buffer and allocation tuning that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Growth floor for a buffer leaving inline or caller-supplied storage.
///
/// Matches the C library `BUFSIZ` on glibc targets.
pub const DEFAULT_MIN_GROWTH: usize = 8192;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XbufConfig {
    /// Smallest capacity (in bytes) a buffer grows to. Growth is otherwise
    /// geometric (doubling) or exact-fit for large requests.
    pub min_growth: usize,

    /// Optional ceiling on a single allocation request (in bytes). A request
    /// above the ceiling is treated exactly like the allocator running out of
    /// memory. `None` means no ceiling.
    pub max_alloc_bytes: Option<usize>,
}

impl Default for XbufConfig {
    fn default() -> Self {
        Self {
            min_growth: DEFAULT_MIN_GROWTH,
            max_alloc_bytes: None,
        }
    }
}

impl XbufConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `GVBUF_MIN_GROWTH`: growth floor in bytes
    /// - `GVBUF_MAX_ALLOC_BYTES`: per-request allocation ceiling in bytes
    ///
    /// Values that fail to parse are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("GVBUF_MIN_GROWTH") {
            if let Ok(v) = s.parse::<usize>() {
                if v > 0 {
                    cfg.min_growth = v;
                }
            }
        }

        if let Ok(s) = std::env::var("GVBUF_MAX_ALLOC_BYTES") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_alloc_bytes = Some(v);
            }
        }

        cfg
    }

    /// Parse a JSON config document. Missing fields take their defaults.
    pub fn from_json(doc: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(doc)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_growth == 0 {
            return Err(Error::Config("min_growth must be non-zero".into()));
        }
        Ok(())
    }

    /// Whether a request of `bytes` is within the configured ceiling.
    pub fn permits(&self, bytes: usize) -> bool {
        self.max_alloc_bytes.map_or(true, |cap| bytes <= cap)
    }
}

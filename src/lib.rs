//! gvbuf: text-building core for graph layout tooling.
//!
//! Re-exports the workspace crates:
//!
//! - [`gvbuf_core`]: configuration and shared errors
//! - [`gvbuf_alloc`]: zero-filling allocation wrappers with a fatal-on-failure policy
//! - [`gvbuf_xbuf`]: the extensible buffer
//!
//! ```
//! use gvbuf::{xbprint, XBuf};
//!
//! let mut backing = [0u8; 64];
//! let mut xb = XBuf::with_backing(&mut backing);
//! xbprint!(xb, "{} -> {};", "a", "b").unwrap();
//! assert_eq!(xb.as_bytes(), b"a -> b;");
//! ```

pub use gvbuf_alloc;
pub use gvbuf_core;
pub use gvbuf_xbuf;

pub use gvbuf_alloc::AllocError;
pub use gvbuf_core::XbufConfig;
pub use gvbuf_xbuf::{xbprint, Located, OwnedBytes, XBuf};

#![forbid(unsafe_code)]
//! gvbuf-xbuf: the extensible buffer used to build text on hot paths.
//!
//! [`XBuf`] starts out with its bytes stored inline, can be pointed at
//! caller-supplied scratch memory, and moves to the heap the first time it
//! outgrows either. Heap storage comes from `gvbuf-alloc`, so growth never
//! fails from the caller's point of view.
//!
//! ```
//! use gvbuf_xbuf::{xbprint, Located, XBuf};
//!
//! let mut xb = XBuf::new();
//! xb.append_bytes(b"hello");
//! xbprint!(xb, " {}", 42).unwrap();
//! assert_eq!(xb.as_bytes(), b"hello 42");
//! assert_eq!(xb.located(), Located::Inline);
//!
//! let owned = xb.disown();
//! assert_eq!(owned.as_bytes_with_nul(), b"hello 42\0");
//! assert!(xb.is_empty());
//! ```

pub mod error;
pub mod format;
pub mod owned;
mod storage;
pub mod xbuf;

pub use error::{Error, Result};
pub use owned::OwnedBytes;
pub use storage::{Located, INLINE_STORE};
pub use xbuf::XBuf;

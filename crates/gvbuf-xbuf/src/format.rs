//! Two-pass formatted output.
//!
//! [`XBuf::print`](crate::XBuf::print) first runs the arguments through a
//! [`Measure`] sink to learn the exact output size, grows once if needed, and
//! then formats straight into the buffer's free space with a [`SliceWriter`].

use std::fmt;

use gvbuf_alloc::error::AllocError;
use gvbuf_alloc::fatal;

/// Printf-style append, returning the number of bytes written.
///
/// ```
/// use gvbuf_xbuf::{xbprint, XBuf};
///
/// let mut xb = XBuf::new();
/// let n = xbprint!(xb, "{}->{}", "a", "b").unwrap();
/// assert_eq!(n, 4);
/// assert_eq!(xb.as_bytes(), b"a->b");
/// ```
#[macro_export]
macro_rules! xbprint {
    ($buf:expr, $($arg:tt)*) => {
        $buf.print(::std::format_args!($($arg)*))
    };
}

/// Counts formatted bytes without storing them.
#[derive(Debug, Default)]
pub struct Measure {
    len: usize,
    has_nul: bool,
}

impl Measure {
    /// Run `args` through a fresh sink.
    pub fn of(args: fmt::Arguments<'_>) -> Result<Self, fmt::Error> {
        let mut sink = Self::default();
        fmt::write(&mut sink, args)?;
        Ok(sink)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the output contains a NUL byte.
    pub fn has_nul(&self) -> bool {
        self.has_nul
    }
}

impl fmt::Write for Measure {
    /// A total that overflows `usize` is a fatal size computation, not a
    /// formatting error.
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let Some(len) = self.len.checked_add(s.len()) else {
            fatal::raise(AllocError::Overflow {
                count: self.len,
                elem_size: 1,
            })
        };
        self.len = len;
        self.has_nul |= s.as_bytes().contains(&0);
        Ok(())
    }
}

/// Writes into a fixed slice and fails instead of truncating.
pub struct SliceWriter<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl<'b> SliceWriter<'b> {
    pub fn new(buf: &'b mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn written(&self) -> usize {
        self.pos
    }
}

impl fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let end = self
            .pos
            .checked_add(bytes.len())
            .filter(|&end| end <= self.buf.len())
            .ok_or(fmt::Error)?;
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }
}

/// Format `args` into `dst`, returning the byte count.
pub(crate) fn write_into(dst: &mut [u8], args: fmt::Arguments<'_>) -> Result<usize, fmt::Error> {
    let mut w = SliceWriter::new(dst);
    fmt::write(&mut w, args)?;
    Ok(w.written())
}

//! Storage handed out by [`XBuf::disown`](crate::XBuf::disown).

use std::ffi::CStr;
use std::fmt;
use std::ops::Deref;

/// Independently owned, NUL-terminated bytes detached from a buffer.
///
/// Derefs to the content without the terminator. Dropping it releases the
/// memory.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OwnedBytes {
    /// Content followed by exactly one trailing NUL.
    buf: Vec<u8>,
}

impl OwnedBytes {
    pub(crate) fn from_terminated(buf: Vec<u8>) -> Self {
        debug_assert_eq!(buf.last(), Some(&0), "detached storage must be NUL-terminated");
        Self { buf }
    }

    /// Content length, excluding the terminator.
    pub fn len(&self) -> usize {
        self.buf.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len()]
    }

    /// Content including the trailing NUL.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf
    }

    /// View as a C string. `None` if the content has an interior NUL.
    pub fn as_c_str(&self) -> Option<&CStr> {
        CStr::from_bytes_with_nul(&self.buf).ok()
    }

    /// Give up the terminator and return the content.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.pop();
        self.buf
    }

    pub fn into_vec_with_nul(self) -> Vec<u8> {
        self.buf
    }
}

impl Deref for OwnedBytes {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for OwnedBytes {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for OwnedBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&String::from_utf8_lossy(self.as_bytes()), f)
    }
}

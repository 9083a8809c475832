//! Backing-storage representations.

use std::mem;

/// Size of the inline store in bytes. One byte is always kept for the NUL
/// terminator, so `INLINE_STORE - 1` bytes of content fit inline.
pub const INLINE_STORE: usize = 4 * mem::size_of::<usize>();

/// Where the backing memory for a buffer lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Located {
    /// Within the buffer itself.
    Inline,
    /// Dynamically allocated and owned by the buffer.
    OnHeap,
    /// Supplied (and owned) by the caller.
    OnStack,
}

/// Exactly one representation is live at a time.
///
/// `OnHeap`/`OnStack` reserve the last byte of `buf` for a NUL sentinel, so
/// `len <= buf.len() - 1` always holds. `Inline` keeps no length; the store is
/// NUL-terminated at all times and the length is found by scanning.
pub(crate) enum Storage<'a> {
    Inline([u8; INLINE_STORE]),
    OnHeap { buf: Vec<u8>, len: usize },
    OnStack { buf: &'a mut [u8], len: usize },
}

impl<'a> Storage<'a> {
    pub(crate) const EMPTY: Self = Storage::Inline([0; INLINE_STORE]);

    pub(crate) fn located(&self) -> Located {
        match self {
            Storage::Inline(_) => Located::Inline,
            Storage::OnHeap { .. } => Located::OnHeap,
            Storage::OnStack { .. } => Located::OnStack,
        }
    }

    pub(crate) fn view(&mut self) -> View<'_> {
        match self {
            Storage::Inline(store) => View::Inline(store),
            Storage::OnHeap { buf, len } => View::External {
                buf: buf.as_mut_slice(),
                len,
            },
            Storage::OnStack { buf, len } => View::External { buf: &mut **buf, len },
        }
    }
}

/// Mutable view that unifies the two external representations.
pub(crate) enum View<'s> {
    Inline(&'s mut [u8; INLINE_STORE]),
    External { buf: &'s mut [u8], len: &'s mut usize },
}

/// Length of the NUL-terminated content of an inline store.
pub(crate) fn inline_len(store: &[u8; INLINE_STORE]) -> usize {
    store
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(INLINE_STORE - 1)
}

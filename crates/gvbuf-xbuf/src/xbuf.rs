//! The extensible buffer.
//!
//! Heap memory is never released until [`XBuf::disown`] or
//! [`XBuf::release`] (or drop).

use std::fmt;
use std::io;
use std::mem;

use gvbuf_alloc::error::AllocError;
use gvbuf_alloc::{calloc, fatal, recalloc};

use crate::error::Result;
use crate::format::{write_into, Measure};
use crate::owned::OwnedBytes;
use crate::storage::{inline_len, Located, Storage, View, INLINE_STORE};

/// Extensible byte buffer with small-buffer optimization.
///
/// Content lives in one of three places (see [`Located`]):
///
/// - **inline**, inside the `XBuf` value, for up to `INLINE_STORE - 1` bytes;
/// - **on the stack**, in caller-supplied memory borrowed for `'a`;
/// - **on the heap**, once either of the above runs out of room.
///
/// Migration only ever goes towards the heap. Once a buffer is on the heap it
/// stays there until [`disown`](Self::disown) resets it.
pub struct XBuf<'a> {
    storage: Storage<'a>,
}

impl<'a> XBuf<'a> {
    /// Create an empty buffer with zeroed inline storage.
    pub const fn new() -> Self {
        Self {
            storage: Storage::EMPTY,
        }
    }

    /// Create an empty buffer over caller-owned memory.
    ///
    /// The buffer never frees `backing`; when the content outgrows it, the
    /// content is copied to the heap and `backing` is no longer written.
    /// One byte of `backing` is reserved for the NUL terminator, so
    /// [`capacity`](Self::capacity) is `backing.len() - 1`.
    ///
    /// # Panics
    ///
    /// Panics if `backing` is empty.
    pub fn with_backing(backing: &'a mut [u8]) -> Self {
        assert!(
            !backing.is_empty(),
            "backing storage needs room for a terminator"
        );
        backing[0] = 0;
        Self {
            storage: Storage::OnStack {
                buf: backing,
                len: 0,
            },
        }
    }

    pub fn located(&self) -> Located {
        self.storage.located()
    }

    /// Number of content bytes currently stored.
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Inline(store) => inline_len(store),
            Storage::OnHeap { len, .. } | Storage::OnStack { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total usable bytes in the backing store, not counting the byte kept
    /// for the terminator.
    ///
    /// For a buffer made with [`with_backing`](Self::with_backing) this is
    /// `backing.len() - 1`: a 4-byte array holds 3 bytes of content before
    /// the buffer moves to the heap. Size scratch arrays one byte larger than
    /// the longest content they should hold.
    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Inline(_) => INLINE_STORE - 1,
            Storage::OnHeap { buf, .. } => buf.len() - 1,
            Storage::OnStack { buf, .. } => buf.len() - 1,
        }
    }

    fn unused(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Current content. Valid until the next mutation.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.storage {
            Storage::Inline(store) => &store[..inline_len(store)],
            Storage::OnHeap { buf, len } => &buf[..*len],
            Storage::OnStack { buf, len } => &buf[..*len],
        }
    }

    /// Append one byte.
    ///
    /// An inline buffer tracks its length by NUL termination, so appending
    /// `0` to an inline buffer is silently ignored.
    pub fn append_byte(&mut self, c: u8) {
        if c == 0 && self.located() == Located::Inline {
            return;
        }

        if self.len() >= self.capacity() {
            self.grow(1);
        }
        match self.storage.view() {
            View::Inline(store) => {
                let len = inline_len(store);
                store[len] = c;
                store[len + 1] = 0;
            }
            View::External { buf, len } => {
                buf[*len] = c;
                *len += 1;
            }
        }
    }

    /// Append `bytes`, returning how many were appended.
    ///
    /// The content is NUL-terminated afterwards; the terminator is not
    /// counted in [`len`](Self::len). Bytes containing a NUL move an inline
    /// buffer to the heap first so that nothing is lost.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len();
        if n == 0 {
            return 0;
        }
        if self.located() == Located::Inline && bytes.contains(&0) {
            self.grow(n);
        }

        if n > self.unused() {
            self.grow(n);
        }
        match self.storage.view() {
            View::Inline(store) => {
                let len = inline_len(store);
                store[len..len + n].copy_from_slice(bytes);
                store[len + n] = 0;
            }
            View::External { buf, len } => {
                buf[*len..*len + n].copy_from_slice(bytes);
                *len += n;
                buf[*len] = 0;
            }
        }
        n
    }

    /// Append the bytes of `s`.
    pub fn append_str(&mut self, s: &str) -> usize {
        self.append_bytes(s.as_bytes())
    }

    /// Printf-style append. Prefer the [`xbprint!`](crate::xbprint) macro.
    ///
    /// The output size is measured first, storage grows at most once, and the
    /// text is then formatted in place and NUL-terminated. Returns the number
    /// of bytes written. If a `Display`/`Debug` implementation reports an
    /// error, `Err` is returned and the content is left as it was.
    pub fn print(&mut self, args: fmt::Arguments<'_>) -> Result<usize> {
        let measured = Measure::of(args)?;
        let n = measured.len();
        if self.located() == Located::Inline && measured.has_nul() {
            self.grow(n);
        }

        let size = n.saturating_add(1);
        let unused = self.unused();
        if unused < size {
            self.grow(size - unused);
        }

        match self.storage.view() {
            View::Inline(store) => {
                let len = inline_len(store);
                match write_into(&mut store[len..len + n], args) {
                    Ok(written) => {
                        store[len + written] = 0;
                        Ok(written)
                    }
                    Err(e) => {
                        store[len] = 0;
                        Err(e.into())
                    }
                }
            }
            View::External { buf, len } => {
                let start = *len;
                match write_into(&mut buf[start..start + n], args) {
                    Ok(written) => {
                        *len += written;
                        buf[*len] = 0;
                        Ok(written)
                    }
                    Err(e) => {
                        buf[start] = 0;
                        Err(e.into())
                    }
                }
            }
        }
    }

    /// Remove and return the last byte, or `None` if the buffer is empty.
    pub fn pop(&mut self) -> Option<u8> {
        match self.storage.view() {
            View::Inline(store) => {
                let len = inline_len(store);
                if len == 0 {
                    return None;
                }
                let c = store[len - 1];
                store[len - 1] = 0;
                Some(c)
            }
            View::External { buf, len } => {
                if *len == 0 {
                    return None;
                }
                *len -= 1;
                Some(buf[*len])
            }
        }
    }

    /// Drop the content but keep the backing memory.
    pub fn clear(&mut self) {
        match self.storage.view() {
            View::Inline(store) => store[0] = 0,
            View::External { len, .. } => *len = 0,
        }
    }

    /// Make sure at least `additional` more bytes fit without growing.
    pub fn reserve(&mut self, additional: usize) {
        if self.unused() < additional {
            self.grow(additional);
        }
    }

    /// Free space where the next appended byte would land.
    ///
    /// Write into it and then call [`commit`](Self::commit) with the number of
    /// bytes written. The region excludes the terminator slot. For an inline
    /// buffer, a NUL written here ends the content at that point.
    pub fn spare_mut(&mut self) -> &mut [u8] {
        match self.storage.view() {
            View::Inline(store) => {
                let len = inline_len(store);
                &mut store[len..INLINE_STORE - 1]
            }
            View::External { buf, len } => {
                let end = buf.len() - 1;
                &mut buf[*len..end]
            }
        }
    }

    /// Record `n` bytes written through [`spare_mut`](Self::spare_mut).
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the spare region.
    pub fn commit(&mut self, n: usize) {
        let spare = self.unused();
        assert!(n <= spare, "committed {n} bytes into {spare} bytes of spare room");
        match self.storage.view() {
            View::Inline(store) => {
                let len = inline_len(store);
                store[len + n] = 0;
            }
            View::External { len, .. } => *len += n,
        }
    }

    /// NUL-terminate in place and return the content including the
    /// terminator. The buffer is otherwise unchanged.
    pub fn terminate(&mut self) -> &[u8] {
        match &mut self.storage {
            Storage::Inline(store) => {
                let len = inline_len(store);
                &store[..=len]
            }
            Storage::OnHeap { buf, len } => {
                buf[*len] = 0;
                &buf[..=*len]
            }
            Storage::OnStack { buf, len } => {
                buf[*len] = 0;
                &buf[..=*len]
            }
        }
    }

    /// NUL-terminate, return the content, and rewind for reuse.
    ///
    /// The returned bytes share storage with the buffer and are followed by a
    /// NUL. The borrow ends before the buffer can be written again, so copy
    /// what you need first.
    ///
    /// An inline buffer shifts its content one byte forward and returns it
    /// from offset 1, leaving an empty string at offset 0. If the content
    /// fills the inline store, the buffer moves to the heap first.
    pub fn use_and_reset(&mut self) -> &[u8] {
        if self.located() == Located::Inline && self.len() >= self.capacity() {
            self.grow(1);
        }

        match &mut self.storage {
            Storage::Inline(store) => {
                let len = inline_len(store);
                store.copy_within(0..=len, 1);
                store[0] = 0;
                &store[1..=len]
            }
            Storage::OnHeap { buf, len } => {
                let n = mem::take(len);
                buf[n] = 0;
                &buf[..n]
            }
            Storage::OnStack { buf, len } => {
                let n = mem::take(len);
                buf[n] = 0;
                &buf[..n]
            }
        }
    }

    /// Detach the content as an independently owned, NUL-terminated
    /// allocation and reset this buffer to an empty inline one.
    ///
    /// Heap storage is handed over as-is; inline and caller-supplied storage
    /// is copied into a fresh allocation.
    pub fn disown(&mut self) -> OwnedBytes {
        let buf = match mem::replace(&mut self.storage, Storage::EMPTY) {
            Storage::Inline(store) => copy_terminated(&store[..inline_len(&store)]),
            Storage::OnStack { buf, len } => copy_terminated(&buf[..len]),
            Storage::OnHeap { mut buf, len } => {
                buf[len] = 0;
                buf.truncate(len + 1);
                buf
            }
        };
        OwnedBytes::from_terminated(buf)
    }

    /// Free heap memory, if any. Caller-supplied memory is left alone.
    pub fn release(self) {
        drop(self);
    }

    /// Expand the backing store to hold at least `additional` more bytes.
    ///
    /// New capacity is the largest of double the current capacity, the
    /// configured growth floor, and what the request needs. The result is
    /// always on the heap.
    fn grow(&mut self, additional: usize) {
        let size = self.capacity();
        let Some(needed) = size.checked_add(additional) else {
            fatal::raise(AllocError::ReallocOverflow {
                count: size,
                elem_size: 1,
            })
        };
        let doubled = size.checked_mul(2).unwrap_or(needed);
        let nsize = doubled.max(gvbuf_alloc::config().min_growth).max(needed);
        let Some(extent) = nsize.checked_add(1) else {
            fatal::raise(AllocError::ReallocOverflow {
                count: nsize,
                elem_size: 1,
            })
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(from = size, to = nsize, mode = ?self.located(), "xbuf grow");

        let (buf, len) = match mem::replace(&mut self.storage, Storage::EMPTY) {
            Storage::OnHeap { buf, len } => (recalloc(buf, size + 1, extent, 1), len),
            Storage::OnStack { buf: stack, len } => (copy_into(&stack[..len], extent), len),
            Storage::Inline(store) => {
                let len = inline_len(&store);
                (copy_into(&store[..len], extent), len)
            }
        };
        self.storage = Storage::OnHeap { buf, len };
    }
}

/// Fresh zeroed allocation of `extent` bytes starting with `content`.
fn copy_into(content: &[u8], extent: usize) -> Vec<u8> {
    let mut buf = calloc(extent, 1);
    buf[..content.len()].copy_from_slice(content);
    buf
}

fn copy_terminated(content: &[u8]) -> Vec<u8> {
    copy_into(content, content.len() + 1)
}

impl Default for XBuf<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for XBuf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XBuf")
            .field("located", &self.located())
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("content", &String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}

impl fmt::Write for XBuf<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_str(s);
        Ok(())
    }
}

impl io::Write for XBuf<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.append_bytes(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

//! Zero-filling allocation wrappers.
//!
//! All growth flows through [`reserve`], which enforces the configured ceiling
//! and turns a failed reservation into a fatal error. Newly materialized bytes
//! are always zero.

use gvbuf_core::XbufConfig;

use crate::error::AllocError;
use crate::fatal::raise;
use crate::tracking;

/// Allocate `count * elem_size` zeroed bytes.
///
/// A zero-byte request returns an empty vector without touching the
/// allocator. Overflow of the size computation, a request above the
/// configured ceiling, or allocator failure is fatal.
pub fn calloc(count: usize, elem_size: usize) -> Vec<u8> {
    let Some(bytes) = count.checked_mul(elem_size) else {
        raise(AllocError::Overflow { count, elem_size })
    };
    if bytes == 0 {
        return Vec::new();
    }

    let mut buf = Vec::new();
    reserve(&mut buf, bytes);
    buf.resize(bytes, 0);
    tracking::record_alloc(bytes);
    buf
}

/// Allocate `size` zeroed bytes.
pub fn alloc(size: usize) -> Vec<u8> {
    calloc(1, size)
}

/// Resize `buf` to `new_size` bytes.
///
/// Existing bytes below `min(old_size, new_size)` are preserved. When this is
/// an expansion, `[old_size, new_size)` is zero-filled explicitly, whatever
/// the vector held there before. Failure is fatal when `new_size > 0`; a zero
/// `new_size` releases the memory.
pub fn realloc(mut buf: Vec<u8>, old_size: usize, new_size: usize) -> Vec<u8> {
    if new_size == 0 {
        tracking::record_realloc(old_size, 0);
        return Vec::new();
    }

    if new_size > buf.len() {
        reserve(&mut buf, new_size);
    }
    buf.resize(new_size, 0);
    if new_size < old_size {
        buf.shrink_to_fit();
    } else if new_size > old_size {
        buf[old_size..].fill(0);
    }

    tracking::record_realloc(old_size, new_size);
    buf
}

/// Resize an array of `elem_size`-byte elements from `old_count` to
/// `new_count` elements.
///
/// # Panics
///
/// Panics if `elem_size` is zero or if the claimed previous extent cannot be
/// represented; both are caller bugs rather than allocation failures.
pub fn recalloc(buf: Vec<u8>, old_count: usize, new_count: usize, elem_size: usize) -> Vec<u8> {
    assert!(elem_size > 0, "attempt to allocate array of 0-sized elements");
    let old_size = old_count
        .checked_mul(elem_size)
        .expect("claimed previous extent is too large");

    let Some(new_size) = new_count.checked_mul(elem_size) else {
        raise(AllocError::ReallocOverflow {
            count: new_count,
            elem_size,
        })
    };

    realloc(buf, old_size, new_size)
}

/// Copy `s` up to its first NUL into a fresh allocation and NUL-terminate it.
pub fn strdup(s: &[u8]) -> Vec<u8> {
    strndup(s, s.len())
}

/// Copy at most `n` bytes of `s`, stopping early at a NUL, into a fresh
/// allocation and NUL-terminate it.
pub fn strndup(s: &[u8], n: usize) -> Vec<u8> {
    let window = &s[..n.min(s.len())];
    let len = window.iter().position(|&b| b == 0).unwrap_or(window.len());

    let Some(bytes) = len.checked_add(1) else {
        raise(AllocError::Overflow {
            count: len,
            elem_size: 1,
        })
    };
    let mut out = calloc(bytes, 1);
    out[..len].copy_from_slice(&window[..len]);
    out
}

/// Make room for `total` bytes in `buf` or die trying.
fn reserve(buf: &mut Vec<u8>, total: usize) {
    reserve_with(crate::config(), buf, total);
}

/// [`reserve`] against an explicit configuration.
pub(crate) fn reserve_with(cfg: &XbufConfig, buf: &mut Vec<u8>, total: usize) {
    if !cfg.permits(total) {
        raise(AllocError::CeilingExceeded {
            bytes: total,
            ceiling: cfg.max_alloc_bytes.unwrap_or(usize::MAX),
        });
    }

    let additional = total.saturating_sub(buf.len());
    if buf.try_reserve_exact(additional).is_err() {
        raise(AllocError::OutOfMemory { bytes: total });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fatal::{panic_hook, with_hook};

    #[test]
    fn calloc_returns_zeroed_bytes() {
        let buf = calloc(16, 4);
        assert_eq!(buf.len(), 64);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn calloc_zero_is_empty() {
        assert!(calloc(0, 8).is_empty());
        assert!(calloc(8, 0).is_empty());
        assert!(alloc(0).is_empty());
    }

    #[test]
    #[should_panic(expected = "integer overflow in dynamic memory allocation")]
    fn calloc_overflow_is_fatal() {
        with_hook(panic_hook, || {
            let _ = calloc(usize::MAX / 2 + 1, 4);
        });
    }

    #[test]
    #[should_panic(expected = "out of memory")]
    fn unreservable_request_is_fatal() {
        with_hook(panic_hook, || {
            let _ = alloc(isize::MAX as usize + 1);
        });
    }

    #[test]
    #[should_panic(expected = "out of memory")]
    fn unreservable_resize_is_fatal() {
        with_hook(panic_hook, || {
            let _ = realloc(alloc(4), 4, isize::MAX as usize + 1);
        });
    }

    #[test]
    #[should_panic(expected = "out of memory (requested 272 bytes, ceiling 100)")]
    fn request_over_ceiling_is_fatal() {
        let cfg = XbufConfig {
            max_alloc_bytes: Some(100),
            ..XbufConfig::default()
        };
        with_hook(panic_hook, || {
            let mut buf = alloc(72);
            reserve_with(&cfg, &mut buf, 272);
        });
    }

    #[test]
    fn request_at_ceiling_is_granted() {
        let cfg = XbufConfig {
            max_alloc_bytes: Some(100),
            ..XbufConfig::default()
        };
        let mut buf = Vec::new();
        reserve_with(&cfg, &mut buf, 100);
        assert!(buf.capacity() >= 100);
    }

    #[test]
    fn realloc_preserves_prefix_and_zeroes_extension() {
        let mut buf = alloc(4);
        buf.copy_from_slice(b"abcd");
        let buf = realloc(buf, 4, 10);
        assert_eq!(&buf[..4], b"abcd");
        assert_eq!(&buf[4..], &[0; 6]);
    }

    #[test]
    fn realloc_zeroes_from_claimed_old_size() {
        let mut buf = alloc(8);
        buf.copy_from_slice(b"abcdefgh");
        // Caller only vouches for the first three bytes.
        let buf = realloc(buf, 3, 12);
        assert_eq!(&buf[..3], b"abc");
        assert!(buf[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn realloc_shrinks_and_frees() {
        let mut buf = alloc(8);
        buf.copy_from_slice(b"abcdefgh");
        let buf = realloc(buf, 8, 3);
        assert_eq!(buf, b"abc");
        assert!(realloc(buf, 3, 0).is_empty());
    }

    #[test]
    #[should_panic(expected = "integer overflow in dynamic memory reallocation")]
    fn recalloc_overflow_is_fatal() {
        with_hook(panic_hook, || {
            let _ = recalloc(Vec::new(), 0, usize::MAX, 2);
        });
    }

    #[test]
    #[should_panic(expected = "0-sized elements")]
    fn recalloc_rejects_zero_sized_elements() {
        let _ = recalloc(Vec::new(), 0, 4, 0);
    }

    #[test]
    fn recalloc_scales_by_element_size() {
        let buf = recalloc(alloc(8), 2, 5, 4);
        assert_eq!(buf.len(), 20);
    }

    #[test]
    fn strdup_stops_at_nul_and_terminates() {
        assert_eq!(strdup(b"graph"), b"graph\0");
        assert_eq!(strdup(b"di\0graph"), b"di\0");
        assert_eq!(strdup(b""), b"\0");
    }

    #[test]
    fn strndup_limits_copy() {
        assert_eq!(strndup(b"digraph", 2), b"di\0");
        assert_eq!(strndup(b"ab", 10), b"ab\0");
    }

    #[test]
    fn allocations_are_counted() {
        crate::tracking::reset();
        let buf = calloc(10, 1);
        let _ = realloc(buf, 10, 20);
        let stats = crate::tracking::snapshot();
        assert_eq!(stats.allocations, 1);
        assert_eq!(stats.reallocations, 1);
        assert_eq!(stats.bytes_zeroed, 20);
    }
}

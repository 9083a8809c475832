//! Lightweight per-thread allocation counters.
//!
//! Buffers are single-owner and never shared across threads mid-use, so the
//! counters are thread-local: a test or caller sees exactly the allocations
//! its own thread performed.

use std::cell::Cell;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AllocStats {
    /// Fresh zeroed allocations (`calloc`/`alloc`/`strdup`).
    pub allocations: u64,
    /// Resizes through `realloc`/`recalloc`.
    pub reallocations: u64,
    /// Bytes explicitly zero-filled on behalf of callers.
    pub bytes_zeroed: u64,
    /// Largest single request seen, in bytes.
    pub peak_request: usize,
}

impl AllocStats {
    const ZERO: Self = Self {
        allocations: 0,
        reallocations: 0,
        bytes_zeroed: 0,
        peak_request: 0,
    };

    /// Counter deltas between an earlier snapshot and this one.
    ///
    /// `peak_request` is carried over from `self` as-is.
    pub fn since(&self, earlier: &Self) -> Self {
        Self {
            allocations: self.allocations.saturating_sub(earlier.allocations),
            reallocations: self.reallocations.saturating_sub(earlier.reallocations),
            bytes_zeroed: self.bytes_zeroed.saturating_sub(earlier.bytes_zeroed),
            peak_request: self.peak_request,
        }
    }

    /// Total number of allocator calls (fresh + resize).
    pub fn calls(&self) -> u64 {
        self.allocations + self.reallocations
    }
}

thread_local! {
    static STATS: Cell<AllocStats> = const { Cell::new(AllocStats::ZERO) };
}

/// Counters for the calling thread.
pub fn snapshot() -> AllocStats {
    STATS.with(Cell::get)
}

/// Zero the calling thread's counters.
pub fn reset() {
    STATS.with(|s| s.set(AllocStats::ZERO));
}

pub(crate) fn record_alloc(bytes: usize) {
    update(|s| {
        s.allocations += 1;
        s.bytes_zeroed += bytes as u64;
        s.peak_request = s.peak_request.max(bytes);
    });
    #[cfg(feature = "tracing")]
    tracing::trace!(bytes, "zeroed allocation");
}

pub(crate) fn record_realloc(old_size: usize, new_size: usize) {
    update(|s| {
        s.reallocations += 1;
        s.bytes_zeroed += new_size.saturating_sub(old_size) as u64;
        s.peak_request = s.peak_request.max(new_size);
    });
    #[cfg(feature = "tracing")]
    tracing::trace!(old_size, new_size, "reallocation");
}

fn update(f: impl FnOnce(&mut AllocStats)) {
    STATS.with(|cell| {
        let mut stats = cell.get();
        f(&mut stats);
        cell.set(stats);
    });
}

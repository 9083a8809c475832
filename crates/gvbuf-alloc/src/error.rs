use thiserror::Error;

/// Conditions the allocation layer treats as fatal.
///
/// These are never returned to callers; they are handed to
/// [`crate::fatal::raise`] and exist so hooks and tests can tell the causes
/// apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocError {
    #[error("out of memory (requested {bytes} bytes)")]
    OutOfMemory { bytes: usize },

    #[error("out of memory (requested {bytes} bytes, ceiling {ceiling})")]
    CeilingExceeded { bytes: usize, ceiling: usize },

    #[error("integer overflow in dynamic memory allocation ({count} x {elem_size} bytes)")]
    Overflow { count: usize, elem_size: usize },

    #[error("integer overflow in dynamic memory reallocation ({count} x {elem_size} bytes)")]
    ReallocOverflow { count: usize, elem_size: usize },
}

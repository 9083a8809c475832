use thiserror::Error;

/// Result type local to gvbuf-xbuf.
pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable buffer errors. Allocation failure is not one of them; it is
/// fatal and handled by `gvbuf_alloc::fatal`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("formatting failed")]
    Format(#[from] std::fmt::Error),
}

//! Errors surfaced to cart consumers.
//!
//! Storage problems never appear here: hydration falls back to an empty cart
//! and persistence failures are only logged.

use thiserror::Error;

/// Cart-level error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// A handle was used after its session ended.
    #[error("cart must be used within a CartProvider")]
    OutsideProvider,
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

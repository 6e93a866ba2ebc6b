//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `ScError` as one variant
//! where they need it.

use thiserror::Error;

/// The common base error for the `sc-*` crates.
#[derive(Debug, Error)]
pub enum ScError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for the `sc-*` crates.
pub type ScResult<T> = Result<T, ScError>;

//! Framework error type.
//!
//! Sub-crates define their own error enums and convert into `HmError` where
//! a common base is useful.

use thiserror::Error;

/// The top-level error type for `hm-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum HmError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `hm-*` crates.
pub type HmResult<T> = Result<T, HmError>;

//! errors.rs - Custom error types for the termfilter-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `termfilter-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FilterError {
    /// A term could not be compiled into a valid pattern. Only reachable for
    /// `regex` terms carrying invalid user-supplied syntax.
    #[error("Failed to compile term '{0}': {1}")]
    TermCompilation(String, regex::Error),

    #[error("Term '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("A configured term has empty text")]
    EmptyTerm,

    /// A named profile was requested that the configuration does not declare.
    #[error("Profile '{0}' is not declared in the configuration")]
    UnknownProfile(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),
}

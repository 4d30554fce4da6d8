//! Error type shared by the pointer handle and its binding layer.

use std::fmt;

/// Errors raised when a pointer handle or one of its views cannot be produced.
///
/// None of these describe invalid *memory*; the handle cannot detect that.
/// They only cover the few conditions that are observable without
/// touching the addressed region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PtrError {
    /// The handle constructor was given something other than a native external value.
    NotExternal,
    /// A non-empty view (or a terminator scan) was requested from the null address.
    NullAddress,
    /// A typed array argument has the wrong element width for the native parameter.
    ElementSize {
        /// `size_of` the native element type.
        expected: usize,
        /// Element width reported by the typed array.
        actual: usize,
    },
    /// The value cannot be turned into a pointer for this kind of parameter.
    UnsupportedArgument(&'static str),
    /// The per-environment constructor registry was never installed.
    MissingRegistry,
}

impl fmt::Display for PtrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotExternal => f.write_str("CPtr cannot be constructed from JavaScript."),
            Self::NullAddress => f.write_str("cannot view memory at a null CPtr"),
            Self::ElementSize { expected, actual } => {
                write!(f, "Wrong TypedArray element size. (expected {expected}, got {actual})")
            }
            Self::UnsupportedArgument(expected) => write!(f, "unsupported pointer argument, expected {expected}"),
            Self::MissingRegistry => f.write_str("CPtr constructor is not registered for this environment"),
        }
    }
}

impl std::error::Error for PtrError {}

/// Result alias used throughout the crate.
pub type PtrResult<T> = Result<T, PtrError>;

//! Error type shared by the codec, the enumerators, and the output sink

use std::io;

/// Error raised while parsing, encoding, or writing UUIDs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input, with hyphens removed, is not 32 characters long.
    #[error("Invalid UUID length")]
    InvalidLength {
        /// The number of characters left after stripping hyphens.
        len: usize,
    },

    /// The input contains characters other than hexadecimal digits and hyphens.
    #[error("Invalid UUID format")]
    InvalidFormat,

    /// The node is not a 48-bit value written as 12 hexadecimal digits.
    #[error("invalid node '{0}': expected 12 hexadecimal digits")]
    InvalidNode(String),

    /// The variant name is none of NCS, RFC4122, Microsoft, or Future.
    #[error("invalid variant '{0}': expected one of NCS, RFC4122, Microsoft, Future")]
    InvalidVariant(String),

    /// A single value, range, or comma-separated list could not be parsed.
    #[error("invalid value '{input}': {reason}")]
    InvalidValue {
        /// The offending input string.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Writing the generated UUIDs failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type for UUID operations.
pub type Result<T> = std::result::Result<T, Error>;

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidLength { len: a }, Self::InvalidLength { len: b }) => a == b,
            (Self::InvalidFormat, Self::InvalidFormat) => true,
            (Self::InvalidNode(a), Self::InvalidNode(b)) => a == b,
            (Self::InvalidVariant(a), Self::InvalidVariant(b)) => a == b,
            (
                Self::InvalidValue {
                    input: a,
                    reason: x,
                },
                Self::InvalidValue {
                    input: b,
                    reason: y,
                },
            ) => a == b && x == y,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}

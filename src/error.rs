use alloc::string::String;
use alloc::string::ToString;

/// Errors reported by [`HashMap`](crate::HashMap) and
/// [`Dictionary`](crate::Dictionary).
///
/// Operations that only report presence (`insert`, `HashMap::remove`) return
/// `bool` instead and never produce one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The key and value sequences given to a bulk constructor differ in
    /// length.
    #[error("vector sizes don't match! ({keys} keys, {values} values)")]
    LengthMismatch {
        /// Number of keys supplied.
        keys: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// The requested key has no entry.
    #[error("no such key exists!")]
    KeyNotFound,

    /// A dictionary removal named a key that is not stored.
    #[error(transparent)]
    InvalidKey(#[from] InvalidKey),

    /// A cursor was dereferenced at the end position, or at a position that no
    /// longer holds an element.
    #[error("cursor dereferenced outside the table")]
    IteratorOutOfRange,
}

/// Error raised by [`Dictionary::remove`](crate::Dictionary::remove) when the
/// key is absent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct InvalidKey {
    message: String,
}

impl InvalidKey {
    /// Message used by [`InvalidKey::default`].
    pub const DEFAULT_MESSAGE: &'static str = "Invalid Key!";

    /// Creates the error with a custom message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message carried by this error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for InvalidKey {
    fn default() -> Self {
        Self {
            message: Self::DEFAULT_MESSAGE.to_string(),
        }
    }
}

/// Result type used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

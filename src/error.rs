//! Error types for parsing, reading and rendering JSON trees.
//!
//! ## Error Categories
//!
//! - **Parse Errors**: malformed JSON text, with line, column and byte offset
//! - **Value Not Present**: a `required_*` accessor found nothing usable under a key
//! - **Invalid Instant**: a text value was asked for as an instant but is not ISO-8601
//! - **Serialization Errors**: the tree holds something JSON cannot express (NaN, infinity)
//! - **I/O Errors**: the reader or writer handed to the library failed
//!
//! A missing value is an expected, caller-correctable condition; a parse error
//! usually propagates to the top of whatever request or command supplied the text.
//!
//! ## Examples
//!
//! ```rust
//! use jsonbuddy::{parse, Error};
//!
//! let err = parse("[1,]").unwrap_err();
//! assert!(err.is_parse());
//!
//! let node = parse("{}").unwrap();
//! let obj = node.as_object().unwrap();
//! match obj.required_long("id") {
//!     Err(Error::ValueNotPresent { key }) => assert_eq!(key, "id"),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed JSON input
    #[error("Parse error at line {line}, column {col} (offset {offset}): {msg}")]
    Parse {
        line: usize,
        col: usize,
        offset: usize,
        msg: String,
    },

    /// A required value is missing or holds an incompatible node type
    #[error("Required key '{key}' does not exist")]
    ValueNotPresent { key: String },

    /// Text that should hold an ISO-8601 instant does not
    #[error("Invalid instant '{text}': {source}")]
    InvalidInstant {
        text: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The tree cannot be rendered as JSON
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a parse error at the given position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbuddy::Error;
    ///
    /// let err = Error::parse(3, 7, 42, "expected ':' after object key");
    /// assert!(err.to_string().contains("line 3, column 7"));
    /// ```
    pub fn parse(line: usize, col: usize, offset: usize, msg: &str) -> Self {
        Error::Parse {
            line,
            col,
            offset,
            msg: msg.to_string(),
        }
    }

    /// Creates the error returned by `required_*` accessors.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsonbuddy::Error;
    ///
    /// let err = Error::value_not_present("name");
    /// assert_eq!(err.to_string(), "Required key 'name' does not exist");
    /// ```
    pub fn value_not_present(key: impl Into<String>) -> Self {
        Error::ValueNotPresent { key: key.into() }
    }

    /// Creates an error for text that does not parse as an ISO-8601 instant.
    pub fn invalid_instant(text: &str, source: chrono::ParseError) -> Self {
        Error::InvalidInstant {
            text: text.to_string(),
            source,
        }
    }

    /// Creates a serialization error for trees JSON cannot express.
    pub fn serialization(msg: &str) -> Self {
        Error::Serialization(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader or writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` if this error was raised while parsing text.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    /// Returns `true` if a required accessor found no usable value.
    #[must_use]
    pub const fn is_value_not_present(&self) -> bool {
        matches!(self, Error::ValueNotPresent { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(&err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Configuration options for parsing.
//!
//! Serialization has a single canonical form and takes no options.
//!
//! ## Examples
//!
//! ```rust
//! use jsonbuddy::{parse_with_options, ParseOptions};
//!
//! let options = ParseOptions::new().with_max_depth(2);
//! assert!(parse_with_options("[[1]]", options.clone()).is_ok());
//! assert!(parse_with_options("[[[1]]]", options).is_err());
//! ```

/// Default limit on container nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options for the parser.
///
/// # Examples
///
/// ```rust
/// use jsonbuddy::ParseOptions;
///
/// let options = ParseOptions::new();
/// assert_eq!(options.max_depth, 128);
///
/// let shallow = ParseOptions::new().with_max_depth(8);
/// assert_eq!(shallow.max_depth, 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed nesting of objects and arrays. The parser recurses
    /// once per level, so this also bounds its stack use.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deepest allowed nesting of objects and arrays.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

//! Canonical JSON serialization.
//!
//! The [`Serializer`] walks a tree depth-first and writes its compact,
//! canonical text straight to an [`io::Write`] sink, so large trees are never
//! materialized in memory as a whole:
//!
//! - objects render their keys in insertion order, `{"k":v,...}`;
//! - no whitespace is ever added;
//! - text escapes `"`, `\` and control characters, and passes other
//!   characters through unescaped;
//! - doubles use the shortest form that reads back as the same double,
//!   always with a `.` or exponent; NaN and infinities are rejected;
//! - instants render as quoted ISO-8601 UTC.
//!
//! ## Usage
//!
//! ```rust
//! use jsonbuddy::{JsonObject, Serializer};
//!
//! let obj = JsonObject::new().with_value("a", 1.0).with_value("b", "x\ny");
//!
//! let mut serializer = Serializer::new(Vec::new());
//! serializer.write_object(&obj).unwrap();
//! assert_eq!(serializer.into_inner(), br#"{"a":1.0,"b":"x\ny"}"#.to_vec());
//! ```

use crate::coerce::{format_double, format_instant};
use crate::{Error, JsonArray, JsonNode, JsonObject, NodeType, Result};
use std::io;

/// Streams the canonical JSON text of a tree to a writer.
///
/// The serializer borrows nothing from the tree between calls and never
/// flushes or closes the writer; both remain the caller's.
pub struct Serializer<W> {
    writer: W,
    bytes_written: usize,
}

impl<W: io::Write> Serializer<W> {
    pub fn new(writer: W) -> Self {
        Serializer {
            writer,
            bytes_written: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Number of bytes handed to the writer so far.
    #[must_use]
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Writes `node` and everything below it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] on a non-finite double and
    /// [`Error::Io`] if the writer fails. Text already written before the
    /// failure stays in the writer.
    pub fn write_node(&mut self, node: &JsonNode) -> Result<()> {
        match node {
            JsonNode::Object(obj) => self.write_object(obj),
            JsonNode::Array(arr) => self.write_array(arr),
            JsonNode::Text(s) => self.write_string(s),
            JsonNode::Long(l) => self.write_raw(l.to_string().as_bytes()),
            JsonNode::Double(d) => self.write_double(*d),
            JsonNode::Boolean(true) => self.write_raw(b"true"),
            JsonNode::Boolean(false) => self.write_raw(b"false"),
            JsonNode::Instant(dt) => {
                self.write_raw(b"\"")?;
                self.write_raw(format_instant(dt).as_bytes())?;
                self.write_raw(b"\"")
            }
            JsonNode::Null => self.write_raw(b"null"),
        }
    }

    /// # Errors
    ///
    /// See [`write_node`](Self::write_node).
    pub fn write_object(&mut self, obj: &JsonObject) -> Result<()> {
        self.write_raw(b"{")?;
        for (i, (key, value)) in obj.iter().enumerate() {
            if i > 0 {
                self.write_raw(b",")?;
            }
            self.write_string(key)?;
            self.write_raw(b":")?;
            self.write_node(value)?;
        }
        self.write_raw(b"}")
    }

    /// # Errors
    ///
    /// See [`write_node`](Self::write_node).
    pub fn write_array(&mut self, arr: &JsonArray) -> Result<()> {
        self.write_raw(b"[")?;
        for (i, value) in arr.iter().enumerate() {
            if i > 0 {
                self.write_raw(b",")?;
            }
            self.write_node(value)?;
        }
        self.write_raw(b"]")
    }

    /// Logs completion of a top-level write.
    pub(crate) fn log_finished(&self, root: NodeType) {
        tracing::debug!(
            target: "jsonbuddy::ser",
            bytes = self.bytes_written,
            root = %root,
            "serialized document"
        );
    }

    fn write_double(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            tracing::trace!(target: "jsonbuddy::ser", value = %value, "rejected non-finite double");
            return Err(Error::serialization(&format!(
                "cannot serialize non-finite double {}",
                value
            )));
        }
        self.write_raw(format_double(value).as_bytes())
    }

    fn write_string(&mut self, s: &str) -> Result<()> {
        self.write_raw(b"\"")?;

        // Every byte that needs escaping is ASCII, so slicing between them
        // never splits a UTF-8 sequence.
        let bytes = s.as_bytes();
        let mut start = 0;
        for (i, &byte) in bytes.iter().enumerate() {
            if byte >= 0x20 && byte != b'"' && byte != b'\\' {
                continue;
            }
            if start < i {
                self.write_raw(&bytes[start..i])?;
            }
            match escape_letter(byte) {
                Some(letter) => self.write_raw(&[b'\\', letter])?,
                None => self.write_raw(format!("\\u{:04x}", byte).as_bytes())?,
            }
            start = i + 1;
        }
        if start < bytes.len() {
            self.write_raw(&bytes[start..])?;
        }

        self.write_raw(b"\"")
    }

    #[inline]
    fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.bytes_written += bytes.len();
        Ok(())
    }
}

/// Short escape letter for a raw byte, if it has one.
pub(crate) const fn escape_letter(byte: u8) -> Option<u8> {
    match byte {
        b'"' => Some(b'"'),
        b'\\' => Some(b'\\'),
        0x08 => Some(b'b'),
        0x0C => Some(b'f'),
        b'\n' => Some(b'n'),
        b'\r' => Some(b'r'),
        b'\t' => Some(b't'),
        _ => None,
    }
}

/// Character a short escape letter stands for. Accepts `\/` on input even
/// though it is never produced.
pub(crate) const fn unescape_letter(letter: char) -> Option<char> {
    match letter {
        '"' => Some('"'),
        '\\' => Some('\\'),
        '/' => Some('/'),
        'b' => Some('\u{0008}'),
        'f' => Some('\u{000C}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        _ => None,
    }
}

//! JSON text parsing.
//!
//! A single-pass recursive-descent parser that accepts exactly the RFC 8259
//! grammar and produces a [`JsonNode`] tree:
//!
//! - whitespace is space, tab, line feed and carriage return;
//! - a repeated object key keeps the last value;
//! - integers that fit an `i64` become longs, every other number a double;
//! - comments, trailing commas, unquoted keys and bare words are rejected.
//!
//! Parsing is all-or-nothing: any violation stops the parse with an
//! [`Error::Parse`] carrying line, column and byte offset, and no partial tree
//! escapes.
//!
//! ```rust
//! use jsonbuddy::parse;
//!
//! let node = parse(r#"{"firstname":"Darth", "lastname": "Vader"}"#).unwrap();
//! let person = node.as_object().unwrap();
//! assert_eq!(person.string_value("lastname").as_deref(), Some("Vader"));
//!
//! let err = parse(r#"{"a" 1}"#).unwrap_err();
//! assert!(err.to_string().contains("expected ':'"));
//! ```

use crate::ser::unescape_letter;
use crate::{Error, JsonArray, JsonNode, JsonObject, ParseOptions, Result};

/// The JSON parser.
///
/// Created via [`Parser::new`] and consumed by [`Parser::parse`].
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
    options: ParseOptions,
}

/// Where a token started, for errors reported after it was consumed.
#[derive(Clone, Copy)]
struct Mark {
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, options: ParseOptions) -> Self {
        Parser {
            input,
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
            options,
        }
    }

    /// Parses the whole input as one JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the input is empty, malformed, nested
    /// deeper than the configured limit, or has anything but whitespace after
    /// the value.
    pub fn parse(mut self) -> Result<JsonNode> {
        self.skip_whitespace();
        if self.at_end() {
            return Err(self.error("expected a JSON value, found end of input"));
        }

        let value = self.parse_value()?;

        self.skip_whitespace();
        if let Some(ch) = self.peek_char() {
            return Err(self.error(&format!(
                "unexpected '{}' after the top-level value",
                ch.escape_debug()
            )));
        }
        Ok(value)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r') = self.peek_char() {
            self.next_char();
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn error(&self, msg: &str) -> Error {
        self.error_at(self.mark(), msg)
    }

    fn error_at(&self, mark: Mark, msg: &str) -> Error {
        tracing::trace!(
            target: "jsonbuddy::parser",
            line = mark.line,
            column = mark.column,
            offset = mark.position,
            reason = msg,
            "rejected input"
        );
        Error::parse(mark.line, mark.column, mark.position, msg)
    }

    /// Error describing whatever sits at the cursor when `expected` did not.
    fn unexpected(&self, expected: &str) -> Error {
        match self.peek_char() {
            Some(ch) => self.error(&format!(
                "expected {}, found '{}'",
                expected,
                ch.escape_debug()
            )),
            None => self.error(&format!("expected {}, found end of input", expected)),
        }
    }

    fn expect(&mut self, ch: char, expected: &str) -> Result<()> {
        if self.peek_char() == Some(ch) {
            self.next_char();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn parse_value(&mut self) -> Result<JsonNode> {
        self.skip_whitespace();

        match self.peek_char() {
            Some('{') => self.parse_object().map(JsonNode::Object),
            Some('[') => self.parse_array().map(JsonNode::Array),
            Some('"') => self.parse_string().map(JsonNode::Text),
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.parse_number(),
            Some(ch) if ch.is_ascii_alphabetic() => self.parse_literal(),
            _ => Err(self.unexpected("a JSON value")),
        }
    }

    fn enter_container(&mut self) -> Result<()> {
        if self.depth >= self.options.max_depth {
            return Err(self.error(&format!(
                "nesting deeper than the limit of {}",
                self.options.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_object(&mut self) -> Result<JsonObject> {
        self.enter_container()?;
        self.next_char(); // consume '{'

        let mut object = JsonObject::new();

        self.skip_whitespace();
        if self.peek_char() == Some('}') {
            self.next_char();
            self.depth -= 1;
            return Ok(object);
        }

        loop {
            self.skip_whitespace();
            if self.peek_char() != Some('"') {
                return Err(self.unexpected("a string object key"));
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            self.expect(':', "':' after object key")?;

            let value = self.parse_value()?;
            // Duplicate keys: last write wins.
            object.insert(key, value);

            self.skip_whitespace();
            match self.peek_char() {
                Some(',') => {
                    self.next_char();
                }
                Some('}') => {
                    self.next_char();
                    break;
                }
                _ => return Err(self.unexpected("',' or '}' in object")),
            }
        }

        self.depth -= 1;
        Ok(object)
    }

    fn parse_array(&mut self) -> Result<JsonArray> {
        self.enter_container()?;
        self.next_char(); // consume '['

        let mut array = JsonArray::new();

        self.skip_whitespace();
        if self.peek_char() == Some(']') {
            self.next_char();
            self.depth -= 1;
            return Ok(array);
        }

        loop {
            let value = self.parse_value()?;
            array.push(value);

            self.skip_whitespace();
            match self.peek_char() {
                Some(',') => {
                    self.next_char();
                }
                Some(']') => {
                    self.next_char();
                    break;
                }
                _ => return Err(self.unexpected("',' or ']' in array")),
            }
        }

        self.depth -= 1;
        Ok(array)
    }

    fn parse_string(&mut self) -> Result<String> {
        let start = self.mark();
        self.next_char(); // consume opening quote
        let mut result = String::new();

        loop {
            let escape_mark = self.mark();
            match self.next_char() {
                Some('"') => return Ok(result),
                Some('\\') => match self.next_char() {
                    Some('u') => result.push(self.parse_unicode_escape(escape_mark)?),
                    Some(letter) => match unescape_letter(letter) {
                        Some(ch) => result.push(ch),
                        None => {
                            return Err(self.error_at(
                                escape_mark,
                                &format!("invalid escape sequence '\\{}'", letter.escape_debug()),
                            ))
                        }
                    },
                    None => {
                        return Err(self.error_at(start, "unterminated string"));
                    }
                },
                Some(ch) if ch < '\u{20}' => {
                    return Err(self.error_at(
                        escape_mark,
                        &format!("unescaped control character '{}' in string", ch.escape_debug()),
                    ));
                }
                Some(ch) => result.push(ch),
                None => return Err(self.error_at(start, "unterminated string")),
            }
        }
    }

    fn parse_hex4(&mut self, escape_mark: Mark) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .next_char()
                .and_then(|ch| ch.to_digit(16))
                .ok_or_else(|| {
                    self.error_at(
                        escape_mark,
                        "invalid unicode escape (expected 4 hex digits)",
                    )
                })?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    /// Decodes the rest of a `\u` escape, joining UTF-16 surrogate pairs.
    fn parse_unicode_escape(&mut self, escape_mark: Mark) -> Result<char> {
        let first = self.parse_hex4(escape_mark)?;

        let code_point = match first {
            0xD800..=0xDBFF => {
                if self.next_char() != Some('\\') || self.next_char() != Some('u') {
                    return Err(self.error_at(escape_mark, "unpaired high surrogate in unicode escape"));
                }
                let second = self.parse_hex4(escape_mark)?;
                if !(0xDC00..=0xDFFF).contains(&second) {
                    return Err(self.error_at(escape_mark, "unpaired high surrogate in unicode escape"));
                }
                0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(self.error_at(escape_mark, "unpaired low surrogate in unicode escape"));
            }
            other => other,
        };

        char::from_u32(code_point)
            .ok_or_else(|| self.error_at(escape_mark, "invalid unicode code point"))
    }

    fn skip_digits(&mut self) -> usize {
        let mut count = 0;
        while matches!(self.peek_char(), Some(ch) if ch.is_ascii_digit()) {
            self.next_char();
            count += 1;
        }
        count
    }

    fn parse_number(&mut self) -> Result<JsonNode> {
        let start = self.mark();
        let mut integral = true;

        if self.peek_char() == Some('-') {
            self.next_char();
        }

        match self.peek_char() {
            Some('0') => {
                self.next_char();
            }
            Some('1'..='9') => {
                self.skip_digits();
            }
            _ => return Err(self.unexpected("a digit")),
        }

        if self.peek_char() == Some('.') {
            self.next_char();
            integral = false;
            if self.skip_digits() == 0 {
                return Err(self.unexpected("a digit after the decimal point"));
            }
        }

        if let Some('e' | 'E') = self.peek_char() {
            self.next_char();
            integral = false;
            if let Some('+' | '-') = self.peek_char() {
                self.next_char();
            }
            if self.skip_digits() == 0 {
                return Err(self.unexpected("a digit in the exponent"));
            }
        }

        let text = &self.input[start.position..self.position];

        if integral {
            if let Ok(long) = text.parse::<i64>() {
                return Ok(JsonNode::Long(long));
            }
        }

        // Magnitudes beyond f64 saturate to infinity; the serializer refuses
        // to write them back.
        text.parse::<f64>()
            .map(JsonNode::Double)
            .map_err(|_| self.error_at(start, &format!("malformed number '{}'", text)))
    }

    fn parse_literal(&mut self) -> Result<JsonNode> {
        let start = self.mark();
        while matches!(self.peek_char(), Some(ch) if ch.is_ascii_alphanumeric() || ch == '_') {
            self.next_char();
        }

        match &self.input[start.position..self.position] {
            "true" => Ok(JsonNode::Boolean(true)),
            "false" => Ok(JsonNode::Boolean(false)),
            "null" => Ok(JsonNode::Null),
            word => Err(self.error_at(
                start,
                &format!("expected a JSON value, found bare word '{}'", word),
            )),
        }
    }
}

/// Line and column of the byte just past `prefix`, which need not be valid
/// UTF-8 at its end.
pub(crate) fn locate(prefix: &[u8]) -> (usize, usize) {
    let line = 1 + prefix.iter().filter(|&&b| b == b'\n').count();
    let last_line = match prefix.iter().rposition(|&b| b == b'\n') {
        Some(newline) => &prefix[newline + 1..],
        None => prefix,
    };
    // Count characters by their leading bytes.
    let column = 1 + last_line.iter().filter(|&&b| b & 0xC0 != 0x80).count();
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<JsonNode> {
        Parser::new(input, ParseOptions::default()).parse()
    }

    fn parse_err(input: &str) -> (usize, usize, usize, String) {
        match parse(input) {
            Err(Error::Parse {
                line,
                col,
                offset,
                msg,
            }) => (line, col, offset, msg),
            other => panic!("expected parse error for {:?}, got {:?}", input, other),
        }
    }

    #[test]
    fn test_empty_object_and_array() {
        assert_eq!(parse("{}").unwrap(), JsonNode::object());
        assert_eq!(parse(" [ ] ").unwrap(), JsonNode::array());
    }

    #[test]
    fn test_object_with_string_value() {
        let node = parse(r#"{"name":"Darth Vader"}"#).unwrap();
        let obj = node.as_object().unwrap();
        assert_eq!(obj.string_value("name").as_deref(), Some("Darth Vader"));
    }

    #[test]
    fn test_whitespace_between_tokens() {
        let node = parse("\t{ \"a\" :\r\n [ 1 , true ,null ] }\n").unwrap();
        let arr = node.as_object().unwrap().required_array("a").unwrap();
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.boolean_value(1), Some(true));
        assert!(arr[2].is_null());
    }

    #[test]
    fn test_duplicate_key_last_write_wins() {
        let node = parse(r#"{"a":1,"a":2}"#).unwrap();
        let obj = node.as_object().unwrap();
        assert_eq!(obj.long_value("a"), Some(2));
        assert_eq!(obj.len(), 1);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse("0").unwrap(), JsonNode::Long(0));
        assert_eq!(parse("-17").unwrap(), JsonNode::Long(-17));
        assert_eq!(parse("9223372036854775807").unwrap(), JsonNode::Long(i64::MAX));
        assert_eq!(parse("-9223372036854775808").unwrap(), JsonNode::Long(i64::MIN));
        assert_eq!(parse("9223372036854775808").unwrap(), JsonNode::Double(9.223372036854775808e18));
        assert_eq!(parse("1.5").unwrap(), JsonNode::Double(1.5));
        assert_eq!(parse("1.0").unwrap(), JsonNode::Double(1.0));
        assert_eq!(parse("2e3").unwrap(), JsonNode::Double(2000.0));
        assert_eq!(parse("-2.5E-1").unwrap(), JsonNode::Double(-0.25));
        assert_eq!(parse("-0.0").unwrap(), JsonNode::Double(-0.0));
    }

    #[test]
    fn test_malformed_numbers() {
        for input in ["01", "-", "1.", ".5", "1e", "1e+", "+1", "-a", "1.e5"] {
            assert!(parse(input).is_err(), "{:?} should not parse", input);
        }
    }

    #[test]
    fn test_huge_numbers_saturate() {
        assert_eq!(parse("1e400").unwrap(), JsonNode::Double(f64::INFINITY));
        assert_eq!(parse("-1e400").unwrap(), JsonNode::Double(f64::NEG_INFINITY));

        let digits = format!("1{}", "0".repeat(400));
        assert_eq!(parse(&digits).unwrap(), JsonNode::Double(f64::INFINITY));

        let node = parse("[1e400]").unwrap();
        assert!(matches!(crate::to_string(&node), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_string_escapes() {
        let node = parse(r#""\"\\\/\b\f\n\r\tAé""#).unwrap();
        assert_eq!(node.as_str(), Some("\"\\/\u{8}\u{c}\n\r\tAé"));
    }

    #[test]
    fn test_surrogate_pairs() {
        assert_eq!(parse(r#""\ud83d\ude00""#).unwrap().as_str(), Some("😀"));
        assert!(parse(r#""\ud83d""#).is_err());
        assert!(parse(r#""\ud83dx""#).is_err());
        assert!(parse(r#""\ude00""#).is_err());
        assert!(parse(r#""\ud83dA""#).is_err());
    }

    #[test]
    fn test_string_errors() {
        let (_, col, offset, msg) = parse_err(r#"["abc"#);
        assert_eq!((col, offset), (2, 1));
        assert!(msg.contains("unterminated string"));

        let (_, _, _, msg) = parse_err(r#""\x""#);
        assert!(msg.contains("invalid escape"));

        let (_, _, _, msg) = parse_err(r#""\u12G4""#);
        assert!(msg.contains("hex digits"));

        let (_, _, _, msg) = parse_err("\"tab\there\"");
        assert!(msg.contains("control character"));
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse("true").unwrap(), JsonNode::Boolean(true));
        assert_eq!(parse("false").unwrap(), JsonNode::Boolean(false));
        assert_eq!(parse("null").unwrap(), JsonNode::Null);

        for input in ["nul", "True", "undefined", "NaN", "truex", "[nulls]"] {
            assert!(parse(input).is_err(), "{:?} should not parse", input);
        }
    }

    #[test]
    fn test_structural_errors() {
        let (_, _, _, msg) = parse_err("{");
        assert!(msg.contains("string object key"));
        assert!(msg.contains("end of input"));

        let (_, _, offset, msg) = parse_err("[1,]");
        assert_eq!(offset, 3);
        assert!(msg.contains("expected a JSON value, found ']'"));

        let (_, _, _, msg) = parse_err(r#"{"a":1 "b":2}"#);
        assert!(msg.contains("',' or '}'"));

        let (_, _, _, msg) = parse_err("[1 2]");
        assert!(msg.contains("',' or ']'"));

        let (_, _, _, msg) = parse_err(r#"{"a" 1}"#);
        assert!(msg.contains("expected ':' after object key"));

        let (_, _, _, msg) = parse_err("{a:1}");
        assert!(msg.contains("string object key"));

        let (_, _, _, msg) = parse_err(r#"{"a":1,}"#);
        assert!(msg.contains("string object key"));
    }

    #[test]
    fn test_empty_and_blank_input() {
        for input in ["", "   ", "\n\t"] {
            let (_, _, _, msg) = parse_err(input);
            assert!(msg.contains("end of input"));
        }
    }

    #[test]
    fn test_trailing_content() {
        let (line, col, offset, msg) = parse_err("{}\n x");
        assert_eq!((line, col, offset), (2, 2, 4));
        assert!(msg.contains("after the top-level value"));

        assert!(parse("1 2").is_err());
        assert!(parse("[] // comment").is_err());
    }

    #[test]
    fn test_error_position_tracks_lines() {
        let (line, col, _, _) = parse_err("{\n  \"a\": 1,\n  \"b\": ?\n}");
        assert_eq!((line, col), (3, 8));
    }

    #[test]
    fn test_depth_limit() {
        let options = ParseOptions::new().with_max_depth(3);
        assert!(Parser::new("[[[]]]", options.clone()).parse().is_ok());
        assert!(Parser::new(r#"[{"a":[]}]"#, options.clone()).parse().is_ok());

        let err = Parser::new("[[[[]]]]", options).parse().unwrap_err();
        assert!(err.to_string().contains("nesting deeper than the limit of 3"));
    }

    #[test]
    fn test_deep_input_does_not_overflow() {
        let input = "[".repeat(100_000);
        assert!(parse(&input).unwrap_err().is_parse());
    }

    #[test]
    fn test_locate() {
        assert_eq!(locate(b""), (1, 1));
        assert_eq!(locate(b"ab\ncd"), (2, 3));
        assert_eq!(locate("é".as_bytes()), (1, 2));
    }
}

//! Recursive-descent JSON parser.
//!
//! The parser walks a length-bounded byte buffer with a single cursor and
//! builds the [`Value`] tree in one pass. The grammar lives entirely in the
//! control flow: the first non-whitespace byte selects the branch (digit or
//! `-` → number, `"` → string, `[` → array, `{` → dict, `t`/`f`/`n` →
//! literal) and each branch consumes exactly its own lexeme.
//!
//! # Key design decisions
//!
//! - **Ownership does the unwinding**: every node built so far is owned by a
//!   local of some frame on the call stack. When a nested parse fails, `?`
//!   returns through those frames and each partially filled container is
//!   dropped together with the children already attached to it. A caller
//!   gets a complete tree or an error, never a fragment.
//! - **Bounded recursion**: entering an array or dict counts one level
//!   against [`ParseOptions::max_depth`], so hostile input fails with
//!   [`JsonError::DepthLimit`] instead of exhausting the stack. The limit
//!   itself never exceeds [`MAX_DEPTH_CEILING`](crate::options::MAX_DEPTH_CEILING).
//! - **Number classification in the scan**: the same pass that finds the end
//!   of a number decides whether it is an integer or a float. The lexeme is
//!   then converted as a whole; a conversion that cannot take the whole
//!   lexeme (e.g. an integer beyond `i64`) is a syntax error.
//! - **Keys are values**: a dict key is parsed like any value and must come
//!   out as a string; numbers, literals and containers in key position are
//!   rejected after they have been parsed.

use tracing::{debug, trace};

use crate::error::{JsonError, Result};
use crate::options::{ParseOptions, UnicodeEscapes};
use crate::types::Kind;
use crate::value::Value;

/// Parse a JSON text with default [`ParseOptions`].
///
/// Empty or all-whitespace input is an error: there is no implicit root.
pub fn parse(text: impl AsRef<[u8]>) -> Result<Value> {
    parse_with(text, &ParseOptions::default())
}

/// Parse a JSON text with explicit options.
pub fn parse_with(text: impl AsRef<[u8]>, options: &ParseOptions) -> Result<Value> {
    let input = text.as_ref();
    let mut parser = Parser {
        input,
        pos: 0,
        depth: 0,
        options,
    };
    match parser.parse_document() {
        Ok(root) => {
            trace!(kind = %root.kind(), consumed = parser.pos, "parsed JSON document");
            Ok(root)
        }
        Err(err) => {
            debug!(error = %err, input_len = input.len(), "JSON parse failed");
            Err(err)
        }
    }
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
    options: &'a ParseOptions,
}

impl Parser<'_> {
    fn parse_document(&mut self) -> Result<Value> {
        let root = self.parse_value()?;
        if !self.options.allow_trailing {
            self.skip_whitespace();
            if self.pos < self.input.len() {
                return Err(self.error("unexpected input after the root value"));
            }
        }
        Ok(root)
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'0'..=b'9' | b'-') => self.parse_number(),
            Some(b'"') => self.parse_string().map(Value::from),
            Some(b'[') => self.nested(Self::parse_array),
            Some(b'{') => self.nested(Self::parse_dict),
            Some(b't') => self.parse_literal(b"true").map(|()| Value::from(true)),
            Some(b'f') => self.parse_literal(b"false").map(|()| Value::from(false)),
            Some(b'n') => self.parse_literal(b"null").map(|()| Value::null()),
            Some(other) => Err(self.error(format!(
                "unexpected character '{}'",
                other.escape_ascii()
            ))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Run a container parser one nesting level deeper.
    fn nested(&mut self, parse: fn(&mut Self) -> Result<Value>) -> Result<Value> {
        let limit = self.options.effective_max_depth();
        if self.depth >= limit {
            return Err(JsonError::DepthLimit {
                limit,
                offset: self.pos,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // ------------------------------------------------------------------
    // Containers
    // ------------------------------------------------------------------

    fn parse_array(&mut self) -> Result<Value> {
        self.pos += 1; // '['
        self.skip_whitespace();
        if self.at_end() {
            return Err(self.error("unexpected end of input in array"));
        }

        let array = Value::array();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(array);
        }

        loop {
            let element = self.parse_value()?;
            self.skip_whitespace();
            let separator = match self.peek() {
                Some(sep @ (b',' | b']')) => sep,
                _ => return Err(self.error("expected ',' or ']' in array")),
            };
            array.array_insert_owned(element, None)?;
            self.pos += 1;
            if separator == b']' {
                return Ok(array);
            }
        }
    }

    fn parse_dict(&mut self) -> Result<Value> {
        self.pos += 1; // '{'
        self.skip_whitespace();
        if self.at_end() {
            return Err(self.error("unexpected end of input in dictionary"));
        }

        let dict = Value::dict();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(dict);
        }

        loop {
            self.skip_whitespace();
            let key_offset = self.pos;
            let key = self.parse_value()?;
            if key.kind() != Kind::String {
                return Err(JsonError::syntax(
                    key_offset,
                    format!("dictionary key must be a string, found {}", key.kind()),
                ));
            }

            self.skip_whitespace();
            if self.peek() != Some(b':') {
                return Err(self.error("expected ':' after dictionary key"));
            }
            self.pos += 1;

            let element = self.parse_value()?;
            self.skip_whitespace();
            let separator = match self.peek() {
                Some(sep @ (b',' | b'}')) => sep,
                _ => return Err(self.error("expected ',' or '}' in dictionary")),
            };

            let key_bytes = key.string_bytes()?.to_vec();
            // A repeated key hands back the earlier value; last write wins.
            let displaced = dict.dict_set_owned(key_bytes, element)?;
            drop(displaced);

            self.pos += 1;
            if separator == b'}' {
                return Ok(dict);
            }
        }
    }

    // ------------------------------------------------------------------
    // Scalars
    // ------------------------------------------------------------------

    /// `-? digit+ ( '.' digit+ )? ( [eE] [+-]? digit+ )?`
    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        let mut is_float = false;

        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        if self.skip_digits() == 0 {
            return Err(self.error("expected digit in number"));
        }
        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            if self.skip_digits() == 0 {
                return Err(self.error("expected digit after decimal point"));
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.skip_digits() == 0 {
                return Err(self.error("expected digit in exponent"));
            }
        }

        // The scan above only accepts ASCII, so this cannot fail.
        let lexeme = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| JsonError::syntax(start, "invalid number"))?;

        if is_float {
            match lexeme.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Value::from(f)),
                _ => Err(JsonError::syntax(
                    start,
                    format!("float out of range: {lexeme}"),
                )),
            }
        } else {
            lexeme.parse::<i64>().map(Value::from).map_err(|_| {
                JsonError::syntax(start, format!("integer out of range: {lexeme}"))
            })
        }
    }

    /// Parse a quoted string starting at the opening `"` and return its
    /// decoded bytes.
    fn parse_string(&mut self) -> Result<Vec<u8>> {
        let start = self.pos;
        self.pos += 1; // '"'
        let mut buf = Vec::with_capacity(32);

        loop {
            let Some(byte) = self.peek() else {
                return Err(JsonError::syntax(
                    start,
                    "end of input before closing '\"' in string",
                ));
            };
            match byte {
                b'"' => {
                    self.pos += 1;
                    return Ok(buf);
                }
                b'\\' => self.parse_escape(&mut buf)?,
                _ => {
                    buf.push(byte);
                    self.pos += 1;
                }
            }
        }
    }

    fn parse_escape(&mut self, buf: &mut Vec<u8>) -> Result<()> {
        let escape_at = self.pos;
        self.pos += 1; // '\\'
        let Some(code) = self.peek() else {
            return Err(JsonError::syntax(escape_at, "unterminated escape sequence"));
        };
        self.pos += 1;

        let byte = match code {
            b'\\' => b'\\',
            b'/' => b'/',
            b'\'' => b'\'',
            b'"' => b'"',
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'0' => 0,
            b'u' => return self.parse_unicode_escape(escape_at, buf),
            other => {
                return Err(JsonError::syntax(
                    escape_at,
                    format!("invalid escape sequence '\\{}'", other.escape_ascii()),
                ))
            }
        };
        buf.push(byte);
        Ok(())
    }

    /// Decode the `XXXX` of a `\uXXXX` escape (cursor just past the `u`).
    fn parse_unicode_escape(&mut self, escape_at: usize, buf: &mut Vec<u8>) -> Result<()> {
        let unit = self.read_hex4(escape_at)?;

        match self.options.unicode_escapes {
            UnicodeEscapes::RawBytes => {
                let [high, low] = unit.to_be_bytes();
                if high != 0 {
                    buf.push(high);
                }
                buf.push(low);
            }
            UnicodeEscapes::Utf8 => {
                let code_point = match unit {
                    0xD800..=0xDBFF => {
                        let low_at = self.pos;
                        if self.input.get(low_at..low_at + 2) != Some(b"\\u".as_slice()) {
                            return Err(JsonError::syntax(
                                escape_at,
                                "unpaired high surrogate in \\u escape",
                            ));
                        }
                        self.pos += 2;
                        let low = self.read_hex4(low_at)?;
                        if !(0xDC00..=0xDFFF).contains(&low) {
                            return Err(JsonError::syntax(
                                low_at,
                                "expected low surrogate after high surrogate",
                            ));
                        }
                        0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
                    }
                    0xDC00..=0xDFFF => {
                        return Err(JsonError::syntax(
                            escape_at,
                            "unpaired low surrogate in \\u escape",
                        ))
                    }
                    _ => u32::from(unit),
                };
                let ch = char::from_u32(code_point)
                    .ok_or_else(|| JsonError::syntax(escape_at, "invalid \\u escape"))?;
                let mut utf8 = [0u8; 4];
                buf.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
            }
        }
        Ok(())
    }

    fn read_hex4(&mut self, escape_at: usize) -> Result<u16> {
        let digits = self
            .input
            .get(self.pos..self.pos + 4)
            .filter(|digits| digits.iter().all(u8::is_ascii_hexdigit))
            .ok_or_else(|| {
                JsonError::syntax(escape_at, "invalid \\u escape: expected four hex digits")
            })?;
        let unit = digits
            .iter()
            .fold(0u16, |acc, &d| (acc << 4) | hex_value(d));
        self.pos += 4;
        Ok(unit)
    }

    fn parse_literal(&mut self, word: &'static [u8]) -> Result<()> {
        if self.input[self.pos..].starts_with(word) {
            self.pos += word.len();
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", word.escape_ascii())))
        }
    }

    // ------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    /// Advance past ASCII digits; returns how many were consumed.
    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn error(&self, message: impl Into<String>) -> JsonError {
        JsonError::syntax(self.pos, message)
    }
}

fn hex_value(digit: u8) -> u16 {
    match digit {
        b'0'..=b'9' => u16::from(digit - b'0'),
        b'a'..=b'f' => u16::from(digit - b'a' + 10),
        b'A'..=b'F' => u16::from(digit - b'A' + 10),
        _ => 0,
    }
}

//! Strict recursive-descent JSON parser.
//!
//! One routine per grammar production, all sharing a single byte cursor into
//! the input. The first structural or lexical violation aborts the parse with
//! a [`NodeError::Parse`] carrying the byte offset and a context snippet;
//! there is no recovery mode.
//!
//! Number literals containing a `.` become [`Node::Decimal`]; every other
//! numeric run becomes [`Node::Long`].

use crate::coerce::parse_decimal;
use crate::error::{NodeError, Result};
use crate::node::{Node, ObjectMap};
use std::str::FromStr;

/// Default nesting limit applied by [`parse`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of Objects and Arrays; `None` disables the check and
    /// leaves depth bounded only by the call stack.
    pub max_depth: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

/// Parse a complete JSON document.
///
/// ```
/// let root = jsontree_core::parse(r#"{"foo":{"bar":"baz"}}"#).unwrap();
/// assert_eq!(root.get("foo.bar").unwrap().get_string().unwrap().as_deref(), Some("baz"));
/// ```
pub fn parse(text: &str) -> Result<Node> {
    parse_with(text, &ParseOptions::default())
}

pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Node> {
    log::trace!("parsing {} bytes", text.len());
    let mut parser = Parser::new(text, options.max_depth);
    let result = parser.document();
    match &result {
        Ok(node) => log::trace!("parsed {} root", node.kind()),
        Err(e) => log::debug!("{e}"),
    }
    result
}

/// Reverse of [`crate::escape`]: resolve `\" \\ \/ \b \f \n \r \t \uXXXX`
/// in text that carries no surrounding quotes.
pub fn unescape(text: &str) -> Result<String> {
    let mut parser = Parser::new(text, None);
    parser.string_body(false)
}

impl FromStr for Node {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
    max_depth: Option<usize>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, max_depth: Option<usize>) -> Self {
        Parser {
            input,
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    fn document(&mut self) -> Result<Node> {
        let node = self.value()?;
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(self.error(self.pos, "trailing characters after the document"));
        }
        Ok(node)
    }

    fn value(&mut self) -> Result<Node> {
        self.skip_whitespace();
        let start = self.pos;
        match self.peek() {
            None => Err(self.eof("expected a value")),
            Some('{') => self.object(),
            Some('[') => self.array(),
            Some('"') => {
                self.pos += 1;
                self.string_body(true).map(Node::String)
            }
            Some(c) if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => self.number(),
            Some('t') => self.literal("true", Node::Boolean(true)),
            Some('f') => self.literal("false", Node::Boolean(false)),
            Some('n') => self.literal("null", Node::Null),
            Some(c) => Err(self.error(start, format!("unexpected character `{c}`"))),
        }
    }

    fn object(&mut self) -> Result<Node> {
        self.enter()?;
        let mut map = ObjectMap::new();
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Node::Object(map));
        }
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('"') => self.pos += 1,
                None => return Err(self.eof("expected an object key")),
                Some(_) => return Err(self.error(self.pos, "expected a quoted object key")),
            }
            let key = self.string_body(true)?;
            self.skip_whitespace();
            match self.peek() {
                Some(':') => self.pos += 1,
                None => return Err(self.eof("expected `:` after object key")),
                Some(_) => return Err(self.error(self.pos, "expected `:` after object key")),
            }
            let value = self.value()?;
            map.insert(key, value);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.eof("expected `,` or `}`")),
                Some(_) => return Err(self.error(self.pos, "expected `,` or `}`")),
            }
        }
        self.depth -= 1;
        Ok(Node::Object(map))
    }

    fn array(&mut self) -> Result<Node> {
        self.enter()?;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Node::Array(items));
        }
        loop {
            items.push(self.value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.eof("expected `,` or `]`")),
                Some(_) => return Err(self.error(self.pos, "expected `,` or `]`")),
            }
        }
        self.depth -= 1;
        Ok(Node::Array(items))
    }

    /// Consume the opening bracket under the cursor, enforcing the depth limit.
    fn enter(&mut self) -> Result<()> {
        if let Some(max) = self.max_depth {
            if self.depth >= max {
                return Err(self.error(self.pos, format!("nesting exceeds {max} levels")));
            }
        }
        self.depth += 1;
        self.pos += 1;
        Ok(())
    }

    /// Scan string content after the opening quote. With `quoted`, stops at and
    /// consumes the closing quote; otherwise runs to the end of input and treats
    /// `"` as an ordinary character.
    fn string_body(&mut self, quoted: bool) -> Result<String> {
        let input = self.input;
        let mut out = String::new();
        loop {
            let rest = &input[self.pos..];
            let stop = rest.find(|c: char| c == '\\' || (quoted && c == '"'));
            let Some(offset) = stop else {
                if quoted {
                    self.pos = input.len();
                    return Err(self.eof("unterminated string"));
                }
                out.push_str(rest);
                self.pos = input.len();
                return Ok(out);
            };
            out.push_str(&rest[..offset]);
            self.pos += offset + 1;
            if rest.as_bytes()[offset] == b'"' {
                return Ok(out);
            }
            let escape_pos = self.pos - 1;
            let decoded = match self.bump() {
                Some('"') => '"',
                Some('\\') => '\\',
                Some('/') => '/',
                Some('b') => '\u{8}',
                Some('f') => '\u{c}',
                Some('n') => '\n',
                Some('r') => '\r',
                Some('t') => '\t',
                Some('u') => self.unicode_escape(escape_pos)?,
                Some(other) => {
                    return Err(self.error(escape_pos, format!("invalid escape `\\{other}`")))
                }
                None => return Err(self.eof("unterminated escape sequence")),
            };
            out.push(decoded);
        }
    }

    /// Decode the hex digits of a `\u` escape. A high surrogate followed by a
    /// `\u` low surrogate combines into one scalar; lone surrogates decode to
    /// U+FFFD.
    fn unicode_escape(&mut self, escape_pos: usize) -> Result<char> {
        let first = self.hex4(escape_pos)?;
        if (0xD800..0xDC00).contains(&first) && self.input[self.pos..].starts_with("\\u") {
            let resume = self.pos;
            self.pos += 2;
            let second = self.hex4(resume)?;
            if (0xDC00..0xE000).contains(&second) {
                let combined = 0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00);
                return Ok(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            self.pos = resume;
        }
        Ok(char::from_u32(first).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn hex4(&mut self, escape_pos: usize) -> Result<u32> {
        let input = self.input;
        let end = (self.pos + 4).min(input.len());
        if !input.as_bytes()[self.pos..end].iter().all(u8::is_ascii_hexdigit) {
            return Err(self.error(escape_pos, "invalid `\\u` escape"));
        }
        if end - self.pos < 4 {
            return Err(self.eof("truncated `\\u` escape"));
        }
        let digits = &input[self.pos..end];
        let code = u32::from_str_radix(digits, 16)
            .map_err(|e| self.error(escape_pos, format!("invalid `\\u` escape: {e}")))?;
        self.pos += 4;
        Ok(code)
    }

    /// Greedy numeric run over digits, signs, `.`, `e` and `E`.
    fn number(&mut self) -> Result<Node> {
        let input = self.input;
        let start = self.pos;
        let len = input[start..]
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
            .unwrap_or(input.len() - start);
        let text = &input[start..start + len];
        self.pos = start + len;
        if text.contains('.') {
            parse_decimal(text)
                .map(Node::Decimal)
                .map_err(|_| self.error(start, format!("invalid decimal number `{text}`")))
        } else {
            text.parse::<i64>()
                .map(Node::Long)
                .map_err(|e| self.error(start, format!("invalid integer `{text}`: {e}")))
        }
    }

    fn literal(&mut self, word: &'static str, node: Node) -> Result<Node> {
        if self.input[self.pos..].starts_with(word) {
            self.pos += word.len();
            Ok(node)
        } else {
            Err(self.error(self.pos, format!("expected `{word}`")))
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, position: usize, message: impl Into<String>) -> NodeError {
        NodeError::parse_at(self.input, position, message)
    }

    /// End of input while something was still expected.
    fn eof(&self, expected: &str) -> NodeError {
        self.error(
            self.input.len(),
            format!("unexpected end of input, {expected}"),
        )
    }
}

//! Recursive-descent parser — converts document text into a [`Value`] tree.
//!
//! A single cursor walks the input left to right with no backtracking. Each
//! grammar rule is one method:
//!
//! - Objects `{"k": v, ...}` and arrays `[v, ...]`
//! - Strings with the escapes `\"`, `\\`, `\n`, `\r`, `\t`
//! - `true` / `false` / `null` matched by keyword lookahead
//! - Numbers: optional `-`, digits, optional `.digits`; no exponents
//!
//! # Key design decisions
//!
//! - **Number typing at scan time**: a literal containing `.` becomes
//!   [`Number::Float`], anything else [`Number::Int`]. `42.0` stays a float.
//! - **Permissive escapes**: an unknown escape such as `\q` yields the escaped
//!   character (`q`). There is no `\u` support: `\u0041` decodes to `u0041`.
//! - **Strict document boundary**: non-whitespace after the top-level value is
//!   rejected with [`ParseError::TrailingCharacters`].
//! - **Bounded recursion**: containers nested deeper than [`MAX_DEPTH`] fail
//!   with [`ParseError::NestingTooDeep`] instead of exhausting the stack.

use crate::error::ParseError;
use crate::value::{Map, Number, Value};

/// Maximum container nesting accepted by [`parse`].
pub const MAX_DEPTH: usize = 128;

/// Parse a complete document into a [`Value`].
///
/// Fails on the first malformed token; no partial tree is ever returned.
///
/// # Example
/// ```
/// use metrics_project::{parse, Number, Value};
/// let value = parse(r#"{"counts":[1,2],"fp":"0.0"}"#).unwrap();
/// let counts = value.as_object().unwrap().get("counts").unwrap();
/// assert_eq!(counts.as_array().unwrap()[0], Value::Number(Number::Int(1)));
/// ```
pub fn parse(text: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(text);
    let value = parser.parse_value(0)?;
    parser.skip_whitespace();
    if parser.pos < text.len() {
        return Err(ParseError::TrailingCharacters { offset: parser.pos });
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip the four whitespace characters the grammar allows between tokens.
    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Consume `expected` after optional whitespace.
    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd),
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(found) => Err(ParseError::ExpectedCharacter {
                expected,
                found,
                offset: self.pos,
            }),
        }
    }

    /// Dispatch on the first non-whitespace character of a value.
    fn parse_value(&mut self, depth: usize) -> Result<Value, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd),
            Some('{') => self.parse_object(depth + 1),
            Some('[') => self.parse_array(depth + 1),
            Some('"') => self.parse_string().map(Value::String),
            Some('t' | 'f' | 'n') => self.parse_literal(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(found) => Err(ParseError::UnexpectedCharacter {
                found,
                offset: self.pos,
            }),
        }
    }

    fn check_depth(&self, depth: usize) -> Result<(), ParseError> {
        if depth > MAX_DEPTH {
            return Err(ParseError::NestingTooDeep { offset: self.pos });
        }
        Ok(())
    }

    /// `{` [ key `:` value { `,` key `:` value } ] `}`
    ///
    /// Duplicate keys keep their first position and take the last value.
    fn parse_object(&mut self, depth: usize) -> Result<Value, ParseError> {
        self.check_depth(depth)?;
        self.expect('{')?;
        let mut map = Map::new();
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(Value::Object(map));
        }

        loop {
            let key = self.parse_string()?;
            self.expect(':')?;
            let value = self.parse_value(depth)?;
            map.insert(key, value);
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.pos += 1;
                break;
            }
            self.expect(',')?;
        }
        Ok(Value::Object(map))
    }

    /// `[` [ value { `,` value } ] `]`
    fn parse_array(&mut self, depth: usize) -> Result<Value, ParseError> {
        self.check_depth(depth)?;
        self.expect('[')?;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(Value::Array(items));
        }

        loop {
            items.push(self.parse_value(depth)?);
            self.skip_whitespace();
            if self.peek() == Some(']') {
                self.pos += 1;
                break;
            }
            self.expect(',')?;
        }
        Ok(Value::Array(items))
    }

    /// Quoted string, also used for object keys.
    fn parse_string(&mut self) -> Result<String, ParseError> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            let escape_at = self.pos;
            match self.bump() {
                None => return Err(ParseError::UnexpectedEnd),
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    None => return Err(ParseError::InvalidEscape { offset: escape_at }),
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    // `\"`, `\\` and unknown escapes all yield the escaped char
                    Some(other) => out.push(other),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_literal(&mut self) -> Result<Value, ParseError> {
        let rest = &self.src[self.pos..];
        let (value, len) = if rest.starts_with("true") {
            (Value::Bool(true), 4)
        } else if rest.starts_with("false") {
            (Value::Bool(false), 5)
        } else if rest.starts_with("null") {
            (Value::Null, 4)
        } else {
            return Err(ParseError::InvalidLiteral { offset: self.pos });
        };
        self.pos += len;
        Ok(value)
    }

    /// `-`? digits ( `.` digits )?
    ///
    /// Integers outside `i64` and floats outside the finite `f64` range are
    /// [`ParseError::InvalidNumber`].
    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        let mut end = start;
        if bytes.get(end) == Some(&b'-') {
            end += 1;
        }
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        let is_float = bytes.get(end) == Some(&b'.');
        if is_float {
            end += 1;
            while bytes.get(end).is_some_and(u8::is_ascii_digit) {
                end += 1;
            }
        }
        self.pos = end;

        let literal = &self.src[start..end];
        let invalid = || ParseError::InvalidNumber {
            literal: literal.to_string(),
            offset: start,
        };
        let number = if is_float {
            let f = literal.parse::<f64>().map_err(|_| invalid())?;
            // no literal form for infinity, so it could not be written back
            if !f.is_finite() {
                return Err(invalid());
            }
            Number::Float(f)
        } else {
            Number::Int(literal.parse::<i64>().map_err(|_| invalid())?)
        };
        Ok(Value::Number(number))
    }
}

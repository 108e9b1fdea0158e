//! Permissive literal-expression parser
//!
//! Accepts a superset of JSON that models commonly emit when they drift from
//! strict JSON: single-quoted strings, `None`/`True`/`False`, trailing commas,
//! tuples, and adjacent string concatenation. It parses; it does not repair.
//! Anything outside this grammar is an error, including prose around the
//! value.

use serde_json::{Map, Number, Value};
use std::fmt;

/// A parsed literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `None` / `null`
    Null,
    /// `True` / `true` / `False` / `false`
    Bool(bool),
    /// Numeric literal, kept as written
    Number(String),
    /// String literal after escape processing
    Str(String),
    /// `[...]` or `(...)`
    List(Vec<Literal>),
    /// `{key: value, ...}` in source order
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Convert to a JSON value; non-string dict keys use their rendered text
    pub fn to_json(&self) -> Value {
        match self {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(text) => number_value(text),
            Literal::Str(s) => Value::String(s.clone()),
            Literal::List(items) => Value::Array(items.iter().map(Literal::to_json).collect()),
            Literal::Dict(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    let key = match key {
                        Literal::Str(s) => s.clone(),
                        other => other.to_json().to_string(),
                    };
                    map.insert(key, value.to_json());
                }
                Value::Object(map)
            }
        }
    }

    /// Short name of the literal's kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Null => "null",
            Literal::Bool(_) => "boolean",
            Literal::Number(_) => "number",
            Literal::Str(_) => "string",
            Literal::List(_) => "list",
            Literal::Dict(_) => "mapping",
        }
    }
}

fn number_value(text: &str) -> Value {
    let normalized = text.strip_prefix('+').unwrap_or(text);
    if let Ok(i) = normalized.parse::<i64>() {
        return Value::Number(i.into());
    }
    normalized
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(text.to_string()))
}

/// Where and why the permissive parse stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    /// Byte offset into the input
    pub offset: usize,
    /// What was expected or found
    pub message: String,
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for LiteralError {}

/// Parse exactly one literal, optionally surrounded by whitespace
pub fn parse(input: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser {
        src: input,
        pos: 0,
        depth: 0,
    };
    parser.skip_ws();
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos < input.len() {
        return Err(parser.error("unexpected trailing content"));
    }
    Ok(value)
}

/// Containers nested deeper than this are rejected
const MAX_DEPTH: usize = 128;

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn value(&mut self) -> Result<Literal, LiteralError> {
        match self.peek() {
            None => Err(self.error("expected a value, found end of input")),
            Some('{') => self.nested(Self::dict),
            Some('[') => self.nested(|p| p.sequence('[', ']')),
            Some('(') => self.nested(Self::parenthesized),
            Some('\'') | Some('"') => self.strings(),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.word(),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
        }
    }

    fn nested(
        &mut self,
        container: impl FnOnce(&mut Self) -> Result<Literal, LiteralError>,
    ) -> Result<Literal, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let result = container(self);
        self.depth -= 1;
        result
    }

    fn word(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        let word = &self.src[start..self.pos];

        // String prefixes: r'..', u'..', R"..", U".."
        if matches!(word, "r" | "R" | "u" | "U") && matches!(self.peek(), Some('\'') | Some('"')) {
            self.pos = start;
            return self.strings();
        }

        match word {
            "None" | "null" => Ok(Literal::Null),
            "True" | "true" => Ok(Literal::Bool(true)),
            "False" | "false" => Ok(Literal::Bool(false)),
            _ => Err(LiteralError {
                offset: start,
                message: format!("unknown name '{}'", word),
            }),
        }
    }

    fn number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-') | Some('+')) {
            self.bump();
        }
        let int_digits = self.digits();
        let mut frac_digits = 0;
        if self.peek() == Some('.') {
            self.bump();
            frac_digits = self.digits();
        }
        if int_digits == 0 && frac_digits == 0 {
            return Err(LiteralError {
                offset: start,
                message: "malformed number".to_string(),
            });
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            self.bump();
            if matches!(self.peek(), Some('-') | Some('+')) {
                self.bump();
            }
            if self.digits() == 0 {
                return Err(self.error("malformed exponent"));
            }
        }
        Ok(Literal::Number(self.src[start..self.pos].to_string()))
    }

    fn digits(&mut self) -> usize {
        let mut count = 0;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
            count += 1;
        }
        count
    }

    /// One or more adjacent string literals, concatenated
    fn strings(&mut self) -> Result<Literal, LiteralError> {
        let mut out = self.string()?;
        loop {
            let checkpoint = self.pos;
            self.skip_ws();
            if self.at_string_start() {
                out.push_str(&self.string()?);
            } else {
                self.pos = checkpoint;
                return Ok(Literal::Str(out));
            }
        }
    }

    fn at_string_start(&self) -> bool {
        let mut chars = self.rest().chars();
        match chars.next() {
            Some('\'') | Some('"') => true,
            Some('r') | Some('R') | Some('u') | Some('U') => {
                matches!(chars.next(), Some('\'') | Some('"'))
            }
            _ => false,
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let mut raw = false;
        match self.peek() {
            Some('r') | Some('R') => {
                raw = true;
                self.bump();
            }
            Some('u') | Some('U') => {
                self.bump();
            }
            _ => {}
        }

        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected a string")),
        };
        let triple: String = std::iter::repeat(quote).take(3).collect();
        let is_triple = self.src[self.pos - quote.len_utf8()..].starts_with(&triple);
        if is_triple {
            self.pos += 2 * quote.len_utf8();
        }

        let mut out = String::new();
        loop {
            if is_triple && self.rest().starts_with(&triple) {
                self.pos += triple.len();
                return Ok(out);
            }
            let c = match self.bump() {
                Some(c) => c,
                None => return Err(self.error("unterminated string")),
            };
            match c {
                c if c == quote && !is_triple => return Ok(out),
                '\n' if !is_triple => return Err(self.error("newline in string")),
                '\\' if raw => {
                    out.push('\\');
                    if let Some(next) = self.bump() {
                        out.push(next);
                    }
                }
                '\\' => self.escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let c = self
            .bump()
            .ok_or_else(|| self.error("unterminated escape"))?;
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            '0' => out.push('\0'),
            '/' => out.push('/'),
            '\\' | '\'' | '"' => out.push(c),
            '\n' => {}
            'x' => out.push(self.hex_char(2)?),
            'u' => {
                let high = self.hex_code(4)?;
                if (0xD800..0xDC00).contains(&high) && self.rest().starts_with("\\u") {
                    self.pos += 2;
                    let low = self.hex_code(4)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(self.error("invalid surrogate pair"));
                    }
                    let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    out.push(
                        char::from_u32(combined)
                            .ok_or_else(|| self.error("invalid surrogate pair"))?,
                    );
                } else {
                    out.push(
                        char::from_u32(high).ok_or_else(|| self.error("invalid code point"))?,
                    );
                }
            }
            'U' => out.push(self.hex_char(8)?),
            // Unknown escapes are kept verbatim
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_code(&mut self, len: usize) -> Result<u32, LiteralError> {
        let digits = self
            .rest()
            .get(..len)
            .filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| self.error("malformed hex escape"))?;
        let code = u32::from_str_radix(digits, 16).map_err(|_| self.error("malformed hex escape"))?;
        self.pos += len;
        Ok(code)
    }

    fn hex_char(&mut self, len: usize) -> Result<char, LiteralError> {
        let code = self.hex_code(len)?;
        char::from_u32(code).ok_or_else(|| self.error("invalid code point"))
    }

    fn sequence(&mut self, open: char, close: char) -> Result<Literal, LiteralError> {
        self.expect(open)?;
        let (items, _) = self.items(close)?;
        Ok(Literal::List(items))
    }

    /// `(x)` is `x`; `()` and `(x,)` are tuples
    fn parenthesized(&mut self) -> Result<Literal, LiteralError> {
        self.expect('(')?;
        let (mut items, saw_comma) = self.items(')')?;
        if items.len() == 1 && !saw_comma {
            return Ok(items.remove(0));
        }
        Ok(Literal::List(items))
    }

    /// Comma-separated values up to `close`; trailing comma allowed
    fn items(&mut self, close: char) -> Result<(Vec<Literal>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok((items, saw_comma));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    saw_comma = true;
                }
                Some(c) if c == close => {}
                _ => return Err(self.error(format!("expected ',' or '{}'", close))),
            }
        }
    }

    fn dict(&mut self) -> Result<Literal, LiteralError> {
        self.expect('{')?;
        let mut entries = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Literal::Dict(entries));
            }
            let key = self.value()?;
            self.skip_ws();
            self.expect(':')?;
            self.skip_ws();
            let value = self.value()?;
            entries.push((key, value));
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }
}

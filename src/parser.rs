//! Minimal recursive-descent JSON parser for configuration documents.
//!
//! Deliberately small: the full grammar a settings file needs, nothing more.
//! Strict where it matters for generated code (trailing commas, malformed
//! numbers, bad escapes all fail loudly with a character offset) and the
//! number classification preserves the int/long/double split that typing
//! depends on.

use indexmap::IndexMap;

use crate::value::ConfigValue;

/// Characters that may appear inside a numeric token. The token is scanned
/// greedily and validated as a whole afterwards.
const NUMBER_CHARS: &str = "0123456789.-+eE";

// ------------------------------- Errors ----------------------------------- //

/// A syntactically invalid document. Offsets count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("input JSON cannot be empty")]
    EmptyInput,
    #[error("the provided JSON is not a valid object")]
    RootNotObject,
    #[error("the provided JSON is not a valid array")]
    RootNotArray,
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEnd { offset: usize },
    #[error("unexpected characters at the end of the document at offset {offset}")]
    TrailingCharacters { offset: usize },
    #[error("object keys must be strings at offset {offset}")]
    NonStringKey { offset: usize },
    #[error("expected ':' after key \"{key}\" at offset {offset}")]
    MissingColon { key: String, offset: usize },
    #[error("trailing comma found in object at offset {offset}")]
    TrailingCommaInObject { offset: usize },
    #[error("trailing comma found in array at offset {offset}")]
    TrailingCommaInArray { offset: usize },
    #[error("expected ',' or '}}' in object at offset {offset}")]
    ExpectedObjectSeparator { offset: usize },
    #[error("expected ',' or ']' in array at offset {offset}")]
    ExpectedArraySeparator { offset: usize },
    #[error("unterminated JSON object")]
    UnterminatedObject,
    #[error("unterminated JSON array")]
    UnterminatedArray,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid escape sequence '\\{ch}' at offset {offset}")]
    InvalidEscape { ch: char, offset: usize },
    #[error("invalid unicode escape sequence at offset {offset}")]
    InvalidUnicodeEscape { offset: usize },
    #[error("invalid number format \"{literal}\" at offset {offset}")]
    InvalidNumber { literal: String, offset: usize },
    #[error("invalid boolean literal at offset {offset}")]
    InvalidBoolean { offset: usize },
    #[error("invalid null literal at offset {offset}")]
    InvalidNull { offset: usize },
}

impl FormatError {
    /// Best-effort character offset of the failure, when one is known.
    pub fn offset(&self) -> Option<usize> {
        use FormatError::*;
        match self {
            UnexpectedCharacter { offset, .. }
            | UnexpectedEnd { offset }
            | TrailingCharacters { offset }
            | NonStringKey { offset }
            | MissingColon { offset, .. }
            | TrailingCommaInObject { offset }
            | TrailingCommaInArray { offset }
            | ExpectedObjectSeparator { offset }
            | ExpectedArraySeparator { offset }
            | InvalidEscape { offset, .. }
            | InvalidUnicodeEscape { offset }
            | InvalidNumber { offset, .. }
            | InvalidBoolean { offset }
            | InvalidNull { offset } => Some(*offset),
            EmptyInput | RootNotObject | RootNotArray | UnterminatedObject
            | UnterminatedArray | UnterminatedString => None,
        }
    }
}

// ------------------------------ Entry points ------------------------------- //

/// Parse an object-rooted document.
pub fn parse(text: &str) -> Result<ConfigValue, FormatError> {
    let root = parse_root(text)?;
    if !root.is_object() {
        return Err(FormatError::RootNotObject);
    }
    Ok(root)
}

/// Parse an array-rooted fragment.
pub fn parse_array(text: &str) -> Result<ConfigValue, FormatError> {
    let root = parse_root(text)?;
    if !matches!(root, ConfigValue::Array(_)) {
        return Err(FormatError::RootNotArray);
    }
    Ok(root)
}

fn parse_root(text: &str) -> Result<ConfigValue, FormatError> {
    let mut cursor = Cursor::new(text);
    cursor.skip_whitespace();
    if cursor.at_end() {
        return Err(FormatError::EmptyInput);
    }
    let value = cursor.parse_value()?;
    cursor.skip_whitespace();
    if !cursor.at_end() {
        return Err(FormatError::TrailingCharacters { offset: cursor.pos });
    }
    Ok(value)
}

// -------------------------------- Cursor ----------------------------------- //

/// Character-indexed cursor over the input. Character (not byte) indexing
/// keeps reported offsets meaningful for non-ASCII documents.
struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(text: &str) -> Self {
        Self { chars: text.chars().collect(), pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if matches!(c, ' ' | '\t' | '\r' | '\n') {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// True if the input continues with `literal` at the cursor; consumes it.
    fn eat_literal(&mut self, literal: &str) -> bool {
        let end = self.pos + literal.chars().count();
        if end > self.chars.len() {
            return false;
        }
        if self.chars[self.pos..end].iter().copied().eq(literal.chars()) {
            self.pos = end;
            true
        } else {
            false
        }
    }

    // ------------------------------ Values -------------------------------- //

    fn parse_value(&mut self) -> Result<ConfigValue, FormatError> {
        self.skip_whitespace();
        let c = self
            .peek()
            .ok_or(FormatError::UnexpectedEnd { offset: self.pos })?;
        match c {
            '{' => self.parse_object(),
            '[' => self.parse_list(),
            '"' => self.parse_string().map(ConfigValue::String),
            't' | 'f' => self.parse_boolean(),
            'n' => self.parse_null(),
            c if c.is_ascii_digit() || c == '-' => self.parse_number(),
            c => Err(FormatError::UnexpectedCharacter { ch: c, offset: self.pos }),
        }
    }

    fn parse_object(&mut self) -> Result<ConfigValue, FormatError> {
        let mut map = IndexMap::new();
        self.pos += 1; // consume '{'

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(FormatError::UnterminatedObject),
                Some('}') => {
                    self.pos += 1;
                    return Ok(ConfigValue::Object(map));
                }
                Some('"') => {}
                Some(_) => return Err(FormatError::NonStringKey { offset: self.pos }),
            }

            let key = self.parse_string()?;
            self.skip_whitespace();
            if self.peek() != Some(':') {
                return Err(FormatError::MissingColon { key, offset: self.pos });
            }
            self.pos += 1;

            let value = self.parse_value()?;
            // Duplicate keys: last write wins, first-seen position kept.
            map.insert(key, value);
            self.skip_whitespace();

            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    match self.peek() {
                        // A closing brace right after a comma is a trailing comma.
                        Some('}') => {
                            return Err(FormatError::TrailingCommaInObject { offset: self.pos });
                        }
                        None => return Err(FormatError::UnterminatedObject),
                        Some(_) => {}
                    }
                }
                Some('}') => {
                    self.pos += 1;
                    return Ok(ConfigValue::Object(map));
                }
                None => return Err(FormatError::UnterminatedObject),
                Some(_) => {
                    return Err(FormatError::ExpectedObjectSeparator { offset: self.pos });
                }
            }
        }
    }

    fn parse_list(&mut self) -> Result<ConfigValue, FormatError> {
        let mut items = Vec::new();
        self.pos += 1; // consume '['

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(FormatError::UnterminatedArray),
                Some(']') => {
                    self.pos += 1;
                    return Ok(ConfigValue::Array(items));
                }
                Some(_) => {}
            }

            items.push(self.parse_value()?);
            self.skip_whitespace();

            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    match self.peek() {
                        Some(']') => {
                            return Err(FormatError::TrailingCommaInArray { offset: self.pos });
                        }
                        None => return Err(FormatError::UnterminatedArray),
                        Some(_) => {}
                    }
                }
                Some(']') => {
                    self.pos += 1;
                    return Ok(ConfigValue::Array(items));
                }
                None => return Err(FormatError::UnterminatedArray),
                Some(_) => {
                    return Err(FormatError::ExpectedArraySeparator { offset: self.pos });
                }
            }
        }
    }

    fn parse_string(&mut self) -> Result<String, FormatError> {
        let mut out = String::new();
        self.pos += 1; // consume '"'

        loop {
            let c = self.bump().ok_or(FormatError::UnterminatedString)?;
            match c {
                '"' => return Ok(out),
                '\\' => {
                    let escape_offset = self.pos - 1;
                    let next = self.bump().ok_or(FormatError::UnterminatedString)?;
                    match next {
                        '"' => out.push('"'),
                        '\\' => out.push('\\'),
                        '/' => out.push('/'),
                        'b' => out.push('\u{0008}'),
                        'f' => out.push('\u{000C}'),
                        'n' => out.push('\n'),
                        'r' => out.push('\r'),
                        't' => out.push('\t'),
                        'u' => out.push(self.parse_unicode_escape(escape_offset)?),
                        other => {
                            return Err(FormatError::InvalidEscape {
                                ch: other,
                                offset: escape_offset,
                            });
                        }
                    }
                }
                other => out.push(other),
            }
        }
    }

    /// Decode `\uXXXX`, pairing a high surrogate with a following low
    /// surrogate escape. The cursor sits right after the `u`.
    fn parse_unicode_escape(&mut self, escape_offset: usize) -> Result<char, FormatError> {
        let unit = self.parse_hex4(escape_offset)?;
        match unit {
            0xD800..=0xDBFF => {
                // High surrogate: must be followed by `\uXXXX` with a low one.
                if !self.eat_literal("\\u") {
                    return Err(FormatError::InvalidUnicodeEscape { offset: escape_offset });
                }
                let low = self.parse_hex4(escape_offset)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(FormatError::InvalidUnicodeEscape { offset: escape_offset });
                }
                let scalar =
                    0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                char::from_u32(scalar)
                    .ok_or(FormatError::InvalidUnicodeEscape { offset: escape_offset })
            }
            0xDC00..=0xDFFF => Err(FormatError::InvalidUnicodeEscape { offset: escape_offset }),
            unit => char::from_u32(u32::from(unit))
                .ok_or(FormatError::InvalidUnicodeEscape { offset: escape_offset }),
        }
    }

    fn parse_hex4(&mut self, escape_offset: usize) -> Result<u16, FormatError> {
        if self.pos + 4 > self.chars.len() {
            return Err(FormatError::InvalidUnicodeEscape { offset: escape_offset });
        }
        let digits = &self.chars[self.pos..self.pos + 4];
        // Exactly four hex digits; `from_str_radix` alone would also take a sign.
        if !digits.iter().all(char::is_ascii_hexdigit) {
            return Err(FormatError::InvalidUnicodeEscape { offset: escape_offset });
        }
        let hex: String = digits.iter().collect();
        let unit = u16::from_str_radix(&hex, 16)
            .map_err(|_| FormatError::InvalidUnicodeEscape { offset: escape_offset })?;
        self.pos += 4;
        Ok(unit)
    }

    fn parse_number(&mut self) -> Result<ConfigValue, FormatError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if NUMBER_CHARS.contains(c) {
                self.pos += 1;
            } else {
                break;
            }
        }
        let literal: String = self.chars[start..self.pos].iter().collect();

        if literal.contains(['.', 'e', 'E']) {
            if let Ok(f) = literal.parse::<f64>() {
                return Ok(ConfigValue::Float(f));
            }
        } else {
            if let Ok(i) = literal.parse::<i32>() {
                return Ok(ConfigValue::Integer(i));
            }
            if let Ok(l) = literal.parse::<i64>() {
                return Ok(ConfigValue::LongInteger(l));
            }
        }
        Err(FormatError::InvalidNumber { literal, offset: start })
    }

    fn parse_boolean(&mut self) -> Result<ConfigValue, FormatError> {
        let offset = self.pos;
        if self.eat_literal("true") {
            return Ok(ConfigValue::Boolean(true));
        }
        if self.eat_literal("false") {
            return Ok(ConfigValue::Boolean(false));
        }
        Err(FormatError::InvalidBoolean { offset })
    }

    fn parse_null(&mut self) -> Result<ConfigValue, FormatError> {
        let offset = self.pos;
        if self.eat_literal("null") {
            return Ok(ConfigValue::Null);
        }
        Err(FormatError::InvalidNull { offset })
    }
}

// -------------------------------- Tests ------------------------------------ //

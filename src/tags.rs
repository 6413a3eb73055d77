//! Field metadata tags
//!
//! Field metadata is written as a space separated list of `key:"value"` pairs:
//!
//! ```text
//! json:"name,omitempty" required:"true" minLength:"1" description:"Display \"name\""
//! ```
//!
//! Values are double-quoted and support `\"`, `\\`, `\n` and `\t` escapes.
//! When a key repeats, the first occurrence wins.

use std::fmt;

/// Syntax error in a tag string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSyntaxError {
    pub offset: usize,
    pub reason: &'static str,
}

impl fmt::Display for TagSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.reason, self.offset)
    }
}

impl std::error::Error for TagSyntaxError {}

/// Parsed field metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    entries: Vec<(String, String)>,
}

impl Tags {
    /// Parse a tag string
    pub fn parse(raw: &str) -> Result<Self, TagSyntaxError> {
        let bytes = raw.as_bytes();
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut i = 0;

        loop {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }

            let key_start = i;
            while i < bytes.len()
                && bytes[i] > b' '
                && bytes[i] != b':'
                && bytes[i] != b'"'
                && bytes[i] != 0x7f
            {
                i += 1;
            }
            if i == key_start {
                return Err(TagSyntaxError { offset: i, reason: "expected tag key" });
            }
            let key = &raw[key_start..i];

            if i >= bytes.len() || bytes[i] != b':' {
                return Err(TagSyntaxError { offset: i, reason: "expected ':' after tag key" });
            }
            i += 1;
            if i >= bytes.len() || bytes[i] != b'"' {
                return Err(TagSyntaxError { offset: i, reason: "expected quoted tag value" });
            }
            i += 1;

            let mut value = String::new();
            let mut closed = false;
            let mut chars = raw[i..].char_indices();
            while let Some((offset, c)) = chars.next() {
                match c {
                    '"' => {
                        i += offset + 1;
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some((_, 'n')) => value.push('\n'),
                        Some((_, 't')) => value.push('\t'),
                        Some((_, other)) => value.push(other),
                        None => break,
                    },
                    other => value.push(other),
                }
            }
            if !closed {
                return Err(TagSyntaxError { offset: bytes.len(), reason: "unterminated tag value" });
            }

            if !entries.iter().any(|(k, _)| k == key) {
                entries.push((key.to_string(), value));
            }
        }

        Ok(Self { entries })
    }

    /// Value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A property-name tag value such as `name,omitempty`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTag<'a> {
    raw: &'a str,
    /// Name part, possibly empty
    pub name: &'a str,
    /// Options after the first comma
    pub options: Vec<&'a str>,
}

impl<'a> NameTag<'a> {
    pub fn parse(value: &'a str) -> Self {
        let mut parts = value.split(',');
        let name = parts.next().unwrap_or_default().trim();
        let options = parts.map(str::trim).filter(|o| !o.is_empty()).collect();
        Self { raw: value, name, options }
    }

    /// `-` means the field is never exposed
    pub fn is_skipped(&self) -> bool {
        self.raw.trim() == "-"
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| *o == option)
    }

    pub fn omit_empty(&self) -> bool {
        self.has_option("omitempty")
    }
}

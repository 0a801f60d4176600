//! Character set handling for `text` fields.
//!
//! The grammar matches bytes as ISO-8859-1 characters. Field values are then
//! decoded with the session charset: UTF-8 by default, ISO-8859-1 when the
//! session carries `a=charset:ISO-8859-1`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Charset {
    #[default]
    Utf8,
    Iso8859_1,
}

impl Charset {
    /// Charset named by an `a=charset:` value. Names are case-insensitive.
    pub fn from_name(name: &str) -> Option<Charset> {
        if name.eq_ignore_ascii_case("ISO-8859-1") {
            Some(Charset::Iso8859_1)
        } else if name.eq_ignore_ascii_case("UTF-8") {
            Some(Charset::Utf8)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Iso8859_1 => "ISO-8859-1",
        }
    }

    /// Decode a matched slice of the Latin-1 view. `None` if the underlying
    /// bytes are not valid in this charset.
    pub(crate) fn decode(self, latin1: &str) -> Option<String> {
        if latin1.is_ascii() {
            return Some(latin1.to_string());
        }
        match self {
            Charset::Iso8859_1 => Some(latin1.to_string()),
            Charset::Utf8 => String::from_utf8(latin1_bytes(latin1)).ok(),
        }
    }

    /// Encode text for the wire. Characters outside Latin-1 become `?`.
    pub(crate) fn encode(self, s: &str) -> Vec<u8> {
        match self {
            Charset::Utf8 => s.as_bytes().to_vec(),
            Charset::Iso8859_1 => s
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One char per input byte.
pub(crate) fn latin1_view(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Inverse of [`latin1_view`]; the view only holds chars up to U+00FF.
pub(crate) fn latin1_bytes(view: &str) -> Vec<u8> {
    view.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Translate a byte index in the Latin-1 view back to an input byte offset.
pub(crate) fn input_offset(view: &str, idx: usize) -> usize {
    let idx = idx.min(view.len());
    if view.is_ascii() {
        idx
    } else {
        view[..idx].chars().count()
    }
}

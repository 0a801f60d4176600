//! Typed parse outcomes.

use std::fmt;

/// SDP line types, keyed by their field letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Version,
    Origin,
    SessionName,
    Information,
    Uri,
    Email,
    Phone,
    Connection,
    Bandwidth,
    Time,
    Repeat,
    Zone,
    Key,
    Attribute,
    Media,
}

impl FieldType {
    pub const ALL: [FieldType; 15] = [
        FieldType::Version,
        FieldType::Origin,
        FieldType::SessionName,
        FieldType::Information,
        FieldType::Uri,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Connection,
        FieldType::Bandwidth,
        FieldType::Time,
        FieldType::Repeat,
        FieldType::Zone,
        FieldType::Key,
        FieldType::Attribute,
        FieldType::Media,
    ];

    pub fn letter(self) -> char {
        match self {
            FieldType::Version => 'v',
            FieldType::Origin => 'o',
            FieldType::SessionName => 's',
            FieldType::Information => 'i',
            FieldType::Uri => 'u',
            FieldType::Email => 'e',
            FieldType::Phone => 'p',
            FieldType::Connection => 'c',
            FieldType::Bandwidth => 'b',
            FieldType::Time => 't',
            FieldType::Repeat => 'r',
            FieldType::Zone => 'z',
            FieldType::Key => 'k',
            FieldType::Attribute => 'a',
            FieldType::Media => 'm',
        }
    }

    pub fn from_letter(c: char) -> Option<FieldType> {
        FieldType::ALL.into_iter().find(|f| f.letter() == c)
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldType::Version => "version",
            FieldType::Origin => "origin",
            FieldType::SessionName => "session name",
            FieldType::Information => "information",
            FieldType::Uri => "uri",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Connection => "connection",
            FieldType::Bandwidth => "bandwidth",
            FieldType::Time => "time",
            FieldType::Repeat => "repeat",
            FieldType::Zone => "time zone",
            FieldType::Key => "encryption key",
            FieldType::Attribute => "attribute",
            FieldType::Media => "media",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}=)", self.name(), self.letter())
    }
}

/// How far the session grammar got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Entire input consumed.
    Full,
    /// A strict prefix matched.
    Partial,
    /// No valid prefix.
    None,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchKind::Full => "full",
            MatchKind::Partial => "partial",
            MatchKind::None => "no",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ErrorKind {
    #[error("malformed {0} line")]
    MalformedField(FieldType),
    #[error("{0} line out of order")]
    OutOfOrderField(FieldType),
    #[error("missing mandatory {0} line")]
    MissingMandatoryField(FieldType),
    /// A line whose letter is not an SDP field type, where the grammar
    /// required a field.
    #[error("unknown field letter {0:?}")]
    UnknownField(char),
    /// A line that does not have the `<letter>=` shape at all.
    #[error("unrecognized line")]
    UnrecognizedLine,
    #[error("trailing unparsed data")]
    TrailingUnparsedData,
    #[error("{0} value not valid in the session charset")]
    EncodingError(FieldType),
}

/// A failed parse: the outcome, its diagnosis, and where it happened.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte {offset} ({matched} match) near {context:?}")]
pub struct ParseError {
    pub matched: MatchKind,
    pub kind: ErrorKind,
    /// Byte offset into the input.
    pub offset: usize,
    /// Input around `offset`, lossily decoded.
    pub context: String,
}

impl ParseError {
    pub fn is_partial(&self) -> bool {
        self.matched == MatchKind::Partial
    }

    /// Field type involved, when the diagnosis names one.
    pub fn field(&self) -> Option<FieldType> {
        match self.kind {
            ErrorKind::MalformedField(f)
            | ErrorKind::OutOfOrderField(f)
            | ErrorKind::MissingMandatoryField(f)
            | ErrorKind::EncodingError(f) => Some(f),
            ErrorKind::UnknownField(_)
            | ErrorKind::UnrecognizedLine
            | ErrorKind::TrailingUnparsedData => None,
        }
    }
}

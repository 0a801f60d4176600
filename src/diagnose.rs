//! Diagnosis of partial and failed matches.
//!
//! The grammar only reports where matching stopped. The line found at that
//! offset is re-examined on its own to name the problem.

use crate::error::{ErrorKind, FieldType, MatchKind};
use crate::parser::{field_rule, SdpGrammar};
use pest::Parser;

/// Classify a stop at `pos` (an index into the Latin-1 view).
pub(crate) fn classify(view: &str, pos: usize, matched: MatchKind) -> ErrorKind {
    let pos = pos.min(view.len());
    let line_start = view[..pos].rfind('\n').map_or(0, |i| i + 1);
    let line = &view[line_start..];
    let letter = field_letter(line);
    let field = letter.and_then(FieldType::from_letter);

    if let Some(ft) = field {
        if SdpGrammar::parse(field_rule(ft), line).is_err() {
            return ErrorKind::MalformedField(ft);
        }
    }
    if matched == MatchKind::None {
        if let Some(missing) = missing_mandatory(view) {
            return ErrorKind::MissingMandatoryField(missing);
        }
    }
    match (field, letter) {
        (Some(ft), _) => ErrorKind::OutOfOrderField(ft),
        _ if matched == MatchKind::Partial => ErrorKind::TrailingUnparsedData,
        (None, Some(c)) => ErrorKind::UnknownField(c),
        (None, None) => ErrorKind::UnrecognizedLine,
    }
}

/// `x` for a line shaped `x=...`.
fn field_letter(line: &str) -> Option<char> {
    let mut chars = line.chars();
    let letter = chars.next()?;
    (chars.next() == Some('=')).then_some(letter)
}

/// First of v=, o=, s=, t= that the message lacks. `t=` only counts before
/// the first media block.
fn missing_mandatory(view: &str) -> Option<FieldType> {
    let mut seen = [false; 4];
    for line in view.split('\n') {
        match field_letter(line) {
            Some('v') => seen[0] = true,
            Some('o') => seen[1] = true,
            Some('s') => seen[2] = true,
            Some('t') => seen[3] = true,
            Some('m') => break,
            _ => {}
        }
    }
    let order = [
        FieldType::Version,
        FieldType::Origin,
        FieldType::SessionName,
        FieldType::Time,
    ];
    order
        .into_iter()
        .zip(seen)
        .find_map(|(ft, present)| (!present).then_some(ft))
}

/// Up to `radius` bytes either side of `offset`.
pub(crate) fn context_snippet(input: &[u8], offset: usize, radius: usize) -> String {
    let offset = offset.min(input.len());
    let start = offset.saturating_sub(radius);
    let end = offset.saturating_add(radius).min(input.len());
    String::from_utf8_lossy(&input[start..end]).into_owned()
}

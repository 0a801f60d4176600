//! Parser driver: runs the session grammar over one SDP message and builds the
//! session model on a full match.

use crate::address::Address;
use crate::charset::{input_offset, latin1_view, Charset};
use crate::diagnose::{classify, context_snippet};
use crate::error::{ErrorKind, FieldType, MatchKind, ParseError};
use crate::session::*;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;
use std::num::ParseIntError;
use std::str::FromStr;
use tracing::{debug, trace};

/// The compiled RFC 4566 grammar. Stateless; shared by every parse.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct SdpGrammar;

/// Driver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Bytes of input kept on each side of an error offset.
    pub context_radius: usize,
    /// Charset for text values when the session declares none.
    pub default_charset: Charset,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            context_radius: 16,
            default_charset: Charset::Utf8,
        }
    }
}

/// Parse one complete SDP message.
pub fn parse(input: &[u8]) -> Result<SessionDescription, ParseError> {
    parse_with(input, &ParseOptions::default())
}

pub fn parse_str(input: &str) -> Result<SessionDescription, ParseError> {
    parse(input.as_bytes())
}

pub fn parse_with(
    input: &[u8],
    options: &ParseOptions,
) -> Result<SessionDescription, ParseError> {
    let view = latin1_view(input);
    let fail = |matched: MatchKind, kind: ErrorKind, idx: usize| {
        let offset = input_offset(&view, idx);
        debug!(%matched, %kind, offset, "sdp parse failed");
        ParseError {
            matched,
            kind,
            offset,
            context: context_snippet(input, offset, options.context_radius),
        }
    };

    let pair = match SdpGrammar::parse(Rule::session_description, &view) {
        Ok(mut pairs) => match pairs.next() {
            Some(p) => p,
            None => return Err(fail(MatchKind::None, ErrorKind::UnrecognizedLine, 0)),
        },
        Err(e) => {
            let pos = error_pos(&e);
            let kind = classify(&view, pos, MatchKind::None);
            return Err(fail(MatchKind::None, kind, pos));
        }
    };

    let end = pair.as_span().end();
    if end < view.len() {
        let kind = classify(&view, end, MatchKind::Partial);
        return Err(fail(MatchKind::Partial, kind, end));
    }

    let charset = session_charset(&pair).unwrap_or(options.default_charset);
    trace!(%charset, "session charset");
    let session = build_session(pair, charset)
        .map_err(|d| fail(MatchKind::Full, d.kind, d.pos))?;
    debug!(
        media = session.media.len(),
        times = session.times.len(),
        "sdp parsed"
    );
    Ok(session)
}

/// Length of the longest prefix of `input` that `rule` matches, or `None`.
pub fn matches_rule(rule: Rule, input: &[u8]) -> Option<usize> {
    let view = latin1_view(input);
    let pair = SdpGrammar::parse(rule, &view).ok()?.next()?;
    Some(input_offset(&view, pair.as_span().end()))
}

/// True when `rule` consumes all of `input`.
pub fn accepts(rule: Rule, input: &[u8]) -> bool {
    matches_rule(rule, input) == Some(input.len())
}

/// Grammar rule for one line type.
pub fn field_rule(field: FieldType) -> Rule {
    match field {
        FieldType::Version => Rule::version_field,
        FieldType::Origin => Rule::origin_field,
        FieldType::SessionName => Rule::session_name_field,
        FieldType::Information => Rule::information_field,
        FieldType::Uri => Rule::uri_field,
        FieldType::Email => Rule::email_field,
        FieldType::Phone => Rule::phone_field,
        FieldType::Connection => Rule::connection_field,
        FieldType::Bandwidth => Rule::bandwidth_field,
        FieldType::Time => Rule::time_field,
        FieldType::Repeat => Rule::repeat_field,
        FieldType::Zone => Rule::zone_field,
        FieldType::Key => Rule::key_field,
        FieldType::Attribute => Rule::attribute_field,
        FieldType::Media => Rule::media_field,
    }
}

/// Check a single line (with or without its terminator) against its field
/// rule. The whole of `line` must match.
pub fn parse_field(field: FieldType, line: &[u8]) -> Result<(), ParseError> {
    let view = latin1_view(line);
    let (matched, idx) = match SdpGrammar::parse(field_rule(field), &view) {
        Ok(mut pairs) => match pairs.next() {
            Some(p) if p.as_span().end() == view.len() => return Ok(()),
            Some(p) => (MatchKind::Partial, p.as_span().end()),
            None => (MatchKind::None, 0),
        },
        Err(e) => (MatchKind::None, error_pos(&e)),
    };
    let offset = input_offset(&view, idx);
    Err(ParseError {
        matched,
        kind: ErrorKind::MalformedField(field),
        offset,
        context: context_snippet(line, offset, ParseOptions::default().context_radius),
    })
}

fn error_pos(e: &pest::error::Error<Rule>) -> usize {
    match e.location {
        InputLocation::Pos(p) => p,
        InputLocation::Span((start, _)) => start,
    }
}

/// Charset named by the first session-level `a=charset` attribute. Agrees
/// with [`SessionDescription::charset`] on the built model.
fn session_charset(session: &Pair<Rule>) -> Option<Charset> {
    let attribute = session
        .clone()
        .into_inner()
        .filter(|p| p.as_rule() == Rule::attribute_field)
        .filter_map(|field| field.into_inner().next())
        .find(|attr| {
            attr.clone().into_inner().next().map(|name| name.as_str()) == Some("charset")
        })?;
    Charset::from_name(attribute.into_inner().nth(1)?.as_str())
}

/// A value that matched the grammar but cannot be represented.
struct Defect {
    kind: ErrorKind,
    pos: usize,
}

type Built<T> = Result<T, Defect>;

fn malformed(field: FieldType, pair: &Pair<Rule>) -> Defect {
    Defect {
        kind: ErrorKind::MalformedField(field),
        pos: pair.as_span().start(),
    }
}

fn first_inner(pair: Pair<'_, Rule>, field: FieldType) -> Built<Pair<'_, Rule>> {
    let pos = pair.as_span().start();
    pair.into_inner().next().ok_or(Defect {
        kind: ErrorKind::MalformedField(field),
        pos,
    })
}

fn number<T: FromStr>(pair: &Pair<Rule>, field: FieldType) -> Built<T> {
    pair.as_str().parse().map_err(|_| malformed(field, pair))
}

fn decoded(pair: &Pair<Rule>, field: FieldType, charset: Charset) -> Built<String> {
    charset.decode(pair.as_str()).ok_or(Defect {
        kind: ErrorKind::EncodingError(field),
        pos: pair.as_span().start(),
    })
}

fn count_suffix(s: Option<&str>) -> Result<Option<u32>, ParseIntError> {
    s.map(str::parse).transpose()
}

fn build_session(pair: Pair<Rule>, charset: Charset) -> Built<SessionDescription> {
    let start = pair.as_span().start();
    let missing = |field| Defect {
        kind: ErrorKind::MissingMandatoryField(field),
        pos: start,
    };
    let mut version = None;
    let mut origin = None;
    let mut session_name = None;
    let mut information = None;
    let mut uri = None;
    let mut emails = Vec::new();
    let mut phones = Vec::new();
    let mut connection = None;
    let mut bandwidths = Vec::new();
    let mut times = Vec::new();
    let mut zone_adjustments = Vec::new();
    let mut key = None;
    let mut attributes = Vec::new();
    let mut media = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::version_field => {
                let v = first_inner(inner, FieldType::Version)?;
                version = Some(number(&v, FieldType::Version)?);
            }
            Rule::origin_field => origin = Some(build_origin(inner, charset)?),
            Rule::session_name_field => {
                session_name = Some(build_text(inner, FieldType::SessionName, charset)?)
            }
            Rule::information_field => {
                information = Some(build_text(inner, FieldType::Information, charset)?)
            }
            Rule::uri_field => uri = Some(first_inner(inner, FieldType::Uri)?.as_str().to_string()),
            Rule::email_field => emails.push(build_text(inner, FieldType::Email, charset)?),
            Rule::phone_field => phones.push(build_text(inner, FieldType::Phone, charset)?),
            Rule::connection_field => connection = Some(build_connection(inner, charset)?),
            Rule::bandwidth_field => bandwidths.push(build_bandwidth(inner)?),
            Rule::time_description => times.push(build_time_description(inner)?),
            Rule::zone_field => zone_adjustments = build_zone(inner)?,
            Rule::key_field => key = Some(build_key(inner, charset)?),
            Rule::attribute_field => attributes.push(build_attribute(inner, charset)?),
            Rule::media_description => media.push(build_media(inner, charset)?),
            _ => {}
        }
    }

    if times.is_empty() {
        return Err(missing(FieldType::Time));
    }
    Ok(SessionDescription {
        version: version.ok_or_else(|| missing(FieldType::Version))?,
        origin: origin.ok_or_else(|| missing(FieldType::Origin))?,
        session_name: session_name.ok_or_else(|| missing(FieldType::SessionName))?,
        information,
        uri,
        emails,
        phones,
        connection,
        bandwidths,
        times,
        zone_adjustments,
        key,
        attributes,
        media,
    })
}

/// Fields whose single value is free text: s=, i=, e=, p=.
fn build_text(pair: Pair<Rule>, field: FieldType, charset: Charset) -> Built<String> {
    let value = first_inner(pair, field)?;
    decoded(&value, field, charset)
}

fn build_origin(pair: Pair<Rule>, charset: Charset) -> Built<Origin> {
    const F: FieldType = FieldType::Origin;
    let pos = pair.as_span().start();
    let mut parts = pair.into_inner();
    let mut next = || parts.next().ok_or(Defect {
        kind: ErrorKind::MalformedField(F),
        pos,
    });
    let username = decoded(&next()?, F, charset)?;
    let session_id = next()?.as_str().to_string();
    let session_version = next()?.as_str().to_string();
    let net_type = next()?.as_str().to_string();
    let addr_type = next()?.as_str().to_string();
    let address = build_address(next()?, F, charset)?;
    Ok(Origin {
        username,
        session_id,
        session_version,
        net_type,
        addr_type,
        address,
    })
}

fn build_connection(pair: Pair<Rule>, charset: Charset) -> Built<Connection> {
    const F: FieldType = FieldType::Connection;
    let pos = pair.as_span().start();
    let mut parts = pair.into_inner();
    let mut next = || parts.next().ok_or(Defect {
        kind: ErrorKind::MalformedField(F),
        pos,
    });
    let net_type = next()?.as_str().to_string();
    let addr_type = next()?.as_str().to_string();
    let address = build_address(next()?, F, charset)?;
    Ok(Connection {
        net_type,
        addr_type,
        address,
    })
}

fn build_address(pair: Pair<Rule>, field: FieldType, charset: Charset) -> Built<Address> {
    let mut leaf = pair;
    while matches!(
        leaf.as_rule(),
        Rule::connection_address | Rule::unicast_address | Rule::multicast_address
    ) {
        leaf = first_inner(leaf, field)?;
    }
    let text = leaf.as_str();
    match leaf.as_rule() {
        Rule::IP4_address => text
            .parse()
            .map(Address::Ip4)
            .map_err(|_| malformed(field, &leaf)),
        Rule::IP4_multicast => {
            let mut parts = text.splitn(3, '/');
            let addr = parts.next().and_then(|a| a.parse().ok());
            let ttl = parts.next().and_then(|t| t.parse().ok());
            match (addr, ttl, count_suffix(parts.next())) {
                (Some(addr), Some(ttl), Ok(count)) => {
                    Ok(Address::Ip4Multicast { addr, ttl, count })
                }
                _ => Err(malformed(field, &leaf)),
            }
        }
        Rule::IP6_multicast => {
            let (addr, count) = match text.split_once('/') {
                Some((addr, count)) => (addr, Some(count)),
                None => (text, None),
            };
            let count = count_suffix(count).map_err(|_| malformed(field, &leaf))?;
            Ok(Address::Ip6Multicast {
                addr: addr.to_string(),
                count,
            })
        }
        Rule::IP6_address => Ok(Address::Ip6(text.to_string())),
        Rule::FQDN => Ok(Address::Fqdn(text.to_string())),
        Rule::extn_addr => Ok(Address::Extension(decoded(&leaf, field, charset)?)),
        _ => Err(malformed(field, &leaf)),
    }
}

fn build_bandwidth(pair: Pair<Rule>) -> Built<Bandwidth> {
    const F: FieldType = FieldType::Bandwidth;
    let mut bw_type = String::new();
    let mut bandwidth = 0;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::bwtype => bw_type = inner.as_str().to_string(),
            Rule::bandwidth => bandwidth = number(&inner, F)?,
            _ => {}
        }
    }
    Ok(Bandwidth { bw_type, bandwidth })
}

fn build_time_description(pair: Pair<Rule>) -> Built<TimeDescription> {
    let mut td = TimeDescription::unbounded();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::time_field => {
                for bound in inner.into_inner() {
                    match bound.as_rule() {
                        Rule::start_time => td.start = number(&bound, FieldType::Time)?,
                        Rule::stop_time => td.stop = number(&bound, FieldType::Time)?,
                        _ => {}
                    }
                }
            }
            Rule::repeat_field => td.repeats.push(build_repeat(inner)?),
            _ => {}
        }
    }
    Ok(td)
}

fn build_repeat(pair: Pair<Rule>) -> Built<RepeatTime> {
    const F: FieldType = FieldType::Repeat;
    let pos = pair.as_span().start();
    let mut values = pair
        .into_inner()
        .map(|p| number::<TypedTime>(&p, F))
        .collect::<Built<Vec<_>>>()?
        .into_iter();
    match (values.next(), values.next()) {
        (Some(interval), Some(duration)) => Ok(RepeatTime {
            interval,
            duration,
            offsets: values.collect(),
        }),
        _ => Err(Defect {
            kind: ErrorKind::MalformedField(F),
            pos,
        }),
    }
}

fn build_zone(pair: Pair<Rule>) -> Built<Vec<ZoneAdjustment>> {
    const F: FieldType = FieldType::Zone;
    let mut out = Vec::new();
    for adjustment in pair.into_inner() {
        let pos = adjustment.as_span().start();
        let mut parts = adjustment.into_inner();
        let (time, offset) = match (parts.next(), parts.next()) {
            (Some(t), Some(o)) => (t, o),
            _ => {
                return Err(Defect {
                    kind: ErrorKind::MalformedField(F),
                    pos,
                })
            }
        };
        let raw = offset.as_str();
        let (negative, magnitude) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        out.push(ZoneAdjustment {
            time: number(&time, F)?,
            offset: magnitude.parse().map_err(|_| malformed(F, &offset))?,
            negative,
        });
    }
    Ok(out)
}

fn build_key(pair: Pair<Rule>, charset: Charset) -> Built<EncryptionKey> {
    const F: FieldType = FieldType::Key;
    let method = first_inner(first_inner(pair, F)?, F)?;
    match method.as_rule() {
        Rule::key_prompt => Ok(EncryptionKey::Prompt),
        Rule::key_clear => {
            let value = first_inner(method, F)?;
            Ok(EncryptionKey::Clear(decoded(&value, F, charset)?))
        }
        Rule::key_base64 => Ok(EncryptionKey::Base64(
            first_inner(method, F)?.as_str().to_string(),
        )),
        Rule::key_uri => Ok(EncryptionKey::Uri(
            first_inner(method, F)?.as_str().to_string(),
        )),
        _ => Err(malformed(F, &method)),
    }
}

fn build_attribute(pair: Pair<Rule>, charset: Charset) -> Built<Attribute> {
    const F: FieldType = FieldType::Attribute;
    let attribute = first_inner(pair, F)?;
    let pos = attribute.as_span().start();
    let mut parts = attribute.into_inner();
    let name = match parts.next() {
        Some(n) => decoded(&n, F, charset)?,
        None => {
            return Err(Defect {
                kind: ErrorKind::MalformedField(F),
                pos,
            })
        }
    };
    let value = match parts.next() {
        Some(v) => Some(decoded(&v, F, charset)?),
        None => None,
    };
    Ok(Attribute { name, value })
}

fn build_media(pair: Pair<Rule>, charset: Charset) -> Built<MediaDescription> {
    let mut desc: Option<MediaDescription> = None;
    let pos = pair.as_span().start();
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::media_field {
            desc = Some(build_media_field(inner)?);
            continue;
        }
        let Some(m) = desc.as_mut() else {
            return Err(malformed(FieldType::Media, &inner));
        };
        match inner.as_rule() {
            Rule::information_field => {
                m.information = Some(build_text(inner, FieldType::Information, charset)?)
            }
            Rule::connection_field => m.connections.push(build_connection(inner, charset)?),
            Rule::bandwidth_field => m.bandwidths.push(build_bandwidth(inner)?),
            Rule::key_field => m.key = Some(build_key(inner, charset)?),
            Rule::attribute_field => m.attributes.push(build_attribute(inner, charset)?),
            _ => {}
        }
    }
    desc.ok_or(Defect {
        kind: ErrorKind::MalformedField(FieldType::Media),
        pos,
    })
}

fn build_media_field(pair: Pair<Rule>) -> Built<MediaDescription> {
    const F: FieldType = FieldType::Media;
    let mut m = MediaDescription::new(String::new(), 0, String::new(), Vec::new());
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::media => m.media = inner.as_str().to_string(),
            Rule::port => m.port = number(&inner, F)?,
            Rule::integer => m.port_count = Some(number(&inner, F)?),
            Rule::proto => m.protocol = inner.as_str().to_string(),
            Rule::media_format => m.formats.push(inner.as_str().to_string()),
            _ => {}
        }
    }
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn lexical_rules() {
        assert!(accepts(Rule::token, b"RTP"));
        assert!(!accepts(Rule::token, b"RTP/AVP"));
        assert_eq!(matches_rule(Rule::integer, b"0"), None);
        assert_eq!(matches_rule(Rule::integer, b"120x"), Some(3));
        assert!(accepts(Rule::byte_string, b"caf\xe9 \x80"));
        assert!(!accepts(Rule::byte_string, b"a\x00b"));
    }

    #[test]
    fn address_leaves() {
        let c = parse_field(FieldType::Connection, b"c=IN IP4 224.2.36.42/127/2\r\n");
        assert_eq!(c, Ok(()));
        let v = latin1_view(b"c=IN IP4 224.2.36.42/127/2\r\n");
        let pair = SdpGrammar::parse(Rule::connection_field, &v)
            .unwrap()
            .next()
            .unwrap();
        let conn = build_connection(pair, Charset::Utf8).ok().unwrap();
        assert_eq!(
            conn.address,
            Address::Ip4Multicast {
                addr: Ipv4Addr::new(224, 2, 36, 42),
                ttl: 127,
                count: Some(2)
            }
        );
    }

    #[test]
    fn parse_field_reports_partial() {
        let err = parse_field(FieldType::Attribute, b"a=recvonly\r\nextra").unwrap_err();
        assert_eq!(err.matched, MatchKind::Partial);
        assert_eq!(err.offset, 12);
        assert_eq!(err.kind, ErrorKind::MalformedField(FieldType::Attribute));
    }

    #[test]
    fn default_charset_option_applies_without_declaration() {
        let input = b"v=0\r\no=- 1 1 IN IP4 10.0.0.1\r\ns=caf\xe9\r\nt=0 0\r\n";
        let err = parse(input).unwrap_err();
        assert_eq!(err.kind, ErrorKind::EncodingError(FieldType::SessionName));
        let opts = ParseOptions {
            default_charset: Charset::Iso8859_1,
            ..ParseOptions::default()
        };
        let s = parse_with(input, &opts).unwrap();
        assert_eq!(s.session_name, "café");
    }
}

//! Session model: the structured form of one SDP message.
//!
//! Field order in [`SessionDescription`] mirrors the line order RFC 4566
//! mandates; the serializer walks it top to bottom.

use crate::address::Address;
use crate::charset::Charset;
use std::fmt;
use std::str::FromStr;

/// A complete session description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDescription {
    /// `v=`
    pub version: u32,
    /// `o=`
    pub origin: Origin,
    /// `s=`
    pub session_name: String,
    /// `i=`
    pub information: Option<String>,
    /// `u=`
    pub uri: Option<String>,
    /// `e=` lines in order.
    pub emails: Vec<String>,
    /// `p=` lines in order.
    pub phones: Vec<String>,
    /// Session-level `c=`; media blocks may override it.
    pub connection: Option<Connection>,
    pub bandwidths: Vec<Bandwidth>,
    /// At least one `t=` block.
    pub times: Vec<TimeDescription>,
    /// `z=`
    pub zone_adjustments: Vec<ZoneAdjustment>,
    /// `k=`
    pub key: Option<EncryptionKey>,
    pub attributes: Vec<Attribute>,
    pub media: Vec<MediaDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub username: String,
    pub session_id: String,
    pub session_version: String,
    pub net_type: String,
    pub addr_type: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub net_type: String,
    pub addr_type: String,
    pub address: Address,
}

/// `b=<bwtype>:<bandwidth>`, bandwidth in kilobits per second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bandwidth {
    pub bw_type: String,
    pub bandwidth: u64,
}

/// One `t=` line and the `r=` lines that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeDescription {
    /// NTP seconds; 0 means unbounded.
    pub start: u64,
    pub stop: u64,
    pub repeats: Vec<RepeatTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatTime {
    pub interval: TypedTime,
    pub duration: TypedTime,
    pub offsets: Vec<TypedTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    pub fn seconds(self) -> u64 {
        match self {
            TimeUnit::Days => 86_400,
            TimeUnit::Hours => 3_600,
            TimeUnit::Minutes => 60,
            TimeUnit::Seconds => 1,
        }
    }

    pub fn suffix(self) -> char {
        match self {
            TimeUnit::Days => 'd',
            TimeUnit::Hours => 'h',
            TimeUnit::Minutes => 'm',
            TimeUnit::Seconds => 's',
        }
    }

    fn from_suffix(c: char) -> Option<TimeUnit> {
        match c {
            'd' => Some(TimeUnit::Days),
            'h' => Some(TimeUnit::Hours),
            'm' => Some(TimeUnit::Minutes),
            's' => Some(TimeUnit::Seconds),
            _ => None,
        }
    }
}

/// A time value with an optional compact unit (`7d`, `25h`, `3600`).
/// The unit is kept so serialization reproduces the written form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypedTime {
    pub value: u64,
    pub unit: Option<TimeUnit>,
}

impl TypedTime {
    pub fn seconds(value: u64) -> Self {
        TypedTime { value, unit: None }
    }

    pub fn with_unit(value: u64, unit: TimeUnit) -> Self {
        TypedTime { value, unit: Some(unit) }
    }

    /// Value in seconds, saturating on overflow.
    pub fn as_seconds(&self) -> u64 {
        self.value
            .saturating_mul(self.unit.map_or(1, TimeUnit::seconds))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTypedTimeError;

impl fmt::Display for ParseTypedTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid typed time")
    }
}

impl std::error::Error for ParseTypedTimeError {}

impl FromStr for TypedTime {
    type Err = ParseTypedTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, unit) = match s.chars().last().and_then(TimeUnit::from_suffix) {
            Some(u) => (&s[..s.len() - 1], Some(u)),
            None => (s, None),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseTypedTimeError);
        }
        let value = digits.parse().map_err(|_| ParseTypedTimeError)?;
        Ok(TypedTime { value, unit })
    }
}

/// One `<adjustment time> <offset>` pair of a `z=` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneAdjustment {
    pub time: u64,
    pub offset: TypedTime,
    pub negative: bool,
}

impl ZoneAdjustment {
    /// Signed offset in seconds.
    pub fn offset_seconds(&self) -> i128 {
        let s = i128::from(self.offset.as_seconds());
        if self.negative {
            -s
        } else {
            s
        }
    }
}

/// `k=` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptionKey {
    Prompt,
    Clear(String),
    Base64(String),
    Uri(String),
}

/// `a=<name>` or `a=<name>:<value>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

impl Attribute {
    pub fn flag(name: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: None,
        }
    }

    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// One `m=` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescription {
    /// `audio`, `video`, `application`, ...
    pub media: String,
    pub port: u16,
    /// `m=<media> <port>/<count> ...`
    pub port_count: Option<u32>,
    /// `RTP/AVP`, `udp`, ...
    pub protocol: String,
    pub formats: Vec<String>,
    pub information: Option<String>,
    pub connections: Vec<Connection>,
    pub bandwidths: Vec<Bandwidth>,
    pub key: Option<EncryptionKey>,
    pub attributes: Vec<Attribute>,
}

fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attributes.iter().find(|a| a.name == name)
}

impl Origin {
    /// `IN` origin with the address type derived from `address`.
    pub fn new(
        username: impl Into<String>,
        session_id: impl Into<String>,
        session_version: impl Into<String>,
        address: Address,
    ) -> Self {
        Origin {
            username: username.into(),
            session_id: session_id.into(),
            session_version: session_version.into(),
            net_type: "IN".to_string(),
            addr_type: address.addr_type().to_string(),
            address,
        }
    }
}

impl Connection {
    pub fn new(address: Address) -> Self {
        Connection {
            net_type: "IN".to_string(),
            addr_type: address.addr_type().to_string(),
            address,
        }
    }
}

impl TimeDescription {
    /// `t=0 0`: a permanent session.
    pub fn unbounded() -> Self {
        TimeDescription {
            start: 0,
            stop: 0,
            repeats: Vec::new(),
        }
    }

    pub fn new(start: u64, stop: u64) -> Self {
        TimeDescription {
            start,
            stop,
            repeats: Vec::new(),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start == 0 && self.stop == 0
    }
}

impl SessionDescription {
    /// Version 0 session with a single unbounded time description.
    pub fn new(origin: Origin, session_name: impl Into<String>) -> Self {
        SessionDescription {
            version: 0,
            origin,
            session_name: session_name.into(),
            information: None,
            uri: None,
            emails: Vec::new(),
            phones: Vec::new(),
            connection: None,
            bandwidths: Vec::new(),
            times: vec![TimeDescription::unbounded()],
            zone_adjustments: Vec::new(),
            key: None,
            attributes: Vec::new(),
            media: Vec::new(),
        }
    }

    pub fn with_information(mut self, info: impl Into<String>) -> Self {
        self.information = Some(info.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.emails.push(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phones.push(phone.into());
        self
    }

    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn with_bandwidth(mut self, bw_type: impl Into<String>, bandwidth: u64) -> Self {
        self.bandwidths.push(Bandwidth {
            bw_type: bw_type.into(),
            bandwidth,
        });
        self
    }

    /// Replace the time descriptions. An empty list leaves the session
    /// without the mandatory `t=` line, which the parser would reject.
    pub fn with_times(mut self, times: Vec<TimeDescription>) -> Self {
        self.times = times;
        self
    }

    pub fn with_zone_adjustment(mut self, adjustment: ZoneAdjustment) -> Self {
        self.zone_adjustments.push(adjustment);
        self
    }

    pub fn with_key(mut self, key: EncryptionKey) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_media(mut self, media: MediaDescription) -> Self {
        self.media.push(media);
        self
    }

    /// First session-level attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        find_attribute(&self.attributes, name)
    }

    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(|a| a.value.as_deref())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Charset declared by `a=charset:`, UTF-8 when absent or unsupported.
    pub fn charset(&self) -> Charset {
        self.attribute_value("charset")
            .and_then(Charset::from_name)
            .unwrap_or_default()
    }

    pub fn media_of_type<'a>(
        &'a self,
        media: &'a str,
    ) -> impl Iterator<Item = &'a MediaDescription> + 'a {
        self.media.iter().filter(move |m| m.media == media)
    }
}

impl MediaDescription {
    pub fn new(
        media: impl Into<String>,
        port: u16,
        protocol: impl Into<String>,
        formats: Vec<String>,
    ) -> Self {
        MediaDescription {
            media: media.into(),
            port,
            port_count: None,
            protocol: protocol.into(),
            formats,
            information: None,
            connections: Vec::new(),
            bandwidths: Vec::new(),
            key: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_port_count(mut self, count: u32) -> Self {
        self.port_count = Some(count);
        self
    }

    pub fn with_information(mut self, info: impl Into<String>) -> Self {
        self.information = Some(info.into());
        self
    }

    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connections.push(connection);
        self
    }

    pub fn with_bandwidth(mut self, bw_type: impl Into<String>, bandwidth: u64) -> Self {
        self.bandwidths.push(Bandwidth {
            bw_type: bw_type.into(),
            bandwidth,
        });
        self
    }

    pub fn with_key(mut self, key: EncryptionKey) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        find_attribute(&self.attributes, name)
    }

    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(|a| a.value.as_deref())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// The media-level connection if present, else the session-level one.
    pub fn effective_connection<'a>(
        &'a self,
        session: &'a SessionDescription,
    ) -> Option<&'a Connection> {
        self.connections.first().or(session.connection.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn typed_time_parses_units() {
        assert_eq!("7d".parse::<TypedTime>(), Ok(TypedTime::with_unit(7, TimeUnit::Days)));
        assert_eq!("3600".parse::<TypedTime>(), Ok(TypedTime::seconds(3600)));
        assert_eq!("25h".parse::<TypedTime>().map(|t| t.as_seconds()), Ok(90_000));
        assert!("h".parse::<TypedTime>().is_err());
        assert!("-1".parse::<TypedTime>().is_err());
    }

    #[test]
    fn zone_offset_sign() {
        let z = ZoneAdjustment {
            time: 2882844526,
            offset: TypedTime::with_unit(1, TimeUnit::Hours),
            negative: true,
        };
        assert_eq!(z.offset_seconds(), -3600);
    }

    #[test]
    fn media_connection_overrides_session() {
        let session_conn = Connection::new(Address::Ip4(Ipv4Addr::new(10, 0, 0, 1)));
        let media_conn = Connection::new(Address::Ip4(Ipv4Addr::new(10, 0, 0, 2)));
        let origin = Origin::new("-", "1", "1", Address::Ip4(Ipv4Addr::LOCALHOST));
        let audio = MediaDescription::new("audio", 5004, "RTP/AVP", vec!["0".into()]);
        let video = MediaDescription::new("video", 5006, "RTP/AVP", vec!["96".into()])
            .with_connection(media_conn.clone());
        let s = SessionDescription::new(origin, "x")
            .with_connection(session_conn.clone())
            .with_media(audio)
            .with_media(video);
        assert_eq!(s.media[0].effective_connection(&s), Some(&session_conn));
        assert_eq!(s.media[1].effective_connection(&s), Some(&media_conn));
        assert_eq!(s.media_of_type("video").count(), 1);
    }

    #[test]
    fn charset_from_attribute() {
        let origin = Origin::new("-", "1", "1", Address::Ip4(Ipv4Addr::LOCALHOST));
        let s = SessionDescription::new(origin, "x");
        assert_eq!(s.charset(), Charset::Utf8);
        let s = s.with_attribute(Attribute::new("charset", "ISO-8859-1"));
        assert_eq!(s.charset(), Charset::Iso8859_1);
        assert!(s.has_attribute("charset"));
    }
}

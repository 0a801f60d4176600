//! Canonical SDP output.
//!
//! Value types render the text after `<letter>=`; block types render whole
//! lines, each terminated by CRLF.

use crate::charset::Charset;
use crate::session::*;
use std::fmt;

const CRLF: &str = "\r\n";

/// Canonical bytes of `session`, encoded in the charset the session declares.
pub fn serialize(session: &SessionDescription) -> Vec<u8> {
    serialize_with(session, session.charset())
}

/// Canonical bytes with an explicit charset for text values.
pub fn serialize_with(session: &SessionDescription, charset: Charset) -> Vec<u8> {
    charset.encode(&session.to_string())
}

pub fn to_sdp_string(session: &SessionDescription) -> String {
    session.to_string()
}

fn line(f: &mut fmt::Formatter<'_>, letter: char, value: impl fmt::Display) -> fmt::Result {
    write!(f, "{}={}{}", letter, value, CRLF)
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.username,
            self.session_id,
            self.session_version,
            self.net_type,
            self.addr_type,
            self.address
        )
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.net_type, self.addr_type, self.address)
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.bw_type, self.bandwidth)
    }
}

impl fmt::Display for TypedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if let Some(unit) = self.unit {
            write!(f, "{}", unit.suffix())?;
        }
        Ok(())
    }
}

impl fmt::Display for RepeatTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.interval, self.duration)?;
        for o in &self.offsets {
            write!(f, " {}", o)?;
        }
        Ok(())
    }
}

impl fmt::Display for ZoneAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { "-" } else { "" };
        write!(f, "{} {}{}", self.time, sign, self.offset)
    }
}

impl fmt::Display for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptionKey::Prompt => f.write_str("prompt"),
            EncryptionKey::Clear(k) => write!(f, "clear:{}", k),
            EncryptionKey::Base64(k) => write!(f, "base64:{}", k),
            EncryptionKey::Uri(k) => write!(f, "uri:{}", k),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}:{}", self.name, v),
            None => f.write_str(&self.name),
        }
    }
}

/// `t=` line followed by its `r=` lines.
impl fmt::Display for TimeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        line(f, 't', format_args!("{} {}", self.start, self.stop))?;
        for r in &self.repeats {
            line(f, 'r', r)?;
        }
        Ok(())
    }
}

/// The `m=` line and the block lines after it.
impl fmt::Display for MediaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m={} {}", self.media, self.port)?;
        if let Some(n) = self.port_count {
            write!(f, "/{}", n)?;
        }
        write!(f, " {}", self.protocol)?;
        for id in &self.formats {
            write!(f, " {}", id)?;
        }
        f.write_str(CRLF)?;
        if let Some(i) = &self.information {
            line(f, 'i', i)?;
        }
        for c in &self.connections {
            line(f, 'c', c)?;
        }
        for b in &self.bandwidths {
            line(f, 'b', b)?;
        }
        if let Some(k) = &self.key {
            line(f, 'k', k)?;
        }
        for a in &self.attributes {
            line(f, 'a', a)?;
        }
        Ok(())
    }
}

impl fmt::Display for SessionDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        line(f, 'v', self.version)?;
        line(f, 'o', &self.origin)?;
        line(f, 's', &self.session_name)?;
        if let Some(i) = &self.information {
            line(f, 'i', i)?;
        }
        if let Some(u) = &self.uri {
            line(f, 'u', u)?;
        }
        for e in &self.emails {
            line(f, 'e', e)?;
        }
        for p in &self.phones {
            line(f, 'p', p)?;
        }
        if let Some(c) = &self.connection {
            line(f, 'c', c)?;
        }
        for b in &self.bandwidths {
            line(f, 'b', b)?;
        }
        for t in &self.times {
            write!(f, "{}", t)?;
        }
        if let Some((first, rest)) = self.zone_adjustments.split_first() {
            write!(f, "z={}", first)?;
            for z in rest {
                write!(f, " {}", z)?;
            }
            f.write_str(CRLF)?;
        }
        if let Some(k) = &self.key {
            line(f, 'k', k)?;
        }
        for a in &self.attributes {
            line(f, 'a', a)?;
        }
        for m in &self.media {
            write!(f, "{}", m)?;
        }
        Ok(())
    }
}

//! # sdpgrammar: RFC 4566 Session Description Protocol grammar and model
//!
//! A PEST grammar for SDP, from character classes up to the ordered session
//! and media blocks, plus a driver that classifies each input as a full,
//! partial or failed match and builds a [`SessionDescription`] on success.
//!
//! ## Layers
//!
//! - **Primitives / datatypes**: `decimal_uchar`, `token`, `byte_string`, `text`, ...
//! - **Addresses**: IPv4/IPv6 unicast and multicast, FQDN, extension fallback
//! - **Fields**: one rule per line type (`v=`, `o=`, `s=`, ... `m=`)
//! - **Session**: RFC field order, time descriptions, media blocks
//!
//! ## Example
//!
//! ```
//! let sdp = b"v=0\r\no=alice 123 456 IN IP4 10.0.0.1\r\ns=Call\r\n\
//!     t=0 0\r\nm=audio 49170 RTP/AVP 0\r\n";
//! let session = sdpgrammar::parse(sdp).unwrap();
//! assert_eq!(session.origin.username, "alice");
//! assert_eq!(session.media[0].port, 49170);
//! assert_eq!(sdpgrammar::serialize(&session), sdp.to_vec());
//! ```
//!
//! Failures carry the match kind, a diagnosis and the byte offset:
//!
//! ```
//! use sdpgrammar::{ErrorKind, MatchKind};
//! let input = b"v=0\r\no=- 1 1 IN IP4 10.0.0.1\r\ns=x\r\nt=0 0\r\nx=stray\r\n";
//! let err = sdpgrammar::parse(input).unwrap_err();
//! assert_eq!(err.matched, MatchKind::Partial);
//! assert_eq!(err.kind, ErrorKind::TrailingUnparsedData);
//! ```

pub mod address;
pub mod charset;
mod diagnose;
pub mod error;
pub mod parser;
pub mod serialize;
pub mod session;

pub use address::Address;
pub use charset::Charset;
pub use error::{ErrorKind, FieldType, MatchKind, ParseError};
pub use parser::{
    accepts, field_rule, matches_rule, parse, parse_field, parse_str, parse_with, ParseOptions,
    Rule, SdpGrammar,
};
pub use serialize::{serialize, serialize_with, to_sdp_string};
pub use session::{
    Attribute, Bandwidth, Connection, EncryptionKey, MediaDescription, Origin, RepeatTime,
    SessionDescription, TimeDescription, TimeUnit, TypedTime, ZoneAdjustment,
};

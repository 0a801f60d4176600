//! Serializer round-trip: parse(serialize(m)) == m and serialization is
//! idempotent, over generated sessions and fixed canonical messages.

use proptest::option;
use proptest::prelude::*;
use sdpgrammar::{
    parse, serialize, Address, Attribute, Bandwidth, Connection, EncryptionKey,
    MediaDescription, Origin, RepeatTime, SessionDescription, TimeDescription, TimeUnit,
    TypedTime, ZoneAdjustment,
};
use std::net::Ipv4Addr;

const IP6: &[&str] = &[
    "::1",
    "2001:db8::1",
    "fe80::1:2",
    "2001:DB8:0:0:8:800:200C:417A",
    "::ffff:10.0.0.1",
];

const IP6_MULTICAST: &[&str] = &["FF02::1", "ff15::101", "FF1E:03AD::7F2E:172A:1E24"];

fn unicast_address() -> impl Strategy<Value = Address> {
    prop_oneof![
        (0u8..224, any::<u8>(), any::<u8>(), any::<u8>())
            .prop_map(|(a, b, c, d)| Address::Ip4(Ipv4Addr::new(a, b, c, d))),
        prop::sample::select(IP6).prop_map(|a| Address::Ip6(a.to_string())),
        "[a-z]{2,8}\\.example\\.com".prop_map(Address::Fqdn),
    ]
}

fn multicast_address() -> impl Strategy<Value = Address> {
    prop_oneof![
        (
            224u8..=239,
            any::<u8>(),
            any::<u8>(),
            any::<u8>(),
            any::<u8>(),
            option::of(1u32..100)
        )
            .prop_map(|(a, b, c, d, ttl, count)| Address::Ip4Multicast {
                addr: Ipv4Addr::new(a, b, c, d),
                ttl,
                count,
            }),
        (prop::sample::select(IP6_MULTICAST), option::of(1u32..16)).prop_map(|(a, count)| {
            Address::Ip6Multicast {
                addr: a.to_string(),
                count,
            }
        }),
    ]
}

fn connection() -> impl Strategy<Value = Connection> {
    prop_oneof![unicast_address(), multicast_address()].prop_map(Connection::new)
}

fn origin() -> impl Strategy<Value = Origin> {
    (
        "[a-zA-Z0-9_.-]{1,12}",
        "[0-9]{1,12}",
        "[0-9]{1,6}",
        unicast_address(),
    )
        .prop_map(|(user, id, version, addr)| Origin::new(user, id, version, addr))
}

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 éü☕]{1,20}"
}

fn bandwidth() -> impl Strategy<Value = Bandwidth> {
    ("AS|CT|TIAS", 0u64..1_000_000).prop_map(|(bw_type, bandwidth)| Bandwidth {
        bw_type,
        bandwidth,
    })
}

fn unit() -> impl Strategy<Value = Option<TimeUnit>> {
    option::of(prop_oneof![
        Just(TimeUnit::Days),
        Just(TimeUnit::Hours),
        Just(TimeUnit::Minutes),
        Just(TimeUnit::Seconds),
    ])
}

fn typed_time(min: u64) -> impl Strategy<Value = TypedTime> {
    (min..100_000, unit()).prop_map(|(value, unit)| TypedTime { value, unit })
}

fn ntp_time() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0u64), 1_000_000_000u64..9_999_999_999]
}

fn time_description() -> impl Strategy<Value = TimeDescription> {
    let repeat = (typed_time(1), typed_time(0), prop::collection::vec(typed_time(0), 1..3))
        .prop_map(|(interval, duration, offsets)| RepeatTime {
            interval,
            duration,
            offsets,
        });
    (ntp_time(), ntp_time(), prop::collection::vec(repeat, 0..2)).prop_map(
        |(start, stop, repeats)| TimeDescription {
            start,
            stop,
            repeats,
        },
    )
}

fn zone_adjustment() -> impl Strategy<Value = ZoneAdjustment> {
    (1_000_000_000u64..9_999_999_999, typed_time(0), any::<bool>()).prop_map(
        |(time, offset, negative)| ZoneAdjustment {
            time,
            offset,
            negative,
        },
    )
}

fn key() -> impl Strategy<Value = EncryptionKey> {
    prop_oneof![
        Just(EncryptionKey::Prompt),
        "[a-z0-9 ]{1,10}".prop_map(EncryptionKey::Clear),
        "[A-Za-z0-9+/]{4,12}={0,2}".prop_map(EncryptionKey::Base64),
        "https://[a-z]{3,8}\\.example/[a-z]{1,5}".prop_map(EncryptionKey::Uri),
    ]
}

fn attribute() -> impl Strategy<Value = Attribute> {
    ("[a-z][a-z0-9-]{0,10}", option::of("[ -~]{1,20}"))
        .prop_map(|(name, value)| Attribute { name, value })
}

fn media() -> impl Strategy<Value = MediaDescription> {
    (
        "audio|video|application|text",
        any::<u16>(),
        option::of(1u32..8),
        "RTP/AVP|UDP/TLS/RTP/SAVPF|udp",
        prop::collection::vec("[0-9]{1,3}", 1..4),
        option::of(text()),
        prop::collection::vec(connection(), 0..2),
        prop::collection::vec(bandwidth(), 0..2),
        option::of(key()),
        prop::collection::vec(attribute(), 0..4),
    )
        .prop_map(
            |(
                media,
                port,
                port_count,
                protocol,
                formats,
                information,
                connections,
                bandwidths,
                key,
                attributes,
            )| MediaDescription {
                media,
                port,
                port_count,
                protocol,
                formats,
                information,
                connections,
                bandwidths,
                key,
                attributes,
            },
        )
}

fn session() -> impl Strategy<Value = SessionDescription> {
    let head = (
        origin(),
        text(),
        option::of(text()),
        option::of("https?://[a-z]{3,10}\\.example\\.com(/[a-z0-9]{1,6}){0,2}"),
        prop::collection::vec("[a-z]{1,8}@[a-z]{1,8}\\.com", 0..2),
        prop::collection::vec("\\+[0-9]{1,3} [0-9]{3} [0-9]{4}", 0..2),
        option::of(connection()),
        prop::collection::vec(bandwidth(), 0..2),
    );
    let tail = (
        prop::collection::vec(time_description(), 1..3),
        prop::collection::vec(zone_adjustment(), 0..3),
        option::of(key()),
        prop::collection::vec(attribute(), 0..4),
        prop::collection::vec(media(), 0..3),
    );
    (head, tail).prop_map(
        |(
            (origin, session_name, information, uri, emails, phones, connection, bandwidths),
            (times, zone_adjustments, key, attributes, media),
        )| SessionDescription {
            version: 0,
            origin,
            session_name,
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
        },
    )
}

proptest! {
    #[test]
    fn parse_inverts_serialize(s in session()) {
        let bytes = serialize(&s);
        let parsed = parse(&bytes);
        prop_assert!(parsed.is_ok(), "{:?}\n{}", parsed, String::from_utf8_lossy(&bytes));
        prop_assert_eq!(parsed.unwrap(), s);
    }

    #[test]
    fn serialize_is_idempotent(s in session()) {
        let once = serialize(&s);
        let twice = serialize(&parse(&once).unwrap());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn parse_never_panics(input in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = parse(&input);
    }

    #[test]
    fn latin1_session_round_trips(name in "[a-zA-Zàéîõü ]{1,16}") {
        let s = SessionDescription::new(
            Origin::new("-", "1", "1", Address::Ip4(Ipv4Addr::new(10, 0, 0, 1))),
            name,
        )
        .with_attribute(Attribute::new("charset", "ISO-8859-1"));
        let bytes = serialize(&s);
        prop_assert!(bytes.iter().all(|&b| b != 0xc3), "latin-1 output must not be UTF-8");
        prop_assert_eq!(parse(&bytes).unwrap(), s);
    }
}

// ==================== Fixed canonical messages ====================

#[test]
fn canonical_messages_are_reproduced_byte_for_byte() {
    let messages: &[&str] = &[
        "v=0\r\no=alice 123 456 IN IP4 10.0.0.1\r\ns=Call\r\nt=0 0\r\n",
        "v=0\r\n\
o=jdoe 2890844526 2890842807 IN IP4 10.47.16.5\r\n\
s=SDP Seminar\r\n\
i=A Seminar on the session description protocol\r\n\
u=http://www.example.com/seminars/sdp.pdf\r\n\
e=j.doe@example.com (Jane Doe)\r\n\
c=IN IP4 224.2.17.12/127\r\n\
t=2873397496 2873404696\r\n\
a=recvonly\r\n\
m=audio 49170 RTP/AVP 0\r\n\
m=video 51372 RTP/AVP 99\r\n\
a=rtpmap:99 h263-1998/90000\r\n",
        "v=0\r\n\
o=- 4611731400430051336 2 IN IP6 2001:db8::1\r\n\
s=-\r\n\
p=+1 617 555-6011\r\n\
c=IN IP6 FF1E:03AD::7F2E:172A:1E24/3\r\n\
b=CT:1000\r\n\
t=3034423619 3042462419\r\n\
r=7d 1h 0 25h\r\n\
z=2882844526 -1h 2898848070 0\r\n\
k=clear:open sesame\r\n\
a=group:BUNDLE 0\r\n\
m=audio 9/2 UDP/TLS/RTP/SAVPF 111\r\n\
c=IN IP4 0.0.0.0\r\n\
a=mid:0\r\n",
    ];
    for m in messages {
        let s = parse(m.as_bytes()).expect("parse");
        assert_eq!(String::from_utf8(serialize(&s)).unwrap(), *m);
    }
}

#[test]
fn bare_lf_input_is_canonicalised_to_crlf() {
    let s = parse(b"v=0\no=- 1 1 IN IP4 10.0.0.1\ns=x\nt=0 0").expect("parse");
    assert_eq!(
        serialize(&s),
        b"v=0\r\no=- 1 1 IN IP4 10.0.0.1\r\ns=x\r\nt=0 0\r\n".to_vec()
    );
}

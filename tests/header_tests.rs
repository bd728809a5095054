//! Header-level behaviour through the public parse/render/compare API,
//! including the interop-sensitive byte-exact renders.

use std::str::FromStr;

use sipmsg::header::{
    AcceptEncoding, Header, RetryAfter, TokenRange, Via,
};
use sipmsg::prelude::*;

#[test]
fn accept_encoding_splits_entry_params() {
    let h = Header::parse("Accept-Encoding: gzip;q=0.5;foo=bar, deflate;foo").unwrap();
    let Header::AcceptEncoding(enc) = &h else { panic!("expected Accept-Encoding") };
    assert_eq!(enc.0.len(), 2);
    assert_eq!(enc.0[0].value, "gzip");
    assert_eq!(enc.0[0].params.first("q"), Some("0.5"));
    assert_eq!(enc.0[0].params.first("foo"), Some("bar"));
    assert_eq!(enc.0[1].value, "deflate");
    assert_eq!(enc.0[1].params.first("foo"), Some(""));
}

#[test]
fn accept_encoding_renders_q_first_then_alphabetical() {
    let mut gzip = TokenRange::new("gzip");
    gzip.params.set("a", "123");
    gzip.params.set("q", "0.9");
    let enc = AcceptEncoding(vec![gzip, TokenRange::new("deflate")]);
    assert_eq!(
        Header::AcceptEncoding(enc).to_string(),
        "Accept-Encoding: gzip;q=0.9;a=123, deflate"
    );
}

#[test]
fn via_keeps_rport_flag() {
    let h = Header::parse(
        "Via: SIP/2.0/UDP erlang.bell-telephone.com:5060;branch=z9hG4bK87asdks7;rport",
    )
    .unwrap();
    let Header::Via(Via(hops)) = &h else { panic!("expected Via") };
    assert_eq!(hops.len(), 1);
    assert_eq!(hops[0].addr.port(), Some(5060));
    assert_eq!(hops[0].params.first("rport"), Some(""));
    assert_eq!(hops[0].branch(), Some("z9hG4bK87asdks7"));
}

#[test]
fn from_to_tags_drive_equality() {
    let a = FromTo::from_str("Alice <sip:alice@atlanta.com>;tag=1928301774").unwrap();
    let b = FromTo::from_str("<sip:alice@atlanta.com>;tag=1928301774").unwrap();
    let c = FromTo::from_str("Alice <sip:alice@atlanta.com>;tag=other").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn contact_wildcard_and_expiry() {
    let star = Contact::from_str("*").unwrap();
    assert_eq!(star.to_string(), "*");

    let h = Header::parse("m: <sips:bob@192.0.2.4>;expires=60").unwrap();
    let Header::Contact(Contact::Entries(entries)) = &h else { panic!("expected entries") };
    assert_eq!(entries[0].params.first("expires"), Some("60"));
    assert_eq!(h.to_string(), "Contact: <sips:bob@192.0.2.4>;expires=60");
}

#[test]
fn digest_render_is_byte_exact() {
    let h = Header::parse(
        "Authorization: Digest username=\"Alice\", realm=\"atlanta.com\", \
         nonce=\"84a4cc6f3082121f32b42a2187831a9e\", \
         response=\"7587245234b3434cc3412213e5f113a5\"",
    )
    .unwrap();
    assert!(h.is_valid());
    assert_eq!(
        h.to_string(),
        "Authorization: Digest username=\"Alice\", realm=\"atlanta.com\", \
         nonce=\"84a4cc6f3082121f32b42a2187831a9e\", \
         response=\"7587245234b3434cc3412213e5f113a5\""
    );
}

#[test]
fn www_authenticate_challenge_round_trip() {
    let h = Header::parse(
        "WWW-Authenticate: Digest realm=\"atlanta.com\", \
         nonce=\"84a4cc6f3082121f32b42a2187831a9e\", qop=\"auth\", algorithm=MD5",
    )
    .unwrap();
    assert!(h.is_valid());
    assert_eq!(
        h.to_string(),
        "WWW-Authenticate: Digest realm=\"atlanta.com\", \
         nonce=\"84a4cc6f3082121f32b42a2187831a9e\", algorithm=MD5, qop=\"auth\""
    );
}

#[test]
fn retry_after_duration_is_special() {
    let a = RetryAfter::from_str("18000;duration=3600").unwrap();
    let b = RetryAfter::from_str("18000 (maintenance);duration=3600").unwrap();
    let c = RetryAfter::from_str("18000").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn canonical_names_on_render() {
    for (wire, canonical) in [
        ("i: x@y", "Call-ID: x@y"),
        ("cseq: 1 ACK", "CSeq: 1 ACK"),
        ("MIME-version: 1.0", "MIME-Version: 1.0"),
        ("max-forwards: 70", "Max-Forwards: 70"),
    ] {
        assert_eq!(Header::parse(wire).unwrap().to_string(), canonical);
    }
}

#[test]
fn multi_entry_headers_join_with_comma_space() {
    let h = Header::parse("Route: <sip:p1.com;lr>,<sip:p2.com;lr> , <sip:p3.com;lr>").unwrap();
    assert_eq!(
        h.to_string(),
        "Route: <sip:p1.com;lr>, <sip:p2.com;lr>, <sip:p3.com;lr>"
    );
}

#[test]
fn quoted_display_names_shield_separators() {
    let h = Header::parse("To: \"Smith, John\" <sip:j@x.com>;tag=1").unwrap();
    let Header::To(to) = &h else { panic!("expected To") };
    assert_eq!(to.0.display_name.as_deref(), Some("Smith, John"));
    assert_eq!(h.to_string(), "To: \"Smith, John\" <sip:j@x.com>;tag=1");
}

#[test]
fn typed_parse_round_trip_preserves_equality() {
    for line in [
        "From: <sip:alice@atlanta.com>;tag=88sja8x",
        "Via: SIP/2.0/TCP client.atlanta.com:5060;branch=z9hG4bK74bf9",
        "Contact: <sip:alice@pc33.atlanta.com>;q=0.7;expires=3600",
        "Accept: application/sdp;level=1;q=0.9, application/x-private",
        "Content-Type: multipart/signed;protocol=\"application/pkcs7-signature\"",
        "Date: Thu, 21 Feb 2002 13:02:03 GMT",
        "Retry-After: 120 (busy);duration=60",
        "Allow: INVITE, ACK, CANCEL, OPTIONS, BYE",
        "Timestamp: 54 1.5",
        "Content-Disposition: session;handling=required",
    ] {
        let first = Header::parse(line).unwrap();
        let second = Header::parse(&first.to_string()).unwrap();
        assert_eq!(first, second, "round trip changed semantics of {line:?}");
    }
}

#[test]
fn headers_serialize_and_deserialize() {
    let h = Header::parse("Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776").unwrap();
    let json = serde_json::to_string(&h).unwrap();
    let back: Header = serde_json::from_str(&json).unwrap();
    assert_eq!(h, back);

    let uri: SipUri = "sips:bob@biloxi.com:5061;transport=tls".parse().unwrap();
    let json = serde_json::to_string(&uri).unwrap();
    let back: SipUri = serde_json::from_str(&json).unwrap();
    assert_eq!(uri, back);
}

#[test]
fn invalid_values_still_construct() {
    // validation is a predicate, not a parse failure
    let cseq = CSeq::new(0, "INVITE");
    assert!(!cseq.is_valid());
    let h = Header::parse("Call-ID: ok@host").unwrap();
    assert!(h.is_valid());
}

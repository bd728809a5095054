//! Property tests for the model-wide laws: canonical round-trips, clone
//! independence and the special-parameter rule.

use proptest::prelude::*;
use std::str::FromStr;

use sipmsg::header::{CSeq, Header, TokenList};
use sipmsg::{Addr, Params, SipUri, TelUri};

fn token() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9\\-]{0,12}".prop_map(|s| s)
}

fn hostname() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,10}(\\.[a-z][a-z0-9]{0,10}){0,2}".prop_map(|s| s)
}

fn phone_number() -> impl Strategy<Value = String> {
    "\\+[0-9]{1,3}[0-9 \\-\\.\\(\\)]{0,12}[0-9]".prop_map(|s| s)
}

fn params() -> impl Strategy<Value = Params> {
    proptest::collection::vec((token(), token()), 0..4)
        .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn sip_uri_round_trip_is_semantically_stable(
        user in token(),
        host in hostname(),
        port in proptest::option::of(1024u16..u16::MAX),
        params in params(),
    ) {
        let mut uri = SipUri::new(host).with_user(user);
        if let Some(port) = port {
            uri = uri.with_port(port);
        }
        uri.params = params;
        let reparsed = SipUri::from_str(&uri.to_string()).unwrap();
        prop_assert_eq!(&uri, &reparsed);
        // rendering the reparse is byte-identical: canonical form is a fixpoint
        prop_assert_eq!(uri.to_string(), reparsed.to_string());
    }

    #[test]
    fn tel_uri_round_trip(number in phone_number(), params in params()) {
        let mut uri = TelUri::new(number);
        uri.params = params;
        let reparsed = TelUri::from_str(&uri.to_string()).unwrap();
        prop_assert_eq!(&uri, &reparsed);
    }

    #[test]
    fn cseq_round_trip(seq in 1u32..u32::MAX, method in token()) {
        let cseq = CSeq::new(seq, method);
        let line = Header::CSeq(cseq.clone()).to_string();
        let reparsed = Header::parse(&line).unwrap();
        prop_assert_eq!(Header::CSeq(cseq), reparsed);
    }

    #[test]
    fn token_list_round_trip(tokens in proptest::collection::vec(token(), 0..6)) {
        let list = TokenList(tokens);
        let reparsed = TokenList::from_str(&list.to_string()).unwrap();
        prop_assert_eq!(list, reparsed);
    }

    #[test]
    fn clone_independence(params in params(), key in token(), value in token()) {
        let mut original = SipUri::new("example.com");
        original.params = params;
        let mut copy = original.clone();
        copy.params.append(key.clone(), value);
        prop_assert!(copy.params.has(&key));
        prop_assert_eq!(
            original.params.get(&key).len() + 1,
            copy.params.get(&key).len()
        );
    }

    #[test]
    fn equality_is_reflexive_and_symmetric(host in hostname(), params in params()) {
        let mut a = SipUri::new(host);
        a.params = params;
        let b = a.clone();
        prop_assert_eq!(&a, &a);
        prop_assert!(a == b && b == a);
    }

    #[test]
    fn special_param_one_sided_breaks_equality(
        host in hostname(),
        value in token(),
    ) {
        let plain = SipUri::new(host.clone());
        let special = SipUri::new(host.clone()).with_param("transport", value.clone());
        let ordinary = SipUri::new(host).with_param("x-custom", value);
        // transport is in the special set, x-custom is not
        prop_assert_ne!(&plain, &special);
        prop_assert_eq!(&plain, &ordinary);
    }

    #[test]
    fn addr_parse_render_fixpoint(host in hostname(), port in proptest::option::of(1u16..u16::MAX)) {
        let addr = match port {
            Some(port) => Addr::host_port(host, port),
            None => Addr::host(host),
        };
        let reparsed = Addr::from_str(&addr.to_string()).unwrap();
        prop_assert_eq!(addr, reparsed);
    }
}

#[test]
fn ipv6_fold_is_not_a_property_accident() {
    // pin the concrete folding pair alongside the generated cases
    assert_eq!(Addr::host("192.0.2.128"), Addr::host("::ffff:192.0.2.128"));
    assert_ne!(Addr::host("localhost"), Addr::host("127.0.0.1"));
}

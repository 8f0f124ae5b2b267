use proptest::prelude::*;
use storefront_types::{Error, SectionId, SectionKey};

// ── Classification ───────────────────────────────────────────────

#[test]
fn plain_integer_is_ordinal() {
    assert_eq!(SectionKey::parse("4").unwrap(), SectionKey::Ordinal(4));
}

#[test]
fn negative_integer_is_ordinal() {
    assert_eq!(SectionKey::parse("-2").unwrap(), SectionKey::Ordinal(-2));
}

#[test]
fn whitespace_is_trimmed() {
    assert_eq!(SectionKey::parse("  12 ").unwrap(), SectionKey::Ordinal(12));
}

#[test]
fn opaque_id_is_id() {
    assert_eq!(
        SectionKey::parse("sec_77").unwrap(),
        SectionKey::Id(SectionId::new("sec_77"))
    );
}

#[test]
fn mixed_digits_and_letters_is_id() {
    assert!(matches!(SectionKey::parse("4a").unwrap(), SectionKey::Id(_)));
    assert!(matches!(SectionKey::parse("65f1c0a9").unwrap(), SectionKey::Id(_)));
}

#[test]
fn lone_minus_is_id() {
    assert!(matches!(SectionKey::parse("-").unwrap(), SectionKey::Id(_)));
}

#[test]
fn empty_key_is_rejected() {
    assert_eq!(SectionKey::parse("").unwrap_err(), Error::EmptyKey);
    assert_eq!(SectionKey::parse("   ").unwrap_err(), Error::EmptyKey);
}

#[test]
fn oversized_ordinal_is_rejected() {
    let err = SectionKey::parse("99999999999999999999999").unwrap_err();
    assert!(matches!(err, Error::OrdinalOutOfRange(_)));
}

#[test]
fn from_str_literal_falls_back_to_id() {
    let key: SectionKey = "99999999999999999999999".into();
    assert!(matches!(key, SectionKey::Id(_)));
}

// ── Conversions ──────────────────────────────────────────────────

#[test]
fn from_integer() {
    assert_eq!(SectionKey::from(4i64), SectionKey::Ordinal(4));
    assert_eq!(SectionKey::from(4i32), SectionKey::Ordinal(4));
}

#[test]
fn from_section_id() {
    let id = SectionId::new("abc");
    assert_eq!(SectionKey::from(&id), SectionKey::Id(id.clone()));
    assert_eq!(SectionKey::from(id.clone()).as_id(), Some(&id));
}

#[test]
fn accessors() {
    assert_eq!(SectionKey::Ordinal(3).as_ordinal(), Some(3));
    assert_eq!(SectionKey::Ordinal(3).as_id(), None);
    assert_eq!(SectionKey::from("abc").as_ordinal(), None);
}

#[test]
fn display_round_trips_through_parse() {
    for raw in ["7", "-1", "sec_1", "a-b-c"] {
        let key = SectionKey::parse(raw).unwrap();
        assert_eq!(SectionKey::parse(&key.to_string()).unwrap(), key);
    }
}

proptest! {
    #[test]
    fn every_i64_parses_as_ordinal(n in any::<i64>()) {
        prop_assert_eq!(SectionKey::parse(&n.to_string()).unwrap(), SectionKey::Ordinal(n));
    }

    #[test]
    fn keys_with_a_letter_are_ids(s in "[0-9]{0,4}[a-z_][a-z0-9_]{0,8}") {
        prop_assert!(matches!(SectionKey::parse(&s).unwrap(), SectionKey::Id(_)));
    }
}

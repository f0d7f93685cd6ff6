use proptest::prelude::*;

use simexport::core::{
    alphabet::{GsmTables, TagEncoding, is_gsm_alphabet_only, tag_units},
    truncate::truncate_name,
};

const GSM_CHARS: &str = concat!(
    "@\u{a3}$\u{a5}\u{e8}\u{e9}\u{f9}\u{ec}\u{f2}\u{c7}\n\u{d8}\u{f8}\r\u{c5}\u{e5}",
    "\u{394}_\u{3a6}\u{393}\u{39b}\u{3a9}\u{3a0}\u{3a8}\u{3a3}",
    "\u{398}\u{39e}\u{c6}\u{e6}\u{df}\u{c9}",
    " !\"#\u{a4}%&'()*+,-./0123456789:;<=>?",
    "\u{a1}ABCDEFGHIJKLMNOPQRSTUVWXYZ\u{c4}\u{d6}\u{d1}\u{dc}\u{a7}",
    "\u{bf}abcdefghijklmnopqrstuvwxyz\u{e4}\u{f6}\u{f1}\u{fc}\u{e0}",
    "\u{0c}^{}\\[~]|\u{20ac}",
);

const NON_GSM_CHARS: &str = "\u{4e2d}\u{43f}\u{e7}\u{eb}\u{1f600}\u{5d0}";

fn gsm_string(max: usize) -> impl Strategy<Value = String> {
    let chars: Vec<char> = GSM_CHARS.chars().collect();
    prop::collection::vec(prop::sample::select(chars), 0..max)
        .prop_map(|cs| cs.into_iter().collect())
}

fn non_gsm_string(max: usize) -> impl Strategy<Value = String> {
    let chars: Vec<char> = GSM_CHARS.chars().chain(NON_GSM_CHARS.chars()).collect();
    let foreign: Vec<char> = NON_GSM_CHARS.chars().collect();
    (
        prop::collection::vec(prop::sample::select(chars), 0..max),
        prop::sample::select(foreign),
        any::<prop::sample::Index>(),
    )
        .prop_map(|(mut cs, c, at)| {
            let pos = at.index(cs.len() + 1);
            cs.insert(pos, c);
            cs.into_iter().collect()
        })
}

#[test]
fn empty_and_plain_ascii_are_gsm() {
    assert!(is_gsm_alphabet_only(""));
    assert!(is_gsm_alphabet_only("Hello World 123"));
    assert!(is_gsm_alphabet_only("Caf\u{e9} \u{c5}ngstr\u{f6}m"));
}

#[test]
fn extension_table_chars_are_gsm() {
    assert!(is_gsm_alphabet_only("[tag]{x}|~^\\\u{20ac}"));
    let tables = GsmTables::get();
    assert_eq!(tables.extension_septet('\u{20ac}'), Some(0x65));
    assert_eq!(tables.extension_septet('['), Some(0x3C));
    assert_eq!(tables.default_septet('@'), Some(0x00));
    assert_eq!(tables.default_septet('A'), Some(0x41));
    assert_eq!(tables.default_septet('\u{e0}'), Some(0x7F));
    assert_eq!(tables.default_septet('['), None);
}

#[test]
fn one_foreign_char_forces_ucs2() {
    assert!(!is_gsm_alphabet_only("Zo\u{eb}"));
    assert!(!is_gsm_alphabet_only("fran\u{e7}ois"));
    assert!(!is_gsm_alphabet_only("Bob \u{4e2d}"));
    assert_eq!(TagEncoding::of("Bob \u{4e2d}"), TagEncoding::Ucs2);
    assert_eq!(tag_units("Bob \u{4e2d}"), 1 + 2 * 5);
    assert_eq!(tag_units("Bob"), 3);
}

#[test]
fn gsm_names_truncate_to_tag_length() {
    assert_eq!(truncate_name("Alexander", 5).as_deref(), Some("Alexa"));
    assert_eq!(truncate_name("Alex", 4), None);
    assert_eq!(truncate_name("Al", 14), None);
}

#[test]
fn ucs2_names_use_half_budget_minus_flag() {
    let name = "\u{41f}\u{440}\u{438}\u{432}\u{435}\u{442} \u{43c}\u{438}\u{440}";
    assert_eq!(
        truncate_name(name, 14).as_deref(),
        Some("\u{41f}\u{440}\u{438}\u{432}\u{435}\u{442}")
    );
    assert_eq!(truncate_name(name, 21), None);
    assert_eq!(truncate_name(name, 20).map(|s| s.chars().count()), Some(9));
}

#[test]
fn unknown_budget_never_truncates() {
    assert_eq!(truncate_name("A very long contact name indeed", 0), None);
    assert_eq!(truncate_name("\u{4e2d}\u{6587}\u{540d}\u{5b57}", 0), None);
}

proptest! {
    #[test]
    fn gsm_only_strings_classify_as_gsm(s in gsm_string(60)) {
        prop_assert!(is_gsm_alphabet_only(&s));
    }

    #[test]
    fn any_foreign_char_flips_classification(s in non_gsm_string(60)) {
        prop_assert!(!is_gsm_alphabet_only(&s));
    }

    #[test]
    fn gsm_truncation_is_prefix_of_tag_length(s in gsm_string(40), max in 1usize..30) {
        let len = s.chars().count();
        match truncate_name(&s, max) {
            None => prop_assert!(len <= max),
            Some(t) => {
                prop_assert!(len > max);
                prop_assert_eq!(t.chars().count(), max);
                prop_assert!(s.starts_with(&t));
            }
        }
    }

    #[test]
    fn ucs2_truncation_is_prefix_of_half_budget(s in non_gsm_string(40), max in 1usize..60) {
        let len = s.chars().count();
        let budget = (max - 1) / 2;
        match truncate_name(&s, max) {
            None => prop_assert!(len <= budget),
            Some(t) => {
                prop_assert!(len > budget);
                prop_assert_eq!(t.chars().count(), budget);
                prop_assert!(s.starts_with(&t));
            }
        }
    }

    #[test]
    fn zero_budget_is_noop(s in non_gsm_string(20)) {
        prop_assert_eq!(truncate_name(&s, 0), None);
    }
}

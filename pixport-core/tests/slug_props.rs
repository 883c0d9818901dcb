//! Property tests for slug derivation.

use pixport_core::slug::slugify;
use proptest::prelude::*;

proptest! {
    #[test]
    fn slugs_have_no_doubled_or_dangling_hyphens(input in "\\PC{0,64}") {
        let slug = slugify(&input);
        prop_assert!(!slug.contains("--"), "doubled hyphen in {slug:?}");
        prop_assert!(!slug.starts_with('-'), "leading hyphen in {slug:?}");
        prop_assert!(!slug.ends_with('-'), "trailing hyphen in {slug:?}");
    }

    #[test]
    fn slugs_are_lowercase_ascii(input in "\\PC{0,64}") {
        let slug = slugify(&input);
        prop_assert!(slug.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-'));
    }

    #[test]
    fn slugify_is_stable_under_reapplication(input in "\\PC{0,64}") {
        let once = slugify(&input);
        prop_assert_eq!(slugify(&once), once);
    }
}

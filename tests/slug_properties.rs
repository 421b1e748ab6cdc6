use proptest::prelude::*;

use doxy_ultra::naming::short_hash;
use doxy_ultra::{page_slug, slugify, EntityKind};

proptest! {
    #[test]
    fn slug_is_url_safe(name in "\\PC{0,40}") {
        let slug = slugify(&name);
        prop_assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'));
        prop_assert!(!slug.contains("--"));
    }

    #[test]
    fn slug_ends_with_name_hash(name in "[a-zA-Z:<> ~_,0-9]{0,30}") {
        let slug = slugify(&name);
        let hash = short_hash(&name);
        prop_assert!(slug.ends_with(&hash));
        prop_assert_eq!(hash.len(), 4);
    }

    #[test]
    fn slug_is_deterministic(name in "\\PC{0,40}") {
        prop_assert_eq!(slugify(&name), slugify(&name));
        prop_assert_eq!(
            page_slug(&EntityKind::Class, &name),
            page_slug(&EntityKind::Class, &name)
        );
    }

    #[test]
    fn case_variants_keep_their_own_hash(name in "[a-z]{1,12}") {
        let upper = name.to_uppercase();
        let (lower_slug, upper_slug) = (slugify(&name), slugify(&upper));
        // Same letters, distinct suffixes unless the hashes collide.
        prop_assert_eq!(&lower_slug[..name.len()], &upper_slug[..name.len()]);
        prop_assert_eq!(lower_slug == upper_slug, short_hash(&name) == short_hash(&upper));
    }

    #[test]
    fn page_slug_prefixes_kind(name in "[a-z][a-z0-9_:]{0,20}") {
        let slug = page_slug(&EntityKind::Namespace, &name);
        let expected = slugify(&name);
        prop_assert!(slug.starts_with("namespace-"));
        prop_assert_eq!(&slug["namespace-".len()..], expected.as_str());
    }
}

#[test]
fn root_page_is_index() {
    assert_eq!(page_slug(&EntityKind::Root, ""), "index");
}

#[test]
fn known_slugs() {
    assert_eq!(slugify("demo::parent"), "demo-parent-dc68");
    assert_eq!(slugify("demo::factorial< 0 >"), "demo-factorial-0-d48f");
    assert_eq!(slugify("include/demo.h"), "include-demo-h-81b3");
    assert_eq!(page_slug(&EntityKind::Define, "MAX"), "define-max-26a4");
}

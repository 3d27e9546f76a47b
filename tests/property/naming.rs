// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Image Naming

use cim_container_infra::domain::{derive_short_name, escape_segment, ImageReference, LogicalId};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}"
}

fn tag() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9.]{0,9}"
}

fn registry_path() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), 0..4)
}

proptest! {
    /// Property: Registry path and tag never leak into the short name
    #[test]
    fn prop_short_name_strips_registry_and_tag(
        path in registry_path(),
        name in segment(),
        tag in prop::option::of(tag()),
    ) {
        let mut reference = path.join("/");
        if !reference.is_empty() {
            reference.push('/');
        }
        reference.push_str(&name);
        if let Some(tag) = &tag {
            reference.push(':');
            reference.push_str(tag);
        }

        prop_assert_eq!(derive_short_name(&reference).unwrap(), name.clone());

        let image = ImageReference::parse(reference.clone()).unwrap();
        prop_assert_eq!(image.short_name(), name.as_str());
        prop_assert_eq!(image.tag(), tag.as_deref());
        prop_assert_eq!(image.as_str(), reference.as_str());
    }

    /// Property: Short names are always valid identifier segments
    #[test]
    fn prop_short_name_is_identifier(path in registry_path(), name in segment()) {
        let mut parts = path;
        parts.push(name);
        let short = derive_short_name(&parts.join("/")).unwrap();
        prop_assert!(LogicalId::new(short).is_ok());
    }

    /// Property: Escaped text is always a valid identifier segment
    #[test]
    fn prop_escaped_segment_is_identifier(text in "\\PC{1,12}") {
        let escaped = escape_segment(&text);
        prop_assert!(!escaped.contains('/'));
        let id = format!("alarm-{escaped}");
        prop_assert!(LogicalId::new(id).is_ok());
    }

    /// Property: Distinct texts never share an escaped segment
    #[test]
    fn prop_escape_is_injective(a in "[ -~]{0,12}", b in "[ -~]{0,12}") {
        prop_assume!(a != b);
        prop_assert_ne!(escape_segment(&a), escape_segment(&b));
    }
}

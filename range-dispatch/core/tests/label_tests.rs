// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod common;

use std::any::type_name;

use common::{ResetTag, TestRange};
use range_dispatch_core::{construct_label, resolve_label, Untagged, WorkTag};

struct RenamedTag;
impl WorkTag for RenamedTag {
    fn name() -> Option<&'static str> {
        Some("renamed")
    }
}

// ============================================================
// Label resolution
// ============================================================

#[test]
fn test_explicit_label_wins() {
    assert_eq!(resolve_label("TestKernelFor", "TestRange", Some("Tag")), "TestKernelFor");
    assert_eq!(construct_label::<TestRange, ResetTag>("TestKernelFor"), "TestKernelFor");
}

#[test]
fn test_empty_label_uses_the_functor_type_name() {
    assert_eq!(resolve_label("", "TestRange", None), "TestRange");
    assert_eq!(
        construct_label::<TestRange, Untagged>(""),
        type_name::<TestRange>()
    );
}

#[test]
fn test_tagged_label_appends_the_tag_name() {
    assert_eq!(resolve_label("", "TestRange", Some("ResetTag")), "TestRange/ResetTag");
    assert_eq!(
        construct_label::<TestRange, ResetTag>(""),
        format!("{}/{}", type_name::<TestRange>(), type_name::<ResetTag>())
    );
    assert_eq!(
        construct_label::<TestRange, RenamedTag>(""),
        format!("{}/renamed", type_name::<TestRange>())
    );
}

#[test]
fn test_untagged_has_no_name() {
    assert_eq!(Untagged::name(), None);
    assert_eq!(ResetTag::name(), Some(type_name::<ResetTag>()));
}

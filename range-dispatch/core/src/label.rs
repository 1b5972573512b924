// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Diagnostic names attached to dispatch spans. They never influence execution.

use crate::WorkTag;

/// Label of a dispatch: `explicit` when non-empty, otherwise the operation's
/// type name followed by `/tag` when a tag is present.
pub fn resolve_label(explicit: &str, operation_type_name: &str, tag_name: Option<&str>) -> String {
    if !explicit.is_empty() {
        return explicit.to_string();
    }
    match tag_name {
        Some(tag) => format!("{}/{}", operation_type_name, tag),
        None => operation_type_name.to_string(),
    }
}

/// [`resolve_label`] with the names taken from the functor and tag types
pub fn construct_label<F: ?Sized, Tag: WorkTag>(explicit: &str) -> String {
    resolve_label(explicit, std::any::type_name::<F>(), Tag::name())
}

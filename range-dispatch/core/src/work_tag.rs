// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Marker type selecting one of several operation bodies hosted by a functor.
///
/// Tags are zero-sized; a functor implements [`ParallelFor`](crate::ParallelFor),
/// [`ParallelReduce`](crate::ParallelReduce) or [`ParallelScan`](crate::ParallelScan)
/// once per tag and the policy's tag picks the body at compile time.
pub trait WorkTag: 'static {
    /// Name appended to synthesized dispatch labels, `None` for untagged work
    fn name() -> Option<&'static str> {
        Some(std::any::type_name::<Self>())
    }
}

/// Default tag of every policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Untagged;

impl WorkTag for Untagged {
    fn name() -> Option<&'static str> {
        None
    }
}

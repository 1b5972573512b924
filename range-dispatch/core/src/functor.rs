// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Untagged, WorkTag};

/// Body invoked once per index by a for-dispatch.
/// Closures `Fn(i64)` implement it for untagged policies.
pub trait ParallelFor<Tag: WorkTag = Untagged>: Sync {
    fn execute(&self, index: i64);
}

impl<F> ParallelFor<Untagged> for F
where
    F: Fn(i64) + Sync,
{
    fn execute(&self, index: i64) {
        self(index)
    }
}

/// Body folding one index into a worker-local partial.
/// The partial must be combined the same way the dispatch's combiner joins partials.
pub trait ParallelReduce<T, Tag: WorkTag = Untagged>: Sync {
    fn reduce(&self, index: i64, partial: &mut T);
}

impl<T, F> ParallelReduce<T, Untagged> for F
where
    F: Fn(i64, &mut T) + Sync,
{
    fn reduce(&self, index: i64, partial: &mut T) {
        self(index, partial)
    }
}

/// Body of an inclusive scan.
///
/// Called with `is_final == false` while a partition accumulates its local total
/// and again with `is_final == true`, in increasing index order, once `running`
/// holds the true inclusive prefix at `index`.
pub trait ParallelScan<T, Tag: WorkTag = Untagged>: Sync {
    fn scan(&self, index: i64, running: &mut T, is_final: bool);
}

impl<T, F> ParallelScan<T, Untagged> for F
where
    F: Fn(i64, &mut T, bool) + Sync,
{
    fn scan(&self, index: i64, running: &mut T, is_final: bool) {
        self(index, running, is_final)
    }
}

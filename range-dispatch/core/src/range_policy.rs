// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::marker::PhantomData;

use crate::{DispatchError, IndexRange, Schedule, Untagged, WorkTag};

/// Index range plus the scheduling knobs of one dispatch.
///
/// Bounds are validated when the policy is dispatched, so an inverted range is
/// reported by the dispatch call itself.
pub struct RangePolicy<Tag: WorkTag = Untagged> {
    begin: i64,
    end: i64,
    schedule: Schedule,
    chunk_size: Option<usize>,
    _tag: PhantomData<fn() -> Tag>,
}

impl RangePolicy<Untagged> {
    /// Untagged, statically scheduled policy over `[begin, end)`
    pub fn new(begin: i64, end: i64) -> Self {
        Self {
            begin,
            end,
            schedule: Schedule::Static,
            chunk_size: None,
            _tag: PhantomData,
        }
    }
}

impl<Tag: WorkTag> RangePolicy<Tag> {
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Fixes the number of indices per chunk.
    /// Without it static work gets one contiguous share per worker and
    /// dynamic work uses the dispatcher's configured chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Same bounds and knobs, dispatched to the functor body bound to `Other`
    pub fn with_tag<Other: WorkTag>(self) -> RangePolicy<Other> {
        RangePolicy {
            begin: self.begin,
            end: self.end,
            schedule: self.schedule,
            chunk_size: self.chunk_size,
            _tag: PhantomData,
        }
    }

    pub fn begin(&self) -> i64 {
        self.begin
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    pub fn chunk_size(&self) -> Option<usize> {
        self.chunk_size
    }

    /// Validated index range of this policy
    pub fn range(&self) -> Result<IndexRange, DispatchError> {
        if self.chunk_size == Some(0) {
            return Err(DispatchError::Configuration(
                "chunk size must be at least 1".to_string(),
            ));
        }
        IndexRange::new(self.begin, self.end)
    }
}

impl<Tag: WorkTag> Clone for RangePolicy<Tag> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Tag: WorkTag> Copy for RangePolicy<Tag> {}

impl<Tag: WorkTag> std::fmt::Debug for RangePolicy<Tag> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangePolicy")
            .field("begin", &self.begin)
            .field("end", &self.end)
            .field("schedule", &self.schedule)
            .field("chunk_size", &self.chunk_size)
            .field("tag", &Tag::name())
            .finish()
    }
}

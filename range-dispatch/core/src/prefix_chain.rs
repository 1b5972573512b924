// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::{Condvar, Mutex, PoisonError};

use crate::abort_signal::AbortSignal;
use crate::Chunk;

/// Lifecycle of one scan partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PartitionState {
    Idle,
    /// Folding the partition's own contributions from the identity
    Accumulating,
    /// Waiting for the inclusive prefix of the preceding partition
    AwaitingOffset,
    /// Re-applying the body with `is_final` set, starting from the received offset
    Finalizing,
    Done,
}

impl PartitionState {
    fn can_advance_to(self, next: PartitionState) -> bool {
        matches!(
            (self, next),
            (PartitionState::Idle, PartitionState::Accumulating)
                | (PartitionState::Accumulating, PartitionState::AwaitingOffset)
                | (PartitionState::AwaitingOffset, PartitionState::Finalizing)
                | (PartitionState::Finalizing, PartitionState::Done)
        )
    }
}

/// One chunk of a scan moving through its [`PartitionState`]s
pub(crate) struct ScanPartition {
    chunk: Chunk,
    state: PartitionState,
}

impl ScanPartition {
    pub(crate) fn new(chunk: Chunk) -> Self {
        Self {
            chunk,
            state: PartitionState::Idle,
        }
    }

    pub(crate) fn chunk(&self) -> Chunk {
        self.chunk
    }

    pub(crate) fn advance(&mut self, next: PartitionState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "scan partition cannot move from {:?} to {:?}",
            self.state,
            next
        );
        tracing::trace!(
            partition = self.chunk.ordinal,
            from = ?self.state,
            to = ?next,
            "scan partition state change"
        );
        self.state = next;
    }
}

/// Hands each partition's inclusive prefix to its successor.
///
/// Partition `k` publishes once it has accumulated and received the prefix of
/// `k - 1`; this is the only synchronization between scan workers.
pub(crate) struct PrefixChain<T> {
    slots: Mutex<Vec<Option<T>>>,
    published: Condvar,
}

impl<T: Clone> PrefixChain<T> {
    pub(crate) fn new(partitions: usize) -> Self {
        Self {
            slots: Mutex::new(vec![None; partitions]),
            published: Condvar::new(),
        }
    }

    /// Exclusive prefix of `partition`: `identity` for the first one, otherwise the
    /// inclusive prefix published by its predecessor. Blocks until that prefix is
    /// available and returns `None` if the dispatch was aborted in the meantime.
    pub(crate) fn exclusive_prefix(
        &self,
        partition: usize,
        identity: T,
        abort: &AbortSignal,
    ) -> Option<T> {
        let Some(predecessor) = partition.checked_sub(1) else {
            return Some(identity);
        };

        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(prefix) = slots.get(predecessor).cloned().flatten() {
                return Some(prefix);
            }
            if abort.is_raised() {
                return None;
            }
            slots = self
                .published
                .wait(slots)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub(crate) fn publish(&self, partition: usize, inclusive: T) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get_mut(partition) {
            *slot = Some(inclusive);
        }
        self.published.notify_all();
    }

    /// Wakes every waiter so it can observe a raised abort signal
    pub(crate) fn abandon(&self) {
        let _slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        self.published.notify_all();
    }

    /// Inclusive prefix of the last partition, i.e. the scan total
    pub(crate) fn into_total(self) -> Option<T> {
        self.slots
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .flatten()
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::IndexRange;

/// A contiguous piece of the dispatch range.
/// `ordinal` is the chunk's position in index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Chunk {
    pub(crate) ordinal: usize,
    pub(crate) range: IndexRange,
}

/// Trait for abstracting how chunks of the range reach the workers
pub(crate) trait WorkSource: Send + Sync {
    /// Number of workers that have something to do
    fn worker_count(&self) -> usize;

    /// Total number of chunks the range is cut into
    fn chunk_count(&self) -> usize;

    /// Next chunk for `worker`, or `None` once it has nothing left.
    /// Every chunk is handed out exactly once, and each worker receives
    /// its chunks in increasing ordinal order.
    fn next_chunk(&self, worker: usize) -> Option<Chunk>;
}

/// Up-front assignment: worker `w` owns chunks `w, w + workers, w + 2 * workers, ...`
pub(crate) struct StaticWorkSource {
    chunks: Vec<IndexRange>,
    workers: usize,
    cursors: Vec<AtomicUsize>,
}

impl StaticWorkSource {
    /// One contiguous share per worker, lengths differing by at most one
    pub(crate) fn balanced(range: IndexRange, concurrency: usize) -> Self {
        let shares = range.split(concurrency);
        let workers = shares.len();
        Self::build(shares, workers)
    }

    /// Chunks of `chunk_size` dealt round-robin to `concurrency` workers
    pub(crate) fn chunked(range: IndexRange, chunk_size: usize, concurrency: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let chunks: Vec<IndexRange> = (0..range.chunk_count(chunk_size))
            .map(|ordinal| range.chunk(ordinal, chunk_size))
            .collect();
        let workers = concurrency.max(1).min(chunks.len());
        Self::build(chunks, workers)
    }

    fn build(chunks: Vec<IndexRange>, workers: usize) -> Self {
        Self {
            chunks,
            workers,
            cursors: (0..workers).map(AtomicUsize::new).collect(),
        }
    }
}

impl WorkSource for StaticWorkSource {
    fn worker_count(&self) -> usize {
        self.workers
    }

    fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    fn next_chunk(&self, worker: usize) -> Option<Chunk> {
        let cursor = self.cursors.get(worker)?;
        let ordinal = cursor.fetch_add(self.workers, Ordering::Relaxed);
        let range = *self.chunks.get(ordinal)?;
        Some(Chunk { ordinal, range })
    }
}

/// On-demand assignment: workers claim the next unclaimed chunk from a shared cursor
pub(crate) struct DynamicWorkSource {
    range: IndexRange,
    chunk_size: usize,
    chunk_count: usize,
    workers: usize,
    next: AtomicUsize,
}

impl DynamicWorkSource {
    pub(crate) fn new(range: IndexRange, chunk_size: usize, concurrency: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let chunk_count = range.chunk_count(chunk_size);
        Self {
            range,
            chunk_size,
            chunk_count,
            workers: concurrency.max(1).min(chunk_count),
            next: AtomicUsize::new(0),
        }
    }
}

impl WorkSource for DynamicWorkSource {
    fn worker_count(&self) -> usize {
        self.workers
    }

    fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    fn next_chunk(&self, _worker: usize) -> Option<Chunk> {
        // Claim work
        let ordinal = self.next.fetch_add(1, Ordering::Relaxed);
        if ordinal >= self.chunk_count {
            return None;
        }
        Some(Chunk {
            ordinal,
            range: self.range.chunk(ordinal, self.chunk_size),
        })
    }
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-worker index counts under uneven per-index cost.
//!
//! The dynamic assertions depend on how the OS schedules the worker threads, so
//! they state a statistical expectation rather than a hard invariant: on a loaded
//! or exotic host a perfectly even split is possible, if very unlikely.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use range_dispatch_core::{current_worker_id, RangeDispatcher, RangePolicy, Schedule};

const N: i64 = 1024;
const CHEAP: u64 = 1;
const COSTLY: u64 = 10_000;

fn cost(index: i64) -> u64 {
    if index < N / 2 {
        CHEAP
    } else {
        COSTLY
    }
}

struct Bookkeeping {
    per_worker: Vec<AtomicUsize>,
    work: Vec<AtomicU64>,
}

impl Bookkeeping {
    fn new(workers: usize) -> Self {
        Self {
            per_worker: (0..workers).map(|_| AtomicUsize::new(0)).collect(),
            work: (0..N).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    fn visit(&self, index: i64) {
        for _ in 0..cost(index) {
            self.work[index as usize].fetch_add(1, Ordering::Relaxed);
        }
        let worker = current_worker_id().expect("body runs on a dispatch worker");
        self.per_worker[worker].fetch_add(1, Ordering::Relaxed);
    }

    fn assert_all_work_done(&self) {
        for (index, done) in self.work.iter().enumerate() {
            assert_eq!(done.load(Ordering::Relaxed), cost(index as i64));
        }
    }

    fn min_max(&self) -> (usize, usize) {
        let counts: Vec<usize> = self
            .per_worker
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .collect();
        assert_eq!(counts.iter().sum::<usize>(), N as usize);
        (
            counts.iter().copied().min().unwrap_or(0),
            counts.iter().copied().max().unwrap_or(0),
        )
    }
}

fn dispatcher() -> RangeDispatcher {
    let dispatcher = RangeDispatcher::with_concurrency(4).unwrap();
    assert!(N > 4 * dispatcher.concurrency() as i64);
    dispatcher
}

// ============================================================
// Dynamic schedule (environment-sensitive)
// ============================================================

#[test]
fn test_dynamic_for_rebalances_uneven_work() {
    let dispatcher = dispatcher();
    let book = Bookkeeping::new(dispatcher.concurrency());
    let policy = RangePolicy::new(0, N).with_schedule(Schedule::Dynamic);

    dispatcher
        .parallel_for("", policy, &|i: i64| book.visit(i))
        .unwrap();

    book.assert_all_work_done();
    let (min, max) = book.min_max();
    assert!(min < max, "expected uneven per-worker counts, got min {} max {}", min, max);
}

#[test]
fn test_dynamic_reduce_rebalances_uneven_work() {
    let dispatcher = dispatcher();
    let book = Bookkeeping::new(dispatcher.concurrency());
    let policy = RangePolicy::new(0, N).with_schedule(Schedule::Dynamic);

    let visited: i64 = dispatcher
        .parallel_sum("", policy, &|i: i64, lsum: &mut i64| {
            book.visit(i);
            *lsum += 1;
        })
        .unwrap();
    assert_eq!(visited, N);

    let errors: i64 = dispatcher
        .parallel_sum("", RangePolicy::new(0, N), &|i: i64, lsum: &mut i64| {
            *lsum += i64::from(book.work[i as usize].load(Ordering::Relaxed) != cost(i));
        })
        .unwrap();
    assert_eq!(errors, 0);

    let (min, max) = book.min_max();
    assert!(min < max, "expected uneven per-worker counts, got min {} max {}", min, max);
}

// ============================================================
// Static schedule
// ============================================================

#[test]
fn test_static_schedule_splits_evenly_regardless_of_cost() {
    let dispatcher = dispatcher();
    let book = Bookkeeping::new(dispatcher.concurrency());

    dispatcher
        .parallel_for("", RangePolicy::new(0, N), &|i: i64| book.visit(i))
        .unwrap();

    book.assert_all_work_done();
    assert_eq!(book.min_max(), (256, 256));
}

#[test]
fn test_worker_id_is_cleared_after_dispatch() {
    let dispatcher = dispatcher();
    assert_eq!(current_worker_id(), None);
    dispatcher
        .parallel_for("", RangePolicy::new(0, 8), &|_: i64| {
            assert!(current_worker_id().is_some());
        })
        .unwrap();
    RangeDispatcher::serial()
        .parallel_for("", RangePolicy::new(0, 8), &|_: i64| {
            assert_eq!(current_worker_id(), Some(0));
        })
        .unwrap();
    assert_eq!(current_worker_id(), None);
}

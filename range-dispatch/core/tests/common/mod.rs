// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use range_dispatch_core::{
    ParallelFor, ParallelReduce, ParallelScan, RangeDispatcher, Schedule, WorkTag,
};

pub const OFFSET: i64 = 13;

pub const SIZES: [usize; 6] = [0, 1, 2, 3, 1000, 1001];

pub const SCHEDULES: [Schedule; 2] = [Schedule::Static, Schedule::Dynamic];

pub struct VerifyInitTag;
impl WorkTag for VerifyInitTag {}

pub struct ResetTag;
impl WorkTag for ResetTag {}

pub struct VerifyResetTag;
impl WorkTag for VerifyResetTag {}

pub struct OffsetTag;
impl WorkTag for OffsetTag {}

pub struct VerifyOffsetTag;
impl WorkTag for VerifyOffsetTag {}

/// One serial dispatcher plus multi-worker ones, independent of the host's core count
pub fn dispatchers() -> Vec<RangeDispatcher> {
    vec![
        RangeDispatcher::serial(),
        RangeDispatcher::with_concurrency(2).unwrap(),
        RangeDispatcher::with_concurrency(4).unwrap(),
    ]
}

/// Functor hosting one body per tag over a flags and a results buffer
pub struct TestRange {
    flags: Vec<AtomicI64>,
    results: Vec<AtomicI64>,
    errors: AtomicUsize,
}

impl TestRange {
    pub fn new(n: usize) -> Self {
        Self {
            flags: (0..n).map(|_| AtomicI64::new(-1)).collect(),
            results: (0..n).map(|_| AtomicI64::new(-1)).collect(),
            errors: AtomicUsize::new(0),
        }
    }

    pub fn n(&self) -> i64 {
        self.flags.len() as i64
    }

    pub fn flags(&self) -> Vec<i64> {
        self.flags.iter().map(|f| f.load(Ordering::Relaxed)).collect()
    }

    pub fn results(&self) -> Vec<i64> {
        self.results.iter().map(|r| r.load(Ordering::Relaxed)).collect()
    }

    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    fn flag(&self, index: i64) -> i64 {
        self.flags[index as usize].load(Ordering::Relaxed)
    }

    fn set_flag(&self, index: i64, value: i64) {
        self.flags[index as usize].store(value, Ordering::Relaxed);
    }

    fn check(&self, ok: bool) {
        if !ok {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl ParallelFor for TestRange {
    fn execute(&self, index: i64) {
        self.set_flag(index, index);
    }
}

impl ParallelFor<VerifyInitTag> for TestRange {
    fn execute(&self, index: i64) {
        self.check(self.flag(index) == index);
    }
}

impl ParallelFor<ResetTag> for TestRange {
    fn execute(&self, index: i64) {
        self.set_flag(index, 2 * self.flag(index));
    }
}

impl ParallelFor<VerifyResetTag> for TestRange {
    fn execute(&self, index: i64) {
        self.check(self.flag(index) == 2 * index);
    }
}

impl ParallelFor<OffsetTag> for TestRange {
    fn execute(&self, index: i64) {
        self.set_flag(index - OFFSET, index);
    }
}

impl ParallelFor<VerifyOffsetTag> for TestRange {
    fn execute(&self, index: i64) {
        self.check(self.flag(index) == index + OFFSET);
    }
}

impl ParallelReduce<i64> for TestRange {
    fn reduce(&self, index: i64, partial: &mut i64) {
        *partial += self.flag(index);
    }
}

impl ParallelReduce<i64, OffsetTag> for TestRange {
    fn reduce(&self, index: i64, partial: &mut i64) {
        *partial += 1 + self.flag(index - OFFSET);
    }
}

impl ParallelScan<i64, OffsetTag> for TestRange {
    fn scan(&self, index: i64, running: &mut i64, is_final: bool) {
        *running += self.flag(index);
        if is_final {
            self.check(*running == index * (index + 1) / 2);
            self.results[index as usize].store(*running, Ordering::Relaxed);
        }
    }
}

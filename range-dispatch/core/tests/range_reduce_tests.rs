// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod common;

use common::{dispatchers, OffsetTag, TestRange, OFFSET, SCHEDULES, SIZES};
use range_dispatch_core::{
    DispatchError, Max, Min, Prod, RangeDispatcher, RangePolicy, Reduction, Schedule, Sum,
};

// ============================================================
// Sums against closed forms
// ============================================================

#[test]
fn test_range_reduce_all_sizes_and_schedules() {
    for dispatcher in dispatchers() {
        for schedule in SCHEDULES {
            for n in SIZES {
                let functor = TestRange::new(n);
                let n = functor.n();
                let policy = RangePolicy::new(0, n).with_schedule(schedule);
                dispatcher.parallel_for("", policy, &functor).unwrap();

                let total: i64 = dispatcher
                    .parallel_sum("TestKernelReduce", policy, &functor)
                    .unwrap();
                assert_eq!(total, n * (n - 1) / 2, "sum(0..{}) under {}", n, schedule);

                let offset_policy = RangePolicy::new(OFFSET, n + OFFSET)
                    .with_schedule(schedule)
                    .with_tag::<OffsetTag>();
                let total: i64 = dispatcher.parallel_sum("", offset_policy, &functor).unwrap();
                assert_eq!(total, n * (n + 1) / 2, "sum(1..={}) under {}", n, schedule);
            }
        }
    }
}

#[test]
fn test_for_then_reduce_end_to_end() {
    let dispatcher = RangeDispatcher::with_concurrency(4).unwrap();
    let functor = TestRange::new(1000);
    let policy = RangePolicy::new(0, 1000);
    dispatcher.parallel_for("", policy, &functor).unwrap();
    let total: i64 = dispatcher.parallel_sum("", policy, &functor).unwrap();
    assert_eq!(total, 499_500);
}

// ============================================================
// Pluggable combiners
// ============================================================

#[test]
fn test_max_reduction_over_doubled_values() {
    let values: Vec<i32> = (0..20).map(|i| i * 2).collect();
    for dispatcher in dispatchers() {
        for schedule in SCHEDULES {
            let policy = RangePolicy::new(0, values.len() as i64).with_schedule(schedule);
            let max = dispatcher
                .parallel_reduce(
                    "Maximum reduce",
                    policy,
                    &|i: i64, max_val: &mut i32| {
                        if *max_val < values[i as usize] {
                            *max_val = values[i as usize];
                        }
                    },
                    Reduction::max(),
                )
                .unwrap();
            assert_eq!(max, 38);
        }
    }
}

#[test]
fn test_min_and_prod_reductions() {
    let dispatcher = RangeDispatcher::with_concurrency(3).unwrap();
    let policy = RangePolicy::new(1, 11).with_schedule(Schedule::Dynamic);

    let min = dispatcher
        .parallel_reduce(
            "",
            policy,
            &|i: i64, m: &mut i64| *m = (*m).min(100 - i),
            Reduction::min(),
        )
        .unwrap();
    assert_eq!(min, 90);

    let factorial = dispatcher
        .parallel_reduce("", policy, &|i: i64, p: &mut u64| *p *= i as u64, Reduction::prod())
        .unwrap();
    assert_eq!(factorial, 3_628_800);
}

#[test]
fn test_result_is_independent_of_chunking() {
    let expected: i64 = (0..777).map(|i: i64| i * i % 97).sum();
    for concurrency in [1, 2, 5, 8] {
        let dispatcher = RangeDispatcher::with_concurrency(concurrency).unwrap();
        for schedule in SCHEDULES {
            for chunk_size in [1, 3, 64, 1000] {
                let policy = RangePolicy::new(0, 777)
                    .with_schedule(schedule)
                    .with_chunk_size(chunk_size);
                let total: i64 = dispatcher
                    .parallel_sum("", policy, &|i: i64, s: &mut i64| *s += i * i % 97)
                    .unwrap();
                assert_eq!(total, expected);
            }
        }
    }
}

#[test]
fn test_empty_range_returns_the_seed() {
    let dispatcher = RangeDispatcher::with_concurrency(2).unwrap();
    let max = dispatcher
        .parallel_reduce(
            "",
            RangePolicy::new(7, 7),
            &|_: i64, _: &mut i32| panic!("body called on an empty range"),
            Reduction::max(),
        )
        .unwrap();
    assert_eq!(max, i32::MIN);
}

#[test]
fn test_float_sum_reduction() {
    let dispatcher = RangeDispatcher::with_concurrency(4).unwrap();
    let total: f64 = dispatcher
        .parallel_sum("", RangePolicy::new(0, 1024), &|_: i64, s: &mut f64| *s += 0.5)
        .unwrap();
    assert_eq!(total, 512.0);
}

// ============================================================
// Seed validation
// ============================================================

#[test]
fn test_seed_must_match_combiner_identity() {
    assert!(Reduction::with_seed(Sum, 0i64).is_ok());
    assert!(Reduction::with_seed(Max, i32::MIN).is_ok());

    let err = Reduction::with_seed(Sum, 5i64).unwrap_err();
    assert!(matches!(err, DispatchError::Configuration(_)));

    let err = Reduction::with_seed(Max, 0i32).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Configuration error: max reduction expects seed {}, got 0", i32::MIN)
    );

    assert!(Reduction::with_seed(Min, 0u8).is_err());
    assert!(Reduction::with_seed(Prod, 0.0f32).is_err());
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Process-wide dispatcher whose worker count is fixed once at start-up.
//!
//! [`initialize`] pins the configuration explicitly; otherwise the first use
//! builds the dispatcher from [`DispatchConfig::from_env`], or a serial one if
//! the environment is invalid.

use std::sync::OnceLock;

use crate::{
    Combiner, DispatchConfig, DispatchError, ParallelFor, ParallelReduce, ParallelScan,
    RangeDispatcher, RangePolicy, ReduceValue, Reduction, WorkTag,
};

static DISPATCHER: OnceLock<RangeDispatcher> = OnceLock::new();

/// Fixes the process-wide dispatcher. Fails if it was already set up,
/// either by an earlier call or by a dispatch that ran first.
pub fn initialize(config: &DispatchConfig) -> Result<(), DispatchError> {
    let dispatcher = RangeDispatcher::new(config)?;
    let concurrency = dispatcher.concurrency();
    DISPATCHER.set(dispatcher).map_err(|_| {
        DispatchError::Configuration("runtime is already initialized".to_string())
    })?;
    tracing::info!(concurrency, "range dispatch runtime initialized");
    Ok(())
}

pub fn is_initialized() -> bool {
    DISPATCHER.get().is_some()
}

/// The process-wide dispatcher
pub fn dispatcher() -> &'static RangeDispatcher {
    DISPATCHER.get_or_init(|| {
        DispatchConfig::from_env()
            .and_then(|config| RangeDispatcher::new(&config))
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to a serial dispatcher");
                RangeDispatcher::serial()
            })
    })
}

/// Worker count of the process-wide dispatcher
pub fn concurrency() -> usize {
    dispatcher().concurrency()
}

pub fn parallel_for<Tag, F>(
    label: &str,
    policy: RangePolicy<Tag>,
    functor: &F,
) -> Result<(), DispatchError>
where
    Tag: WorkTag,
    F: ParallelFor<Tag> + ?Sized,
{
    dispatcher().parallel_for(label, policy, functor)
}

pub fn parallel_reduce<T, C, Tag, F>(
    label: &str,
    policy: RangePolicy<Tag>,
    functor: &F,
    reduction: Reduction<T, C>,
) -> Result<T, DispatchError>
where
    T: PartialEq + std::fmt::Debug + Send,
    C: Combiner<T>,
    Tag: WorkTag,
    F: ParallelReduce<T, Tag> + ?Sized,
{
    dispatcher().parallel_reduce(label, policy, functor, reduction)
}

pub fn parallel_sum<T, Tag, F>(
    label: &str,
    policy: RangePolicy<Tag>,
    functor: &F,
) -> Result<T, DispatchError>
where
    T: ReduceValue,
    Tag: WorkTag,
    F: ParallelReduce<T, Tag> + ?Sized,
{
    dispatcher().parallel_sum(label, policy, functor)
}

pub fn parallel_scan<T, Tag, F>(
    label: &str,
    policy: RangePolicy<Tag>,
    functor: &F,
) -> Result<T, DispatchError>
where
    T: ReduceValue,
    Tag: WorkTag,
    F: ParallelScan<T, Tag> + ?Sized,
{
    dispatcher().parallel_scan(label, policy, functor)
}

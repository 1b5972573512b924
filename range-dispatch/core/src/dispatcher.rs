// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use tracing::Span;

use crate::abort_signal::AbortSignal;
use crate::label::construct_label;
use crate::prefix_chain::{PartitionState, PrefixChain, ScanPartition};
use crate::worker_pool::run_workers;
use crate::{
    Combiner, DispatchConfig, DispatchError, DynamicWorkSource, IndexRange, ParallelFor,
    ParallelReduce, ParallelScan, RangePolicy, ReduceValue, Reduction, Schedule,
    StaticWorkSource, Sum, WorkSource, WorkTag,
};

/// Runs for, reduce and scan bodies once per index of a range across a fixed
/// number of workers.
///
/// Worker threads are scoped to each dispatch call; the dispatcher itself only
/// holds its configuration and can be shared freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeDispatcher {
    concurrency: usize,
    dynamic_chunk_size: usize,
}

impl RangeDispatcher {
    pub fn new(config: &DispatchConfig) -> Result<Self, DispatchError> {
        config.validate()?;
        Ok(Self {
            concurrency: config.resolved_concurrency()?,
            dynamic_chunk_size: config.dynamic_chunk_size,
        })
    }

    pub fn with_concurrency(concurrency: usize) -> Result<Self, DispatchError> {
        Self::new(&DispatchConfig::default().with_concurrency(concurrency))
    }

    /// Single worker running everything on the calling thread
    pub fn serial() -> Self {
        Self {
            concurrency: 1,
            dynamic_chunk_size: 1,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn dynamic_chunk_size(&self) -> usize {
        self.dynamic_chunk_size
    }

    /// Applies `functor` to every index of the policy's range exactly once, in no
    /// particular order.
    pub fn parallel_for<Tag, F>(
        &self,
        label: &str,
        policy: RangePolicy<Tag>,
        functor: &F,
    ) -> Result<(), DispatchError>
    where
        Tag: WorkTag,
        F: ParallelFor<Tag> + ?Sized,
    {
        let range = policy.range()?;
        let label = construct_label::<F, Tag>(label);
        let span = dispatch_span("parallel_for", &label, &range, policy.schedule());
        let _entered = span.enter();
        if range.is_empty() {
            return Ok(());
        }

        let source = self.work_source(range, &policy, &span);
        let abort = AbortSignal::new();
        run_workers(source.worker_count(), &span, &abort, &|| {}, |worker| {
            while let Some(chunk) = source.next_chunk(worker) {
                if abort.is_raised() {
                    return;
                }
                for index in chunk.range {
                    functor.execute(index);
                }
            }
        });
        Ok(())
    }

    /// Folds every index into worker-local partials seeded with the combiner
    /// identity, then joins the partials in worker order into the reduction seed.
    pub fn parallel_reduce<T, C, Tag, F>(
        &self,
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
        let range = policy.range()?;
        let label = construct_label::<F, Tag>(label);
        let span = dispatch_span("parallel_reduce", &label, &range, policy.schedule());
        let _entered = span.enter();
        let (combiner, seed) = reduction.into_parts();
        if range.is_empty() {
            return Ok(seed);
        }

        let source = self.work_source(range, &policy, &span);
        let abort = AbortSignal::new();
        let partials = run_workers(source.worker_count(), &span, &abort, &|| {}, |worker| {
            let mut partial = combiner.identity();
            while let Some(chunk) = source.next_chunk(worker) {
                if abort.is_raised() {
                    break;
                }
                for index in chunk.range {
                    functor.reduce(index, &mut partial);
                }
            }
            partial
        });

        let mut total = seed;
        for partial in partials {
            combiner.join(&mut total, partial);
        }
        tracing::debug!(result = ?total, "reduction finished");
        Ok(total)
    }

    /// [`parallel_reduce`](Self::parallel_reduce) with a [`Sum`] reduction
    pub fn parallel_sum<T, Tag, F>(
        &self,
        label: &str,
        policy: RangePolicy<Tag>,
        functor: &F,
    ) -> Result<T, DispatchError>
    where
        T: ReduceValue,
        Tag: WorkTag,
        F: ParallelReduce<T, Tag> + ?Sized,
    {
        self.parallel_reduce(label, policy, functor, Reduction::sum())
    }

    /// Inclusive sum scan over index order; returns the total over the whole range
    pub fn parallel_scan<T, Tag, F>(
        &self,
        label: &str,
        policy: RangePolicy<Tag>,
        functor: &F,
    ) -> Result<T, DispatchError>
    where
        T: ReduceValue,
        Tag: WorkTag,
        F: ParallelScan<T, Tag> + ?Sized,
    {
        self.parallel_scan_with(label, policy, functor, Sum)
    }

    /// Inclusive scan whose partition prefixes are joined with `combiner`.
    ///
    /// Each partition accumulates from the identity, waits for its predecessor's
    /// inclusive prefix, publishes its own and then replays its indices in order
    /// with `is_final` set. Returns the total over the whole range, or the
    /// identity for an empty range.
    pub fn parallel_scan_with<T, C, Tag, F>(
        &self,
        label: &str,
        policy: RangePolicy<Tag>,
        functor: &F,
        combiner: C,
    ) -> Result<T, DispatchError>
    where
        T: Clone + std::fmt::Debug + Send,
        C: Combiner<T>,
        Tag: WorkTag,
        F: ParallelScan<T, Tag> + ?Sized,
    {
        let range = policy.range()?;
        let label = construct_label::<F, Tag>(label);
        let span = dispatch_span("parallel_scan", &label, &range, policy.schedule());
        let _entered = span.enter();
        if range.is_empty() {
            return Ok(combiner.identity());
        }

        let source = self.work_source(range, &policy, &span);
        let chain = PrefixChain::new(source.chunk_count());
        let abort = AbortSignal::new();
        run_workers(
            source.worker_count(),
            &span,
            &abort,
            &|| chain.abandon(),
            |worker| {
                while let Some(chunk) = source.next_chunk(worker) {
                    if abort.is_raised() {
                        return;
                    }
                    let mut partition = ScanPartition::new(chunk);

                    partition.advance(PartitionState::Accumulating);
                    let mut local = combiner.identity();
                    for index in chunk.range {
                        functor.scan(index, &mut local, false);
                    }

                    partition.advance(PartitionState::AwaitingOffset);
                    let Some(offset) =
                        chain.exclusive_prefix(chunk.ordinal, combiner.identity(), &abort)
                    else {
                        return;
                    };
                    let mut inclusive = offset.clone();
                    combiner.join(&mut inclusive, local);
                    chain.publish(partition.chunk().ordinal, inclusive);

                    partition.advance(PartitionState::Finalizing);
                    let mut running = offset;
                    for index in chunk.range {
                        functor.scan(index, &mut running, true);
                    }
                    partition.advance(PartitionState::Done);
                }
            },
        );

        let total = chain.into_total().unwrap_or_else(|| combiner.identity());
        tracing::debug!(total = ?total, "scan finished");
        Ok(total)
    }

    fn work_source<Tag: WorkTag>(
        &self,
        range: IndexRange,
        policy: &RangePolicy<Tag>,
        span: &Span,
    ) -> Box<dyn WorkSource> {
        let source: Box<dyn WorkSource> = match (policy.schedule(), policy.chunk_size()) {
            (Schedule::Static, None) => {
                Box::new(StaticWorkSource::balanced(range, self.concurrency))
            }
            (Schedule::Static, Some(chunk_size)) => Box::new(StaticWorkSource::chunked(
                range,
                chunk_size,
                self.concurrency,
            )),
            (Schedule::Dynamic, chunk_size) => Box::new(DynamicWorkSource::new(
                range,
                chunk_size.unwrap_or(self.dynamic_chunk_size),
                self.concurrency,
            )),
        };
        span.record("workers", source.worker_count());
        source
    }
}

fn dispatch_span(mode: &'static str, label: &str, range: &IndexRange, schedule: Schedule) -> Span {
    tracing::debug_span!(
        "dispatch",
        mode,
        label = %label,
        begin = range.begin(),
        end = range.end(),
        schedule = %schedule,
        workers = tracing::field::Empty,
    )
}

// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Bounds-checked for, reduce and scan dispatch over `[begin, end)` index ranges.
//!
//! Chunking and the scan hand-off are internal to [`RangeDispatcher`]:
//!
//! ```compile_fail
//! use range_dispatch_core::WorkSource;
//! ```
//!
//! ```compile_fail
//! use range_dispatch_core::PartitionState;
//! ```

mod abort_signal;

mod combiner;
pub use combiner::{Combiner, Max, Min, Prod, ReduceValue, Sum};

mod dispatch_config;
pub use dispatch_config::{DispatchConfig, THREADS_ENV_VAR};

mod dispatch_error;
pub use dispatch_error::DispatchError;

mod dispatcher;
pub use dispatcher::RangeDispatcher;

mod functor;
pub use functor::{ParallelFor, ParallelReduce, ParallelScan};

mod index_range;
pub use index_range::IndexRange;

pub mod label;
pub use label::{construct_label, resolve_label};

mod prefix_chain;
pub(crate) use prefix_chain::PartitionState;

mod range_policy;
pub use range_policy::RangePolicy;

mod reduction;
pub use reduction::Reduction;

pub mod runtime;
pub use runtime::{concurrency, initialize};

mod schedule;
pub use schedule::Schedule;

mod work_source;
pub(crate) use work_source::{Chunk, DynamicWorkSource, StaticWorkSource, WorkSource};

mod work_tag;
pub use work_tag::{Untagged, WorkTag};

mod worker_pool;
pub use worker_pool::current_worker_id;

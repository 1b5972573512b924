// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, PoisonError};
use std::thread;

use tracing::Span;

use crate::abort_signal::AbortSignal;

thread_local! {
    static WORKER_ID: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Id of the dispatch worker running on this thread, `None` outside a dispatch.
/// Ids are dense in `0..workers` for the current dispatch.
pub fn current_worker_id() -> Option<usize> {
    WORKER_ID.with(Cell::get)
}

/// Restores the previous worker id when dropped, so nested inline dispatches unwind cleanly
struct WorkerIdGuard {
    previous: Option<usize>,
}

impl WorkerIdGuard {
    fn enter(id: usize) -> Self {
        let previous = WORKER_ID.with(|cell| cell.replace(Some(id)));
        Self { previous }
    }
}

impl Drop for WorkerIdGuard {
    fn drop(&mut self) {
        WORKER_ID.with(|cell| cell.set(self.previous));
    }
}

type PanicPayload = Box<dyn Any + Send + 'static>;

/// Keeps the earliest failure, later ones are dropped
fn record_failure(slot: &Mutex<Option<PanicPayload>>, payload: PanicPayload) {
    let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if slot.is_none() {
        *slot = Some(payload);
    }
}

/// Runs `body` once per worker id in `0..workers` and returns the results in worker order.
///
/// A single worker runs inline on the calling thread. Otherwise workers are scoped
/// threads joined before returning. The first panic raises `abort`, calls
/// `on_abort` so blocked siblings can bail out, and is resumed on the caller once
/// every worker has stopped.
pub(crate) fn run_workers<R, F>(
    workers: usize,
    span: &Span,
    abort: &AbortSignal,
    on_abort: &(dyn Fn() + Sync),
    body: F,
) -> Vec<R>
where
    R: Send,
    F: Fn(usize) -> R + Sync,
{
    if workers <= 1 {
        let _guard = WorkerIdGuard::enter(0);
        return vec![body(0)];
    }

    let first_failure: Mutex<Option<PanicPayload>> = Mutex::new(None);

    let outcomes: Vec<Option<R>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|id| {
                let body = &body;
                let first_failure = &first_failure;
                scope.spawn(move || {
                    let _entered = span.enter();
                    let _guard = WorkerIdGuard::enter(id);
                    match panic::catch_unwind(AssertUnwindSafe(|| body(id))) {
                        Ok(result) => Some(result),
                        Err(payload) => {
                            tracing::debug!(worker = id, "worker failed, aborting dispatch");
                            abort.raise();
                            on_abort();
                            record_failure(first_failure, payload);
                            None
                        }
                    }
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(outcome) => outcome,
                Err(payload) => {
                    record_failure(&first_failure, payload);
                    None
                }
            })
            .collect()
    });

    let failure = first_failure
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(payload) = failure {
        panic::resume_unwind(payload);
    }

    outcomes.into_iter().flatten().collect()
}

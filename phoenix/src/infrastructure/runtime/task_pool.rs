// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Experiment Task Pool
//!
//! One cancellable task per active experiment, generalized from the
//! teacher's [`crate::infrastructure::runtime`]-style global resource
//! governance: where the teacher's `GlobalResourceManager` caps concurrent
//! CPU/IO work with semaphores, this pool tracks *which* experiment owns
//! which in-flight task so a `stop_experiment` call can cancel exactly one
//! of them without touching the others.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use phoenix_domain::value_objects::ExperimentId;

struct TaskHandle {
    join: JoinHandle<()>,
    cancel: CancellationToken,
}

/// Tracks at most one in-flight task per experiment. Spawning a new task for
/// an experiment that already has one cancels and aborts the old one first
/// — this only happens across a process restart or a scheduler retry, never
/// concurrently with itself, since the state machine's conditional updates
/// ensure at most one side-effect chain is actually doing useful work.
pub struct ExperimentTaskPool {
    tasks: Mutex<HashMap<ExperimentId, TaskHandle>>,
}

impl ExperimentTaskPool {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { tasks: Mutex::new(HashMap::new()) })
    }

    /// Spawns the future returned by `make_future` under a fresh
    /// [`CancellationToken`], which is also handed to `make_future` itself
    /// so the task can observe cancellation at its own suspension points.
    /// The task is removed from the pool automatically once it completes.
    pub fn spawn<F, Fut>(self: &Arc<Self>, id: ExperimentId, make_future: F) -> CancellationToken
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let fut = make_future(cancel.clone());
        let pool = Arc::clone(self);
        let join = tokio::spawn(async move {
            fut.await;
            pool.tasks.lock().unwrap().remove(&id);
        });

        let mut tasks = self.tasks.lock().unwrap();
        if let Some(previous) = tasks.insert(id, TaskHandle { join, cancel: cancel.clone() }) {
            previous.cancel.cancel();
            previous.join.abort();
        }
        cancel
    }

    /// Cancels and removes the in-flight task for `id`, if any.
    pub fn cancel(&self, id: ExperimentId) {
        if let Some(task) = self.tasks.lock().unwrap().remove(&id) {
            task.cancel.cancel();
            task.join.abort();
        }
    }

    /// `true` if this process already has a task driving `id`'s side
    /// effects — the scheduler uses this to avoid spawning a duplicate
    /// chain for an experiment it is already reconciling.
    pub fn is_active(&self, id: ExperimentId) -> bool {
        self.tasks.lock().unwrap().contains_key(&id)
    }

    pub fn active_count(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }
}

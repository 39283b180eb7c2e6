// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The cross-thread task queue between the host thread and the render thread.
//!
//! [`task_queue`] returns the two ends of a FIFO queue. The host side
//! ([`TaskSender`]) appends closures without ever blocking on render work;
//! the render side ([`TaskReceiver`]) drains everything that is queued at the
//! start of a frame. Tasks queued while a drain is running wait for the next
//! drain, so a task never runs re-entrantly inside the drain that queued it.
//!
//! Both ends share one mutex. It is held only to push a task or to swap the
//! whole batch out, never while a task runs.

use std::any::Any;
use std::fmt;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A unit of work captured on the host thread for the render thread.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

type Shared = Arc<Mutex<Vec<Task>>>;

/// Creates a connected sender/receiver pair.
pub fn task_queue() -> (TaskSender, TaskReceiver) {
    let shared: Shared = Arc::new(Mutex::new(Vec::new()));
    (
        TaskSender {
            queue: Arc::clone(&shared),
        },
        TaskReceiver { queue: shared },
    )
}

fn lock(queue: &Mutex<Vec<Task>>) -> MutexGuard<'_, Vec<Task>> {
    // A task never runs under the lock, so a poisoned queue still holds
    // intact tasks.
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The host-thread end of the queue.
pub struct TaskSender {
    queue: Shared,
}

impl TaskSender {
    /// Appends `task` to the tail of the queue and returns immediately.
    pub fn enqueue<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        lock(&self.queue).push(Box::new(task));
        log::trace!("Task queued for the render thread.");
    }

    /// Number of tasks waiting for the next drain.
    pub fn pending(&self) -> usize {
        lock(&self.queue).len()
    }
}

impl fmt::Debug for TaskSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSender")
            .field("pending", &self.pending())
            .finish()
    }
}

/// The render-thread end of the queue.
pub struct TaskReceiver {
    queue: Shared,
}

impl TaskReceiver {
    /// Runs every task that was queued when the call started, in queue order,
    /// and returns how many ran.
    ///
    /// A panicking task is logged and the remaining tasks still run.
    pub fn drain(&self) -> usize {
        let batch = mem::take(&mut *lock(&self.queue));
        let count = batch.len();
        for task in batch {
            contain("Render task", task);
        }
        if count > 0 {
            log::trace!("Drained {count} render task(s).");
        }
        count
    }

    /// Number of tasks waiting for the next drain.
    pub fn pending(&self) -> usize {
        lock(&self.queue).len()
    }
}

impl fmt::Debug for TaskReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskReceiver")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Runs `f` and logs a panic instead of unwinding. `None` if it panicked.
pub(crate) fn contain<R>(what: &str, f: impl FnOnce() -> R) -> Option<R> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            log::error!("{what} panicked: {}", panic_message(&*payload));
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}

//! Frame-driven delayed tasks
//!
//! Delays are counted in simulation frames and only advance when the step
//! runs, so pausing freezes them. Leaving a run cancels everything pending.

use serde::{Deserialize, Serialize};

/// Cancellation handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskHandle(u32);

#[derive(Debug, Clone)]
struct Pending<T> {
    handle: TaskHandle,
    frames_left: u32,
    task: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    next_id: u32,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            pending: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to fire on the `delay`-th call to `advance` (0 = next call)
    pub fn schedule(&mut self, delay: u32, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            frames_left: delay.max(1),
            task,
        });
        handle
    }

    /// Returns false if the task already fired or was cancelled
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        self.pending.len() != before
    }

    /// Drop every pending task; returns how many were dropped
    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Count one frame down and return due tasks in scheduling order
    pub fn advance(&mut self) -> Vec<(TaskHandle, T)> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            let p = &mut self.pending[i];
            p.frames_left -= 1;
            if p.frames_left == 0 {
                let p = self.pending.remove(i);
                due.push((p.handle, p.task));
            } else {
                i += 1;
            }
        }
        due
    }
}

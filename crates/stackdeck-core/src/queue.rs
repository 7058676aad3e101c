//! Serial task queue: at most one card action is mid-flight at a time.
//!
//! A "task" here is a whole logical action — swipe-out, backlog append,
//! control-bar press — whose lifetime spans an asynchronous host animation,
//! not just a function call. The queue therefore does not consider a task
//! done when its body returns; the host must call
//! [`mark_current_task_finished`](TaskQueue::mark_current_task_finished)
//! once its animation/distribution callback fires.
//!
//! Design:
//! - The mutex guards the pending list and the in-flight flag only. Task
//!   bodies always run outside the lock, in the caller's context; the host
//!   drives the queue from its single UI-affinity thread.
//! - Submission is allowed from any thread. Three rapid button presses
//!   become three queued tasks, not three overlapping animations.

use std::collections::VecDeque;
use std::sync::Mutex;

use tracing::debug;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct QueueState {
    pending: VecDeque<Task>,
    /// True while a task is mid-flight (body ran, finish signal not yet seen).
    in_flight: bool,
}

impl QueueState {
    /// Take the next task to run, if the queue is idle and non-empty.
    fn next_runnable(&mut self) -> Option<Task> {
        if self.in_flight {
            return None;
        }
        let task = self.pending.pop_front()?;
        self.in_flight = true;
        Some(task)
    }
}

#[derive(Default)]
pub struct TaskQueue {
    state: Mutex<QueueState>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task; if nothing is mid-flight, run it immediately.
    pub fn enqueue(&self, task: impl FnOnce() + Send + 'static) {
        let runnable = {
            let mut state = self.state.lock().expect("task queue lock poisoned");
            state.pending.push_back(Box::new(task));
            state.next_runnable()
        };
        if let Some(task) = runnable {
            task();
        }
    }

    /// Host signal that the current task's animation/distribution finished.
    ///
    /// Starts the next pending task, if any. Calling this with nothing
    /// mid-flight and nothing pending is a no-op, not an error.
    pub fn mark_current_task_finished(&self) {
        let runnable = {
            let mut state = self.state.lock().expect("task queue lock poisoned");
            state.in_flight = false;
            state.next_runnable()
        };
        if let Some(task) = runnable {
            task();
        }
    }

    /// Discard all pending tasks and return to idle. Used when the deck
    /// drains, so stale queued actions never fire against an empty deck.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("task queue lock poisoned");
        let dropped = state.pending.len();
        if dropped > 0 {
            debug!(dropped, "task queue reset discarded pending tasks");
        }
        state.pending.clear();
        state.in_flight = false;
    }

    pub fn pending_count(&self) -> usize {
        self.state
            .lock()
            .expect("task queue lock poisoned")
            .pending
            .len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter_task(log: &Arc<Mutex<Vec<usize>>>, n: usize) -> impl FnOnce() + Send + 'static {
        let log = Arc::clone(log);
        move || log.lock().unwrap().push(n)
    }

    #[test]
    fn only_the_first_task_runs_until_finished_is_signaled() {
        let queue = TaskQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        queue.enqueue(counter_task(&log, 1));
        queue.enqueue(counter_task(&log, 2));
        queue.enqueue(counter_task(&log, 3));
        assert_eq!(*log.lock().unwrap(), vec![1]);

        queue.mark_current_task_finished();
        assert_eq!(*log.lock().unwrap(), vec![1, 2]);

        queue.mark_current_task_finished();
        queue.mark_current_task_finished();
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn finished_signal_with_empty_queue_is_a_no_op() {
        let queue = TaskQueue::new();
        queue.mark_current_task_finished();
        queue.mark_current_task_finished();
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn reset_discards_pending_tasks() {
        let queue = TaskQueue::new();
        let ran = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let ran = Arc::clone(&ran);
            queue.enqueue(move || {
                ran.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(ran.load(Ordering::SeqCst), 1); // head ran, rest queued

        queue.reset();
        queue.mark_current_task_finished();
        assert_eq!(ran.load(Ordering::SeqCst), 1); // discarded tasks never fire
    }

    #[test]
    fn a_task_may_finish_itself_synchronously() {
        // Refresh-style tasks complete inside their own body.
        let queue = Arc::new(TaskQueue::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        let inner_queue = Arc::clone(&queue);
        let inner_log = Arc::clone(&log);
        queue.enqueue(move || {
            inner_log.lock().unwrap().push("refresh");
            inner_queue.mark_current_task_finished();
        });
        queue.enqueue(counter_task_str(&log, "swipe"));

        assert_eq!(*log.lock().unwrap(), vec!["refresh", "swipe"]);
    }

    fn counter_task_str(
        log: &Arc<Mutex<Vec<&'static str>>>,
        s: &'static str,
    ) -> impl FnOnce() + Send + 'static {
        let log = Arc::clone(log);
        move || log.lock().unwrap().push(s)
    }

    #[test]
    fn submissions_from_other_threads_are_serialized() {
        let queue = Arc::new(TaskQueue::new());
        let running = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let queue = Arc::clone(&queue);
                let running = Arc::clone(&running);
                let max_seen = Arc::clone(&max_seen);
                std::thread::spawn(move || {
                    let r = Arc::clone(&running);
                    let m = Arc::clone(&max_seen);
                    let q = Arc::clone(&queue);
                    queue.enqueue(move || {
                        let now = r.fetch_add(1, Ordering::SeqCst) + 1;
                        m.fetch_max(now, Ordering::SeqCst);
                        r.fetch_sub(1, Ordering::SeqCst);
                        q.mark_current_task_finished();
                    });
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1); // never overlapped
    }
}

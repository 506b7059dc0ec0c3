use std::collections::VecDeque;
use std::sync::Mutex;

/// A boxed one-shot job posted to a notify queue.
pub type Job = Box<dyn FnOnce() + Send>;

/// Destination for the completion step of a finished load.
///
/// The worker thread posts the completion here instead of running it in
/// place, so callers with an event loop can marshal it back onto the context
/// that started the load.
pub trait NotifyQueue: Send + Sync {
    /// Enqueue (or run) `job`.
    fn post(&self, job: Job);
}

/// Runs posted jobs immediately on the posting thread.
///
/// The default for callers without a home event loop; with it, the completion
/// step runs on the worker thread just before it exits.
#[derive(Debug, Default)]
pub struct InlineQueue;

impl NotifyQueue for InlineQueue {
    fn post(&self, job: Job) {
        job();
    }
}

/// A FIFO of pending jobs drained by the owning thread.
///
/// Post from any thread; call [`run_pending`](TaskQueue::run_pending) from the
/// home context (e.g. once per UI tick) to run whatever has accumulated.
#[derive(Default)]
pub struct TaskQueue {
    jobs: Mutex<VecDeque<Job>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every job currently queued, in posting order.
    ///
    /// Jobs run outside the queue lock, so a job may itself post. Returns the
    /// number of jobs run.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let job = {
                let mut jobs = self.jobs.lock().expect("task queue mutex poisoned");
                jobs.pop_front()
            };
            match job {
                Some(job) => {
                    job();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Number of jobs waiting to run.
    pub fn pending(&self) -> usize {
        self.jobs.lock().expect("task queue mutex poisoned").len()
    }
}

impl NotifyQueue for TaskQueue {
    fn post(&self, job: Job) {
        self.jobs
            .lock()
            .expect("task queue mutex poisoned")
            .push_back(job);
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{InlineQueue, NotifyQueue, TaskQueue};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn inline_queue_runs_on_post() {
        let ran = Arc::new(AtomicUsize::new(0));
        let ran2 = Arc::clone(&ran);
        InlineQueue.post(Box::new(move || {
            ran2.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn task_queue_defers_until_drained() {
        let queue = TaskQueue::new();
        let ran = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let ran = Arc::clone(&ran);
            queue.post(Box::new(move || {
                ran.fetch_add(1, Ordering::SeqCst);
            }));
        }
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert_eq!(queue.pending(), 3);

        assert_eq!(queue.run_pending(), 3);
        assert_eq!(ran.load(Ordering::SeqCst), 3);
        assert_eq!(queue.run_pending(), 0);
    }

    #[test]
    fn task_queue_runs_in_posting_order() {
        let queue = TaskQueue::new();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        for i in 0..3 {
            let order = Arc::clone(&order);
            queue.post(Box::new(move || {
                order.lock().unwrap().push(i);
            }));
        }
        queue.run_pending();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }
}

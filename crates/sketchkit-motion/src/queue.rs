//! Single-flight motion job queue
//!
//! A long-lived worker thread takes jobs off an unbounded FIFO channel. Each
//! job runs on its own execution thread, which the worker joins before it
//! dequeues the next job, so at most one job moves the motors at any time.
//!
//! Job failures and panics are caught at the worker boundary and logged; the
//! worker keeps serving the queue.

use crate::job::{CancellationToken, Job, JobContext};
use parking_lot::{Condvar, Mutex};
use sketchkit_core::JobError;
use std::any::Any;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Queue timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionQueueConfig {
    /// How long the worker blocks on an empty queue before re-checking for shutdown
    pub poll_interval: Duration,
    /// How long [`MotionQueue::stop_job`] waits for the running job to finish
    pub stop_timeout: Duration,
}

impl Default for MotionQueueConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            stop_timeout: Duration::from_secs(5),
        }
    }
}

/// Signalled once when a job's execution thread ends
#[derive(Debug, Default)]
struct Completion {
    done: Mutex<bool>,
    cv: Condvar,
}

impl Completion {
    fn finish(&self) {
        *self.done.lock() = true;
        self.cv.notify_all();
    }

    fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut done = self.done.lock();
        if !*done {
            self.cv.wait_while_for(&mut done, |done| !*done, timeout);
        }
        *done
    }
}

/// Marks completion even when the job panics
struct CompletionGuard(Arc<Completion>);

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.0.finish();
    }
}

#[derive(Debug)]
struct RunningJob {
    description: String,
    token: CancellationToken,
    completion: Arc<Completion>,
}

#[derive(Debug, Default)]
struct QueueState {
    active: bool,
    current: Option<RunningJob>,
}

struct Shared {
    config: MotionQueueConfig,
    state: Mutex<QueueState>,
    shutdown: AtomicBool,
    pending: AtomicUsize,
}

/// FIFO job scheduler with at most one active job
pub struct MotionQueue {
    shared: Arc<Shared>,
    sender: Mutex<Option<Sender<Box<dyn Job>>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_done: Arc<Completion>,
}

impl std::fmt::Debug for MotionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionQueue")
            .field("config", &self.shared.config)
            .field("active", &self.is_job_active())
            .field("pending", &self.pending_jobs())
            .finish()
    }
}

impl Default for MotionQueue {
    fn default() -> Self {
        Self::new(MotionQueueConfig::default())
    }
}

impl MotionQueue {
    /// Start the worker thread
    pub fn new(config: MotionQueueConfig) -> Self {
        let shared = Arc::new(Shared {
            config,
            state: Mutex::new(QueueState::default()),
            shutdown: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
        });
        let (sender, receiver) = mpsc::channel::<Box<dyn Job>>();

        let worker_shared = Arc::clone(&shared);
        let worker_done = Arc::new(Completion::default());
        let done_guard = CompletionGuard(Arc::clone(&worker_done));
        let worker = thread::Builder::new()
            .name("motion-queue".to_string())
            .spawn(move || {
                let _done = done_guard;
                while !worker_shared.shutdown.load(Ordering::SeqCst) {
                    match receiver.recv_timeout(worker_shared.config.poll_interval) {
                        Ok(job) => {
                            if worker_shared.shutdown.load(Ordering::SeqCst) {
                                drop_job(&worker_shared, job);
                                break;
                            }
                            run_job(&worker_shared, job);
                        }
                        Err(RecvTimeoutError::Timeout) => continue,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                // Ends once shutdown has dropped the sender.
                for job in receiver.iter() {
                    drop_job(&worker_shared, job);
                }
                tracing::debug!("Motion queue worker stopped");
            });

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!("Failed to start motion queue worker: {}", e);
                shared.shutdown.store(true, Ordering::SeqCst);
                None
            }
        };

        Self {
            shared,
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(worker),
            worker_done,
        }
    }

    /// Queue timing in use
    pub fn config(&self) -> MotionQueueConfig {
        self.shared.config
    }

    /// Append a job. Returns `false` once the queue has been shut down.
    pub fn queue_job(&self, job: Box<dyn Job>) -> bool {
        if self.shared.shutdown.load(Ordering::SeqCst) {
            tracing::warn!("Rejecting job after shutdown: {}", job.description());
            return false;
        }

        let guard = self.sender.lock();
        let Some(sender) = guard.as_ref() else {
            return false;
        };

        let description = job.description();
        self.shared.pending.fetch_add(1, Ordering::SeqCst);
        match sender.send(job) {
            Ok(()) => {
                tracing::info!("Job queued: {}", description);
                true
            }
            Err(_) => {
                self.shared.pending.fetch_sub(1, Ordering::SeqCst);
                tracing::warn!("Motion queue worker is gone, dropping job: {}", description);
                false
            }
        }
    }

    /// Whether a job is currently executing
    pub fn is_job_active(&self) -> bool {
        self.shared.state.lock().active
    }

    /// Description of the executing job, if any
    pub fn current_job(&self) -> Option<String> {
        self.shared
            .state
            .lock()
            .current
            .as_ref()
            .map(|job| job.description.clone())
    }

    /// Jobs waiting behind the active one
    pub fn pending_jobs(&self) -> usize {
        self.shared.pending.load(Ordering::SeqCst)
    }

    /// Ask the running job to stop and wait for it, bounded by the stop timeout.
    ///
    /// Returns `true` when no job is running afterwards. Queued jobs are not
    /// affected.
    pub fn stop_job(&self) -> bool {
        let running = {
            let mut state = self.shared.state.lock();
            state.active = false;
            state.current.as_ref().map(|job| {
                tracing::info!("Stopping job: {}", job.description);
                job.token.cancel();
                Arc::clone(&job.completion)
            })
        };

        match running {
            Some(completion) => {
                let finished = completion.wait_timeout(self.shared.config.stop_timeout);
                if !finished {
                    tracing::warn!(
                        "Job did not stop within {:?}",
                        self.shared.config.stop_timeout
                    );
                }
                finished
            }
            None => true,
        }
    }

    /// Stop the worker. The running job is asked to stop; queued jobs are dropped.
    ///
    /// Blocks for at most twice the stop timeout. A worker still busy after
    /// that is detached.
    pub fn shutdown(&self) {
        if self.shared.shutdown.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!("Shutting down motion queue");

        self.sender.lock().take();
        self.stop_job();

        let worker = self.worker.lock().take();
        let Some(worker) = worker else {
            return;
        };
        if worker.thread().id() == thread::current().id() {
            return;
        }
        if self.worker_done.wait_timeout(self.shared.config.stop_timeout) {
            if worker.join().is_err() {
                tracing::error!("Motion queue worker panicked");
            }
        } else {
            tracing::warn!(
                "Motion queue worker still busy after {:?}, detaching",
                self.shared.config.stop_timeout
            );
        }
    }
}

impl Drop for MotionQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn drop_job(shared: &Shared, job: Box<dyn Job>) {
    shared.pending.fetch_sub(1, Ordering::SeqCst);
    tracing::info!("Dropping job after shutdown: {}", job.description());
}

fn run_job(shared: &Shared, job: Box<dyn Job>) {
    let description = job.description();
    let token = CancellationToken::new();
    let completion = Arc::new(Completion::default());

    {
        let mut state = shared.state.lock();
        state.active = true;
        state.current = Some(RunningJob {
            description: description.clone(),
            token: token.clone(),
            completion: Arc::clone(&completion),
        });
        // Idle with nothing pending must never be observable while a job is in hand.
        shared.pending.fetch_sub(1, Ordering::SeqCst);
    }

    tracing::info!("Running job: {}", description);
    let ctx = JobContext::new(token);
    let guard = CompletionGuard(Arc::clone(&completion));
    let spawned = thread::Builder::new()
        .name("motion-job".to_string())
        .spawn(move || {
            let _guard = guard;
            job.execute(&ctx)
        });

    match spawned {
        Ok(handle) => match handle.join() {
            Ok(Ok(())) => tracing::info!("Job completed: {}", description),
            Ok(Err(e)) if e.is_cancelled() => tracing::info!("{}", e),
            Ok(Err(e)) => {
                let err = JobError::Failed {
                    job: description.clone(),
                    reason: e.to_string(),
                };
                tracing::error!("{}", err);
            }
            Err(payload) => {
                let err = JobError::Panicked {
                    job: description.clone(),
                    message: panic_message(payload.as_ref()),
                };
                tracing::error!("{}", err);
            }
        },
        Err(e) => {
            // The closure, and the guard with it, was dropped unrun.
            let err = JobError::SpawnFailed {
                reason: e.to_string(),
            };
            tracing::error!("{}", err);
        }
    }

    let mut state = shared.state.lock();
    state.active = false;
    state.current = None;
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

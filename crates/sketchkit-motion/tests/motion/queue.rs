use parking_lot::Mutex;
use sketchkit_core::{thread_safe, JobError, Point, Result, ORIGIN};
use sketchkit_motion::{
    Job, JobContext, MotionQueue, MotionQueueConfig, NullPinController, PlotterJob, XyPlotter,
};
use sketchkit_settings::{ConfigSettings, HardwareSettings};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn fast_queue() -> MotionQueue {
    MotionQueue::new(MotionQueueConfig {
        poll_interval: Duration::from_millis(10),
        stop_timeout: Duration::from_secs(2),
    })
}

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

/// Records start/end and checks that no two jobs overlap
struct Recorded {
    id: usize,
    log: Arc<Mutex<Vec<String>>>,
    running: Arc<AtomicUsize>,
    overlap: Arc<AtomicBool>,
}

impl Job for Recorded {
    fn description(&self) -> String {
        format!("recorded {}", self.id)
    }

    fn execute(self: Box<Self>, _ctx: &JobContext) -> Result<()> {
        if self.running.fetch_add(1, Ordering::SeqCst) != 0 {
            self.overlap.store(true, Ordering::SeqCst);
        }
        self.log.lock().push(format!("start {}", self.id));
        thread::sleep(Duration::from_millis(5));
        self.log.lock().push(format!("end {}", self.id));
        self.running.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Panics;

impl Job for Panics {
    fn description(&self) -> String {
        "panics".to_string()
    }

    fn execute(self: Box<Self>, _ctx: &JobContext) -> Result<()> {
        panic!("stepper exploded");
    }
}

struct Fails;

impl Job for Fails {
    fn description(&self) -> String {
        "fails".to_string()
    }

    fn execute(self: Box<Self>, _ctx: &JobContext) -> Result<()> {
        Err(JobError::Failed {
            job: "fails".to_string(),
            reason: "bad input".to_string(),
        }
        .into())
    }
}

/// Spins until cancelled
struct UntilCancelled {
    started: Arc<AtomicBool>,
    observed_cancel: Arc<AtomicBool>,
}

impl Job for UntilCancelled {
    fn description(&self) -> String {
        "until cancelled".to_string()
    }

    fn execute(self: Box<Self>, ctx: &JobContext) -> Result<()> {
        self.started.store(true, Ordering::SeqCst);
        while !ctx.is_cancelled() {
            thread::sleep(Duration::from_millis(2));
        }
        self.observed_cancel.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Sets a flag when run
struct Flag(Arc<AtomicBool>);

impl Job for Flag {
    fn description(&self) -> String {
        "flag".to_string()
    }

    fn execute(self: Box<Self>, _ctx: &JobContext) -> Result<()> {
        self.0.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn test_jobs_run_in_order_without_overlap() {
    let queue = fast_queue();
    let log = Arc::new(Mutex::new(Vec::new()));
    let running = Arc::new(AtomicUsize::new(0));
    let overlap = Arc::new(AtomicBool::new(false));

    for id in 0..5 {
        assert!(queue.queue_job(Box::new(Recorded {
            id,
            log: log.clone(),
            running: running.clone(),
            overlap: overlap.clone(),
        })));
    }

    assert!(wait_until(|| log.lock().len() == 10));
    assert!(!overlap.load(Ordering::SeqCst));
    let expected: Vec<String> = (0..5)
        .flat_map(|id| [format!("start {}", id), format!("end {}", id)])
        .collect();
    assert_eq!(*log.lock(), expected);
    assert!(wait_until(|| !queue.is_job_active()));
    assert_eq!(queue.pending_jobs(), 0);
}

#[test]
fn test_worker_survives_panics_and_errors() {
    let queue = fast_queue();
    let ran = Arc::new(AtomicBool::new(false));

    assert!(queue.queue_job(Box::new(Panics)));
    assert!(queue.queue_job(Box::new(Fails)));
    assert!(queue.queue_job(Box::new(Flag(ran.clone()))));

    assert!(wait_until(|| ran.load(Ordering::SeqCst)));
}

#[test]
fn test_stop_job_cancels_running_job() {
    let queue = fast_queue();
    let started = Arc::new(AtomicBool::new(false));
    let observed_cancel = Arc::new(AtomicBool::new(false));
    let next = Arc::new(AtomicBool::new(false));

    assert!(queue.queue_job(Box::new(UntilCancelled {
        started: started.clone(),
        observed_cancel: observed_cancel.clone(),
    })));
    assert!(queue.queue_job(Box::new(Flag(next.clone()))));

    assert!(wait_until(|| started.load(Ordering::SeqCst)));
    assert!(queue.is_job_active());
    assert_eq!(queue.current_job().as_deref(), Some("until cancelled"));

    assert!(queue.stop_job());
    assert!(observed_cancel.load(Ordering::SeqCst));
    // The queued job still runs afterwards.
    assert!(wait_until(|| next.load(Ordering::SeqCst)));
}

#[test]
fn test_plotter_jobs_through_queue() {
    let queue = fast_queue();
    let plotter = thread_safe(XyPlotter::from_settings(
        Arc::new(NullPinController::new()),
        &HardwareSettings::default(),
        &ConfigSettings::default(),
    ));

    assert!(queue.queue_job(Box::new(PlotterJob::move_by(
        plotter.clone(),
        vec![Point::new(4, 0), Point::new(0, 2)],
    ))));
    assert!(wait_until(|| plotter.lock().position() == Point::new(4, 2)));

    assert!(queue.queue_job(Box::new(PlotterJob::return_to_origin(plotter.clone()))));
    assert!(wait_until(|| plotter.lock().position() == ORIGIN));
}

#[test]
fn test_shutdown_rejects_new_jobs() {
    let queue = fast_queue();
    queue.shutdown();
    let ran = Arc::new(AtomicBool::new(false));
    assert!(!queue.queue_job(Box::new(Flag(ran.clone()))));
    thread::sleep(Duration::from_millis(30));
    assert!(!ran.load(Ordering::SeqCst));
}

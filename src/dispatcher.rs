use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use log::{error, info};
use tokio::sync::{mpsc, Notify};

use crate::error::{MorseError, Result};
use crate::morse_player::{Player, NOTE_C4};
use crate::speed::Speed;
use crate::tone::ToneDevice;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub default_speed: Speed,
    pub frequency: u32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        DispatcherConfig {
            default_speed: Speed::default(),
            frequency: NOTE_C4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accepted {
    pub text: String,
    pub len: usize,
    pub speed: Speed,
}

/// What happened to the most recent request.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Queued { text: String, speed: Speed },
    Sending { text: String, speed: Speed },
    Done { text: String, speed: Speed },
    Error { text: Option<String>, speed: Option<Speed>, detail: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub busy: bool,
    pub queue_len: usize,
    pub last: JobState,
    pub default_speed: Speed,
}

struct Job {
    text: String,
    speed: Speed,
}

struct Shared {
    default_speed: Speed,
    queue_len: usize,
    busy: bool,
    ready: bool,
    closed: bool,
    last: JobState,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Dispatcher {
    jobs: mpsc::UnboundedSender<Job>,
    shared: Arc<Mutex<Shared>>,
    idle: Arc<Notify>,
}

impl Dispatcher {
    /// Starts the playback thread. The device is opened on that thread by
    /// `open_device`, so it does not need to be `Send`.
    pub fn spawn<D, F>(open_device: F, config: DispatcherConfig) -> Dispatcher
    where
        D: ToneDevice + 'static,
        F: FnOnce() -> Result<D> + Send + 'static,
    {
        let (jobs, receiver) = mpsc::unbounded_channel();
        let shared = Arc::new(Mutex::new(Shared {
            default_speed: config.default_speed,
            queue_len: 0,
            busy: false,
            ready: false,
            closed: false,
            last: JobState::Idle,
        }));
        let idle = Arc::new(Notify::new());

        let worker_shared = shared.clone();
        let worker_idle = idle.clone();
        thread::spawn(move || {
            run_worker(open_device, receiver, &worker_shared, &worker_idle, config.frequency);
        });

        Dispatcher { jobs, shared, idle }
    }

    /// Queues `text` for playback. Carriage returns are dropped and the text
    /// is trimmed; a blank request fails with `EmptyText`. `speed` is clamped
    /// into the supported range, falling back to the default speed.
    pub fn submit(&self, text: &str, speed: Option<i64>) -> Result<Accepted> {
        let text = text.replace('\r', "").trim().to_string();
        if text.is_empty() {
            return Err(MorseError::EmptyText);
        }

        let mut shared = lock(&self.shared);
        if shared.closed {
            return Err(MorseError::QueueClosed);
        }
        let speed = speed.map_or(shared.default_speed, Speed::clamped);
        self.jobs
            .send(Job { text: text.clone(), speed })
            .map_err(|_| MorseError::QueueClosed)?;
        shared.queue_len += 1;
        shared.last = JobState::Queued { text: text.clone(), speed };
        info!("queued {:?} at speed {} ({} waiting)", text, speed, shared.queue_len);

        Ok(Accepted {
            len: text.chars().count(),
            text,
            speed,
        })
    }

    /// Returns the speed actually stored after clamping.
    pub fn set_default_speed(&self, value: i64) -> Speed {
        let speed = Speed::clamped(value);
        lock(&self.shared).default_speed = speed;
        speed
    }

    pub fn default_speed(&self) -> Speed {
        lock(&self.shared).default_speed
    }

    pub fn status(&self) -> Status {
        let shared = lock(&self.shared);
        Status {
            busy: shared.busy,
            queue_len: shared.queue_len,
            last: shared.last.clone(),
            default_speed: shared.default_speed,
        }
    }

    /// Resolves once every queued request has been played, or the playback
    /// thread has stopped.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            {
                let shared = lock(&self.shared);
                if shared.closed || (shared.ready && !shared.busy && shared.queue_len == 0) {
                    return;
                }
            }
            notified.await;
        }
    }
}

/// Marks the queue closed when the playback thread ends, including by
/// panic, so `wait_idle` callers are released.
struct WorkerExit<'a> {
    shared: &'a Mutex<Shared>,
    idle: &'a Notify,
}

impl Drop for WorkerExit<'_> {
    fn drop(&mut self) {
        let mut shared = lock(self.shared);
        shared.closed = true;
        shared.busy = false;
        shared.queue_len = 0;
        if thread::panicking() {
            let (text, speed) = match std::mem::take(&mut shared.last) {
                JobState::Sending { text, speed } => (Some(text), Some(speed)),
                _ => (None, None),
            };
            error!("playback thread panicked");
            shared.last = JobState::Error { text, speed, detail: "playback thread panicked".to_string() };
        }
        drop(shared);
        self.idle.notify_waiters();
    }
}

fn run_worker<D, F>(
    open_device: F,
    mut jobs: mpsc::UnboundedReceiver<Job>,
    shared: &Mutex<Shared>,
    idle: &Notify,
    frequency: u32,
) where
    D: ToneDevice,
    F: FnOnce() -> Result<D>,
{
    let _exit = WorkerExit { shared, idle };
    let mut device = match open_device() {
        Ok(device) => device,
        Err(e) => {
            error!("could not open tone device: {e}");
            lock(shared).last = JobState::Error { text: None, speed: None, detail: e.to_string() };
            return;
        }
    };

    let start_idle = {
        let mut shared = lock(shared);
        shared.ready = true;
        shared.queue_len == 0
    };
    if start_idle {
        idle.notify_waiters();
    }

    while let Some(job) = jobs.blocking_recv() {
        {
            let mut shared = lock(shared);
            shared.queue_len = shared.queue_len.saturating_sub(1);
            shared.busy = true;
            shared.last = JobState::Sending { text: job.text.clone(), speed: job.speed };
        }

        let mut player = Player::with_speed(&mut device, &job.text, job.speed);
        player.set_frequency(frequency);
        let result = player.play();

        let mut shared = lock(shared);
        shared.busy = false;
        shared.last = match result {
            Ok(()) => JobState::Done { text: job.text, speed: job.speed },
            Err(e) => {
                error!("playback of {:?} failed: {e}", job.text);
                JobState::Error { text: Some(job.text), speed: Some(job.speed), detail: e.to_string() }
            }
        };
        if shared.queue_len == 0 {
            drop(shared);
            idle.notify_waiters();
        }
    }
}

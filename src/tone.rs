use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::error::Result;

/// Something that can sound a tone, such as a piezo buzzer.
///
/// `tone` only starts the tone; the caller waits it out with `wait`.
pub trait ToneDevice {
    fn tone(&mut self, frequency: u32, duration: Duration) -> Result<()>;

    fn wait(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<T: ToneDevice + ?Sized> ToneDevice for &mut T {
    fn tone(&mut self, frequency: u32, duration: Duration) -> Result<()> {
        (**self).tone(frequency, duration)
    }

    fn wait(&mut self, duration: Duration) {
        (**self).wait(duration)
    }
}

impl<T: ToneDevice + ?Sized> ToneDevice for Box<T> {
    fn tone(&mut self, frequency: u32, duration: Duration) -> Result<()> {
        (**self).tone(frequency, duration)
    }

    fn wait(&mut self, duration: Duration) {
        (**self).wait(duration)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToneEvent {
    Tone { frequency: u32, duration: Duration },
    Wait(Duration),
}

/// Device that makes no sound and never sleeps; it only logs what it was
/// asked to do. Clones share one log.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<ToneEvent>>>,
}

impl Recorder {
    pub fn new() -> Recorder {
        Recorder::default()
    }

    pub fn events(&self) -> Vec<ToneEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn tones(&self) -> Vec<(u32, Duration)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ToneEvent::Tone { frequency, duration } => Some((frequency, duration)),
                ToneEvent::Wait(_) => None,
            })
            .collect()
    }

    /// Sum of all waits, i.e. the time playback would have blocked.
    pub fn waited(&self) -> Duration {
        self.events()
            .into_iter()
            .map(|event| match event {
                ToneEvent::Wait(d) => d,
                ToneEvent::Tone { .. } => Duration::ZERO,
            })
            .sum()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn push(&self, event: ToneEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}

impl ToneDevice for Recorder {
    fn tone(&mut self, frequency: u32, duration: Duration) -> Result<()> {
        self.push(ToneEvent::Tone { frequency, duration });
        Ok(())
    }

    fn wait(&mut self, duration: Duration) {
        self.push(ToneEvent::Wait(duration));
    }
}

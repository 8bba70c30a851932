pub mod dispatcher;
pub mod error;
pub mod morse_player;
pub mod morse_table;
#[cfg(feature = "audio")]
pub mod rodio_buzzer;
pub mod speed;
pub mod tone;
pub mod wave;

pub use dispatcher::{Accepted, Dispatcher, DispatcherConfig, JobState, Status};
pub use error::{MorseError, Result};
pub use morse_player::{Player, NOTE_C4};
pub use morse_table::Lookup;
#[cfg(feature = "audio")]
pub use rodio_buzzer::{RodioBuzzer, ToneSettings};
pub use speed::Speed;
pub use tone::{Recorder, ToneDevice, ToneEvent};
pub use wave::WaveType;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MorseError {
    /// Speed of zero, or high enough that the unit truncates to 0 ms.
    #[error("invalid speed {0}: must be between 1 and {max}", max = crate::speed::MAX_VALID_SPEED)]
    InvalidSpeed(u32),

    #[error("nothing to play: text is empty")]
    EmptyText,

    #[error("audio device error: {0}")]
    AudioDevice(String),

    #[error("playback queue is closed")]
    QueueClosed,
}

pub type Result<T> = std::result::Result<T, MorseError>;

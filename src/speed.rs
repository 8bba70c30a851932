use std::fmt;
use std::time::Duration;

use crate::error::{MorseError, Result};

/// Speed used when a request does not carry one.
pub const DEFAULT_SPEED: u32 = 17;
/// Bounds applied to untrusted speed input.
pub const MIN_SPEED: u32 = 5;
pub const MAX_SPEED: u32 = 30;
/// Past this the unit duration truncates to zero.
pub const MAX_VALID_SPEED: u32 = 1200;

const MS_PER_MINUTE: u32 = 60 * 1000;
const UNITS_PER_WORD: u32 = 50;

/// Words-per-minute-like playback speed.
///
/// A `Speed` always yields a strictly positive unit duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Speed(u32);

impl Speed {
    pub fn new(value: u32) -> Result<Speed> {
        if value == 0 || value > MAX_VALID_SPEED {
            return Err(MorseError::InvalidSpeed(value));
        }
        Ok(Speed(value))
    }

    /// Clamps arbitrary input into `MIN_SPEED..=MAX_SPEED`.
    pub fn clamped(value: i64) -> Speed {
        let value = value.clamp(MIN_SPEED as i64, MAX_SPEED as i64);
        Speed(value as u32)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Length of one dot: `60000 / (50 * speed)` ms, truncating.
    pub fn unit(self) -> Duration {
        Duration::from_millis(u64::from(MS_PER_MINUTE / (UNITS_PER_WORD * self.0)))
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed(DEFAULT_SPEED)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Speed {
    type Error = MorseError;

    fn try_from(value: u32) -> Result<Speed> {
        Speed::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_follows_integer_formula() {
        for v in [1, 5, 7, 13, 17, 20, 30, 120, 1200] {
            let speed = Speed::new(v).unwrap();
            assert_eq!(speed.unit(), Duration::from_millis(u64::from(60000 / (50 * v))));
        }
        assert_eq!(Speed::new(17).unwrap().unit(), Duration::from_millis(70));
        assert_eq!(Speed::new(20).unwrap().unit(), Duration::from_millis(60));
    }

    #[test]
    fn zero_speed_is_rejected() {
        assert_eq!(Speed::new(0), Err(MorseError::InvalidSpeed(0)));
    }

    #[test]
    fn speed_with_zero_unit_is_rejected() {
        assert!(Speed::new(MAX_VALID_SPEED).is_ok());
        assert_eq!(Speed::new(1201), Err(MorseError::InvalidSpeed(1201)));
    }

    #[test]
    fn clamped_stays_in_range() {
        assert_eq!(Speed::clamped(-4).value(), MIN_SPEED);
        assert_eq!(Speed::clamped(0).value(), MIN_SPEED);
        assert_eq!(Speed::clamped(12).value(), 12);
        assert_eq!(Speed::clamped(99).value(), MAX_SPEED);
    }

    #[test]
    fn default_speed() {
        assert_eq!(Speed::default().value(), DEFAULT_SPEED);
    }
}

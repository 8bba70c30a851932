use std::time::Duration;

use log::{debug, trace};

use crate::error::Result;
use crate::morse_table::{self, Lookup, Symbol};
use crate::speed::Speed;
use crate::tone::ToneDevice;

/// Middle C, used for every symbol.
pub const NOTE_C4: u32 = 262;

/*
    PAUSES, in units:
        1 - after every dot or dash
        3 - after every character, and for unknown or silent ones
        8 - for each whitespace character
*/
const ELEMENT_GAP: u32 = 1;
const LETTER_GAP: u32 = 3;
const WORD_GAP: u32 = 8;

/// Plays one string as Morse on a borrowed [`ToneDevice`].
///
/// The player consumes its text as it plays. Once `play` returns the player
/// is spent: a second call plays nothing.
pub struct Player<'a, D: ToneDevice + ?Sized> {
    device: &'a mut D,
    text: &'a str,
    unit: Duration,
    frequency: u32,
}

impl<'a, D: ToneDevice + ?Sized> Player<'a, D> {
    /// Fails with `InvalidSpeed` when `speed` is 0 or yields a 0 ms unit.
    pub fn new(device: &'a mut D, text: &'a str, speed: u32) -> Result<Self> {
        Ok(Self::with_speed(device, text, Speed::new(speed)?))
    }

    pub fn with_speed(device: &'a mut D, text: &'a str, speed: Speed) -> Self {
        Player {
            device,
            text,
            unit: speed.unit(),
            frequency: NOTE_C4,
        }
    }

    pub fn set_frequency(&mut self, frequency: u32) {
        self.frequency = frequency;
    }

    pub fn unit(&self) -> Duration {
        self.unit
    }

    pub fn remaining(&self) -> &'a str {
        self.text
    }

    /// Plays the remaining text, blocking until the last gap has elapsed.
    pub fn play(&mut self) -> Result<()> {
        debug!(
            "playing {} chars, unit {} ms",
            self.text.chars().count(),
            self.unit.as_millis()
        );
        while let Some(c) = self.text.chars().next() {
            self.play_char(c)?;
            self.text = &self.text[c.len_utf8()..];
        }
        debug!("playback finished");
        Ok(())
    }

    /// Time `play` would block for on the remaining text.
    pub fn duration(&self) -> Duration {
        self.text.chars().map(|c| self.char_duration(c)).sum()
    }

    /// Offset from the start of playback at which each remaining character
    /// begins.
    pub fn char_timings(&self) -> Vec<Duration> {
        self.text
            .chars()
            .scan(Duration::ZERO, |elapsed, c| {
                let start = *elapsed;
                *elapsed += self.char_duration(c);
                Some(start)
            })
            .collect()
    }

    fn play_char(&mut self, c: char) -> Result<()> {
        if c.is_whitespace() {
            trace!("word gap");
            self.pause(WORD_GAP);
            return Ok(());
        }
        match morse_table::lookup(c) {
            Lookup::Found(index) | Lookup::Silent(index) => {
                trace!("{:?} {:?}", c, morse_table::pattern(index));
                self.character(index)
            }
            Lookup::NotFound => {
                debug!("skipping unsupported char {:?}", c);
                self.pause(LETTER_GAP);
                Ok(())
            }
        }
    }

    /// Plays the table entry at `index` followed by the letter gap.
    fn character(&mut self, index: usize) -> Result<()> {
        if morse_table::pattern(index).is_empty() {
            self.pause(LETTER_GAP);
            return Ok(());
        }
        for symbol in morse_table::symbols(index) {
            match symbol {
                Symbol::Dot => self.dot()?,
                Symbol::Dash => self.dash()?,
            }
            self.pause(ELEMENT_GAP);
        }
        self.pause(LETTER_GAP);
        Ok(())
    }

    fn dot(&mut self) -> Result<()> {
        self.blocking_tone(Symbol::Dot.units())
    }

    fn dash(&mut self) -> Result<()> {
        self.blocking_tone(Symbol::Dash.units())
    }

    /// Starts a tone of `units` and waits it out, so the tone is charged
    /// exactly once.
    fn blocking_tone(&mut self, units: u32) -> Result<()> {
        let duration = self.unit * units;
        self.device.tone(self.frequency, duration)?;
        self.device.wait(duration);
        Ok(())
    }

    fn pause(&mut self, units: u32) {
        self.device.wait(self.unit * units);
    }

    fn char_duration(&self, c: char) -> Duration {
        let units = if c.is_whitespace() {
            WORD_GAP
        } else {
            match morse_table::lookup(c) {
                Lookup::Found(index) => {
                    morse_table::symbols(index)
                        .map(|s| s.units() + ELEMENT_GAP)
                        .sum::<u32>()
                        + LETTER_GAP
                }
                Lookup::Silent(_) | Lookup::NotFound => LETTER_GAP,
            }
        };
        self.unit * units
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MorseError;
    use crate::tone::{Recorder, ToneEvent};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    struct FlakyBuzzer {
        recorder: Recorder,
        tones_left: usize,
    }

    impl ToneDevice for FlakyBuzzer {
        fn tone(&mut self, frequency: u32, duration: Duration) -> Result<()> {
            if self.tones_left == 0 {
                return Err(MorseError::AudioDevice("buzzer disconnected".to_string()));
            }
            self.tones_left -= 1;
            self.recorder.tone(frequency, duration)
        }

        fn wait(&mut self, duration: Duration) {
            self.recorder.wait(duration);
        }
    }

    #[test]
    fn rejects_zero_speed() {
        let mut device = Recorder::new();
        let err = Player::new(&mut device, "E", 0).err();
        assert_eq!(err, Some(MorseError::InvalidSpeed(0)));
    }

    #[test]
    fn single_dot() {
        let recorder = Recorder::new();
        let mut device = recorder.clone();
        Player::new(&mut device, "E", 20).unwrap().play().unwrap();

        assert_eq!(
            recorder.events(),
            vec![
                ToneEvent::Tone { frequency: NOTE_C4, duration: ms(60) },
                ToneEvent::Wait(ms(60)),
                ToneEvent::Wait(ms(60)),
                ToneEvent::Wait(ms(180)),
            ]
        );
    }

    #[test]
    fn dash_is_three_units() {
        let recorder = Recorder::new();
        let mut device = recorder.clone();
        Player::new(&mut device, "T", 20).unwrap().play().unwrap();

        assert_eq!(recorder.tones(), vec![(NOTE_C4, ms(180))]);
        assert_eq!(recorder.waited(), ms(180 + 60 + 180));
    }

    #[test]
    fn silent_entry_pauses_like_unknown() {
        let silent = Recorder::new();
        let unknown = Recorder::new();
        Player::new(&mut silent.clone(), "<", 20).unwrap().play().unwrap();
        Player::new(&mut unknown.clone(), "#", 20).unwrap().play().unwrap();

        assert_eq!(silent.events(), vec![ToneEvent::Wait(ms(180))]);
        assert_eq!(silent.events(), unknown.events());
    }

    #[test]
    fn cursor_advances_while_playing() {
        let mut device = Recorder::new();
        let mut player = Player::new(&mut device, "ab", 10).unwrap();
        assert_eq!(player.remaining(), "ab");
        player.play().unwrap();
        assert_eq!(player.remaining(), "");
        assert_eq!(player.duration(), Duration::ZERO);
    }

    #[test]
    fn custom_frequency() {
        let recorder = Recorder::new();
        let mut device = recorder.clone();
        let mut player = Player::new(&mut device, "I", 20).unwrap();
        player.set_frequency(700);
        player.play().unwrap();
        assert!(recorder.tones().iter().all(|&(f, _)| f == 700));
    }

    #[test]
    fn duration_matches_playback() {
        let recorder = Recorder::new();
        let mut device = recorder.clone();
        let mut player = Player::new(&mut device, "Hello, World #2 <?>", 13).unwrap();
        let expected = player.duration();
        player.play().unwrap();
        assert_eq!(recorder.waited(), expected);
    }

    #[test]
    fn char_timings_start_at_zero() {
        let mut device = Recorder::new();
        let player = Player::new(&mut device, "E T", 20).unwrap();
        // E: 1+1+3, space: 8, T: 3+1+3
        assert_eq!(player.char_timings(), vec![ms(0), ms(300), ms(780)]);
    }

    #[test]
    fn device_error_stops_playback() {
        let recorder = Recorder::new();
        let mut device = FlakyBuzzer { recorder: recorder.clone(), tones_left: 1 };
        let mut player = Player::new(&mut device, "SOS", 20).unwrap();

        let err = player.play().err();
        assert_eq!(err, Some(MorseError::AudioDevice("buzzer disconnected".to_string())));
        assert_eq!(
            recorder.events(),
            vec![
                ToneEvent::Tone { frequency: NOTE_C4, duration: ms(60) },
                ToneEvent::Wait(ms(60)),
                ToneEvent::Wait(ms(60)),
            ]
        );
        // The failed character is still pending.
        assert_eq!(player.remaining(), "SOS");
    }
}

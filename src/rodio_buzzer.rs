use std::time::Duration;

use log::{debug, warn};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::error::{MorseError, Result};
use crate::tone::ToneDevice;
use crate::wave::{self, WaveType, SAMPLE_RATE};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneSettings {
    /// 0.0 (mute) to 1.0.
    pub volume: f32,
    pub wave_type: WaveType,
    pub sample_rate: u32,
}

impl Default for ToneSettings {
    fn default() -> Self {
        ToneSettings {
            volume: 0.5,
            wave_type: WaveType::Square,
            sample_rate: SAMPLE_RATE,
        }
    }
}

/// Buzzer emulated on the default audio output.
///
/// `tone` queues the samples and returns at once; the player does the
/// waiting. The stream is not `Send`, so the buzzer stays on the thread that
/// opened it.
pub struct RodioBuzzer {
    _stream: OutputStream,
    _stream_handle: OutputStreamHandle,
    sink: Sink,
    settings: ToneSettings,
}

impl RodioBuzzer {
    pub fn new(settings: ToneSettings) -> Result<RodioBuzzer> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| MorseError::AudioDevice(format!("no output stream: {e}")))?;
        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| MorseError::AudioDevice(format!("failed to create sink: {e}")))?;
        sink.set_volume(settings.volume.clamp(0.0, 1.0));
        debug!("rodio buzzer opened: {:?}", settings);

        Ok(RodioBuzzer {
            _stream: stream,
            _stream_handle: stream_handle,
            sink,
            settings,
        })
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.settings.volume = volume.clamp(0.0, 1.0);
        self.sink.set_volume(self.settings.volume);
    }

    pub fn set_wave_type(&mut self, wave_type: WaveType) {
        self.settings.wave_type = wave_type;
    }

    pub fn settings(&self) -> ToneSettings {
        self.settings
    }
}

impl ToneDevice for RodioBuzzer {
    fn tone(&mut self, frequency: u32, duration: Duration) -> Result<()> {
        let samples = wave::tone_samples(self.settings.wave_type, frequency, duration, self.settings.sample_rate);
        if samples.is_empty() {
            warn!("tone of {:?} too short to render", duration);
            return Ok(());
        }
        self.sink.append(SamplesBuffer::new(1, self.settings.sample_rate, samples));
        Ok(())
    }
}

impl Drop for RodioBuzzer {
    fn drop(&mut self) {
        // Let the last tone finish instead of cutting it off.
        self.sink.sleep_until_end();
    }
}

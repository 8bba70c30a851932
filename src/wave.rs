use std::f32::consts::PI;
use std::time::Duration;

use ndarray::Array1;

pub const SAMPLE_RATE: u32 = 48000;
const HARMONICS_COUNT: u32 = 20;
const FADE_IN: f32 = 0.0004;
const FADE_OUT: f32 = 0.0002;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WaveType {
    /// Closest to a piezo buzzer.
    #[default]
    Square,
    Sine,
    Triangle,
    Sawtooth,
}

fn apply_hann_window(samples: &mut Array1<f32>, fade_in_samples: usize, fade_out_samples: usize) {
    let len = samples.len();
    let fade_in_samples = fade_in_samples.min(len);
    let fade_out_samples = fade_out_samples.min(len);

    let hann_in = Array1::linspace(0.0, PI, fade_in_samples)
        .mapv(|x: f32| 0.5 * (1.0 - x.cos()));
    let hann_out = Array1::linspace(PI, 0.0, fade_out_samples)
        .mapv(|x: f32| 0.5 * (1.0 - x.cos()));

    for i in 0..fade_in_samples {
        samples[i] *= hann_in[i];
    }
    for i in 0..fade_out_samples {
        samples[len - fade_out_samples + i] *= hann_out[i];
    }
}

/// Sum of odd/all harmonics weighted by `weight(harmonic index)`.
fn harmonic_sum(
    t: &Array1<f32>,
    frequency: f32,
    harmonics: impl Iterator<Item = u32>,
    multiple: impl Fn(u32) -> u32,
    weight: impl Fn(u32) -> f32,
) -> Array1<f32> {
    let mut wave = Array1::<f32>::zeros(t.len());
    for harmonic in harmonics {
        let harmonic_frequency = frequency * multiple(harmonic) as f32;
        let harmonic_wave = (2.0 * PI * harmonic_frequency * t).mapv(f32::sin);
        wave = wave + harmonic_wave * weight(harmonic);
    }
    wave
}

/// Samples of one tone at `frequency` lasting `duration`, normalized to
/// peak 1.0 and faded in and out to avoid clicks.
pub fn tone_samples(wave_type: WaveType, frequency: u32, duration: Duration, sample_rate: u32) -> Vec<f32> {
    let samples_count = (u128::from(sample_rate) * duration.as_nanos() / 1_000_000_000) as usize;
    if samples_count == 0 {
        return Vec::new();
    }
    let fade_in_samples = (sample_rate as f32 * FADE_IN) as usize;
    let fade_out_samples = (sample_rate as f32 * FADE_OUT) as usize;
    let t = Array1::linspace(0.0, duration.as_secs_f32(), samples_count);
    let frequency = frequency as f32;

    let mut wave = match wave_type {
        WaveType::Square => harmonic_sum(
            &t,
            frequency,
            0..HARMONICS_COUNT,
            |h| 2 * h + 1,
            |h| 1.0 / (2 * h + 1) as f32,
        ),
        WaveType::Sine => (2.0 * PI * frequency * &t).mapv(f32::sin),
        WaveType::Triangle => harmonic_sum(
            &t,
            frequency,
            0..HARMONICS_COUNT,
            |h| 2 * h + 1,
            |h| {
                let sign = if h % 2 == 0 { 1.0 } else { -1.0 };
                sign / ((2 * h + 1).pow(2)) as f32
            },
        ),
        WaveType::Sawtooth => harmonic_sum(&t, frequency, 1..HARMONICS_COUNT, |h| h, |h| 1.0 / h as f32),
    };

    let max_amplitude = wave.iter().fold(0.0f32, |max, s| max.max(s.abs()));
    if max_amplitude > 0.0 {
        wave /= max_amplitude;
    }

    apply_hann_window(&mut wave, fade_in_samples, fade_out_samples);

    wave.to_vec()
}

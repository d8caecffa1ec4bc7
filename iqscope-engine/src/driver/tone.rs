use std::f64::consts::TAU;
use std::thread;
use std::time::Duration;

use iqscope_messages::{Decibels, Hertz};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use super::{DriverStatus, RadioDriver};
use crate::config::StreamConfig;

const FREQUENCY_RANGE: (u64, u64) = (47_000_000, 6_000_000_000);
const SAMPLE_RATE_RANGE: (u32, u32) = (520_834, 61_440_000);
const BANDWIDTH_RANGE: (u32, u32) = (200_000, 56_000_000);
const GAIN_RANGE: (i32, i32) = (-15, 60);

/// Gain at which the tone comes out at its nominal amplitude.
const REFERENCE_GAIN: i32 = 30;

/// Noise standard deviation relative to full scale (about -60 dBFS).
const NOISE_AMPLITUDE: f64 = 1e-3;

/// Fixed so repeated runs see the same noise floor.
const NOISE_SEED: u64 = 0x2545_f491_4f6c_dd1d;

const FULL_SCALE: f64 = 2048.0;

/// Synthetic receiver producing a complex tone plus a low noise floor.
///
/// Tuning is range-checked like a bladeRF 2.0, reads are paced to the
/// configured sample rate.
#[derive(Debug)]
pub struct ToneRadio {
    offset: Hertz,
    amplitude: f64,
    sample_rate: u32,
    gain: i32,
    rx_enabled: bool,
    phase: f64,
    rng: StdRng,
}

impl ToneRadio {
    pub fn new(offset: Hertz, amplitude: Decibels) -> Self {
        Self {
            offset,
            amplitude: f64::from(amplitude.to_linear()),
            sample_rate: 0,
            gain: REFERENCE_GAIN,
            rx_enabled: false,
            phase: 0.0,
            rng: StdRng::seed_from_u64(NOISE_SEED),
        }
    }

    fn check<T: PartialOrd>(value: T, (min, max): (T, T)) -> Result<(), DriverStatus> {
        if value < min || value > max {
            return Err(DriverStatus::RANGE);
        }
        Ok(())
    }

    fn next_noise(&mut self) -> f64 {
        let sample: f64 = self.rng.sample(StandardNormal);
        NOISE_AMPLITUDE * sample
    }

    fn quantize(value: f64) -> i16 {
        (value * FULL_SCALE).round().clamp(-FULL_SCALE, FULL_SCALE - 1.0) as i16
    }
}

impl RadioDriver for ToneRadio {
    fn set_frequency(&mut self, hz: u64) -> Result<(), DriverStatus> {
        Self::check(hz, FREQUENCY_RANGE)
    }

    fn set_sample_rate(&mut self, hz: u32) -> Result<(), DriverStatus> {
        Self::check(hz, SAMPLE_RATE_RANGE)?;
        self.sample_rate = hz;
        Ok(())
    }

    fn set_bandwidth(&mut self, hz: u32) -> Result<(), DriverStatus> {
        Self::check(hz, BANDWIDTH_RANGE)
    }

    fn set_gain(&mut self, db: i32) -> Result<(), DriverStatus> {
        Self::check(db, GAIN_RANGE)?;
        self.gain = db;
        Ok(())
    }

    fn configure_stream(&mut self, config: &StreamConfig) -> Result<(), DriverStatus> {
        if config.num_buffers == 0 || config.buffer_size == 0 || config.num_transfers == 0 {
            return Err(DriverStatus::INVALID);
        }
        if config.num_transfers >= config.num_buffers {
            return Err(DriverStatus::INVALID);
        }
        Ok(())
    }

    fn set_rx_enabled(&mut self, enabled: bool) -> Result<(), DriverStatus> {
        self.rx_enabled = enabled;
        Ok(())
    }

    fn read(&mut self, samples: &mut [i16], timeout: Duration) -> Result<(), DriverStatus> {
        if !self.rx_enabled || self.sample_rate == 0 {
            return Err(DriverStatus::NOT_INIT);
        }

        let pairs = samples.len() / 2;
        let rate = f64::from(self.sample_rate);
        let capture_time = Duration::from_secs_f64(pairs as f64 / rate);
        if capture_time > timeout {
            thread::sleep(timeout);
            return Err(DriverStatus::TIMEOUT);
        }
        thread::sleep(capture_time);

        let gain = 10f64.powf(f64::from(self.gain - REFERENCE_GAIN) / 20.0);
        let amplitude = self.amplitude * gain;
        let step = TAU * self.offset.as_hz() as f64 / rate;

        for pair in samples.chunks_exact_mut(2) {
            let i = amplitude * self.phase.cos() + self.next_noise();
            let q = amplitude * self.phase.sin() + self.next_noise();
            pair[0] = Self::quantize(i);
            pair[1] = Self::quantize(q);
            self.phase = (self.phase + step) % TAU;
        }

        debug!("Tone radio produced {} samples", pairs);
        Ok(())
    }
}

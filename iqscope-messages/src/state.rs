use crate::{Decibels, Hertz};
use std::path::PathBuf;

/// Receiver tuning as last confirmed by the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuningState {
    /// Center frequency in Hz
    pub center_frequency: u64,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Analog bandwidth in Hz
    pub bandwidth: u32,
    /// RX gain in dB
    pub gain: i32,
}

impl Default for TuningState {
    fn default() -> Self {
        Self {
            center_frequency: 915_000_000,
            sample_rate: 10_000_000,
            bandwidth: 10_000_000,
            gain: 30,
        }
    }
}

impl TuningState {
    /// Lowest and highest frequency covered by a spectrum at this tuning.
    pub fn span(&self) -> (Hertz, Hertz) {
        let half = u64::from(self.sample_rate) / 2;
        (
            Hertz(self.center_frequency.saturating_sub(half)),
            Hertz(self.center_frequency.saturating_add(half)),
        )
    }
}

/// Current state of the spectrum engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    /// Confirmed tuning
    pub tuning: TuningState,
    /// FFT size (number of bins)
    pub fft_size: usize,
}

/// Which receiver the analyzer opens.
#[derive(Debug, Clone, PartialEq)]
pub enum Backend {
    /// Synthetic receiver emitting a tone at `offset` from the tuned center.
    Tone { offset: Hertz, amplitude: Decibels },
    /// Replay a raw SC16 Q11 capture (interleaved little-endian i16 I/Q).
    File { path: PathBuf, looping: bool },
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Tone {
            offset: Hertz::mhz(1),
            amplitude: Decibels(-6.0),
        }
    }
}

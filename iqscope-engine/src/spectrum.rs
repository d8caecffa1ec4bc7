//! IQ block to calibrated power spectrum.

use iqscope_messages::TuningState;
use num_complex::Complex32;

use crate::capture::{CaptureChannel, IqBlock};
use crate::device::DeviceHandle;
use crate::error::{Error, Result};
use crate::transform::{FftEngine, SpectralTransform};

/// Full-scale magnitude of SC16 Q11 samples.
pub const FULL_SCALE: f32 = 2048.0;

/// Added to every bin's power so that silent bins stay finite.
pub const POWER_FLOOR: f32 = 1e-20;

/// Transform index feeding output bin `i` of an `n`-bin spectrum.
///
/// Rotates by half the transform length so DC lands at `n / 2` and bins run
/// from lowest to highest frequency.
pub fn shifted_bin(i: usize, n: usize) -> usize {
    (i + n / 2) % n
}

/// Scale SC16 Q11 pairs to unit-amplitude complex samples.
pub fn normalize(block: &IqBlock, input: &mut [Complex32]) {
    for (dst, (i, q)) in input.iter_mut().zip(block.pairs()) {
        *dst = Complex32::new(f32::from(i) / FULL_SCALE, f32::from(q) / FULL_SCALE);
    }
}

/// Power of one transform bin in dB.
pub fn power_db(bin: Complex32) -> f32 {
    10.0 * (bin.norm_sqr() + POWER_FLOOR).log10()
}

/// Reorder transform output into ascending frequency and convert to dB.
pub fn reorder_power(output: &[Complex32], spectrum: &mut [f32]) {
    let n = spectrum.len();
    for (i, level) in spectrum.iter_mut().enumerate() {
        *level = power_db(output[shifted_bin(i, n)]);
    }
}

/// Absolute frequency in Hz at the center of output bin `i`.
pub fn bin_frequency(i: usize, n: usize, tuning: &TuningState) -> f64 {
    let offset = i as f64 - (n / 2) as f64;
    tuning.center_frequency as f64 + offset * f64::from(tuning.sample_rate) / n as f64
}

/// Strongest bin and its level.
pub fn peak(spectrum: &[f32]) -> Option<(usize, f32)> {
    spectrum
        .iter()
        .copied()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
}

/// Turns captured blocks into power spectra, reusing one transform.
#[derive(Debug)]
pub struct SpectrumBuilder<T = FftEngine> {
    transform: T,
}

impl<T: SpectralTransform> SpectrumBuilder<T> {
    pub fn new(transform: T) -> Self {
        Self { transform }
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Capture `out.len()` pairs and write their power spectrum into `out`.
    ///
    /// A failed capture is returned as-is and the transform is not run.
    pub fn compute_spectrum(
        &mut self,
        device: &mut DeviceHandle,
        capture: &CaptureChannel,
        out: &mut [f32],
    ) -> Result<()> {
        let n = out.len();
        if n == 0 {
            return Err(Error::InvalidSize { requested: n });
        }

        self.transform.ensure_size(n)?;
        let block = capture.acquire(device, n)?;
        normalize(&block, self.transform.input_mut());
        drop(block);

        self.transform.run();
        reorder_power(self.transform.output(), out);
        Ok(())
    }
}

//! Reusable forward FFT sized to the requested spectrum resolution.

use std::fmt;
use std::sync::Arc;

use log::debug;
use num_complex::Complex32;
use rustfft::{Fft, FftPlanner};

use crate::error::{Error, Result};

/// Transform stage of the spectrum pipeline.
///
/// Callers fill [`input_mut`](Self::input_mut), call [`run`](Self::run) and
/// read [`output`](Self::output). Both buffers always have [`size`](Self::size)
/// elements.
pub trait SpectralTransform: Send {
    /// Rebuild plan and buffers for `n` bins unless already sized for `n`.
    fn ensure_size(&mut self, n: usize) -> Result<()>;

    /// Currently bound number of bins.
    fn size(&self) -> usize;

    fn input_mut(&mut self) -> &mut [Complex32];

    /// Transform the input buffer into the output buffer.
    fn run(&mut self);

    fn output(&self) -> &[Complex32];
}

/// A forward plan bound to its own buffers.
struct TransformPlan {
    fft: Arc<dyn Fft<f32>>,
    input: Vec<Complex32>,
    output: Vec<Complex32>,
    scratch: Vec<Complex32>,
}

impl TransformPlan {
    fn build(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidSize { requested: n });
        }

        // Buffers first: the planner allocates its twiddles infallibly.
        let input = zeroed(n)?;
        let output = zeroed(n)?;

        // FftPlanner is not Send, so none is kept between builds.
        let fft = FftPlanner::new().plan_fft_forward(n);
        let scratch = zeroed(fft.get_inplace_scratch_len())?;

        Ok(Self {
            fft,
            input,
            output,
            scratch,
        })
    }
}

fn zeroed(len: usize) -> Result<Vec<Complex32>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailure { size: len })?;
    buf.resize(len, Complex32::new(0.0, 0.0));
    Ok(buf)
}

/// [`SpectralTransform`] backed by `rustfft`.
pub struct FftEngine {
    plan: TransformPlan,
    rebuilds: usize,
}

impl FftEngine {
    /// Plan a forward transform of `n` bins.
    pub fn new(n: usize) -> Result<Self> {
        debug!("Planning {}-point FFT", n);
        Ok(Self {
            plan: TransformPlan::build(n)?,
            rebuilds: 0,
        })
    }

    /// How many times the plan was rebuilt for a new size.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }
}

impl SpectralTransform for FftEngine {
    /// If building the new plan fails, the previous plan stays bound.
    fn ensure_size(&mut self, n: usize) -> Result<()> {
        if n == self.size() {
            return Ok(());
        }
        debug!("Replanning FFT: {} -> {} points", self.size(), n);
        self.plan = TransformPlan::build(n)?;
        self.rebuilds += 1;
        Ok(())
    }

    fn size(&self) -> usize {
        self.plan.input.len()
    }

    fn input_mut(&mut self) -> &mut [Complex32] {
        &mut self.plan.input
    }

    fn run(&mut self) {
        let plan = &mut self.plan;
        plan.output.copy_from_slice(&plan.input);
        plan.fft.process_with_scratch(&mut plan.output, &mut plan.scratch);
    }

    fn output(&self) -> &[Complex32] {
        &self.plan.output
    }
}

impl fmt::Debug for FftEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftEngine")
            .field("size", &self.size())
            .field("rebuilds", &self.rebuilds)
            .finish()
    }
}

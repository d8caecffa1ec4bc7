use iqscope_messages::{Backend, TuningState};
use log::info;

use crate::capture::CaptureChannel;
use crate::config::AnalyzerConfig;
use crate::device::DeviceHandle;
use crate::driver::RadioDriver;
use crate::error::{Error, Result};
use crate::spectrum::SpectrumBuilder;
use crate::transform::{FftEngine, SpectralTransform};

/// Open a spectrum analyzer on the first radio available for `backend`.
pub fn open_analyzer(backend: &Backend, config: AnalyzerConfig) -> Result<Analyzer> {
    Analyzer::open(backend, config)
}

/// Handle to a tuned receiver and its spectrum pipeline.
///
/// All methods take `&mut self` for anything that touches the radio, so a
/// setter can never race an in-flight acquisition on the same handle. Move
/// the analyzer onto its own thread (see [`Engine`](crate::Engine)) to keep a
/// caller responsive.
#[derive(Debug)]
pub struct Analyzer<T = FftEngine> {
    device: DeviceHandle,
    capture: CaptureChannel,
    builder: SpectrumBuilder<T>,
}

impl Analyzer<FftEngine> {
    pub fn open(backend: &Backend, config: AnalyzerConfig) -> Result<Self> {
        let device = DeviceHandle::initialize(backend, &config)?;
        // A failed plan drops `device`, closing the radio.
        let transform = FftEngine::new(config.fft_size)?;
        Ok(Self::assemble(device, transform, config))
    }
}

impl<T: SpectralTransform> Analyzer<T> {
    /// Build an analyzer around an already opened driver and transform.
    pub fn from_parts(
        driver: Box<dyn RadioDriver>,
        transform: T,
        config: AnalyzerConfig,
    ) -> Result<Self> {
        let device = DeviceHandle::with_driver(driver, &config)?;
        Ok(Self::assemble(device, transform, config))
    }

    fn assemble(device: DeviceHandle, transform: T, config: AnalyzerConfig) -> Self {
        info!("Analyzer open, {} bins", transform.size());
        Self {
            device,
            capture: CaptureChannel::new(config.read_timeout),
            builder: SpectrumBuilder::new(transform),
        }
    }

    pub fn set_frequency(&mut self, hz: u64) -> Result<()> {
        self.device.set_frequency(hz)
    }

    pub fn set_sample_rate(&mut self, hz: u32) -> Result<()> {
        self.device.set_sample_rate(hz)
    }

    pub fn set_bandwidth(&mut self, hz: u32) -> Result<()> {
        self.device.set_bandwidth(hz)
    }

    pub fn set_gain(&mut self, db: i32) -> Result<()> {
        self.device.set_gain(db)
    }

    pub fn frequency(&self) -> u64 {
        self.device.frequency()
    }

    pub fn sample_rate(&self) -> u32 {
        self.device.sample_rate()
    }

    pub fn bandwidth(&self) -> u32 {
        self.device.bandwidth()
    }

    pub fn gain(&self) -> i32 {
        self.device.gain()
    }

    pub fn tuning(&self) -> TuningState {
        self.device.tuning()
    }

    /// Resolution the transform is currently planned for.
    pub fn fft_size(&self) -> usize {
        self.builder.transform().size()
    }

    pub fn transform(&self) -> &T {
        self.builder.transform()
    }

    pub fn capture(&self) -> &CaptureChannel {
        &self.capture
    }

    pub fn is_open(&self) -> bool {
        self.device.is_open()
    }

    /// Fill `out` with `out.len()` dB levels in ascending-frequency order.
    pub fn get_spectrum(&mut self, out: &mut [f32]) -> Result<()> {
        self.builder
            .compute_spectrum(&mut self.device, &self.capture, out)
    }

    /// Like [`get_spectrum`](Self::get_spectrum) into a new buffer of `n` bins.
    pub fn spectrum(&mut self, n: usize) -> Result<Vec<f32>> {
        let mut out = Vec::new();
        out.try_reserve_exact(n)
            .map_err(|_| Error::AllocationFailure { size: n })?;
        out.resize(n, 0.0);
        self.get_spectrum(&mut out)?;
        Ok(out)
    }

    /// Disable RX and release the radio.
    pub fn close(mut self) {
        self.device.shutdown();
    }
}

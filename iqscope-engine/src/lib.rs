//! Spectrum acquisition core: tunes a receiver, captures IQ blocks and turns
//! them into frequency-ordered power spectra in dB.

mod analyzer;
mod capture;
mod config;
mod device;
pub mod driver;
mod engine;
mod error;
pub mod spectrum;
mod transform;

pub use analyzer::{Analyzer, open_analyzer};
pub use capture::{CaptureChannel, IqBlock};
pub use config::{AnalyzerConfig, StreamConfig};
pub use device::DeviceHandle;
pub use driver::{DriverStatus, RadioDriver};
pub use engine::{Engine, MAX_CONSECUTIVE_FAILURES};
pub use error::{Error, Parameter, Result};
pub use spectrum::SpectrumBuilder;
pub use transform::{FftEngine, SpectralTransform};

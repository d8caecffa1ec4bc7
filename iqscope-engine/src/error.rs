use std::fmt;
use std::time::Duration;

use crate::driver::DriverStatus;

/// Result type for analyzer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Receiver setting that a configuration call targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Frequency,
    SampleRate,
    Bandwidth,
    Gain,
    Stream,
    RxEnable,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Parameter::Frequency => "frequency",
            Parameter::SampleRate => "sample rate",
            Parameter::Bandwidth => "bandwidth",
            Parameter::Gain => "gain",
            Parameter::Stream => "stream configuration",
            Parameter::RxEnable => "RX enable",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the spectrum analyzer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("No radio could be opened: {status}")]
    DeviceUnavailable { status: DriverStatus },

    #[error("Hardware rejected {parameter}: {status}")]
    ConfigurationRejected {
        parameter: Parameter,
        status: DriverStatus,
    },

    #[error("Acquisition timed out after {timeout:?}")]
    AcquisitionTimeout { timeout: Duration },

    #[error("Acquisition failed: {status}")]
    AcquisitionError { status: DriverStatus },

    #[error("Failed to allocate buffers for {size} bins")]
    AllocationFailure { size: usize },

    #[error("Invalid spectrum size {requested}; at least one bin is required")]
    InvalidSize { requested: usize },
}

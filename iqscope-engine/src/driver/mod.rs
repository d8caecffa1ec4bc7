//! Radio driver seam.
//!
//! The analyzer talks to hardware only through [`RadioDriver`]. Every call is
//! synchronous and returns a definitive accept/reject status; dropping the
//! driver closes the device.

mod file;
mod tone;

use std::fmt;
use std::time::Duration;

use iqscope_messages::Backend;
use log::{info, warn};

use crate::config::StreamConfig;

pub use file::FileRadio;
pub use tone::ToneRadio;

/// Status code reported by a driver call, using libbladeRF numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DriverStatus(pub i32);

impl DriverStatus {
    pub const UNEXPECTED: Self = Self(-1);
    pub const RANGE: Self = Self(-2);
    pub const INVALID: Self = Self(-3);
    pub const MEMORY: Self = Self(-4);
    pub const IO: Self = Self(-5);
    pub const TIMEOUT: Self = Self(-6);
    pub const NO_DEVICE: Self = Self(-7);
    pub const UNSUPPORTED: Self = Self(-8);
    pub const NOT_INIT: Self = Self(-19);

    pub const fn code(self) -> i32 {
        self.0
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::UNEXPECTED => "unexpected error",
            Self::RANGE => "value out of range",
            Self::INVALID => "invalid operation or parameter",
            Self::MEMORY => "memory allocation error",
            Self::IO => "file or device I/O failure",
            Self::TIMEOUT => "operation timed out",
            Self::NO_DEVICE => "no device available",
            Self::UNSUPPORTED => "operation not supported",
            Self::NOT_INIT => "device not initialized",
            _ => "unknown error",
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.0)
    }
}

/// Single-channel receive interface to a radio.
pub trait RadioDriver: Send {
    /// Tune the RX center frequency.
    fn set_frequency(&mut self, hz: u64) -> Result<(), DriverStatus>;

    /// Set the RX sample rate.
    fn set_sample_rate(&mut self, hz: u32) -> Result<(), DriverStatus>;

    /// Set the analog filter bandwidth.
    fn set_bandwidth(&mut self, hz: u32) -> Result<(), DriverStatus>;

    /// Set the overall RX gain.
    fn set_gain(&mut self, db: i32) -> Result<(), DriverStatus>;

    /// Configure the synchronous streaming interface.
    fn configure_stream(&mut self, config: &StreamConfig) -> Result<(), DriverStatus>;

    /// Enable or disable the receive path.
    fn set_rx_enabled(&mut self, enabled: bool) -> Result<(), DriverStatus>;

    /// Fill `samples` with interleaved SC16 Q11 I/Q pairs.
    ///
    /// Blocks until the whole buffer is filled or `timeout` elapses. On error
    /// the buffer contents are unspecified.
    fn read(&mut self, samples: &mut [i16], timeout: Duration) -> Result<(), DriverStatus>;
}

/// Open the first available radio for `backend`.
pub fn open(backend: &Backend) -> Result<Box<dyn RadioDriver>, DriverStatus> {
    match backend {
        Backend::Tone { offset, amplitude } => {
            info!("Opening synthetic tone radio ({} offset, {})", offset, amplitude);
            Ok(Box::new(ToneRadio::new(*offset, *amplitude)))
        }
        Backend::File { path, looping } => {
            info!("Opening capture file {}", path.display());
            let radio = FileRadio::open(path, *looping).map_err(|e| {
                warn!("Unable to open {}: {}", path.display(), e);
                DriverStatus::NO_DEVICE
            })?;
            Ok(Box::new(radio))
        }
    }
}

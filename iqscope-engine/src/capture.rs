use std::time::Duration;

use log::warn;

use crate::device::DeviceHandle;
use crate::driver::DriverStatus;
use crate::error::{Error, Result};

/// One acquisition worth of interleaved SC16 Q11 I/Q pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IqBlock {
    samples: Vec<i16>,
}

impl IqBlock {
    /// Wrap interleaved `I, Q, I, Q, ...` samples. A trailing odd sample is dropped.
    pub fn from_interleaved(mut samples: Vec<i16>) -> Self {
        samples.truncate(samples.len() & !1);
        Self { samples }
    }

    /// Number of I/Q pairs.
    pub fn len(&self) -> usize {
        self.samples.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate over `(I, Q)` pairs in capture order.
    pub fn pairs(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.samples.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Blocking acquisition of fixed-size IQ blocks.
#[derive(Debug, Clone)]
pub struct CaptureChannel {
    read_timeout: Duration,
}

impl CaptureChannel {
    pub fn new(read_timeout: Duration) -> Self {
        Self { read_timeout }
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Block until exactly `n` I/Q pairs have been read from `device`.
    ///
    /// Nothing is returned on failure; a short or failed read never yields
    /// partial data.
    pub fn acquire(&self, device: &mut DeviceHandle, n: usize) -> Result<IqBlock> {
        let len = n.checked_mul(2).ok_or(Error::AllocationFailure { size: n })?;
        let mut samples = Vec::new();
        samples
            .try_reserve_exact(len)
            .map_err(|_| Error::AllocationFailure { size: n })?;
        samples.resize(len, 0);

        match device.read(&mut samples, self.read_timeout) {
            Ok(()) => Ok(IqBlock { samples }),
            Err(DriverStatus::TIMEOUT) => {
                warn!("No samples within {:?}", self.read_timeout);
                Err(Error::AcquisitionTimeout {
                    timeout: self.read_timeout,
                })
            }
            Err(status) => {
                warn!("Sample read failed: {}", status);
                Err(Error::AcquisitionError { status })
            }
        }
    }
}

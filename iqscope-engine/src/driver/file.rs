use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::time::Duration;

use log::{debug, warn};

use super::{DriverStatus, RadioDriver};
use crate::config::StreamConfig;

/// Replays a raw capture as if it were a receiver.
/// Expects interleaved I/Q samples as little-endian i16 pairs (SC16 Q11).
/// Tuning calls are accepted and ignored since the recording is fixed.
#[derive(Debug)]
pub struct FileRadio {
    file: File,
    loop_on_eof: bool,
    rx_enabled: bool,
}

impl FileRadio {
    /// Open a capture file.
    /// If loop_on_eof is true, the file will restart from the beginning on EOF.
    pub fn open<P: AsRef<Path>>(path: P, loop_on_eof: bool) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            file,
            loop_on_eof,
            rx_enabled: false,
        })
    }

    /// Read exactly `buf.len()` bytes, rewinding at EOF when looping.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let mut total_read = 0;
        let mut rewound_empty = false;

        while total_read < buf.len() {
            match self.file.read(&mut buf[total_read..]) {
                Ok(0) => {
                    if !self.loop_on_eof || rewound_empty {
                        return Err(io::ErrorKind::UnexpectedEof.into());
                    }
                    self.file.seek(SeekFrom::Start(0))?;
                    rewound_empty = true;
                }
                Ok(n) => {
                    total_read += n;
                    rewound_empty = false;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}

impl RadioDriver for FileRadio {
    fn set_frequency(&mut self, _hz: u64) -> Result<(), DriverStatus> {
        Ok(())
    }

    fn set_sample_rate(&mut self, _hz: u32) -> Result<(), DriverStatus> {
        Ok(())
    }

    fn set_bandwidth(&mut self, _hz: u32) -> Result<(), DriverStatus> {
        Ok(())
    }

    fn set_gain(&mut self, _db: i32) -> Result<(), DriverStatus> {
        Ok(())
    }

    fn configure_stream(&mut self, _config: &StreamConfig) -> Result<(), DriverStatus> {
        Ok(())
    }

    fn set_rx_enabled(&mut self, enabled: bool) -> Result<(), DriverStatus> {
        self.rx_enabled = enabled;
        Ok(())
    }

    fn read(&mut self, samples: &mut [i16], _timeout: Duration) -> Result<(), DriverStatus> {
        if !self.rx_enabled {
            return Err(DriverStatus::NOT_INIT);
        }

        let mut bytes = vec![0u8; samples.len() * size_of::<i16>()];
        self.fill(&mut bytes).map_err(|e| {
            warn!("Capture file read failed: {}", e);
            DriverStatus::IO
        })?;

        for (sample, raw) in samples.iter_mut().zip(bytes.chunks_exact(2)) {
            *sample = i16::from_le_bytes([raw[0], raw[1]]);
        }

        debug!("Replayed {} samples from capture file", samples.len() / 2);
        Ok(())
    }
}

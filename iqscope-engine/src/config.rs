use std::time::Duration;

use iqscope_messages::TuningState;

/// Streaming setup handed to the driver once at initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Number of DMA buffers
    pub num_buffers: u32,
    /// Samples per buffer
    pub buffer_size: u32,
    /// Simultaneous USB transfers
    pub num_transfers: u32,
    /// Stream-level timeout
    pub timeout: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            num_buffers: 64,
            buffer_size: 16384,
            num_transfers: 16,
            timeout: Duration::from_millis(10_000),
        }
    }
}

/// Everything the analyzer needs at open time.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Tuning applied during initialization
    pub tuning: TuningState,
    /// Streaming interface setup
    pub stream: StreamConfig,
    /// Upper bound for one blocking acquisition
    pub read_timeout: Duration,
    /// Resolution the transform is planned for at open time
    pub fft_size: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            tuning: TuningState::default(),
            stream: StreamConfig::default(),
            read_timeout: Duration::from_millis(5_000),
            fft_size: 1024,
        }
    }
}

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use iqscope_engine::{DriverStatus, Parameter, RadioDriver, Result, SpectralTransform, StreamConfig};
use num_complex::Complex32;

/// What the mock radio saw and how it should answer.
#[derive(Debug, Default)]
pub struct MockState {
    /// Settings the radio refuses, with the status to report
    pub reject: Vec<(Parameter, DriverStatus)>,
    /// Status returned by every read instead of samples
    pub read_failure: Option<DriverStatus>,
    /// Constant (I, Q) pair returned by reads
    pub sample: (i16, i16),
    pub applied: Vec<Parameter>,
    pub reads: usize,
    pub last_timeout: Option<Duration>,
    /// Stream configuration handed to the radio
    pub stream: Option<StreamConfig>,
    pub rx_enabled: bool,
    pub closed: bool,
}

/// Radio double sharing its state with the test through an `Arc<Mutex<_>>`.
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    pub fn new() -> (Box<dyn RadioDriver>, Arc<Mutex<MockState>>) {
        let state = Arc::new(Mutex::new(MockState::default()));
        let driver = Box::new(Self {
            state: state.clone(),
        });
        (driver, state)
    }

    pub fn with(configure: impl FnOnce(&mut MockState)) -> (Box<dyn RadioDriver>, Arc<Mutex<MockState>>) {
        let (driver, state) = Self::new();
        configure(&mut state.lock().unwrap());
        (driver, state)
    }

    fn accept(&self, parameter: Parameter) -> std::result::Result<(), DriverStatus> {
        let mut state = self.state.lock().unwrap();
        if let Some((_, status)) = state.reject.iter().find(|(p, _)| *p == parameter) {
            return Err(*status);
        }
        state.applied.push(parameter);
        Ok(())
    }
}

impl RadioDriver for MockDriver {
    fn set_frequency(&mut self, _hz: u64) -> std::result::Result<(), DriverStatus> {
        self.accept(Parameter::Frequency)
    }

    fn set_sample_rate(&mut self, _hz: u32) -> std::result::Result<(), DriverStatus> {
        self.accept(Parameter::SampleRate)
    }

    fn set_bandwidth(&mut self, _hz: u32) -> std::result::Result<(), DriverStatus> {
        self.accept(Parameter::Bandwidth)
    }

    fn set_gain(&mut self, _db: i32) -> std::result::Result<(), DriverStatus> {
        self.accept(Parameter::Gain)
    }

    fn configure_stream(&mut self, config: &StreamConfig) -> std::result::Result<(), DriverStatus> {
        self.accept(Parameter::Stream)?;
        self.state.lock().unwrap().stream = Some(config.clone());
        Ok(())
    }

    fn set_rx_enabled(&mut self, enabled: bool) -> std::result::Result<(), DriverStatus> {
        self.accept(Parameter::RxEnable)?;
        self.state.lock().unwrap().rx_enabled = enabled;
        Ok(())
    }

    fn read(&mut self, samples: &mut [i16], timeout: Duration) -> std::result::Result<(), DriverStatus> {
        let mut state = self.state.lock().unwrap();
        state.reads += 1;
        state.last_timeout = Some(timeout);
        if let Some(status) = state.read_failure {
            return Err(status);
        }
        let (i, q) = state.sample;
        for pair in samples.chunks_exact_mut(2) {
            pair[0] = i;
            pair[1] = q;
        }
        Ok(())
    }
}

impl Drop for MockDriver {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.closed = true;
        }
    }
}

/// Transform double that counts rebuilds and runs.
///
/// `run` hands the input to `produce`, which writes whatever output the test
/// wants to observe.
#[derive(Debug)]
pub struct CountingTransform {
    input: Vec<Complex32>,
    output: Vec<Complex32>,
    produce: fn(&[Complex32], &mut [Complex32]),
    pub rebuilds: usize,
    pub runs: usize,
    /// Input seen by the most recent run
    pub last_input: Vec<Complex32>,
}

impl CountingTransform {
    pub fn new(n: usize, produce: fn(&[Complex32], &mut [Complex32])) -> Self {
        Self {
            input: vec![Complex32::new(0.0, 0.0); n],
            output: vec![Complex32::new(0.0, 0.0); n],
            produce,
            rebuilds: 0,
            runs: 0,
            last_input: Vec::new(),
        }
    }

    /// Output with energy only in bin 0.
    pub fn dc_only(n: usize) -> Self {
        Self::new(n, |_, output| {
            output.fill(Complex32::new(0.0, 0.0));
            output[0] = Complex32::new(1.0, 0.0);
        })
    }

    /// All-zero output.
    pub fn silent(n: usize) -> Self {
        Self::new(n, |_, output| output.fill(Complex32::new(0.0, 0.0)))
    }
}

impl SpectralTransform for CountingTransform {
    fn ensure_size(&mut self, n: usize) -> Result<()> {
        if n == self.input.len() {
            return Ok(());
        }
        self.input = vec![Complex32::new(0.0, 0.0); n];
        self.output = vec![Complex32::new(0.0, 0.0); n];
        self.rebuilds += 1;
        Ok(())
    }

    fn size(&self) -> usize {
        self.input.len()
    }

    fn input_mut(&mut self) -> &mut [Complex32] {
        &mut self.input
    }

    fn run(&mut self) {
        self.runs += 1;
        self.last_input = self.input.clone();
        (self.produce)(&self.input, &mut self.output);
    }

    fn output(&self) -> &[Complex32] {
        &self.output
    }
}

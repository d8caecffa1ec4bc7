use anyhow::{Context, Result};
use flume::{Receiver, Sender, TryRecvError};
use log::{debug, info, warn};

use iqscope_messages::{Command, EngineState, Event};

use crate::analyzer::Analyzer;
use crate::transform::{FftEngine, SpectralTransform};

/// Consecutive failed acquisitions after which the engine gives up.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Acquisition loop that owns the analyzer on a dedicated thread.
/// Applies commands from the front end between frames and streams spectra back.
pub struct Engine<T = FftEngine> {
    cmd_rx: Receiver<Command>,
    event_tx: Sender<Event>,
    analyzer: Analyzer<T>,
    fft_size: usize,
    failures: u32,
    should_exit: bool,
}

impl<T: SpectralTransform> Engine<T> {
    /// Create a new Engine instance.
    pub fn new(cmd_rx: Receiver<Command>, event_tx: Sender<Event>, analyzer: Analyzer<T>) -> Self {
        debug!("Constructing a new engine");
        let fft_size = analyzer.fft_size();
        Self {
            cmd_rx,
            event_tx,
            analyzer,
            fft_size,
            failures: 0,
            should_exit: false,
        }
    }

    /// Run the engine (blocking).
    ///
    /// Returns when `Stop` arrives, either channel disconnects, or
    /// acquisition keeps failing. The analyzer is closed on every exit.
    pub fn run(mut self) -> Result<()> {
        self.event_tx
            .send(Event::StateSnapshot(self.state()))
            .context("Event receiver gone before the first snapshot")?;

        while !self.should_exit {
            self.process_commands();
            if self.should_exit {
                break;
            }
            self.acquire_frame();
            if self.failures >= MAX_CONSECUTIVE_FAILURES {
                anyhow::bail!(
                    "Giving up after {} consecutive failed acquisitions",
                    self.failures
                );
            }
        }

        info!("Engine stopping");
        self.analyzer.close();
        Ok(())
    }

    fn state(&self) -> EngineState {
        EngineState {
            tuning: self.analyzer.tuning(),
            fft_size: self.fft_size,
        }
    }

    fn process_commands(&mut self) {
        loop {
            let msg = self.cmd_rx.try_recv();
            match msg {
                Ok(cmd) => {
                    debug!("Engine received command: {:?}", cmd);
                    self.apply(cmd);
                }
                Err(TryRecvError::Disconnected) => self.should_exit = true,
                Err(TryRecvError::Empty) => break,
            }
            if self.should_exit {
                break;
            }
        }
    }

    fn apply(&mut self, cmd: Command) {
        let result = match cmd {
            Command::SetFrequency(hz) => self.analyzer.set_frequency(hz).map_err(|e| e.to_string()),
            Command::SetSampleRate(hz) => self.analyzer.set_sample_rate(hz).map_err(|e| e.to_string()),
            Command::SetBandwidth(hz) => self.analyzer.set_bandwidth(hz).map_err(|e| e.to_string()),
            Command::SetGain(db) => self.analyzer.set_gain(db).map_err(|e| e.to_string()),
            Command::SetFftSize(0) => Err("FFT size must be at least one bin".to_string()),
            Command::SetFftSize(n) => {
                self.fft_size = n;
                Ok(())
            }
            Command::Stop => {
                self.should_exit = true;
                return;
            }
        };

        match result {
            Ok(()) => self.emit(Event::StateSnapshot(self.state())),
            Err(message) => {
                warn!("Command rejected: {}", message);
                self.emit(Event::Error(message));
            }
        }
    }

    fn acquire_frame(&mut self) {
        match self.analyzer.spectrum(self.fft_size) {
            Ok(spectrum) => {
                self.failures = 0;
                self.emit(Event::SpectrumData(spectrum));
            }
            Err(e) => {
                self.failures += 1;
                warn!("Spectrum acquisition failed ({}): {}", self.failures, e);
                self.emit(Event::Error(e.to_string()));
            }
        }
    }

    fn emit(&mut self, event: Event) {
        if self.event_tx.send(event).is_err() {
            // Front end has disconnected, terminate the engine
            self.should_exit = true;
        }
    }
}

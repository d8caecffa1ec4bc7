use iqscope_engine::spectrum::{bin_frequency, peak};
use iqscope_engine::{AnalyzerConfig, Engine, open_analyzer};
use iqscope_messages::{Backend, Command, Decibels, Event, Hertz, TuningState};

use clap::Parser;
use log::{LevelFilter, info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Print a live power spectrum summary for a tuned band.
#[derive(Debug, Parser)]
#[command(name = "iqscope", version)]
struct Args {
    /// Center frequency (e.g. 915M)
    #[arg(short, long, default_value = "915M")]
    frequency: Hertz,

    /// Sample rate (e.g. 10M)
    #[arg(short, long, default_value = "10M")]
    sample_rate: Hertz,

    /// Analog bandwidth (e.g. 10M)
    #[arg(short, long, default_value = "10M")]
    bandwidth: Hertz,

    /// RX gain in dB
    #[arg(short, long, default_value_t = 30, allow_negative_numbers = true)]
    gain: i32,

    /// Number of spectrum bins
    #[arg(short = 'n', long, default_value_t = 1024)]
    fft_size: usize,

    /// Number of spectra to print before exiting
    #[arg(long, default_value_t = 10)]
    frames: usize,

    /// Replay an SC16 Q11 capture instead of the synthetic tone
    #[arg(long)]
    file: Option<PathBuf>,

    /// Restart the capture file at EOF
    #[arg(long, requires = "file")]
    looping: bool,

    /// Offset of the synthetic tone from the center frequency
    #[arg(long, default_value = "1M")]
    tone_offset: Hertz,
}

impl Args {
    fn backend(&self) -> Backend {
        match &self.file {
            Some(path) => Backend::File {
                path: path.clone(),
                looping: self.looping,
            },
            None => Backend::Tone {
                offset: self.tone_offset,
                amplitude: Decibels(-6.0),
            },
        }
    }

    fn config(&self) -> anyhow::Result<AnalyzerConfig> {
        let tuning = TuningState {
            center_frequency: self.frequency.as_hz(),
            sample_rate: u32::try_from(self.sample_rate.as_hz())
                .map_err(|_| anyhow::anyhow!("Sample rate {} is too large", self.sample_rate))?,
            bandwidth: u32::try_from(self.bandwidth.as_hz())
                .map_err(|_| anyhow::anyhow!("Bandwidth {} is too large", self.bandwidth))?,
            gain: self.gain,
        };
        Ok(AnalyzerConfig {
            tuning,
            fft_size: self.fft_size,
            ..AnalyzerConfig::default()
        })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .format(|buf, record| {
            writeln!(
                buf,
                "{:<5} - {} | {}",
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .filter_level(LevelFilter::Warn)
        .filter_module("iqscope", LevelFilter::Info)
        .filter_module("iqscope_engine::driver", LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = args.config()?;
    let analyzer = open_analyzer(&args.backend(), config)?;

    // Create flume channels for bidirectional communication
    let (cmd_tx, cmd_rx) = flume::unbounded();
    let (event_tx, event_rx) = flume::bounded(1);

    // Spawn engine thread
    let engine_handle = std::thread::spawn(move || Engine::new(cmd_rx, event_tx, analyzer).run());

    let mut tuning = None;
    let mut printed = 0;
    while printed < args.frames {
        match event_rx.recv_timeout(Duration::from_secs(10)) {
            Ok(Event::StateSnapshot(state)) => {
                let (low, high) = state.tuning.span();
                info!("Viewing {} .. {} in {} bins", low, high, state.fft_size);
                tuning = Some(state.tuning);
            }
            Ok(Event::SpectrumData(spectrum)) => {
                printed += 1;
                if let (Some(tuning), Some((bin, level))) = (tuning.as_ref(), peak(&spectrum)) {
                    let frequency = bin_frequency(bin, spectrum.len(), tuning);
                    println!(
                        "frame {:>4}: peak {} at {}",
                        printed,
                        Decibels(level),
                        Hertz(frequency.round() as u64)
                    );
                }
            }
            Ok(Event::Error(message)) => warn!("{}", message),
            Err(_) => break,
        }
    }

    // Done - send stop command to engine
    let _ = cmd_tx.send(Command::Stop);
    drop(event_rx);

    // Wait for engine thread to finish
    engine_handle
        .join()
        .map_err(|_| anyhow::anyhow!("Engine thread panicked"))??;

    Ok(())
}

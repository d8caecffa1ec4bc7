/// Commands sent from the front end to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Stop the engine and close the analyzer.
    Stop,
    /// Retune the center frequency (Hz).
    SetFrequency(u64),
    /// Change the sample rate (Hz).
    SetSampleRate(u32),
    /// Change the analog bandwidth (Hz).
    SetBandwidth(u32),
    /// Change the RX gain (dB).
    SetGain(i32),
    /// Change the number of spectrum bins per frame.
    SetFftSize(usize),
}

use crate::EngineState;

/// Events sent from the engine to the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Sent on startup and after every accepted setting change.
    StateSnapshot(EngineState),
    /// One power spectrum in dB, ascending frequency.
    SpectrumData(Vec<f32>),
    /// A command was rejected or an acquisition failed.
    Error(String),
}

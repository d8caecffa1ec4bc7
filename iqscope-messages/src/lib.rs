mod command;
mod event;
mod state;
mod units;

pub use command::Command;
pub use event::Event;
pub use state::{Backend, EngineState, TuningState};
pub use units::{Decibels, Hertz, ParseHertzError};

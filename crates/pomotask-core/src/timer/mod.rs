mod engine;
mod phase;
mod runner;
mod settings;
mod ticker;

pub use engine::TimerEngine;
pub use phase::{Phase, TimerConfig};
pub use runner::{CycleRunner, PhaseOutcome, RunOutcome};
pub use ticker::Ticker;

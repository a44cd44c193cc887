//! Scheduling: clocks and the loop that feeds them to the controller

pub mod clock;
pub mod runner;

pub use clock::{LiveClock, ReplayClock};
pub use runner::{run, RunSummary};

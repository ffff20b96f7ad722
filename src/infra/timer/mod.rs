//! Poll timers.

pub mod manual;

pub use manual::{ManualTimer, PollRequest};

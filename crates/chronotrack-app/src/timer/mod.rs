//! Active-timer state machine

pub mod controller;
pub mod events;

pub use controller::TimerController;
pub use events::{TimerEvent, TimerEventType};

#[cfg(test)]
mod tests;

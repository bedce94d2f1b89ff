//! Platform abstraction layer
//!
//! Handles the host side of the fixed-timestep loop:
//! - Time/ticks (`clock`)
//! - Input events (`input`)

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::{Action, KeyTracker};

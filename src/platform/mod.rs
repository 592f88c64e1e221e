//! Platform abstraction layer
//!
//! Turns browser/native device events into simulation commands:
//! - Keyboard keys by DOM name
//! - Mouse aim and trigger
//! - Split-screen touch joysticks

pub mod input;

pub use input::{InputState, Key, ScreenHalf, Stick, TouchSticks};

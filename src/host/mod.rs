//! Host Module - Terminal stand-in for the hosting application
//!
//! The surface expects lifecycle hooks from a host (visible, hidden,
//! foreground, background) plus user gestures on the map. In a terminal
//! these come from the keyboard and crossterm resize events.

pub mod input;

pub use input::{convert_event, convert_key_event, poll_command, HostCommand, PAN_STEP};

//! Core traits and types for frame-stepped emulation.
//!
//! Machines advance one video frame at a time. This crate holds the
//! pieces that do not depend on any particular machine: colour
//! conversion for hardware pixel formats and read-only state queries.

mod observable;
pub mod pixel;

pub use observable::{Observable, Value};
pub use pixel::{Rgb888, rgb565_to_rgb888};

//! Dual-CPU handheld emulation core.
//!
//! Hosts step a core one frame at a time and read back the ARM9/ARM7
//! register files and both 256x192 screens. Two backends implement the
//! same contract:
//!
//! - a native backend that forwards to a hardware-accurate module bound
//!   at runtime through a fixed C ABI, and
//! - a synthetic backend that produces animated placeholder output so the
//!   host stays interactive when no module is installed.
//!
//! The backend is chosen once at startup by [`Backend::select`].

mod backend;
#[cfg(feature = "native")]
pub mod capture;
mod config;
mod emulator;
mod error;
pub mod frame;
#[allow(unsafe_code)]
pub mod native;
pub mod session;
pub mod synthetic;

pub use backend::Backend;
pub use config::{FRAME_INTERVAL, NdsConfig};
pub use emulator::EmulatorCore;
pub use error::{BindError, CoreError, ProbeError};
pub use frame::{CpuRegisters, FrameState, Framebuffer};
pub use native::{NativeCore, NativeModule};
pub use session::Session;
pub use synthetic::SyntheticCore;

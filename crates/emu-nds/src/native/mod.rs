//! Backend that delegates to a hardware-accurate native module.
//!
//! Every operation is forwarded through the ABI in [`abi`]. After each
//! step the core pulls both register blocks and both RGB565 screens,
//! converts the screens to RGB888, and only then publishes the new frame.

pub mod abi;
pub mod loader;

use std::ffi::CString;
use std::path::Path;

use emu_core::pixel::convert_rgb565;
use log::{debug, error, info, trace, warn};

use crate::emulator::{EmulatorCore, ensure_readable};
use crate::error::CoreError;
use crate::frame::{CpuRegisters, FB_PIXELS, FrameState, Framebuffer};

pub use loader::{NativeModule, bind, default_candidates, probe};

use abi::REGISTER_BLOCK_WORDS;

/// Core backed by a bound native module.
#[derive(Debug)]
pub struct NativeCore {
    module: NativeModule,
    state: FrameState,
    /// Scratch space for the module's RGB565 output.
    raw_top: Box<[u16]>,
    raw_bottom: Box<[u16]>,
}

impl NativeCore {
    /// Initialize the module and wrap it.
    ///
    /// A nonzero status from the module's initialize entry point fails
    /// construction; no frame state exists until initialization succeeds.
    pub fn new(module: NativeModule) -> Result<Self, CoreError> {
        let entry = module.entry_points();
        // SAFETY: `init` takes no arguments.
        let status = unsafe { (entry.init)() };
        if status != 0 {
            error!("native backend initialization failed (status {status})");
            return Err(CoreError::InitFailed { status });
        }
        Ok(Self {
            module,
            state: FrameState::new(),
            raw_top: vec![0; FB_PIXELS].into_boxed_slice(),
            raw_bottom: vec![0; FB_PIXELS].into_boxed_slice(),
        })
    }

    /// The bound module.
    #[must_use]
    pub fn module(&self) -> &NativeModule {
        &self.module
    }

    fn pull_registers(read: abi::ReadRegistersFn) -> CpuRegisters {
        let mut block = [0u32; REGISTER_BLOCK_WORDS];
        // SAFETY: `block` holds the 17 words the ABI writes.
        unsafe { read(block.as_mut_ptr()) };
        CpuRegisters::from_block(&block)
    }
}

impl EmulatorCore for NativeCore {
    fn load_program(&mut self, path: &Path) -> Result<(), CoreError> {
        ensure_readable(path)?;
        let c_path = path
            .to_str()
            .and_then(|s| CString::new(s).ok())
            .ok_or(CoreError::InvalidPath)?;

        let entry = self.module.entry_points();
        // SAFETY: `c_path` is NUL-terminated and outlives the call.
        let status = unsafe { (entry.load_program)(c_path.as_ptr()) };
        if status != 0 {
            warn!("native backend rejected {} (status {status})", path.display());
            return Err(CoreError::ProgramRejected { status });
        }

        info!("native backend loaded {}", path.display());
        self.state.program_path = Some(path.to_path_buf());
        Ok(())
    }

    fn reset(&mut self) {
        let entry = self.module.entry_points();
        // SAFETY: `reset` takes no arguments.
        unsafe { (entry.reset)() };
        debug!("native backend: reset");
        self.state.clear();
    }

    fn step_frame(&mut self) {
        let entry = self.module.entry_points();
        // SAFETY: `step_frame` takes no arguments.
        unsafe { (entry.step_frame)() };
        let arm9 = Self::pull_registers(entry.read_arm9_registers);
        let arm7 = Self::pull_registers(entry.read_arm7_registers);
        // SAFETY: both scratch buffers hold the 256x192 halfwords the ABI
        // writes.
        unsafe {
            (entry.read_top_framebuffer)(self.raw_top.as_mut_ptr());
            (entry.read_bottom_framebuffer)(self.raw_bottom.as_mut_ptr());
        }

        let mut top = Framebuffer::new();
        convert_rgb565(&self.raw_top, top.pixels_mut());
        let mut bottom = Framebuffer::new();
        convert_rgb565(&self.raw_bottom, bottom.pixels_mut());

        let frame = self.state.frame_counter + 1;
        self.state = FrameState {
            program_path: self.state.program_path.take(),
            frame_counter: frame,
            arm9,
            arm7,
            top,
            bottom,
        };
        trace!("native backend: frame {frame}");
    }

    fn state(&self) -> &FrameState {
        &self.state
    }
}

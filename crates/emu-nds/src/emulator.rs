//! The emulation core contract.
//!
//! A host drives a core one frame at a time from a single control thread
//! and reads back registers and screens between steps. The core never
//! synchronises internally; a host that shares one core between threads
//! must wrap it in a mutex.

use std::fs;
use std::io;
use std::path::Path;

use emu_core::{Observable, Value};

use crate::error::CoreError;
use crate::frame::{CpuRegisters, FrameState, Framebuffer, GPR_COUNT};

/// Capability set shared by every backend.
pub trait EmulatorCore {
    /// Load a program image.
    ///
    /// On failure the frame state, including `program_path`, is unchanged.
    fn load_program(&mut self, path: &Path) -> Result<(), CoreError>;

    /// Return to frame 0.
    ///
    /// Registers and screens go back to the blank state; the loaded
    /// program path is kept. Fresh content arrives with the next step.
    fn reset(&mut self);

    /// Advance exactly one frame and publish the new state.
    fn step_frame(&mut self);

    /// The most recently published state.
    fn state(&self) -> &FrameState;

    /// ARM9 registers, ARM7 registers, ARM9 CPSR, ARM7 CPSR.
    fn registers(&self) -> (&[u32; GPR_COUNT], &[u32; GPR_COUNT], u32, u32) {
        let state = self.state();
        (
            &state.arm9.gpr,
            &state.arm7.gpr,
            state.arm9.cpsr,
            state.arm7.cpsr,
        )
    }

    /// Top and bottom screens.
    fn framebuffers(&self) -> (&Framebuffer, &Framebuffer) {
        let state = self.state();
        (&state.top, &state.bottom)
    }

    fn frame_counter(&self) -> u64 {
        self.state().frame_counter
    }

    fn program_path(&self) -> Option<&Path> {
        self.state().program_path.as_deref()
    }
}

/// Check that `path` names a regular file this process can open.
///
/// Format checks belong to whichever backend consumes the image.
pub(crate) fn ensure_readable(path: &Path) -> Result<(), CoreError> {
    let unreadable = |source: io::Error| CoreError::ProgramUnreadable {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::open(path).map_err(unreadable)?;
    let metadata = file.metadata().map_err(unreadable)?;
    if !metadata.is_file() {
        return Err(unreadable(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    Ok(())
}

/// Queryable paths of a backend. `FrameState` answers all but the first.
pub(crate) const QUERY_PATHS: &[&str] = &[
    "backend",
    "frame_count",
    "program",
    "program_loaded",
    "arm9.r<0-15>",
    "arm9.pc",
    "arm9.sp",
    "arm9.lr",
    "arm9.cpsr",
    "arm9.regs",
    "arm7.r<0-15>",
    "arm7.pc",
    "arm7.sp",
    "arm7.lr",
    "arm7.cpsr",
    "arm7.regs",
];

fn query_cpu(regs: &CpuRegisters, path: &str) -> Option<Value> {
    match path {
        "cpsr" => Some(regs.cpsr.into()),
        "regs" => Some(Value::from(&regs.gpr[..])),
        "pc" => Some(regs.gpr[15].into()),
        "sp" => Some(regs.gpr[13].into()),
        "lr" => Some(regs.gpr[14].into()),
        _ => {
            let index: usize = path.strip_prefix('r')?.parse().ok()?;
            regs.gpr.get(index).map(|&r| r.into())
        }
    }
}

impl Observable for FrameState {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("arm9.") {
            query_cpu(&self.arm9, rest)
        } else if let Some(rest) = path.strip_prefix("arm7.") {
            query_cpu(&self.arm7, rest)
        } else {
            match path {
                "frame_count" => Some(self.frame_counter.into()),
                "program" => self
                    .program_path
                    .as_ref()
                    .map(|p| Value::from(p.display().to_string())),
                "program_loaded" => Some(self.program_path.is_some().into()),
                _ => None,
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &QUERY_PATHS[1..]
    }
}

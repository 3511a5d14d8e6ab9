//! Host-side control of a core: load, run, stop, reset and ticking.
//!
//! A session is driven from one thread. `stop` only prevents the next
//! tick; it never interrupts a step in progress.

use std::fmt::Write as _;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::backend::Backend;
use crate::config::FRAME_INTERVAL;
use crate::emulator::EmulatorCore;
use crate::error::CoreError;

/// Display name when no program is loaded.
pub const NO_PROGRAM: &str = "NO GAME";

/// A core plus the host's run state.
#[derive(Debug)]
pub struct Session<C = Backend> {
    core: C,
    running: bool,
    frame_interval: Duration,
}

impl<C: EmulatorCore> Session<C> {
    #[must_use]
    pub fn new(core: C) -> Self {
        Self::with_interval(core, FRAME_INTERVAL)
    }

    #[must_use]
    pub fn with_interval(core: C, frame_interval: Duration) -> Self {
        Self {
            core,
            running: false,
            frame_interval,
        }
    }

    /// Load a program, then reset.
    ///
    /// On failure nothing changes and the reason is returned.
    pub fn load(&mut self, path: &Path) -> Result<(), CoreError> {
        self.core.load_program(path)?;
        info!("loaded {}", self.program_name());
        self.reset();
        Ok(())
    }

    /// Start running. Refused when no program is loaded.
    pub fn run(&mut self) -> bool {
        if self.core.program_path().is_none() {
            warn!("no program loaded");
            return false;
        }
        if !self.running {
            info!("emulation running");
            self.running = true;
        }
        true
    }

    /// Stop before the next tick.
    pub fn stop(&mut self) {
        if self.running {
            info!("emulation stopped");
        }
        self.running = false;
    }

    /// Reset the core and stop.
    pub fn reset(&mut self) {
        self.core.reset();
        self.running = false;
        info!("system reset");
    }

    /// Step one frame if running. Returns whether a step happened.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.core.step_frame();
        true
    }

    /// Step one frame regardless of the run state.
    pub fn step(&mut self) {
        self.core.step_frame();
    }

    /// Issue up to `frames` ticks, stopping early once not running.
    ///
    /// With `pace` set, sleeps between ticks to hold the frame interval.
    /// Returns the number of frames stepped.
    pub fn run_for(&mut self, frames: u32, pace: bool) -> u32 {
        let mut stepped = 0;
        for _ in 0..frames {
            let start = Instant::now();
            if !self.tick() {
                break;
            }
            stepped += 1;
            if pace {
                thread::sleep(self.frame_interval.saturating_sub(start.elapsed()));
            }
        }
        stepped
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// File name of the core's loaded program, or [`NO_PROGRAM`].
    #[must_use]
    pub fn program_name(&self) -> String {
        match self.core.program_path() {
            Some(path) => path.file_name().map_or_else(
                || path.display().to_string(),
                |n| n.to_string_lossy().into_owned(),
            ),
            None => NO_PROGRAM.to_string(),
        }
    }

    #[must_use]
    pub fn core(&self) -> &C {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    /// Text view of both register files.
    #[must_use]
    pub fn register_dump(&self) -> String {
        let (arm9, arm7, cpsr9, cpsr7) = self.core.registers();
        let mut text = String::new();
        for (title, gpr, cpsr) in [
            ("ARM9 (67 MHz)", arm9, cpsr9),
            ("ARM7 (33 MHz)", arm7, cpsr7),
        ] {
            if !text.is_empty() {
                text.push('\n');
            }
            let _ = writeln!(text, "{title}");
            for (i, pair) in gpr.chunks_exact(2).enumerate() {
                let _ = writeln!(
                    text,
                    "R{:02}={:08X}   R{:02}={:08X}",
                    i * 2,
                    pair[0],
                    i * 2 + 1,
                    pair[1]
                );
            }
            let _ = writeln!(text, "CPSR={cpsr:08X}");
        }
        text
    }
}

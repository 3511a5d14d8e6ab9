//! Synthetic backend: keeps the host alive when no native module is bound.
//!
//! Registers are random on every step. Screens are a pure function of the
//! frame counter: 8-pixel horizontal bands alternating between a colour
//! that cycles with the frame number and a fixed dark colour. Replaying
//! the same number of steps after a reset reproduces the same screens.
//!
//! The two frame-dependent colours are the band colours of the two
//! screens ([`top_band_colour`], [`bottom_band_colour`]); each screen's
//! dark band in between stays constant.

use std::path::Path;

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use emu_core::Rgb888;

use crate::emulator::{EmulatorCore, ensure_readable};
use crate::error::CoreError;
use crate::frame::{CpuRegisters, FB_HEIGHT, FB_WIDTH, FrameState, Framebuffer};

/// CPSR mode encodings: User, System, Supervisor.
pub const CPSR_MODES: [u32; 3] = [0x10, 0x1F, 0x13];

/// Height of one colour band in scanlines.
const BAND_HEIGHT: usize = 8;

const TOP_BACKGROUND: Rgb888 = Rgb888::new(42, 54, 84);
const BOTTOM_BACKGROUND: Rgb888 = Rgb888::new(34, 34, 34);

/// Animated band colour for the top screen.
#[must_use]
pub fn top_band_colour(frame: u64) -> Rgb888 {
    Rgb888::new(60 + 10 * (frame % 6) as u8, 50, 255)
}

/// Animated band colour for the bottom screen.
#[must_use]
pub fn bottom_band_colour(frame: u64) -> Rgb888 {
    Rgb888::new(255, 60 + 7 * (frame % 8) as u8, 80)
}

fn banded(band: Rgb888, background: Rgb888) -> Framebuffer {
    let mut fb = Framebuffer::new();
    for (y, row) in fb.pixels_mut().chunks_exact_mut(FB_WIDTH).enumerate() {
        let colour = if (y / BAND_HEIGHT) % 2 == 0 {
            band
        } else {
            background
        };
        row.fill(colour);
    }
    debug_assert_eq!(fb.pixels().len(), FB_WIDTH * FB_HEIGHT);
    fb
}

/// Top and bottom screens for the given frame number.
#[must_use]
pub fn synthesize_framebuffers(frame: u64) -> (Framebuffer, Framebuffer) {
    (
        banded(top_band_colour(frame), TOP_BACKGROUND),
        banded(bottom_band_colour(frame), BOTTOM_BACKGROUND),
    )
}

/// Random register file with a plausible CPSR mode.
pub fn synthesize_registers<R: Rng>(rng: &mut R) -> CpuRegisters {
    let mut regs = CpuRegisters::default();
    for r in &mut regs.gpr {
        *r = rng.random();
    }
    regs.cpsr = *CPSR_MODES.choose(rng).unwrap_or(&CPSR_MODES[0]);
    regs
}

/// Backend with no CPU semantics.
///
/// The register source is pluggable so tests can seed it; screen
/// synthesis never touches it.
#[derive(Debug)]
pub struct SyntheticCore<R = StdRng> {
    state: FrameState,
    rng: R,
}

impl SyntheticCore<StdRng> {
    /// Synthetic core seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Synthetic core with reproducible register data.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for SyntheticCore<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SyntheticCore<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            state: FrameState::new(),
            rng,
        }
    }
}

impl<R: Rng> EmulatorCore for SyntheticCore<R> {
    fn load_program(&mut self, path: &Path) -> Result<(), CoreError> {
        ensure_readable(path)?;
        info!("synthetic core: loaded {}", path.display());
        self.state.program_path = Some(path.to_path_buf());
        Ok(())
    }

    fn reset(&mut self) {
        debug!("synthetic core: reset");
        self.state.clear();
    }

    fn step_frame(&mut self) {
        let frame = self.state.frame_counter + 1;
        let arm9 = synthesize_registers(&mut self.rng);
        let arm7 = synthesize_registers(&mut self.rng);
        let (top, bottom) = synthesize_framebuffers(frame);

        self.state = FrameState {
            program_path: self.state.program_path.take(),
            frame_counter: frame,
            arm9,
            arm7,
            top,
            bottom,
        };
        trace!("synthetic core: frame {frame}");
    }

    fn state(&self) -> &FrameState {
        &self.state
    }
}

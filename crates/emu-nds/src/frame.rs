//! Per-frame machine state: registers and both screens.
//!
//! A `FrameState` is owned by exactly one core. Cores build the next
//! frame's state off to the side and replace the published value in one
//! assignment, so a reader holding `&FrameState` never sees a mix of two
//! frames.

use std::path::PathBuf;

use emu_core::Rgb888;

/// Screen width in pixels (both screens).
pub const FB_WIDTH: usize = 256;
/// Screen height in pixels (both screens).
pub const FB_HEIGHT: usize = 192;
/// Pixels per screen.
pub const FB_PIXELS: usize = FB_WIDTH * FB_HEIGHT;

/// General-purpose registers per CPU (R0-R15).
pub const GPR_COUNT: usize = 16;

/// One CPU's register file: R0-R15 plus the status register (CPSR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuRegisters {
    pub gpr: [u32; GPR_COUNT],
    pub cpsr: u32,
}

impl CpuRegisters {
    /// Split a 17-word block (R0-R15, CPSR) as laid out by the native ABI.
    #[must_use]
    pub fn from_block(block: &[u32; GPR_COUNT + 1]) -> Self {
        let mut gpr = [0; GPR_COUNT];
        gpr.copy_from_slice(&block[..GPR_COUNT]);
        Self {
            gpr,
            cpsr: block[GPR_COUNT],
        }
    }
}

/// A fixed 256x192 RGB888 screen.
///
/// The pixel storage is allocated once at the fixed size and never
/// resized; only its contents change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: Box<[Rgb888]>,
}

impl Framebuffer {
    /// A black screen.
    #[must_use]
    pub fn new() -> Self {
        Self::filled(Rgb888::BLACK)
    }

    /// A screen filled with one colour.
    #[must_use]
    pub fn filled(colour: Rgb888) -> Self {
        Self {
            pixels: vec![colour; FB_PIXELS].into_boxed_slice(),
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        FB_WIDTH
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        FB_HEIGHT
    }

    /// Row-major pixels.
    #[must_use]
    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    /// Mutable row-major pixels. The slice length is fixed.
    pub fn pixels_mut(&mut self) -> &mut [Rgb888] {
        &mut self.pixels
    }

    /// Pixel at (x, y). Returns `None` outside the screen.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb888> {
        if x >= FB_WIDTH || y >= FB_HEIGHT {
            return None;
        }
        Some(self.pixels[y * FB_WIDTH + x])
    }

    /// One row of pixels. Returns `None` below the last scanline.
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[Rgb888]> {
        if y >= FB_HEIGHT {
            return None;
        }
        self.pixels.get(y * FB_WIDTH..(y + 1) * FB_WIDTH)
    }

    /// Packed RGB bytes, three per pixel.
    #[must_use]
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_bytes()).collect()
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers and screens for the most recently completed frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameState {
    /// Program image set by the last successful load.
    pub program_path: Option<PathBuf>,
    /// Frames stepped since construction or the last reset.
    pub frame_counter: u64,
    pub arm9: CpuRegisters,
    pub arm7: CpuRegisters,
    pub top: Framebuffer,
    pub bottom: Framebuffer,
}

impl FrameState {
    /// Blank state: zeroed registers, black screens, no program.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return to the blank state while keeping the loaded program.
    pub fn clear(&mut self) {
        let program_path = self.program_path.take();
        *self = Self {
            program_path,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_state_dimensions() {
        let state = FrameState::new();
        assert_eq!(state.frame_counter, 0);
        assert!(state.program_path.is_none());
        assert_eq!(state.arm9.gpr.len(), GPR_COUNT);
        assert_eq!(state.top.pixels().len(), FB_PIXELS);
        assert_eq!(state.bottom.pixels().len(), FB_PIXELS);
        assert!(state.top.pixels().iter().all(|&p| p == Rgb888::BLACK));
    }

    #[test]
    fn register_block_split() {
        let mut block = [0u32; 17];
        for (i, word) in block.iter_mut().enumerate() {
            *word = i as u32 * 0x1111;
        }
        let regs = CpuRegisters::from_block(&block);
        assert_eq!(regs.gpr[0], 0);
        assert_eq!(regs.gpr[15], 15 * 0x1111);
        assert_eq!(regs.cpsr, 16 * 0x1111);
    }

    #[test]
    fn clear_keeps_program() {
        let mut state = FrameState::new();
        state.program_path = Some(PathBuf::from("game.nds"));
        state.frame_counter = 42;
        state.arm9.cpsr = 0x1F;
        state.top = Framebuffer::filled(Rgb888::new(1, 2, 3));

        state.clear();

        assert_eq!(state.program_path, Some(PathBuf::from("game.nds")));
        assert_eq!(state.frame_counter, 0);
        assert_eq!(state.arm9, CpuRegisters::default());
        assert_eq!(state.top, Framebuffer::new());
    }

    #[test]
    fn pixel_bounds() {
        let fb = Framebuffer::filled(Rgb888::new(9, 9, 9));
        assert_eq!(fb.pixel(255, 191), Some(Rgb888::new(9, 9, 9)));
        assert_eq!(fb.pixel(256, 0), None);
        assert_eq!(fb.pixel(0, 192), None);
        assert_eq!(fb.row(3).map(<[Rgb888]>::len), Some(FB_WIDTH));
        assert_eq!(fb.row(191).map(<[Rgb888]>::len), Some(FB_WIDTH));
        assert_eq!(fb.row(192), None);
        assert_eq!(fb.row(usize::MAX / FB_WIDTH), None);
        assert_eq!(fb.to_rgb_bytes().len(), FB_PIXELS * 3);
    }
}

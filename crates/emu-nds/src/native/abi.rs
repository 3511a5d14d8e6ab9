//! Binary interface exported by hardware-accurate backend modules.
//!
//! | Symbol                      | Signature                    | Contract                      |
//! |-----------------------------|------------------------------|-------------------------------|
//! | `nogba_init`                | `int (void)`                 | 0 = ready, nonzero = unusable |
//! | `nogba_reset`               | `void (void)`                | never fails                   |
//! | `nogba_load_rom`            | `int (const char *path)`     | 0 = loaded                    |
//! | `nogba_run_frame`           | `void (void)`                | runs one frame synchronously  |
//! | `nogba_get_arm9_regs`       | `void (uint32_t dst[17])`    | R0-R15 then CPSR              |
//! | `nogba_get_arm7_regs`       | `void (uint32_t dst[17])`    | R0-R15 then CPSR              |
//! | `nogba_get_framebuffer_top` | `void (uint16_t dst[49152])` | 256x192 RGB565, row-major     |
//! | `nogba_get_framebuffer_bot` | `void (uint16_t dst[49152])` | 256x192 RGB565, row-major     |
//!
//! A module must export all eight symbols to be usable.

use std::ffi::{c_char, c_int};

use crate::frame::{FB_PIXELS, GPR_COUNT};

/// Revision of the table above. Bumped on any signature or layout change.
pub const ABI_VERSION: u32 = 1;

/// Words written by each register read: R0-R15 and CPSR.
pub const REGISTER_BLOCK_WORDS: usize = GPR_COUNT + 1;

/// Halfwords written by each framebuffer read.
pub const FRAMEBUFFER_WORDS: usize = FB_PIXELS;

pub const SYM_INIT: &str = "nogba_init";
pub const SYM_RESET: &str = "nogba_reset";
pub const SYM_LOAD_PROGRAM: &str = "nogba_load_rom";
pub const SYM_STEP_FRAME: &str = "nogba_run_frame";
pub const SYM_ARM9_REGISTERS: &str = "nogba_get_arm9_regs";
pub const SYM_ARM7_REGISTERS: &str = "nogba_get_arm7_regs";
pub const SYM_TOP_FRAMEBUFFER: &str = "nogba_get_framebuffer_top";
pub const SYM_BOTTOM_FRAMEBUFFER: &str = "nogba_get_framebuffer_bot";

/// Every required symbol, in resolution order.
pub const REQUIRED_SYMBOLS: [&str; 8] = [
    SYM_INIT,
    SYM_RESET,
    SYM_LOAD_PROGRAM,
    SYM_STEP_FRAME,
    SYM_ARM9_REGISTERS,
    SYM_ARM7_REGISTERS,
    SYM_TOP_FRAMEBUFFER,
    SYM_BOTTOM_FRAMEBUFFER,
];

pub type InitFn = unsafe extern "C" fn() -> c_int;
pub type ResetFn = unsafe extern "C" fn();
pub type LoadProgramFn = unsafe extern "C" fn(path: *const c_char) -> c_int;
pub type StepFrameFn = unsafe extern "C" fn();
pub type ReadRegistersFn = unsafe extern "C" fn(dst: *mut u32);
pub type ReadFramebufferFn = unsafe extern "C" fn(dst: *mut u16);

/// Resolved entry points of one module.
#[derive(Debug, Clone, Copy)]
pub struct EntryPoints {
    pub init: InitFn,
    pub reset: ResetFn,
    pub load_program: LoadProgramFn,
    pub step_frame: StepFrameFn,
    pub read_arm9_registers: ReadRegistersFn,
    pub read_arm7_registers: ReadRegistersFn,
    pub read_top_framebuffer: ReadFramebufferFn,
    pub read_bottom_framebuffer: ReadFramebufferFn,
}

//! Headless capture: PNG screenshots of both screens.

use std::error::Error;
use std::fs;
use std::io::BufWriter;
use std::path::Path;

use crate::emulator::EmulatorCore;
use crate::frame::{FB_HEIGHT, FB_WIDTH};
use crate::session::Session;

/// Width of a screenshot in pixels.
pub const SHOT_WIDTH: u32 = FB_WIDTH as u32;
/// Height of a screenshot: top screen stacked above the bottom screen.
pub const SHOT_HEIGHT: u32 = (FB_HEIGHT * 2) as u32;

/// Both screens as one RGB byte buffer, top screen first.
#[must_use]
pub fn stacked_rgb<C: EmulatorCore + ?Sized>(core: &C) -> Vec<u8> {
    let (top, bottom) = core.framebuffers();
    let mut rgb = top.to_rgb_bytes();
    rgb.extend(bottom.to_rgb_bytes());
    rgb
}

/// Save both screens as a single PNG file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_screenshot<C: EmulatorCore + ?Sized>(
    core: &C,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let file = fs::File::create(path)?;
    let w = BufWriter::new(file);
    let mut encoder = png::Encoder::new(w, SHOT_WIDTH, SHOT_HEIGHT);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&stacked_rgb(core))?;
    Ok(())
}

/// Step `num_frames` frames, saving each as `dir/frames/NNNNNN.png`.
///
/// # Errors
///
/// Returns an error if frames cannot be saved.
pub fn record<C: EmulatorCore>(
    session: &mut Session<C>,
    dir: &Path,
    num_frames: u32,
) -> Result<(), Box<dyn Error>> {
    let frames_dir = dir.join("frames");
    fs::create_dir_all(&frames_dir)?;

    for i in 1..=num_frames {
        session.step();
        let filename = frames_dir.join(format!("{i:06}.png"));
        save_screenshot(session.core(), &filename)?;
    }

    log::info!("captured {num_frames} frames to {}", frames_dir.display());
    Ok(())
}

//! Packed-pixel colour conversion.
//!
//! Handheld video hardware stores each pixel as a 16-bit RGB565 word:
//! red in bits 11-15, green in bits 5-10, blue in bits 0-4. Hosts want
//! 8 bits per channel, so each field is shifted into the top of its
//! output byte. The low bits are left clear rather than replicated, so
//! the expansion is lossy: RGB888 -> RGB565 -> RGB888 drops the low 3
//! (red, blue) or 2 (green) bits of every channel.

/// A 24-bit display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb888 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb888 {
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels in R, G, B byte order.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Convert one RGB565 pixel to RGB888.
#[must_use]
pub const fn rgb565_to_rgb888(pixel: u16) -> Rgb888 {
    let r = ((pixel >> 11) & 0x1F) as u8;
    let g = ((pixel >> 5) & 0x3F) as u8;
    let b = (pixel & 0x1F) as u8;
    Rgb888::new(r << 3, g << 2, b << 3)
}

/// Convert a row-major RGB565 buffer into `dst`.
///
/// Converts `min(src.len(), dst.len())` pixels; callers size both buffers
/// from the same dimensions.
pub fn convert_rgb565(src: &[u16], dst: &mut [Rgb888]) {
    for (out, &pixel) in dst.iter_mut().zip(src) {
        *out = rgb565_to_rgb888(pixel);
    }
}

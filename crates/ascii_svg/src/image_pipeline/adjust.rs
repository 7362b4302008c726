use super::background::Rgb;
use super::loader::PixelBuffer;

/// Rec. 601 luma in `[0, 255]`.
///
/// Integer weights keep equal channels exact, so white is exactly 255.0.
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    let weighted = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    weighted as f32 / 1000.0
}

/// Zero the alpha of every pixel within `threshold` RGB distance of `background`.
///
/// Returns the number of pixels that were suppressed.
pub fn suppress_background(buffer: &mut PixelBuffer, background: Rgb, threshold: f32) -> usize {
    let mut suppressed = 0;
    for pixel in buffer.pixels_mut() {
        if background.distance(pixel[0], pixel[1], pixel[2]) < threshold {
            pixel[3] = 0;
            suppressed += 1;
        }
    }
    suppressed
}

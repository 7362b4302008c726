use log::debug;

use super::adjust::luminance;
use super::loader::PixelBuffer;
use crate::config::GridConfig;

/// Brightness used when no pixel could be sampled.
pub const FALLBACK_BRIGHTNESS: f32 = 128.0;

const MIN_BORDER_BAND: u32 = 8;
const OPAQUE_ALPHA: u8 = 128;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255.0, g: 255.0, b: 255.0 };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Euclidean distance to an 8-bit color.
    pub fn distance(&self, r: u8, g: u8, b: u8) -> f32 {
        let dr = self.r - f32::from(r);
        let dg = self.g - f32::from(g);
        let db = self.b - f32::from(b);
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

/// Background statistics derived once per image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundEstimate {
    /// Mean luminance of the four corner cells.
    pub brightness: f32,
    /// Mean border color, only estimated when background removal is enabled.
    pub color: Option<Rgb>,
}

impl BackgroundEstimate {
    pub fn from_buffer(buffer: &PixelBuffer, config: &GridConfig) -> Self {
        let brightness = corner_brightness(buffer, config.cell_width, config.cell_height);
        let color = config.remove_background.then(|| border_color(buffer));
        debug!("background estimate: brightness {brightness:.1}, color {color:?}");
        Self { brightness, color }
    }
}

/// Average luminance over the four corner cells, each clipped to the image.
///
/// Corners overlap on images smaller than two cells; overlapping pixels are counted once per
/// corner.
pub fn corner_brightness(buffer: &PixelBuffer, cell_width: u32, cell_height: u32) -> f32 {
    let (width, height) = (buffer.width(), buffer.height());
    let right = width.saturating_sub(cell_width);
    let bottom = height.saturating_sub(cell_height);
    let origins = [(0, 0), (right, 0), (0, bottom), (right, bottom)];

    let mut total = 0.0f64;
    let mut count = 0usize;

    for (x0, y0) in origins {
        let x1 = x0.saturating_add(cell_width).min(width);
        let y1 = y0.saturating_add(cell_height).min(height);
        for y in y0..y1 {
            for x in x0..x1 {
                let Some([r, g, b, _]) = buffer.get(x, y) else {
                    continue;
                };
                total += f64::from(luminance(r, g, b));
                count += 1;
            }
        }
    }

    if count == 0 {
        FALLBACK_BRIGHTNESS
    } else {
        (total / count as f64) as f32
    }
}

/// Width of the perimeter band sampled for the background color.
pub fn border_band(width: u32, height: u32) -> u32 {
    let five_percent = (f64::from(width.min(height)) * 0.05).floor() as u32;
    five_percent.max(MIN_BORDER_BAND)
}

/// Mean color of the opaque pixels inside the border band; white if there are none.
pub fn border_color(buffer: &PixelBuffer) -> Rgb {
    let (width, height) = (buffer.width(), buffer.height());
    let band = border_band(width, height);

    let mut sum = [0u64; 3];
    let mut count = 0u64;

    for y in 0..height {
        let edge_row = y < band || y >= height.saturating_sub(band);
        for x in 0..width {
            if !edge_row && x >= band && x < width.saturating_sub(band) {
                continue;
            }

            let Some([r, g, b, a]) = buffer.get(x, y) else {
                continue;
            };
            if a < OPAQUE_ALPHA {
                continue;
            }

            sum[0] += u64::from(r);
            sum[1] += u64::from(g);
            sum[2] += u64::from(b);
            count += 1;
        }
    }

    if count == 0 {
        return Rgb::WHITE;
    }

    let mean = |channel: u64| (channel as f64 / count as f64) as f32;
    Rgb::new(mean(sum[0]), mean(sum[1]), mean(sum[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_image_falls_back_to_neutral() {
        let buffer = PixelBuffer::filled(0, 0, [0; 4]);
        assert_eq!(corner_brightness(&buffer, 6, 9), FALLBACK_BRIGHTNESS);
        assert_eq!(border_color(&buffer), Rgb::WHITE);
    }

    #[test]
    fn corners_only_are_sampled() {
        // Dark interior pixels must not affect the estimate.
        let buffer = PixelBuffer::from_fn(30, 30, |x, y| {
            if (10..20).contains(&x) && (10..20).contains(&y) {
                [0, 0, 0, 255]
            } else {
                [200, 200, 200, 255]
            }
        });
        assert_eq!(corner_brightness(&buffer, 6, 9), 200.0);
    }

    #[test]
    fn one_dark_corner_of_four() {
        let buffer = PixelBuffer::from_fn(12, 18, |x, y| {
            if x < 6 && y < 9 {
                [0, 0, 0, 255]
            } else {
                [255, 255, 255, 255]
            }
        });
        assert_eq!(corner_brightness(&buffer, 6, 9), 191.25);
    }

    #[test]
    fn oversized_corner_cells_are_clipped() {
        let buffer =
            PixelBuffer::from_fn(4, 4, |x, _| if x < 2 { [0, 0, 0, 255] } else { [200, 200, 200, 255] });
        assert_eq!(corner_brightness(&buffer, 40_000, 40_000), 100.0);
        assert_eq!(corner_brightness(&buffer, u32::MAX, u32::MAX), 100.0);
    }

    #[test]
    fn band_has_minimum_width() {
        assert_eq!(border_band(40, 40), 8);
        assert_eq!(border_band(400, 300), 15);
    }

    #[test]
    fn border_color_ignores_interior_and_transparent_pixels() {
        let buffer = PixelBuffer::from_fn(40, 40, |x, y| {
            if x == 0 && y == 0 {
                [0, 0, 0, 0]
            } else if (8..32).contains(&x) && (8..32).contains(&y) {
                [255, 0, 0, 255]
            } else {
                [10, 20, 30, 255]
            }
        });
        assert_eq!(border_color(&buffer), Rgb::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn fully_transparent_border_is_white() {
        let buffer = PixelBuffer::filled(20, 20, [0, 0, 0, 10]);
        assert_eq!(border_color(&buffer), Rgb::WHITE);
    }

    #[test]
    fn color_is_only_estimated_when_removing() {
        let buffer = PixelBuffer::filled(20, 20, [50, 50, 50, 255]);
        let estimate = BackgroundEstimate::from_buffer(&buffer, &GridConfig::default());
        assert_eq!(estimate.color, None);

        let config = GridConfig { remove_background: true, ..GridConfig::default() };
        let estimate = BackgroundEstimate::from_buffer(&buffer, &config);
        assert_eq!(estimate.color, Some(Rgb::new(50.0, 50.0, 50.0)));
        assert_eq!(estimate.brightness, 50.0);
    }
}

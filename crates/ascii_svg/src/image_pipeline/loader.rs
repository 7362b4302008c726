use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

use crate::AsciiSvgError;

/// Read access to a decoded RGBA raster, whatever produced it.
pub trait PixelSource {
    fn dimensions(&self) -> (u32, u32);

    /// RGBA bytes at `(x, y)`, `None` outside the raster.
    fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]>;

    /// Private working copy of the whole raster.
    fn to_buffer(&self) -> PixelBuffer {
        let (width, height) = self.dimensions();
        PixelBuffer::from_fn(width, height, |x, y| self.pixel(x, y).unwrap_or([0; 4]))
    }
}

/// Owned row-major RGBA buffer, 4 bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, AsciiSvgError> {
        let expected = width as usize * height as usize * 4;
        let actual = data.len();
        if actual != expected {
            return Err(AsciiSvgError::BufferSize { width, height, expected, actual });
        }

        RgbaImage::from_raw(width, height, data)
            .map(|image| Self { image })
            .ok_or(AsciiSvgError::BufferSize { width, height, expected, actual })
    }

    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        Self { image: RgbaImage::from_fn(width, height, |x, y| Rgba(f(x, y))) }
    }

    /// Buffer where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self { image: RgbaImage::from_pixel(width, height, Rgba(rgba)) }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.image.into_raw()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width() && y < self.height() {
            Some(self.image.get_pixel(x, y).0)
        } else {
            None
        }
    }

    pub(crate) fn pixels_mut(&mut self) -> impl Iterator<Item = &mut [u8; 4]> {
        self.image.pixels_mut().map(|pixel| &mut pixel.0)
    }

    /// Resample to `width`x`height`; a no-op when the size already matches.
    pub(crate) fn resized(self, width: u32, height: u32) -> Self {
        if self.width() == width && self.height() == height {
            return self;
        }

        Self { image: imageops::resize(&self.image, width, height, FilterType::CatmullRom) }
    }
}

impl PixelSource for PixelBuffer {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.get(x, y)
    }

    fn to_buffer(&self) -> PixelBuffer {
        self.clone()
    }
}

impl PixelSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let (width, height) = RgbaImage::dimensions(self);
        (x < width && y < height).then(|| self.get_pixel(x, y).0)
    }

    fn to_buffer(&self) -> PixelBuffer {
        PixelBuffer { image: self.clone() }
    }
}

impl PixelSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        GenericImageView::dimensions(self)
    }

    fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.in_bounds(x, y).then(|| self.get_pixel(x, y).0)
    }

    fn to_buffer(&self) -> PixelBuffer {
        PixelBuffer { image: self.to_rgba8() }
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}

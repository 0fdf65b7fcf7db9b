//! Bitmap Input
//!
//! The planner only needs to know which pixels are foreground. [`ImageBitmap`]
//! wraps a decoded image and applies the luminosity threshold; [`PixelMask`]
//! is an explicit boolean grid, handy for tests and for callers that already
//! segmented their input.

use crate::error::{PlannerError, PlannerResult};
use image::{DynamicImage, RgbaImage};
use std::path::Path;

/// Default luminosity threshold: darker pixels are foreground
pub const DEFAULT_LUMINOSITY_THRESHOLD: f64 = 0.5;

/// Read-only view of a two-colour image
pub trait Bitmap {
    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Whether the pixel at `(x, y)` is drawn. Out-of-range coordinates are background.
    fn is_foreground(&self, x: u32, y: u32) -> bool;
}

/// Decoded raster image thresholded on luminosity
#[derive(Debug, Clone)]
pub struct ImageBitmap {
    pixels: RgbaImage,
    threshold: f64,
}

impl ImageBitmap {
    /// Load and decode an image file
    pub fn from_file<P: AsRef<Path>>(path: P, threshold: f64) -> PlannerResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| PlannerError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_image(img, threshold))
    }

    /// Wrap an already decoded image
    pub fn from_image(img: DynamicImage, threshold: f64) -> Self {
        Self {
            pixels: img.to_rgba8(),
            threshold,
        }
    }

    /// Luminosity threshold in use
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Luminosity (mean of R, G, B scaled to `0.0..=1.0`) of a pixel
    pub fn luminosity(&self, x: u32, y: u32) -> Option<f64> {
        let pixel = self.pixels.get_pixel_checked(x, y)?;
        let [r, g, b, _] = pixel.0;
        Some((r as f64 + g as f64 + b as f64) / 3.0 / 255.0)
    }
}

impl Bitmap for ImageBitmap {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn is_foreground(&self, x: u32, y: u32) -> bool {
        match self.pixels.get_pixel_checked(x, y) {
            // Fully transparent pixels are never drawn.
            Some(pixel) if pixel.0[3] == 0 => false,
            Some(_) => self
                .luminosity(x, y)
                .is_some_and(|lum| lum < self.threshold),
            None => false,
        }
    }
}

/// Explicit foreground grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl PixelMask {
    /// All-background mask
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    /// Mask of the given size with the listed pixels set; out-of-range pixels are ignored
    pub fn from_pixels<I>(width: u32, height: u32, pixels: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut mask = Self::new(width, height);
        for (x, y) in pixels {
            mask.set(x, y, true);
        }
        mask
    }

    /// Parse rows of text where `#` marks foreground and anything else background.
    ///
    /// The mask is as wide as the longest row.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut mask = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    mask.set(x as u32, y as u32, true);
                }
            }
        }
        mask
    }

    /// Set or clear a pixel; out-of-range coordinates are ignored
    pub fn set(&mut self, x: u32, y: u32, foreground: bool) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = foreground;
        }
    }

    /// Number of foreground pixels
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }
}

impl Bitmap for PixelMask {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.index(x, y).is_some_and(|i| self.cells[i])
    }
}

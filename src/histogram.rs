//! Hue-histogram feature extraction from decoded BGR images.
use crate::error::{Error, Result};

/// Number of hue bins: one per degree over [0, 180).
pub const HIST_BINS: usize = 180;

/// A decoded image as a flat pixel grid, channels in BGR device order.
#[derive(Debug, Clone)]
pub struct BgrImage {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
}

impl BgrImage {
    /// Wrap a decoded pixel buffer. The buffer length must equal
    /// `width * height`; anything else is a violated decode contract.
    pub fn new(width: usize, height: usize, pixels: Vec<[u8; 3]>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(Error::Decode(format!(
                "pixel buffer length {} does not match {}x{} image",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Solid-color image helper, mostly for synthetic datasets.
    pub fn solid(width: usize, height: usize, bgr: [u8; 3]) -> Self {
        Self {
            width,
            height,
            pixels: vec![bgr; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }
}

/// Hue of one BGR pixel in the 8-bit convention: degrees halved into [0, 180).
/// Achromatic pixels (zero chroma) report hue 0.
pub fn bgr_to_hue(b: u8, g: u8, r: u8) -> f64 {
    let (b, g, r) = (b as f64, g as f64, r as f64);
    let max = b.max(g).max(r);
    let min = b.min(g).min(r);
    let delta = max - min;
    if delta == 0.0 {
        return 0.0;
    }
    let mut deg = if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if deg < 0.0 {
        deg += 360.0;
    }
    deg / 2.0
}

/// Count pixels into 180 unit-width hue bins.
///
/// The result always has length [`HIST_BINS`]; the entries sum to the pixel
/// count of the image. A 0x0 image yields all zeros.
pub fn hue_histogram(image: &BgrImage) -> Vec<f64> {
    let mut bins = vec![0.0; HIST_BINS];
    for &[b, g, r] in image.pixels() {
        // Hue is strictly below 180 by construction; the clamp guards the
        // bin index against float rounding at the top of the range.
        let bin = (bgr_to_hue(b, g, r).floor() as usize).min(HIST_BINS - 1);
        bins[bin] += 1.0;
    }
    bins
}

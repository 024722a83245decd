// Thumbnail - Deterministic raster preview of a timeline state
// Square RGBA buffer: background, then border / fill / border per cell

use serde::{Deserialize, Serialize};

use crate::project::types::TimelineState;

/// RGBA color
pub type Rgba = [u8; 4];

/// Presentation constants of the snapshot thumbnail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailStyle {
    /// Side length in pixels
    pub side: u32,
    /// Vertical padding above and below the cells, in pixels
    pub padding: u32,
    /// Width of the cell borders, in pixels
    pub border_width: f64,
    pub background: Rgba,
    pub border: Rgba,
    pub fill: Rgba,
}

impl Default for ThumbnailStyle {
    fn default() -> Self {
        Self {
            side: 100,
            padding: 8,
            border_width: 1.0,
            background: [0x1e, 0x1e, 0x24, 0xff],
            border: [0xf5, 0xf5, 0xf5, 0xff],
            fill: [0x4a, 0x90, 0xd9, 0xff],
        }
    }
}

/// A square row-major RGBA raster
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    side: u32,
    pixels: Vec<Rgba>,
}

impl Thumbnail {
    fn filled(side: u32, color: Rgba) -> Self {
        Self {
            side,
            pixels: vec![color; side as usize * side as usize],
        }
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    /// Color of the pixel at (x, y), or None outside the raster
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.side || y >= self.side {
            return None;
        }
        self.pixels
            .get(y as usize * self.side as usize + x as usize)
            .copied()
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Flatten into `side * side * 4` bytes
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    /// Fill the pixels covered by a rectangle
    ///
    /// Horizontal edges are rounded to the nearest pixel boundary; the rect is
    /// clipped to the raster.
    fn fill_rect(&mut self, x: f64, y: u32, width: f64, height: u32, color: Rgba) {
        if !(width > 0.0) || height == 0 {
            return;
        }
        let side = self.side as f64;
        let x0 = x.round().clamp(0.0, side) as usize;
        let x1 = (x + width).round().clamp(0.0, side) as usize;
        let y0 = y.min(self.side) as usize;
        let y1 = y.saturating_add(height).min(self.side) as usize;
        let stride = self.side as usize;

        for row in y0..y1 {
            for pixel in &mut self.pixels[row * stride + x0..row * stride + x1.max(x0)] {
                *pixel = color;
            }
        }
    }
}

/// Rasterize `state` with the given style
///
/// Horizontal scale is `side / duration`; a state with no positive duration
/// renders as background only.
pub fn render_thumbnail(state: &TimelineState, style: &ThumbnailStyle) -> Thumbnail {
    let mut image = Thumbnail::filled(style.side, style.background);
    if !(state.duration > 0.0 && state.duration.is_finite()) {
        return image;
    }

    let scale = style.side as f64 / state.duration;
    let height = style.side.saturating_sub(style.padding.saturating_mul(2));
    let separator = style.border_width;

    let mut cells: Vec<_> = state.rhythm.iter().collect();
    cells.sort_by(|a, b| a.position().total_cmp(&b.position()));

    for cell in cells {
        let position = cell.position() * scale;
        let duration = cell.duration() * scale;

        image.fill_rect(position, style.padding, separator, height, style.border);
        image.fill_rect(
            position + separator,
            style.padding,
            duration - separator * 2.0,
            height,
            style.fill,
        );
        image.fill_rect(
            position + duration - separator,
            style.padding,
            separator,
            height,
            style.border,
        );
    }

    image
}

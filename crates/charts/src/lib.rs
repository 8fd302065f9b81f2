//! Chart descriptions and rasterisation for the dashboard and exported reports.

pub mod plot;
pub mod spec;

pub use crate::plot::PlottersRenderer;
pub use crate::spec::{stacked, ChartKind, ChartSpec, LineStyle, Rgb, Series};

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("chart '{0}' has no data to draw")]
    EmptyData(String),
    #[error("chart backend failed: {0}")]
    Backend(String),
}

/// Packed 8-bit RGB pixels, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Blank white image.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![255; width as usize * height as usize * 3],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some((self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }
}

/// Turns a chart description into pixels.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, spec: &ChartSpec, size: (u32, u32)) -> Result<RasterImage, ChartError>;
}

//! Textures
//!
//! Pixel snapshots produced by the canvas fallback, ready to hand to whichever
//! renderer samples them.

use std::fmt;

use serde::Deserialize;
use tiny_skia::Pixmap;

use crate::context2d::Color;

/// Sampling filter for a texture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleMode {
    #[default]
    Linear,
    Nearest,
}

impl ScaleMode {
    pub fn filter_quality(self) -> tiny_skia::FilterQuality {
        match self {
            ScaleMode::Linear => tiny_skia::FilterQuality::Bilinear,
            ScaleMode::Nearest => tiny_skia::FilterQuality::Nearest,
        }
    }
}

/// A pixel buffer with its sampling mode and resolution
#[derive(Clone)]
pub struct Texture {
    pixmap: Pixmap,
    scale_mode: ScaleMode,
    resolution: f64,
}

impl Texture {
    pub fn new(pixmap: Pixmap, scale_mode: ScaleMode, resolution: f64) -> Self {
        Self { pixmap, scale_mode, resolution }
    }

    /// Width in logical units
    pub fn width(&self) -> f64 {
        self.pixmap.width() as f64 / self.resolution
    }

    /// Height in logical units
    pub fn height(&self) -> f64 {
        self.pixmap.height() as f64 / self.resolution
    }

    pub fn pixel_width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn pixel_height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Premultiplied RGBA bytes
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Straight-alpha color at a device pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(p.red(), p.green(), p.blue(), p.alpha()))
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("pixel_width", &self.pixel_width())
            .field("pixel_height", &self.pixel_height())
            .field("scale_mode", &self.scale_mode)
            .field("resolution", &self.resolution)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_size() {
        let texture = Texture::new(Pixmap::new(20, 10).unwrap(), ScaleMode::Nearest, 2.0);

        assert_eq!(texture.width(), 10.0);
        assert_eq!(texture.height(), 5.0);
        assert_eq!(texture.pixel(0, 0), Some(Color::TRANSPARENT));
        assert_eq!(texture.pixel(20, 0), None);
    }

    #[test]
    fn test_scale_mode_from_config() {
        let mode: ScaleMode = serde_json::from_str("\"nearest\"").unwrap();
        assert_eq!(mode, ScaleMode::Nearest);
        assert_eq!(mode.filter_quality(), tiny_skia::FilterQuality::Nearest);
    }
}

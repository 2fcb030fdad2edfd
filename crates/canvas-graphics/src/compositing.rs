//! Compositing Operations
//!
//! Canvas 2D `globalCompositeOperation` keywords and their tiny-skia blend modes.

use std::fmt;
use std::str::FromStr;

/// Composite operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CompositeOperation {
    #[default]
    SourceOver,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Lighter,
    Copy,
    Xor,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

/// Blend mode (same keyword space as composite operations)
pub type BlendMode = CompositeOperation;

/// Unknown composite keyword
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown composite operation: {0}")]
pub struct UnknownCompositeOperation(pub String);

impl FromStr for CompositeOperation {
    type Err = UnknownCompositeOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "source-over" => Self::SourceOver,
            "source-in" => Self::SourceIn,
            "source-out" => Self::SourceOut,
            "source-atop" => Self::SourceAtop,
            "destination-over" => Self::DestinationOver,
            "destination-in" => Self::DestinationIn,
            "destination-out" => Self::DestinationOut,
            "destination-atop" => Self::DestinationAtop,
            "lighter" => Self::Lighter,
            "copy" => Self::Copy,
            "xor" => Self::Xor,
            "multiply" => Self::Multiply,
            "screen" => Self::Screen,
            "overlay" => Self::Overlay,
            "darken" => Self::Darken,
            "lighten" => Self::Lighten,
            "color-dodge" => Self::ColorDodge,
            "color-burn" => Self::ColorBurn,
            "hard-light" => Self::HardLight,
            "soft-light" => Self::SoftLight,
            "difference" => Self::Difference,
            "exclusion" => Self::Exclusion,
            "hue" => Self::Hue,
            "saturation" => Self::Saturation,
            "color" => Self::Color,
            "luminosity" => Self::Luminosity,
            other => return Err(UnknownCompositeOperation(other.to_string())),
        })
    }
}

impl CompositeOperation {
    /// Canvas keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::SourceIn => "source-in",
            Self::SourceOut => "source-out",
            Self::SourceAtop => "source-atop",
            Self::DestinationOver => "destination-over",
            Self::DestinationIn => "destination-in",
            Self::DestinationOut => "destination-out",
            Self::DestinationAtop => "destination-atop",
            Self::Lighter => "lighter",
            Self::Copy => "copy",
            Self::Xor => "xor",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Color => "color",
            Self::Luminosity => "luminosity",
        }
    }

    /// Equivalent tiny-skia blend mode
    pub fn to_tiny_skia(self) -> tiny_skia::BlendMode {
        use tiny_skia::BlendMode as Sk;
        match self {
            Self::SourceOver => Sk::SourceOver,
            Self::SourceIn => Sk::SourceIn,
            Self::SourceOut => Sk::SourceOut,
            Self::SourceAtop => Sk::SourceAtop,
            Self::DestinationOver => Sk::DestinationOver,
            Self::DestinationIn => Sk::DestinationIn,
            Self::DestinationOut => Sk::DestinationOut,
            Self::DestinationAtop => Sk::DestinationAtop,
            Self::Lighter => Sk::Plus,
            Self::Copy => Sk::Source,
            Self::Xor => Sk::Xor,
            Self::Multiply => Sk::Multiply,
            Self::Screen => Sk::Screen,
            Self::Overlay => Sk::Overlay,
            Self::Darken => Sk::Darken,
            Self::Lighten => Sk::Lighten,
            Self::ColorDodge => Sk::ColorDodge,
            Self::ColorBurn => Sk::ColorBurn,
            Self::HardLight => Sk::HardLight,
            Self::SoftLight => Sk::SoftLight,
            Self::Difference => Sk::Difference,
            Self::Exclusion => Sk::Exclusion,
            Self::Hue => Sk::Hue,
            Self::Saturation => Sk::Saturation,
            Self::Color => Sk::Color,
            Self::Luminosity => Sk::Luminosity,
        }
    }
}

impl fmt::Display for CompositeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

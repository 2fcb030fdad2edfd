//! fOS Canvas Graphics
//!
//! Canvas 2D fallback rendering for fOS vector graphics.
//!
//! Features:
//! - Style sheets with "use" delegation, resolved in depth-first order
//! - Style-driven fill and stroke with balanced save/restore
//! - Software CanvasRenderingContext2D on tiny-skia
//! - Graphics objects rendered through the canvas fallback
//! - Texture snapshots through an offscreen renderer
//!
//! # Example
//! ```rust,ignore
//! use canvas_graphics::{CanvasPipeline, Graphics, RendererConfig, ScaleMode};
//!
//! let mut pipeline = CanvasPipeline::new(RendererConfig::default());
//! let mut graphics = Graphics::new();
//! graphics.begin_fill(0xff0000, 1.0).draw_circle(50.0, 50.0, 20.0);
//! let texture = pipeline.generate_texture(&mut graphics, ScaleMode::Linear, 2.0)?;
//! ```

pub mod compositing;
pub mod config;
pub mod context2d;
pub mod extension;
pub mod graphics;
pub mod paint;
pub mod path;
pub mod pipeline;
pub mod renderer;
pub mod style;
pub mod surface;
pub mod texture;
pub mod transforms;

pub use compositing::{BlendMode, CompositeOperation, UnknownCompositeOperation};
pub use config::RendererConfig;
pub use context2d::{
    CanvasRenderingContext2D, CanvasState, Color, ColorStop, Gradient, GradientType, LineCap,
    LineJoin, PaintSource, Pattern, PatternRepetition,
};
pub use extension::CanvasGraphicsExt;
pub use graphics::{Graphics, GraphicsData, Polygon, Rect, Shape};
pub use paint::{paint, Painter};
pub use path::{Path2D, PathCommand};
pub use pipeline::CanvasPipeline;
pub use renderer::{CanvasRenderer, GraphicsRenderer};
pub use style::{ResolvedStyles, Style, StyleId, StyleInput, StyleSheet};
pub use surface::DrawingSurface;
pub use texture::{ScaleMode, Texture};
pub use transforms::TransformMatrix;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Canvas error
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Invalid pattern: {len} bytes for {width}x{height} RGBA image")]
    InvalidPattern { width: u32, height: u32, len: usize },

    #[error("Transform is not invertible")]
    NonInvertibleTransform,

    #[error("Cannot allocate {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },
}

//! Canvas 2D Rendering Context
//!
//! Software `CanvasRenderingContext2D` rasterized with tiny-skia. This is the
//! drawing surface the fallback renderer targets when no GPU is available.

use std::fmt;

use tiny_skia::{FillRule, Mask, Pixmap, Shader};

use crate::compositing::CompositeOperation;
use crate::path::Path2D;
use crate::surface::DrawingSurface;
use crate::texture::Texture;
use crate::transforms::TransformMatrix;
use crate::CanvasError;

/// Canvas 2D rendering context
pub struct CanvasRenderingContext2D {
    /// Backing pixels (premultiplied RGBA)
    pixmap: Pixmap,
    /// Active state
    current: CanvasState,
    /// Saved states
    stack: Vec<CanvasState>,
    /// Current path
    current_path: Path2D,
    /// Anti-alias fills, strokes and clips
    anti_alias: bool,
}

/// Canvas state (for save/restore)
#[derive(Debug, Clone)]
pub struct CanvasState {
    pub transform: TransformMatrix,
    pub fill_style: PaintSource,
    pub stroke_style: PaintSource,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub global_alpha: f64,
    pub global_composite_operation: CompositeOperation,
    pub clip: Option<ClipMask>,
}

/// Clip coverage for the whole surface
#[derive(Clone)]
pub struct ClipMask(Mask);

impl ClipMask {
    /// Coverage at a pixel (0 = clipped out)
    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        let width = self.0.width();
        if x >= width || y >= self.0.height() {
            return 0;
        }
        self.0.data()[(y * width + x) as usize]
    }
}

impl fmt::Debug for ClipMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipMask")
            .field("width", &self.0.width())
            .field("height", &self.0.height())
            .finish()
    }
}

/// Fill or stroke paint
#[derive(Debug, Clone, PartialEq)]
pub enum PaintSource {
    Color(Color),
    Gradient(Gradient),
    Pattern(Pattern),
}

/// Color (RGBA)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Gradient
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub gradient_type: GradientType,
    pub stops: Vec<ColorStop>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientType {
    Linear { x0: f64, y0: f64, x1: f64, y1: f64 },
    Radial { x0: f64, y0: f64, r0: f64, x1: f64, y1: f64, r1: f64 },
    Conic { x: f64, y: f64, angle: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Color,
}

/// Image pattern (straight-alpha RGBA rows)
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub image_data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub repetition: PatternRepetition,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatternRepetition {
    #[default]
    Repeat,
    RepeatX,
    RepeatY,
    NoRepeat,
}

/// Line cap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Line join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl CanvasRenderingContext2D {
    /// Create a new 2D context with transparent pixels
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        let pixmap = Pixmap::new(width, height)
            .ok_or(CanvasError::SurfaceAllocation { width, height })?;
        Ok(Self {
            pixmap,
            current: CanvasState::default(),
            stack: Vec::new(),
            current_path: Path2D::new(),
            anti_alias: true,
        })
    }

    /// Get canvas width
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Get canvas height
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied RGBA pixel data
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Read back one pixel as straight-alpha color
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(p.red(), p.green(), p.blue(), p.alpha()))
    }

    /// Underlying pixmap
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Consume the context, keeping its pixels
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Toggle anti-aliasing
    pub fn set_anti_alias(&mut self, anti_alias: bool) {
        self.anti_alias = anti_alias;
    }

    pub fn anti_alias(&self) -> bool {
        self.anti_alias
    }

    // State management

    /// Save current state
    pub fn save(&mut self) {
        self.stack.push(self.current.clone());
    }

    /// Restore previous state; no-op when nothing was saved
    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.current = state;
        }
    }

    /// Number of saved states
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Get current state
    pub fn state(&self) -> &CanvasState {
        &self.current
    }

    /// Get mutable current state
    pub fn state_mut(&mut self) -> &mut CanvasState {
        &mut self.current
    }

    /// Replace the current transform
    pub fn set_transform(&mut self, transform: TransformMatrix) {
        self.current.transform = transform;
    }

    /// Multiply the current transform by `transform`
    pub fn transform(&mut self, transform: &TransformMatrix) {
        self.current.transform = self.current.transform.multiply(transform);
    }

    /// Values outside `[0, 1]` are ignored
    pub fn set_global_alpha(&mut self, alpha: f64) {
        if (0.0..=1.0).contains(&alpha) {
            self.current.global_alpha = alpha;
        }
    }

    pub fn set_global_composite_operation(&mut self, op: CompositeOperation) {
        self.current.global_composite_operation = op;
    }

    pub fn set_fill_style(&mut self, style: PaintSource) -> Result<(), CanvasError> {
        style.validate()?;
        self.current.fill_style = style;
        Ok(())
    }

    pub fn set_stroke_style(&mut self, style: PaintSource) -> Result<(), CanvasError> {
        style.validate()?;
        self.current.stroke_style = style;
        Ok(())
    }

    /// Non-finite or non-positive widths are ignored
    pub fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.current.line_width = width;
        }
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.current.line_cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.current.line_join = join;
    }

    /// Non-finite or non-positive limits are ignored
    pub fn set_miter_limit(&mut self, limit: f64) {
        if limit.is_finite() && limit > 0.0 {
            self.current.miter_limit = limit;
        }
    }

    // Pixels

    /// Fill every pixel with `color`, ignoring state
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color.to_tiny_skia());
    }

    /// Clear a rectangle to transparent black
    pub fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let Some(rect) = tiny_skia::Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
            return;
        };
        let paint = tiny_skia::Paint {
            blend_mode: tiny_skia::BlendMode::Clear,
            anti_alias: self.anti_alias,
            ..tiny_skia::Paint::default()
        };
        let transform = self.current.transform.to_tiny_skia();
        let mask = self.current.clip.as_ref().map(|clip| &clip.0);
        self.pixmap.fill_rect(rect, &paint, transform, mask);
    }

    /// Fill a rectangle without touching the current path
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), CanvasError> {
        let mut path = Path2D::new();
        path.rect(x, y, width, height);
        self.fill_path(&path)
    }

    /// Stroke a rectangle without touching the current path
    pub fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), CanvasError> {
        let mut path = Path2D::new();
        path.rect(x, y, width, height);
        self.stroke_path(&path)
    }

    /// Draw a texture with its top-left corner at `(x, y)`, one texel per
    /// `1 / resolution` units.
    pub fn draw_texture(&mut self, texture: &Texture, x: f64, y: f64) {
        let scale = 1.0 / texture.resolution();
        let transform = self
            .current
            .transform
            .multiply(&TransformMatrix::translate(x, y))
            .multiply(&TransformMatrix::scale(scale, scale));
        let paint = tiny_skia::PixmapPaint {
            opacity: self.current.global_alpha as f32,
            blend_mode: self.current.global_composite_operation.to_tiny_skia(),
            quality: texture.scale_mode().filter_quality(),
        };
        let mask = self.current.clip.as_ref().map(|clip| &clip.0);
        self.pixmap
            .draw_pixmap(0, 0, texture.pixmap().as_ref(), &paint, transform.to_tiny_skia(), mask);
    }

    // Path methods

    /// Begin a new path
    pub fn begin_path(&mut self) {
        self.current_path = Path2D::new();
    }

    /// Close the current path
    pub fn close_path(&mut self) {
        self.current_path.close_path();
    }

    /// Move to point
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.current_path.move_to(x, y);
    }

    /// Line to point
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.current_path.line_to(x, y);
    }

    pub fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.current_path.quadratic_curve_to(cpx, cpy, x, y);
    }

    pub fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.current_path.bezier_curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
    }

    pub fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, counterclockwise: bool) {
        self.current_path.arc(x, y, radius, start_angle, end_angle, counterclockwise);
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.current_path.rect(x, y, width, height);
    }

    pub fn round_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64) {
        self.current_path.round_rect(x, y, width, height, radius);
    }

    /// Current path
    pub fn current_path(&self) -> &Path2D {
        &self.current_path
    }

    /// Fill the current path
    pub fn fill(&mut self) -> Result<(), CanvasError> {
        let path = std::mem::take(&mut self.current_path);
        let result = self.fill_path(&path);
        self.current_path = path;
        result
    }

    /// Stroke the current path
    pub fn stroke(&mut self) -> Result<(), CanvasError> {
        let path = std::mem::take(&mut self.current_path);
        let result = self.stroke_path(&path);
        self.current_path = path;
        result
    }

    /// Intersect the clip region with the current path
    pub fn clip(&mut self) -> Result<(), CanvasError> {
        let (width, height) = (self.width(), self.height());
        let transform = self.current.transform.to_tiny_skia();

        let Some(path) = self.current_path.to_tiny_skia() else {
            // An empty clip path hides everything.
            let mask = Mask::new(width, height)
                .ok_or(CanvasError::SurfaceAllocation { width, height })?;
            self.current.clip = Some(ClipMask(mask));
            return Ok(());
        };

        match self.current.clip.as_mut() {
            Some(clip) => clip.0.intersect_path(&path, FillRule::Winding, self.anti_alias, transform),
            None => {
                let mut mask = Mask::new(width, height)
                    .ok_or(CanvasError::SurfaceAllocation { width, height })?;
                mask.fill_path(&path, FillRule::Winding, self.anti_alias, transform);
                self.current.clip = Some(ClipMask(mask));
            }
        }
        Ok(())
    }

    fn fill_path(&mut self, path: &Path2D) -> Result<(), CanvasError> {
        let Some(path) = path.to_tiny_skia() else {
            return Ok(());
        };

        let mut pattern = None;
        let paint = self.make_paint(&self.current.fill_style, &mut pattern)?;
        let transform = self.current.transform.to_tiny_skia();
        let mask = self.current.clip.as_ref().map(|clip| &clip.0);
        self.pixmap.fill_path(&path, &paint, FillRule::Winding, transform, mask);
        Ok(())
    }

    fn stroke_path(&mut self, path: &Path2D) -> Result<(), CanvasError> {
        let Some(path) = path.to_tiny_skia() else {
            return Ok(());
        };

        let mut pattern = None;
        let paint = self.make_paint(&self.current.stroke_style, &mut pattern)?;
        let stroke = tiny_skia::Stroke {
            width: self.current.line_width as f32,
            miter_limit: self.current.miter_limit as f32,
            line_cap: self.current.line_cap.to_tiny_skia(),
            line_join: self.current.line_join.to_tiny_skia(),
            dash: None,
        };
        let transform = self.current.transform.to_tiny_skia();
        let mask = self.current.clip.as_ref().map(|clip| &clip.0);
        self.pixmap.stroke_path(&path, &paint, &stroke, transform, mask);
        Ok(())
    }

    /// Build a tiny-skia paint; pattern pixels are kept alive in `pattern`.
    fn make_paint<'a>(
        &self,
        source: &PaintSource,
        pattern: &'a mut Option<Pixmap>,
    ) -> Result<tiny_skia::Paint<'a>, CanvasError> {
        let mut shader = match source {
            PaintSource::Color(color) => Shader::SolidColor(color.to_tiny_skia()),
            PaintSource::Gradient(gradient) => gradient.to_shader()?,
            PaintSource::Pattern(image) => {
                let pixmap = pattern.insert(image.to_pixmap()?);
                image.to_shader(pixmap)
            }
        };
        shader.apply_opacity(self.current.global_alpha as f32);

        Ok(tiny_skia::Paint {
            shader,
            blend_mode: self.current.global_composite_operation.to_tiny_skia(),
            anti_alias: self.anti_alias,
            ..tiny_skia::Paint::default()
        })
    }
}

impl fmt::Debug for CanvasRenderingContext2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasRenderingContext2D")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("current", &self.current)
            .field("save_depth", &self.stack.len())
            .finish()
    }
}

impl DrawingSurface for CanvasRenderingContext2D {
    type Error = CanvasError;

    fn save(&mut self) {
        CanvasRenderingContext2D::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2D::restore(self);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        CanvasRenderingContext2D::set_global_alpha(self, alpha);
    }

    fn set_composite_operation(&mut self, op: CompositeOperation) {
        self.set_global_composite_operation(op);
    }

    fn set_fill_paint(&mut self, paint: &PaintSource) -> Result<(), CanvasError> {
        self.set_fill_style(paint.clone())
    }

    fn set_stroke_paint(&mut self, paint: &PaintSource) -> Result<(), CanvasError> {
        self.set_stroke_style(paint.clone())
    }

    fn set_line_width(&mut self, width: f64) {
        CanvasRenderingContext2D::set_line_width(self, width);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        CanvasRenderingContext2D::set_line_cap(self, cap);
    }

    fn set_line_join(&mut self, join: LineJoin) {
        CanvasRenderingContext2D::set_line_join(self, join);
    }

    fn set_miter_limit(&mut self, limit: f64) {
        CanvasRenderingContext2D::set_miter_limit(self, limit);
    }

    fn fill(&mut self) -> Result<(), CanvasError> {
        CanvasRenderingContext2D::fill(self)
    }

    fn stroke(&mut self) -> Result<(), CanvasError> {
        CanvasRenderingContext2D::stroke(self)
    }

    fn clip(&mut self) -> Result<(), CanvasError> {
        CanvasRenderingContext2D::clip(self)
    }
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            transform: TransformMatrix::identity(),
            fill_style: PaintSource::Color(Color::BLACK),
            stroke_style: PaintSource::Color(Color::BLACK),
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            global_alpha: 1.0,
            global_composite_operation: CompositeOperation::default(),
            clip: None,
        }
    }
}

impl PaintSource {
    fn validate(&self) -> Result<(), CanvasError> {
        match self {
            PaintSource::Pattern(pattern) => pattern.validate(),
            _ => Ok(()),
        }
    }
}

impl From<Color> for PaintSource {
    fn from(color: Color) -> Self {
        PaintSource::Color(color)
    }
}

impl From<Gradient> for PaintSource {
    fn from(gradient: Gradient) -> Self {
        PaintSource::Gradient(gradient)
    }
}

impl From<Pattern> for PaintSource {
    fn from(pattern: Pattern) -> Self {
        PaintSource::Pattern(pattern)
    }
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 128, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Opaque color from a packed `0xRRGGBB` value
    pub const fn from_rgb_u32(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Packed `0xRRGGBB` value, alpha dropped
    pub const fn to_rgb_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Create from hex string (e.g., "#ff0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();

        match hex.len() {
            3 => Some(Color::rgb(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
            )),
            6 => Some(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Some(Color::rgba(channel(0..2)?, channel(2..4)?, channel(4..6)?, channel(6..8)?)),
            _ => None,
        }
    }

    /// Hex string or one of the basic color keywords
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "black" => Some(Color::BLACK),
            "white" => Some(Color::WHITE),
            "red" => Some(Color::RED),
            "green" => Some(Color::GREEN),
            "blue" => Some(Color::BLUE),
            "transparent" => Some(Color::TRANSPARENT),
            other => Color::from_hex(other),
        }
    }

    pub fn to_tiny_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl Gradient {
    pub fn linear(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { gradient_type: GradientType::Linear { x0, y0, x1, y1 }, stops: Vec::new() }
    }

    pub fn radial(x0: f64, y0: f64, r0: f64, x1: f64, y1: f64, r1: f64) -> Self {
        Self { gradient_type: GradientType::Radial { x0, y0, r0, x1, y1, r1 }, stops: Vec::new() }
    }

    pub fn add_color_stop(mut self, offset: f64, color: Color) -> Self {
        self.stops.push(ColorStop { offset: offset.clamp(0.0, 1.0), color });
        self
    }

    fn to_shader(&self) -> Result<Shader<'static>, CanvasError> {
        let stops: Vec<_> = self
            .stops
            .iter()
            .map(|stop| tiny_skia::GradientStop::new(stop.offset as f32, stop.color.to_tiny_skia()))
            .collect();
        let point = |x: f64, y: f64| tiny_skia::Point::from_xy(x as f32, y as f32);
        let spread = tiny_skia::SpreadMode::Pad;
        let identity = tiny_skia::Transform::identity();

        let shader = match self.gradient_type {
            GradientType::Linear { x0, y0, x1, y1 } => {
                tiny_skia::LinearGradient::new(point(x0, y0), point(x1, y1), stops, spread, identity)
            }
            GradientType::Radial { r0, .. } if r0 != 0.0 => {
                return Err(CanvasError::NotSupported("radial gradient with a non-zero start radius".into()));
            }
            GradientType::Radial { x0, y0, x1, y1, r1, .. } => {
                tiny_skia::RadialGradient::new(point(x0, y0), point(x1, y1), r1 as f32, stops, spread, identity)
            }
            GradientType::Conic { .. } => {
                return Err(CanvasError::NotSupported("conic gradient".into()));
            }
        };
        shader.ok_or_else(|| CanvasError::InvalidState("degenerate gradient".into()))
    }
}

impl Pattern {
    pub fn new(image_data: Vec<u8>, width: u32, height: u32, repetition: PatternRepetition) -> Self {
        Self { image_data, width, height, repetition }
    }

    fn validate(&self) -> Result<(), CanvasError> {
        let expected = self.width as usize * self.height as usize * 4;
        if self.width == 0 || self.height == 0 || self.image_data.len() != expected {
            return Err(CanvasError::InvalidPattern {
                width: self.width,
                height: self.height,
                len: self.image_data.len(),
            });
        }
        Ok(())
    }

    fn to_pixmap(&self) -> Result<Pixmap, CanvasError> {
        self.validate()?;
        let mut data = self.image_data.clone();
        for px in data.chunks_exact_mut(4) {
            let a = px[3] as u16;
            for channel in &mut px[..3] {
                *channel = ((*channel as u16 * a + 127) / 255) as u8;
            }
        }
        let size = tiny_skia::IntSize::from_wh(self.width, self.height).ok_or(CanvasError::InvalidPattern {
            width: self.width,
            height: self.height,
            len: self.image_data.len(),
        })?;
        Pixmap::from_vec(data, size).ok_or(CanvasError::SurfaceAllocation {
            width: self.width,
            height: self.height,
        })
    }

    // tiny-skia has no single-axis repeat; those tile both ways.
    fn to_shader<'a>(&self, pixmap: &'a Pixmap) -> Shader<'a> {
        let spread = match self.repetition {
            PatternRepetition::NoRepeat => tiny_skia::SpreadMode::Pad,
            _ => tiny_skia::SpreadMode::Repeat,
        };
        tiny_skia::Pattern::new(
            pixmap.as_ref(),
            spread,
            tiny_skia::FilterQuality::Nearest,
            1.0,
            tiny_skia::Transform::identity(),
        )
    }
}

impl LineCap {
    pub fn to_tiny_skia(self) -> tiny_skia::LineCap {
        match self {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        }
    }
}

impl LineJoin {
    pub fn to_tiny_skia(self) -> tiny_skia::LineJoin {
        match self {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_context() {
        let ctx = CanvasRenderingContext2D::new(100, 100).unwrap();
        assert_eq!(ctx.width(), 100);
        assert_eq!(ctx.height(), 100);
        assert_eq!(ctx.pixel(0, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_zero_size_fails() {
        assert!(matches!(
            CanvasRenderingContext2D::new(0, 10),
            Err(CanvasError::SurfaceAllocation { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_fill_rect() {
        let mut ctx = CanvasRenderingContext2D::new(100, 100).unwrap();
        ctx.set_fill_style(Color::RED.into()).unwrap();
        ctx.fill_rect(10.0, 10.0, 20.0, 20.0).unwrap();

        assert_eq!(ctx.pixel(15, 15), Some(Color::RED));
        assert_eq!(ctx.pixel(50, 50), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_global_alpha_scales_coverage() {
        let mut ctx = CanvasRenderingContext2D::new(10, 10).unwrap();
        ctx.set_global_alpha(0.5);
        ctx.fill_rect(0.0, 0.0, 10.0, 10.0).unwrap();

        let alpha = ctx.pixel(5, 5).unwrap().a;
        assert!((126..=129).contains(&alpha), "alpha was {alpha}");
    }

    #[test]
    fn test_save_restore() {
        let mut ctx = CanvasRenderingContext2D::new(100, 100).unwrap();
        ctx.set_global_alpha(0.5);
        ctx.save();
        ctx.set_global_alpha(0.3);
        assert_eq!(ctx.state().global_alpha, 0.3);
        ctx.restore();
        assert_eq!(ctx.state().global_alpha, 0.5);
        ctx.restore();
        assert_eq!(ctx.state().global_alpha, 0.5);
    }

    #[test]
    fn test_invalid_values_ignored() {
        let mut ctx = CanvasRenderingContext2D::new(10, 10).unwrap();
        ctx.set_line_width(f64::NAN);
        ctx.set_line_width(-2.0);
        ctx.set_global_alpha(1.5);
        ctx.set_miter_limit(0.0);

        assert_eq!(ctx.state().line_width, 1.0);
        assert_eq!(ctx.state().global_alpha, 1.0);
        assert_eq!(ctx.state().miter_limit, 10.0);
    }

    #[test]
    fn test_clip_limits_fill() {
        let mut ctx = CanvasRenderingContext2D::new(20, 20).unwrap();
        ctx.rect(0.0, 0.0, 10.0, 20.0);
        ctx.clip().unwrap();
        let clip = ctx.state().clip.as_ref().unwrap();
        assert_eq!(clip.coverage(5, 5), 255);
        assert_eq!(clip.coverage(15, 5), 0);
        ctx.begin_path();
        ctx.fill_rect(0.0, 0.0, 20.0, 20.0).unwrap();

        assert_eq!(ctx.pixel(5, 5), Some(Color::BLACK));
        assert_eq!(ctx.pixel(15, 5), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_transform_applies_to_fill() {
        let mut ctx = CanvasRenderingContext2D::new(20, 20).unwrap();
        ctx.set_transform(TransformMatrix::translate(10.0, 10.0));
        ctx.fill_rect(0.0, 0.0, 5.0, 5.0).unwrap();

        assert_eq!(ctx.pixel(2, 2), Some(Color::TRANSPARENT));
        assert_eq!(ctx.pixel(12, 12), Some(Color::BLACK));
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let mut ctx = CanvasRenderingContext2D::new(10, 10).unwrap();
        let pattern = Pattern::new(vec![0; 7], 2, 2, PatternRepetition::Repeat);

        assert!(matches!(
            ctx.set_fill_style(pattern.into()),
            Err(CanvasError::InvalidPattern { len: 7, .. })
        ));
    }

    #[test]
    fn test_pattern_fill() {
        let mut ctx = CanvasRenderingContext2D::new(4, 4).unwrap();
        let pixels = [0u8, 0, 255, 255].repeat(4);
        ctx.set_fill_style(Pattern::new(pixels, 2, 2, PatternRepetition::Repeat).into()).unwrap();
        ctx.fill_rect(0.0, 0.0, 4.0, 4.0).unwrap();

        assert_eq!(ctx.pixel(3, 3), Some(Color::BLUE));
    }

    #[test]
    fn test_conic_gradient_not_supported() {
        let mut ctx = CanvasRenderingContext2D::new(4, 4).unwrap();
        let conic = Gradient {
            gradient_type: GradientType::Conic { x: 0.0, y: 0.0, angle: 0.0 },
            stops: vec![],
        };
        ctx.set_fill_style(conic.into()).unwrap();

        assert!(matches!(ctx.fill_rect(0.0, 0.0, 4.0, 4.0), Err(CanvasError::NotSupported(_))));
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!(Color::from_hex("#ff0000"), Some(Color::RED));
        assert_eq!(Color::from_hex("#f00"), Some(Color::RED));
        assert_eq!(Color::parse("blue"), Some(Color::BLUE));
        assert_eq!(Color::parse("nope"), None);
        assert_eq!(Color::from_rgb_u32(0x00ff00), Color::rgb(0, 255, 0));
        assert_eq!(Color::rgb(1, 2, 3).to_rgb_u32(), 0x010203);
    }
}

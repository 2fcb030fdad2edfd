//! Drawing surface contract
//!
//! The capability set the paint dispatcher needs from a 2D context. The
//! software [`CanvasRenderingContext2D`](crate::CanvasRenderingContext2D)
//! implements it; hosts with their own context implement it too.

use crate::compositing::CompositeOperation;
use crate::context2d::{LineCap, LineJoin, PaintSource};

/// A mutable 2D context with a save/restore state stack.
///
/// Setters that take plain numbers follow Canvas 2D rules: values the surface
/// cannot use are ignored rather than reported.
pub trait DrawingSurface {
    /// Error raised by paint setters and primitives
    type Error;

    /// Push the current state
    fn save(&mut self);

    /// Pop back to the last saved state
    fn restore(&mut self);

    fn set_global_alpha(&mut self, alpha: f64);

    fn set_composite_operation(&mut self, op: CompositeOperation);

    fn set_fill_paint(&mut self, paint: &PaintSource) -> Result<(), Self::Error>;

    fn set_stroke_paint(&mut self, paint: &PaintSource) -> Result<(), Self::Error>;

    fn set_line_width(&mut self, width: f64);

    fn set_line_cap(&mut self, cap: LineCap);

    fn set_line_join(&mut self, join: LineJoin);

    fn set_miter_limit(&mut self, limit: f64);

    /// Fill the current path
    fn fill(&mut self) -> Result<(), Self::Error>;

    /// Stroke the current path
    fn stroke(&mut self) -> Result<(), Self::Error>;

    /// Intersect the clip region with the current path
    fn clip(&mut self) -> Result<(), Self::Error>;
}

//! Path2D
//!
//! Path construction for the software context. Commands are recorded in user
//! space and flattened to a tiny-skia path when a primitive runs.

use std::f64::consts::{FRAC_PI_2, TAU};

/// 2D Path
#[derive(Debug, Clone, Default)]
pub struct Path2D {
    commands: Vec<PathCommand>,
}

/// Path command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    QuadraticCurveTo { cpx: f64, cpy: f64, x: f64, y: f64 },
    BezierCurveTo { cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64 },
    Arc { x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, counterclockwise: bool },
    Ellipse { x: f64, y: f64, rx: f64, ry: f64, rotation: f64, start_angle: f64, end_angle: f64, counterclockwise: bool },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    ClosePath,
}

impl Path2D {
    /// Create new empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to point
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo(x, y));
    }

    /// Line to point
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::LineTo(x, y));
    }

    /// Quadratic curve
    pub fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.commands.push(PathCommand::QuadraticCurveTo { cpx, cpy, x, y });
    }

    /// Bezier curve
    pub fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.commands.push(PathCommand::BezierCurveTo { cp1x, cp1y, cp2x, cp2y, x, y });
    }

    /// Circular arc
    pub fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, counterclockwise: bool) {
        self.commands.push(PathCommand::Arc { x, y, radius, start_angle, end_angle, counterclockwise });
    }

    /// Elliptical arc
    #[allow(clippy::too_many_arguments)]
    pub fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, rotation: f64, start_angle: f64, end_angle: f64, counterclockwise: bool) {
        self.commands.push(PathCommand::Ellipse { x, y, rx, ry, rotation, start_angle, end_angle, counterclockwise });
    }

    /// Closed rectangle subpath
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(PathCommand::Rect { x, y, width, height });
    }

    /// Rounded rectangle built from quadratic corners.
    ///
    /// The radius is clamped to half the shorter side.
    pub fn round_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64) {
        let max_radius = (width.min(height) / 2.0).floor();
        let r = radius.min(max_radius).max(0.0);

        self.move_to(x, y + r);
        self.line_to(x, y + height - r);
        self.quadratic_curve_to(x, y + height, x + r, y + height);
        self.line_to(x + width - r, y + height);
        self.quadratic_curve_to(x + width, y + height, x + width, y + height - r);
        self.line_to(x + width, y + r);
        self.quadratic_curve_to(x + width, y, x + width - r, y);
        self.line_to(x + r, y);
        self.quadratic_curve_to(x, y, x, y + r);
        self.close_path();
    }

    /// Close path
    pub fn close_path(&mut self) {
        self.commands.push(PathCommand::ClosePath);
    }

    /// Add another path
    pub fn add_path(&mut self, path: &Path2D) {
        self.commands.extend_from_slice(&path.commands);
    }

    /// Get commands
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Flatten into a tiny-skia path. `None` when nothing drawable was recorded.
    pub fn to_tiny_skia(&self) -> Option<tiny_skia::Path> {
        let mut builder = tiny_skia::PathBuilder::new();
        let mut open = false;

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(x, y) => {
                    builder.move_to(x as f32, y as f32);
                    open = true;
                }
                PathCommand::LineTo(x, y) => {
                    ensure_subpath(&mut builder, &mut open, x, y);
                    builder.line_to(x as f32, y as f32);
                }
                PathCommand::QuadraticCurveTo { cpx, cpy, x, y } => {
                    ensure_subpath(&mut builder, &mut open, cpx, cpy);
                    builder.quad_to(cpx as f32, cpy as f32, x as f32, y as f32);
                }
                PathCommand::BezierCurveTo { cp1x, cp1y, cp2x, cp2y, x, y } => {
                    ensure_subpath(&mut builder, &mut open, cp1x, cp1y);
                    builder.cubic_to(
                        cp1x as f32, cp1y as f32,
                        cp2x as f32, cp2y as f32,
                        x as f32, y as f32,
                    );
                }
                PathCommand::Arc { x, y, radius, start_angle, end_angle, counterclockwise } => {
                    let arc = EllipticalArc {
                        cx: x, cy: y, rx: radius, ry: radius, rotation: 0.0,
                        start: start_angle, end: end_angle, counterclockwise,
                    };
                    arc.append(&mut builder, &mut open);
                }
                PathCommand::Ellipse { x, y, rx, ry, rotation, start_angle, end_angle, counterclockwise } => {
                    let arc = EllipticalArc {
                        cx: x, cy: y, rx, ry, rotation,
                        start: start_angle, end: end_angle, counterclockwise,
                    };
                    arc.append(&mut builder, &mut open);
                }
                PathCommand::Rect { x, y, width, height } => {
                    builder.move_to(x as f32, y as f32);
                    builder.line_to((x + width) as f32, y as f32);
                    builder.line_to((x + width) as f32, (y + height) as f32);
                    builder.line_to(x as f32, (y + height) as f32);
                    builder.close();
                    open = true;
                }
                PathCommand::ClosePath => {
                    if open {
                        builder.close();
                    }
                }
            }
        }

        builder.finish()
    }
}

/// A drawing command without a current point starts a subpath at `(x, y)`.
fn ensure_subpath(builder: &mut tiny_skia::PathBuilder, open: &mut bool, x: f64, y: f64) {
    if !*open {
        builder.move_to(x as f32, y as f32);
        *open = true;
    }
}

struct EllipticalArc {
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    rotation: f64,
    start: f64,
    end: f64,
    counterclockwise: bool,
}

impl EllipticalArc {
    fn point(&self, theta: f64) -> (f64, f64) {
        let (sin, cos) = theta.sin_cos();
        self.rotate(self.rx * cos, self.ry * sin, self.cx, self.cy)
    }

    fn tangent(&self, theta: f64) -> (f64, f64) {
        let (sin, cos) = theta.sin_cos();
        self.rotate(-self.rx * sin, self.ry * cos, 0.0, 0.0)
    }

    fn rotate(&self, x: f64, y: f64, ox: f64, oy: f64) -> (f64, f64) {
        let (sin, cos) = self.rotation.sin_cos();
        (ox + x * cos - y * sin, oy + x * sin + y * cos)
    }

    /// Canvas sweep rules: a full turn or more draws the whole ellipse,
    /// otherwise the sweep is normalized into one turn in the drawing direction.
    fn sweep(&self) -> f64 {
        if self.counterclockwise {
            if self.start - self.end >= TAU {
                -TAU
            } else {
                -(self.start - self.end).rem_euclid(TAU)
            }
        } else if self.end - self.start >= TAU {
            TAU
        } else {
            (self.end - self.start).rem_euclid(TAU)
        }
    }

    fn append(&self, builder: &mut tiny_skia::PathBuilder, open: &mut bool) {
        let (sx, sy) = self.point(self.start);
        if *open {
            builder.line_to(sx as f32, sy as f32);
        } else {
            builder.move_to(sx as f32, sy as f32);
            *open = true;
        }

        let sweep = self.sweep();
        if sweep == 0.0 || self.rx <= 0.0 || self.ry <= 0.0 {
            return;
        }

        // Quarter turns at most, one cubic each.
        let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = sweep / segments as f64;
        let k = 4.0 / 3.0 * (step / 4.0).tan();

        let mut theta = self.start;
        for _ in 0..segments {
            let next = theta + step;
            let (x0, y0) = self.point(theta);
            let (x3, y3) = self.point(next);
            let (dx0, dy0) = self.tangent(theta);
            let (dx3, dy3) = self.tangent(next);
            builder.cubic_to(
                (x0 + k * dx0) as f32, (y0 + k * dy0) as f32,
                (x3 - k * dx3) as f32, (y3 - k * dy3) as f32,
                x3 as f32, y3 as f32,
            );
            theta = next;
        }
    }
}

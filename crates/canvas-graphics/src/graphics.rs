//! Vector graphics object
//!
//! The retained shape list the canvas fallback draws: each call to a `draw_*`
//! method records a [`GraphicsData`] entry carrying the fill and line settings
//! active at the time.

use crate::compositing::BlendMode;
use crate::transforms::TransformMatrix;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const EMPTY: Rect = Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Closed or open polyline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    /// Flat `x, y` pairs
    pub points: Vec<f64>,
    pub closed: bool,
}

impl Polygon {
    pub fn new(points: Vec<f64>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// Points as `(x, y)` pairs
    pub fn vertices(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.chunks_exact(2).map(|p| (p[0], p[1]))
    }

    /// Twice the signed area; the sign gives the winding direction
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len() / 2;
        (0..n)
            .map(|i| {
                let j = (i + 1) % n;
                let (x0, y0) = (self.points[i * 2], self.points[i * 2 + 1]);
                let (x1, y1) = (self.points[j * 2], self.points[j * 2 + 1]);
                x0 * y1 - x1 * y0
            })
            .sum()
    }
}

/// Recorded geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(Polygon),
    Rectangle(Rect),
    Circle { x: f64, y: f64, radius: f64 },
    /// `width` and `height` are the half-axes
    Ellipse { x: f64, y: f64, width: f64, height: f64 },
    RoundedRectangle { rect: Rect, radius: f64 },
}

impl Shape {
    /// Bounds of the geometry before line width
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Shape::Polygon(poly) => {
                let mut vertices = poly.vertices();
                let (x, y) = vertices.next()?;
                let (min_x, min_y, max_x, max_y) = vertices.fold((x, y, x, y), |(a, b, c, d), (x, y)| {
                    (a.min(x), b.min(y), c.max(x), d.max(y))
                });
                Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
            }
            Shape::Rectangle(rect) | Shape::RoundedRectangle { rect, .. } => Some(*rect),
            Shape::Circle { x, y, radius } => Some(Rect::new(x - radius, y - radius, radius * 2.0, radius * 2.0)),
            Shape::Ellipse { x, y, width, height } => {
                Some(Rect::new(x - width, y - height, width * 2.0, height * 2.0))
            }
        }
    }
}

/// One drawn shape with its fill and line settings
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsData {
    pub shape: Shape,
    pub line_width: f64,
    /// `0xRRGGBB`
    pub line_color: u32,
    pub line_alpha: f64,
    pub fill: bool,
    /// `0xRRGGBB`
    pub fill_color: u32,
    pub fill_alpha: f64,
    pub holes: Vec<Polygon>,
    /// Fill color after tinting
    pub fill_tint: u32,
    /// Line color after tinting
    pub line_tint: u32,
}

impl GraphicsData {
    fn update_tint(&mut self, tint: u32) {
        self.fill_tint = multiply_tint(self.fill_color, tint);
        self.line_tint = multiply_tint(self.line_color, tint);
    }
}

/// Multiply each `0xRRGGBB` channel by the tint channel
pub fn multiply_tint(color: u32, tint: u32) -> u32 {
    [16, 8, 0].into_iter().fold(0, |acc, shift| {
        let c = (color >> shift) & 0xff;
        let t = (tint >> shift) & 0xff;
        acc | (((c * t + 127) / 255) << shift)
    })
}

/// A vector graphics display object
#[derive(Debug, Clone)]
pub struct Graphics {
    data: Vec<GraphicsData>,
    /// The last entry is a polyline still being drawn
    drawing_path: bool,

    line_width: f64,
    line_color: u32,
    line_alpha: f64,
    filling: bool,
    fill_color: u32,
    fill_alpha: f64,

    /// Transform relative to the parent
    pub transform: TransformMatrix,
    /// Parent-composed transform used when drawing
    pub world_transform: TransformMatrix,
    pub world_alpha: f64,
    /// `0xRRGGBB` multiplier, white is neutral
    pub tint: u32,
    pub blend_mode: BlendMode,
    /// Masks only shape other objects and are never drawn
    pub is_mask: bool,

    applied_tint: Option<u32>,
}

impl Default for Graphics {
    fn default() -> Self {
        Self::new()
    }
}

impl Graphics {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            drawing_path: false,
            line_width: 0.0,
            line_color: 0,
            line_alpha: 1.0,
            filling: false,
            fill_color: 0,
            fill_alpha: 1.0,
            transform: TransformMatrix::identity(),
            world_transform: TransformMatrix::identity(),
            world_alpha: 1.0,
            tint: 0xffffff,
            blend_mode: BlendMode::default(),
            is_mask: false,
            applied_tint: None,
        }
    }

    /// Recorded shapes
    pub fn graphics_data(&self) -> &[GraphicsData] {
        &self.data
    }

    /// Set the line style for shapes drawn next. A width of zero disables lines.
    pub fn line_style(&mut self, width: f64, color: u32, alpha: f64) -> &mut Self {
        self.line_width = width.max(0.0);
        self.line_color = color;
        self.line_alpha = alpha;

        // A polyline with no segments yet picks up the new style.
        let (line_width, tint) = (self.line_width, self.tint);
        if let Some(data) = self.pending_path() {
            data.line_width = line_width;
            data.line_color = color;
            data.line_alpha = alpha;
            data.update_tint(tint);
            self.applied_tint = None;
        }
        self
    }

    pub fn begin_fill(&mut self, color: u32, alpha: f64) -> &mut Self {
        self.filling = true;
        self.fill_color = color;
        self.fill_alpha = alpha;
        let tint = self.tint;
        if let Some(data) = self.pending_path() {
            data.fill = true;
            data.fill_color = color;
            data.fill_alpha = alpha;
            data.update_tint(tint);
            self.applied_tint = None;
        }
        self
    }

    pub fn end_fill(&mut self) -> &mut Self {
        self.filling = false;
        self.fill_color = 0;
        self.fill_alpha = 1.0;
        self
    }

    /// Start a new polyline at `(x, y)`
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.draw_shape(Shape::Polygon(Polygon::new(vec![x, y], false)));
        self
    }

    /// Extend the current polyline, starting one at the origin if needed
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        if !self.drawing_path {
            self.move_to(0.0, 0.0);
        }
        if let Some(GraphicsData { shape: Shape::Polygon(poly), .. }) = self.data.last_mut() {
            poly.points.extend([x, y]);
        }
        self
    }

    pub fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.draw_shape(Shape::Rectangle(Rect::new(x, y, width, height)));
        self
    }

    pub fn draw_rounded_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64) -> &mut Self {
        self.draw_shape(Shape::RoundedRectangle { rect: Rect::new(x, y, width, height), radius });
        self
    }

    pub fn draw_circle(&mut self, x: f64, y: f64, radius: f64) -> &mut Self {
        self.draw_shape(Shape::Circle { x, y, radius });
        self
    }

    /// `half_width` and `half_height` are the half-axes
    pub fn draw_ellipse(&mut self, x: f64, y: f64, half_width: f64, half_height: f64) -> &mut Self {
        self.draw_shape(Shape::Ellipse { x, y, width: half_width, height: half_height });
        self
    }

    /// Closed polygon from flat `x, y` pairs
    pub fn draw_polygon(&mut self, points: Vec<f64>) -> &mut Self {
        self.draw_shape(Shape::Polygon(Polygon::new(points, true)));
        self
    }

    /// Turn the most recent polygon into a hole of the one before it.
    ///
    /// Returns false when there is no polygon pair to combine.
    pub fn add_hole(&mut self) -> bool {
        self.finish_poly();
        let n = self.data.len();
        if n < 2 || !matches!(self.data[n - 2].shape, Shape::Polygon(_)) {
            return false;
        }
        match self.data.pop() {
            Some(GraphicsData { shape: Shape::Polygon(mut hole), .. }) => {
                hole.closed = true;
                self.data[n - 2].holes.push(hole);
                true
            }
            Some(other) => {
                self.data.push(other);
                false
            }
            None => false,
        }
    }

    /// Close out the polyline being drawn. Polylines without a segment are dropped.
    pub fn finish_poly(&mut self) {
        if !std::mem::take(&mut self.drawing_path) {
            return;
        }
        let Some(GraphicsData { shape: Shape::Polygon(poly), .. }) = self.data.last_mut() else {
            return;
        };
        let n = poly.points.len();
        if n <= 2 {
            self.data.pop();
            return;
        }
        // A polyline ending where it started is closed.
        poly.closed = poly.closed || (poly.points[0] == poly.points[n - 2] && poly.points[1] == poly.points[n - 1]);
    }

    /// Remove every shape and reset the line and fill styles
    pub fn clear(&mut self) -> &mut Self {
        self.data.clear();
        self.drawing_path = false;
        self.line_width = 0.0;
        self.end_fill();
        self.applied_tint = None;
        self
    }

    /// Bounds in local space, each shape padded by half its line width
    pub fn local_bounds(&self) -> Rect {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for data in &self.data {
            let Some(rect) = data.shape.bounds() else {
                continue;
            };
            let pad = data.line_width / 2.0;
            let (x0, y0) = (rect.x - pad, rect.y - pad);
            let (x1, y1) = (rect.x + rect.width + pad, rect.y + rect.height + pad);
            bounds = Some(match bounds {
                Some((a, b, c, d)) => (a.min(x0), b.min(y0), c.max(x1), d.max(y1)),
                None => (x0, y0, x1, y1),
            });
        }
        match bounds {
            Some((x0, y0, x1, y1)) => Rect::new(x0, y0, x1 - x0, y1 - y0),
            None => Rect::EMPTY,
        }
    }

    /// Compose `parent` with the local transform into the world transform
    pub fn update_transform(&mut self, parent: &TransformMatrix) {
        self.world_transform = parent.multiply(&self.transform);
    }

    /// Recompute tinted colors when the tint or shapes changed since the last call
    pub fn refresh_tint(&mut self) {
        if self.applied_tint == Some(self.tint) {
            return;
        }
        let tint = self.tint;
        for data in &mut self.data {
            data.update_tint(tint);
        }
        self.applied_tint = Some(tint);
    }

    fn draw_shape(&mut self, shape: Shape) {
        self.finish_poly();

        let open = matches!(&shape, Shape::Polygon(poly) if !poly.closed);
        let mut data = GraphicsData {
            shape,
            line_width: self.line_width,
            line_color: self.line_color,
            line_alpha: self.line_alpha,
            fill: self.filling,
            fill_color: self.fill_color,
            fill_alpha: self.fill_alpha,
            holes: Vec::new(),
            fill_tint: 0,
            line_tint: 0,
        };
        data.update_tint(self.tint);
        self.data.push(data);
        self.applied_tint = None;
        self.drawing_path = open;
    }

    fn pending_path(&mut self) -> Option<&mut GraphicsData> {
        if !self.drawing_path {
            return None;
        }
        self.data.last_mut().filter(|data| match &data.shape {
            Shape::Polygon(poly) => poly.points.len() <= 2,
            _ => false,
        })
    }
}

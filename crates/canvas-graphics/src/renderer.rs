//! Canvas Renderer
//!
//! Software fallback renderer for [`Graphics`] objects. The renderer prepares
//! the target and transform, then hands the object its render hook; the
//! object calls back into [`GraphicsRenderer`] to draw its shapes through the
//! paint dispatcher.

use std::f64::consts::TAU;

use crate::config::RendererConfig;
use crate::context2d::{CanvasRenderingContext2D, Color};
use crate::extension::CanvasGraphicsExt;
use crate::graphics::{Graphics, GraphicsData, Shape};
use crate::paint::Painter;
use crate::style::{Style, StyleSheet};
use crate::transforms::TransformMatrix;
use crate::CanvasError;

/// Cubic control-point factor for quarter ellipses
const KAPPA: f64 = 0.5522848;

/// Draws the shape list of a graphics object
#[derive(Debug, Default)]
pub struct GraphicsRenderer {
    /// Scratch sheet, refilled on every render
    styles: StyleSheet,
}

impl GraphicsRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw every shape of `graphics` into `target` at its world transform.
    pub fn render(
        &mut self,
        graphics: &mut Graphics,
        target: &mut CanvasRenderingContext2D,
        resolution: f64,
    ) -> Result<(), CanvasError> {
        let world = TransformMatrix::scale(resolution, resolution).multiply(&graphics.world_transform);
        target.set_transform(world);
        graphics.refresh_tint();

        let world_alpha = graphics.world_alpha;
        self.styles.clear();
        let base = self.styles.insert(Style::new().blend_mode(graphics.blend_mode));

        for data in graphics.graphics_data() {
            target.begin_path();
            if !trace_shape(target, data) {
                continue;
            }

            let fill = data.fill.then(|| {
                self.styles.insert(
                    Style::new()
                        .paint(Color::from_rgb_u32(data.fill_tint))
                        .alpha((data.fill_alpha * world_alpha).clamp(0.0, 1.0))
                        .uses(base),
                )
            });
            let stroke = (data.line_width > 0.0).then(|| {
                self.styles.insert(
                    Style::new()
                        .paint(Color::from_rgb_u32(data.line_tint))
                        .alpha((data.line_alpha * world_alpha).clamp(0.0, 1.0))
                        .width(data.line_width)
                        .uses(base),
                )
            });

            let mut painter = Painter::new(&self.styles, target);
            if let Some(fill) = fill {
                painter.fill(fill)?;
            }
            if let Some(stroke) = stroke {
                painter.stroke(stroke)?;
            }
        }

        tracing::trace!(
            shapes = graphics.graphics_data().len(),
            styles = self.styles.len(),
            "rendered graphics"
        );
        Ok(())
    }
}

/// Build the path for one shape. Returns false when there is nothing to draw.
fn trace_shape(ctx: &mut CanvasRenderingContext2D, data: &GraphicsData) -> bool {
    match &data.shape {
        Shape::Polygon(poly) => {
            if poly.points.len() < 4 {
                return false;
            }
            trace_polygon(ctx, poly.vertices(), poly.closed);

            // Holes wind against the outline so non-zero filling cuts them out.
            let outer = poly.signed_area();
            for hole in &data.holes {
                if hole.signed_area() * outer > 0.0 {
                    let reversed: Vec<_> = hole.vertices().collect();
                    trace_polygon(ctx, reversed.into_iter().rev(), true);
                } else {
                    trace_polygon(ctx, hole.vertices(), true);
                }
            }
        }
        Shape::Rectangle(rect) => ctx.rect(rect.x, rect.y, rect.width, rect.height),
        Shape::Circle { x, y, radius } => {
            ctx.arc(*x, *y, *radius, 0.0, TAU, false);
            ctx.close_path();
        }
        Shape::Ellipse { x, y, width, height } => trace_ellipse(ctx, *x, *y, *width, *height),
        Shape::RoundedRectangle { rect, radius } => {
            ctx.round_rect(rect.x, rect.y, rect.width, rect.height, *radius)
        }
    }
    true
}

fn trace_polygon(ctx: &mut CanvasRenderingContext2D, mut vertices: impl Iterator<Item = (f64, f64)>, closed: bool) {
    let Some((x, y)) = vertices.next() else {
        return;
    };
    ctx.move_to(x, y);
    for (x, y) in vertices {
        ctx.line_to(x, y);
    }
    if closed {
        ctx.close_path();
    }
}

fn trace_ellipse(ctx: &mut CanvasRenderingContext2D, cx: f64, cy: f64, rx: f64, ry: f64) {
    let (x, y) = (cx - rx, cy - ry);
    let (xe, ye) = (cx + rx, cy + ry);
    let (ox, oy) = (rx * KAPPA, ry * KAPPA);

    ctx.move_to(x, cy);
    ctx.bezier_curve_to(x, cy - oy, cx - ox, y, cx, y);
    ctx.bezier_curve_to(cx + ox, y, xe, cy - oy, xe, cy);
    ctx.bezier_curve_to(xe, cy + oy, cx + ox, ye, cx, ye);
    ctx.bezier_curve_to(cx - ox, ye, x, cy + oy, x, cy);
    ctx.close_path();
}

/// Software renderer for graphics objects
#[derive(Debug)]
pub struct CanvasRenderer {
    config: RendererConfig,
    graphics: GraphicsRenderer,
}

impl CanvasRenderer {
    pub fn new(config: RendererConfig) -> Self {
        tracing::debug!(resolution = config.resolution, "canvas renderer created");
        Self {
            config,
            graphics: GraphicsRenderer::new(),
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Resolution used by [`render_graphics`](Self::render_graphics)
    pub fn resolution(&self) -> f64 {
        self.config.resolution
    }

    /// Render `graphics` into `target`.
    ///
    /// With a `parent` transform the object is drawn as if it were a child of
    /// it. Without one it is drawn as a root, at its local transform. Its
    /// stored world transform is left as it was either way.
    pub fn render(
        &mut self,
        graphics: &mut Graphics,
        target: &mut CanvasRenderingContext2D,
        parent: Option<&TransformMatrix>,
    ) -> Result<(), CanvasError> {
        if self.config.clear_before_render {
            target.clear(self.config.background);
        }
        let resolution = self.config.resolution;
        self.render_at(graphics, target, parent, resolution)
    }

    /// Render at an explicit resolution without clearing.
    pub(crate) fn render_at(
        &mut self,
        graphics: &mut Graphics,
        target: &mut CanvasRenderingContext2D,
        parent: Option<&TransformMatrix>,
        resolution: f64,
    ) -> Result<(), CanvasError> {
        let previous = graphics.world_transform;
        graphics.update_transform(parent.unwrap_or(&TransformMatrix::IDENTITY));

        let saved_resolution = std::mem::replace(&mut self.config.resolution, resolution);
        let saved_anti_alias = target.anti_alias();
        target.set_anti_alias(self.config.anti_alias);
        target.save();
        let result = graphics.render_canvas(self, target);
        target.restore();
        target.set_anti_alias(saved_anti_alias);
        self.config.resolution = saved_resolution;

        graphics.world_transform = previous;
        result
    }

    /// Render hook target: draw the shapes of `graphics` as they are.
    pub fn render_graphics(
        &mut self,
        graphics: &mut Graphics,
        target: &mut CanvasRenderingContext2D,
    ) -> Result<(), CanvasError> {
        let resolution = self.config.resolution;
        self.graphics.render(graphics, target, resolution)
    }
}

impl Default for CanvasRenderer {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositing::CompositeOperation;

    fn target(size: u32) -> CanvasRenderingContext2D {
        CanvasRenderingContext2D::new(size, size).unwrap()
    }

    #[test]
    fn test_fill_and_stroke() {
        let mut g = Graphics::new();
        g.line_style(4.0, 0x0000ff, 1.0)
            .begin_fill(0xff0000, 1.0)
            .draw_rect(10.0, 10.0, 20.0, 20.0);

        let mut ctx = target(40);
        CanvasRenderer::default().render(&mut g, &mut ctx, None).unwrap();

        assert_eq!(ctx.pixel(20, 20), Some(Color::RED));
        assert_eq!(ctx.pixel(10, 20), Some(Color::BLUE));
        assert_eq!(ctx.pixel(2, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_state_restored_after_render() {
        let mut g = Graphics::new();
        g.begin_fill(0xff0000, 0.5).draw_circle(5.0, 5.0, 4.0);
        g.blend_mode = CompositeOperation::Multiply;

        let mut ctx = target(10);
        CanvasRenderer::default().render(&mut g, &mut ctx, None).unwrap();

        assert_eq!(ctx.save_depth(), 0);
        assert_eq!(ctx.state().global_alpha, 1.0);
        assert_eq!(ctx.state().global_composite_operation, CompositeOperation::SourceOver);
        assert!(ctx.state().transform.is_identity());
    }

    #[test]
    fn test_world_alpha_scales_fill() {
        let mut g = Graphics::new();
        g.begin_fill(0x00ff00, 1.0).draw_rect(0.0, 0.0, 10.0, 10.0);
        g.world_alpha = 0.5;

        let mut ctx = target(10);
        CanvasRenderer::default().render(&mut g, &mut ctx, None).unwrap();

        let alpha = ctx.pixel(5, 5).unwrap().a;
        assert!((126..=129).contains(&alpha), "alpha was {alpha}");
    }

    #[test]
    fn test_hole_is_cut_out() {
        let mut g = Graphics::new();
        g.begin_fill(0x000000, 1.0)
            .draw_polygon(vec![0.0, 0.0, 20.0, 0.0, 20.0, 20.0, 0.0, 20.0])
            .draw_polygon(vec![5.0, 5.0, 15.0, 5.0, 15.0, 15.0, 5.0, 15.0]);
        assert!(g.add_hole());

        let mut ctx = target(20);
        CanvasRenderer::default().render(&mut g, &mut ctx, None).unwrap();

        assert_eq!(ctx.pixel(2, 2), Some(Color::BLACK));
        assert_eq!(ctx.pixel(10, 10), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_parent_transform_is_temporary() {
        let mut g = Graphics::new();
        g.begin_fill(0xffffff, 1.0).draw_rect(0.0, 0.0, 4.0, 4.0);

        let mut ctx = target(20);
        let parent = TransformMatrix::translate(10.0, 10.0);
        CanvasRenderer::default().render(&mut g, &mut ctx, Some(&parent)).unwrap();

        assert_eq!(ctx.pixel(12, 12), Some(Color::WHITE));
        assert_eq!(ctx.pixel(2, 2), Some(Color::TRANSPARENT));
        assert!(g.world_transform.is_identity());
    }

    #[test]
    fn test_root_draws_at_local_transform() {
        let mut g = Graphics::new();
        g.begin_fill(0xffffff, 1.0).draw_rect(0.0, 0.0, 4.0, 4.0);
        g.transform = TransformMatrix::translate(10.0, 10.0);

        let mut ctx = target(20);
        CanvasRenderer::default().render(&mut g, &mut ctx, None).unwrap();

        assert_eq!(ctx.pixel(12, 12), Some(Color::WHITE));
        assert_eq!(ctx.pixel(2, 2), Some(Color::TRANSPARENT));
        assert!(g.world_transform.is_identity());
    }

    #[test]
    fn test_anti_alias_flag_restored() {
        let mut g = Graphics::new();
        g.begin_fill(0xffffff, 1.0).draw_circle(5.0, 5.0, 3.0);

        let mut ctx = target(10);
        let config = RendererConfig { anti_alias: false, ..RendererConfig::default() };
        CanvasRenderer::new(config).render(&mut g, &mut ctx, None).unwrap();

        assert!(ctx.anti_alias());
    }

    #[test]
    fn test_resolution_scales_output() {
        let mut g = Graphics::new();
        g.begin_fill(0xff0000, 1.0).draw_rect(0.0, 0.0, 5.0, 5.0);

        let mut ctx = target(20);
        let config = RendererConfig { resolution: 2.0, ..RendererConfig::default() };
        CanvasRenderer::new(config).render(&mut g, &mut ctx, None).unwrap();

        assert_eq!(ctx.pixel(8, 8), Some(Color::RED));
        assert_eq!(ctx.pixel(12, 12), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_ellipse_and_rounded_rect() {
        let mut g = Graphics::new();
        g.begin_fill(0x0000ff, 1.0)
            .draw_ellipse(10.0, 10.0, 8.0, 4.0)
            .draw_rounded_rect(0.0, 20.0, 20.0, 10.0, 4.0);

        let mut ctx = target(32);
        CanvasRenderer::default().render(&mut g, &mut ctx, None).unwrap();

        assert_eq!(ctx.pixel(10, 10), Some(Color::BLUE));
        assert_eq!(ctx.pixel(10, 3), Some(Color::TRANSPARENT));
        assert_eq!(ctx.pixel(10, 25), Some(Color::BLUE));
    }
}

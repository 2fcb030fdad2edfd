//! Canvas methods for [`Graphics`]
//!
//! The two entry points the plugin adds to the graphics object: the render
//! hook the canvas renderer invokes, and snapshotting into a texture.

use crate::context2d::CanvasRenderingContext2D;
use crate::graphics::Graphics;
use crate::renderer::CanvasRenderer;
use crate::texture::{ScaleMode, Texture};
use crate::CanvasError;

/// Canvas fallback behaviour for graphics objects
pub trait CanvasGraphicsExt {
    /// Render hook: draw through `renderer` into `target`. Masks draw nothing.
    fn render_canvas(
        &mut self,
        renderer: &mut CanvasRenderer,
        target: &mut CanvasRenderingContext2D,
    ) -> Result<(), CanvasError>;

    /// Render into a new texture sized to the local bounds.
    ///
    /// The shape lands at the texture origin whatever its position or
    /// transform in its parent. `renderer` is the offscreen renderer owned by
    /// the caller's pipeline.
    fn generate_canvas_texture(
        &mut self,
        renderer: &mut CanvasRenderer,
        scale_mode: ScaleMode,
        resolution: f64,
    ) -> Result<Texture, CanvasError>;
}

impl CanvasGraphicsExt for Graphics {
    fn render_canvas(
        &mut self,
        renderer: &mut CanvasRenderer,
        target: &mut CanvasRenderingContext2D,
    ) -> Result<(), CanvasError> {
        if self.is_mask {
            return Ok(());
        }
        self.finish_poly();
        renderer.render_graphics(self, target)
    }

    fn generate_canvas_texture(
        &mut self,
        renderer: &mut CanvasRenderer,
        scale_mode: ScaleMode,
        resolution: f64,
    ) -> Result<Texture, CanvasError> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(CanvasError::InvalidState(format!("invalid resolution {resolution}")));
        }

        self.finish_poly();
        let bounds = self.local_bounds();
        let width = ((bounds.width * resolution).ceil() as u32).max(1);
        let height = ((bounds.height * resolution).ceil() as u32).max(1);
        let mut target = CanvasRenderingContext2D::new(width, height)?;

        // Undo the local transform and shift the bounds corner to the origin.
        let mut parent = self.transform.invert().ok_or(CanvasError::NonInvertibleTransform)?;
        parent.e -= bounds.x;
        parent.f -= bounds.y;

        renderer.render_at(self, &mut target, Some(&parent), resolution)?;
        tracing::debug!(width, height, resolution, "generated canvas texture");

        Ok(Texture::new(target.into_pixmap(), scale_mode, resolution))
    }
}

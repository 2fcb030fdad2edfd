//! Pipeline - Main entry point

use crate::config::RendererConfig;
use crate::context2d::CanvasRenderingContext2D;
use crate::extension::CanvasGraphicsExt;
use crate::graphics::Graphics;
use crate::renderer::CanvasRenderer;
use crate::texture::{ScaleMode, Texture};
use crate::CanvasError;

/// Canvas render pipeline
///
/// Owns the on-screen renderer and the offscreen renderer used for texture
/// snapshots. Both are built once here and live as long as the pipeline.
#[derive(Debug)]
pub struct CanvasPipeline {
    config: RendererConfig,
    screen: CanvasRenderer,
    offscreen: CanvasRenderer,
}

impl CanvasPipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: RendererConfig) -> Self {
        tracing::info!("canvas pipeline {} initialized", crate::VERSION);
        Self {
            screen: CanvasRenderer::new(config.clone()),
            offscreen: CanvasRenderer::new(config.clone()),
            config,
        }
    }

    /// Render `graphics` into `target` with the on-screen renderer
    pub fn render(
        &mut self,
        graphics: &mut Graphics,
        target: &mut CanvasRenderingContext2D,
    ) -> Result<(), CanvasError> {
        self.screen.render(graphics, target, None)
    }

    /// Snapshot `graphics` into a texture through the offscreen renderer
    pub fn generate_texture(
        &mut self,
        graphics: &mut Graphics,
        scale_mode: ScaleMode,
        resolution: f64,
    ) -> Result<Texture, CanvasError> {
        graphics.generate_canvas_texture(&mut self.offscreen, scale_mode, resolution)
    }

    pub fn renderer(&mut self) -> &mut CanvasRenderer {
        &mut self.screen
    }

    pub fn offscreen_renderer(&mut self) -> &mut CanvasRenderer {
        &mut self.offscreen
    }

    /// Get pipeline configuration
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }
}

impl Default for CanvasPipeline {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context2d::Color;

    #[test]
    fn test_render_clears_with_background() {
        let config = RendererConfig { background: Color::WHITE, ..RendererConfig::default() };
        let mut pipeline = CanvasPipeline::new(config);
        let mut g = Graphics::new();
        g.begin_fill(0xff0000, 1.0).draw_rect(0.0, 0.0, 4.0, 4.0);

        let mut ctx = CanvasRenderingContext2D::new(8, 8).unwrap();
        pipeline.render(&mut g, &mut ctx).unwrap();

        assert_eq!(ctx.pixel(2, 2), Some(Color::RED));
        assert_eq!(ctx.pixel(6, 6), Some(Color::WHITE));
    }

    #[test]
    fn test_snapshot_keeps_offscreen_resolution() {
        let mut pipeline = CanvasPipeline::default();
        let mut g = Graphics::new();
        g.begin_fill(0x0000ff, 1.0).draw_rect(0.0, 0.0, 3.0, 2.0);

        let texture = pipeline.generate_texture(&mut g, ScaleMode::Nearest, 2.0).unwrap();

        assert_eq!((texture.pixel_width(), texture.pixel_height()), (6, 4));
        assert_eq!(texture.scale_mode(), ScaleMode::Nearest);
        assert_eq!(pipeline.offscreen_renderer().resolution(), 1.0);
    }

    #[test]
    fn test_invalid_resolution() {
        let mut pipeline = CanvasPipeline::default();
        let mut g = Graphics::new();
        g.begin_fill(0x0000ff, 1.0).draw_rect(0.0, 0.0, 3.0, 2.0);

        let err = pipeline.generate_texture(&mut g, ScaleMode::Linear, 0.0).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidState(_)));
    }
}

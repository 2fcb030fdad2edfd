//! Example: Snapshot a graphics object to a PNG file
//!
//! Run with `RUST_LOG=debug` to see the pipeline at work.

use canvas_graphics::{CanvasPipeline, Graphics, RendererConfig, ScaleMode, TransformMatrix};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut pipeline = CanvasPipeline::new(RendererConfig::default());

    let mut badge = Graphics::new();
    badge
        .line_style(4.0, 0x1d3557, 1.0)
        .begin_fill(0xe63946, 1.0)
        .draw_rounded_rect(0.0, 0.0, 120.0, 60.0, 12.0)
        .end_fill()
        .begin_fill(0xf1faee, 0.9)
        .draw_circle(30.0, 30.0, 16.0)
        .draw_ellipse(80.0, 30.0, 24.0, 12.0);
    badge.transform = TransformMatrix::translate(200.0, 150.0).multiply(&TransformMatrix::rotate(0.3));

    let texture = pipeline.generate_texture(&mut badge, ScaleMode::Linear, 2.0)?;
    println!(
        "Rendered {}x{} texture ({}x{} pixels)",
        texture.width(),
        texture.height(),
        texture.pixel_width(),
        texture.pixel_height()
    );

    let path = std::env::args().nth(1).unwrap_or_else(|| "snapshot.png".to_string());
    texture.pixmap().save_png(&path)?;
    println!("Saved {path}");

    Ok(())
}

//! Renderer Configuration

use serde::Deserialize;

use crate::context2d::Color;

/// Canvas renderer configuration options
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Device pixels per logical unit
    pub resolution: f64,

    /// Clear the target before each render
    pub clear_before_render: bool,

    /// Color used when clearing; transparent leaves a clean alpha channel
    pub background: Color,

    /// Anti-alias fills and strokes
    pub anti_alias: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            clear_before_render: true,
            background: Color::TRANSPARENT,
            anti_alias: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RendererConfig = serde_json::from_str(r#"{ "resolution": 2.0 }"#).unwrap();

        assert_eq!(config.resolution, 2.0);
        assert!(config.clear_before_render);
        assert_eq!(config.background, Color::TRANSPARENT);
    }

    #[test]
    fn test_background_color() {
        let config: RendererConfig =
            serde_json::from_str(r#"{ "background": { "r": 255, "g": 255, "b": 255, "a": 255 }, "anti_alias": false }"#)
                .unwrap();

        assert_eq!(config.background, Color::WHITE);
        assert!(!config.anti_alias);
    }
}

//! Rendering configuration.
//!
//! [`AppConfig`] is deserialized from TOML by the command-line tool; every
//! section and field is optional.
//!
//! ```toml
//! [render]
//! margin = 30.0
//!
//! [style]
//! background_color = "#fafafa"
//! ```
//!
//! ```
//! # use trellis::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.render().margin(), 20.0);
//! assert!(config.style().background_color().unwrap().is_none());
//! ```

use serde::Deserialize;

use trellis_core::color::Color;

/// Root of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    render: RenderConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(render: RenderConfig, style: StyleConfig) -> Self {
        Self { render, style }
    }

    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

fn default_margin() -> f32 {
    20.0
}

/// Output document settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Space kept between the drawing and the edge of the SVG canvas.
    #[serde(default = "default_margin")]
    margin: f32,
}

impl RenderConfig {
    pub fn new(margin: f32) -> Self {
        Self { margin }
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(default_margin())
    }
}

/// Visual styling of the output document.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Canvas background as a CSS color string; transparent when unset.
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    pub fn new(background_color: Option<String>) -> Self {
        Self { background_color }
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}

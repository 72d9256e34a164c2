//! Font and text-alignment definitions for labels.
//!
//! yEd labels carry `fontFamily`, `fontSize`, `fontStyle`, `textColor` and
//! `underlinedText` attributes. [`FontSpec`] holds their parsed values and
//! knows how to write them onto an SVG `<text>` element.

use std::str::FromStr;

use serde::Deserialize;

use crate::color::Color;

/// Weight/slant combination as written by yEd (`plain`, `bold`, `italic`, `bolditalic`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Plain,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn is_bold(self) -> bool {
        matches!(self, Self::Bold | Self::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, Self::Italic | Self::BoldItalic)
    }
}

impl FromStr for FontStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "bold" => Ok(Self::Bold),
            "italic" => Ok(Self::Italic),
            "bolditalic" => Ok(Self::BoldItalic),
            _ => Err(format!(
                "invalid font style `{s}`, valid values: plain, bold, italic, bolditalic"
            )),
        }
    }
}

/// Horizontal text anchoring, mapped to SVG `text-anchor`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

impl TextAnchor {
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

impl FromStr for TextAnchor {
    type Err = String;

    /// Parses yEd's `alignment` attribute (`left`, `center`, `right`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Start),
            "center" => Ok(Self::Middle),
            "right" => Ok(Self::End),
            _ => Err(format!(
                "invalid alignment `{s}`, valid values: left, center, right"
            )),
        }
    }
}

/// Font metadata attached to a label.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    family: String,
    size: f32,
    style: FontStyle,
    color: Color,
    underlined: bool,
}

impl Default for FontSpec {
    /// yEd's defaults: 12pt "Dialog", plain, black.
    fn default() -> Self {
        Self {
            family: String::from("Dialog"),
            size: 12.0,
            style: FontStyle::Plain,
            color: Color::default(),
            underlined: false,
        }
    }
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            ..Self::default()
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn underlined(&self) -> bool {
        self.underlined
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_underline(mut self, underlined: bool) -> Self {
        self.underlined = underlined;
        self
    }

    /// Baseline-to-baseline distance used for multi-line labels.
    pub fn line_height(&self) -> f32 {
        (self.size * 1.2).ceil()
    }

    /// Writes the font attributes onto an SVG text element.
    pub fn apply_to(&self, text: svg::node::element::Text) -> svg::node::element::Text {
        let mut text = text
            .set("font-family", self.family.as_str())
            .set("font-size", self.size)
            .set("fill", self.color.to_opaque_string());
        if self.style.is_bold() {
            text = text.set("font-weight", "bold");
        }
        if self.style.is_italic() {
            text = text.set("font-style", "italic");
        }
        if self.underlined {
            text = text.set("text-decoration", "underline");
        }
        text
    }
}

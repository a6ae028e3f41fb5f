use super::theme::Theme;
use super::{Size, WidgetId};

/// Ratio of average glyph advance to font size. Font shaping lives in the
/// rendering backend; the tree only needs a stable estimate for sizing.
const GLYPH_WIDTH_RATIO: f32 = 0.6;

/// Flat enum widget identity.
/// Closed set: the core only ships the kinds its own subsystems need.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// Plain container. Draws nothing itself.
    Panel,

    /// Single-line text.
    Label {
        text: String,
        color: [f32; 4], // sRGB RGBA
        font_size: f32,  // pixels
    },

    /// Floating tooltip surface: a rounded background behind one content child.
    Tooltip {
        background: [f32; 4], // sRGB RGBA
        corner_radius: f32,   // pixels
    },
}

impl Widget {
    /// Label styled with the theme's body text.
    pub fn label(text: impl Into<String>, theme: &Theme) -> Self {
        Widget::Label {
            text: text.into(),
            color: theme.text_color,
            font_size: theme.font_body_size,
        }
    }

    pub fn tooltip(theme: &Theme) -> Self {
        Widget::Tooltip {
            background: theme.tooltip_bg_color,
            corner_radius: theme.tooltip_corner_radius,
        }
    }

    /// Short type name used in log lines.
    pub fn type_name(&self) -> &'static str {
        match self {
            Widget::Panel => "Panel",
            Widget::Label { .. } => "Label",
            Widget::Tooltip { .. } => "Tooltip",
        }
    }
}

/// Tooltip metadata resolved for one widget.
#[derive(Debug, Clone, PartialEq)]
pub enum TooltipContent {
    /// Plain text, shown in the tooltip's label.
    Text(String),
    /// Externally supplied widget embedded as the tooltip's content.
    Widget(WidgetId),
}

/// Approximate text extent: glyph count times an average advance, one line high.
pub fn measure_text(text: &str, font_size: f32) -> Size {
    Size {
        width: text.chars().count() as f32 * font_size * GLYPH_WIDTH_RATIO,
        height: font_size,
    }
}

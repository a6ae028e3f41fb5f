use serde::Deserialize;

use super::animation::Easing;

/// Centralized visual style and timing constants.
///
/// Passed explicitly to whatever constructs widgets or subsystems; there is
/// no global skin. Loadable from RON, any missing field keeps its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
    // -- Text --
    /// Default label text color (sRGB RGBA): #F0F0F0
    pub text_color: [f32; 4],
    /// Body font size in pixels.
    pub font_body_size: f32,

    // -- Tooltip --
    /// Pointer dwell time before a tooltip appears (seconds).
    pub tooltip_delay_secs: f32,
    /// Vertical distance from the pointer to the tooltip's top edge (pixels).
    pub tooltip_offset_y: f32,
    /// Padding between tooltip background and content, each side (pixels).
    pub tooltip_padding: f32,
    /// Tooltip background: #202020 at 95% alpha.
    pub tooltip_bg_color: [f32; 4],
    /// Tooltip background corner radius (pixels).
    pub tooltip_corner_radius: f32,

    // -- Animation --
    /// Duration of opacity fades (seconds).
    pub fade_duration_secs: f32,
    pub fade_easing: Easing,
}

/// Convert a hex color (#RRGGBB) to sRGB [f32; 4] with alpha 1.0.
pub const fn hex(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Convert a hex color with custom alpha.
pub const fn hex_a(r: u8, g: u8, b: u8, a: f32) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text_color: hex(0xF0, 0xF0, 0xF0),
            font_body_size: 12.0,

            tooltip_delay_secs: 0.5,
            tooltip_offset_y: 20.0,
            tooltip_padding: 6.0,
            tooltip_bg_color: hex_a(0x20, 0x20, 0x20, 0.95),
            tooltip_corner_radius: 3.0,

            fade_duration_secs: 0.15,
            fade_easing: Easing::EaseOut,
        }
    }
}

impl Theme {
    pub fn from_ron(source: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(source)
    }

    /// Load a theme from a RON file. Logs a warning and returns the default
    /// theme if the file is missing or malformed.
    pub fn load(path: &str) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("failed to read {}: {}, using default theme", path, e);
                return Self::default();
            }
        };
        match Self::from_ron(&content) {
            Ok(theme) => theme,
            Err(e) => {
                log::warn!("failed to parse RON {}: {}, using default theme", path, e);
                Self::default()
            }
        }
    }
}

//! Terminal theme and color utilities.

use crate::notifications::NotificationLevel;
use bandwatch_core::Rgb;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct MeterTheme {
    pub primary: Color,
    pub text: Color,
    pub text_dim: Color,
    pub axis: Color,
    pub border: Color,
    pub border_focus: Color,
    pub highlight_bg: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
}

impl MeterTheme {
    pub fn dark() -> Self {
        Self {
            primary: Color::Rgb(105, 179, 162),
            text: Color::Rgb(235, 235, 235),
            text_dim: Color::Rgb(136, 136, 136),
            axis: Color::Rgb(170, 170, 170),
            border: Color::Rgb(68, 68, 68),
            border_focus: Color::Rgb(105, 179, 162),
            highlight_bg: Color::Rgb(42, 42, 42),
            warning: Color::Rgb(255, 200, 0),
            error: Color::Rgb(255, 77, 77),
            info: Color::Rgb(0, 200, 255),
        }
    }
}

impl Default for MeterTheme {
    fn default() -> Self {
        Self::dark()
    }
}

pub fn rgb_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

pub fn notification_color(level: NotificationLevel, theme: &MeterTheme) -> Color {
    match level {
        NotificationLevel::Info => theme.info,
        NotificationLevel::Warning => theme.warning,
        NotificationLevel::Error => theme.error,
    }
}

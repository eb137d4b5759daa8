//! Theme color definitions for the probe UI

use crate::config::Theme;
use ratatui::style::Color;

/// Color palette for the UI
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    /// Main background
    pub bg: Color,
    /// Primary foreground text
    pub fg: Color,
    /// Dimmed/secondary text
    pub dim: Color,
    /// Accent color (headings, borders)
    pub accent: Color,
    /// Good rating / listener detached
    pub green: Color,
    /// Needs improvement / waiting
    pub yellow: Color,
    /// Poor rating / discarded
    pub red: Color,
    /// Status bar background
    pub bar_bg: Color,
}

impl ThemeColors {
    /// Create a color palette for the given theme variant
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(22, 22, 30),
            fg: Color::Rgb(200, 200, 210),
            dim: Color::Rgb(90, 90, 110),
            accent: Color::Rgb(80, 200, 220),
            green: Color::Rgb(80, 200, 120),
            yellow: Color::Rgb(240, 180, 80),
            red: Color::Rgb(240, 90, 100),
            bar_bg: Color::Rgb(40, 40, 50),
        }
    }

    /// High contrast for bright terminals
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(245, 245, 248),
            fg: Color::Rgb(30, 30, 40),
            dim: Color::Rgb(130, 130, 150),
            accent: Color::Rgb(0, 130, 160),
            green: Color::Rgb(30, 150, 70),
            yellow: Color::Rgb(180, 120, 0),
            red: Color::Rgb(200, 50, 60),
            bar_bg: Color::Rgb(220, 220, 228),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_theme_selects_correct_palette() {
        let dark = ThemeColors::from_theme(Theme::Dark);
        let light = ThemeColors::from_theme(Theme::Light);

        assert_eq!(dark.bg, Color::Rgb(22, 22, 30));
        assert_eq!(light.bg, Color::Rgb(245, 245, 248));
        assert_ne!(dark.fg, light.fg);
    }
}

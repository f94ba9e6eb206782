//! Theme colors, with optional overrides from the `[theme]` config table

use ratatui::style::Color;

use crate::config::ThemeConfig;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,      // Active borders, highlights, key hints
    pub danger: Color,      // Errors, the support heart
    pub text: Color,        // Primary text
    pub text_dim: Color,    // Placeholders, hints
    pub bg_selected: Color, // Highlighted list row
    pub inactive: Color,    // Inactive borders
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired fallback
        Self {
            accent: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
        }
    }
}

impl Theme {
    /// Defaults with any valid overrides from config applied
    pub fn from_config(config: &ThemeConfig) -> Self {
        let base = Self::default();
        let pick = |value: &Option<String>, fallback: Color| {
            match value.as_deref().map(Self::parse_hex_color) {
                Some(Some(color)) => color,
                Some(None) => {
                    tracing::warn!("Ignoring invalid theme color: {:?}", value);
                    fallback
                }
                None => fallback,
            }
        };

        Self {
            accent: pick(&config.accent, base.accent),
            danger: pick(&config.danger, base.danger),
            text: pick(&config.text, base.text),
            text_dim: pick(&config.text_dim, base.text_dim),
            bg_selected: pick(&config.bg_selected, base.bg_selected),
            inactive: pick(&config.inactive, base.inactive),
        }
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        if !s.is_ascii() {
            return None;
        }
        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Theme::parse_hex_color("#FFC107"), Some(Color::Rgb(255, 193, 7)));
        assert_eq!(Theme::parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("#12345"), None);
        assert_eq!(Theme::parse_hex_color("#gggggg"), None);
        assert_eq!(Theme::parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_overrides_apply_and_invalid_ones_fall_back() {
        let config = ThemeConfig {
            accent: Some("#000000".to_string()),
            text: Some("not a color".to_string()),
            ..Default::default()
        };
        let theme = Theme::from_config(&config);
        assert_eq!(theme.accent, Color::Rgb(0, 0, 0));
        assert_eq!(theme.text, Theme::default().text);
    }
}

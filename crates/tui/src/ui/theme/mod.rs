//! Theme styling for the TUI.
//!
//! A Nord palette is used on truecolor terminals and an indexed fallback
//! everywhere else. Prefer the helpers in [`theme_helpers`] over hard-coded
//! colors.

use std::env;

use tracing::debug;

pub mod ansi256;
pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use ansi256::Ansi256Theme;
pub use nord::{NordTheme, NordThemeHighContrast};
pub use roles::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorCapability {
    Truecolor,
    Ansi256,
}

/// Selects a theme from `TUI_THEME` and the terminal's color capability.
pub fn load() -> Box<dyn Theme> {
    let capability = detect_color_capability();
    if capability == ColorCapability::Ansi256 {
        debug!("ANSI-only terminal detected; using the indexed palette");
        return Box::new(Ansi256Theme::new());
    }

    match env::var("TUI_THEME").ok().as_deref().map(str::trim) {
        Some("nord-high-contrast" | "high-contrast") => Box::new(NordThemeHighContrast::new()),
        Some("ansi256") => Box::new(Ansi256Theme::new()),
        _ => Box::new(NordTheme::new()),
    }
}

fn detect_color_capability() -> ColorCapability {
    if let Some(mode) = env::var("TUI_COLOR_MODE").ok().and_then(|value| parse_color_mode(value.trim())) {
        return mode;
    }

    let color_term = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    if color_term.contains("truecolor") || color_term.contains("24bit") {
        return ColorCapability::Truecolor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term.contains("truecolor") || term.contains("direct") {
        return ColorCapability::Truecolor;
    }

    ColorCapability::Ansi256
}

fn parse_color_mode(value: &str) -> Option<ColorCapability> {
    match value.to_ascii_lowercase().as_str() {
        "truecolor" | "24bit" => Some(ColorCapability::Truecolor),
        "ansi256" | "256" | "8bit" => Some(ColorCapability::Ansi256),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_color_mode_aliases() {
        assert_eq!(parse_color_mode("24bit"), Some(ColorCapability::Truecolor));
        assert_eq!(parse_color_mode("256"), Some(ColorCapability::Ansi256));
        assert_eq!(parse_color_mode("mono"), None);
    }
}

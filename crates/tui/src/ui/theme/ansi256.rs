//! ANSI 256-color fallback theme for terminals without truecolor support.

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

#[derive(Debug, Clone)]
pub struct Ansi256Theme {
    roles: ThemeRoles,
}

impl Ansi256Theme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                background: Color::Indexed(236),
                panel: Color::Indexed(236),
                header: Color::Indexed(239),
                border: Color::Indexed(239),

                text: Color::Indexed(255),
                text_secondary: Color::Indexed(250),
                text_muted: Color::Indexed(247),

                accent: Color::Indexed(110),

                info: Color::Indexed(117),
                success: Color::Indexed(108),
                warning: Color::Indexed(215),
                error: Color::Indexed(167),

                selection_bg: Color::Indexed(240),
                selection_fg: Color::Indexed(255),
                focus: Color::Indexed(110),

                row_even: Color::Indexed(235),
                row_odd: Color::Indexed(237),
            },
        }
    }
}

impl Default for Ansi256Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for Ansi256Theme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

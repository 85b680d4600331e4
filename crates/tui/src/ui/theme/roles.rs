//! Color roles for the wizard and the styles built from them.

use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};

/// Colors a theme assigns to each part of the wizard.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    /// Fills cells no widget paints
    pub background: Color,
    /// Breadcrumb, list, and activity panels
    pub panel: Color,
    /// Table header band
    pub header: Color,
    pub border: Color,
    /// Border of the panel taking keys
    pub focus: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    /// Prompts, the manual-entry row, the throbber and key names in hints
    pub accent: Color,

    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    pub selection_bg: Color,
    pub selection_fg: Color,
    pub row_even: Color,
    pub row_odd: Color,
}

pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_style(&self) -> Style {
        Style::new().fg(self.roles().text)
    }

    fn text_secondary_style(&self) -> Style {
        Style::new().fg(self.roles().text_secondary)
    }

    fn text_muted_style(&self) -> Style {
        Style::new().fg(self.roles().text_muted)
    }

    fn accent_style(&self) -> Style {
        Style::new().fg(self.roles().accent)
    }

    fn accent_bold_style(&self) -> Style {
        self.accent_style().add_modifier(Modifier::BOLD)
    }

    fn border_style(&self, focused: bool) -> Style {
        let roles = self.roles();
        Style::new().fg(if focused { roles.focus } else { roles.border })
    }

    /// Highlighted list row.
    fn selection_style(&self) -> Style {
        let roles = self.roles();
        Style::new().fg(roles.selection_fg).bg(roles.selection_bg)
    }

    // Task outcomes and notices
    fn info_style(&self) -> Style {
        Style::new().fg(self.roles().info)
    }

    fn success_style(&self) -> Style {
        Style::new().fg(self.roles().success)
    }

    fn warning_style(&self) -> Style {
        Style::new().fg(self.roles().warning)
    }

    fn error_style(&self) -> Style {
        Style::new().fg(self.roles().error)
    }
}

//! Header line naming the committed selections.

use pipegate_engine::presentation;
use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;
use crate::ui::components::Component;
use crate::ui::utils::truncate_to_width;

const APP_NAME: &str = "pipegate";
const SEPARATOR: &str = " › ";

#[derive(Debug, Default)]
pub struct BreadcrumbComponent;

impl BreadcrumbComponent {
    /// `label: value › label: value` for everything chosen so far.
    pub fn trail(app: &App) -> String {
        presentation::breadcrumb(&app.wizard)
            .into_iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }
}

impl Component for BreadcrumbComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let budget = usize::from(rect.width).saturating_sub(APP_NAME.len() + 3);
        let trail = Self::trail(app);
        let mut spans = vec![
            Span::styled(APP_NAME, theme.accent_bold_style()),
            Span::styled(" ", theme.text_muted_style()),
        ];
        if trail.is_empty() {
            spans.push(Span::styled(
                format!("· {}", app.wizard.screen().title()),
                theme.text_muted_style(),
            ));
        } else {
            spans.push(Span::styled(
                truncate_to_width(&trail, budget),
                theme.text_secondary_style().add_modifier(Modifier::ITALIC),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(app.ctx.theme.text_style()),
            rect,
        );
    }
}

//! Footer panel listing recent activity, newest at the bottom.

use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::Paragraph,
};

use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers as th;

#[derive(Debug, Default)]
pub struct ActivityComponent;

impl Component for ActivityComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let block = th::block(theme, Some("Activity"), false);
        if app.activity.is_empty() {
            let placeholder = Paragraph::new(Line::styled("Nothing yet.", theme.text_muted_style())).block(block);
            frame.render_widget(placeholder, rect);
            return;
        }
        let visible = usize::from(block.inner(rect).height);
        let skip = app.activity.len().saturating_sub(visible);
        let lines: Vec<Line> = app
            .activity
            .entries()
            .skip(skip)
            .map(|entry| {
                let style = if entry.contains(" ✗ ") {
                    theme.error_style()
                } else if entry.contains(" ✓ ") {
                    theme.success_style()
                } else {
                    theme.text_muted_style()
                };
                Line::styled(entry.to_string(), style)
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), rect);
    }
}

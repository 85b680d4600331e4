//! Free-text screen collecting a decision comment or source revision.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::app::App;
use crate::ui::theme::theme_helpers as th;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &*app.ctx.theme;
    let wizard = &app.wizard;
    let selection = wizard.selection();

    let block = th::block(theme, Some(wizard.screen().title()), true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let areas = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(inner);

    let prompt = Paragraph::new(pipegate_engine::presentation::prompt(wizard))
        .style(theme.text_secondary_style().add_modifier(Modifier::BOLD));
    frame.render_widget(prompt, areas[0]);

    let mut context = Vec::new();
    if let Some(action) = selection.action() {
        context.push(Span::styled(action.label(), theme.accent_bold_style()));
    }
    if let Some(target) = selection.target() {
        context.push(Span::styled(format!("  {}", target.label()), theme.text_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(context)).wrap(Wrap { trim: true }), areas[1]);

    let field = wizard.text_field().unwrap_or("details");
    let input_block = th::block(theme, Some(field), true);
    let input_inner = input_block.inner(areas[2]);
    let text = wizard.input().buffer().map(|buffer| buffer.text()).unwrap_or_default();
    frame.render_widget(
        Paragraph::new(text).style(theme.text_style()).block(input_block),
        areas[2],
    );
    if let Some(buffer) = wizard.input().buffer()
        && input_inner.width > 0
    {
        let column = u16::try_from(buffer.cursor_column()).unwrap_or(u16::MAX);
        let x = input_inner.x.saturating_add(column).min(input_inner.right().saturating_sub(1));
        frame.set_cursor_position((x, input_inner.y));
    }

    let hint = match wizard.validation() {
        Some(error) => Span::styled(error.to_string(), theme.error_style()),
        None => Span::styled(format!("A {field} is required."), theme.text_muted_style()),
    };
    frame.render_widget(Paragraph::new(Line::from(hint)), areas[3]);
}

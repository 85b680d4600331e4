//! Executing and error screens.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::app::App;
use crate::ui::theme::theme_helpers as th;
use crate::ui::utils::centered_rect;

pub fn render_executing(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &*app.ctx.theme;
    let panel = centered_rect(70, 40, area);
    let block = th::block(theme, Some("Working"), true);

    let description = app
        .wizard
        .pending()
        .map(|pending| pending.description.clone())
        .unwrap_or_else(|| "Waiting for the provider".to_string());
    let lines = vec![
        Line::default(),
        Line::from(vec![
            Span::styled(format!("{} ", app.throbber()), theme.accent_style()),
            Span::styled(format!("{description}…"), theme.text_style()),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "Esc stops waiting; the request may still reach the provider.",
            theme.text_muted_style(),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center).wrap(Wrap { trim: true }),
        panel,
    );
}

pub fn render_error(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &*app.ctx.theme;
    let panel = centered_rect(70, 40, area);
    let block = th::block(theme, Some("Error"), false).border_style(theme.error_style());

    let message = app
        .wizard
        .failure()
        .map(|failure| failure.message.as_str())
        .unwrap_or("Unknown error");
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(message.to_string(), theme.error_style().add_modifier(Modifier::BOLD))),
        Line::default(),
        Line::from(Span::styled("Esc to go back", theme.text_muted_style())),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center).wrap(Wrap { trim: true }),
        panel,
    );
}

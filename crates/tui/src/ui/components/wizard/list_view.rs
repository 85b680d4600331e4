//! Table rendering for the list screens.

use pipegate_engine::{MANUAL_ENTRY_LABEL, TextBuffer, presentation};
use ratatui::{
    prelude::*,
    widgets::{Cell, HighlightSpacing, Paragraph, Row, Table, TableState},
};

use crate::app::App;
use crate::ui::theme::theme_helpers as th;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &*app.ctx.theme;
    let wizard = &app.wizard;
    let screen = wizard.screen();

    let block = th::block(theme, Some(screen.title()), !wizard.input().is_manual());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let banner = banner_line(app);
    let buffer = wizard.input().buffer();
    let areas = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(u16::from(banner.is_some())),
        Constraint::Min(1),
        Constraint::Length(if buffer.is_some() { 3 } else { 0 }),
        Constraint::Length(u16::from(wizard.is_busy())),
    ])
    .split(inner);

    let prompt = Paragraph::new(presentation::prompt(wizard))
        .style(theme.text_secondary_style().add_modifier(Modifier::BOLD));
    frame.render_widget(prompt, areas[0]);

    if let Some(line) = banner {
        frame.render_widget(Paragraph::new(line), areas[1]);
    }

    render_table(frame, areas[2], app);

    if let Some(buffer) = buffer {
        render_manual_input(frame, areas[3], app, buffer);
    }

    if let Some(pending) = wizard.pending() {
        let line = Line::from(vec![
            Span::styled(format!("{} ", app.throbber()), theme.accent_style()),
            Span::styled(format!("{}…", pending.description), theme.info_style()),
            Span::styled("  Esc to cancel", theme.text_muted_style()),
        ]);
        frame.render_widget(Paragraph::new(line), areas[4]);
    }
}

fn banner_line(app: &App) -> Option<Line<'static>> {
    let theme = &*app.ctx.theme;
    if let Some(notice) = app.wizard.notice() {
        return Some(Line::from(Span::styled(format!("✓ {notice}"), theme.success_style())));
    }
    presentation::empty_message(&app.wizard)
        .map(|message| Line::from(Span::styled(message, theme.warning_style())))
}

fn render_table(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &*app.ctx.theme;
    let wizard = &app.wizard;
    let columns = presentation::columns(wizard);
    let rows = presentation::rows(wizard);
    if rows.is_empty() {
        return;
    }

    let widths: Vec<Constraint> = columns.iter().map(|column| Constraint::Fill(column.weight)).collect();
    let header = Row::new(columns.iter().map(|column| Cell::from(column.title))).style(th::table_header_row_style(theme));

    let body = rows.into_iter().enumerate().map(|(index, cells)| {
        let style = if cells.first().is_some_and(|cell| cell == MANUAL_ENTRY_LABEL) {
            th::table_row_style(theme, index).patch(theme.accent_style())
        } else {
            th::table_row_style(theme, index)
        };
        Row::new(cells.into_iter().map(Cell::from)).style(style)
    });

    let table = Table::new(body, widths)
        .header(header)
        .column_spacing(2)
        .row_highlight_style(th::table_selected_style(theme))
        .highlight_symbol("› ")
        .highlight_spacing(HighlightSpacing::Always);

    // The highlight follows the cursor only while the list has focus.
    let selected = (!wizard.input().is_manual() && !wizard.is_busy()).then_some(wizard.cursor());
    let mut state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_manual_input(frame: &mut Frame, area: Rect, app: &App, buffer: &TextBuffer) {
    let theme = &*app.ctx.theme;
    let block = th::block(theme, Some("Type a value"), true);
    let inner = block.inner(area);
    let input = Paragraph::new(buffer.text()).style(theme.text_style()).block(block);
    frame.render_widget(input, area);

    if inner.width > 0 {
        let column = u16::try_from(buffer.cursor_column()).unwrap_or(u16::MAX);
        let x = inner.x.saturating_add(column).min(inner.right().saturating_sub(1));
        frame.set_cursor_position((x, inner.y));
    }
}

use crossterm::event::KeyEvent;
use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use super::components::{ActivityComponent, BreadcrumbComponent, Component, WizardComponent};
use crate::app::{App, Effect, Msg};

/// Terminals shorter than this drop the activity panel.
const ACTIVITY_MIN_TERMINAL_HEIGHT: u16 = 20;
const ACTIVITY_PANEL_HEIGHT: u16 = 7;

/// Root view: breadcrumb header, wizard body, activity panel and hints.
#[derive(Debug, Default)]
pub struct MainView {
    pub header_view: BreadcrumbComponent,
    pub content_view: WizardComponent,
    pub activity_view: ActivityComponent,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_preferred_layout(&self, area: Rect) -> [Rect; 4] {
        let activity_height = if area.height >= ACTIVITY_MIN_TERMINAL_HEIGHT {
            ACTIVITY_PANEL_HEIGHT
        } else {
            0
        };
        let areas = Layout::vertical([
            Constraint::Length(1),               // Breadcrumb
            Constraint::Min(3),                  // Wizard body
            Constraint::Length(activity_height), // Activity
            Constraint::Length(1),               // Hints
        ])
        .split(area);
        [areas[0], areas[1], areas[2], areas[3]]
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        app.update(&msg)
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        self.content_view.handle_key_events(app, key)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        // Fill the background so unthemed cells match the palette.
        frame.render_widget(Block::default().style(Style::default().bg(app.ctx.theme.roles().background)), area);

        let [header, body, activity, hints] = self.get_preferred_layout(area);
        self.header_view.render(frame, header, app);
        self.content_view.render(frame, body, app);
        if activity.height > 0 {
            self.activity_view.render(frame, activity, app);
        }

        let hint_spans = self.get_hint_spans(app);
        let hints_widget = Paragraph::new(Line::from(hint_spans)).style(app.ctx.theme.text_muted_style());
        frame.render_widget(hints_widget, hints);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hint_spans: Vec<Span> = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];
        hint_spans.extend(self.content_view.get_hint_spans(app));
        hint_spans
    }
}

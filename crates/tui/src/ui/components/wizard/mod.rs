//! The wizard body: whichever screen the navigation engine is on.

mod keymap;
mod list_view;
mod status_view;
mod text_entry;

use crossterm::event::KeyEvent;
use pipegate_engine::ScreenId;
use ratatui::{Frame, layout::Rect, text::Span};

pub use keymap::{KeyAction, map_key};

use crate::app::{App, Effect, Msg};
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers as th;

#[derive(Debug, Default)]
pub struct WizardComponent;

impl Component for WizardComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match map_key(key, app.wizard.input().is_manual()) {
            Some(KeyAction::Quit) => vec![Effect::Quit],
            Some(KeyAction::Wizard(event)) => app.update(&Msg::Input(event)),
            None => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        match app.wizard.screen() {
            screen if screen.is_list() => list_view::render(frame, rect, app),
            ScreenId::EnterComment => text_entry::render(frame, rect, app),
            ScreenId::Executing => status_view::render_executing(frame, rect, app),
            _ => status_view::render_error(frame, rect, app),
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let theme = &*app.ctx.theme;
        let wizard = &app.wizard;
        if wizard.is_busy() {
            return th::build_hint_spans(theme, &[("Esc", "cancel"), ("Ctrl+C", "quit")]);
        }
        match (wizard.screen(), wizard.input().is_manual()) {
            (ScreenId::Error, _) => th::build_hint_spans(theme, &[("Esc", "back"), ("Ctrl+C", "quit")]),
            (ScreenId::EnterComment, _) => {
                th::build_hint_spans(theme, &[("Enter", "submit"), ("Esc", "back"), ("Ctrl+C", "quit")])
            }
            (_, true) => th::build_hint_spans(
                theme,
                &[("Enter", "submit"), ("Esc", "list"), ("Tab", "list"), ("Ctrl+C", "quit")],
            ),
            (_, false) if wizard.accepts_manual_entry() => th::build_hint_spans(
                theme,
                &[("↑↓", "move"), ("Enter", "select"), ("Tab", "type"), ("Esc", "back"), ("q", "quit")],
            ),
            (_, false) => th::build_hint_spans(
                theme,
                &[("↑↓", "move"), ("Enter", "select"), ("Esc", "back"), ("q", "quit")],
            ),
        }
    }
}

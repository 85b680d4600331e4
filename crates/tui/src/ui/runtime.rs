//! Runtime: event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Drive a single event loop that handles input, task completions and the
//!   busy animation, one message at a time.
//! - Route keys to the main view and execute the returned `Effect`s.
//!
//! Event loop strategy
//! - A dedicated input thread polls `crossterm` and forwards events over a
//!   channel, so terminal reads never block the async runtime.
//! - Background tasks resolve through a `FuturesUnordered`; each completion is
//!   delivered as a `Msg::TaskCompleted` on the same loop as key presses.
//! - Smart ticking: the configured fast interval only while a task is
//!   outstanding, a long idle interval otherwise.

use std::io::Stdout;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use pipegate_api::CloudBackend;
use pipegate_util::AppConfig;
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::app::{App, Effect, Msg, SharedCtx};
use crate::cmd::{self, TaskFuture};
use crate::ui::components::Component;
use crate::ui::main_component::MainView;

type Tui = Terminal<CrosstermBackend<Stdout>>;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(16);
const IDLE_TICK_INTERVAL: Duration = Duration::from_millis(5000);

/// Spawn a dedicated input thread that polls the terminal and forwards
/// `crossterm` events over a Tokio channel. The thread exits once the
/// receiver is dropped.
fn spawn_input_thread() -> Result<mpsc::Receiver<Event>> {
    let (sender, receiver) = mpsc::channel(500);
    thread::Builder::new()
        .name("pipegate-input".into())
        .spawn(move || {
            while !sender.is_closed() {
                match event::poll(INPUT_POLL_INTERVAL) {
                    Ok(true) => match event::read() {
                        Ok(event) => {
                            if sender.blocking_send(event).is_err() {
                                break;
                            }
                        }
                        Err(error) => {
                            warn!("Failed to read event: {}", error);
                            break;
                        }
                    },
                    Ok(false) => {}
                    Err(error) => {
                        warn!("Failed to poll events: {}", error);
                        break;
                    }
                }
            }
        })
        .context("spawn input thread")?;
    Ok(receiver)
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Tui, app: &mut App, main_view: &mut MainView) -> Result<()> {
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn is_ctrl_c(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(key)
            if key.kind != KeyEventKind::Release
                && key.code == KeyCode::Char('c')
                && key.modifiers.contains(KeyModifiers::CONTROL)
    )
}

/// Handle raw crossterm input events and update `App`/components.
fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Deliver a `Resize` when the terminal size differs from the last one seen.
fn detect_resize(
    app: &mut App,
    main_view: &mut MainView,
    last_size: &mut Option<(u16, u16)>,
    size: (u16, u16),
) -> Option<Vec<Effect>> {
    if *last_size == Some(size) {
        return None;
    }
    *last_size = Some(size);
    Some(main_view.handle_message(app, Msg::Resize(size.0, size.1)))
}

fn new_ticker(interval: Duration) -> time::Interval {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event
/// loop, and restores the terminal on every exit path.
pub async fn run_app(backend: Arc<dyn CloudBackend>, config: AppConfig) -> Result<()> {
    let mut input_receiver = spawn_input_thread()?;
    let mut app = App::new(SharedCtx::new(backend, config));
    let mut main_view = MainView::new();

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app, &mut main_view, &mut input_receiver).await;
    let cleanup = cleanup_terminal(&mut terminal);
    result.and(cleanup)
}

async fn event_loop(
    terminal: &mut Tui,
    app: &mut App,
    main_view: &mut MainView,
    input_receiver: &mut mpsc::Receiver<Event>,
) -> Result<()> {
    // Abandoned tasks stay in here until they resolve; the wizard drops
    // their completions by ticket.
    let mut pending: FuturesUnordered<TaskFuture> = FuturesUnordered::new();

    let fast_interval = app.ctx.config.tick_interval();
    let mut current_interval = IDLE_TICK_INTERVAL;
    let mut ticker = new_ticker(current_interval);

    render(terminal, app, main_view)?;

    // Some terminals drop resize notifications; compare sizes each turn.
    let mut last_size: Option<(u16, u16)> = crossterm::terminal::size().ok();

    loop {
        let needs_animation = app.wizard.is_busy();
        let target_interval = if needs_animation { fast_interval } else { IDLE_TICK_INTERVAL };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = new_ticker(current_interval);
        }

        let mut needs_render = false;
        let mut effects: Vec<Effect> = Vec::new();
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    debug!("input channel closed");
                    break;
                };
                if is_ctrl_c(&event) {
                    break;
                }
                effects.extend(handle_input_event(app, main_view, event));
                needs_render = true;
            }

            _ = ticker.tick() => {
                effects.extend(main_view.handle_message(app, Msg::Tick));
                needs_render = needs_animation;
            }

            Some(completion) = pending.next(), if !pending.is_empty() => {
                effects.extend(main_view.handle_message(app, Msg::TaskCompleted(completion)));
                needs_render = true;
            }

            _ = signal::ctrl_c() => { break; }
        }

        if let Ok(size) = crossterm::terminal::size()
            && let Some(resized) = detect_resize(app, main_view, &mut last_size, size)
        {
            effects.extend(resized);
            needs_render = true;
        }

        let batch = cmd::run_from_effects(&app.ctx.backend, effects);
        pending.extend(batch.pending);
        if batch.quit {
            info!(outstanding = pending.len(), "quit requested");
            break;
        }

        if needs_render {
            render(terminal, app, main_view)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pipegate_api::FixtureBackend;

    use super::*;

    #[test]
    fn resize_is_reported_once_per_size_change() {
        let mut app = App::new(SharedCtx::new(Arc::new(FixtureBackend::sample()), AppConfig::default()));
        let mut main_view = MainView::new();
        let mut last_size = Some((80, 24));

        assert!(detect_resize(&mut app, &mut main_view, &mut last_size, (80, 24)).is_none());
        let effects = detect_resize(&mut app, &mut main_view, &mut last_size, (120, 40));
        assert!(effects.is_some_and(|effects| effects.is_empty()));
        assert_eq!(last_size, Some((120, 40)));
        assert!(detect_resize(&mut app, &mut main_view, &mut last_size, (120, 40)).is_none());
    }

    #[test]
    fn only_pressed_control_c_counts_as_interrupt() {
        use crossterm::event::KeyEvent;

        let press = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_ctrl_c(&Event::Key(press)));
        assert!(!is_ctrl_c(&Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE))));
    }
}

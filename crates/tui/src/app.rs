//! Application state and update logic for the pipegate TUI.
//!
//! `App` wraps the pure navigation [`Wizard`] with the runtime-only pieces the
//! terminal needs: the shared backend and theme, the activity panel, and the
//! busy throbber. All state changes go through [`App::update`], which returns
//! the [`Effect`]s the runtime must carry out.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use chrono::Local;
use pipegate_api::CloudBackend;
use pipegate_engine::{LocatorOptions, PreconditionError, StartedTask, TaskCompletion, TaskOutcome, TaskPayload, Transition, Wizard};
use pipegate_types::InputEvent;
use pipegate_util::{AppConfig, redact_sensitive};
use tracing::{debug, info, warn};

use crate::ui::theme::{self, Theme};

pub const THROBBER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Cross-cutting context owned by the App.
pub struct SharedCtx {
    pub backend: Arc<dyn CloudBackend>,
    pub config: AppConfig,
    pub theme: Box<dyn Theme>,
}

impl SharedCtx {
    pub fn new(backend: Arc<dyn CloudBackend>, config: AppConfig) -> Self {
        Self {
            backend,
            config,
            theme: theme::load(),
        }
    }
}

impl fmt::Debug for SharedCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCtx")
            .field("backend", &self.backend)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Messages delivered to [`App::update`].
#[derive(Debug, Clone)]
pub enum Msg {
    Input(InputEvent),
    TaskCompleted(TaskCompletion),
    /// Periodic UI tick (drives the throbber)
    Tick,
    Resize(u16, u16),
}

/// Side effects requested by the update loop.
#[derive(Debug, Clone)]
pub enum Effect {
    RunTask(StartedTask),
    Quit,
}

/// Bounded, timestamped lines shown in the activity panel.
#[derive(Debug)]
pub struct ActivityLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Append a line; secrets are redacted and the oldest line is evicted at capacity.
    pub fn push(&mut self, message: impl AsRef<str>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        let stamp = Local::now().format("%H:%M:%S");
        self.entries.push_back(format!("{stamp} {}", redact_sensitive(message.as_ref())));
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct App {
    pub wizard: Wizard,
    pub ctx: SharedCtx,
    pub activity: ActivityLog,
    /// Animation frame for the busy throbber
    pub throbber_idx: usize,
}

impl App {
    pub fn new(ctx: SharedCtx) -> Self {
        let profiles = ctx.backend.list_locator_options();
        let regions = ctx
            .config
            .regions
            .clone()
            .filter(|regions| !regions.is_empty())
            .unwrap_or_else(|| ctx.backend.fixed_region_list());
        let mut activity = ActivityLog::new(ctx.config.activity_log_capacity());
        if profiles.is_empty() {
            warn!("backend offered no credential profiles");
            activity.push("No credential profiles found; type one with Tab.");
        }
        debug!(profiles = profiles.len(), regions = regions.len(), "wizard initialized");
        Self {
            wizard: Wizard::new(LocatorOptions { profiles, regions }),
            ctx,
            activity,
            throbber_idx: 0,
        }
    }

    pub fn throbber(&self) -> &'static str {
        THROBBER_FRAMES[self.throbber_idx % THROBBER_FRAMES.len()]
    }

    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Input(event) => match self.wizard.handle(*event) {
                Ok(transition) => self.apply(transition),
                Err(error) => self.reject_input(*event, &error),
            },
            Msg::TaskCompleted(completion) => {
                self.record_completion(completion);
                self.wizard = self.wizard.complete(completion.clone());
                if !self.wizard.is_busy() {
                    self.throbber_idx = 0;
                }
                Vec::new()
            }
            Msg::Tick => {
                if self.wizard.is_busy() {
                    self.throbber_idx = (self.throbber_idx + 1) % THROBBER_FRAMES.len();
                }
                Vec::new()
            }
            Msg::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                Vec::new()
            }
        }
    }

    /// The views only emit events the wizard accepts; a rejection is a bug in
    /// the view layer. Release builds log it and keep running.
    fn reject_input(&mut self, event: InputEvent, error: &PreconditionError) -> Vec<Effect> {
        debug_assert!(false, "navigation precondition violated by {event:?}: {error}");
        warn!(error = %error, ?event, "input rejected");
        self.activity.push(format!("Ignored: {error}"));
        Vec::new()
    }

    fn apply(&mut self, transition: Transition) -> Vec<Effect> {
        let Transition { wizard, task } = transition;
        if wizard.screen() != self.wizard.screen() {
            debug!(from = %self.wizard.screen(), to = %wizard.screen(), "screen changed");
        }
        if let Some(abandoned) = self.wizard.pending()
            && !wizard.is_busy()
        {
            info!(ticket = %abandoned.ticket, "task abandoned");
            self.activity.push(format!("Cancelled: {}", abandoned.description));
        }
        self.wizard = wizard;

        match task {
            Some(task) => {
                self.activity.push(format!("{}…", task.request.describe()));
                self.throbber_idx = 0;
                vec![Effect::RunTask(task)]
            }
            None => Vec::new(),
        }
    }

    fn record_completion(&mut self, completion: &TaskCompletion) {
        let current = self.wizard.pending().is_some_and(|pending| pending.ticket == completion.ticket);
        if !current {
            debug!(ticket = %completion.ticket, "ignoring result of abandoned task");
            return;
        }
        match &completion.outcome {
            TaskOutcome::Success(TaskPayload::ActionCompleted { summary }) => {
                info!(ticket = %completion.ticket, "{summary}");
                self.activity.push(format!("✓ {summary}"));
            }
            TaskOutcome::Success(TaskPayload::ApprovalsFetched(items)) => {
                self.activity.push(format!("Found {} pending approval(s)", items.len()));
            }
            TaskOutcome::Success(TaskPayload::StatusFetched(items)) => {
                self.activity.push(format!("Found {} pipeline(s)", items.len()));
            }
            TaskOutcome::Success(TaskPayload::SessionOpened(session)) => {
                self.activity.push(format!("Session ready for {}", session.locator()));
            }
            TaskOutcome::Failure(message) => {
                self.activity.push(format!("✗ {message}"));
            }
            TaskOutcome::Busy => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use pipegate_api::FixtureBackend;
    use pipegate_engine::{ScreenId, TaskRequest};

    use super::*;
    use crate::cmd;

    fn app_with(backend: FixtureBackend, config: AppConfig) -> App {
        App::new(SharedCtx::new(Arc::new(backend), config))
    }

    fn press(app: &mut App, event: InputEvent) -> Vec<Effect> {
        app.update(&Msg::Input(event))
    }

    async fn run_effects(app: &mut App, effects: Vec<Effect>) {
        for effect in effects {
            if let Effect::RunTask(task) = effect {
                let completion = cmd::spawn_task(Arc::clone(&app.ctx.backend), task).await;
                app.update(&Msg::TaskCompleted(completion));
            }
        }
    }

    #[test]
    fn configured_regions_replace_backend_list() {
        let config = AppConfig {
            regions: Some(vec!["eu-north-1".into()]),
            ..AppConfig::default()
        };
        let app = app_with(FixtureBackend::sample(), config);
        assert_eq!(app.wizard.options().regions, vec!["eu-north-1".to_string()]);
        assert_eq!(app.wizard.options().profiles, vec!["default".to_string(), "staging".to_string()]);
    }

    #[test]
    fn activity_log_is_bounded_and_redacted() {
        let mut log = ActivityLog::new(2);
        log.push("first");
        log.push("second token=abc");
        log.push("third");
        assert_eq!(log.len(), 2);
        let lines: Vec<&str> = log.entries().collect();
        assert!(lines[0].ends_with("second token=<redacted>"));
        assert!(lines[1].ends_with("third"));
    }

    #[tokio::test]
    async fn region_confirmation_emits_one_session_task() {
        let mut app = app_with(FixtureBackend::sample(), AppConfig::default());
        // provider, then the first listed profile (row 0 is manual entry)
        assert!(press(&mut app, InputEvent::Confirm).is_empty());
        press(&mut app, InputEvent::NavigateDown);
        assert!(press(&mut app, InputEvent::Confirm).is_empty());
        press(&mut app, InputEvent::NavigateDown);
        let effects = press(&mut app, InputEvent::Confirm);

        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Effect::RunTask(task) => assert!(matches!(task.request, TaskRequest::OpenSession { .. })),
            other => panic!("unexpected effect {other:?}"),
        }
        assert!(app.wizard.is_busy());

        // Keys other than Esc are swallowed while busy.
        assert!(press(&mut app, InputEvent::Confirm).is_empty());

        run_effects(&mut app, effects).await;
        assert_eq!(app.wizard.screen(), ScreenId::ChooseService);
        assert!(!app.wizard.is_busy());
        assert_eq!(app.throbber_idx, 0);
    }

    #[tokio::test]
    async fn stale_completion_leaves_state_untouched() {
        let mut app = app_with(FixtureBackend::sample(), AppConfig::default());
        press(&mut app, InputEvent::Confirm);
        press(&mut app, InputEvent::NavigateDown);
        press(&mut app, InputEvent::Confirm);
        press(&mut app, InputEvent::NavigateDown);
        let effects = press(&mut app, InputEvent::Confirm);
        press(&mut app, InputEvent::Cancel);
        assert!(!app.wizard.is_busy());

        let before = app.wizard.clone();
        let logged = app.activity.len();
        run_effects(&mut app, effects).await;
        assert_eq!(app.wizard, before);
        assert_eq!(app.activity.len(), logged);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "navigation precondition violated")]
    fn rejected_input_fails_loudly_in_debug_builds() {
        let mut app = app_with(FixtureBackend::sample(), AppConfig::default());
        app.reject_input(InputEvent::Confirm, &PreconditionError::Busy);
    }

    #[test]
    fn tick_only_animates_while_busy() {
        let mut app = app_with(FixtureBackend::sample(), AppConfig::default());
        app.update(&Msg::Tick);
        assert_eq!(app.throbber_idx, 0);
    }
}

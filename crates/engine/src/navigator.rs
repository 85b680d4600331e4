//! The wizard state machine.
//!
//! [`Wizard`] is an immutable value: every transition borrows the current
//! state and returns a new one. Transitions that need the cloud collaborator
//! also return a [`StartedTask`]; the wizard then stays busy until a
//! [`TaskCompletion`] with the matching ticket is applied through
//! [`Wizard::complete`].
//!
//! Going back is always possible and never fails. Backing out of a screen
//! drops the value chosen on the screen being returned to, and re-entering a
//! screen places the cursor on (or prefills the input with) the value that
//! was dropped, so advancing again from there is a single keystroke.

use std::sync::Arc;

use pipegate_types::{InputEvent, Locator, ResourceItem};
use tracing::{debug, warn};

use crate::catalog::{Catalog, CategorySpec, OperationKind, OperationSpec, ProviderSpec, ServiceSpec};
use crate::error::{PreconditionError, ValidationError};
use crate::input::{InputMode, TextBuffer};
use crate::presentation::{self, RowPick};
use crate::screen::{LocatorStep, ScreenId};
use crate::selection::{ActionKind, Depth, Fetched, PathEntry, SelectionPath, TargetItem};
use crate::task::{PendingTask, StartedTask, TaskCompletion, TaskOutcome, TaskPayload, TaskRequest, TaskTicket};

/// Values offered on the two locator sub-steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatorOptions {
    pub profiles: Vec<String>,
    pub regions: Vec<String>,
}

/// A value the operator picked or typed.
#[derive(Debug, Clone, PartialEq)]
pub enum Choice {
    Provider(&'static ProviderSpec),
    Profile(String),
    Region(String),
    Service(&'static ServiceSpec),
    Category(&'static CategorySpec),
    Operation(&'static OperationSpec),
    Target(TargetItem),
    Action(ActionKind),
    Text(String),
}

impl Choice {
    fn kind_name(&self) -> &'static str {
        match self {
            Choice::Provider(_) => "provider",
            Choice::Profile(_) => "profile",
            Choice::Region(_) => "region",
            Choice::Service(_) => "service",
            Choice::Category(_) => "category",
            Choice::Operation(_) => "operation",
            Choice::Target(_) => "target",
            Choice::Action(_) => "action",
            Choice::Text(_) => "text",
        }
    }

    /// True when picking this choice would reproduce `entry`.
    pub fn matches(&self, entry: &PathEntry) -> bool {
        match (self, entry) {
            (Choice::Provider(a), PathEntry::Provider(b)) => std::ptr::eq(*a, *b),
            (Choice::Profile(a), PathEntry::Profile(b)) => a == b,
            (Choice::Region(a), PathEntry::Locator { locator, .. }) => *a == locator.region,
            (Choice::Service(a), PathEntry::Service(b)) => std::ptr::eq(*a, *b),
            (Choice::Category(a), PathEntry::Category(b)) => std::ptr::eq(*a, *b),
            (Choice::Operation(a), PathEntry::Operation { operation, .. }) => std::ptr::eq(*a, *operation),
            (Choice::Target(a), PathEntry::Target(b)) => a.same_record(b),
            (Choice::Action(a), PathEntry::Action(b)) => a == b,
            (Choice::Text(a), PathEntry::Text(b)) => a == b,
            _ => false,
        }
    }
}

/// What went wrong, and where the operator goes back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub origin: ScreenId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wizard {
    screen: ScreenId,
    selection: SelectionPath,
    input: InputMode,
    cursor: usize,
    options: Arc<LocatorOptions>,
    pending: Option<PendingTask>,
    failure: Option<Failure>,
    notice: Option<String>,
    validation: Option<ValidationError>,
    next_ticket: u64,
}

/// Result of a forward transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub wizard: Wizard,
    /// Work the runtime must start; the wizard is busy until it completes.
    pub task: Option<StartedTask>,
}

impl Transition {
    pub fn stay(wizard: Wizard) -> Self {
        Self { wizard, task: None }
    }
}

/// Blank values are refused; anything else is kept exactly as typed.
fn non_empty(value: String, field: &'static str) -> Result<String, PreconditionError> {
    if value.trim().is_empty() {
        return Err(PreconditionError::EmptyValue { field });
    }
    Ok(value)
}

impl Wizard {
    pub fn new(options: LocatorOptions) -> Self {
        Self {
            screen: ScreenId::INITIAL,
            selection: SelectionPath::new(),
            input: InputMode::Select,
            cursor: 0,
            options: Arc::new(options),
            pending: None,
            failure: None,
            notice: None,
            validation: None,
            next_ticket: 1,
        }
    }

    pub fn screen(&self) -> ScreenId {
        self.screen
    }

    pub fn selection(&self) -> &SelectionPath {
        &self.selection
    }

    pub fn input(&self) -> &InputMode {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn options(&self) -> &LocatorOptions {
        &self.options
    }

    pub fn pending(&self) -> Option<&PendingTask> {
        self.pending.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// Summary of the last completed action, shown once on the operation screen.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn validation(&self) -> Option<ValidationError> {
        self.validation
    }

    pub fn locator_step(&self) -> LocatorStep {
        if self.selection.profile().is_some() {
            LocatorStep::Region
        } else {
            LocatorStep::Profile
        }
    }

    /// Depth of the value chosen on the current screen.
    pub fn current_depth(&self) -> Option<Depth> {
        match self.screen {
            ScreenId::ChooseProvider => Some(Depth::Provider),
            ScreenId::ChooseLocator => Some(match self.locator_step() {
                LocatorStep::Profile => Depth::Profile,
                LocatorStep::Region => Depth::Locator,
            }),
            ScreenId::ChooseService => Some(Depth::Service),
            ScreenId::ChooseCategory => Some(Depth::Category),
            ScreenId::ChooseOperation => Some(Depth::Operation),
            ScreenId::ChooseTarget => Some(Depth::Target),
            ScreenId::ConfirmAction => Some(Depth::Action),
            ScreenId::EnterComment => Some(Depth::Text),
            ScreenId::Executing | ScreenId::Error => None,
        }
    }

    /// Whether the current list screen offers a manual-entry row.
    pub fn accepts_manual_entry(&self) -> bool {
        match self.screen {
            ScreenId::ChooseLocator => true,
            ScreenId::ChooseTarget => self
                .selection
                .operation()
                .is_some_and(|operation| operation.kind == OperationKind::StartPipeline),
            _ => false,
        }
    }

    /// Name of the value collected on the text entry screen.
    pub fn text_field(&self) -> Option<&'static str> {
        self.selection.action().and_then(ActionKind::text_field)
    }

    /// Commit `choice` at the current depth and move forward.
    pub fn advance(&self, choice: Choice) -> Result<Transition, PreconditionError> {
        if self.pending.is_some() {
            return Err(PreconditionError::Busy);
        }
        let Some(depth) = self.current_depth() else {
            return Err(PreconditionError::NotConfirmable { screen: self.screen });
        };

        let mut next = self.clone();
        next.notice = None;
        next.validation = None;

        match (depth, choice) {
            (Depth::Provider, Choice::Provider(provider)) => {
                if !Catalog::global().offers(provider) {
                    return Err(self.not_offered(provider.label));
                }
                next.selection.set_provider(provider)?;
                next.enter(ScreenId::ChooseLocator);
                Ok(Transition::stay(next))
            }
            (Depth::Profile, Choice::Profile(profile)) => {
                next.selection.set_profile(non_empty(profile, "profile")?)?;
                next.enter(ScreenId::ChooseLocator);
                Ok(Transition::stay(next))
            }
            (Depth::Locator, Choice::Region(region)) => {
                let region = non_empty(region, "region")?;
                let profile = self.selection.profile().ok_or(PreconditionError::MissingParent {
                    depth: Depth::Locator,
                    missing: Depth::Profile,
                })?;
                let locator = Locator::new(profile, region);
                next.selection.set_locator(locator.clone())?;
                Ok(next.start_task(TaskRequest::OpenSession { locator }, ScreenId::ChooseLocator))
            }
            (Depth::Service, Choice::Service(service)) => {
                let provider = self.selection.provider().ok_or(PreconditionError::MissingParent {
                    depth: Depth::Service,
                    missing: Depth::Provider,
                })?;
                if !provider.offers(service) {
                    return Err(self.not_offered(service.label));
                }
                next.selection.set_service(service)?;
                next.enter(ScreenId::ChooseCategory);
                Ok(Transition::stay(next))
            }
            (Depth::Category, Choice::Category(category)) => {
                let service = self.selection.service().ok_or(PreconditionError::MissingParent {
                    depth: Depth::Category,
                    missing: Depth::Service,
                })?;
                if !service.offers(category) {
                    return Err(self.not_offered(category.label));
                }
                next.selection.set_category(category)?;
                next.enter(ScreenId::ChooseOperation);
                Ok(Transition::stay(next))
            }
            (Depth::Operation, Choice::Operation(operation)) => {
                let category = self.selection.category().ok_or(PreconditionError::MissingParent {
                    depth: Depth::Operation,
                    missing: Depth::Category,
                })?;
                if !category.offers(operation) {
                    return Err(self.not_offered(operation.label));
                }
                let session = self.selection.session().cloned().ok_or(PreconditionError::MissingParent {
                    depth: Depth::Operation,
                    missing: Depth::Locator,
                })?;
                next.selection.set_operation(operation)?;
                let request = match operation.kind {
                    OperationKind::ManualApproval => TaskRequest::ListPendingApprovals { session },
                    OperationKind::StartPipeline => TaskRequest::ListResourceStatus { session },
                };
                Ok(next.start_task(request, ScreenId::ChooseOperation))
            }
            (Depth::Target, Choice::Target(target)) => {
                let fetched = self.selection.fetched().ok_or(PreconditionError::MissingParent {
                    depth: Depth::Target,
                    missing: Depth::Operation,
                })?;
                let offered = match &target {
                    TargetItem::Approval(item) => fetched.contains_approval(item),
                    TargetItem::Pipeline(_) => matches!(fetched, Fetched::Pipelines(_)),
                };
                if !offered {
                    return Err(self.not_offered(&target.label()));
                }
                next.selection.set_target(target)?;
                next.enter(ScreenId::ConfirmAction);
                Ok(Transition::stay(next))
            }
            (Depth::Action, Choice::Action(action)) => {
                let operation = self.selection.operation().ok_or(PreconditionError::MissingParent {
                    depth: Depth::Action,
                    missing: Depth::Operation,
                })?;
                if !ActionKind::for_operation(operation.kind).contains(&action) {
                    return Err(self.not_offered(action.label()));
                }
                next.selection.set_action(action)?;
                if action.text_field().is_some() {
                    next.enter(ScreenId::EnterComment);
                    Ok(Transition::stay(next))
                } else {
                    next.launch(ScreenId::ConfirmAction)
                }
            }
            (Depth::Text, Choice::Text(text)) => {
                let field = self.text_field().unwrap_or("details");
                next.selection.set_text(non_empty(text, field)?)?;
                next.launch(ScreenId::EnterComment)
            }
            (_, choice) => Err(PreconditionError::WrongChoice {
                screen: self.screen,
                choice: choice.kind_name(),
            }),
        }
    }

    /// Step back one screen. Total: at the initial screen this returns the
    /// state unchanged.
    ///
    /// While a task is outstanding its ticket is abandoned and the value that
    /// started it is dropped; a later completion for that ticket is ignored.
    pub fn retreat(&self) -> Wizard {
        let mut next = self.clone();
        next.notice = None;
        next.validation = None;

        if let Some(pending) = next.pending.take() {
            debug!(ticket = %pending.ticket, origin = %pending.origin, "abandoning task");
            if self.screen == ScreenId::Executing {
                let removed = next.selection.clear_from(launch_depth(pending.origin));
                next.enter_with(pending.origin, removed);
            } else if let Some(depth) = self.current_depth() {
                let removed = next.selection.clear_from(depth);
                next.enter_with(self.screen, removed);
            }
            return next;
        }

        match self.screen {
            ScreenId::Error => {
                if let Some(failure) = next.failure.take() {
                    next.enter(failure.origin);
                }
                next
            }
            _ => {
                let Some(parent) = self.current_depth().and_then(Depth::parent) else {
                    return self.clone();
                };
                let removed = next.selection.clear_from(parent);
                next.enter_with(parent.screen(), removed);
                next
            }
        }
    }

    /// Apply a task result. Results for any ticket other than the outstanding
    /// one are discarded without effect.
    pub fn complete(&self, completion: TaskCompletion) -> Wizard {
        let TaskCompletion { ticket, outcome } = completion;
        let Some(origin) = self
            .pending
            .as_ref()
            .filter(|pending| pending.ticket == ticket)
            .map(|pending| pending.origin)
        else {
            debug!(ticket = %ticket, "discarding stale task completion");
            return self.clone();
        };

        let mut next = self.clone();
        match outcome {
            TaskOutcome::Busy => {}
            TaskOutcome::Failure(message) => {
                next.pending = None;
                warn!(ticket = %ticket, origin = %origin, error = %message, "task failed");
                next.fail(message, origin);
            }
            TaskOutcome::Success(payload) => {
                next.pending = None;
                if let Err(error) = next.apply(payload) {
                    warn!(ticket = %ticket, error = %error, "task result did not fit the selection");
                    next.fail(error.to_string(), origin);
                }
            }
        }
        next
    }

    /// Map a normalized input event onto a transition.
    ///
    /// While busy, or on the error screen, everything except `Cancel` is
    /// ignored. In manual mode `Cancel` first leaves manual mode.
    pub fn handle(&self, event: InputEvent) -> Result<Transition, PreconditionError> {
        if self.pending.is_some() || self.screen == ScreenId::Error {
            let next = match event {
                InputEvent::Cancel => self.retreat(),
                _ => self.clone(),
            };
            return Ok(Transition::stay(next));
        }

        let manual = self.input.is_manual();
        match event {
            InputEvent::Cancel if manual && self.screen != ScreenId::EnterComment => {
                Ok(Transition::stay(self.with_input(InputMode::Select)))
            }
            InputEvent::Cancel => Ok(Transition::stay(self.retreat())),
            InputEvent::ToggleMode => Ok(Transition::stay(self.toggle_mode())),
            InputEvent::Confirm => match self.input.buffer() {
                Some(buffer) => self.submit(buffer.text()),
                None => self.confirm_row(),
            },
            InputEvent::Character(_) | InputEvent::Backspace | InputEvent::CursorLeft | InputEvent::CursorRight
                if manual =>
            {
                Ok(Transition::stay(self.edit(event)))
            }
            InputEvent::NavigateUp if !manual => Ok(Transition::stay(self.move_cursor(-1))),
            InputEvent::NavigateDown if !manual => Ok(Transition::stay(self.move_cursor(1))),
            _ => Ok(Transition::stay(self.clone())),
        }
    }

    /// Switch between list selection and manual entry. A no-op on screens
    /// without a manual-entry row.
    pub fn toggle_mode(&self) -> Wizard {
        if self.pending.is_some() || !self.accepts_manual_entry() {
            return self.clone();
        }
        self.with_input(self.input.toggled())
    }

    /// Commit typed text on the current screen.
    ///
    /// An empty submission on a list screen only leaves manual mode; on the
    /// text entry screen it is rejected with a validation hint.
    pub fn submit(&self, text: &str) -> Result<Transition, PreconditionError> {
        if self.pending.is_some() {
            return Err(PreconditionError::Busy);
        }
        if self.screen == ScreenId::EnterComment {
            if text.trim().is_empty() {
                let mut next = self.clone();
                next.validation = Some(ValidationError::RequiredField {
                    field: self.text_field().unwrap_or("details"),
                });
                return Ok(Transition::stay(next));
            }
            return self.advance(Choice::Text(text.to_string()));
        }
        if !self.accepts_manual_entry() {
            return Err(PreconditionError::WrongChoice {
                screen: self.screen,
                choice: "typed",
            });
        }

        let value = text.trim();
        if value.is_empty() {
            return Ok(Transition::stay(self.with_input(InputMode::Select)));
        }
        let choice = match (self.screen, self.locator_step()) {
            (ScreenId::ChooseLocator, LocatorStep::Profile) => Choice::Profile(value.to_string()),
            (ScreenId::ChooseLocator, LocatorStep::Region) => Choice::Region(value.to_string()),
            _ => {
                let item = self
                    .selection
                    .fetched()
                    .and_then(|fetched| fetched.find_pipeline(value))
                    .cloned()
                    .unwrap_or_else(|| ResourceItem::named(value));
                Choice::Target(TargetItem::Pipeline(item))
            }
        };
        self.advance(choice)
    }

    fn confirm_row(&self) -> Result<Transition, PreconditionError> {
        match presentation::pick_row(self, self.cursor) {
            Some(RowPick::ManualEntry) => Ok(Transition::stay(self.toggle_mode())),
            Some(RowPick::Choice(choice)) => self.advance(choice),
            None => Ok(Transition::stay(self.clone())),
        }
    }

    fn move_cursor(&self, delta: isize) -> Wizard {
        let mut next = self.clone();
        let last = presentation::row_count(self).saturating_sub(1);
        next.cursor = self.cursor.saturating_add_signed(delta).min(last);
        next
    }

    fn edit(&self, event: InputEvent) -> Wizard {
        let mut next = self.clone();
        next.validation = None;
        if let Some(buffer) = next.input.buffer_mut() {
            match event {
                InputEvent::Character(c) => buffer.insert_char(c),
                InputEvent::Backspace => buffer.backspace(),
                InputEvent::CursorLeft => buffer.move_left(),
                InputEvent::CursorRight => buffer.move_right(),
                _ => {}
            }
        }
        next
    }

    fn with_input(&self, input: InputMode) -> Wizard {
        let mut next = self.clone();
        next.input = input;
        next.validation = None;
        next
    }

    fn not_offered(&self, choice: &str) -> PreconditionError {
        PreconditionError::NotOffered {
            screen: self.screen,
            choice: choice.to_string(),
        }
    }

    fn start_task(mut self, request: TaskRequest, origin: ScreenId) -> Transition {
        let ticket = TaskTicket(self.next_ticket);
        self.next_ticket += 1;
        let description = request.describe();
        debug!(ticket = %ticket, origin = %origin, "{description}");
        self.pending = Some(PendingTask {
            ticket,
            origin,
            description,
        });
        self.input = InputMode::Select;
        Transition {
            wizard: self,
            task: Some(StartedTask { ticket, request }),
        }
    }

    fn launch(mut self, origin: ScreenId) -> Result<Transition, PreconditionError> {
        let request = self.execution_request()?;
        self.screen = ScreenId::Executing;
        self.cursor = 0;
        Ok(self.start_task(request, origin))
    }

    fn execution_request(&self) -> Result<TaskRequest, PreconditionError> {
        let session = self.selection.session().cloned().ok_or(PreconditionError::MissingParent {
            depth: Depth::Action,
            missing: Depth::Locator,
        })?;
        let target = self.selection.target().ok_or(PreconditionError::MissingParent {
            depth: Depth::Action,
            missing: Depth::Target,
        })?;
        let action = self.selection.action().ok_or(PreconditionError::MissingParent {
            depth: Depth::Text,
            missing: Depth::Action,
        })?;

        match (target, action) {
            (TargetItem::Approval(item), ActionKind::Approve | ActionKind::Reject) => {
                let comment = self.selection.text().ok_or(PreconditionError::EmptyValue { field: "comment" })?;
                Ok(TaskRequest::DecideApproval {
                    session,
                    item: item.clone(),
                    approved: action == ActionKind::Approve,
                    comment: comment.to_string(),
                })
            }
            (TargetItem::Pipeline(item), ActionKind::Start) => Ok(TaskRequest::TriggerResource {
                session,
                resource_name: item.name.clone(),
                revision: None,
            }),
            (TargetItem::Pipeline(item), ActionKind::StartAtRevision) => {
                let revision = self.selection.text().ok_or(PreconditionError::EmptyValue { field: "revision" })?;
                Ok(TaskRequest::TriggerResource {
                    session,
                    resource_name: item.name.clone(),
                    revision: Some(revision.to_string()),
                })
            }
            (_, action) => Err(self.not_offered(action.label())),
        }
    }

    fn apply(&mut self, payload: TaskPayload) -> Result<(), PreconditionError> {
        match payload {
            TaskPayload::SessionOpened(session) => {
                self.selection.attach_session(session)?;
                self.enter(ScreenId::ChooseService);
            }
            TaskPayload::ApprovalsFetched(items) => {
                self.selection.attach_fetched(Fetched::Approvals(items.into()))?;
                self.enter(ScreenId::ChooseTarget);
            }
            TaskPayload::StatusFetched(items) => {
                self.selection.attach_fetched(Fetched::Pipelines(items.into()))?;
                self.enter(ScreenId::ChooseTarget);
            }
            TaskPayload::ActionCompleted { summary } => {
                self.selection.clear_from(Depth::Target);
                self.selection.clear_fetched();
                self.enter(ScreenId::ChooseOperation);
                self.notice = Some(summary);
            }
        }
        Ok(())
    }

    fn fail(&mut self, message: String, origin: ScreenId) {
        self.screen = ScreenId::Error;
        self.cursor = 0;
        self.input = InputMode::Select;
        self.notice = None;
        self.validation = None;
        self.failure = Some(Failure { message, origin });
    }

    /// Show `screen` fresh, then point at whatever value the path still
    /// holds for it.
    fn enter(&mut self, screen: ScreenId) {
        self.screen = screen;
        self.cursor = 0;
        self.input = if screen == ScreenId::EnterComment {
            InputMode::Manual(TextBuffer::new())
        } else {
            InputMode::Select
        };
        let kept = self.current_depth().and_then(|depth| self.selection.get(depth)).cloned();
        if let Some(entry) = kept {
            self.recall(&entry);
        }
    }

    fn enter_with(&mut self, screen: ScreenId, removed: Vec<PathEntry>) {
        self.enter(screen);
        if let Some(entry) = removed.first() {
            self.recall(entry);
        }
    }

    fn recall(&mut self, entry: &PathEntry) {
        let offset = presentation::manual_offset(self);
        if let Some(position) = presentation::choices(self).iter().position(|choice| choice.matches(entry)) {
            self.cursor = position + offset;
            return;
        }
        let typeable = self.accepts_manual_entry() || self.screen == ScreenId::EnterComment;
        if let Some(value) = entry.typed_value()
            && typeable
        {
            self.input = InputMode::Manual(TextBuffer::with_text(value));
        }
    }
}

/// Depth of the value committed on the screen that launched an execution.
fn launch_depth(origin: ScreenId) -> Depth {
    match origin {
        ScreenId::EnterComment => Depth::Text,
        _ => Depth::Action,
    }
}

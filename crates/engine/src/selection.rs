//! The ordered selection path.
//!
//! A [`SelectionPath`] is a stack of [`PathEntry`] values, one per depth of
//! the hierarchy. Setting a value at a depth always drops everything deeper,
//! so a path can never carry a target that belongs to a different account or
//! an action that belongs to a different operation.

use std::fmt;
use std::sync::Arc;

use pipegate_api::SessionHandle;
use pipegate_types::{ApprovalItem, Locator, ResourceItem};

use crate::catalog::{CategorySpec, OperationKind, OperationSpec, ProviderSpec, ServiceSpec};
use crate::error::PreconditionError;
use crate::screen::ScreenId;

/// Position of an entry in the selection path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Depth {
    Provider,
    Profile,
    Locator,
    Service,
    Category,
    Operation,
    Target,
    Action,
    Text,
}

impl Depth {
    pub const ALL: [Depth; 9] = [
        Depth::Provider,
        Depth::Profile,
        Depth::Locator,
        Depth::Service,
        Depth::Category,
        Depth::Operation,
        Depth::Target,
        Depth::Action,
        Depth::Text,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Depth> {
        Self::ALL.get(index).copied()
    }

    pub fn parent(self) -> Option<Depth> {
        self.index().checked_sub(1).and_then(Depth::from_index)
    }

    /// Screen on which the entry at this depth is chosen.
    pub fn screen(self) -> ScreenId {
        match self {
            Depth::Provider => ScreenId::ChooseProvider,
            Depth::Profile | Depth::Locator => ScreenId::ChooseLocator,
            Depth::Service => ScreenId::ChooseService,
            Depth::Category => ScreenId::ChooseCategory,
            Depth::Operation => ScreenId::ChooseOperation,
            Depth::Target => ScreenId::ChooseTarget,
            Depth::Action => ScreenId::ConfirmAction,
            Depth::Text => ScreenId::EnterComment,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Depth::Provider => "provider",
            Depth::Profile => "profile",
            Depth::Locator => "region",
            Depth::Service => "service",
            Depth::Category => "category",
            Depth::Operation => "operation",
            Depth::Target => "target",
            Depth::Action => "action",
            Depth::Text => "details",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Remote records fetched for the chosen operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Approvals(Arc<[ApprovalItem]>),
    Pipelines(Arc<[ResourceItem]>),
}

impl Fetched {
    pub fn len(&self) -> usize {
        match self {
            Fetched::Approvals(items) => items.len(),
            Fetched::Pipelines(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find_pipeline(&self, name: &str) -> Option<&ResourceItem> {
        match self {
            Fetched::Pipelines(items) => items.iter().find(|item| item.name == name),
            Fetched::Approvals(_) => None,
        }
    }

    pub fn contains_approval(&self, item: &ApprovalItem) -> bool {
        match self {
            Fetched::Approvals(items) => items.iter().any(|candidate| candidate.token == item.token),
            Fetched::Pipelines(_) => false,
        }
    }
}

/// The record an action is applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetItem {
    Approval(ApprovalItem),
    Pipeline(ResourceItem),
}

impl TargetItem {
    pub fn label(&self) -> String {
        match self {
            TargetItem::Approval(item) => item.label(),
            TargetItem::Pipeline(item) => item.name.clone(),
        }
    }

    /// Same underlying record, ignoring any status snapshot.
    pub fn same_record(&self, other: &TargetItem) -> bool {
        match (self, other) {
            (TargetItem::Approval(a), TargetItem::Approval(b)) => a.token == b.token,
            (TargetItem::Pipeline(a), TargetItem::Pipeline(b)) => a.name == b.name,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Approve,
    Reject,
    Start,
    StartAtRevision,
}

const APPROVAL_ACTIONS: &[ActionKind] = &[ActionKind::Approve, ActionKind::Reject];
const PIPELINE_ACTIONS: &[ActionKind] = &[ActionKind::Start, ActionKind::StartAtRevision];

impl ActionKind {
    /// Actions offered for targets of the given operation, in display order.
    pub fn for_operation(kind: OperationKind) -> &'static [ActionKind] {
        match kind {
            OperationKind::ManualApproval => APPROVAL_ACTIONS,
            OperationKind::StartPipeline => PIPELINE_ACTIONS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Approve => "Approve",
            ActionKind::Reject => "Reject",
            ActionKind::Start => "Start",
            ActionKind::StartAtRevision => "Start at revision",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ActionKind::Approve => "Let the pipeline continue past this action",
            ActionKind::Reject => "Stop the pipeline at this action",
            ActionKind::Start => "Run the pipeline from its latest source revision",
            ActionKind::StartAtRevision => "Run the pipeline pinned to a source revision",
        }
    }

    /// Name of the free-text value this action collects, if any.
    pub fn text_field(self) -> Option<&'static str> {
        match self {
            ActionKind::Approve | ActionKind::Reject => Some("comment"),
            ActionKind::StartAtRevision => Some("revision"),
            ActionKind::Start => None,
        }
    }
}

/// One value in the selection path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathEntry {
    Provider(&'static ProviderSpec),
    Profile(String),
    /// Profile plus region; carries the session once it has been opened.
    Locator {
        locator: Locator,
        session: Option<SessionHandle>,
    },
    Service(&'static ServiceSpec),
    Category(&'static CategorySpec),
    /// Carries the records fetched for this operation once they arrive.
    Operation {
        operation: &'static OperationSpec,
        fetched: Option<Fetched>,
    },
    Target(TargetItem),
    Action(ActionKind),
    Text(String),
}

impl PathEntry {
    pub fn depth(&self) -> Depth {
        match self {
            PathEntry::Provider(_) => Depth::Provider,
            PathEntry::Profile(_) => Depth::Profile,
            PathEntry::Locator { .. } => Depth::Locator,
            PathEntry::Service(_) => Depth::Service,
            PathEntry::Category(_) => Depth::Category,
            PathEntry::Operation { .. } => Depth::Operation,
            PathEntry::Target(_) => Depth::Target,
            PathEntry::Action(_) => Depth::Action,
            PathEntry::Text(_) => Depth::Text,
        }
    }

    /// Short value shown in the breadcrumb.
    pub fn display_value(&self) -> String {
        match self {
            PathEntry::Provider(provider) => provider.label.to_string(),
            PathEntry::Profile(profile) => profile.clone(),
            PathEntry::Locator { locator, .. } => locator.region.clone(),
            PathEntry::Service(service) => service.label.to_string(),
            PathEntry::Category(category) => category.label.to_string(),
            PathEntry::Operation { operation, .. } => operation.label.to_string(),
            PathEntry::Target(target) => target.label(),
            PathEntry::Action(action) => action.label().to_string(),
            PathEntry::Text(text) => text.clone(),
        }
    }

    /// The value as the operator would type it, for entries that can be typed.
    pub fn typed_value(&self) -> Option<&str> {
        match self {
            PathEntry::Profile(profile) => Some(profile.as_str()),
            PathEntry::Locator { locator, .. } => Some(locator.region.as_str()),
            PathEntry::Target(TargetItem::Pipeline(item)) => Some(item.name.as_str()),
            PathEntry::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

/// Stack of selections, deepest last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionPath {
    entries: Vec<PathEntry>,
}

impl SelectionPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    pub fn get(&self, depth: Depth) -> Option<&PathEntry> {
        self.entries.get(depth.index())
    }

    /// Place `entry` at its depth, dropping the previous value there and
    /// everything deeper. The parent depth must already be populated.
    pub fn set(&mut self, entry: PathEntry) -> Result<(), PreconditionError> {
        let depth = entry.depth();
        if self.entries.len() < depth.index() {
            let missing = Depth::from_index(self.entries.len()).unwrap_or(depth);
            return Err(PreconditionError::MissingParent { depth, missing });
        }
        self.entries.truncate(depth.index());
        self.entries.push(entry);
        Ok(())
    }

    /// Keep the first `len` entries; return the removed ones, shallowest first.
    pub fn truncate(&mut self, len: usize) -> Vec<PathEntry> {
        if len >= self.entries.len() {
            return Vec::new();
        }
        self.entries.split_off(len)
    }

    /// Drop the entry at `depth` and everything below it.
    pub fn clear_from(&mut self, depth: Depth) -> Vec<PathEntry> {
        self.truncate(depth.index())
    }

    pub fn set_provider(&mut self, provider: &'static ProviderSpec) -> Result<(), PreconditionError> {
        self.set(PathEntry::Provider(provider))
    }

    pub fn set_profile(&mut self, profile: impl Into<String>) -> Result<(), PreconditionError> {
        self.set(PathEntry::Profile(profile.into()))
    }

    pub fn set_locator(&mut self, locator: Locator) -> Result<(), PreconditionError> {
        self.set(PathEntry::Locator { locator, session: None })
    }

    pub fn set_service(&mut self, service: &'static ServiceSpec) -> Result<(), PreconditionError> {
        self.set(PathEntry::Service(service))
    }

    pub fn set_category(&mut self, category: &'static CategorySpec) -> Result<(), PreconditionError> {
        self.set(PathEntry::Category(category))
    }

    pub fn set_operation(&mut self, operation: &'static OperationSpec) -> Result<(), PreconditionError> {
        self.set(PathEntry::Operation { operation, fetched: None })
    }

    pub fn set_target(&mut self, target: TargetItem) -> Result<(), PreconditionError> {
        self.set(PathEntry::Target(target))
    }

    pub fn set_action(&mut self, action: ActionKind) -> Result<(), PreconditionError> {
        self.set(PathEntry::Action(action))
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), PreconditionError> {
        self.set(PathEntry::Text(text.into()))
    }

    /// Bind an opened session to the locator entry.
    pub fn attach_session(&mut self, handle: SessionHandle) -> Result<(), PreconditionError> {
        match self.entries.get_mut(Depth::Locator.index()) {
            Some(PathEntry::Locator { session, .. }) => {
                *session = Some(handle);
                Ok(())
            }
            _ => Err(PreconditionError::MissingParent {
                depth: Depth::Service,
                missing: Depth::Locator,
            }),
        }
    }

    /// Store fetched records on the operation entry.
    pub fn attach_fetched(&mut self, records: Fetched) -> Result<(), PreconditionError> {
        match self.entries.get_mut(Depth::Operation.index()) {
            Some(PathEntry::Operation { fetched, .. }) => {
                *fetched = Some(records);
                Ok(())
            }
            _ => Err(PreconditionError::MissingParent {
                depth: Depth::Target,
                missing: Depth::Operation,
            }),
        }
    }

    pub fn clear_fetched(&mut self) {
        if let Some(PathEntry::Operation { fetched, .. }) = self.entries.get_mut(Depth::Operation.index()) {
            *fetched = None;
        }
    }

    pub fn provider(&self) -> Option<&'static ProviderSpec> {
        match self.get(Depth::Provider) {
            Some(PathEntry::Provider(provider)) => Some(*provider),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<&str> {
        match self.get(Depth::Profile) {
            Some(PathEntry::Profile(profile)) => Some(profile.as_str()),
            _ => None,
        }
    }

    pub fn locator(&self) -> Option<&Locator> {
        match self.get(Depth::Locator) {
            Some(PathEntry::Locator { locator, .. }) => Some(locator),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&SessionHandle> {
        match self.get(Depth::Locator) {
            Some(PathEntry::Locator { session, .. }) => session.as_ref(),
            _ => None,
        }
    }

    pub fn service(&self) -> Option<&'static ServiceSpec> {
        match self.get(Depth::Service) {
            Some(PathEntry::Service(service)) => Some(*service),
            _ => None,
        }
    }

    pub fn category(&self) -> Option<&'static CategorySpec> {
        match self.get(Depth::Category) {
            Some(PathEntry::Category(category)) => Some(*category),
            _ => None,
        }
    }

    pub fn operation(&self) -> Option<&'static OperationSpec> {
        match self.get(Depth::Operation) {
            Some(PathEntry::Operation { operation, .. }) => Some(*operation),
            _ => None,
        }
    }

    pub fn fetched(&self) -> Option<&Fetched> {
        match self.get(Depth::Operation) {
            Some(PathEntry::Operation { fetched, .. }) => fetched.as_ref(),
            _ => None,
        }
    }

    pub fn target(&self) -> Option<&TargetItem> {
        match self.get(Depth::Target) {
            Some(PathEntry::Target(target)) => Some(target),
            _ => None,
        }
    }

    pub fn action(&self) -> Option<ActionKind> {
        match self.get(Depth::Action) {
            Some(PathEntry::Action(action)) => Some(*action),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self.get(Depth::Text) {
            Some(PathEntry::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }
}

//! Background task vocabulary.
//!
//! The engine never performs I/O. When a transition needs the cloud
//! collaborator it hands back a [`StartedTask`] describing the call; the
//! runtime performs it and reports a [`TaskCompletion`] carrying the same
//! ticket. At most one ticket is outstanding at a time.

use std::fmt;

use pipegate_api::SessionHandle;
use pipegate_types::{ApprovalItem, Locator, ResourceItem};

use crate::screen::ScreenId;

/// Identity of one started task. Completions carrying any other ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskTicket(pub u64);

impl fmt::Display for TaskTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A collaborator call the runtime must perform.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskRequest {
    OpenSession {
        locator: Locator,
    },
    ListPendingApprovals {
        session: SessionHandle,
    },
    ListResourceStatus {
        session: SessionHandle,
    },
    DecideApproval {
        session: SessionHandle,
        item: ApprovalItem,
        approved: bool,
        comment: String,
    },
    TriggerResource {
        session: SessionHandle,
        resource_name: String,
        revision: Option<String>,
    },
}

impl TaskRequest {
    /// One-line description for the busy indicator and the activity log.
    pub fn describe(&self) -> String {
        match self {
            TaskRequest::OpenSession { locator } => format!("Opening session for {locator}"),
            TaskRequest::ListPendingApprovals { session } => {
                format!("Loading pending approvals in {}", session.locator())
            }
            TaskRequest::ListResourceStatus { session } => {
                format!("Loading pipelines in {}", session.locator())
            }
            TaskRequest::DecideApproval { item, approved, .. } => {
                let verb = if *approved { "Approving" } else { "Rejecting" };
                format!("{verb} {}", item.label())
            }
            TaskRequest::TriggerResource {
                resource_name, revision, ..
            } => match revision {
                Some(revision) => format!("Starting {resource_name} at {revision}"),
                None => format!("Starting {resource_name}"),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartedTask {
    pub ticket: TaskTicket,
    pub request: TaskRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskPayload {
    SessionOpened(SessionHandle),
    ApprovalsFetched(Vec<ApprovalItem>),
    StatusFetched(Vec<ResourceItem>),
    ActionCompleted { summary: String },
}

/// Observable state of a task. `Busy` holds until exactly one of the other
/// two is reported.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Busy,
    Success(TaskPayload),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskCompletion {
    pub ticket: TaskTicket,
    pub outcome: TaskOutcome,
}

/// The outstanding task as the wizard tracks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTask {
    pub ticket: TaskTicket,
    /// Screen the operator launched the work from
    pub origin: ScreenId,
    pub description: String,
}

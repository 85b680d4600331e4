//! # Task Execution Layer
//!
//! This module is the boundary where the pure wizard state meets the cloud
//! collaborator. It turns [`Effect`]s into spawned futures and each
//! [`TaskRequest`] into exactly one collaborator call.
//!
//! ## Design
//! - [`perform`] runs one request against the backend and folds the result
//!   into a terminal [`TaskOutcome`].
//! - [`spawn_task`] runs [`perform`] on the Tokio runtime and always resolves
//!   to a [`TaskCompletion`] carrying the request's ticket, even if the task
//!   panics.
//! - [`run_from_effects`] sorts a batch of effects into pending futures and
//!   the quit flag.
//!
//! This follows a **functional core, imperative shell** pattern: state
//! updates are pure, and only this module touches the backend.

use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use pipegate_api::{BackendError, CloudBackend};
use pipegate_engine::{StartedTask, TaskCompletion, TaskOutcome, TaskPayload, TaskRequest};
use pipegate_util::mask_token;
use tracing::{debug, error, warn};

use crate::app::Effect;

/// Future resolving to the completion of one started task.
pub type TaskFuture = BoxFuture<'static, TaskCompletion>;

/// Work produced from one batch of effects.
#[derive(Default)]
pub struct CommandBatch {
    pub pending: Vec<TaskFuture>,
    pub quit: bool,
}

/// Perform `request` and report its terminal outcome.
pub async fn perform(backend: &dyn CloudBackend, request: TaskRequest) -> TaskOutcome {
    match execute(backend, request).await {
        Ok(payload) => TaskOutcome::Success(payload),
        Err(err) => {
            warn!(error = %err, "collaborator call failed");
            TaskOutcome::Failure(err.to_string())
        }
    }
}

async fn execute(backend: &dyn CloudBackend, request: TaskRequest) -> Result<TaskPayload, BackendError> {
    match request {
        TaskRequest::OpenSession { locator } => backend.open_session(&locator).await.map(TaskPayload::SessionOpened),
        TaskRequest::ListPendingApprovals { session } => session
            .list_pending_approvals()
            .await
            .map(TaskPayload::ApprovalsFetched),
        TaskRequest::ListResourceStatus { session } => session
            .list_resource_status()
            .await
            .map(TaskPayload::StatusFetched),
        TaskRequest::DecideApproval {
            session,
            item,
            approved,
            comment,
        } => {
            session.decide_approval(&item, approved, &comment).await?;
            let verb = if approved { "Approved" } else { "Rejected" };
            Ok(TaskPayload::ActionCompleted {
                summary: format!("{verb} {} (approval {})", item.label(), mask_token(&item.token)),
            })
        }
        TaskRequest::TriggerResource {
            session,
            resource_name,
            revision,
        } => {
            session.trigger_resource(&resource_name, revision.as_deref()).await?;
            let summary = match revision {
                Some(revision) => format!("Started {resource_name} at {revision}"),
                None => format!("Started {resource_name}"),
            };
            Ok(TaskPayload::ActionCompleted { summary })
        }
    }
}

/// Run `task` in the background.
///
/// The returned future resolves exactly once with the task's ticket. A panic
/// inside the collaborator is reported as a failure rather than lost.
pub fn spawn_task(backend: Arc<dyn CloudBackend>, task: StartedTask) -> TaskFuture {
    let StartedTask { ticket, request } = task;
    debug!(ticket = %ticket, "{}", request.describe());
    let handle = tokio::spawn(async move { perform(backend.as_ref(), request).await });
    async move {
        let outcome = handle.await.unwrap_or_else(|join_error| {
            error!(ticket = %ticket, error = %join_error, "background task aborted");
            TaskOutcome::Failure(format!("Background task failed: {join_error}"))
        });
        TaskCompletion { ticket, outcome }
    }
    .boxed()
}

/// Translate effects into pending work.
pub fn run_from_effects(backend: &Arc<dyn CloudBackend>, effects: Vec<Effect>) -> CommandBatch {
    let mut batch = CommandBatch::default();
    for effect in effects {
        match effect {
            Effect::RunTask(task) => batch.pending.push(spawn_task(Arc::clone(backend), task)),
            Effect::Quit => batch.quit = true,
        }
    }
    batch
}

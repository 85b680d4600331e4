//! Cloud collaborator interfaces.
//!
//! This crate defines the narrow seam between the navigation engine and the
//! cloud provider that actually owns pipelines and approvals:
//!
//! - [`CloudBackend`] lists locator options and opens sessions
//! - [`CloudSession`] performs the remote reads and mutations for one locator
//! - [`SessionHandle`] is the shareable, cheaply cloned handle the engine keeps
//!   for the lifetime of a locator branch
//!
//! Concrete provider integrations live outside this workspace. The
//! [`FixtureBackend`] serves scripted data from YAML so the terminal UI can be
//! driven end to end and tested without network access.

mod fixture;

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;
use pipegate_types::{ApprovalItem, Locator, ResourceItem};
use thiserror::Error;

pub use fixture::{AccountFixture, FailurePlan, FixtureBackend, FixtureFile, RecordedCall};

/// Regions offered when the backend does not supply its own list.
pub const DEFAULT_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ca-central-1",
    "eu-west-1",
    "eu-west-2",
    "eu-central-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "sa-east-1",
];

/// Failure reported by a collaborator call.
///
/// The display text is what the operator sees on the error screen, so
/// variants render the provider's message without extra decoration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("unknown profile '{profile}'")]
    UnknownProfile { profile: String },

    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error("{message}")]
    Remote { operation: &'static str, message: String },
}

impl BackendError {
    pub fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Remote {
            operation,
            message: message.into(),
        }
    }
}

/// Remote operations bound to one opened locator.
#[async_trait]
pub trait CloudSession: Send + Sync + fmt::Debug {
    /// The locator this session was opened for.
    fn locator(&self) -> &Locator;

    async fn list_pending_approvals(&self) -> Result<Vec<ApprovalItem>, BackendError>;

    /// Record an approve/reject decision for a pending approval.
    async fn decide_approval(&self, item: &ApprovalItem, approved: bool, comment: &str) -> Result<(), BackendError>;

    async fn list_resource_status(&self) -> Result<Vec<ResourceItem>, BackendError>;

    /// Start an execution of the named pipeline, optionally pinned to a source revision.
    async fn trigger_resource(&self, resource_name: &str, revision: Option<&str>) -> Result<(), BackendError>;
}

/// Entry point to the cloud collaborator.
#[async_trait]
pub trait CloudBackend: Send + Sync + fmt::Debug {
    /// Credential profiles the operator can choose from.
    fn list_locator_options(&self) -> Vec<String>;

    /// Static region list; never fetched remotely.
    fn fixed_region_list(&self) -> Vec<String> {
        DEFAULT_REGIONS.iter().map(|region| region.to_string()).collect()
    }

    async fn open_session(&self, locator: &Locator) -> Result<SessionHandle, BackendError>;
}

/// Shared handle to an opened [`CloudSession`].
///
/// Equality is identity: two handles are equal only when they point at the
/// same opened session.
#[derive(Clone, Debug)]
pub struct SessionHandle(Arc<dyn CloudSession>);

impl SessionHandle {
    pub fn new(session: Arc<dyn CloudSession>) -> Self {
        Self(session)
    }
}

impl Deref for SessionHandle {
    type Target = dyn CloudSession;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for SessionHandle {}

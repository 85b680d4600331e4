//! YAML-backed collaborator used by the binary's demo mode and by tests.
//!
//! A fixture file lists the available profiles and, per `profile/region`
//! key, the approvals and pipelines a session should report. Any operation
//! can be scripted to fail with a fixed message through the `fail` block.
//!
//! ```yaml
//! profiles: [default, staging]
//! latency_millis: 400
//! accounts:
//!   default/us-east-1:
//!     approvals:
//!       - { collection_name: pipe1, stage_name: Approve, action_name: Gate, token: tok-1 }
//!     pipelines:
//!       - name: pipe1
//!         stages: [{ name: Source, status: Succeeded }]
//!     fail:
//!       trigger: "pipeline is disabled"
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use pipegate_types::{ApprovalItem, Locator, ResourceItem, StageState, StageStatus};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{BackendError, CloudBackend, CloudSession, SessionHandle};

/// Root of a fixture document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureFile {
    #[serde(default)]
    pub profiles: Vec<String>,
    /// Overrides the default region list when present
    #[serde(default)]
    pub regions: Option<Vec<String>>,
    /// Artificial delay applied to every remote call
    #[serde(default)]
    pub latency_millis: u64,
    #[serde(default)]
    pub accounts: HashMap<String, AccountFixture>,
}

/// Data served for a single `profile/region`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountFixture {
    #[serde(default)]
    pub approvals: Vec<ApprovalItem>,
    #[serde(default)]
    pub pipelines: Vec<ResourceItem>,
    #[serde(default)]
    pub fail: FailurePlan,
}

/// Scripted failures; each populated field makes that operation fail with the message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FailurePlan {
    pub open_session: Option<String>,
    pub list_approvals: Option<String>,
    pub list_pipelines: Option<String>,
    pub decide: Option<String>,
    pub trigger: Option<String>,
}

/// Mutation recorded by a fixture session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Decision {
        locator: Locator,
        token: String,
        approved: bool,
        comment: String,
    },
    Trigger {
        locator: Locator,
        resource_name: String,
        revision: Option<String>,
    },
}

type Accounts = Arc<Mutex<HashMap<String, AccountFixture>>>;
type Journal = Arc<Mutex<Vec<RecordedCall>>>;

#[derive(Debug, Clone)]
pub struct FixtureBackend {
    profiles: Vec<String>,
    regions: Option<Vec<String>>,
    latency: Duration,
    accounts: Accounts,
    journal: Journal,
}

impl FixtureBackend {
    pub fn new(file: FixtureFile) -> Self {
        Self {
            profiles: file.profiles,
            regions: file.regions,
            latency: Duration::from_millis(file.latency_millis),
            accounts: Arc::new(Mutex::new(file.accounts)),
            journal: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Load a fixture document from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("read fixture {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("parse fixture {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let file: FixtureFile = serde_yaml::from_str(raw).context("invalid fixture document")?;
        Ok(Self::new(file))
    }

    /// Built-in demo data used when no fixture file is configured.
    pub fn sample() -> Self {
        let mut accounts = HashMap::new();
        accounts.insert(
            "default/us-east-1".to_string(),
            AccountFixture {
                approvals: vec![
                    ApprovalItem {
                        collection_name: "web-frontend".into(),
                        stage_name: "Release".into(),
                        action_name: "ProductionGate".into(),
                        token: "c0ffee00-1111-4a4a-9b9b-000000000001".into(),
                    },
                    ApprovalItem {
                        collection_name: "billing-api".into(),
                        stage_name: "Approve".into(),
                        action_name: "QA-SignOff".into(),
                        token: "c0ffee00-2222-4a4a-9b9b-000000000002".into(),
                    },
                ],
                pipelines: vec![
                    sample_pipeline("web-frontend", &[StageStatus::Succeeded, StageStatus::Succeeded, StageStatus::InProgress]),
                    sample_pipeline("billing-api", &[StageStatus::Succeeded, StageStatus::Failed, StageStatus::Unknown]),
                ],
                fail: FailurePlan::default(),
            },
        );
        accounts.insert(
            "staging/eu-west-1".to_string(),
            AccountFixture {
                fail: FailurePlan {
                    list_approvals: Some("access denied".into()),
                    ..FailurePlan::default()
                },
                ..AccountFixture::default()
            },
        );
        Self::new(FixtureFile {
            profiles: vec!["default".into(), "staging".into()],
            regions: None,
            latency_millis: 350,
            accounts,
        })
    }

    /// Snapshot of every mutation performed so far.
    pub async fn journal(&self) -> Vec<RecordedCall> {
        self.journal.lock().await.clone()
    }
}

fn sample_pipeline(name: &str, statuses: &[StageStatus]) -> ResourceItem {
    let stage_names = ["Source", "Build", "Deploy"];
    ResourceItem {
        name: name.to_string(),
        stages: stage_names
            .iter()
            .zip(statuses)
            .map(|(stage, status)| StageState {
                name: stage.to_string(),
                status: *status,
            })
            .collect(),
        updated_at: None,
    }
}

#[async_trait]
impl CloudBackend for FixtureBackend {
    fn list_locator_options(&self) -> Vec<String> {
        self.profiles.clone()
    }

    fn fixed_region_list(&self) -> Vec<String> {
        match &self.regions {
            Some(regions) => regions.clone(),
            None => crate::DEFAULT_REGIONS.iter().map(|region| region.to_string()).collect(),
        }
    }

    async fn open_session(&self, locator: &Locator) -> Result<SessionHandle, BackendError> {
        tokio::time::sleep(self.latency).await;
        if !self.profiles.iter().any(|profile| profile == &locator.profile) {
            return Err(BackendError::UnknownProfile {
                profile: locator.profile.clone(),
            });
        }
        if let Some(message) = self
            .accounts
            .lock()
            .await
            .get(&locator.key())
            .and_then(|account| account.fail.open_session.clone())
        {
            return Err(BackendError::remote("open_session", message));
        }
        debug!(locator = %locator, "fixture session opened");
        let session = FixtureSession {
            locator: locator.clone(),
            latency: self.latency,
            accounts: Arc::clone(&self.accounts),
            journal: Arc::clone(&self.journal),
        };
        Ok(SessionHandle::new(Arc::new(session)))
    }
}

#[derive(Debug)]
struct FixtureSession {
    locator: Locator,
    latency: Duration,
    accounts: Accounts,
    journal: Journal,
}

impl FixtureSession {
    /// Sleeps for the configured latency, then returns a copy of this
    /// locator's account (an empty one when the fixture has no entry).
    async fn account(&self) -> AccountFixture {
        tokio::time::sleep(self.latency).await;
        self.accounts
            .lock()
            .await
            .get(&self.locator.key())
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl CloudSession for FixtureSession {
    fn locator(&self) -> &Locator {
        &self.locator
    }

    async fn list_pending_approvals(&self) -> Result<Vec<ApprovalItem>, BackendError> {
        let account = self.account().await;
        if let Some(message) = account.fail.list_approvals {
            return Err(BackendError::remote("list_pending_approvals", message));
        }
        Ok(account.approvals)
    }

    async fn decide_approval(&self, item: &ApprovalItem, approved: bool, comment: &str) -> Result<(), BackendError> {
        let account = self.account().await;
        if let Some(message) = account.fail.decide {
            return Err(BackendError::remote("decide_approval", message));
        }
        {
            let mut accounts = self.accounts.lock().await;
            let entry = accounts.entry(self.locator.key()).or_default();
            let before = entry.approvals.len();
            entry.approvals.retain(|pending| pending.token != item.token);
            if entry.approvals.len() == before {
                return Err(BackendError::NotFound {
                    kind: "approval",
                    name: item.label(),
                });
            }
        }
        info!(locator = %self.locator, approval = %item.label(), approved, "fixture approval decided");
        self.journal.lock().await.push(RecordedCall::Decision {
            locator: self.locator.clone(),
            token: item.token.clone(),
            approved,
            comment: comment.to_string(),
        });
        Ok(())
    }

    async fn list_resource_status(&self) -> Result<Vec<ResourceItem>, BackendError> {
        let account = self.account().await;
        if let Some(message) = account.fail.list_pipelines {
            return Err(BackendError::remote("list_resource_status", message));
        }
        Ok(account.pipelines)
    }

    async fn trigger_resource(&self, resource_name: &str, revision: Option<&str>) -> Result<(), BackendError> {
        let account = self.account().await;
        if let Some(message) = account.fail.trigger {
            return Err(BackendError::remote("trigger_resource", message));
        }
        if !account.pipelines.iter().any(|pipeline| pipeline.name == resource_name) {
            return Err(BackendError::NotFound {
                kind: "pipeline",
                name: resource_name.to_string(),
            });
        }
        info!(locator = %self.locator, pipeline = resource_name, ?revision, "fixture pipeline triggered");
        self.journal.lock().await.push(RecordedCall::Trigger {
            locator: self.locator.clone(),
            resource_name: resource_name.to_string(),
            revision: revision.map(str::to_string),
        });
        Ok(())
    }
}

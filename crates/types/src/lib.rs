use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Values needed to open a session with the cloud collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    /// Named credential profile (e.g., "default")
    pub profile: String,
    /// Region the session is bound to (e.g., "us-east-1")
    pub region: String,
}

impl Locator {
    pub fn new(profile: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            region: region.into(),
        }
    }

    /// Key used to address per-locator data, formatted as `profile/region`.
    pub fn key(&self) -> String {
        format!("{}/{}", self.profile, self.region)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.profile, self.region)
    }
}

/// A manual-approval action waiting for a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalItem {
    /// Pipeline the approval belongs to
    pub collection_name: String,
    /// Stage containing the approval action
    pub stage_name: String,
    /// Name of the approval action inside the stage
    pub action_name: String,
    /// Opaque token the provider requires to record a decision
    pub token: String,
}

impl ApprovalItem {
    /// Human readable `pipeline / stage / action` label.
    pub fn label(&self) -> String {
        format!("{} / {} / {}", self.collection_name, self.stage_name, self.action_name)
    }
}

/// Latest known status of a pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StageStatus {
    InProgress,
    Succeeded,
    Failed,
    Stopped,
    Cancelled,
    #[default]
    Unknown,
}

impl StageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::InProgress => "InProgress",
            StageStatus::Succeeded => "Succeeded",
            StageStatus::Failed => "Failed",
            StageStatus::Stopped => "Stopped",
            StageStatus::Cancelled => "Cancelled",
            StageStatus::Unknown => "Unknown",
        }
    }
}

/// Stage entry of a [`ResourceItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageState {
    pub name: String,
    #[serde(default)]
    pub status: StageStatus,
}

/// A deployment pipeline together with the state of its stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceItem {
    pub name: String,
    #[serde(default)]
    pub stages: Vec<StageState>,
    /// When the most recent stage transition happened, if known
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ResourceItem {
    /// A bare record carrying only a name, used for manually typed targets.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
            updated_at: None,
        }
    }

    /// Compact `Stage:Status › Stage:Status` summary for list rows.
    pub fn stage_summary(&self) -> String {
        if self.stages.is_empty() {
            return "-".to_string();
        }
        self.stages
            .iter()
            .map(|stage| format!("{}:{}", stage.name, stage.status.as_str()))
            .collect::<Vec<_>>()
            .join(" › ")
    }
}

/// Normalized input events consumed by the navigation engine.
///
/// The terminal layer maps raw key presses into these; everything below the
/// terminal layer only ever sees this vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    NavigateUp,
    NavigateDown,
    Confirm,
    Cancel,
    ToggleMode,
    Character(char),
    Backspace,
    CursorLeft,
    CursorRight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_item_defaults_missing_stage_fields() {
        let yaml = r#"
name: web-deploy
stages:
  - name: Source
    status: Succeeded
  - name: Build
"#;
        let item: ResourceItem = serde_yaml::from_str(yaml).expect("deserialize ResourceItem");
        assert_eq!(item.name, "web-deploy");
        assert_eq!(item.stages[1].status, StageStatus::Unknown);
        assert!(item.updated_at.is_none());
        assert_eq!(item.stage_summary(), "Source:Succeeded › Build:Unknown");
    }

    #[test]
    fn named_resource_has_placeholder_summary() {
        assert_eq!(ResourceItem::named("api").stage_summary(), "-");
    }

    #[test]
    fn locator_key_joins_profile_and_region() {
        let locator = Locator::new("default", "us-east-1");
        assert_eq!(locator.key(), "default/us-east-1");
        assert_eq!(locator.to_string(), "default @ us-east-1");
    }
}

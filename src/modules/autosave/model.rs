use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

#[derive(Debug, Clone)]
pub struct AutoSaveConfig {
    pub enabled: bool,
    pub interval: Duration,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self { enabled: true, interval: Duration::from_secs(300) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { commit: String },
    /// Nothing written since the last save.
    Clean,
    AlreadySaving,
}

/// What the admin UI polls before letting the user leave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveStatus {
    pub has_changes: bool,
    pub is_saving: bool,
    pub last_saved: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SaveChangesModel {
    #[validate(length(min = 1, max = 200, message = "Commit message must be 1-200 characters"))]
    pub message: Option<String>,
    /// Free-form description of the edits, recorded in the change log.
    pub changes: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResult {
    pub commit_hash: Option<String>,
}

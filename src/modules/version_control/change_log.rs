use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::api::error;
use crate::modules::storage::{DirtyFlag, JsonFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Photo,
    Gallery,
    Settings,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEntry {
    #[serde(rename = "type")]
    pub kind: ChangeType,
    pub action: ChangeAction,
    #[serde(default)]
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeLogDocument {
    #[serde(default)]
    pub changes: Vec<ChangeEntry>,
}

/// `cms/change-log.json`, appended after every successful save.
pub struct ChangeLog {
    file: JsonFile<ChangeLogDocument>,
}

impl ChangeLog {
    /// The log has its own flag: appending to it must not make the data dirty again.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { file: JsonFile::new(path, DirtyFlag::default()) }
    }

    pub async fn append(&self, entry: ChangeEntry) -> Result<(), error::SystemError> {
        self.file
            .mutate(move |doc| {
                doc.changes.push(entry);
                Ok(())
            })
            .await
    }

    pub async fn entries(&self) -> Result<Vec<ChangeEntry>, error::SystemError> {
        Ok(self.file.load().await?.changes)
    }
}

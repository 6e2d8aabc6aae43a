//! Snapshots of the data files into version control.
//!
//! [`VersionControlSink`] is the only surface the rest of the service sees;
//! [`GitSink`] drives the `git` binary and [`ChangeLog`] records each save.
pub mod change_log;
pub mod git;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::error;

pub use change_log::ChangeLog;
pub use git::GitSink;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub hash: String,
    pub message: String,
    pub date: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait VersionControlSink {
    /// Records the current data files and returns the new commit id.
    async fn commit(&self, message: &str) -> Result<String, error::SystemError>;

    /// Most recent commits first.
    async fn history(&self, limit: usize) -> Result<Vec<CommitInfo>, error::SystemError>;
}

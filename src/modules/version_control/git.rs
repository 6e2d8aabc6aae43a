use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use crate::api::error;
use crate::modules::version_control::{CommitInfo, VersionControlSink};

/// Field separator in `git log` output; commit subjects cannot contain it.
const LOG_FORMAT: &str = "--format=%H%x09%cI%x09%s";

#[derive(Debug, Clone)]
pub struct GitConfig {
    pub repo_dir: PathBuf,
    /// Paths staged on every commit (data and upload directories).
    pub tracked: Vec<PathBuf>,
    pub remote: String,
    pub branch: String,
    pub push: bool,
}

pub struct GitSink {
    config: GitConfig,
}

struct GitOutput {
    success: bool,
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl GitSink {
    pub fn new(config: GitConfig) -> Self {
        Self { config }
    }

    async fn run(&self, args: &[&str]) -> Result<GitOutput, error::SystemError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.config.repo_dir)
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| error::SystemError::version_control(format!("failed to run git: {e}")))?;

        Ok(GitOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    async fn run_checked(&self, args: &[&str]) -> Result<String, error::SystemError> {
        let out = self.run(args).await?;
        if out.success {
            Ok(out.stdout)
        } else {
            Err(error::SystemError::version_control(format!(
                "git {} failed: {}",
                args.first().copied().unwrap_or_default(),
                if out.stderr.is_empty() { &out.stdout } else { &out.stderr }
            )))
        }
    }
}

#[async_trait::async_trait]
impl VersionControlSink for GitSink {
    async fn commit(&self, message: &str) -> Result<String, error::SystemError> {
        let tracked: Vec<String> =
            self.config.tracked.iter().map(|p| p.to_string_lossy().into_owned()).collect();
        let with_paths = |args: &[&'static str]| {
            let mut args: Vec<&str> = args.to_vec();
            args.extend(tracked.iter().map(String::as_str));
            args
        };
        self.run_checked(&with_paths(&["add", "-A", "--"])).await?;

        // exit 0: tracked paths unchanged; 1: staged changes to commit
        let staged = self.run(&with_paths(&["diff", "--cached", "--quiet", "--"])).await?;
        match staged.code {
            Some(0) => log::info!("Nothing to commit for '{}'", message),
            Some(1) => {
                let mut commit = vec!["commit", "-m", message, "--"];
                commit.extend(tracked.iter().map(String::as_str));
                self.run_checked(&commit).await?;
            }
            _ => {
                return Err(error::SystemError::version_control(format!(
                    "git diff failed: {}",
                    staged.stderr
                )));
            }
        }

        if self.config.push {
            let push = self.run(&["push", &self.config.remote, &self.config.branch]).await;
            match push {
                Ok(out) if out.success => {
                    log::info!("Pushed to {}/{}", self.config.remote, self.config.branch)
                }
                Ok(out) => log::warn!("Push failed, commit kept locally: {}", out.stderr),
                Err(e) => log::warn!("Push failed, commit kept locally: {}", e),
            }
        }

        self.run_checked(&["rev-parse", "HEAD"]).await
    }

    async fn history(&self, limit: usize) -> Result<Vec<CommitInfo>, error::SystemError> {
        let count = limit.to_string();
        let out = self.run(&["log", "-n", &count, LOG_FORMAT]).await?;
        if !out.success {
            // fresh repository without commits
            if out.stderr.contains("does not have any commits") {
                return Ok(Vec::new());
            }
            return Err(error::SystemError::version_control(format!(
                "git log failed: {}",
                out.stderr
            )));
        }
        Ok(parse_log(&out.stdout))
    }
}

/// Parses `%H<TAB>%cI<TAB>%s` lines; malformed lines are skipped.
pub fn parse_log(stdout: &str) -> Vec<CommitInfo> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut parts = line.splitn(3, '\t');
            let hash = parts.next()?.trim();
            let date = DateTime::parse_from_rfc3339(parts.next()?.trim()).ok()?;
            let message = parts.next().unwrap_or_default();
            if hash.is_empty() {
                return None;
            }
            Some(CommitInfo {
                hash: hash.to_string(),
                message: message.to_string(),
                date: date.with_timezone(&Utc),
            })
        })
        .collect()
}

//! Typed stage hand-off records.
//!
//! Each stage writes a small result record to the working directory on exit.
//! The orchestrator reads the record instead of scraping captured stdout, so
//! diagnostic text and the machine hand-off value stay decoupled. The
//! single-line stdout convention is still honored for standalone runs.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::fs::write_atomic;

/// Terminal status of one stage run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage produced its artifact.
    Succeeded,
    /// Stage ran cleanly but there was nothing to process
    /// (catalog search over an empty window).
    NoData,
    /// Stage failed; `error_kind` names the failure.
    Failed,
}

/// Result record written by every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: String,
    pub status: StageStatus,
    /// Path of the primary artifact, present only on success.
    pub artifact: Option<String>,
    /// Machine-readable error kind from the pipeline taxonomy.
    pub error_kind: Option<String>,
    /// Human-readable detail, mirrors the logged banner.
    pub message: Option<String>,
    pub finished_at: DateTime<Utc>,
}

impl StageResult {
    pub fn succeeded(stage: &str, artifact: &str) -> Self {
        Self {
            stage: stage.to_string(),
            status: StageStatus::Succeeded,
            artifact: Some(artifact.to_string()),
            error_kind: None,
            message: None,
            finished_at: Utc::now(),
        }
    }

    pub fn no_data(stage: &str, message: &str) -> Self {
        Self {
            stage: stage.to_string(),
            status: StageStatus::NoData,
            artifact: None,
            error_kind: Some("NoItemsFound".to_string()),
            message: Some(message.to_string()),
            finished_at: Utc::now(),
        }
    }

    pub fn failed(stage: &str, error: &PipelineError) -> Self {
        Self {
            stage: stage.to_string(),
            status: StageStatus::Failed,
            artifact: None,
            error_kind: Some(error.kind().to_string()),
            message: Some(error.to_string()),
            finished_at: Utc::now(),
        }
    }

    /// Record filename for a stage, relative to the working directory.
    pub fn path_for(stage: &str, work_dir: &Path) -> PathBuf {
        work_dir.join(format!("{}_result.json", stage))
    }

    /// Atomically persist the record into `work_dir`.
    pub fn save(&self, work_dir: &Path) -> PipelineResult<()> {
        let json = serde_json::to_vec_pretty(self)?;
        write_atomic(&Self::path_for(&self.stage, work_dir), &json)
    }

    /// Load a stage's record from `work_dir`, if one exists.
    pub fn load(stage: &str, work_dir: &Path) -> PipelineResult<Option<Self>> {
        let path = Self::path_for(stage, work_dir);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let record = serde_json::from_str(&content).map_err(|e| {
            PipelineError::DescriptorInvalid(format!(
                "cannot parse stage record {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Some(record))
    }
}

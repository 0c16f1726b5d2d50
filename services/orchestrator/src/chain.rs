//! The static three-stage chain and its per-node execution.

use std::io::Write;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use pipeline_common::{StageResult, StageStatus};
use tracing::{info, warn};
use uuid::Uuid;

/// Terminal outcome of one chain run.
#[derive(Debug)]
pub enum ChainOutcome {
    /// All stages ran; `artifact` is the final COG path.
    Completed { artifact: String },
    /// The search window was empty; downstream stages were skipped.
    NoData,
    /// `node` failed; its dependents never ran.
    Failed { node: String },
}

/// What one executed node handed back.
#[derive(Debug)]
enum NodeOutcome {
    Artifact(String),
    NoData,
    Failed,
}

/// The fixed registration order of the pipeline stages.
const STAGES: [&str; 3] = ["scene-search", "ndvi-compute", "cog-convert"];

/// Run the full chain. The first node establishes the working directory;
/// every subsequent edge passes exactly one artifact path.
pub fn run_chain(
    work_dir: &Path,
    bin_dir: &Path,
    config: &Path,
    run_id: Uuid,
) -> Result<ChainOutcome> {
    // Node 0: ensure the shared working directory exists.
    std::fs::create_dir_all(work_dir)
        .with_context(|| format!("Cannot create working directory {}", work_dir.display()))?;
    info!(run_id = %run_id, node = "make-processing-directory", "Node complete");

    let mut input: Option<String> = None;
    for stage in STAGES {
        match run_node(stage, input.as_deref(), work_dir, bin_dir, config, run_id)? {
            NodeOutcome::Artifact(artifact) => {
                info!(run_id = %run_id, node = stage, artifact = %artifact, "Node complete");
                input = Some(artifact);
            }
            NodeOutcome::NoData => {
                return Ok(ChainOutcome::NoData);
            }
            NodeOutcome::Failed => {
                return Ok(ChainOutcome::Failed {
                    node: stage.to_string(),
                });
            }
        }
    }

    Ok(ChainOutcome::Completed {
        artifact: input.unwrap_or_default(),
    })
}

/// Execute one stage as a child process and interpret its hand-off.
fn run_node(
    stage: &str,
    input: Option<&str>,
    work_dir: &Path,
    bin_dir: &Path,
    config: &Path,
    run_id: Uuid,
) -> Result<NodeOutcome> {
    // Drop any record from a previous run so a crash cannot surface a stale
    // artifact as this run's result.
    let record_path = StageResult::path_for(stage, work_dir);
    if record_path.exists() {
        std::fs::remove_file(&record_path)
            .with_context(|| format!("Cannot remove stale record {}", record_path.display()))?;
    }

    let program = bin_dir.join(stage);
    info!(run_id = %run_id, node = stage, input = ?input, "Starting node");

    let mut command = Command::new(&program);
    command
        .current_dir(work_dir)
        .env("PIPELINE_CONFIG", config);
    if let Some(arg) = input {
        command.arg(arg);
    }

    let output = command
        .output()
        .with_context(|| format!("Cannot execute {}", program.display()))?;

    // Surface the stage's own log output.
    std::io::stderr().write_all(&output.stderr).ok();

    let record = StageResult::load(stage, work_dir).unwrap_or_else(|e| {
        warn!(node = stage, error = %e, "Unreadable stage record");
        None
    });

    if let Some(record) = record {
        return Ok(interpret_record(stage, record));
    }

    // Legacy hand-off: no record, fall back to exit status plus the last
    // stdout line.
    interpret_stdout(stage, &output)
}

/// Map a stage's hand-off record to the node outcome.
fn interpret_record(stage: &str, record: StageResult) -> NodeOutcome {
    match record.status {
        StageStatus::Succeeded => match record.artifact {
            Some(artifact) => NodeOutcome::Artifact(artifact),
            None => {
                warn!(node = stage, "Succeeded record without artifact");
                NodeOutcome::Failed
            }
        },
        StageStatus::NoData => NodeOutcome::NoData,
        StageStatus::Failed => {
            warn!(
                node = stage,
                kind = record.error_kind.as_deref().unwrap_or("unknown"),
                message = record.message.as_deref().unwrap_or(""),
                "Node failed"
            );
            NodeOutcome::Failed
        }
    }
}

fn interpret_stdout(stage: &str, output: &std::process::Output) -> Result<NodeOutcome> {
    if !output.status.success() {
        warn!(node = stage, status = ?output.status.code(), "Node exited non-zero");
        return Ok(NodeOutcome::Failed);
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    match stdout.lines().map(str::trim).filter(|l| !l.is_empty()).last() {
        Some(line) => Ok(NodeOutcome::Artifact(line.to_string())),
        None => {
            warn!(node = stage, "Node produced neither a record nor an output line");
            Ok(NodeOutcome::Failed)
        }
    }
}

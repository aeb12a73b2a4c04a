//! Capture, query, delete and cleanup commands.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use boopblur_shared::{temporal, Artifact};
use serde::Serialize;
use tracing::{error, info};

use super::print_json;
use crate::lifecycle::CleanupReport;
use crate::state::AppState;

/// Artifact as shown to the user. The image payload is summarised by size.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDto {
    pub id: String,
    pub ts: i64,
    pub iso_date: String,
    pub week_key: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size_bytes: usize,
    pub age_days: i64,
    pub decay: String,
    pub spark_pack_id: String,
    pub spark_index: u32,
    pub spark_line: Option<String>,
}

impl ArtifactDto {
    pub fn from_artifact(state: &AppState, artifact: &Artifact) -> Self {
        Self {
            id: artifact.id.clone(),
            ts: artifact.ts,
            iso_date: artifact.iso_date.clone(),
            week_key: artifact.week_key.clone(),
            kind: artifact.kind.as_str().to_string(),
            size_bytes: artifact.blob.len(),
            age_days: temporal::age_days(artifact.ts, state.clock.now_ms()),
            decay: state.lifecycle.decay_of(artifact).name.clone(),
            spark_pack_id: artifact.spark_pack_id.clone(),
            spark_index: artifact.spark_index,
            spark_line: state
                .catalog
                .line(&artifact.spark_pack_id, artifact.spark_index)
                .map(str::to_string),
        }
    }
}

fn print_artifact(dto: &ArtifactDto) {
    println!(
        "{}  {}  {:<12} {:>3}d  {}",
        dto.id,
        dto.iso_date,
        dto.decay,
        dto.age_days,
        dto.spark_line.as_deref().unwrap_or("-"),
    );
}

pub async fn capture(
    state: &mut AppState,
    file: &Path,
    pack: Option<&str>,
    at: Option<i64>,
    json: bool,
) -> Result<()> {
    let blob = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let artifact = state.capture(blob, pack, at).await?;
    let dto = ArtifactDto::from_artifact(state, &artifact);

    if json {
        print_json(&dto)
    } else {
        println!("Captured {} ({} bytes)", dto.id, dto.size_bytes);
        if let Some(line) = &dto.spark_line {
            println!("  {line}");
        }
        Ok(())
    }
}

pub async fn list(state: &mut AppState, week: bool, today: bool, json: bool) -> Result<()> {
    state.lifecycle.load().await?;
    let state = &*state;

    let mut selected: Vec<&Artifact> = if week {
        state.lifecycle.current_week()
    } else if today {
        state.lifecycle.today()
    } else {
        state.lifecycle.artifacts().iter().collect()
    };
    selected.sort_by_key(|a| a.ts);

    let dtos: Vec<ArtifactDto> = selected
        .into_iter()
        .map(|a| ArtifactDto::from_artifact(state, a))
        .collect();

    if json {
        return print_json(&dtos);
    }
    if dtos.is_empty() {
        println!("No photos.");
    }
    for dto in &dtos {
        print_artifact(dto);
    }
    Ok(())
}

pub async fn show(state: &mut AppState, id: &str, json: bool) -> Result<()> {
    let Some(artifact) = state.store.get_by_id(id).await? else {
        bail!("No photo with id '{id}'");
    };
    let dto = ArtifactDto::from_artifact(state, &artifact);

    if json {
        print_json(&dto)
    } else {
        print_artifact(&dto);
        Ok(())
    }
}

pub async fn delete(state: &mut AppState, id: &str, json: bool) -> Result<()> {
    state.lifecycle.remove(id).await?;

    if json {
        print_json(&serde_json::json!({ "deleted": id }))
    } else {
        println!("Deleted {id}");
        Ok(())
    }
}

fn print_report(report: &CleanupReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }
    println!(
        "Policy {}: deleted {} photo(s)",
        report.policy,
        report.deleted.len()
    );
    for id in &report.deleted {
        println!("  {id}");
    }
    Ok(())
}

pub async fn cleanup(state: &mut AppState, json: bool) -> Result<()> {
    let report = state.lifecycle.run_cleanup().await?;
    print_report(&report, json)
}

pub async fn clear(state: &mut AppState, yes: bool, json: bool) -> Result<()> {
    if !yes {
        bail!("Refusing to delete every photo without --yes");
    }
    let removed = state.lifecycle.clear_all().await?;

    if json {
        print_json(&serde_json::json!({ "deleted": removed }))
    } else {
        println!("Deleted {removed} photo(s)");
        Ok(())
    }
}

/// Run cleanup on a fixed interval until Ctrl+C. A failed pass is logged
/// and retried on the next tick.
pub async fn watch(state: &mut AppState, interval: Option<u64>, json: bool) -> Result<()> {
    let secs = interval
        .unwrap_or(state.config.cleanup_interval_secs)
        .max(1);
    let mut ticker = tokio::time::interval(Duration::from_secs(secs));
    info!(interval_secs = secs, "watching for expired photos");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match state.lifecycle.run_cleanup().await {
                    Ok(report) if !report.deleted.is_empty() => print_report(&report, json)?,
                    Ok(_) => {}
                    Err(e) => error!(error = %e, "cleanup pass failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, stopping");
                return Ok(());
            }
        }
    }
}

// SPDX-License-Identifier: MIT

//! Rendering [`MonitorRecord`]s and fleet status as text or JSON.

use crate::color;
use clap::ValueEnum;
use qmon_core::{MonitorRecord, MonitorState};
use qmon_daemon::FleetStatus;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Format a timestamp as relative time (e.g., "5s", "2m", "1h", "3d").
pub fn format_time_ago(epoch_ms: u64) -> String {
    if epoch_ms == 0 {
        return "-".to_string();
    }
    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;
    let elapsed_secs = now_ms.saturating_sub(epoch_ms) / 1000;
    format_elapsed(elapsed_secs)
}

fn format_elapsed(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86400)
    }
}

fn state_label(state: MonitorState) -> &'static str {
    match state {
        MonitorState::Starting => "starting",
        MonitorState::Running => "running",
        MonitorState::Stopping => "stopping",
        MonitorState::Stopped => "stopped",
    }
}

#[derive(Serialize)]
struct MonitorRow<'a> {
    monitor_id: &'a str,
    agent_id: &'a str,
    handler: String,
    transport: &'a str,
    pid: u32,
    state: &'static str,
    started: String,
}

fn row(record: &MonitorRecord) -> MonitorRow<'_> {
    MonitorRow {
        monitor_id: record.monitor_id.as_str(),
        agent_id: record.agent_id.as_str(),
        handler: record.handler_kind.to_string(),
        transport: &record.transport_label,
        pid: record.child_pid,
        state: state_label(record.state),
        started: format_time_ago(record.started_at_ms),
    }
}

pub fn print_monitors(records: &[MonitorRecord], format: OutputFormat) -> anyhow::Result<()> {
    let rows: Vec<MonitorRow<'_>> = records.iter().map(row).collect();
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("{}", color::muted("no monitors"));
        return Ok(());
    }

    println!(
        "{:<25} {:<16} {:<18} {:<8} {:<9} {:<8}",
        color::header("MONITOR"),
        color::header("AGENT"),
        color::header("HANDLER"),
        color::header("PID"),
        color::header("STATE"),
        color::header("STARTED"),
    );
    for r in &rows {
        println!(
            "{:<25} {:<16} {:<18} {:<8} {:<9} {:<8}",
            color::literal(r.monitor_id),
            color::literal(r.agent_id),
            r.handler,
            r.pid,
            r.state,
            r.started,
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct StatusPayload {
    kill_switch_active: bool,
    running: usize,
    total: usize,
}

pub fn print_status(status: &FleetStatus, format: OutputFormat) -> anyhow::Result<()> {
    let payload = StatusPayload {
        kill_switch_active: status.kill_switch_active,
        running: status.running_count,
        total: status.total_count,
    };
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "{} {}/{} running",
        color::header("fleet:"),
        payload.running,
        payload.total
    );
    if payload.kill_switch_active {
        println!("{}", color::muted("kill switch: active"));
    } else {
        println!("{}", color::muted("kill switch: inactive"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

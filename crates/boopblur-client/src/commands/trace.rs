use anyhow::Result;
use boopblur_shared::Trace;
use chrono::{DateTime, Local, Utc};
use clap::Subcommand;

use super::print_json;
use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum TraceCommand {
    /// Print the capture counter.
    Show,

    /// Zero the capture counter.
    Reset,
}

pub async fn handle_trace_command(cmd: TraceCommand, state: &mut AppState, json: bool) -> Result<()> {
    let trace = match cmd {
        TraceCommand::Show => state.trace.current().await,
        TraceCommand::Reset => state.trace.reset().await?,
    };

    if json {
        return print_json(&trace);
    }
    println!("Total boops: {}", trace.total_boops);
    println!("Last boop:   {}", describe_last_boop(&trace));
    Ok(())
}

fn describe_last_boop(trace: &Trace) -> String {
    if trace.total_boops == 0 {
        return "never".to_string();
    }
    DateTime::<Utc>::from_timestamp_millis(trace.last_boop_ts)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| trace.last_boop_ts.to_string())
}

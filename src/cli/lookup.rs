//! One-shot lookups

use crate::dispatcher::QueryDispatcher;
use crate::types::{HistoryEntry, SearchMode};
use anyhow::{bail, Result};
use std::io::Write;

/// Resolve every PDG ID, then every name, through one dispatcher
///
/// Prints the resulting history (newest first, or as JSON in insertion
/// order). Fails if nothing was asked for or if any query failed; the
/// history of the queries that did resolve is printed either way.
pub async fn run_lookup<W: Write>(
    dispatcher: &QueryDispatcher,
    pdg_ids: Vec<String>,
    names: Vec<String>,
    json: bool,
    out: &mut W,
) -> Result<()> {
    if pdg_ids.is_empty() && names.is_empty() {
        bail!("Nothing to look up; pass --pdg-id and/or --name");
    }

    let queries = pdg_ids
        .into_iter()
        .map(|input| (SearchMode::PdgId, input))
        .chain(names.into_iter().map(|input| (SearchMode::Name, input)));

    let mut failures = 0usize;
    for (mode, input) in queries {
        dispatcher.set_mode(mode)?;
        dispatcher.set_pending_input(input.clone())?;

        if let Err(e) = dispatcher.submit().await {
            failures += 1;
            let message = dispatcher
                .read_state()?
                .last_error()
                .unwrap_or_default()
                .to_string();
            eprintln!("{} {:?}: {} ({})", mode.label(), input, message, e);
        }
    }

    {
        let state = dispatcher.read_state()?;
        if json {
            let entries: Vec<&HistoryEntry> = state.history().all().collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        } else if !state.history().is_empty() {
            write_history_table(out, state.history().most_recent_first())?;
        }
    }

    if failures > 0 {
        bail!("{} lookup(s) failed", failures);
    }
    Ok(())
}

/// Plain-text history table
pub fn write_history_table<'a, W: Write>(
    out: &mut W,
    entries: impl Iterator<Item = &'a HistoryEntry>,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<4} {:<16} {:>10} {:>14} {:>14}  {}",
        "#", "Name", "PDG ID", "Mass (MeV)", "Width (MeV)", "Query"
    )?;
    for entry in entries {
        writeln!(
            out,
            "{:<4} {:<16} {:>10} {:>14} {:>14}  {}: {}",
            entry.sequence + 1,
            entry.result.display_name,
            entry.result.pdg_id,
            entry.result.mass_mev.to_string(),
            entry.result.width_mev.to_string(),
            entry.query.mode.label(),
            entry.query.raw_input
        )?;
    }
    Ok(())
}

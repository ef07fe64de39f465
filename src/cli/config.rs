//! Configuration file management

use crate::config::LookupConfig;
use anyhow::{bail, Context, Result};
use clap::Subcommand;
use std::io::Write;
use std::path::Path;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Write a config file holding the defaults
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration as TOML
    Show,
}

/// Write the default configuration to `path`
pub fn init<W: Write>(path: &Path, force: bool, out: &mut W) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }

    LookupConfig::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writeln!(out, "Wrote default configuration to {}", path.display())?;
    Ok(())
}

/// Print `config` after every layer has been applied
pub fn show<W: Write>(config: &LookupConfig, out: &mut W) -> Result<()> {
    let rendered =
        toml::to_string_pretty(config).context("Failed to render configuration")?;
    write!(out, "{}", rendered)?;
    Ok(())
}

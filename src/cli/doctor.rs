//! Resolver health check

use crate::config::LookupConfig;
use crate::resolver::{BridgeStatus, ResolverBridge};
use anyhow::{bail, Result};
use std::io::Write;

/// Load the resolver and report the setup it ran with
pub async fn run_doctor<W: Write>(
    bridge: &ResolverBridge,
    config: &LookupConfig,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Backend:  {}", bridge.backend_name())?;
    writeln!(out, "Python:   {}", config.resolver.python)?;
    writeln!(out, "Package:  {}", config.resolver.package)?;
    match config.resolver.timeout() {
        Some(limit) => writeln!(out, "Timeout:  {:?}", limit)?,
        None => writeln!(out, "Timeout:  none")?,
    }

    let status = bridge.warm_up().await;
    writeln!(out, "Resolver: {}", status)?;

    if let BridgeStatus::Unavailable(reason) = status {
        bail!("Resolver unavailable: {}", reason);
    }
    Ok(())
}

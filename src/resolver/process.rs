//! Resolver backed by an external Python interpreter
//!
//! Initialization asks the interpreter for the particle package (and
//! optionally installs it with pip). Each query then runs one short-lived
//! `python -c` invocation whose stdout is the JSON answer.

use super::script::{printing_script, PROBE_SCRIPT};
use super::{ResolverBackend, ResolverSession};
use crate::error::{LookupError, Result};
use crate::types::Query;
use async_trait::async_trait;
use std::process::Output;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Backend that shells out to `python`
pub struct PythonProcessBackend {
    python: String,
    package: String,
    install_missing: bool,
}

impl PythonProcessBackend {
    pub fn new(python: impl Into<String>, package: impl Into<String>, install_missing: bool) -> Self {
        Self {
            python: python.into(),
            package: package.into(),
            install_missing,
        }
    }

    async fn check_package(&self) -> Result<String> {
        let output = run_python(&self.python, &["-c", PROBE_SCRIPT])
            .await
            .map_err(|e| {
                LookupError::Initialization(format!("cannot start '{}': {}", self.python, e))
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(LookupError::Initialization(format!(
                "'{}' cannot import the particle package: {}",
                self.python,
                last_line(&output.stderr)
            )))
        }
    }

    async fn install(&self) -> Result<()> {
        info!("Installing {} with pip", self.package);

        let args = ["-m", "pip", "install", "--quiet", self.package.as_str()];
        let output = run_python(&self.python, &args)
            .await
            .map_err(|e| LookupError::Initialization(format!("cannot run pip: {}", e)))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(LookupError::Initialization(format!(
                "pip install {} failed: {}",
                self.package,
                last_line(&output.stderr)
            )))
        }
    }
}

#[async_trait]
impl ResolverBackend for PythonProcessBackend {
    fn name(&self) -> &'static str {
        "process"
    }

    async fn load(&self) -> Result<Arc<dyn ResolverSession>> {
        let version = match self.check_package().await {
            Ok(version) => version,
            Err(e) if self.install_missing => {
                warn!("{}", e);
                self.install().await?;
                self.check_package().await?
            }
            Err(e) => return Err(e),
        };

        info!("Using particle {} via {}", version, self.python);
        Ok(Arc::new(PythonProcessSession {
            python: self.python.clone(),
        }))
    }
}

/// Loaded process backend; stateless apart from the interpreter path
struct PythonProcessSession {
    python: String,
}

#[async_trait]
impl ResolverSession for PythonProcessSession {
    async fn evaluate(&self, query: &Query) -> Result<String> {
        let script = printing_script(query);
        let output = run_python(&self.python, &["-c", script.as_str()])
            .await
            .map_err(|e| LookupError::Resolution(format!("cannot start '{}': {}", self.python, e)))?;

        if !output.status.success() {
            return Err(LookupError::Resolution(format!(
                "resolver exited with {}: {}",
                output.status,
                last_line(&output.stderr)
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| LookupError::MalformedResponse(format!("non UTF-8 output: {}", e)))?;
        debug!("Resolver answered {} bytes", stdout.len());
        Ok(stdout)
    }
}

async fn run_python(python: &str, args: &[&str]) -> std::io::Result<Output> {
    Command::new(python)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
}

/// Last non-empty stderr line; Python puts the exception there
fn last_line(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("no output")
        .trim()
        .to_string()
}

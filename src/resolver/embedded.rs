//! PyO3 resolver embedding CPython in-process
//!
//! Loads the particle package into an embedded interpreter once and runs
//! each query script under the GIL on a blocking thread.
//!
//! ```text
//! ResolverBridge → EmbeddedPythonSession → spawn_blocking → Python::with_gil → particle
//! ```

use super::script::{resolve_script, RESULT_VARIABLE};
use super::{ResolverBackend, ResolverSession};
use crate::error::{LookupError, Result};
use crate::types::Query;
use async_trait::async_trait;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Backend embedding the Python interpreter
pub struct EmbeddedPythonBackend {
    package: String,
}

impl EmbeddedPythonBackend {
    /// `package` is only reported in errors; the embedded interpreter never installs it
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }
}

#[async_trait]
impl ResolverBackend for EmbeddedPythonBackend {
    fn name(&self) -> &'static str {
        "embedded"
    }

    async fn load(&self) -> Result<Arc<dyn ResolverSession>> {
        let package = self.package.clone();

        let version = tokio::task::spawn_blocking(move || {
            pyo3::prepare_freethreaded_python();

            Python::with_gil(|py| {
                let module = py.import_bound("particle").map_err(|e| {
                    error!("Failed to import particle: {}", e);
                    LookupError::Initialization(format!(
                        "particle package not importable (install {}): {}",
                        package, e
                    ))
                })?;

                let version: String = module
                    .getattr("__version__")
                    .and_then(|v| v.extract())
                    .unwrap_or_else(|_| "unknown".to_string());
                Ok::<_, LookupError>(version)
            })
        })
        .await
        .map_err(|e| LookupError::Initialization(format!("Async execution failed: {}", e)))??;

        info!("Embedded Python loaded particle {}", version);
        Ok(Arc::new(EmbeddedPythonSession))
    }
}

/// Session over the process-wide interpreter
struct EmbeddedPythonSession;

#[async_trait]
impl ResolverSession for EmbeddedPythonSession {
    async fn evaluate(&self, query: &Query) -> Result<String> {
        let script = resolve_script(query);

        let raw = tokio::task::spawn_blocking(move || {
            Python::with_gil(|py| {
                let globals = PyDict::new_bound(py);

                py.run_bound(&script, Some(&globals), None).map_err(|e| {
                    LookupError::Resolution(format!("resolver script failed: {}", e))
                })?;

                let value = globals
                    .get_item(RESULT_VARIABLE)
                    .map_err(|e| LookupError::MalformedResponse(e.to_string()))?
                    .ok_or_else(|| {
                        LookupError::MalformedResponse("resolver produced no result".to_string())
                    })?;

                value.extract::<String>().map_err(|e| {
                    LookupError::MalformedResponse(format!("result is not a string: {}", e))
                })
            })
        })
        .await
        .map_err(|e| LookupError::Other(format!("Async execution failed: {}", e)))??;

        debug!("Embedded resolver answered {} bytes", raw.len());
        Ok(raw)
    }
}

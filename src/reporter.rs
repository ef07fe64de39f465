//! Latest user-facing failure message

/// Holds at most one error line for the UI
#[derive(Debug, Clone, Default)]
pub struct ErrorReporter {
    message: Option<String>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any previous message
    pub fn set(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

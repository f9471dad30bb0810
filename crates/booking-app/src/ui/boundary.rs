use std::fmt::Display;
use tracing::error;

/// Catches render failures so one broken page does not take the whole screen down.
///
/// Once an error is caught the boundary keeps showing its fallback, without
/// calling the render function again, until [`reset`](Self::reset).
#[derive(Debug, Clone, Default)]
pub struct ErrorBoundary {
    fallback: Option<String>,
    error: Option<String>,
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `fallback` instead of the default "Something went wrong." message.
    pub fn with_fallback(fallback: impl Into<String>) -> Self {
        Self {
            fallback: Some(fallback.into()),
            error: None,
        }
    }

    pub fn render<E: Display>(&mut self, render: impl FnOnce() -> Result<String, E>) -> String {
        if self.error.is_none() {
            match render() {
                Ok(content) => return content,
                Err(e) => {
                    error!(error = %e, "Render failed");
                    self.error = Some(e.to_string());
                }
            }
        }
        self.fallback()
    }

    fn fallback(&self) -> String {
        match (&self.fallback, &self.error) {
            (Some(fallback), _) => fallback.clone(),
            (None, Some(error)) => format!("Something went wrong.\n{error}"),
            (None, None) => "Something went wrong.".to_string(),
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn reset(&mut self) {
        self.error = None;
    }
}

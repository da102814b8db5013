//! # LogObserver - logs every signal of a task
//!
//! A minimal observer that reports incoming values through `tracing`.
//! Use it for debugging or demos.
//!
//! ## Example output
//! ```text
//! INFO  observer="fetch" data=4 success
//! WARN  observer="fetch" data="timeout" fail
//! INFO  observer="fetch" data="done" complete
//! ```

use std::borrow::Cow;
use std::fmt::Debug;

use tracing::{info, warn};

use super::Observer;

/// Observer that logs values with their `Debug` representation.
#[derive(Debug, Clone)]
pub struct LogObserver {
    label: Cow<'static, str>,
}

impl LogObserver {
    /// Constructs a new [`LogObserver`] whose records carry `label`.
    #[must_use]
    pub fn new(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Returns the label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new("log")
    }
}

impl<S, F, C> Observer<S, F, C> for LogObserver
where
    S: Debug,
    F: Debug,
    C: Debug,
{
    fn on_success(&self, data: &S) {
        info!(observer = %self.label, data = ?data, "success");
    }

    fn on_fail(&self, data: &F) {
        warn!(observer = %self.label, data = ?data, "fail");
    }

    fn on_complete(&self, data: &C) {
        info!(observer = %self.label, data = ?data, "complete");
    }
}

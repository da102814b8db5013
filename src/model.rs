//! # Delivery context selector.

use std::fmt;

/// Where observer callbacks of a task run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThreadModel {
    /// Inline, on the thread that emits (normally a pool worker).
    #[default]
    CurrentThread,
    /// On the main/UI loop.
    Main,
    /// On the dedicated named-worker loop.
    Worker,
}

impl ThreadModel {
    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ThreadModel::CurrentThread => "current",
            ThreadModel::Main => "main",
            ThreadModel::Worker => "worker",
        }
    }
}

impl fmt::Display for ThreadModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

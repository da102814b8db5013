//! # Runtime configuration.
//!
//! Provides [`Config`], the settings used by [`Runtime::builder`](crate::Runtime::builder)
//! to fill in the collaborators the caller did not supply, and by
//! [`Task::new`](crate::Task::new) for the initial delivery context.
//!
//! ## Sentinel values
//! - `pool_size = 0` → clamped to 1 (a pool always has a worker)

use crate::model::ThreadModel;

/// Configuration for a [`Runtime`](crate::Runtime).
///
/// ## Field semantics
/// - `pool_size`: number of work bodies that may run at once (min 1)
/// - `main_loop_name`: thread name of the default main loop
/// - `worker_loop_name`: thread name of the default named-worker loop
/// - `default_model`: delivery context of freshly created tasks
#[derive(Clone, Debug)]
pub struct Config {
    /// Size of the default worker pool.
    ///
    /// Extra submissions queue until a worker frees up.
    pub pool_size: usize,

    /// Name of the loop thread spawned when no main dispatcher is supplied.
    pub main_loop_name: String,

    /// Name of the loop thread spawned when no named-worker dispatcher is supplied.
    pub worker_loop_name: String,

    /// Delivery context a task starts with.
    pub default_model: ThreadModel,
}

impl Config {
    /// Returns the pool size clamped to a minimum of 1.
    #[inline]
    pub fn pool_size_clamped(&self) -> usize {
        self.pool_size.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `pool_size = 3`
    /// - `main_loop_name = "main-loop"`
    /// - `worker_loop_name = "work-loop"`
    /// - `default_model = ThreadModel::CurrentThread`
    fn default() -> Self {
        Self {
            pool_size: 3,
            main_loop_name: "main-loop".to_string(),
            worker_loop_name: "work-loop".to_string(),
            default_model: ThreadModel::default(),
        }
    }
}

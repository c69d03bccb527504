//! Execution configuration for group updates.
//!
//! The execution mode is recognised system-wide under two names:
//!
//! | Name | Meaning |
//! |------|---------|
//! | `sequential` | run every iteration on the calling thread, in array order |
//! | `parallel-static` | split the group evenly into contiguous chunks, one per worker |
//!
//! Names are matched case-insensitively and ignore surrounding whitespace,
//! whether they come from JSON or from the environment.
//!
//! An [`UpdateConfig`] can be built in code, decoded from JSON, or read from
//! the environment:
//!
//! - `GROUP_UPDATE_MODE`: `sequential` (default) or `parallel-static`
//! - `GROUP_UPDATE_WORKERS`: fixed worker count; unset uses rayon's global pool
//! - `GROUP_UPDATE_DUPLICATES`: `always`, `parallel-only` (default) or `never`

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::error::{ConfigError, ConfigResult};


/// Environment variable selecting the [`ExecutionMode`].
pub const MODE_ENV: &str = "GROUP_UPDATE_MODE";
/// Environment variable selecting the worker count.
pub const WORKERS_ENV: &str = "GROUP_UPDATE_WORKERS";
/// Environment variable selecting the [`DuplicatePolicy`].
pub const DUPLICATES_ENV: &str = "GROUP_UPDATE_DUPLICATES";

/// How the vector phase iterations are dispatched.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum ExecutionMode {
    /// All iterations on the calling thread, strictly in array order.
    #[default]
    Sequential,

    /// Iterations distributed evenly across a fixed-size worker pool.
    ParallelStatic,
}

impl ExecutionMode {
    /// Canonical name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::ParallelStatic => "parallel-static",
        }
    }

    /// Returns `true` for modes that may run iterations concurrently.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, ExecutionMode::ParallelStatic)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(ExecutionMode::Sequential),
            "parallel-static" => Ok(ExecutionMode::ParallelStatic),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for ExecutionMode {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// When the pairwise-distinct identifier precondition is checked.
///
/// The check runs before the scalar phase, so a rejected pass has no side
/// effects at all.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum DuplicatePolicy {
    /// Check every pass, sequential or parallel.
    Always,

    /// Check only passes that run in parallel.
    #[default]
    ParallelOnly,

    /// Trust the caller. Duplicates under parallel execution then produce
    /// order-dependent results.
    Never,
}

impl DuplicatePolicy {
    /// Canonical name of this policy.
    pub fn as_str(self) -> &'static str {
        match self {
            DuplicatePolicy::Always => "always",
            DuplicatePolicy::ParallelOnly => "parallel-only",
            DuplicatePolicy::Never => "never",
        }
    }

    /// Returns `true` if a pass in `mode` must be checked.
    #[inline]
    pub fn applies_to(self, mode: ExecutionMode) -> bool {
        match self {
            DuplicatePolicy::Always => true,
            DuplicatePolicy::ParallelOnly => mode.is_parallel(),
            DuplicatePolicy::Never => false,
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicatePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(DuplicatePolicy::Always),
            "parallel-only" => Ok(DuplicatePolicy::ParallelOnly),
            "never" => Ok(DuplicatePolicy::Never),
            _ => Err(ConfigError::UnknownDuplicatePolicy(s.to_string())),
        }
    }
}

impl TryFrom<String> for DuplicatePolicy {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Configuration of a [`GroupUpdater`](crate::engine::executor::GroupUpdater).

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateConfig {
    /// Dispatch mode of the vector phase.
    pub mode: ExecutionMode,

    /// Fixed worker count for parallel execution. `None` uses the global pool.
    pub workers: Option<usize>,

    /// When duplicate identifiers are checked.
    pub duplicate_policy: DuplicatePolicy,
}

impl UpdateConfig {
    /// Sequential configuration with default checks.
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Parallel-static configuration; `workers = None` uses the global pool.
    pub fn parallel(workers: Option<usize>) -> Self {
        Self {
            mode: ExecutionMode::ParallelStatic,
            workers,
            ..Self::default()
        }
    }

    /// Returns a copy with a different duplicate policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Rejects configurations that cannot be executed.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.workers == Some(0) {
            return Err(ConfigError::InvalidWorkers("0".to_string()));
        }
        Ok(())
    }

    /// Decodes and validates a JSON configuration document.
    ///
    /// Missing fields take their defaults.
    pub fn from_json(document: &str) -> ConfigResult<Self> {
        let config: UpdateConfig = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a configuration from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup using the same
    /// variable names as [`UpdateConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(mode) = lookup(MODE_ENV) {
            config.mode = mode.parse()?;
        }

        if let Some(workers) = lookup(WORKERS_ENV) {
            let parsed = workers
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidWorkers(workers.clone()))?;
            config.workers = Some(parsed);
        }

        if let Some(policy) = lookup(DUPLICATES_ENV) {
            config.duplicate_policy = policy.parse()?;
        }

        config.validate()?;
        Ok(config)
    }
}

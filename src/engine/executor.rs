//! Group-subset update execution.
//!
//! This module turns a scalar phase, a vector phase and a group index array
//! into one update pass:
//!
//! 1. the scalar phase runs **exactly once**, with the vectorisation index
//!    bound to the sentinel `-1`;
//! 2. the group index array is walked position by position; each position
//!    resolves to an entity identifier and the vector phase runs once with
//!    that identifier bound as the vectorisation index.
//!
//! ## Execution modes
//!
//! ```text
//! group:  [ 3, 7, 1, 9, 4, 0, 8 ]        workers = 3, chunk = ceil(7 / 3) = 3
//!          └─chunk 0─┘ └─chunk 1─┘ └2┘
//!               ↓           ↓       ↓
//!          ┌─worker─┐  ┌─worker─┐ ┌─worker─┐
//!          │ vector │  │ vector │ │ vector │   (in order within a chunk)
//!          └────────┘  └────────┘ └────────┘
//! ```
//!
//! * [`ExecutionMode::Sequential`] runs every iteration on the calling
//!   thread in array order.
//! * [`ExecutionMode::ParallelStatic`] splits the array into contiguous
//!   chunks of `ceil(n / workers)` positions, one per worker. Chunks are
//!   unordered with respect to each other.
//!
//! The scalar phase always completes before the first vector iteration
//! starts, in both modes.
//!
//! ## Failure
//!
//! The first error returned by a phase aborts the pass. Under parallel
//! execution other chunks stop at their next iteration boundary. Writes
//! made by completed iterations stay in place.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::engine::config::{ExecutionMode, UpdateConfig};
use crate::engine::error::ExecutionResult;
use crate::engine::group::check_unique;
use crate::engine::phases::{ScalarPhase, VectorPhase};
use crate::engine::types::{EntityID, PassState, ScalarContext, VectorContext};
use crate::profiling::profiler;


/// Number of positions each worker receives under static scheduling.
///
/// Always at least one, so an empty group never divides by zero.
#[inline]
pub fn static_chunk_len(group_size: usize, workers: usize) -> usize {
    let workers = workers.max(1);
    ((group_size + workers - 1) / workers).max(1)
}

/// Orchestrates group-subset update passes.
///
/// A `GroupUpdater` is reusable: every call to [`GroupUpdater::execute`]
/// starts a fresh pass. When the configuration fixes a worker count the
/// updater owns a dedicated thread pool of that size, otherwise parallel
/// passes run on rayon's global pool.

pub struct GroupUpdater {
    config: UpdateConfig,
    pool: Option<ThreadPool>,
}

impl GroupUpdater {
    /// Creates an updater, building its worker pool if one is configured.
    ///
    /// The pool is built whenever `workers` is set, even for a sequential
    /// configuration, so that [`GroupUpdater::execute_with_mode`] can run
    /// parallel passes on it.
    pub fn new(config: UpdateConfig) -> ExecutionResult<Self> {
        config.validate()?;

        let pool = match config.workers {
            Some(workers) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("group-update-{i}"))
                    .build()?,
            ),
            None => None,
        };

        tracing::debug!(
            mode = %config.mode,
            workers = ?config.workers,
            duplicates = %config.duplicate_policy,
            "group updater created"
        );

        Ok(Self { config, pool })
    }

    /// Sequential updater with default checks.
    pub fn sequential() -> Self {
        Self {
            config: UpdateConfig::sequential(),
            pool: None,
        }
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }

    /// Number of workers a parallel pass distributes iterations across.
    pub fn workers(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Runs one update pass in the configured mode.
    pub fn execute<S, P, V>(&self, scalar: P, vector: &V, group: &[EntityID]) -> ExecutionResult<()>
    where
        P: ScalarPhase<S>,
        V: VectorPhase<S> + ?Sized,
        S: Sync,
    {
        self.execute_with_mode(self.config.mode, scalar, vector, group)
    }

    /// Runs one update pass in `mode`, overriding the configured mode.
    pub fn execute_with_mode<S, P, V>(
        &self,
        mode: ExecutionMode,
        scalar: P,
        vector: &V,
        group: &[EntityID],
    ) -> ExecutionResult<()>
    where
        P: ScalarPhase<S>,
        V: VectorPhase<S> + ?Sized,
        S: Sync,
    {
        let group_size = group.len();
        let workers = if mode.is_parallel() { self.workers() } else { 1 };

        let span = tracing::debug_span!(
            "group_update",
            mode = %mode,
            group_size,
            workers,
            scalar = scalar.name(),
            vector = vector.name(),
        );
        let _entered = span.enter();
        let _profile = profiler::span("GroupUpdater::execute")
            .arg("group_size", profiler::Arg::U64(group_size as u64))
            .arg("mode", profiler::Arg::Str(mode.as_str()));

        if self.config.duplicate_policy.applies_to(mode) {
            check_unique(group).map_err(|e| {
                tracing::warn!(error = %e, "group index rejected");
                e
            })?;
        }

        let mut state = PassState::start();
        tracing::trace!(%state, "pass started");

        let scalars = {
            let _profile = profiler::span("GroupUpdater::scalar");
            scalar.run(&ScalarContext::new(group_size)).map_err(|e| {
                tracing::warn!(error = %e, "scalar phase failed");
                e
            })?
        };

        let result = match mode {
            ExecutionMode::Sequential => run_sequential(&scalars, vector, group, &mut state),
            ExecutionMode::ParallelStatic => self.run_parallel(&scalars, vector, group, workers),
        };

        if let Err(e) = &result {
            tracing::warn!(error = %e, "update pass aborted");
            return result;
        }

        state = state.finish();
        tracing::debug!(%state, iterations = group_size, "update pass completed");
        Ok(())
    }

    fn run_parallel<S, V>(
        &self,
        scalars: &S,
        vector: &V,
        group: &[EntityID],
        workers: usize,
    ) -> ExecutionResult<()>
    where
        V: VectorPhase<S> + ?Sized,
        S: Sync,
    {
        if group.is_empty() {
            return Ok(());
        }

        let chunk_len = static_chunk_len(group.len(), workers);
        let aborted = AtomicBool::new(false);

        let body = || {
            group
                .par_chunks(chunk_len)
                .enumerate()
                .try_for_each(|(chunk_index, chunk)| {
                    let base = chunk_index * chunk_len;
                    let _profile = profiler::span("GroupUpdater::chunk")
                        .arg("first_position", profiler::Arg::U64(base as u64))
                        .arg("len", profiler::Arg::U64(chunk.len() as u64));

                    let mut state = PassState::start();
                    for (offset, &entity) in chunk.iter().enumerate() {
                        if aborted.load(Ordering::Relaxed) {
                            return Ok(());
                        }
                        state = state.enter(base + offset);
                        tracing::trace!(%state, entity, "vector iteration");
                        let ctx = VectorContext::new(base + offset, entity);
                        if let Err(e) = vector.run(scalars, &ctx) {
                            aborted.store(true, Ordering::Relaxed);
                            return Err(e);
                        }
                    }
                    Ok(())
                })
        };

        match &self.pool {
            Some(pool) => pool.install(body),
            None => body(),
        }
    }
}

fn run_sequential<S, V>(
    scalars: &S,
    vector: &V,
    group: &[EntityID],
    state: &mut PassState,
) -> ExecutionResult<()>
where
    V: VectorPhase<S> + ?Sized,
{
    for (position, &entity) in group.iter().enumerate() {
        *state = state.enter(position);
        tracing::trace!(state = %*state, entity, "vector iteration");
        vector.run(scalars, &VectorContext::new(position, entity))?;
    }
    Ok(())
}

//! Scalar and Vector Phase Abstractions
//!
//! This module defines the two executable units a group update is built
//! from.
//!
//! A **scalar phase** runs exactly once per pass, before any member is
//! visited. It computes values that are invariant across the group and
//! returns them as its output `S`.
//!
//! A **vector phase** runs once per group member. It receives the scalar
//! output by reference together with a [`VectorContext`] naming the member,
//! and performs its effects against entity-indexed storage at the resolved
//! identifier.
//!
//! ## Design Goals
//!
//! - **Run-once by construction**
//!   [`ScalarPhase::run`] consumes the phase, so a phase value cannot be
//!   executed twice.
//!
//! - **Explicit context passing**
//!   the vectorisation index is a parameter of both phases instead of a
//!   binding in ambient state.
//!
//! - **Parallel-safe vector bodies**
//!   [`VectorPhase`] requires `Send + Sync` so iterations can run on worker
//!   threads.
//!
//! ## Function-backed Phases
//!
//! [`FnScalarPhase`] and [`FnVectorPhase`] wrap closures with a
//! human-readable name used in logs and profiling spans. The [`scalar`] and
//! [`vector`] constructors are the usual way to build them:
//!
//! ```ignore
//! let setup = scalar("draw", |_ctx| Ok(5.0));
//! let body = vector("assign", |k: &f64, ctx| values.set(ctx.entity(), *k));
//! updater.execute(setup, &body, &group)?;
//! ```

use crate::engine::error::ExecutionResult;
use crate::engine::types::{ScalarContext, VectorContext};


/// Code executed exactly once per update, independent of any entity.

pub trait ScalarPhase<S> {
    /// Human-readable name of this phase.
    fn name(&self) -> &str;

    /// Executes the phase, consuming it, and returns the scalar output.
    fn run(self, ctx: &ScalarContext) -> ExecutionResult<S>;
}

/// Code executed once per entity of the target group.
///
/// Implementations must confine their writes to storage addressed by
/// `ctx.entity()` when the pass runs in parallel.

pub trait VectorPhase<S: ?Sized>: Send + Sync {
    /// Human-readable name of this phase.
    fn name(&self) -> &str;

    /// Executes the phase for one group member.
    fn run(&self, scalars: &S, ctx: &VectorContext) -> ExecutionResult<()>;
}

/// A [`ScalarPhase`] backed by a closure.

pub struct FnScalarPhase<F> {
    name: &'static str,
    f: F,
}

impl<F> FnScalarPhase<F> {
    /// Creates a named closure-backed scalar phase.
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<S, F> ScalarPhase<S> for FnScalarPhase<F>
where
    F: FnOnce(&ScalarContext) -> ExecutionResult<S>,
{
    fn name(&self) -> &str {
        self.name
    }

    fn run(self, ctx: &ScalarContext) -> ExecutionResult<S> {
        (self.f)(ctx)
    }
}

/// A [`VectorPhase`] backed by a closure.

pub struct FnVectorPhase<F> {
    name: &'static str,
    f: F,
}

impl<F> FnVectorPhase<F> {
    /// Creates a named closure-backed vector phase.
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<S, F> VectorPhase<S> for FnVectorPhase<F>
where
    S: ?Sized,
    F: Fn(&S, &VectorContext) -> ExecutionResult<()> + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    fn run(&self, scalars: &S, ctx: &VectorContext) -> ExecutionResult<()> {
        (self.f)(scalars, ctx)
    }
}

/// Shorthand for [`FnScalarPhase::new`].
pub fn scalar<S, F>(name: &'static str, f: F) -> FnScalarPhase<F>
where
    F: FnOnce(&ScalarContext) -> ExecutionResult<S>,
{
    FnScalarPhase::new(name, f)
}

/// Shorthand for [`FnVectorPhase::new`].
pub fn vector<S, F>(name: &'static str, f: F) -> FnVectorPhase<F>
where
    F: Fn(&S, &VectorContext) -> ExecutionResult<()> + Send + Sync,
{
    FnVectorPhase::new(name, f)
}

/// A scalar phase with nothing to compute.
pub fn no_scalar() -> FnScalarPhase<fn(&ScalarContext) -> ExecutionResult<()>> {
    fn noop(_ctx: &ScalarContext) -> ExecutionResult<()> {
        Ok(())
    }
    FnScalarPhase::new("noop", noop as fn(&ScalarContext) -> ExecutionResult<()>)
}

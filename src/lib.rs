//! # Group Update
//!
//! Lowering and execution of "set a state variable across a group of
//! simulation entities".
//!
//! An update pass combines:
//! - a **scalar phase**, run once, computing values shared by the group,
//! - a **vector phase**, run once per group member,
//! - a **group index array** naming the members, visited in order,
//! - an **execution mode**, sequential or parallel-static.
//!
//! During the vector phase the vectorisation index is the member's entity
//! identifier, never its position in the group index array.
//!
//! ## Design Goals
//! - Scalar-before-vector ordering enforced by the executor
//! - Explicit context passing instead of ambient index variables
//! - Parallel CPU execution over a fixed-size worker pool
//! - Bounds-checked, concurrency-safe entity-indexed storage
//!
//! ## Example
//! ```
//! use group_update::prelude::*;
//!
//! let values = EntityColumn::new(8, 0i64);
//! let updater = GroupUpdater::new(UpdateConfig::parallel(Some(2)))?;
//!
//! updater.execute(
//!     scalar("k", |_ctx| Ok(5i64)),
//!     &vector("assign", |k: &i64, ctx: &VectorContext| values.set(ctx.entity(), *k)),
//!     &[0, 2],
//! )?;
//!
//! assert_eq!(values.get(0)?, 5);
//! assert_eq!(values.get(2)?, 5);
//! assert_eq!(values.get(1)?, 0);
//! # Ok::<(), group_update::ExecutionError>(())
//! ```

#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![deny(dead_code)]

pub mod engine;
pub mod codegen;
pub mod profiling;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (Public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use engine::executor::{GroupUpdater, static_chunk_len};

pub use engine::phases::{
    ScalarPhase,
    VectorPhase,
    FnScalarPhase,
    FnVectorPhase,
    scalar,
    vector,
    no_scalar,
};

pub use engine::types::{
    EntityID,
    Position,
    VectorisationIndex,
    ScalarContext,
    VectorContext,
    PassState,
    SCALAR_SENTINEL,
};

pub use engine::group::{GroupIndex, Duplicate, find_duplicate, check_unique, check_bounds};

pub use engine::storage::EntityColumn;

pub use engine::config::{ExecutionMode, DuplicatePolicy, UpdateConfig};

pub use engine::error::{
    ExecutionResult,
    ExecutionError,
    ConfigResult,
    ConfigError,
};

pub use codegen::fragment::{CodeFragment, autoindent, identifiers, word_substitute};
pub use codegen::template::{GroupSetTemplate, openmp_pragma};

pub use profiling::profiler;

// ─────────────────────────────────────────────────────────────────────────────
// Prelude
// ─────────────────────────────────────────────────────────────────────────────

/// Commonly used types.
///
/// Import with:
/// ```rust
/// use group_update::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        GroupUpdater,
        ScalarPhase,
        VectorPhase,
        scalar,
        vector,
        no_scalar,
        EntityID,
        ScalarContext,
        VectorContext,
        VectorisationIndex,
        GroupIndex,
        EntityColumn,
        ExecutionMode,
        DuplicatePolicy,
        UpdateConfig,
        ExecutionError,
        ExecutionResult,
    };
}

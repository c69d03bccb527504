//! Core Identifiers, Contexts, and Pass State
//!
//! This module defines the **fundamental types** shared by every part of the
//! group update engine: entity identifiers, the vectorisation index, the
//! contexts handed to scalar and vector phases, and the state machine a
//! single update pass walks through.
//!
//! ## Vectorisation index
//!
//! Generated per-entity code addresses storage through a *vectorisation
//! index*. The value it takes depends on the phase being executed:
//!
//! | Phase | Vectorisation index |
//! |------:|--------|
//! | scalar | `-1` (not tied to any entity) |
//! | vector | the resolved entity identifier `group[position]` |
//!
//! The vector phase never observes the loop position through this index.
//! Code that needs the position reads [`VectorContext::position`] explicitly.
//!
//! ## Explicit context passing
//!
//! Rather than binding the index into ambient state, both phases receive a
//! context value as an explicit parameter:
//!
//! - [`ScalarContext`] during the one-time scalar setup,
//! - [`VectorContext`] for every group member.
//!
//! ## Pass lifecycle
//!
//! ```text
//! ScalarPending ──► VectorIterating(0) ──► … ──► VectorIterating(n-1) ──► Done
//!       │                                                                 ▲
//!       └──────────────────────── (empty group) ──────────────────────────┘
//! ```
//!
//! There are no cycles and no re-entry. A fresh invocation starts a fresh
//! [`PassState`].

use std::fmt;


/// Identifier of one simulation entity; an index into entity-indexed storage.
pub type EntityID = u32;

/// Position of an entry inside a group index array.
pub type Position = usize;

/// Raw sentinel bound as the vectorisation index during the scalar phase.
pub const SCALAR_SENTINEL: i64 = -1;

/// The per-iteration identity value bound into phase code.
///
/// Holds [`SCALAR_SENTINEL`] during scalar setup and the resolved entity
/// identifier during per-entity execution.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VectorisationIndex(i64);

impl VectorisationIndex {
    /// Index bound while the scalar phase runs.
    pub const SCALAR: VectorisationIndex = VectorisationIndex(SCALAR_SENTINEL);

    /// Index bound while the vector phase runs for `entity`.
    #[inline]
    pub const fn entity(entity: EntityID) -> Self {
        VectorisationIndex(entity as i64)
    }

    /// Returns the raw signed value, `-1` for the scalar sentinel.
    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns `true` if this is the scalar sentinel.
    #[inline]
    pub const fn is_scalar(self) -> bool {
        self.0 == SCALAR_SENTINEL
    }

    /// Returns the entity identifier, or `None` for the scalar sentinel.
    #[inline]
    pub fn as_entity(self) -> Option<EntityID> {
        EntityID::try_from(self.0).ok()
    }
}

impl fmt::Display for VectorisationIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context visible to the scalar phase.
///
/// The scalar phase computes values that are invariant across the group
/// (a constant, a random draw shared by all members, ...). It is not tied to
/// any entity, so its vectorisation index is the sentinel.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalarContext {
    group_size: usize,
}

impl ScalarContext {
    /// Creates the scalar context for a group of `group_size` members.
    #[inline]
    pub fn new(group_size: usize) -> Self {
        Self { group_size }
    }

    /// Always [`VectorisationIndex::SCALAR`].
    #[inline]
    pub fn vectorisation_index(&self) -> VectorisationIndex {
        VectorisationIndex::SCALAR
    }

    /// Number of members the following vector phase will visit.
    #[inline]
    pub fn group_size(&self) -> usize {
        self.group_size
    }
}

/// Context visible to one execution of the vector phase.
///
/// ## Invariants
/// * `position < group_size`
/// * `entity == group[position]`
/// * `vectorisation_index() == entity`, never `position`

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorContext {
    position: Position,
    entity: EntityID,
}

impl VectorContext {
    /// Creates the context for loop position `position` resolving to `entity`.
    #[inline]
    pub fn new(position: Position, entity: EntityID) -> Self {
        Self { position, entity }
    }

    /// Sequential loop position inside the group index array.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Resolved entity identifier, `group[position]`.
    #[inline]
    pub fn entity(&self) -> EntityID {
        self.entity
    }

    /// Vectorisation index bound for this iteration; equals the entity.
    #[inline]
    pub fn vectorisation_index(&self) -> VectorisationIndex {
        VectorisationIndex::entity(self.entity)
    }
}

/// Lifecycle of a single update pass.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassState {
    /// The scalar phase has not completed yet.
    ScalarPending,

    /// The vector phase is running; carries the position most recently
    /// entered on this thread of execution.
    VectorIterating(Position),

    /// All iterations completed. Terminal.
    Done,
}

impl PassState {
    /// Starting state of every pass.
    #[inline]
    pub fn start() -> Self {
        PassState::ScalarPending
    }

    /// Transition into the vector loop at `position`.
    ///
    /// A finished pass never re-enters the loop.
    #[inline]
    pub fn enter(self, position: Position) -> Self {
        debug_assert!(!self.is_done(), "pass re-entered after completion");
        PassState::VectorIterating(position)
    }

    /// Transition into the terminal state.
    #[inline]
    pub fn finish(self) -> Self {
        PassState::Done
    }

    /// Returns `true` once the pass is terminal.
    #[inline]
    pub fn is_done(self) -> bool {
        matches!(self, PassState::Done)
    }
}

impl fmt::Display for PassState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassState::ScalarPending => f.write_str("scalar-pending"),
            PassState::VectorIterating(position) => write!(f, "vector-iterating({position})"),
            PassState::Done => f.write_str("done"),
        }
    }
}

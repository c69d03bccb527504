//! Group index arrays.
//!
//! A group is a named subset of simulation entities. It is represented by an
//! ordered array of entity identifiers; the executor visits the array in
//! order and resolves each position to the identifier stored there.
//!
//! This module provides an owned [`GroupIndex`] plus the precondition checks
//! the executor and callers run against raw identifier slices.

use std::collections::HashMap;
use std::ops::{Deref, Range};

use crate::engine::error::{ExecutionError, ExecutionResult};
use crate::engine::types::{EntityID, Position};


/// Two positions of a group index that hold the same identifier.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Duplicate {
    /// Repeated identifier.
    pub entity: EntityID,

    /// Position of the first occurrence.
    pub first: Position,

    /// Position of the repeated occurrence.
    pub second: Position,
}

impl From<Duplicate> for ExecutionError {
    fn from(d: Duplicate) -> Self {
        ExecutionError::DuplicateIdentifier {
            entity: d.entity,
            first: d.first,
            second: d.second,
        }
    }
}

/// Owned, ordered array of entity identifiers forming one group.
///
/// Dereferences to `[EntityID]`, so it can be passed wherever the executor
/// expects a slice.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupIndex {
    ids: Vec<EntityID>,
}

impl GroupIndex {
    /// Wraps an explicit identifier list, keeping its order.
    pub fn new(ids: Vec<EntityID>) -> Self {
        Self { ids }
    }

    /// Contiguous subgroup `start..stop`.
    pub fn range(range: Range<EntityID>) -> Self {
        Self { ids: range.collect() }
    }

    /// Identifiers in `0..len` whose entity satisfies `predicate`, ascending.
    pub fn from_condition<F>(len: EntityID, mut predicate: F) -> Self
    where
        F: FnMut(EntityID) -> bool,
    {
        Self {
            ids: (0..len).filter(|&id| predicate(id)).collect(),
        }
    }

    /// Number of members (`_num_group_idx`).
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` for an empty group.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Borrowed view of the identifiers.
    #[inline]
    pub fn as_slice(&self) -> &[EntityID] {
        &self.ids
    }

    /// Consumes the group and returns its identifiers.
    pub fn into_vec(self) -> Vec<EntityID> {
        self.ids
    }
}

impl Deref for GroupIndex {
    type Target = [EntityID];

    fn deref(&self) -> &[EntityID] {
        &self.ids
    }
}

impl From<Vec<EntityID>> for GroupIndex {
    fn from(ids: Vec<EntityID>) -> Self {
        Self::new(ids)
    }
}

impl FromIterator<EntityID> for GroupIndex {
    fn from_iter<I: IntoIterator<Item = EntityID>>(iter: I) -> Self {
        Self { ids: iter.into_iter().collect() }
    }
}

/// Returns the first repeated identifier in `ids`, if any.
///
/// "First" means the repeat with the smallest second position.
pub fn find_duplicate(ids: &[EntityID]) -> Option<Duplicate> {
    let mut seen: HashMap<EntityID, Position> = HashMap::with_capacity(ids.len());
    for (position, &entity) in ids.iter().enumerate() {
        if let Some(&first) = seen.get(&entity) {
            return Some(Duplicate { entity, first, second: position });
        }
        seen.insert(entity, position);
    }
    None
}

/// Fails with [`ExecutionError::DuplicateIdentifier`] if any identifier repeats.
pub fn check_unique(ids: &[EntityID]) -> ExecutionResult<()> {
    match find_duplicate(ids) {
        Some(duplicate) => Err(duplicate.into()),
        None => Ok(()),
    }
}

/// Fails with [`ExecutionError::OutOfRangeIdentifier`] for the first
/// identifier that does not address storage of length `len`.
pub fn check_bounds(ids: &[EntityID], len: usize) -> ExecutionResult<()> {
    match ids.iter().find(|&&id| id as usize >= len) {
        Some(&entity) => Err(ExecutionError::OutOfRangeIdentifier { entity, len }),
        None => Ok(()),
    }
}

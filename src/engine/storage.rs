//! Entity-indexed storage.
//!
//! An [`EntityColumn`] holds one state variable for every entity of a
//! simulation, addressed by [`EntityID`]. It is the storage vector phases
//! write through: each iteration resolves its entity identifier and reads or
//! writes the slot at that identifier.
//!
//! ## Concurrency
//!
//! Columns are shared by reference between worker threads during
//! parallel-static passes. Every slot is guarded by a [`BorrowTracker`]
//! entry, so concurrent access is sound even if a caller violates the
//! distinct-identifier precondition; the outcome is then merely
//! order-dependent.
//!
//! ## Bounds
//!
//! Every accessor checks the identifier against the column length and
//! returns [`ExecutionError::OutOfRangeIdentifier`] instead of panicking.
//! This is how an out-of-range group member is detected: by the phase that
//! touches storage, not by the executor.
//!
//! ## Safety
//!
//! This module contains unsafe code for interior mutability
//! (`UnsafeCell`). Each dereference happens while the matching slot borrow
//! is held, and no reference to slot contents escapes the accessor.

use std::cell::UnsafeCell;
use std::fmt;

use crate::engine::borrow::BorrowTracker;
use crate::engine::error::{ExecutionError, ExecutionResult};
use crate::engine::types::EntityID;


/// Fixed-length, entity-indexed storage for values of type `T`.

pub struct EntityColumn<T> {
    values: Box<[UnsafeCell<T>]>,
    borrows: BorrowTracker,
}

// SAFETY: slot contents are only reached through `get`, `set` and `update`,
// which hold the slot's read or write borrow for the whole access. Shared
// reads hand out copies, so `T: Sync` covers concurrent readers and
// `T: Send` covers values written from another thread.
unsafe impl<T: Send + Sync> Sync for EntityColumn<T> {}

impl<T: Clone> EntityColumn<T> {
    /// Creates a column of `len` slots, each initialised to `fill`.
    pub fn new(len: usize, fill: T) -> Self {
        Self::from_vec(vec![fill; len])
    }

    /// Copies every slot into a vector.
    ///
    /// Requires exclusive access, so no pass can be running on this column.
    pub fn to_vec(&mut self) -> Vec<T> {
        self.values.iter_mut().map(|cell| cell.get_mut().clone()).collect()
    }
}

impl<T> EntityColumn<T> {
    /// Creates a column whose slot `i` holds `values[i]`.
    pub fn from_vec(values: Vec<T>) -> Self {
        let borrows = BorrowTracker::new(values.len());
        Self {
            values: values.into_iter().map(UnsafeCell::new).collect(),
            borrows,
        }
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the column has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overwrites the slot of `entity`.
    pub fn set(&self, entity: EntityID, value: T) -> ExecutionResult<()> {
        let slot = self.slot(entity)?;
        let _guard = self.borrows.acquire_write(slot);
        // SAFETY: the write borrow on `slot` is exclusive until `_guard` drops.
        unsafe { *self.values[slot].get() = value };
        Ok(())
    }

    /// Mutates the slot of `entity` in place.
    ///
    /// `f` must not access this column at the same identifier; the slot is
    /// write-locked while `f` runs.
    pub fn update<F>(&self, entity: EntityID, f: F) -> ExecutionResult<()>
    where
        F: FnOnce(&mut T),
    {
        let slot = self.slot(entity)?;
        let _guard = self.borrows.acquire_write(slot);
        // SAFETY: the write borrow on `slot` is exclusive until `_guard` drops,
        // and the `&mut T` does not outlive `f`.
        f(unsafe { &mut *self.values[slot].get() });
        Ok(())
    }

    /// Mutable access to a slot through exclusive ownership of the column.
    pub fn get_mut(&mut self, entity: EntityID) -> ExecutionResult<&mut T> {
        let slot = self.slot(entity)?;
        Ok(self.values[slot].get_mut())
    }

    /// Consumes the column and returns its values in identifier order.
    pub fn into_vec(self) -> Vec<T> {
        self.values
            .into_vec()
            .into_iter()
            .map(UnsafeCell::into_inner)
            .collect()
    }

    fn slot(&self, entity: EntityID) -> ExecutionResult<usize> {
        let slot = entity as usize;
        if slot >= self.values.len() {
            return Err(ExecutionError::OutOfRangeIdentifier {
                entity,
                len: self.values.len(),
            });
        }
        Ok(slot)
    }
}

impl<T: Copy> EntityColumn<T> {
    /// Reads the slot of `entity`.
    pub fn get(&self, entity: EntityID) -> ExecutionResult<T> {
        let slot = self.slot(entity)?;
        let _guard = self.borrows.acquire_read(slot);
        // SAFETY: the read borrow on `slot` excludes writers until `_guard` drops.
        Ok(unsafe { *self.values[slot].get() })
    }
}

impl<T> From<Vec<T>> for EntityColumn<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_vec(values)
    }
}

impl<T> fmt::Debug for EntityColumn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityColumn")
            .field("len", &self.values.len())
            .finish_non_exhaustive()
    }
}

//! # Slot Borrow Tracking
//!
//! This module implements a **per-slot read/write borrow tracker** used by
//! entity-indexed storage.
//!
//! ## Purpose
//!
//! Vector phases running on different workers write storage through shared
//! references. Rust-like borrowing rules are enforced *at runtime*, per
//! entity slot:
//!
//! - Multiple iterations may **read** the same slot concurrently.
//! - Only one iteration may **write** a slot at a time.
//! - No iteration may read a slot while another writes it.
//!
//! When group identifiers are pairwise distinct every iteration touches its
//! own slot and acquisitions never contend.
//!
//! ## State Encoding
//!
//! Each slot maps to one `AtomicU32`:
//!
//! | State | Meaning |
//! |------:|--------|
//! | `0` | Unlocked |
//! | `1` | Write-locked (exclusive writer) |
//! | `>= 2` | Read-locked (`state - 1` active readers) |
//!
//! ## Synchronization Strategy
//!
//! - Uses atomic operations with acquire/release.
//! - Contended acquisitions spin and yield every 1024 attempts.
//! - Slot indices are not bounds-checked here; callers such as
//!   `EntityColumn` validate identifiers first.
//! - The same thread re-acquiring a slot it already holds for writing will
//!   deadlock; guards are therefore never held across user callbacks that
//!   could touch the same slot.

use std::sync::atomic::{AtomicU32, Ordering};


const UNLOCKED: u32 = 0;
const WRITE_LOCKED: u32 = 1;

/// Tracks runtime read/write borrows for each slot of a column.

pub struct BorrowTracker {
    states: Box<[AtomicU32]>,
}

impl BorrowTracker {
    /// Creates a tracker for `len` slots, all unlocked.
    pub fn new(len: usize) -> Self {
        Self {
            states: (0..len).map(|_| AtomicU32::new(UNLOCKED)).collect(),
        }
    }

    /// Number of tracked slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no slots are tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns `true` if no borrow is currently held on `slot`.
    ///
    /// ## Panics
    ///
    /// Panics if `slot >= self.len()`.
    #[inline]
    pub fn is_free(&self, slot: usize) -> bool {
        self.states[slot].load(Ordering::Acquire) == UNLOCKED
    }

    /// Acquires a **shared (read) borrow** on `slot`.
    ///
    /// ## State Transitions
    ///
    /// - `0 → 2` : first reader
    /// - `N → N+1` : additional reader
    ///
    /// ## Panics
    ///
    /// Panics if `slot >= self.len()`.

    pub fn acquire_read(&self, slot: usize) -> ReadGuard<'_> {
        let state = &self.states[slot];
        let mut spins = 0u32;

        loop {
            let current = state.load(Ordering::Acquire);

            if current != WRITE_LOCKED {
                let next = if current == UNLOCKED { 2 } else { current + 1 };
                if state
                    .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed)
                    .is_ok()
                {
                    return ReadGuard { tracker: self, slot };
                }
            }

            spins = spins.wrapping_add(1);
            if spins % 1024 == 0 {
                std::thread::yield_now();
            } else {
                std::hint::spin_loop();
            }
        }
    }

    /// Acquires an **exclusive (write) borrow** on `slot`.
    ///
    /// ## State Transition
    ///
    /// - `0 → 1`
    ///
    /// ## Panics
    ///
    /// Panics if `slot >= self.len()`.

    pub fn acquire_write(&self, slot: usize) -> WriteGuard<'_> {
        let state = &self.states[slot];
        let mut spins = 0u32;

        loop {
            if state
                .compare_exchange_weak(UNLOCKED, WRITE_LOCKED, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                return WriteGuard { tracker: self, slot };
            }

            spins = spins.wrapping_add(1);
            if spins % 1024 == 0 {
                std::thread::yield_now();
            } else {
                std::hint::spin_loop();
            }
        }
    }

    fn release_read(&self, slot: usize) {
        let state = &self.states[slot];
        let previous = state.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous >= 2);
        if previous == 2 {
            // Last reader: 2 - 1 leaves 1, which would read as write-locked.
            state.store(UNLOCKED, Ordering::Release);
        }
    }

    fn release_write(&self, slot: usize) {
        let previous = self.states[slot].swap(UNLOCKED, Ordering::AcqRel);
        debug_assert_eq!(previous, WRITE_LOCKED);
    }
}

/// RAII shared borrow of one slot.

pub struct ReadGuard<'a> {
    tracker: &'a BorrowTracker,
    slot: usize,
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.tracker.release_read(self.slot);
    }
}

/// RAII exclusive borrow of one slot.

pub struct WriteGuard<'a> {
    tracker: &'a BorrowTracker,
    slot: usize,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.tracker.release_write(self.slot);
    }
}

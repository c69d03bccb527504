//! # Engine Module
//!
//! Group update engine implementation.
//!
//! This module contains the building blocks of a group-subset update:
//! - Identifiers, contexts and pass state
//! - Scalar and vector phases
//! - Group index arrays
//! - Entity-indexed storage and slot borrow tracking
//! - Configuration and errors
//! - The executor tying them together
//!
//! Public API exposure is controlled by `lib.rs`.

pub mod types;
pub mod error;
pub mod config;
pub mod group;
pub mod borrow;
pub mod storage;
pub mod phases;
pub mod executor;

//! # Code Emission Backend
//!
//! Source-to-source rendering of the group update contract.
//!
//! The engine executes scalar and vector phases as Rust values. When the
//! target instead compiles generated code, the same contract is rendered
//! from opaque code fragments:
//!
//! - [`fragment`]: [`CodeFragment`](fragment::CodeFragment), identifier
//!   extraction, whole-word substitution, auto-indentation
//! - [`template`]: the C++ loop template and its OpenMP annotation

pub mod fragment;
pub mod template;

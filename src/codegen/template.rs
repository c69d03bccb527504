//! C++ rendering of the group variable-set loop.
//!
//! The executor in [`crate::engine::executor`] runs the scalar/vector
//! contract directly. This backend renders the same contract as standalone
//! C++ source for targets that compile generated code instead:
//!
//! ```text
//! //// MAIN CODE ////////////
//! // scalar code
//! const int _vectorisation_idx = -1;
//! <scalar code>
//!
//! #pragma omp parallel for schedule(static)      (parallel-static only)
//! for(int _idx_group_idx=0; _idx_group_idx<_num_group_idx; _idx_group_idx++)
//! {
//!     // vector code
//!     const int _idx = <group index>[_idx_group_idx];
//!     const int _vectorisation_idx = _idx;
//!     <vector code>
//! }
//! ```

use std::collections::BTreeSet;

use crate::codegen::fragment::CodeFragment;
use crate::engine::config::ExecutionMode;


/// Name of the loop bound holding the group size.
pub const NUM_GROUP_IDX: &str = "_num_group_idx";

/// Default name of the group index array variable.
pub const GROUP_IDX: &str = "_group_idx";

const INDENT: &str = "    ";

/// Loop annotation for `mode`; empty when the loop runs sequentially.
pub fn openmp_pragma(mode: ExecutionMode) -> &'static str {
    match mode {
        ExecutionMode::Sequential => "",
        ExecutionMode::ParallelStatic => "#pragma omp parallel for schedule(static)",
    }
}

/// Source template for "set a variable across a group of entities".

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupSetTemplate {
    /// Code run once before the loop.
    pub scalar_code: CodeFragment,

    /// Code run once per group member.
    pub vector_code: CodeFragment,

    /// Name of the array holding the group's entity identifiers.
    pub group_index_var: String,
}

impl GroupSetTemplate {
    /// Creates a template indexing through [`GROUP_IDX`].
    pub fn new(scalar_code: impl Into<CodeFragment>, vector_code: impl Into<CodeFragment>) -> Self {
        Self {
            scalar_code: scalar_code.into(),
            vector_code: vector_code.into(),
            group_index_var: GROUP_IDX.to_string(),
        }
    }

    /// Returns a copy indexing through `name` instead.
    pub fn with_group_index_var(mut self, name: impl Into<String>) -> Self {
        self.group_index_var = name.into();
        self
    }

    /// Identifiers the rendered code needs from its surroundings or declares
    /// itself: everything the fragments mention plus the loop inputs.
    pub fn used_identifiers(&self) -> BTreeSet<String> {
        let mut used: BTreeSet<String> = self
            .scalar_code
            .identifiers()
            .union(self.vector_code.identifiers())
            .cloned()
            .collect();
        used.insert(self.group_index_var.clone());
        used.insert(NUM_GROUP_IDX.to_string());
        used
    }

    /// Renders the loop for `mode`.
    pub fn render(&self, mode: ExecutionMode) -> String {
        let mut lines: Vec<String> = vec![
            "//// MAIN CODE ////////////".to_string(),
            "// scalar code".to_string(),
            "const int _vectorisation_idx = -1;".to_string(),
        ];
        if !self.scalar_code.is_empty() {
            lines.push(self.scalar_code.indented(""));
        }
        lines.push(String::new());

        let pragma = openmp_pragma(mode);
        if !pragma.is_empty() {
            lines.push(pragma.to_string());
        }

        lines.push(format!(
            "for(int _idx_group_idx=0; _idx_group_idx<{NUM_GROUP_IDX}; _idx_group_idx++)"
        ));
        lines.push("{".to_string());
        lines.push(format!("{INDENT}// vector code"));
        lines.push(format!("{INDENT}const int _idx = {}[_idx_group_idx];", self.group_index_var));
        lines.push(format!("{INDENT}const int _vectorisation_idx = _idx;"));
        if !self.vector_code.is_empty() {
            lines.push(self.vector_code.indented(INDENT));
        }
        lines.push("}".to_string());

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

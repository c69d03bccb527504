use std::collections::HashMap;

use group_update::codegen::fragment::{autoindent, identifiers, word_substitute, CodeFragment};
use group_update::codegen::template::{openmp_pragma, GroupSetTemplate, GROUP_IDX, NUM_GROUP_IDX};
use group_update::engine::config::ExecutionMode;

#[test]
fn identifiers_skip_numbers_and_punctuation() {
    let found = identifiers("v = v0 + 1e5 * _rand(_vectorisation_idx) - 0x1f;");
    let found: Vec<&str> = found.into_iter().collect();
    assert_eq!(found, vec!["_rand", "_vectorisation_idx", "v", "v0"]);

    assert!(identifiers("").is_empty());
    assert!(identifiers("1 + 2.5").is_empty());
}

#[test]
fn fragment_tracks_identifier_usage() {
    let fragment = CodeFragment::new("_ptr_v[_idx] = k;");
    assert!(fragment.uses("_idx"));
    assert!(fragment.uses("k"));
    assert!(!fragment.uses("_ptr"));
    assert!(!fragment.is_empty());
    assert!(CodeFragment::new("  \n\t").is_empty());
    assert_eq!(fragment.to_string(), "_ptr_v[_idx] = k;");
}

#[test]
fn substitution_replaces_whole_words_only() {
    let mut map = HashMap::new();
    map.insert("v", "_ptr_array_neurongroup_v[_idx]");
    map.insert("k", "_k");

    assert_eq!(
        word_substitute("v = v0 + k*v_rest;", &map),
        "_ptr_array_neurongroup_v[_idx] = v0 + _k*v_rest;"
    );

    let fragment = CodeFragment::new("v += k;").substitute(&map);
    assert!(fragment.uses("_ptr_array_neurongroup_v"));
    assert!(!fragment.uses("v"));
}

#[test]
fn autoindent_normalises_common_prefix() {
    let code = "\n        a = 1;\n            b = 2;\n\n        c = 3;\n    \n";
    assert_eq!(autoindent(code, "    "), "    a = 1;\n        b = 2;\n\n    c = 3;");
    assert_eq!(autoindent("   \n  ", "    "), "");
    assert_eq!(autoindent("x;", ""), "x;");
}

#[test]
fn pragma_follows_execution_mode() {
    assert_eq!(openmp_pragma(ExecutionMode::Sequential), "");
    assert_eq!(
        openmp_pragma(ExecutionMode::ParallelStatic),
        "#pragma omp parallel for schedule(static)"
    );
}

#[test]
fn renders_sequential_loop() {
    let template = GroupSetTemplate::new(
        "const double k = 5;",
        "    _ptr_array_v[_idx] = k;",
    );

    let expected = "\
//// MAIN CODE ////////////
// scalar code
const int _vectorisation_idx = -1;
const double k = 5;

for(int _idx_group_idx=0; _idx_group_idx<_num_group_idx; _idx_group_idx++)
{
    // vector code
    const int _idx = _group_idx[_idx_group_idx];
    const int _vectorisation_idx = _idx;
    _ptr_array_v[_idx] = k;
}
";
    assert_eq!(template.render(ExecutionMode::Sequential), expected);
}

#[test]
fn renders_parallel_loop_with_custom_index_array() {
    let template = GroupSetTemplate::new("", "_ptr_array_v[_idx] = 2 * _idx;")
        .with_group_index_var("_array_subgroup_idx");

    let rendered = template.render(ExecutionMode::ParallelStatic);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "#pragma omp parallel for schedule(static)");
    assert!(lines[5].starts_with("for(int _idx_group_idx=0;"));
    assert!(rendered.contains("    const int _idx = _array_subgroup_idx[_idx_group_idx];\n"));
    assert!(rendered.ends_with("    _ptr_array_v[_idx] = 2 * _idx;\n}\n"));

    // The scalar block binds the sentinel before the loop binds the entity.
    let sentinel = rendered.find("_vectorisation_idx = -1").unwrap();
    let entity = rendered.find("_vectorisation_idx = _idx").unwrap();
    assert!(sentinel < entity);
}

#[test]
fn used_identifiers_include_loop_inputs() {
    let template = GroupSetTemplate::new("const double k = rand();", "_ptr_array_v[_idx] = k;");
    let used = template.used_identifiers();

    for name in ["k", "rand", "_ptr_array_v", "_idx", GROUP_IDX, NUM_GROUP_IDX] {
        assert!(used.contains(name), "missing {name}");
    }
}

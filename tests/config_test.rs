use std::collections::HashMap;

use group_update::engine::config::{
    DuplicatePolicy, ExecutionMode, UpdateConfig, DUPLICATES_ENV, MODE_ENV, WORKERS_ENV,
};
use group_update::engine::error::ConfigError;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn mode_names_round_trip_through_strings() {
    assert_eq!("sequential".parse::<ExecutionMode>().unwrap(), ExecutionMode::Sequential);
    assert_eq!(
        " Parallel-Static ".parse::<ExecutionMode>().unwrap(),
        ExecutionMode::ParallelStatic
    );
    assert_eq!(ExecutionMode::ParallelStatic.to_string(), "parallel-static");
    assert!(ExecutionMode::ParallelStatic.is_parallel());
    assert!(!ExecutionMode::Sequential.is_parallel());

    assert!(matches!(
        "dynamic".parse::<ExecutionMode>(),
        Err(ConfigError::UnknownMode(name)) if name == "dynamic"
    ));
}

#[test]
fn duplicate_policy_applies_per_mode() {
    use DuplicatePolicy::*;
    use ExecutionMode::*;

    assert!(Always.applies_to(Sequential));
    assert!(Always.applies_to(ParallelStatic));
    assert!(!ParallelOnly.applies_to(Sequential));
    assert!(ParallelOnly.applies_to(ParallelStatic));
    assert!(!Never.applies_to(ParallelStatic));

    assert_eq!("parallel-only".parse::<DuplicatePolicy>().unwrap(), ParallelOnly);
    assert!(matches!(
        "sometimes".parse::<DuplicatePolicy>(),
        Err(ConfigError::UnknownDuplicatePolicy(_))
    ));
}

#[test]
fn defaults_are_sequential_with_parallel_checks() {
    let config = UpdateConfig::default();
    assert_eq!(config.mode, ExecutionMode::Sequential);
    assert_eq!(config.workers, None);
    assert_eq!(config.duplicate_policy, DuplicatePolicy::ParallelOnly);
    assert_eq!(config, UpdateConfig::sequential());
}

#[test]
fn json_documents_fill_missing_fields() {
    let config = UpdateConfig::from_json(r#"{ "mode": "parallel-static", "workers": 8 }"#).unwrap();
    assert_eq!(config, UpdateConfig::parallel(Some(8)));

    let config = UpdateConfig::from_json(r#"{ "duplicate_policy": "always" }"#).unwrap();
    assert_eq!(config.mode, ExecutionMode::Sequential);
    assert_eq!(config.duplicate_policy, DuplicatePolicy::Always);

    let encoded = serde_json::to_string(&UpdateConfig::parallel(None)).unwrap();
    assert!(encoded.contains("\"parallel-static\""));
}

#[test]
fn json_documents_are_validated() {
    assert!(matches!(
        UpdateConfig::from_json(r#"{ "workers": 0 }"#),
        Err(ConfigError::InvalidWorkers(_))
    ));
    assert!(matches!(
        UpdateConfig::from_json(r#"{ "mode": "guided" }"#),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        UpdateConfig::from_json(r#"{ "threads": 2 }"#),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn environment_lookup_overrides_defaults() {
    let config = UpdateConfig::from_lookup(lookup(&[
        (MODE_ENV, "parallel-static"),
        (WORKERS_ENV, " 6 "),
        (DUPLICATES_ENV, "never"),
    ]))
    .unwrap();

    assert_eq!(config.mode, ExecutionMode::ParallelStatic);
    assert_eq!(config.workers, Some(6));
    assert_eq!(config.duplicate_policy, DuplicatePolicy::Never);

    let config = UpdateConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, UpdateConfig::default());
}

#[test]
fn environment_lookup_rejects_bad_values() {
    assert!(matches!(
        UpdateConfig::from_lookup(lookup(&[(WORKERS_ENV, "many")])),
        Err(ConfigError::InvalidWorkers(v)) if v == "many"
    ));
    assert!(matches!(
        UpdateConfig::from_lookup(lookup(&[(WORKERS_ENV, "0")])),
        Err(ConfigError::InvalidWorkers(_))
    ));
    assert!(matches!(
        UpdateConfig::from_lookup(lookup(&[(MODE_ENV, "static")])),
        Err(ConfigError::UnknownMode(_))
    ));
}

#[test]
fn json_and_environment_accept_the_same_spellings() {
    let from_json = UpdateConfig::from_json(
        r#"{ "mode": " Parallel-Static ", "duplicate_policy": "NEVER" }"#,
    )
    .unwrap();
    let from_env = UpdateConfig::from_lookup(lookup(&[
        (MODE_ENV, " Parallel-Static "),
        (DUPLICATES_ENV, "NEVER"),
    ]))
    .unwrap();

    assert_eq!(from_json, from_env);
    assert_eq!(from_json.mode, ExecutionMode::ParallelStatic);
    assert_eq!(from_json.duplicate_policy, DuplicatePolicy::Never);

    assert!(matches!(
        UpdateConfig::from_json(r#"{ "duplicate_policy": "sometimes" }"#),
        Err(ConfigError::Json(_))
    ));
}

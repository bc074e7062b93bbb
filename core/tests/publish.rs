//! All-or-nothing persistence of a generation run.

use chrono::Utc;
use echowealth_core::{
    error::DatasetError,
    pipeline::{publish, DatasetPipeline},
    store::ProfileStore,
    writer::DatasetWriter,
};
use std::path::Path;

fn entries(dir: &Path) -> Vec<String> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn unopenable_ledger_writes_no_artifacts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out");
    let ledger = dir.path().join("missing").join("ledger.db");

    let run = DatasetPipeline::build_test("publish-open-test".into(), 1).unwrap().run(20).unwrap();
    let result = publish(
        &run,
        &DatasetWriter::new(&out),
        Some(ledger.to_str().unwrap()),
        "0.1.0-test",
        Utc::now(),
    );

    assert!(matches!(result, Err(DatasetError::Database(_))), "Expected a database error");
    assert!(entries(&out).is_empty(), "Artifacts written despite ledger failure: {:?}", entries(&out));
}

#[test]
fn rejected_ledger_insert_writes_no_artifacts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out");
    let ledger = dir.path().join("ledger.db");
    let ledger = ledger.to_str().unwrap();

    let run = DatasetPipeline::build_test("publish-dup-test".into(), 2).unwrap().run(10).unwrap();
    {
        // Same run id already recorded: insert_run violates the primary key.
        let store = ProfileStore::open(ledger).unwrap();
        store.migrate().unwrap();
        store
            .insert_run(&run.run_id, run.seed, "0.1.0-test", 10, Utc::now())
            .unwrap();
    }

    let result = publish(&run, &DatasetWriter::new(&out), Some(ledger), "0.1.0-test", Utc::now());

    assert!(result.is_err(), "Duplicate run id must fail");
    assert!(entries(&out).is_empty(), "Artifacts written despite ledger failure: {:?}", entries(&out));
}

#[test]
fn successful_publish_commits_artifacts_and_ledger() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out");
    let ledger = dir.path().join("ledger.db");
    let ledger = ledger.to_str().unwrap();

    let run = DatasetPipeline::build_test("publish-ok-test".into(), 3).unwrap().run(8).unwrap();
    let writer = DatasetWriter::new(&out);
    let (metadata, _) = publish(&run, &writer, Some(ledger), "0.1.0-test", Utc::now()).unwrap();

    assert_eq!(
        entries(&out),
        vec!["dataset_metadata.json", "training_features.json", "training_labels.json"]
    );
    assert_eq!(writer.read_metadata().unwrap().sample_count, metadata.sample_count);
    let store = ProfileStore::open(ledger).unwrap();
    assert_eq!(store.profile_count("publish-ok-test").unwrap(), 8);
}

#[test]
fn zero_profiles_fails_before_any_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out");

    let pipeline = DatasetPipeline::build_test("publish-zero-test".into(), 4).unwrap();
    let err = pipeline.run(0).unwrap_err();

    assert!(
        matches!(err, DatasetError::InvalidProfileCount { requested: 0 }),
        "Unexpected error: {err}"
    );
    assert!(entries(&out).is_empty());
    assert!(entries(dir.path()).is_empty(), "Nothing may be created for an empty run");
}

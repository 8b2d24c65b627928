use rask_logger_control::app::{Command, CommandRunner, ReconcileOutcome};
use rask_logger_control::{
    CreationPolicy, InMemoryRegistry, Level, LevelMap, LevelMapCodec, WireFormat,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::level_filters::LevelFilter;

fn map(pairs: &[(&str, u16)]) -> LevelMap {
    LevelMap::from_pairs(pairs.iter().map(|(n, l)| (*n, Level::new(*l)))).unwrap()
}

fn write_map(dir: &Path, file: &str, codec: &LevelMapCodec, levels: &LevelMap) -> PathBuf {
    let path = dir.join(file);
    std::fs::write(&path, codec.encode(levels).unwrap()).unwrap();
    path
}

fn runner(format: WireFormat) -> CommandRunner {
    CommandRunner::new(
        LevelMapCodec::new(format),
        CreationPolicy::FailFast,
        LevelFilter::INFO,
    )
}

#[test]
fn test_diff_and_apply_diff_commands() {
    let temp_dir = TempDir::new().unwrap();
    let codec = LevelMapCodec::new(WireFormat::Json);
    let base = write_map(
        temp_dir.path(),
        "base.json",
        &codec,
        &map(&[("root", 30), ("a.b", 10)]),
    );
    let target = write_map(
        temp_dir.path(),
        "target.json",
        &codec,
        &map(&[("root", 30), ("a.b", 20), ("c", 5)]),
    );
    let runner = runner(WireFormat::Json);
    let loggers = InMemoryRegistry::new();

    let diff_bytes = runner
        .run(
            &Command::Diff {
                target,
                base: base.clone(),
            },
            &loggers,
        )
        .unwrap();
    assert_eq!(diff_bytes, br#"{"l":{"a.b":20,"c":5}}"#);

    let diff = temp_dir.path().join("diff.json");
    std::fs::write(&diff, &diff_bytes).unwrap();
    let merged = runner
        .run(&Command::ApplyDiff { base, diff }, &loggers)
        .unwrap();
    assert_eq!(
        codec.decode(&merged).unwrap(),
        map(&[("root", 30), ("a.b", 20), ("c", 5)])
    );
}

#[test]
fn test_binary_wire_format() {
    let temp_dir = TempDir::new().unwrap();
    let codec = LevelMapCodec::new(WireFormat::Binary);
    let base = write_map(temp_dir.path(), "base.bin", &codec, &map(&[("x", 40)]));
    let target = write_map(temp_dir.path(), "target.bin", &codec, &map(&[("x", 0)]));

    let output = runner(WireFormat::Binary)
        .run(&Command::Diff { target, base }, &InMemoryRegistry::new())
        .unwrap();

    let diff = codec.decode(&output).unwrap();
    assert_eq!(diff.explicit("x"), Some(Level::UNSET));
}

#[test]
fn test_reconcile_command_outputs_json_report() {
    let temp_dir = TempDir::new().unwrap();
    let codec = LevelMapCodec::new(WireFormat::Json);
    let current = write_map(
        temp_dir.path(),
        "current.json",
        &codec,
        &map(&[("root", 0), ("x", 40)]),
    );
    let desired = write_map(temp_dir.path(), "desired.json", &codec, &map(&[("root", 0)]));

    let output = runner(WireFormat::Json)
        .run(
            &Command::Reconcile {
                current,
                desired,
                dry_run: false,
            },
            &InMemoryRegistry::new(),
        )
        .unwrap();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["would_change"], true);
    assert_eq!(report["updated"], 1);
    assert_eq!(report["levels"]["l"]["x"], 0);
    assert_eq!(report["diff"]["l"]["x"], 0);
    assert!(report["rejected"].as_array().unwrap().is_empty());
}

#[test]
fn test_reconcile_outcome_type_is_reachable() {
    let outcome: ReconcileOutcome = runner(WireFormat::Json)
        .reconcile(&map(&[("a", 10)]), &map(&[("a", 10)]), false)
        .unwrap();
    assert!(!outcome.would_change);
    assert!(outcome.diff.is_empty());
}

#[test]
fn test_filter_command() {
    let temp_dir = TempDir::new().unwrap();
    let codec = LevelMapCodec::new(WireFormat::Json);
    let path = write_map(
        temp_dir.path(),
        "map.json",
        &codec,
        &map(&[("root", 30), ("app.db", 10), ("app.http", 0)]),
    );

    let output = runner(WireFormat::Json)
        .run(&Command::Filter { map: path }, &InMemoryRegistry::new())
        .unwrap();
    assert_eq!(String::from_utf8(output).unwrap(), "warn,app::db=debug\n");
}

#[test]
fn test_levels_command_snapshots_own_registry() {
    let loggers = InMemoryRegistry::with_loggers([("rask_logger_control", Level::DEBUG)]);

    let output = runner(WireFormat::Json)
        .run(&Command::Levels, &loggers)
        .unwrap();
    assert_eq!(output, br#"{"l":{"rask_logger_control":10,"root":0}}"#);
}

#[test]
fn test_missing_input_file_is_an_error() {
    let result = runner(WireFormat::Json).run(
        &Command::Filter {
            map: PathBuf::from("/nonexistent/map.json"),
        },
        &InMemoryRegistry::new(),
    );
    assert!(result.is_err());
}

#[test]
fn test_malformed_input_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.json");
    std::fs::write(&path, br#"{"l":{"a":-1}}"#).unwrap();

    let result =
        runner(WireFormat::Json).run(&Command::Filter { map: path }, &InMemoryRegistry::new());
    assert!(result.is_err());
}

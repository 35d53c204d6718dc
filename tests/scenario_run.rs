//! End-to-end runs: script file in, CSV report out.

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use logop_sim::config::Config;
use logop_sim::executor::{execute_scenario, run_scenarios, SCRIPT_COPY_NAME};
use logop_sim::report::{DATA_FILE, HISTOGRAM_FILE, LOCATIONS_FILE};

const JSON_SCRIPT: &str = r#"[
    {"operation": "add_user", "data": {"user_id": "u1"}},
    {"operation": "add_logical_operation", "data": {"user_id": "u1", "logical_operation": ["a", "b"], "score": 0.7}},
    {"operation": "add_logical_operation", "data": {"user_id": "u1", "logical_operation": ["c"], "score": 0.3}},
    {"operation": "set_session", "data": {"user_id": "u1", "session_id": "s1"}},
    {"operation": "generate_text", "data": {"user_id": "u1", "text_size": 10}}
]"#;

const LINE_SCRIPT: &str = "\
ADD_USER:: u2
ADD_OPERATIONS:: u2 :: 1.0 :: x | y z
SET_SESSION:: u2 :: s7
GENERATE_TEXT:: u2 :: 5
";

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn json_scenario_writes_all_artifacts() {
    let tmp = tempdir().unwrap();
    let script = tmp.path().join("s1.json");
    fs::write(&script, JSON_SCRIPT).unwrap();
    let out = tmp.path().join("out");

    let report = execute_scenario(&script, &out, &Config::default()).unwrap();

    assert_eq!(fs::read_to_string(out.join(SCRIPT_COPY_NAME)).unwrap(), JSON_SCRIPT);

    let data = read_lines(&out.join(DATA_FILE));
    assert_eq!(data.len(), report.data.len());
    assert!((10..=20).contains(&data.len()));
    let first: Vec<_> = data[0].split(',').collect();
    assert_eq!(first.len(), 11);
    assert_eq!(first[0], "PA");
    assert_eq!(first[1], "s1");
    assert_eq!(first[4], "0");
    assert_eq!(first[5], "unix_timestamp0");
    assert_eq!(first[6], "u1");
    assert_eq!(&first[7..], &["1", "2", "3", "4"]);

    let info = read_lines(&out.join(LOCATIONS_FILE));
    assert_eq!(info[0], ",logical_operation,begin_index,end_index,text_index");
    assert_eq!(info.len(), 11);

    let hist = read_lines(&out.join(HISTOGRAM_FILE));
    assert_eq!(hist[0], ",logical_operation,cnt,percentage,user_id");
    let total: usize = report.histogram.iter().map(|r| r.cnt).sum();
    assert_eq!(total, 10);
}

#[test]
fn same_script_same_seed_same_report() {
    let tmp = tempdir().unwrap();
    let script = tmp.path().join("s1.json");
    fs::write(&script, JSON_SCRIPT).unwrap();

    let a = execute_scenario(&script, &tmp.path().join("a"), &Config::default()).unwrap();
    let b = execute_scenario(&script, &tmp.path().join("b"), &Config::default()).unwrap();

    let symbols = |r: &logop_sim::report::Report| {
        r.data.iter().map(|row| row.construct_id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(symbols(&a), symbols(&b));
    assert_eq!(a.locations, b.locations);
    assert_eq!(a.histogram, b.histogram);
    assert_eq!(
        fs::read_to_string(tmp.path().join("a").join(LOCATIONS_FILE)).unwrap(),
        fs::read_to_string(tmp.path().join("b").join(LOCATIONS_FILE)).unwrap()
    );
}

#[test]
fn failing_script_aborts_unless_told_to_continue() {
    let tmp = tempdir().unwrap();
    let script = tmp.path().join("bad.txt");
    fs::write(&script, "ADD_USER:: u1\nADD_USER:: u1\nADD_USER:: u2\n").unwrap();

    let err = execute_scenario(&script, &tmp.path().join("strict"), &Config::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("already exists"));
    assert!(!tmp.path().join("strict").join(DATA_FILE).exists());

    let lenient = Config {
        continue_on_error: true,
        ..Config::default()
    };
    let report = execute_scenario(&script, &tmp.path().join("lenient"), &lenient).unwrap();
    assert!(report.data.is_empty());
    assert_eq!(fs::read_to_string(tmp.path().join("lenient").join(DATA_FILE)).unwrap(), "");
    assert_eq!(read_lines(&tmp.path().join("lenient").join(HISTOGRAM_FILE)).len(), 1);
}

#[test]
fn scenario_directory_honours_filters() {
    let tmp = tempdir().unwrap();
    let scenarios = tmp.path().join("scenarios");
    fs::create_dir_all(&scenarios).unwrap();
    fs::write(scenarios.join("s1.json"), JSON_SCRIPT).unwrap();
    fs::write(scenarios.join("s2"), LINE_SCRIPT).unwrap();
    fs::write(scenarios.join("s3"), LINE_SCRIPT).unwrap();

    let config = Config {
        scenarios_dir: scenarios,
        output_dir: tmp.path().join("out"),
        include: vec!["s1.json".to_string(), "s2".to_string(), "s3".to_string()],
        exclude: vec!["s3".to_string()],
        ..Config::default()
    };
    let written = run_scenarios(&config).unwrap();

    assert_eq!(
        written,
        vec![
            tmp.path().join("out").join("case_s1.json"),
            tmp.path().join("out").join("case_s2"),
        ]
    );
    let data = read_lines(&written[1].join(DATA_FILE));
    assert!(data.iter().all(|row| row.contains(",s7,") && row.contains(",u2,")));
    assert!(!tmp.path().join("out").join("case_s3").exists());
}

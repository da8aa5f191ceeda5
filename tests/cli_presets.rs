use std::fs;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_powernet-sim"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("powernet-sim process should run")
}

fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "run failed for {args:?}: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout should be valid UTF-8")
}

fn parse_metric(stdout: &str, label: &str) -> f64 {
    let line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("missing KPI line `{label}` in output: {stdout}"));

    let raw = line
        .split_once(':')
        .map(|(_, right)| right.trim())
        .unwrap_or_else(|| panic!("invalid KPI format for line `{line}`"));

    raw.split_whitespace()
        .next()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or_else(|| panic!("invalid numeric KPI value in line `{line}`"))
}

#[test]
fn presets_run_via_cli_and_produce_distinct_dynamics() {
    let baseline = run_ok(&["--preset", "baseline", "--quiet"]);
    let scarcity = run_ok(&["--preset", "scarcity", "--quiet"]);

    assert_eq!(parse_metric(&baseline, "Brownout ticks:"), 0.0);
    assert!(parse_metric(&scarcity, "Brownout ticks:") > 0.0);
    assert!(parse_metric(&scarcity, "Unmet demand:") > 0.0);
}

#[test]
fn per_tick_lines_are_printed_unless_quiet() {
    let verbose = run_ok(&["--preset", "idle", "--ticks", "5"]);
    let quiet = run_ok(&["--preset", "idle", "--ticks", "5", "--quiet"]);

    assert_eq!(verbose.lines().filter(|l| l.starts_with("t=")).count(), 5);
    assert_eq!(quiet.lines().filter(|l| l.starts_with("t=")).count(), 0);
    assert!(quiet.contains("--- KPI Report ---"));
}

#[test]
fn telemetry_csv_has_one_row_per_tick() {
    let path = std::env::temp_dir().join(format!("powernet-sim-{}.csv", std::process::id()));
    let path_str = path.to_string_lossy().into_owned();

    run_ok(&[
        "--preset",
        "player_exchange",
        "--ticks",
        "10",
        "--quiet",
        "--telemetry-out",
        &path_str,
    ]);

    let csv = fs::read_to_string(&path).expect("telemetry file should exist");
    fs::remove_file(&path).ok();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 11);
    assert!(lines[0].starts_with("tick,time_s,demand"));
}

#[test]
fn scenario_file_is_loaded() {
    let path = std::env::temp_dir().join(format!("powernet-sim-{}.toml", std::process::id()));
    fs::write(
        &path,
        r#"
[simulation]
ticks = 3

[[storages]]
energy = 10.0
energy_capacity = 10.0

[[consumers]]
base_power_consumption = 5.0
"#,
    )
    .expect("scenario file should be writable");

    let stdout = run_ok(&["--scenario", &path.to_string_lossy(), "--quiet"]);
    fs::remove_file(&path).ok();

    // Two full ticks, then the storage is empty.
    assert_eq!(parse_metric(&stdout, "Brownout ticks:"), 1.0);
    assert_eq!(parse_metric(&stdout, "Final stored energy:"), 0.0);
}

#[test]
fn invalid_input_fails() {
    assert!(!run(&["--preset", "nonexistent"]).status.success());
    assert!(!run(&["--preset", "idle", "--ticks", "0"]).status.success());
    assert!(
        !run(&["--preset", "idle", "--scenario", "x.toml"])
            .status
            .success()
    );
}

use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "gamegift-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn script_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("scripts")
        .join(name)
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_gamegift-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("stale-fetch"));
}

#[test]
fn cli_runs_catalog_and_script_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_gamegift-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args(["--report", "json", "--script"])
        .arg(script_path("invite_flow.json"))
        .arg("--output")
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let content = std::fs::read_to_string(output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    assert_eq!(report["failed"], 0);
    let scripted = "invite two friends to a rated game";
    assert!(
        report["results"]
            .as_array()
            .is_some_and(|r| r.iter().any(|x| x["scenario_name"] == scripted))
    );
}

#[test]
fn cli_fails_on_broken_script() {
    let exe = env!("CARGO_BIN_EXE_gamegift-tester");
    let broken = temp_path("broken");
    std::fs::write(&broken, "{ not json").expect("write script");
    let status = Command::new(exe)
        .args(["--scenarios", "roster-order", "--report", "markdown", "--script"])
        .arg(&broken)
        .arg("--output")
        .arg(temp_path("broken-report"))
        .status()
        .expect("run cli");
    assert_eq!(status.code(), Some(1));
}

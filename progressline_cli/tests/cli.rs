use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the user's configuration
fn progressline(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("progressline").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("COLUMNS");
    cmd
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    progressline(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_render_default_preset() {
    let home = TempDir::new().unwrap();
    progressline(&home)
        .args(["render", "--value", "50", "--max", "100", "--elapsed", "10"])
        .args(["--width", "40"])
        .assert()
        .success()
        .stdout(" 50% |##########          | ETA: 0:00:10\n");
}

#[test]
fn test_render_finished_shows_total_time() {
    let home = TempDir::new().unwrap();
    progressline(&home)
        .args(["render", "--value", "100", "--max", "100", "--elapsed", "75"])
        .args(["--finished", "--width", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100%"))
        .stdout(predicate::str::contains("Time: 0:01:15"));
}

#[test]
fn test_render_without_max() {
    let home = TempDir::new().unwrap();
    progressline(&home)
        .args(["render", "--value", "7", "--elapsed", "3", "--updates", "2"])
        .assert()
        .success()
        .stdout("- 7 Elapsed Time: 0:00:03\n");
}

#[test]
fn test_render_bounce_preset_fills_width() {
    let home = TempDir::new().unwrap();
    let output = progressline(&home)
        .args(["render", "--value", "3", "--preset", "bounce", "--width", "30"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let line = String::from_utf8(output.stdout).unwrap();
    assert_eq!(line.trim_end_matches('\n').chars().count(), 30);
}

#[test]
fn test_render_json() {
    let home = TempDir::new().unwrap();
    let output = progressline(&home)
        .args(["render", "--value", "3", "--max", "10", "--width", "30"])
        .args(["--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["width"], 30);
    assert_eq!(json["preset"], "default");
    assert_eq!(json["snapshot"]["percentage"], 30.0);
    assert!(json["line"].as_str().unwrap().starts_with(" 30% |"));
}

#[test]
fn test_render_out_of_range() {
    let home = TempDir::new().unwrap();
    progressline(&home)
        .args(["render", "--value", "12", "--max", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_render_inverted_range() {
    let home = TempDir::new().unwrap();
    progressline(&home)
        .args(["render", "--value", "1", "--min", "5", "--max", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid range"));
}

#[test]
fn test_render_huge_elapsed_is_an_error() {
    let home = TempDir::new().unwrap();
    progressline(&home)
        .args(["render", "--value", "1", "--max", "10", "--elapsed", "1e16"])
        .args(["--width", "40"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--elapsed is out of range"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_render_uses_configured_width_and_marker() {
    let home = TempDir::new().unwrap();
    std::fs::create_dir_all(home.path().join("progressline")).unwrap();
    std::fs::write(
        home.path().join("progressline/config.toml"),
        "[display]\nwidth = 26\nmarker = \"=\"\n",
    )
    .unwrap();

    progressline(&home)
        .args(["render", "--value", "5", "--max", "10", "--elapsed", "5"])
        .assert()
        .success()
        .stdout(" 50% |===   | ETA: 0:00:05\n");
}

#[test]
fn test_width_from_environment() {
    let home = TempDir::new().unwrap();
    progressline(&home)
        .env("PROGRESSLINE_DISPLAY__WIDTH", "26")
        .args(["render", "--value", "5", "--max", "10", "--elapsed", "5"])
        .assert()
        .success()
        .stdout(" 50% |###   | ETA: 0:00:05\n");
}

#[test]
fn test_demo_runs_to_completion() {
    let home = TempDir::new().unwrap();
    progressline(&home)
        .args(["demo", "--delay-ms", "0", "--steps", "5", "--max", "1000", "--width", "50"])
        .assert()
        .success()
        .stderr(predicate::str::contains("100%"))
        .stderr(predicate::str::contains("Complete"));
}

#[test]
fn test_demo_bounce() {
    let home = TempDir::new().unwrap();
    progressline(&home)
        .args(["demo", "--preset", "bounce", "--delay-ms", "0", "--steps", "3"])
        .assert()
        .success();
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    progressline(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("progressline"));
}

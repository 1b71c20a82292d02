use std::process::Command;

#[test]
fn headless_run_exits_cleanly() {
    let status = Command::new(env!("CARGO_BIN_EXE_colony"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args([
            "--headless",
            "--frames",
            "120",
            "--config",
            "does-not-exist.toml",
        ])
        .status()
        .expect("failed to launch the colony binary");

    assert!(status.success());
}

#[test]
fn unknown_scenarios_are_reported_as_errors() {
    let output = Command::new(env!("CARGO_BIN_EXE_colony"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args([
            "--headless",
            "--scenario",
            "arena",
            "--config",
            "does-not-exist.toml",
        ])
        .output()
        .expect("failed to launch the colony binary");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown scenario"));
}

use std::process::Command;

#[test]
fn cli_smoke_help() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let output = Command::new(exe)
        .arg("--help")
        .output()
        .expect("failed to run tasklist --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("decode"));
}

#[test]
fn cli_rejects_unknown_config_override() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let output = Command::new(exe)
        .args(["--config-override", "colour=red", "decode", "[]"])
        .env("TASKLIST_CONFIG_PATH", "/nonexistent/tasklist/config.json")
        .output()
        .expect("failed to run tasklist");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - unknown config field 'colour'"));
}

use std::path::PathBuf;
use std::process::{Command, Output};

fn write_script(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "wagontrail-{name}-{}.script",
        std::process::id()
    ));
    std::fs::write(&path, body).unwrap();
    path
}

fn run(name: &str, body: &str, extra: &[&str]) -> Output {
    let script = write_script(name, body);
    let output = Command::new(env!("CARGO_BIN_EXE_wagontrail"))
        .arg("--plain")
        .arg("--seed")
        .arg("7")
        .arg("--script")
        .arg(&script)
        .args(extra)
        .output()
        .unwrap();
    let _ = std::fs::remove_file(script);
    output
}

#[test]
fn scripted_outfit_reaches_the_trail() {
    let output = run(
        "outfit",
        "1\n1\nAnn\n\n\n\n1\ny\nBuyOxen\n3\nBuyFood\n300\nLeaveStore\n:system 1\n",
        &[],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("The Oregon Trail"));
    assert!(stdout.contains("Independence General Store"));
    assert!(stdout.contains("Location: Independence"));
    assert!(stdout.contains("Food: 300 pounds"));
    assert!(stdout.contains("game running"));
}

#[test]
fn end_program_stops_the_script() {
    let output = run("quit", "EndProgram\n1\n", &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Session ended after 1 pulses"));
    assert!(!stdout.contains("Many kinds of people"));
}

#[test]
fn pulse_budget_is_respected() {
    let output = run("budget", ":system 50\n", &["--max-pulses", "5"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("after 5 pulses"));
}

#[test]
fn bad_directive_fails_the_run() {
    let output = run("bad", ":teleport west\n", &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown script directive"));
}

#[test]
fn invalid_tick_interval_is_rejected() {
    let output = run("tick", "\n", &["--tick-ms", "0"]);
    assert!(!output.status.success());
}

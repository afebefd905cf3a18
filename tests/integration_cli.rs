// CLI-level checks that run without a terminal.

use assert_cmd::Command;

#[test]
fn help_describes_the_tracker() {
    let output = Command::cargo_bin("levelup")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("activity"));
    assert!(stdout.contains("ping"));
}

#[test]
fn dashboard_refuses_a_piped_stdin() {
    let output = Command::cargo_bin("levelup")
        .unwrap()
        .write_stdin("")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stdin must be a tty"));
}

#[test]
fn ping_fails_without_a_running_tracker() {
    // Port 1 is never listening.
    let output = Command::cargo_bin("levelup")
        .unwrap()
        .args(["-p", "1", "ping", "rust"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

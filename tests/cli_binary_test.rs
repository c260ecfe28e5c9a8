use std::process::Command;

fn liftlog(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_liftlog"))
        .args(args)
        .env_remove("LIFTLOG_EMAIL")
        .env_remove("LIFTLOG_PASSWORD")
        .output()
        .expect("Failed to execute binary")
}

#[test]
fn test_version_flag() {
    let output = liftlog(&["--version"]);
    assert!(output.status.success(), "Version flag should exit with code 0");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout.trim().strip_prefix("liftlog ").unwrap_or("");
    assert_eq!(version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_help_lists_commands() {
    let output = liftlog(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["dashboard", "exercises", "workouts", "progress", "chat"] {
        assert!(stdout.contains(command), "usage should mention {}", command);
    }
}

#[test]
fn test_bad_arguments_exit_with_usage() {
    let output = liftlog(&["workouts", "--page", "zero"]);
    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--page"));
    assert!(stderr.contains("Usage:"));
}

use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "motion-maze"])
        .status()
        .expect("failed to invoke cargo check for motion-maze CLI binary");

    assert!(status.success(), "cargo check --bin motion-maze should succeed");
}

#[test]
fn help_lists_the_runtime_flags() {
    let output = Command::new(env!("CARGO_BIN_EXE_motion-maze"))
        .arg("--help")
        .output()
        .expect("failed to run motion-maze --help");

    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for flag in ["--seed", "--tick-ms", "--no-sensor", "--headless", "--json-status"] {
        assert!(help.contains(flag), "help is missing {flag}");
    }
}

#[test]
fn headless_session_exits_on_quit() {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = Command::new(env!("CARGO_BIN_EXE_motion-maze"))
        .args(["--headless", "--no-sensor", "--seed", "7", "--log-level", "warn"])
        .current_dir(env!("CARGO_TARGET_TMPDIR"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start motion-maze");

    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"d\nb\nm\nq\n")
        .expect("write input");
    let output = child.wait_with_output().expect("wait for motion-maze");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());
}

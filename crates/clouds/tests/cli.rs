use std::process::Command;

#[test]
fn shaders_check_succeeds_headlessly() {
    let output = Command::new(env!("CARGO_BIN_EXE_clouds"))
        .args(["shaders", "check"])
        .env("RUST_LOG", "error")
        .output()
        .expect("failed to run clouds shaders check");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cloud shader program: ok"));
    assert!(stdout.contains("uniform cloud_shift: group 0 binding 0 offset 0"));
}

#[test]
fn malformed_size_is_a_usage_error() {
    let status = Command::new(env!("CARGO_BIN_EXE_clouds"))
        .args(["--size", "0x960"])
        .status()
        .expect("failed to run clouds");

    assert!(!status.success());
    assert_eq!(status.code(), Some(2));
}

#[test]
fn help_lists_runtime_flags() {
    let output = Command::new(env!("CARGO_BIN_EXE_clouds"))
        .arg("--help")
        .output()
        .expect("failed to run clouds --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--size", "--step", "--wrap-period", "--on-shader-error", "shaders"] {
        assert!(stdout.contains(flag), "missing {flag} in help output");
    }
}

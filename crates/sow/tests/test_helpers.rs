use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

/// Path of a shared fixture, as a string for argv.
#[allow(dead_code)]
pub fn fixture(name: &str) -> String {
    workspace_root()
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .to_string()
}

pub fn sow_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sow"));
    cmd.current_dir(workspace_root());
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Run sow and return the raw output, whatever the exit code.
#[allow(dead_code)]
pub fn sow_output(args: &[&str]) -> Output {
    sow_bin().args(args).output().expect("failed to run sow")
}

/// Run sow, assert exit code, return parsed JSON stdout.
#[allow(dead_code)]
pub fn sow_json(args: &[&str], expected_exit: i32) -> Value {
    let out = sow_output(args);
    let code = out.status.code().unwrap_or(-1);
    assert_eq!(
        code,
        expected_exit,
        "exit mismatch for: sow {}\nstdout: {}\nstderr: {}",
        args.join(" "),
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).unwrap_or_else(|e| {
        panic!(
            "invalid JSON from: sow {}\n{e}\nstdout: {}",
            args.join(" "),
            String::from_utf8_lossy(&out.stdout)
        )
    })
}

/// Run sow, return stdout as string (exit 0 expected).
#[allow(dead_code)]
pub fn sow_stdout(args: &[&str]) -> String {
    let out = sow_output(args);
    assert!(
        out.status.success(),
        "sow {} failed with exit {}\nstderr: {}",
        args.join(" "),
        out.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).to_string()
}

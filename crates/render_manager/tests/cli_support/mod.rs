#![allow(dead_code)]

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn render_manager_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_render-manager"))
}

pub fn run_cli(args: &[String], envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(render_manager_bin());
    cmd.args(args);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("failed to execute render-manager CLI")
}

pub fn parse_json_output(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json_start = stdout.find(|c| c == '{' || c == '[').unwrap_or_else(|| {
        panic!(
            "no JSON payload found in output\nstdout:\n{}\nstderr:\n{}",
            stdout,
            String::from_utf8_lossy(&output.stderr)
        )
    });
    let json_text = &stdout[json_start..];
    let mut deserializer = serde_json::Deserializer::from_str(json_text);
    serde_json::Value::deserialize(&mut deserializer).unwrap_or_else(|err| {
        panic!(
            "failed to parse JSON output: {}\nstdout:\n{}\nstderr:\n{}",
            err,
            stdout,
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

pub fn run_cli_json<T: DeserializeOwned>(args: &[String], envs: &[(&str, &str)]) -> T {
    let output = run_cli(args, envs);
    assert!(
        output.status.success(),
        "command failed: {}\nstdout:\n{}\nstderr:\n{}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let value = parse_json_output(&output);
    serde_json::from_value(value).unwrap_or_else(|err| {
        panic!(
            "failed to deserialize JSON output: {}\nstdout:\n{}\nstderr:\n{}",
            err,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

pub fn run_cli_json_error(args: &[String], envs: &[(&str, &str)]) -> serde_json::Value {
    let output = run_cli(args, envs);
    assert!(
        !output.status.success(),
        "command unexpectedly succeeded: {}\nstdout:\n{}\nstderr:\n{}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    parse_json_output(&output)
}

pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write file");
}

/// Write a frame sequence `<base>_<frame>.exr` into `aov_dir`.
pub fn write_frames(aov_dir: &Path, base: &str, frames: std::ops::RangeInclusive<i64>) {
    for frame in frames {
        write_file(&aov_dir.join(format!("{}_{}.exr", base, frame)), b"exr");
    }
}

/// Isolated home directory plus a scratch directory for fixtures.
pub struct TestEnv {
    pub home: TempDir,
    pub data: TempDir,
    home_str: String,
}

impl TestEnv {
    pub fn new() -> Self {
        let home = TempDir::new().expect("create temp home");
        let data = TempDir::new().expect("create temp data dir");
        let home_str = home.path().to_string_lossy().to_string();
        Self {
            home,
            data,
            home_str,
        }
    }

    pub fn envs(&self) -> Vec<(&str, &str)> {
        vec![("RENDER_MANAGER_HOME", self.home_str.as_str()), ("RUST_LOG", "error")]
    }

    pub fn data_path(&self, relative: &str) -> PathBuf {
        self.data.path().join(relative)
    }
}

//! Shared test infrastructure for integration tests.
#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Vendor scripts the readiness gate looks for.
pub const VENDOR_ASSETS: [&str; 3] = [
    "vendor/handsontable.min.js",
    "vendor/bootstrap.bundle.min.js",
    "vendor/sweetalert2.all.min.js",
];

/// Captured result of one `vortex` invocation.
#[derive(Debug)]
pub struct RunResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Scratch workspace with an asset directory and a storage file.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    /// Workspace whose asset directory holds every vendor script.
    pub fn ready() -> Self {
        let workspace = Self::empty();
        for rel in VENDOR_ASSETS {
            workspace.write_asset(rel, "/* vendored */");
        }
        workspace
    }

    /// Workspace with an empty asset directory.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("create tempdir");
        fs::create_dir_all(dir.path().join("assets")).expect("create assets dir");
        Self { dir }
    }

    pub fn assets(&self) -> PathBuf {
        self.dir.path().join("assets")
    }

    pub fn storage(&self) -> PathBuf {
        self.dir.path().join("storage.json")
    }

    pub fn write_asset(&self, rel: &str, contents: &str) {
        let path = self.assets().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create asset parent");
        }
        fs::write(path, contents).expect("write asset");
    }

    /// Seed durable storage with saved cargo rows.
    pub fn seed_rows(&self, rows: Value) {
        let text = serde_json::to_string(&rows).expect("serialize rows");
        let storage = json!({ "cargovortex-data": text });
        fs::write(self.storage(), storage.to_string()).expect("write storage");
    }

    /// Parsed storage file, or an empty object when nothing was written.
    pub fn stored(&self) -> Value {
        match fs::read_to_string(self.storage()) {
            Ok(text) => serde_json::from_str(&text).expect("parse storage"),
            Err(_) => json!({}),
        }
    }

    /// Run `vortex session` against this workspace, feeding `script` on stdin.
    pub fn session(&self, script: &str) -> RunResult {
        let assets = self.assets();
        let storage = self.storage();
        run_vortex(
            &[
                "session",
                "--assets",
                path_arg(&assets),
                "--storage",
                path_arg(&storage),
                "--retry-delay-ms",
                "1",
                "--max-retries",
                "3",
            ],
            script,
        )
    }
}

pub fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

pub fn run_vortex(args: &[&str], stdin: &str) -> RunResult {
    let mut child = Command::new(env!("CARGO_BIN_EXE_vortex"))
        .args(args)
        .env_remove("VORTEX_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn vortex");
    {
        let mut input = child.stdin.take().expect("stdin handle");
        // The process may exit before reading everything.
        let _ = input.write_all(stdin.as_bytes());
    }
    let output = child.wait_with_output().expect("wait for vortex");
    RunResult {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

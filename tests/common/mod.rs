#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const VENDOR_EXPORT_ROW_1: &str =
    "ABC123,\"Widget, large\",\"Widget, large\",8481.80,CN,12.50,_GEN,_GEN,_GN,02,CA,001,KGM,NO,KGM,NO,OK,";
pub const VENDOR_EXPORT_ROW_2: &str =
    "XYZ9,\"Gasket \"\"HD\"\"\",\"Gasket \"\"HD\"\"\",,US,3.10,_GEN,_GEN,_GN,02,CA,001,KGM,NO,KGM,NO,OK,";

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn fixture_bytes(name: &str) -> Vec<u8> {
    fs::read(fixture_path(name)).expect("read fixture")
}

/// First two lines of the Parts template fixture, newline-terminated.
pub fn template_metadata_lines() -> String {
    let text = String::from_utf8(fixture_bytes("Parts_Template.csv")).expect("utf-8 template");
    text.lines().take(2).map(|line| format!("{line}\n")).collect()
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` under the workspace, creating parent directories.
    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }

    /// Copies a `tests/data` fixture into the workspace under `name`.
    pub fn copy_fixture(&self, fixture: &str, name: &str) -> PathBuf {
        self.write(name, &fixture_bytes(fixture))
    }
}

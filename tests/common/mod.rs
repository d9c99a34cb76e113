//! Shared fixtures: a throwaway project directory and a stub wkhtmltopdf.
//!
//! The stub is a POSIX shell script that behaves like the real renderer for
//! our purposes: the last two arguments are `<input> <output>`, `-` means
//! stdin, and it writes a fake PDF containing the HTML it was given. A
//! document containing `FAIL_ME` makes it exit 1 with an error on stderr.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::TempDir;

pub const TEMPLATE: &str = "<html><body>\
<h1>{{ product }}</h1>\
<p>Price: {{ price }}</p>\
<p>Qty: {{ qty }}</p>\
<p>{{ cashier }}</p>\
</body></html>";

pub const FAIL_MARKER: &str = "FAIL_ME";

const STUB: &str = r#"#!/bin/sh
for arg in "$@"; do input="$output"; output="$arg"; done
if [ "$input" = "-" ]; then body=$(cat); else body=$(cat "$input"); fi
case "$body" in
  *FAIL_ME*) echo "Error: Failed loading page (stub)" >&2; exit 1 ;;
esac
printf '%s\n%s\n' '%PDF-1.4' "$body" > "$output"
"#;

static SPAWN_LOCK: Mutex<()> = Mutex::new(());

/// Serialise tests that write and then execute the stub. Executing a file
/// while another thread's forked child still holds it open fails with
/// ETXTBSY.
pub fn spawn_lock() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// A project root laid out like the default configuration expects.
pub struct Project {
    pub root: TempDir,
}

impl Project {
    /// Create `data/sample_products_EXCEL_RU.csv` (from raw bytes),
    /// `templates/simple_check.html` and `bin/wkhtmltopdf`.
    pub fn new(csv: &[u8]) -> Self {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("data")).unwrap();
        fs::create_dir_all(root.path().join("templates")).unwrap();
        fs::create_dir_all(root.path().join("bin")).unwrap();
        fs::write(root.path().join("data/sample_products_EXCEL_RU.csv"), csv).unwrap();
        fs::write(root.path().join("templates/simple_check.html"), TEMPLATE).unwrap();

        let stub = root.path().join("bin/wkhtmltopdf");
        fs::write(&stub, STUB).unwrap();
        fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();

        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn renderer(&self) -> PathBuf {
        self.path().join("bin/wkhtmltopdf")
    }

    pub fn output(&self) -> PathBuf {
        self.path().join("output")
    }

    /// File names in the output directory, sorted.
    pub fn output_files(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.output()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// `;`-delimited UTF-8 data with a leading BOM.
pub fn bom_csv(body: &str) -> Vec<u8> {
    let mut bytes = "\u{feff}".as_bytes().to_vec();
    bytes.extend_from_slice(body.as_bytes());
    bytes
}

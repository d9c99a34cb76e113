//! # wkhtmltopdf-locate
//!
//! Find the [wkhtmltopdf](https://wkhtmltopdf.org/) executable without making
//! the user spell out its path.
//!
//! ## Resolution order
//!
//! First match wins:
//!
//! 1. An explicit path passed by the caller (e.g. a `--wkhtmltopdf` flag).
//!    If it does not exist, resolution fails instead of silently picking
//!    another copy.
//! 2. `WKHTMLTOPDF_PATH`, when it points to an existing file.
//! 3. The installer's well-known location for the current platform.
//! 4. A search of the directories in `PATH`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wkhtmltopdf_locate::locate;
//!
//! let found = locate(None).expect("wkhtmltopdf is not installed");
//! println!("using {} ({:?})", found.path.display(), found.source);
//! ```
//!
//! ## Well-known locations
//!
//! | OS      | Path                                                |
//! |---------|-----------------------------------------------------|
//! | Windows | `C:\Program Files\wkhtmltopdf\bin\wkhtmltopdf.exe`  |
//!
//! Other platforms install into a directory that is already on `PATH`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Environment variable naming an existing wkhtmltopdf executable.
pub const ENV_OVERRIDE: &str = "WKHTMLTOPDF_PATH";

/// Where the official Windows installer puts the executable.
pub const WINDOWS_INSTALL_PATH: &str = r"C:\Program Files\wkhtmltopdf\bin\wkhtmltopdf.exe";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by [`locate`].
#[derive(Error, Debug)]
pub enum LocateError {
    /// The caller named a path that does not exist.
    #[error("wkhtmltopdf not found at '{path}'")]
    NotFoundAt { path: PathBuf },

    /// Nothing usable at the override, well-known path, or on `PATH`.
    #[error("'{name}' was not found via WKHTMLTOPDF_PATH, the default install location, or PATH")]
    NotOnPath { name: &'static str },
}

// ── Result type ──────────────────────────────────────────────────────────────

/// Which rule produced the executable path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Explicit,
    Environment,
    WellKnown,
    SearchPath,
}

/// A resolved wkhtmltopdf executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub path: PathBuf,
    pub source: Source,
}

// ── Public API ───────────────────────────────────────────────────────────────

/// File name of the executable on the current platform.
pub fn executable_name() -> &'static str {
    if cfg!(windows) {
        "wkhtmltopdf.exe"
    } else {
        "wkhtmltopdf"
    }
}

/// The installer's default location for this platform, if it has one.
pub fn well_known_path() -> Option<&'static Path> {
    if cfg!(windows) {
        Some(Path::new(WINDOWS_INSTALL_PATH))
    } else {
        None
    }
}

/// Resolve the executable using the process environment.
///
/// `explicit` takes precedence over everything else; see the crate docs for
/// the full order.
pub fn locate(explicit: Option<&Path>) -> Result<Located, LocateError> {
    locate_from(
        explicit,
        std::env::var_os(ENV_OVERRIDE),
        well_known_path(),
        std::env::var_os("PATH"),
    )
}

/// Resolve the executable from explicitly supplied inputs.
///
/// [`locate`] is a thin wrapper that feeds this from the environment.
pub fn locate_from(
    explicit: Option<&Path>,
    env_override: Option<OsString>,
    well_known: Option<&Path>,
    path_var: Option<OsString>,
) -> Result<Located, LocateError> {
    if let Some(p) = explicit {
        if p.is_file() {
            return Ok(Located {
                path: p.to_path_buf(),
                source: Source::Explicit,
            });
        }
        return Err(LocateError::NotFoundAt {
            path: p.to_path_buf(),
        });
    }

    // An override that points nowhere falls through to the remaining rules.
    if let Some(p) = env_override.filter(|v| !v.is_empty()).map(PathBuf::from) {
        if p.is_file() {
            return Ok(Located {
                path: p,
                source: Source::Environment,
            });
        }
    }

    if let Some(p) = well_known {
        if p.is_file() {
            return Ok(Located {
                path: p.to_path_buf(),
                source: Source::WellKnown,
            });
        }
    }

    let name = executable_name();
    path_var
        .as_deref()
        .and_then(|v| search_dirs(std::env::split_paths(v), name))
        .map(|path| Located {
            path,
            source: Source::SearchPath,
        })
        .ok_or(LocateError::NotOnPath { name })
}

/// Return the first `dir/name` that is an executable file.
pub fn search_dirs<I>(dirs: I, name: &str) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    dirs.into_iter()
        .filter(|d| !d.as_os_str().is_empty())
        .map(|d| d.join(name))
        .find(|candidate| is_executable(candidate))
}

// ── Internal helpers ─────────────────────────────────────────────────────────

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

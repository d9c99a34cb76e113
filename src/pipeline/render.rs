//! Render gateway: turn a filled HTML document into a PDF via wkhtmltopdf.
//!
//! wkhtmltopdf is an external process. This module finds it, runs it with a
//! fixed set of options, and turns its failures into two distinct errors:
//!
//! * the process could not be started at all → [`Csv2PdfError::RendererNotFound`]
//! * it started but reported a problem → [`Csv2PdfError::RenderFailed`]
//!
//! ## Render modes
//!
//! [`RenderMode::Direct`] streams the HTML through stdin and lets wkhtmltopdf
//! write the destination itself.
//!
//! [`RenderMode::ViaTempFile`] exists because wkhtmltopdf on Windows cannot
//! handle output or input paths containing non-ASCII characters (project
//! folders named `PDF★Генератор` are common). The document is written to
//! `page.html` in a fresh temporary directory, rendered to `page.pdf` next
//! to it, and the PDF is then moved to its real destination. The directory
//! is a [`tempfile::TempDir`], so both files disappear when it drops, on
//! success and on every error path. Failure to delete them is ignored.
//!
//! There is no timeout: a renderer that hangs blocks the batch.

use crate::config::RenderMode;
use crate::error::Csv2PdfError;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::Instant;
use tracing::{debug, info};

/// Options passed to every wkhtmltopdf invocation, before the input and
/// output arguments.
pub const WKHTMLTOPDF_ARGS: [&str; 9] = [
    "--encoding",
    "UTF-8",
    "--enable-local-file-access",
    "--disable-smart-shrinking",
    "--load-error-handling",
    "ignore",
    "--load-media-error-handling",
    "ignore",
    "--quiet",
];

const TEMP_HTML: &str = "page.html";
const TEMP_PDF: &str = "page.pdf";

/// A located wkhtmltopdf executable plus the mode used to feed it.
#[derive(Debug, Clone)]
pub struct Renderer {
    executable: PathBuf,
    mode: RenderMode,
}

impl Renderer {
    /// Use `executable` as-is, without checking that it exists.
    pub fn new(executable: impl Into<PathBuf>, mode: RenderMode) -> Self {
        Self {
            executable: executable.into(),
            mode,
        }
    }

    /// Resolve wkhtmltopdf (explicit path, `WKHTMLTOPDF_PATH`, default
    /// install location, then `PATH`).
    pub fn locate(explicit: Option<&Path>, mode: RenderMode) -> Result<Self, Csv2PdfError> {
        let found = wkhtmltopdf_locate::locate(explicit).map_err(|e| {
            Csv2PdfError::RendererNotFound {
                detail: e.to_string(),
            }
        })?;
        info!(
            "Using wkhtmltopdf at {} ({:?}, {:?} mode)",
            found.path.display(),
            found.source,
            mode
        );
        Ok(Self::new(found.path, mode))
    }

    /// Render `html` to a PDF at `dest`. `index` is the 1-based record
    /// number and only appears in error messages.
    pub fn render(&self, index: usize, html: &str, dest: &Path) -> Result<(), Csv2PdfError> {
        let start = Instant::now();
        match self.mode {
            RenderMode::Direct => self.render_direct(index, html, dest)?,
            RenderMode::ViaTempFile => self.render_via_temp(index, html, dest)?,
        }
        debug!(
            "Rendered record {} → {} in {}ms",
            index,
            dest.display(),
            start.elapsed().as_millis()
        );
        Ok(())
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(WKHTMLTOPDF_ARGS)
            .arg(input)
            .arg(output)
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }

    fn render_direct(&self, index: usize, html: &str, dest: &Path) -> Result<(), Csv2PdfError> {
        let mut child = self
            .command(Path::new("-"), dest)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| self.launch_failed(e))?;

        // stdin is fed from its own thread while stderr drains here, so a
        // renderer that fills its stderr pipe before reading all of its
        // input cannot stall us.
        let stdin = child.stdin.take();
        let (write_result, output) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(html.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (written, output)
        });

        // A renderer that dies early closes its stdin; its own diagnostic is
        // more useful than our broken pipe, so check the exit status first.
        let output = output.map_err(|e| Csv2PdfError::RenderFailed {
            index,
            detail: format!("failed to wait for wkhtmltopdf: {e}"),
        })?;
        check_output(index, &output)?;

        write_result.map_err(|e| Csv2PdfError::RenderFailed {
            index,
            detail: format!("failed to stream document to wkhtmltopdf: {e}"),
        })
    }

    fn render_via_temp(&self, index: usize, html: &str, dest: &Path) -> Result<(), Csv2PdfError> {
        let dir = tempfile::Builder::new()
            .prefix("csv2pdf-")
            .tempdir()
            .map_err(|e| Csv2PdfError::OutputWriteFailed {
                path: std::env::temp_dir(),
                source: e,
            })?;
        let tmp_html = dir.path().join(TEMP_HTML);
        let tmp_pdf = dir.path().join(TEMP_PDF);

        std::fs::write(&tmp_html, html).map_err(|e| Csv2PdfError::OutputWriteFailed {
            path: tmp_html.clone(),
            source: e,
        })?;

        let output = self
            .command(&tmp_html, &tmp_pdf)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.launch_failed(e))?;
        check_output(index, &output)?;

        move_file(&tmp_pdf, dest).map_err(|e| Csv2PdfError::OutputWriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })
        // `dir` drops here and removes whatever is left inside it.
    }

    fn launch_failed(&self, e: std::io::Error) -> Csv2PdfError {
        Csv2PdfError::RendererNotFound {
            detail: format!("could not run '{}': {}", self.executable.display(), e),
        }
    }
}

/// True when wkhtmltopdf's stderr carries an error report.
pub fn reports_error(stderr: &str) -> bool {
    stderr.contains("Error")
}

/// Turn a finished wkhtmltopdf process into `Ok` or [`Csv2PdfError::RenderFailed`].
fn check_output(index: usize, output: &Output) -> Result<(), Csv2PdfError> {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();

    if output.status.success() && !reports_error(stderr) {
        if !stderr.is_empty() {
            debug!("wkhtmltopdf (record {}): {}", index, stderr);
        }
        return Ok(());
    }

    let status = match output.status.code() {
        Some(code) => format!("Exit with code {code}"),
        None => "Terminated by signal".to_string(),
    };
    let detail = if stderr.is_empty() {
        status
    } else {
        format!("{status}: {stderr}")
    };
    Err(Csv2PdfError::RenderFailed { index, detail })
}

/// Move `from` to `to`, copying when a rename cannot cross filesystems.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to)?;
    let _ = std::fs::remove_file(from);
    Ok(())
}

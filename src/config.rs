//! Configuration types for a csv2pdf batch run.
//!
//! All behaviour is controlled through [`BatchConfig`], built via
//! [`BatchConfigBuilder`]. The renderer's own options are fixed (see
//! [`crate::pipeline::render::WKHTMLTOPDF_ARGS`]) and deliberately absent
//! here.

use crate::error::Csv2PdfError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default data file, relative to the project root.
pub const DEFAULT_DATA_FILE: &str = "data/sample_products_EXCEL_RU.csv";
/// Default HTML template, relative to the project root.
pub const DEFAULT_TEMPLATE_FILE: &str = "templates/simple_check.html";
/// Default output directory, relative to the project root.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Configuration for one batch run.
///
/// # Example
/// ```rust
/// use csv2pdf::BatchConfig;
///
/// let config = BatchConfig::builder()
///     .root("/srv/checks")
///     .delimiter(b',')
///     .open_first_pdf(false)
///     .build()
///     .unwrap();
/// assert!(config.data_path().ends_with("data/sample_products_EXCEL_RU.csv"));
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Directory that relative paths below resolve against. Default: `.`.
    pub root: PathBuf,

    /// Delimited data file. Default: [`DEFAULT_DATA_FILE`].
    pub data_file: PathBuf,

    /// HTML template. Default: [`DEFAULT_TEMPLATE_FILE`].
    pub template_file: PathBuf,

    /// Where `check_<n>.pdf` and `debug_<n>.html` land. Default: [`DEFAULT_OUTPUT_DIR`].
    pub output_dir: PathBuf,

    /// Delimiter and text encoding of the data file.
    pub data_format: DataFormat,

    /// Explicit wkhtmltopdf executable. If None, the executable is located
    /// via `WKHTMLTOPDF_PATH`, the default install path, or `PATH`.
    pub renderer_path: Option<PathBuf>,

    /// How the document reaches the renderer. Default: [`RenderMode::platform_default`].
    pub render_mode: RenderMode,

    /// Write `debug_<n>.html` next to each PDF. Default: true.
    pub write_debug_html: bool,

    /// Open the first PDF in the default viewer when done. Default: on Windows only.
    pub open_first_pdf: bool,

    /// Optional per-record progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            template_file: PathBuf::from(DEFAULT_TEMPLATE_FILE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            data_format: DataFormat::default(),
            renderer_path: None,
            render_mode: RenderMode::platform_default(),
            write_debug_html: true,
            open_first_pdf: cfg!(windows),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("root", &self.root)
            .field("data_file", &self.data_file)
            .field("template_file", &self.template_file)
            .field("output_dir", &self.output_dir)
            .field("data_format", &self.data_format)
            .field("renderer_path", &self.renderer_path)
            .field("render_mode", &self.render_mode)
            .field("write_debug_html", &self.write_debug_html)
            .field("open_first_pdf", &self.open_first_pdf)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }

    /// Data file path resolved against `root`.
    pub fn data_path(&self) -> PathBuf {
        self.root.join(&self.data_file)
    }

    /// Template path resolved against `root`.
    pub fn template_path(&self) -> PathBuf {
        self.root.join(&self.template_file)
    }

    /// Output directory resolved against `root`.
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output_dir)
    }

    /// `check_<index>.pdf` inside the output directory.
    pub fn pdf_path(&self, index: usize) -> PathBuf {
        self.output_path().join(format!("check_{index}.pdf"))
    }

    /// `debug_<index>.html` inside the output directory.
    pub fn debug_html_path(&self, index: usize) -> PathBuf {
        self.output_path().join(format!("debug_{index}.html"))
    }
}

/// Builder for [`BatchConfig`].
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl fmt::Debug for BatchConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl BatchConfigBuilder {
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    pub fn template_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.template_file = path.into();
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_dir = path.into();
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.config.data_format.delimiter = delimiter;
        self
    }

    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.config.data_format.encoding = encoding;
        self
    }

    pub fn renderer_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.renderer_path = Some(path.into());
        self
    }

    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.config.render_mode = mode;
        self
    }

    pub fn write_debug_html(mut self, v: bool) -> Self {
        self.config.write_debug_html = v;
        self
    }

    pub fn open_first_pdf(mut self, v: bool) -> Self {
        self.config.open_first_pdf = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, Csv2PdfError> {
        let c = &self.config;
        let d = c.data_format.delimiter;
        if !d.is_ascii() || d == b'"' || d == b'\n' || d == b'\r' {
            return Err(Csv2PdfError::InvalidConfig(format!(
                "delimiter must be a single ASCII character other than quote or newline, got {:?}",
                d as char
            )));
        }
        if is_blank(&c.data_file) || is_blank(&c.template_file) || is_blank(&c.output_dir) {
            return Err(Csv2PdfError::InvalidConfig(
                "data file, template and output directory must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

fn is_blank(p: &Path) -> bool {
    p.as_os_str().is_empty()
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Field delimiter and text encoding of the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFormat {
    /// Field delimiter. Default: `;` (what spreadsheet exports use in
    /// locales with a decimal comma).
    pub delimiter: u8,
    pub encoding: TextEncoding,
}

impl Default for DataFormat {
    fn default() -> Self {
        Self {
            delimiter: b';',
            encoding: TextEncoding::default(),
        }
    }
}

/// Text encoding of the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    /// Strict UTF-8; a leading byte-order mark becomes part of the first header name.
    Utf8,
    /// UTF-8 with an optional leading byte-order mark, as written by Excel. (default)
    #[default]
    Utf8Sig,
}

/// How the filled document is handed to wkhtmltopdf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    /// Pipe the HTML through stdin and let the renderer write the destination.
    Direct,
    /// Render inside a temporary directory with ASCII-only file names, then
    /// move the PDF to the destination. wkhtmltopdf on Windows mangles
    /// non-ASCII paths.
    ViaTempFile,
}

impl RenderMode {
    /// [`RenderMode::ViaTempFile`] on Windows, [`RenderMode::Direct`] elsewhere.
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            RenderMode::ViaTempFile
        } else {
            RenderMode::Direct
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_project_layout() {
        let c = BatchConfig::default();
        assert_eq!(c.data_format.delimiter, b';');
        assert_eq!(c.data_format.encoding, TextEncoding::Utf8Sig);
        assert!(c.write_debug_html);
        assert_eq!(c.open_first_pdf, cfg!(windows));
        assert_eq!(c.render_mode, RenderMode::platform_default());
    }

    #[test]
    fn output_names_are_one_based() {
        let c = BatchConfig::builder().root("/work").build().unwrap();
        assert_eq!(c.pdf_path(1), PathBuf::from("/work/output/check_1.pdf"));
        assert_eq!(c.debug_html_path(12), PathBuf::from("/work/output/debug_12.html"));
    }

    #[test]
    fn absolute_paths_ignore_root() {
        let c = BatchConfig::builder()
            .root("/work")
            .data_file("/elsewhere/rows.csv")
            .build()
            .unwrap();
        assert_eq!(c.data_path(), PathBuf::from("/elsewhere/rows.csv"));
        assert_eq!(
            c.template_path(),
            PathBuf::from("/work/templates/simple_check.html")
        );
    }

    #[test]
    fn rejects_quote_delimiter() {
        let err = BatchConfig::builder().delimiter(b'"').build().unwrap_err();
        assert!(matches!(err, Csv2PdfError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_non_ascii_delimiter() {
        assert!(BatchConfig::builder().delimiter(0xA7).build().is_err());
    }

    #[test]
    fn rejects_empty_output_dir() {
        assert!(BatchConfig::builder().output_dir("").build().is_err());
    }
}

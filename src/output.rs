//! Result types returned by a batch run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One rendered record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedCheck {
    /// 1-based record index in file order.
    pub index: usize,
    /// `output/check_<index>.pdf`.
    pub pdf_path: PathBuf,
    /// `output/debug_<index>.html`, when it was written.
    pub debug_html: Option<PathBuf>,
    /// Wall-clock time spent in the renderer.
    pub duration_ms: u64,
}

/// Aggregate numbers for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_records: usize,
    pub rendered: usize,
    pub total_duration_ms: u64,
}

/// Everything a successful batch produced, in record order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutput {
    pub checks: Vec<RenderedCheck>,
    pub stats: BatchStats,
}

impl BatchOutput {
    /// PDF paths in record order.
    pub fn pdf_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.checks.iter().map(|c| &c.pdf_path)
    }
}

/// What [`crate::inspect`] found in the data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSummary {
    pub path: PathBuf,
    /// Header names in file order.
    pub headers: Vec<String>,
    pub record_count: usize,
}

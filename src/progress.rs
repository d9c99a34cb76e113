//! Progress-callback trait for per-record batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive events
//! as the batch renders each record. The CLI uses it to drive a terminal
//! progress bar; library callers can log, count, or ignore them.
//!
//! Records are rendered one at a time, so events arrive strictly in record
//! order on the calling thread.
//!
//! # Example
//!
//! ```rust
//! use csv2pdf::{BatchConfig, BatchProgressCallback};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     rendered: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_record_complete(&self, index: usize, total: usize, pdf_path: &Path) {
//!         self.rendered.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{index}/{total} → {}", pdf_path.display());
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { rendered: AtomicUsize::new(0) });
//!
//! let config = BatchConfig::builder()
//!     .progress_callback(counter as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the batch orchestrator as it processes each record.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once, after the data file has been read and before any
    /// record is rendered.
    fn on_batch_start(&self, total_records: usize) {
        let _ = total_records;
    }

    /// Called just before a record is filled and rendered.
    ///
    /// # Arguments
    /// * `index`: 1-indexed record number
    /// * `total`: number of records in the batch
    fn on_record_start(&self, index: usize, total: usize) {
        let _ = (index, total);
    }

    /// Called when a record's PDF is in place.
    fn on_record_complete(&self, index: usize, total: usize, pdf_path: &Path) {
        let _ = (index, total, pdf_path);
    }

    /// Called when a record fails. The batch aborts right after this.
    fn on_record_error(&self, index: usize, total: usize, error: &str) {
        let _ = (index, total, error);
    }

    /// Called once after every record rendered successfully.
    fn on_batch_complete(&self, total_records: usize) {
        let _ = total_records;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

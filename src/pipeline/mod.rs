//! Pipeline stages for CSV-to-PDF batch rendering.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the renderer can change without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! records ──▶ fill ──▶ render
//! (csv rows)  (HTML)   (wkhtmltopdf → PDF)
//! ```
//!
//! 1. [`records`]: read the header-validated data file into [`records::Record`]s
//! 2. [`fill`]: substitute `{{ product }}`, `{{ price }}`, `{{ qty }}`
//! 3. [`render`]: run wkhtmltopdf; the only stage that starts a process

pub mod fill;
pub mod records;
pub mod render;

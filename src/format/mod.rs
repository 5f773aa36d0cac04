//! Annotation export system.
//!
//! Exports are built from an `ExportData` snapshot of the session, so the
//! encoders are pure text transforms. New formats implement `ExportFormat`
//! and are looked up through the `FormatRegistry`.
//!
//! ## Supported Formats
//!
//! - **CSV**: one row per region, page columns for whole-session exports
//! - **JSON**: versioned document grouped by page
//!
//! ## Usage
//!
//! ```rust,ignore
//! use region_ocr::format::{ExportData, ExportScope, FormatRegistry};
//!
//! let registry = FormatRegistry::new();
//! let data = ExportData::from_session(&session, ExportScope::AllPages)?;
//! let csv = registry.require("csv")?.encode(&data)?;
//! ```

mod error;
pub mod formats;
mod project;
mod registry;
mod traits;

pub use error::FormatError;
pub use project::{
    AnnotationEntry, ExportData, ExportScope, PageEntry, current_timestamp, format_timestamp,
};
pub use registry::FormatRegistry;
pub use traits::{ExportFormat, ExportResult, write_export};

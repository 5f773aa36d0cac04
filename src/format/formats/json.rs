//! JSON export.

use serde::Serialize;

use crate::constants::EXPORT_VERSION;
use crate::format::error::FormatError;
use crate::format::project::{ExportData, PageEntry};
use crate::format::traits::ExportFormat;

/// Pretty-printed JSON document with a version and timestamp.
pub struct JsonFormat;

#[derive(Serialize)]
struct JsonDocument<'a> {
    version: &'static str,
    exported_at: &'a str,
    pages: &'a [PageEntry],
}

impl ExportFormat for JsonFormat {
    fn id(&self) -> &'static str {
        "json"
    }

    fn display_name(&self) -> &'static str {
        "JSON"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn encode(&self, data: &ExportData) -> Result<String, FormatError> {
        let document = JsonDocument {
            version: EXPORT_VERSION,
            exported_at: &data.exported_at,
            pages: &data.pages,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

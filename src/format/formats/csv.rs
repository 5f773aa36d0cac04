//! CSV export.
//!
//! One row per region. Whole-session exports carry the page columns; a
//! current-page export drops them. Non-numeric columns (file name, text) are
//! quoted, with embedded quotes doubled.

use ::csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::format::error::FormatError;
use crate::format::project::{ExportData, ExportScope};
use crate::format::traits::ExportFormat;

/// Header for exports covering every page.
pub const ALL_PAGES_HEADER: [&str; 8] = [
    "page_index",
    "file_name",
    "rect_id",
    "x",
    "y",
    "width",
    "height",
    "text",
];

/// Header for exports covering only the current page.
pub const PAGE_HEADER: [&str; 6] = ["rect_id", "x", "y", "width", "height", "text"];

/// Comma-separated values.
pub struct CsvFormat;

impl ExportFormat for CsvFormat {
    fn id(&self) -> &'static str {
        "csv"
    }

    fn display_name(&self) -> &'static str {
        "CSV"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn encode(&self, data: &ExportData) -> Result<String, FormatError> {
        let with_page = data.scope == ExportScope::AllPages;

        // Header names stay bare; rows quote every non-numeric field.
        let mut header = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        if with_page {
            header.write_record(ALL_PAGES_HEADER)?;
        } else {
            header.write_record(PAGE_HEADER)?;
        }
        let buffer = header.into_inner().map_err(|e| e.into_error())?;

        let mut rows = WriterBuilder::new()
            .quote_style(QuoteStyle::NonNumeric)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(buffer);
        for page in &data.pages {
            for ann in &page.annotations {
                let mut record = Vec::with_capacity(ALL_PAGES_HEADER.len());
                if with_page {
                    record.push(page.page_index.to_string());
                    record.push(page.file_name.clone());
                }
                record.extend([
                    ann.id.to_string(),
                    ann.x.to_string(),
                    ann.y.to_string(),
                    ann.width.to_string(),
                    ann.height.to_string(),
                    ann.text.clone(),
                ]);
                rows.write_record(&record)?;
            }
        }

        let bytes = rows.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

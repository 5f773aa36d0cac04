//! Trait definitions for export format implementations.

use std::path::{Path, PathBuf};

use crate::format::error::FormatError;
use crate::format::project::ExportData;

/// Trait for annotation export formats.
///
/// Each format (CSV, JSON) turns an export snapshot into text. Encoding is
/// pure; writing the text somewhere is left to `write_export` or the host.
pub trait ExportFormat: Send + Sync {
    /// Unique identifier for this format (e.g., "csv", "json").
    fn id(&self) -> &'static str;

    /// Human-readable name for UI display.
    fn display_name(&self) -> &'static str;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// Encode the snapshot.
    fn encode(&self, data: &ExportData) -> Result<String, FormatError>;
}

/// Result of writing an export to disk.
#[derive(Debug)]
pub struct ExportResult {
    /// Number of pages exported.
    pub pages_exported: usize,

    /// Number of annotations exported.
    pub annotations_exported: usize,

    /// File that was written.
    pub path: PathBuf,
}

/// Encode `data` and write it to `path`.
pub fn write_export(
    format: &dyn ExportFormat,
    data: &ExportData,
    path: &Path,
) -> Result<ExportResult, FormatError> {
    let text = format.encode(data)?;
    std::fs::write(path, text)?;

    log::info!(
        "Exported {} annotations from {} pages to {:?} ({})",
        data.annotation_count(),
        data.pages.len(),
        path,
        format.display_name()
    );

    Ok(ExportResult {
        pages_exported: data.pages.len(),
        annotations_exported: data.annotation_count(),
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::formats::CsvFormat;
    use crate::format::project::{AnnotationEntry, ExportScope, PageEntry};

    #[test]
    fn test_write_export_creates_file() {
        let mut data = ExportData::new(ExportScope::AllPages);
        data.pages.push(PageEntry::new(1, "a.png").with_annotation(AnnotationEntry {
            id: 1,
            x: 0,
            y: 0,
            width: 10,
            height: 10,
            text: "ok".to_string(),
        }));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.csv");
        let result = write_export(&CsvFormat, &data, &path).unwrap();
        assert_eq!(result.pages_exported, 1);
        assert_eq!(result.annotations_exported, 1);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("1,\"a.png\",1,0,0,10,10,\"ok\"\n"));
    }
}

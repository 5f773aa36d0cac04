//! Export snapshot: pages and regions with integer geometry.
//!
//! Encoders never look at the live session. They work from this snapshot,
//! built once per export, so encoding has no effect on annotation state.

use serde::{Deserialize, Serialize};

use crate::model::{Page, Region, RegionId};
use crate::state::Session;

use super::error::FormatError;

/// Which pages an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportScope {
    /// Only the page currently shown
    CurrentPage,
    /// Every loaded page, in upload order
    #[default]
    AllPages,
}

/// One region with coordinates rounded to whole pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationEntry {
    pub id: RegionId,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub text: String,
}

impl AnnotationEntry {
    /// Create from a region, rounding every coordinate.
    pub fn from_region(region: &Region) -> Self {
        Self {
            id: region.id,
            x: round(region.rect.x),
            y: round(region.rect.y),
            width: round(region.rect.width),
            height: round(region.rect.height),
            text: region.text.clone(),
        }
    }
}

fn round(value: f32) -> i64 {
    value.round() as i64
}

/// One page and its regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    /// 1-based position of the page in the session.
    pub page_index: usize,
    pub file_name: String,
    pub annotations: Vec<AnnotationEntry>,
}

impl PageEntry {
    pub fn new(page_index: usize, file_name: impl Into<String>) -> Self {
        Self {
            page_index,
            file_name: file_name.into(),
            annotations: Vec::new(),
        }
    }

    fn from_page(index: usize, page: &Page) -> Self {
        Self {
            page_index: index + 1,
            file_name: page.name().to_string(),
            annotations: page
                .regions()
                .iter()
                .map(AnnotationEntry::from_region)
                .collect(),
        }
    }

    /// Add an annotation.
    pub fn with_annotation(mut self, annotation: AnnotationEntry) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Snapshot handed to export formats.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportData {
    pub scope: ExportScope,
    /// ISO 8601 UTC timestamp of the export.
    pub exported_at: String,
    pub pages: Vec<PageEntry>,
}

impl ExportData {
    /// Create an empty snapshot stamped with the current time.
    pub fn new(scope: ExportScope) -> Self {
        Self {
            scope,
            exported_at: current_timestamp(),
            pages: Vec::new(),
        }
    }

    /// Snapshot the session for the given scope.
    pub fn from_session(session: &Session, scope: ExportScope) -> Result<Self, FormatError> {
        if session.page_count() == 0 {
            return Err(FormatError::NothingToExport);
        }

        let mut data = Self::new(scope);
        data.pages = match scope {
            ExportScope::CurrentPage => {
                let index = session.current_page_index();
                session
                    .current_page()
                    .map(|page| vec![PageEntry::from_page(index, page)])
                    .unwrap_or_default()
            }
            ExportScope::AllPages => session
                .pages()
                .iter()
                .enumerate()
                .map(|(index, page)| PageEntry::from_page(index, page))
                .collect(),
        };

        log::debug!(
            "Export snapshot: {:?}, {} pages, {} annotations",
            scope,
            data.pages.len(),
            data.annotation_count()
        );
        Ok(data)
    }

    /// Replace the timestamp.
    pub fn with_timestamp(mut self, exported_at: impl Into<String>) -> Self {
        self.exported_at = exported_at.into();
        self
    }

    pub fn annotation_count(&self) -> usize {
        self.pages.iter().map(|p| p.annotations.len()).sum()
    }

    /// Default file name for this snapshot.
    pub fn suggested_file_name(&self, extension: &str) -> String {
        match (self.scope, self.pages.first()) {
            (ExportScope::CurrentPage, Some(page)) => {
                format!("page_{}_annotations.{}", page.page_index, extension)
            }
            _ => format!("annotations.{}", extension),
        }
    }
}

/// Current time as an ISO 8601 string (`YYYY-MM-DDTHH:MM:SSZ`, UTC).
pub fn current_timestamp() -> String {
    // web-time keeps this working on both native and WASM
    let now = web_time::SystemTime::now();
    let secs = now
        .duration_since(web_time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format_timestamp(secs)
}

/// Format seconds since the Unix epoch as ISO 8601 UTC.
pub fn format_timestamp(secs: u64) -> String {
    let days_since_epoch = secs / 86400;
    let secs_today = secs % 86400;
    let hours = secs_today / 3600;
    let mins = (secs_today % 3600) / 60;
    let secs_remaining = secs_today % 60;

    let (year, month, day) = days_to_ymd(days_since_epoch);

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year, month, day, hours, mins, secs_remaining
    )
}

/// Convert days since Unix epoch to year/month/day.
fn days_to_ymd(days: u64) -> (u32, u32, u32) {
    let mut remaining_days = days as i64;
    let mut year = 1970i32;

    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let days_in_months: [i64; 12] = if is_leap_year(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1u32;
    for &days_in_month in &days_in_months {
        if remaining_days < days_in_month {
            break;
        }
        remaining_days -= days_in_month;
        month += 1;
    }

    (year as u32, month, remaining_days as u32 + 1)
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

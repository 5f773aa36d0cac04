//! Format registry for discovering and accessing export formats.

use std::collections::HashMap;

use crate::format::error::FormatError;
use crate::format::formats::{CsvFormat, JsonFormat};
use crate::format::traits::ExportFormat;

/// Registry of available export formats.
///
/// All built-in formats are registered automatically on creation.
pub struct FormatRegistry {
    formats: HashMap<&'static str, Box<dyn ExportFormat>>,
}

impl FormatRegistry {
    /// Create a new registry with all built-in formats registered.
    pub fn new() -> Self {
        let mut registry = Self {
            formats: HashMap::new(),
        };

        registry.register(Box::new(CsvFormat));
        registry.register(Box::new(JsonFormat));

        registry
    }

    /// Register a format implementation.
    pub fn register(&mut self, format: Box<dyn ExportFormat>) {
        self.formats.insert(format.id(), format);
    }

    /// Get a format by its ID.
    pub fn get(&self, id: &str) -> Option<&dyn ExportFormat> {
        self.formats.get(id).map(|f| f.as_ref())
    }

    /// Get a format by its ID, or fail with `UnknownFormat`.
    pub fn require(&self, id: &str) -> Result<&dyn ExportFormat, FormatError> {
        self.get(id).ok_or_else(|| FormatError::unknown_format(id))
    }

    /// Get all format IDs, sorted.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.formats.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

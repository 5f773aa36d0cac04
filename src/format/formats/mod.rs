//! Export format implementations.

mod csv;
mod json;

#[cfg(test)]
mod tests;

pub use self::csv::CsvFormat;
pub use json::JsonFormat;

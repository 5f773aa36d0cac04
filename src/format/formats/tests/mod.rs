//! Unit tests for export format implementations.
//!
//! These tests build sessions through the public store API and check the
//! exact text each encoder produces.

mod csv_tests;
mod json_tests;

//! Format implementations
//!
//! This module contains the template formats a field catalog can be compiled into.

pub mod cells;
pub mod csv;
pub mod payload;

pub use csv::CsvFormat;
pub use payload::PayloadFormat;

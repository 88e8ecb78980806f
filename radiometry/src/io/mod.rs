//! Flat-file input for tabulated sensor and optics data

pub mod table;

pub use table::{load_two_column, TableError};

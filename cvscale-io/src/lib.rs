//! cvscale I/O: the tabular boundary.
//!
//! Loads a CSV table, hands one numeric column to the scaling core, and writes
//! the table back with derived columns appended.

pub mod csv;
pub mod error;
pub mod table;

pub use error::TableError;
pub use table::Table;

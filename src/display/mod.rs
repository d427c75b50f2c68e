//! Display formatting for terminal output

pub mod report;

pub use report::{format_amount, format_bar, format_percentage, separator, table, PLACEHOLDER};

//! Configuration module for ledgerfx
//!
//! - Path resolution for the data directory
//! - The ledger configuration snapshot (currencies, rates, categories)

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::LedgerConfig;

//! ledgerfx - Multi-currency personal ledger engine
//!
//! This library provides the core of the ledgerfx ledger: it resolves which
//! exchange rate applies to a currency at a date, converts records into a
//! single base currency, and builds budget, savings, dashboard and
//! month-over-month reports from read-only snapshots.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: The ledger configuration snapshot and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, months, budget limits)
//! - `services`: Rate resolution, normalization, grouping and filtering
//! - `reports`: Budget status, savings, monthly comparison and dashboard
//! - `storage`: JSON file storage layer
//! - `export`: CSV, JSON and YAML export and import
//! - `display`: Terminal formatting helpers
//! - `cli`: Command handlers for the `ledgerfx` binary
//! - `log`: Tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use ledgerfx::config::LedgerConfig;
//! use ledgerfx::services::RateResolver;
//!
//! let config = LedgerConfig::default();
//! let rates = RateResolver::new(&config);
//! let ars = rates.to_base(100.0, "USD", None, None);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod log;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};

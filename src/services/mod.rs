//! Service layer for ledgerfx
//!
//! Pure building blocks over read-only snapshots: rate resolution and
//! conversion, normalization of raw records, grouping, and list filtering.

pub mod aggregate;
pub mod filter;
pub mod normalize;
pub mod rates;

pub use aggregate::{expense_key, group_sum, top_entry, AggregationMode, Breakdown};
pub use filter::{sort_transactions, TransactionFilter};
pub use normalize::{
    is_fx_category_tx, is_reentry_transfer, is_tracked_fx_tx, normalize, normalize_all,
    parse_date, parse_tags,
};
pub use rates::RateResolver;

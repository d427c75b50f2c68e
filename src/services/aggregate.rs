//! Sum-by-key grouping
//!
//! The building block for every breakdown: category, group, payment source
//! and the monthly series.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::LedgerConfig;
use crate::models::Transaction;

/// One ranked bucket of a breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub key: String,
    pub value: f64,
}

/// How expenses are bucketed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// One bucket per category
    #[default]
    Category,
    /// One bucket per configured category group
    Group,
}

/// Accumulate `value_fn` per `key_fn`, then rank descending by value
///
/// Buckets keep first-seen order before sorting and the sort is stable, so
/// equal values stay in first-seen order.
pub fn group_sum<T, K, V>(items: &[T], key_fn: K, value_fn: V) -> Vec<Breakdown>
where
    K: Fn(&T) -> String,
    V: Fn(&T) -> f64,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<Breakdown> = Vec::new();

    for item in items {
        let key = key_fn(item);
        let value = value_fn(item);
        let value = if value.is_finite() { value } else { 0.0 };

        match index.get(&key) {
            Some(&i) => buckets[i].value += value,
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push(Breakdown { key, value });
            }
        }
    }

    buckets.sort_by(|a, b| b.value.total_cmp(&a.value));
    buckets
}

/// The bucket an expense falls into under `mode`
///
/// In group mode a category without a configured group is its own bucket.
pub fn expense_key(tx: &Transaction, config: &LedgerConfig, mode: AggregationMode) -> String {
    match mode {
        AggregationMode::Category => tx.category.clone(),
        AggregationMode::Group => config
            .group_of(&tx.category)
            .unwrap_or(&tx.category)
            .to_string(),
    }
}

/// The largest bucket, if any
pub fn top_entry(breakdown: &[Breakdown]) -> Option<&Breakdown> {
    breakdown.first()
}

/// Sum of all bucket values
pub fn total(breakdown: &[Breakdown]) -> f64 {
    breakdown.iter().map(|b| b.value).sum()
}

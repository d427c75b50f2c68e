//! Monthly budget limits
//!
//! Limits are keyed by month and by a discriminated [`BudgetKey`], so a
//! category budget and a group budget that share a name never collide.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::month::Month;

/// Whether a budget applies to a single category or a category group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetKind {
    Category,
    Group,
}

impl fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category => write!(f, "category"),
            Self::Group => write!(f, "group"),
        }
    }
}

/// The target of a budget limit
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BudgetKey {
    pub kind: BudgetKind,
    pub name: String,
}

impl BudgetKey {
    pub fn category(name: impl Into<String>) -> Self {
        Self {
            kind: BudgetKind::Category,
            name: name.into(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self {
            kind: BudgetKind::Group,
            name: name.into(),
        }
    }
}

/// One stored budget limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub month: Month,
    pub kind: BudgetKind,
    pub name: String,
    pub limit: f64,
}

/// All budget limits, by month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<BudgetEntry>", into = "Vec<BudgetEntry>")]
pub struct BudgetBook {
    months: BTreeMap<Month, BTreeMap<BudgetKey, f64>>,
}

impl BudgetBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a limit; a limit of 0 (or anything not > 0) removes the entry
    pub fn set_limit(&mut self, month: Month, key: BudgetKey, limit: f64) {
        if limit.is_finite() && limit > 0.0 {
            self.months.entry(month).or_default().insert(key, limit);
        } else if let Some(limits) = self.months.get_mut(&month) {
            limits.remove(&key);
            if limits.is_empty() {
                self.months.remove(&month);
            }
        }
    }

    /// The configured limit, or `None` when no limit is configured
    pub fn limit(&self, month: Month, key: &BudgetKey) -> Option<f64> {
        self.months
            .get(&month)
            .and_then(|limits| limits.get(key))
            .copied()
            .filter(|limit| limit.is_finite() && *limit > 0.0)
    }

    /// Limits of one kind for a month, in key order
    pub fn limits_for(&self, month: Month, kind: BudgetKind) -> Vec<(&str, f64)> {
        self.months
            .get(&month)
            .map(|limits| {
                limits
                    .iter()
                    .filter(|(key, limit)| key.kind == kind && limit.is_finite() && **limit > 0.0)
                    .map(|(key, limit)| (key.name.as_str(), *limit))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Months with at least one limit, oldest first
    pub fn months(&self) -> impl Iterator<Item = &Month> {
        self.months.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Total number of stored limits
    pub fn len(&self) -> usize {
        self.months.values().map(BTreeMap::len).sum()
    }
}

impl From<Vec<BudgetEntry>> for BudgetBook {
    fn from(entries: Vec<BudgetEntry>) -> Self {
        let mut book = Self::new();
        for entry in entries {
            let key = BudgetKey {
                kind: entry.kind,
                name: entry.name,
            };
            book.set_limit(entry.month, key, entry.limit);
        }
        book
    }
}

impl From<BudgetBook> for Vec<BudgetEntry> {
    fn from(book: BudgetBook) -> Self {
        book.months
            .into_iter()
            .flat_map(|(month, limits)| {
                limits.into_iter().map(move |(key, limit)| BudgetEntry {
                    month,
                    kind: key.kind,
                    name: key.name,
                    limit,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march() -> Month {
        Month::new(2026, 3).unwrap()
    }

    #[test]
    fn test_category_and_group_keys_do_not_collide() {
        let mut book = BudgetBook::new();
        book.set_limit(march(), BudgetKey::category("Hogar"), 500.0);
        book.set_limit(march(), BudgetKey::group("Hogar"), 2000.0);

        assert_eq!(book.limit(march(), &BudgetKey::category("Hogar")), Some(500.0));
        assert_eq!(book.limit(march(), &BudgetKey::group("Hogar")), Some(2000.0));
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_zero_limit_means_unset() {
        let mut book = BudgetBook::new();
        book.set_limit(march(), BudgetKey::category("Ocio"), 300.0);
        book.set_limit(march(), BudgetKey::category("Ocio"), 0.0);

        assert_eq!(book.limit(march(), &BudgetKey::category("Ocio")), None);
        assert!(book.is_empty());
    }

    #[test]
    fn test_limits_for_filters_by_kind() {
        let mut book = BudgetBook::new();
        book.set_limit(march(), BudgetKey::category("Comida"), 1000.0);
        book.set_limit(march(), BudgetKey::group("Esenciales"), 3000.0);

        assert_eq!(book.limits_for(march(), BudgetKind::Category), vec![("Comida", 1000.0)]);
        assert_eq!(book.limits_for(march(), BudgetKind::Group), vec![("Esenciales", 3000.0)]);
        assert!(book.limits_for(march().next(), BudgetKind::Group).is_empty());
    }

    #[test]
    fn test_serializes_as_flat_entries() {
        let mut book = BudgetBook::new();
        book.set_limit(march(), BudgetKey::group("Finanzas"), 750.0);

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"month": "2026-03", "kind": "group", "name": "Finanzas", "limit": 750.0}])
        );

        let back: BudgetBook = serde_json::from_value(json).unwrap();
        assert_eq!(back, book);
    }
}

//! Transaction list filtering and ordering

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::{Transaction, TransactionKind};

/// Criteria for narrowing a transaction list; empty fields match everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Case-insensitive text searched across descriptive fields and tags
    pub search: Option<String>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    /// Inclusive lower bound
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound
    pub to: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a transaction passes every criterion
    pub fn matches(&self, tx: &Transaction) -> bool {
        if self.kind.is_some_and(|kind| kind != tx.kind) {
            return false;
        }
        if self.category.as_deref().is_some_and(|c| c != tx.category) {
            return false;
        }
        if self.from.is_some_and(|from| tx.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| tx.date > to) {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => haystack(tx).contains(&query.to_lowercase()),
            _ => true,
        }
    }

    /// Matching transactions in canonical order
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let mut matched: Vec<&Transaction> =
            transactions.iter().filter(|tx| self.matches(tx)).collect();
        matched.sort_by(|a, b| compare(a, b));
        matched
    }
}

fn haystack(tx: &Transaction) -> String {
    let mut parts = vec![
        tx.vendor.as_str(),
        tx.description.as_str(),
        tx.notes.as_str(),
        tx.category.as_str(),
        tx.payment_source.as_str(),
        tx.currency.as_str(),
        tx.kind.as_str(),
    ];
    parts.extend(tx.tags.iter().map(String::as_str));
    parts.join(" ").to_lowercase()
}

/// Newest first; on the same day income before expense, then larger amounts first
pub fn compare(a: &Transaction, b: &Transaction) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| a.kind.rank().cmp(&b.kind.rank()))
        .then_with(|| b.amount.total_cmp(&a.amount))
}

/// Sort a list into canonical order, returning a new vector
pub fn sort_transactions(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(compare);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn tx(kind: TransactionKind, d: u32, amount: f64, category: &str) -> Transaction {
        Transaction::new(kind, date(d), amount, "ARS", category)
    }

    #[test]
    fn test_sort_order() {
        let list = vec![
            tx(TransactionKind::Expense, 1, 10.0, "Comida"),
            tx(TransactionKind::Expense, 5, 10.0, "Comida"),
            tx(TransactionKind::Expense, 5, 99.0, "Ocio"),
            tx(TransactionKind::Income, 5, 1.0, "Salario"),
        ];
        let sorted = sort_transactions(&list);

        assert_eq!(sorted[0].kind, TransactionKind::Income);
        assert_eq!(sorted[1].amount, 99.0);
        assert_eq!(sorted[2].amount, 10.0);
        assert_eq!(sorted[3].date, date(1));
    }

    #[test]
    fn test_filter_by_kind_category_and_range() {
        let list = vec![
            tx(TransactionKind::Expense, 1, 10.0, "Comida"),
            tx(TransactionKind::Expense, 10, 20.0, "Comida"),
            tx(TransactionKind::Expense, 20, 30.0, "Ocio"),
            tx(TransactionKind::Income, 10, 40.0, "Salario"),
        ];
        let filter = TransactionFilter {
            kind: Some(TransactionKind::Expense),
            category: Some("Comida".into()),
            from: Some(date(5)),
            to: Some(date(31)),
            ..TransactionFilter::default()
        };

        let result = filter.apply(&list);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].amount, 20.0);
    }

    #[test]
    fn test_search_covers_tags_and_is_case_insensitive() {
        let mut tagged = tx(TransactionKind::Expense, 2, 10.0, "Comida");
        tagged.tags = vec!["Vacaciones".into()];
        let mut vendor = tx(TransactionKind::Expense, 3, 10.0, "Comida");
        vendor.vendor = "Supermercado Día".into();
        let list = vec![tagged, vendor, tx(TransactionKind::Expense, 4, 1.0, "Ocio")];

        let filter = TransactionFilter {
            search: Some("VACA".into()),
            ..TransactionFilter::default()
        };
        assert_eq!(filter.apply(&list).len(), 1);

        let filter = TransactionFilter {
            search: Some("supermercado".into()),
            ..TransactionFilter::default()
        };
        assert_eq!(filter.apply(&list)[0].vendor, "Supermercado Día");
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let list = vec![tx(TransactionKind::Expense, 2, 10.0, "Comida")];
        let filter = TransactionFilter {
            search: Some("   ".into()),
            ..TransactionFilter::new()
        };
        assert_eq!(filter.apply(&list).len(), 1);
    }
}

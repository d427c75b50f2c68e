//! Reports module for ledgerfx
//!
//! Provides the ledger analytics: dashboard KPIs, budget status, the
//! foreign-currency savings position, and rolling monthly comparisons.

pub mod budget_status;
pub mod dashboard;
pub mod monthly_comparison;
pub mod savings;

pub use budget_status::{BudgetStatus, BudgetStatusReport, BudgetStatusRow, BudgetTableRow};
pub use dashboard::{DailySeries, DashboardReport, DashboardScope};
pub use monthly_comparison::{CategoryBreakdownSeries, MonthlyComparison};
pub use savings::{fx_operation, operations, FxOperation, FxSide, SavingsPoint, SavingsReport, SavingsRow};

//! Moneta Core Library
//!
//! Shared functionality for the Moneta personal finance analytics engine:
//! - Database access and migrations (SQLite, integer minor units)
//! - Transaction, budget, goal and badge storage
//! - Budget evaluation and a 0-100 financial health score
//! - Anomaly detection over expense history
//! - Savings goal planning with installment options
//! - Spending advice and short-horizon trend projection

pub mod analytics;
pub mod db;
pub mod error;
pub mod models;
pub mod money;

pub use analytics::{
    AnomalyReport, BalanceSummary, BudgetReport, BudgetStatus, DashboardReport, GoalPlan,
    GoalProgress, HealthLabel, HealthReport, RiskLevel, SpendingAdvice, SpendingAdviceStatus,
    TrendProjection,
};
pub use db::Database;
pub use error::{Error, Result};
pub use models::{
    AchievementBadge, Badge, Category, MonthlyBudget, NewSavingsGoal, NewTransaction, SavingsGoal,
    Transaction, TransactionKind, YearMonth,
};

//! Analytics Engine - Budget, Health, Goals and Anomalies
//!
//! Read-only analytics computed over a user's ledger. Each component is
//! independent and fault-isolated; the dashboard assembles them all in
//! one pass.
//!
//! ## Components
//!
//! - **Budget Evaluator** - Current-month spend against the configured budget
//! - **Health Scorer** - 0-100 score from five weighted sub-scores
//! - **Anomaly Detector** - Outlier transactions and daily spending spikes
//! - **Goal Planner** - Installment plans and expense-cut suggestions
//! - **Badge Engine** - One-time achievement grants
//! - **Dashboard** - All of the above plus trend projection and insights
//!
//! ## Usage
//!
//! ```rust,ignore
//! use moneta_core::analytics;
//!
//! let report = analytics::dashboard_report(&db, user_id, today)?;
//! ```

pub mod anomaly;
pub mod badges;
pub mod budget;
pub mod dashboard;
pub mod health;
pub mod planner;
pub mod types;

pub use anomaly::detect;
pub use badges::evaluate as evaluate_badges;
pub use budget::evaluate_budget;
pub use dashboard::{advise_spending, balance_summary, dashboard_report, trend_projection};
pub use health::score as health_score;
pub use planner::{calculate_goal_plan, current_saved, goal_progress, has_sufficient_balance};
pub use types::{
    AbnormalTransaction, AnomalyReport, BalanceSummary, BudgetReport, BudgetStatus,
    DashboardReport, EmiOption, ExpenseCutSuggestion, GoalPlan, GoalProgress, HealthLabel,
    HealthReport, RiskLevel, ScoreBreakdown, SpendingAdvice, SpendingAdviceStatus, SpendingSpike,
    TrendProjection,
};

//! Result types for the analytics engine
//!
//! Everything here is plain serializable data: nested structs of decimals,
//! integers, strings, booleans and ordered lists, ready for whatever
//! presentation layer consumes them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::CategoryTotal;
use crate::error::Result;
use crate::models::{AchievementBadge, Badge, Category, YearMonth};

/// Outcome of comparing a month's expenses to its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    WithinBudget,
    Exceeded,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WithinBudget => "within_budget",
            Self::Exceeded => "exceeded",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One month's budget evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetReport {
    pub period: YearMonth,
    pub budget: Decimal,
    pub expenses: Decimal,
    /// Budget minus expenses; negative when exceeded
    pub remaining: Decimal,
    /// Percentage of the budget consumed; zero when no budget is set
    pub usage_pct: Decimal,
    pub status: BudgetStatus,
    pub message: String,
    /// Top two overspend categories, populated only when exceeded
    pub top_categories: Vec<CategoryTotal>,
}

/// Qualitative band for a health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthLabel {
    Excellent,
    Good,
    Average,
    Poor,
}

impl HealthLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::Poor => "Poor",
        }
    }

    /// Presentation color for the band
    pub fn color(&self) -> &'static str {
        match self {
            Self::Excellent => "success",
            Self::Good => "primary",
            Self::Average => "warning",
            Self::Poor => "danger",
        }
    }
}

impl std::fmt::Display for HealthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The five weighted sub-scores behind a health score
///
/// Each value is already weighted: savings rate contributes up to 9 points
/// (30-point raw cap times 0.3), expense ratio up to 20, budget discipline
/// up to 20, consistency up to 15, over-budget frequency up to 15.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub savings_rate: Decimal,
    pub expense_ratio: Decimal,
    pub budget_discipline: Decimal,
    pub consistency: Decimal,
    pub over_budget: Decimal,
}

/// Composite financial health evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// 0-100, rounded to 2 decimal places
    pub score: Decimal,
    /// Same figure as a float, for display layers
    pub display_score: f64,
    pub label: HealthLabel,
    pub color: String,
    pub breakdown: ScoreBreakdown,
    pub suggestions: Vec<String>,
}

/// An expense flagged as unusually large for its category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbnormalTransaction {
    pub transaction_id: i64,
    pub date: NaiveDate,
    pub category: Category,
    pub amount: Decimal,
    pub category_average: Decimal,
    pub reason: String,
}

/// A day whose aggregate spend stands out from comparable days
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingSpike {
    pub date: NaiveDate,
    pub total: Decimal,
    pub window_average: Decimal,
}

/// Anomaly and trend detection results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Top three all-time expense categories
    pub top_categories: Vec<CategoryTotal>,
    pub abnormal_transactions: Vec<AbnormalTransaction>,
    pub spikes: Vec<SpendingSpike>,
}

/// One entry in the standard installment menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiOption {
    pub months: u32,
    pub monthly_commitment: Decimal,
}

/// A proposed reduction for one expense category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCutSuggestion {
    pub category: Category,
    /// All-time spend in this category
    pub current_spend: Decimal,
    pub cut_ten_pct: Decimal,
    pub remaining_after_ten: Decimal,
    pub cut_twenty_pct: Decimal,
    pub remaining_after_twenty: Decimal,
}

/// Installment plan for a savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalPlan {
    pub goal_id: i64,
    pub monthly_commitment: Decimal,
    pub planned_months: u32,
    pub remaining_to_save: Decimal,
    pub is_feasible: bool,
    pub expense_suggestions: Vec<ExpenseCutSuggestion>,
    pub standard_emi_options: Vec<EmiOption>,
}

/// Read-time progress summary for a savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: i64,
    pub name: String,
    pub target_amount: Decimal,
    /// Income minus expense over [start_date, today]
    pub saved: Decimal,
    pub progress_pct: Decimal,
    pub days_remaining: i64,
    pub months_remaining: i64,
    /// Informational only; completion stays an explicit user action
    pub sufficient_balance: bool,
    pub completed: bool,
}

/// Verdict for a planned one-off spend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendingAdviceStatus {
    Safe,
    LowSavings,
    NotRecommended,
}

impl SpendingAdviceStatus {
    /// Presentation color for the verdict
    pub fn color(&self) -> &'static str {
        match self {
            Self::Safe => "success",
            Self::LowSavings => "warning",
            Self::NotRecommended => "danger",
        }
    }
}

/// Advice for a planned one-off spend against the current balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingAdvice {
    pub status: SpendingAdviceStatus,
    pub message: String,
    pub color: String,
    /// Balance left if the planned spend goes ahead
    pub remaining_balance: Decimal,
}

/// Financial risk classification from the trend projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    High,
}

impl RiskLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::High => "High Risk",
        }
    }
}

/// Rolling three-month projection of income and expenses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendProjection {
    pub predicted_income: Decimal,
    pub predicted_expense: Decimal,
    pub predicted_balance: Decimal,
    pub financial_risk: RiskLevel,
    /// Expense change from two months ago to last month; None when the
    /// base month had no expenses
    pub mom_expense_change_pct: Option<Decimal>,
}

/// All-time balance figures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub income_total: Decimal,
    pub expense_total: Decimal,
    pub current_balance: Decimal,
}

/// Everything the dashboard shows, assembled in one pass
///
/// Component reports are optional: a failed component is logged and left
/// absent rather than failing the whole dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub user_id: i64,
    pub generated_on: NaiveDate,
    pub balance: BalanceSummary,
    pub budget: Option<BudgetReport>,
    pub health: Option<HealthReport>,
    pub anomalies: Option<AnomalyReport>,
    pub trend: Option<TrendProjection>,
    pub goal: Option<GoalProgress>,
    pub goal_plan: Option<GoalPlan>,
    /// Badges granted during this evaluation pass
    pub newly_awarded: Vec<Badge>,
    /// Every badge the user holds
    pub badges: Vec<AchievementBadge>,
    /// Short human-readable takeaways
    pub insights: Vec<String>,
}

impl DashboardReport {
    /// Render the report as a JSON string for the presentation layer
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_status_strings() {
        assert_eq!(BudgetStatus::WithinBudget.as_str(), "within_budget");
        assert_eq!(BudgetStatus::Exceeded.as_str(), "exceeded");
    }

    #[test]
    fn test_label_colors() {
        assert_eq!(HealthLabel::Excellent.color(), "success");
        assert_eq!(HealthLabel::Good.color(), "primary");
        assert_eq!(HealthLabel::Average.color(), "warning");
        assert_eq!(HealthLabel::Poor.color(), "danger");
    }

    #[test]
    fn test_risk_display() {
        assert_eq!(RiskLevel::Low.display_name(), "Low Risk");
        assert_eq!(RiskLevel::High.display_name(), "High Risk");
    }

    #[test]
    fn test_budget_report_serializes_to_plain_json() {
        let report = BudgetReport {
            period: YearMonth::new(2026, 3),
            budget: Decimal::new(50000, 2),
            expenses: Decimal::new(12550, 2),
            remaining: Decimal::new(37450, 2),
            usage_pct: Decimal::new(2510, 2),
            status: BudgetStatus::WithinBudget,
            message: "You are within your monthly budget.".to_string(),
            top_categories: vec![],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "within_budget");
        assert_eq!(json["period"]["month"], 3);
        // serde-float keeps amounts numeric for display layers
        assert_eq!(json["budget"], 500.0);

        let back: BudgetReport = serde_json::from_value(json).unwrap();
        assert_eq!(back.expenses, report.expenses);
    }
}

//! Budget evaluator
//!
//! Compares the current calendar month's expenses to the configured
//! budget for that month. The budget row is created lazily at zero on
//! first access, so an unconfigured month evaluates against a zero cap.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::types::{BudgetReport, BudgetStatus};
use crate::db::Database;
use crate::error::Result;
use crate::models::{TransactionKind, YearMonth};
use crate::money;

const WITHIN_BUDGET_MESSAGE: &str = "You are within your monthly budget.";
const EXCEEDED_MESSAGE: &str = "You have exceeded your monthly budget. Review your top spending categories.";

/// How many overspend categories to surface when the budget is exceeded
const TOP_CATEGORY_COUNT: usize = 2;

/// Evaluate the user's current-month budget
pub fn evaluate_budget(db: &Database, user_id: i64, today: NaiveDate) -> Result<BudgetReport> {
    let period = YearMonth::from_date(today);
    let budget = db.get_or_create_budget(user_id, period)?;
    let expenses = db.monthly_total(user_id, TransactionKind::Expense, period)?;

    let status = if expenses <= budget.budget_amount {
        BudgetStatus::WithinBudget
    } else {
        BudgetStatus::Exceeded
    };

    let message = match status {
        BudgetStatus::WithinBudget => WITHIN_BUDGET_MESSAGE,
        BudgetStatus::Exceeded => EXCEEDED_MESSAGE,
    };

    // Usage percentage is only meaningful against a configured budget
    let usage_pct = money::ratio_pct(expenses, budget.budget_amount)
        .map(money::round_money)
        .unwrap_or(Decimal::ZERO);

    let top_categories = if status == BudgetStatus::Exceeded {
        let mut totals = db.expense_totals_by_category(user_id, Some(period))?;
        totals.truncate(TOP_CATEGORY_COUNT);
        totals
    } else {
        Vec::new()
    };

    debug!(
        user_id,
        %expenses,
        budget = %budget.budget_amount,
        status = status.as_str(),
        "Budget evaluated"
    );

    Ok(BudgetReport {
        period,
        budget: money::round_money(budget.budget_amount),
        expenses: money::round_money(expenses),
        remaining: money::round_money(budget.budget_amount - expenses),
        usage_pct,
        status,
        message: message.to_string(),
        top_categories,
    })
}

//! Dashboard assembly, spending advice and trend projection
//!
//! `dashboard_report` runs every analytics component for a user in one
//! pass. Components are fault-isolated: a component that errors is
//! logged and its slot left empty, so one bad aggregate never blanks the
//! whole dashboard. Only the balance summary is mandatory.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use super::types::{
    BalanceSummary, DashboardReport, RiskLevel, SpendingAdvice, SpendingAdviceStatus,
    TrendProjection,
};
use super::{anomaly, badges, budget, health, planner};
use crate::db::{Database, LedgerFilter};
use crate::error::Result;
use crate::models::{TransactionKind, YearMonth};
use crate::money;

/// Completed months feeding the rolling projection
pub(crate) const TREND_WINDOW_MONTHS: u32 = 3;

/// Fraction of the current balance that should survive a planned spend
const SAVINGS_THRESHOLD: Decimal = dec!(0.20);

const ADVICE_SAFE: &str = "Safe to Spend: You will still retain at least 20% savings.";
const ADVICE_LOW_SAVINGS: &str = "Warning: Low Savings. You will have less than 20% savings.";
const ADVICE_NOT_RECOMMENDED: &str =
    "Not Recommended: This spending would exceed your balance.";

/// All-time income, expense and net balance
pub fn balance_summary(db: &Database, user_id: i64) -> Result<BalanceSummary> {
    let income_total =
        db.sum_amount(LedgerFilter::for_user(user_id).kind(TransactionKind::Income))?;
    let expense_total =
        db.sum_amount(LedgerFilter::for_user(user_id).kind(TransactionKind::Expense))?;

    Ok(BalanceSummary {
        income_total,
        expense_total,
        current_balance: income_total - expense_total,
    })
}

/// Verdict on a planned one-off spend against the current balance.
///
/// Safe when at least 20% of the balance survives, a warning when less
/// does, and not recommended when the spend overdraws the balance.
pub fn advise_spending(
    db: &Database,
    user_id: i64,
    planned_amount: Decimal,
) -> Result<SpendingAdvice> {
    let balance = balance_summary(db, user_id)?.current_balance;
    let remaining_balance = balance - planned_amount;
    let savings_threshold = balance * SAVINGS_THRESHOLD;

    let (status, message) = if remaining_balance < Decimal::ZERO {
        (SpendingAdviceStatus::NotRecommended, ADVICE_NOT_RECOMMENDED)
    } else if remaining_balance >= savings_threshold {
        (SpendingAdviceStatus::Safe, ADVICE_SAFE)
    } else {
        (SpendingAdviceStatus::LowSavings, ADVICE_LOW_SAVINGS)
    };

    Ok(SpendingAdvice {
        status,
        message: message.to_string(),
        color: status.color().to_string(),
        remaining_balance: money::round_money(remaining_balance),
    })
}

/// Project next month from a rolling average of the three completed
/// months before `today`. Months without activity count as zero, so the
/// projection dampens rather than ignores quiet months.
pub fn trend_projection(
    db: &Database,
    user_id: i64,
    today: NaiveDate,
) -> Result<TrendProjection> {
    let current = YearMonth::from_date(today);

    let mut incomes = Vec::with_capacity(TREND_WINDOW_MONTHS as usize);
    let mut expenses = Vec::with_capacity(TREND_WINDOW_MONTHS as usize);
    for i in 1..=TREND_WINDOW_MONTHS {
        let period = current.months_back(i);
        incomes.push(db.monthly_total(user_id, TransactionKind::Income, period)?);
        expenses.push(db.monthly_total(user_id, TransactionKind::Expense, period)?);
    }

    let predicted_income = rolling_average(&incomes);
    let predicted_expense = rolling_average(&expenses);
    let predicted_balance = money::round_money(predicted_income - predicted_expense);

    let financial_risk = if predicted_balance >= Decimal::ZERO {
        RiskLevel::Low
    } else {
        RiskLevel::High
    };

    // expenses[0] is last month, expenses[1] the month before it
    let mom_expense_change_pct = money::ratio_pct(expenses[0] - expenses[1], expenses[1])
        .map(money::round_money);

    Ok(TrendProjection {
        predicted_income,
        predicted_expense,
        predicted_balance,
        financial_risk,
        mom_expense_change_pct,
    })
}

fn rolling_average(values: &[Decimal]) -> Decimal {
    let sum: Decimal = values.iter().copied().sum();
    money::safe_div(sum, Decimal::from(values.len()))
        .map(money::round_money)
        .unwrap_or(Decimal::ZERO)
}

/// Assemble the full dashboard for a user
pub fn dashboard_report(db: &Database, user_id: i64, today: NaiveDate) -> Result<DashboardReport> {
    let balance = balance_summary(db, user_id)?;

    let budget = degrade(user_id, "budget", budget::evaluate_budget(db, user_id, today));
    let health = degrade(user_id, "health", health::score(db, user_id, today));
    let anomalies = degrade(user_id, "anomaly", anomaly::detect(db, user_id));
    let trend = degrade(user_id, "trend", trend_projection(db, user_id, today));

    let (goal, goal_plan) = match db.active_goal(user_id, today) {
        Ok(Some(active)) => {
            let progress =
                degrade(user_id, "goal_progress", planner::goal_progress(db, &active, today));
            let plan = match planner::current_saved(db, &active, today) {
                Ok(saved) => degrade(
                    user_id,
                    "goal_plan",
                    planner::calculate_goal_plan(db, &active, saved),
                ),
                Err(err) => {
                    warn!(user_id, %err, "Skipping goal plan");
                    None
                }
            };
            (progress, plan)
        }
        Ok(None) => (None, None),
        Err(err) => {
            warn!(user_id, %err, "Skipping goal lookup");
            (None, None)
        }
    };

    let newly_awarded =
        degrade(user_id, "badges", badges::evaluate(db, user_id, today)).unwrap_or_default();
    let badges = db.list_badges(user_id).unwrap_or_default();

    let insights = build_insights(trend.as_ref(), anomalies.as_ref());

    Ok(DashboardReport {
        user_id,
        generated_on: today,
        balance,
        budget,
        health,
        anomalies,
        trend,
        goal,
        goal_plan,
        newly_awarded,
        badges,
        insights,
    })
}

fn degrade<T>(user_id: i64, component: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(user_id, component, %err, "Dashboard component failed");
            None
        }
    }
}

/// Short takeaways derived from the component reports
fn build_insights(
    trend: Option<&TrendProjection>,
    anomalies: Option<&super::types::AnomalyReport>,
) -> Vec<String> {
    let mut insights = Vec::new();

    if let Some(change) = trend.and_then(|t| t.mom_expense_change_pct) {
        insights.push(format!("Month-over-month expense change: {change}%."));
    }
    if let Some(report) = anomalies {
        if !report.top_categories.is_empty() {
            let names: Vec<&str> = report
                .top_categories
                .iter()
                .map(|c| c.category.display_name())
                .collect();
            insights.push(format!("Top spending categories: {}.", names.join(", ")));
        }
        if !report.spikes.is_empty() {
            insights.push(format!(
                "Detected {} spending spikes in recent data.",
                report.spikes.len()
            ));
        }
        if !report.abnormal_transactions.is_empty() {
            insights.push(format!(
                "{} transactions appear unusually large for their category.",
                report.abnormal_transactions.len()
            ));
        }
    }

    insights
}

//! Financial health scorer
//!
//! Combines five weighted sub-scores into one 0-100 figure:
//! savings rate (30), expense ratio (20), budget discipline (20),
//! consistency (15) and over-budget frequency (15). The discipline,
//! consistency and over-budget components look at the six months before
//! the current one; the in-progress month is excluded.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::types::{HealthLabel, HealthReport, ScoreBreakdown};
use crate::db::{Database, LedgerFilter};
use crate::error::Result;
use crate::models::{TransactionKind, YearMonth};
use crate::money;

/// Months in the budget-discipline and consistency window
pub(crate) const DISCIPLINE_WINDOW_MONTHS: u32 = 6;

const SAVINGS_SUGGESTION: &str = "Increase monthly savings: target at least 10-20% of income.";
const BUDGET_SUGGESTION: &str = "Set or adjust monthly budgets and review top spending categories.";
const CONSISTENCY_SUGGESTION: &str =
    "Track transactions consistently every month to improve insights.";
const OVER_BUDGET_SUGGESTION: &str =
    "Reduce frequency of overspending months; automate small savings.";

/// Budget adherence over the discipline window
#[derive(Debug, Clone, Copy)]
pub(crate) struct DisciplineStats {
    /// Months in the window with a configured budget
    pub checked: u32,
    /// Of those, months where expenses stayed within the budget
    pub within: u32,
}

/// Count months with a configured budget and months spent within it,
/// over the six months before `current`
pub(crate) fn discipline_stats(
    db: &Database,
    user_id: i64,
    current: YearMonth,
) -> Result<DisciplineStats> {
    let mut checked = 0;
    let mut within = 0;

    for i in 1..=DISCIPLINE_WINDOW_MONTHS {
        let period = current.months_back(i);
        if let Some(budget) = db.get_budget(user_id, period)? {
            checked += 1;
            let expenses = db.monthly_total(user_id, TransactionKind::Expense, period)?;
            if expenses <= budget.budget_amount {
                within += 1;
            }
        }
    }

    Ok(DisciplineStats { checked, within })
}

/// All-time savings rate as a percentage; zero when there is no income
pub(crate) fn savings_rate(db: &Database, user_id: i64) -> Result<Decimal> {
    let income = db.sum_amount(LedgerFilter::for_user(user_id).kind(TransactionKind::Income))?;
    let expense = db.sum_amount(LedgerFilter::for_user(user_id).kind(TransactionKind::Expense))?;
    Ok(money::ratio_pct(income - expense, income).unwrap_or(Decimal::ZERO))
}

/// Compute the user's financial health score
pub fn score(db: &Database, user_id: i64, today: NaiveDate) -> Result<HealthReport> {
    let current = YearMonth::from_date(today);

    // A user with no history scores zero across the board; the formulas
    // below would otherwise hand out free over-budget points.
    let has_history = db.count_transactions(LedgerFilter::for_user(user_id))? > 0;
    let breakdown = if has_history {
        compute_breakdown(db, user_id, current)?
    } else {
        ScoreBreakdown {
            savings_rate: Decimal::ZERO,
            expense_ratio: Decimal::ZERO,
            budget_discipline: Decimal::ZERO,
            consistency: Decimal::ZERO,
            over_budget: Decimal::ZERO,
        }
    };

    let total = money::round_money(
        breakdown.savings_rate
            + breakdown.expense_ratio
            + breakdown.budget_discipline
            + breakdown.consistency
            + breakdown.over_budget,
    );

    let label = label_for(total);

    let mut suggestions = Vec::new();
    if breakdown.savings_rate < dec!(6.0) {
        suggestions.push(SAVINGS_SUGGESTION.to_string());
    }
    if breakdown.budget_discipline < dec!(8.0) {
        suggestions.push(BUDGET_SUGGESTION.to_string());
    }
    if breakdown.consistency < dec!(8.0) {
        suggestions.push(CONSISTENCY_SUGGESTION.to_string());
    }
    if breakdown.over_budget < dec!(8.0) {
        suggestions.push(OVER_BUDGET_SUGGESTION.to_string());
    }

    debug!(user_id, score = %total, label = label.as_str(), "Health score computed");

    Ok(HealthReport {
        score: total,
        display_score: total.to_f64().unwrap_or(0.0),
        label,
        color: label.color().to_string(),
        breakdown,
        suggestions,
    })
}

fn compute_breakdown(db: &Database, user_id: i64, current: YearMonth) -> Result<ScoreBreakdown> {
    let income = db.sum_amount(LedgerFilter::for_user(user_id).kind(TransactionKind::Income))?;
    let expense = db.sum_amount(LedgerFilter::for_user(user_id).kind(TransactionKind::Expense))?;

    // Savings rate: capped at 30 raw points before the 0.3 weight, so a
    // rate above 30% earns no more than the category maximum.
    let savings_rate = money::ratio_pct(income - expense, income).unwrap_or(Decimal::ZERO);
    let score_savings = savings_rate.clamp(Decimal::ZERO, dec!(30.0)) * dec!(0.3);

    // Expense-to-income ratio: lower is better, 100 assumed with no income.
    let expense_ratio = money::ratio_pct(expense, income).unwrap_or(dec!(100.0));
    let score_expense = (dec!(100.0) - expense_ratio).max(Decimal::ZERO) * dec!(0.2);

    // Budget discipline: share of checked months spent within budget.
    let stats = discipline_stats(db, user_id, current)?;
    let discipline = if stats.checked > 0 {
        Decimal::from(stats.within) / Decimal::from(stats.checked) * dec!(100.0)
    } else {
        Decimal::ZERO
    };
    let score_budget = discipline / dec!(100.0) * dec!(20.0);

    // Consistency: months in the window with at least one transaction.
    let mut months_with_tx = 0u32;
    for i in 1..=DISCIPLINE_WINDOW_MONTHS {
        if db.month_has_transactions(user_id, current.months_back(i))? {
            months_with_tx += 1;
        }
    }
    let consistency =
        Decimal::from(months_with_tx) / Decimal::from(DISCIPLINE_WINDOW_MONTHS) * dec!(100.0);
    let score_consistency = consistency / dec!(100.0) * dec!(15.0);

    // Over-budget frequency: penalize months that blew their budget.
    let over = stats.checked.saturating_sub(stats.within);
    let over_freq = Decimal::from(over) / Decimal::from(stats.checked.max(1)) * dec!(100.0);
    let score_over = (dec!(100.0) - over_freq).max(Decimal::ZERO) / dec!(100.0) * dec!(15.0);

    Ok(ScoreBreakdown {
        savings_rate: score_savings,
        expense_ratio: score_expense,
        budget_discipline: score_budget,
        consistency: score_consistency,
        over_budget: score_over,
    })
}

fn label_for(score: Decimal) -> HealthLabel {
    if score >= dec!(80) {
        HealthLabel::Excellent
    } else if score >= dec!(60) {
        HealthLabel::Good
    } else if score >= dec!(40) {
        HealthLabel::Average
    } else {
        HealthLabel::Poor
    }
}

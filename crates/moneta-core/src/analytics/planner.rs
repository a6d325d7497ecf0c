//! Savings goal planner
//!
//! Turns a goal (target, deadline, and optionally either a monthly
//! commitment or a month count) into an installment plan: the missing
//! half of commitment/months, a feasibility verdict, a fixed menu of
//! standard installment options, and expense-cut suggestions drawn from
//! the owner's top spending categories.
//!
//! Every derived figure is computed independently; an arithmetic fault in
//! one option drops that option and leaves the rest of the plan intact.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use super::types::{EmiOption, ExpenseCutSuggestion, GoalPlan, GoalProgress};
use crate::db::{Database, LedgerFilter};
use crate::error::Result;
use crate::models::{SavingsGoal, TransactionKind};
use crate::money;

/// Fixed installment menu offered alongside every plan
const STANDARD_EMI_MONTHS: [u32; 4] = [3, 6, 9, 12];

/// How many top expense categories receive cut suggestions
const CUT_SUGGESTION_COUNT: usize = 2;

const TEN_PCT: Decimal = dec!(0.10);
const TWENTY_PCT: Decimal = dec!(0.20);

/// Net amount saved towards a goal: income minus expense over
/// [start_date, today]
pub fn current_saved(db: &Database, goal: &SavingsGoal, today: NaiveDate) -> Result<Decimal> {
    let income = db.sum_amount(
        LedgerFilter::for_user(goal.user_id)
            .kind(TransactionKind::Income)
            .date_range(goal.start_date, today),
    )?;
    let expense = db.sum_amount(
        LedgerFilter::for_user(goal.user_id)
            .kind(TransactionKind::Expense)
            .date_range(goal.start_date, today),
    )?;
    Ok(income - expense)
}

/// Whether the amount saved so far already covers the target.
///
/// Informational only; a goal is completed by an explicit user action,
/// never by this check.
pub fn has_sufficient_balance(db: &Database, goal: &SavingsGoal, today: NaiveDate) -> Result<bool> {
    Ok(current_saved(db, goal, today)? >= goal.target_amount)
}

/// Read-time progress summary for a goal
pub fn goal_progress(
    db: &Database,
    goal: &SavingsGoal,
    today: NaiveDate,
) -> Result<GoalProgress> {
    let saved = current_saved(db, goal, today)?;
    let progress_pct = money::ratio_pct(saved, goal.target_amount)
        .unwrap_or(Decimal::ZERO)
        .min(Decimal::ONE_HUNDRED)
        .max(Decimal::ZERO);

    Ok(GoalProgress {
        goal_id: goal.id,
        name: goal.name.clone(),
        target_amount: goal.target_amount,
        saved: money::round_money(saved),
        progress_pct: money::round_money(progress_pct),
        days_remaining: goal.days_remaining(today),
        months_remaining: goal.months_remaining(today),
        sufficient_balance: saved >= goal.target_amount,
        completed: goal.completed,
    })
}

/// Build the installment plan for a goal given the amount already saved
pub fn calculate_goal_plan(
    db: &Database,
    goal: &SavingsGoal,
    current_saved: Decimal,
) -> Result<GoalPlan> {
    let remaining = (goal.target_amount - current_saved).max(Decimal::ZERO);

    let (monthly_commitment, planned_months, is_feasible) = if remaining.is_zero() {
        (Decimal::ZERO, 0, true)
    } else {
        derive_commitment(goal, remaining)
    };

    let standard_emi_options = standard_emi_options(goal.id, remaining);
    let expense_suggestions = if monthly_commitment > Decimal::ZERO {
        expense_cut_suggestions(db, goal.user_id)?
    } else {
        Vec::new()
    };

    Ok(GoalPlan {
        goal_id: goal.id,
        monthly_commitment,
        planned_months,
        remaining_to_save: money::round_money(remaining),
        is_feasible,
        expense_suggestions,
        standard_emi_options,
    })
}

/// Derive the missing half of commitment/months from whichever the goal
/// carries. With neither set, the plan is reported as infeasible and the
/// goal's stored values pass through unchanged.
fn derive_commitment(goal: &SavingsGoal, remaining: Decimal) -> (Decimal, u32, bool) {
    if let Some(months) = goal.planned_months.filter(|m| *m > 0) {
        match money::safe_div(remaining, Decimal::from(months)) {
            Some(per_month) => return (money::round_money(per_month), months, true),
            None => {
                warn!(goal_id = goal.id, months, "Skipping commitment derivation");
            }
        }
    } else if let Some(commitment) = goal.monthly_commitment.filter(|c| *c > Decimal::ZERO) {
        match money::safe_div(remaining, commitment) {
            Some(ratio) => {
                let months = ratio.ceil().to_u32().unwrap_or(u32::MAX).max(1);
                return (money::round_money(commitment), months, true);
            }
            None => {
                warn!(goal_id = goal.id, "Skipping month derivation");
            }
        }
    }

    (
        goal.monthly_commitment.unwrap_or(Decimal::ZERO),
        goal.planned_months.unwrap_or(0),
        false,
    )
}

/// Commitment for each month count in the fixed menu. Options whose
/// division faults are dropped rather than aborting the menu.
fn standard_emi_options(goal_id: i64, remaining: Decimal) -> Vec<EmiOption> {
    STANDARD_EMI_MONTHS
        .iter()
        .filter_map(|&months| {
            match money::safe_div(remaining, Decimal::from(months)) {
                Some(per_month) => Some(EmiOption {
                    months,
                    monthly_commitment: money::round_money(per_month),
                }),
                None => {
                    warn!(goal_id, months, "Skipping installment option");
                    None
                }
            }
        })
        .collect()
}

/// Cut suggestions for the user's top all-time expense categories
fn expense_cut_suggestions(db: &Database, user_id: i64) -> Result<Vec<ExpenseCutSuggestion>> {
    let mut totals = db.expense_totals_by_category(user_id, None)?;
    totals.truncate(CUT_SUGGESTION_COUNT);

    Ok(totals
        .into_iter()
        .map(|entry| {
            let cut_ten = money::round_money(entry.total * TEN_PCT);
            let cut_twenty = money::round_money(entry.total * TWENTY_PCT);
            ExpenseCutSuggestion {
                category: entry.category,
                current_spend: entry.total,
                cut_ten_pct: cut_ten,
                remaining_after_ten: money::round_money(entry.total - cut_ten),
                cut_twenty_pct: cut_twenty,
                remaining_after_twenty: money::round_money(entry.total - cut_twenty),
            }
        })
        .collect())
}

//! Achievement badge evaluation
//!
//! Each badge has one earning rule, checked against current history and
//! granted at most once per user. Grants are never revoked: a user who
//! later regresses keeps the badge. Each rule runs in isolation so a
//! failure in one check cannot block the others.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use super::health;
use crate::db::Database;
use crate::error::Result;
use crate::models::{Badge, TransactionKind, YearMonth};

/// All-time savings rate (percent) that earns SAVINGS_CHAMPION
const SAVINGS_CHAMPION_RATE: Decimal = dec!(15);

/// Within-budget months required for BUDGET_MASTER, capped at the number
/// of months that actually have a configured budget
const BUDGET_MASTER_MONTHS: u32 = 3;

/// EXPENSE_REDUCER fires when last month's spend dropped below 90% of the
/// month before
const EXPENSE_REDUCER_FACTOR: Decimal = dec!(0.9);

/// Check every badge rule for a user and persist any new grants.
///
/// Returns only the badges granted by this call; already-held badges are
/// skipped without touching the rules.
pub fn evaluate(db: &Database, user_id: i64, today: NaiveDate) -> Result<Vec<Badge>> {
    let current = YearMonth::from_date(today);
    let mut newly_awarded = Vec::new();

    let checks: [(Badge, fn(&Database, i64, YearMonth) -> Result<bool>); 3] = [
        (Badge::SavingsChampion, earns_savings_champion),
        (Badge::BudgetMaster, earns_budget_master),
        (Badge::ExpenseReducer, earns_expense_reducer),
    ];

    for (badge, earns) in checks {
        match check_and_grant(db, user_id, current, badge, earns) {
            Ok(true) => newly_awarded.push(badge),
            Ok(false) => {}
            Err(err) => {
                warn!(user_id, badge = badge.as_str(), %err, "Badge check failed");
            }
        }
    }

    Ok(newly_awarded)
}

/// One badge's full check-and-grant path. Isolated per badge so a
/// storage or rule failure here cannot block the remaining checks.
fn check_and_grant(
    db: &Database,
    user_id: i64,
    current: YearMonth,
    badge: Badge,
    earns: fn(&Database, i64, YearMonth) -> Result<bool>,
) -> Result<bool> {
    if db.has_badge(user_id, badge)? {
        return Ok(false);
    }
    if !earns(db, user_id, current)? {
        return Ok(false);
    }
    db.award_badge(user_id, badge)
}

fn earns_savings_champion(db: &Database, user_id: i64, _current: YearMonth) -> Result<bool> {
    Ok(health::savings_rate(db, user_id)? >= SAVINGS_CHAMPION_RATE)
}

/// Within budget for the recent checked months. Users with fewer than
/// three budgeted months qualify by staying within every one they have.
fn earns_budget_master(db: &Database, user_id: i64, current: YearMonth) -> Result<bool> {
    let stats = health::discipline_stats(db, user_id, current)?;
    Ok(stats.checked > 0 && stats.within >= stats.checked.min(BUDGET_MASTER_MONTHS))
}

/// Last completed month spent less than 90% of the month before it
fn earns_expense_reducer(db: &Database, user_id: i64, current: YearMonth) -> Result<bool> {
    let last_month = db.monthly_total(
        user_id,
        TransactionKind::Expense,
        current.months_back(1),
    )?;
    let month_before = db.monthly_total(
        user_id,
        TransactionKind::Expense,
        current.months_back(2),
    )?;

    Ok(month_before > Decimal::ZERO && last_month < month_before * EXPENSE_REDUCER_FACTOR)
}

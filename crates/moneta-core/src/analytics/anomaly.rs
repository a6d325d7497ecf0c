//! Anomaly and trend detector
//!
//! Three read-only scans over the user's expense history:
//! - top spending categories (all-time, top 3)
//! - transactions unusually large for their category
//! - days with unusually high aggregate spend
//!
//! Both anomaly checks use a strict 1.5x threshold: an amount exactly at
//! 1.5x the comparison average is not flagged.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use tracing::debug;

use super::types::{AbnormalTransaction, AnomalyReport, SpendingSpike};
use crate::db::Database;
use crate::error::Result;
use crate::models::Category;
use crate::money;

/// Multiplier over the comparison average that marks an outlier
const OUTLIER_FACTOR: Decimal = dec!(1.5);

/// How many top categories to report
const TOP_CATEGORY_COUNT: usize = 3;

/// How many of the largest expenses to scan for category outliers
const ABNORMAL_SCAN_LIMIT: i64 = 50;

/// How many of the highest-spend days to scan for spikes
const SPIKE_SCAN_LIMIT: i64 = 30;

const ABNORMAL_REASON: &str = "High relative to category average";

/// Run all anomaly and trend scans for a user
pub fn detect(db: &Database, user_id: i64) -> Result<AnomalyReport> {
    let mut top_categories = db.expense_totals_by_category(user_id, None)?;
    top_categories.truncate(TOP_CATEGORY_COUNT);

    let abnormal_transactions = detect_abnormal_transactions(db, user_id)?;
    let spikes = detect_spikes(db, user_id)?;

    debug!(
        user_id,
        abnormal = abnormal_transactions.len(),
        spikes = spikes.len(),
        "Anomaly scan complete"
    );

    Ok(AnomalyReport {
        top_categories,
        abnormal_transactions,
        spikes,
    })
}

/// Flag expenses whose amount exceeds 1.5x their category's all-time average
fn detect_abnormal_transactions(
    db: &Database,
    user_id: i64,
) -> Result<Vec<AbnormalTransaction>> {
    let averages: HashMap<Category, Decimal> = db
        .average_expense_by_category(user_id)?
        .into_iter()
        .map(|a| (a.category, a.average))
        .collect();

    let mut abnormal = Vec::new();
    for tx in db.largest_expenses(user_id, ABNORMAL_SCAN_LIMIT)? {
        let average = averages.get(&tx.category).copied().unwrap_or(Decimal::ZERO);
        if average > Decimal::ZERO && tx.amount > average * OUTLIER_FACTOR {
            abnormal.push(AbnormalTransaction {
                transaction_id: tx.id,
                date: tx.date,
                category: tx.category,
                amount: tx.amount,
                category_average: money::round_money(average),
                reason: ABNORMAL_REASON.to_string(),
            });
        }
    }

    Ok(abnormal)
}

/// Flag days whose total exceeds 1.5x the mean of the highest-spend days
fn detect_spikes(db: &Database, user_id: i64) -> Result<Vec<SpendingSpike>> {
    let daily_totals = db.top_expense_days(user_id, SPIKE_SCAN_LIMIT)?;
    if daily_totals.is_empty() {
        return Ok(Vec::new());
    }

    let sum: Decimal = daily_totals.iter().map(|d| d.total).sum();
    let mean = match money::safe_div(sum, Decimal::from(daily_totals.len())) {
        Some(mean) => mean,
        None => return Ok(Vec::new()),
    };

    Ok(daily_totals
        .into_iter()
        .filter(|d| d.total > mean * OUTLIER_FACTOR)
        .map(|d| SpendingSpike {
            date: d.date,
            total: d.total,
            window_average: money::round_money(mean),
        })
        .collect())
}

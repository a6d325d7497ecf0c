//! Domain models for Moneta

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a transaction adds to or subtracts from the balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed expense/income categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Food,
    Travel,
    Rent,
    Shopping,
    Other,
}

/// All categories in declaration order; used as the stable tiebreak when
/// ranking categories with equal totals.
pub const CATEGORIES: [Category; 5] = [
    Category::Food,
    Category::Travel,
    Category::Rent,
    Category::Shopping,
    Category::Other,
];

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "FOOD",
            Self::Travel => "TRAVEL",
            Self::Rent => "RENT",
            Self::Shopping => "SHOPPING",
            Self::Other => "OTHER",
        }
    }

    /// Human-readable label for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Travel => "Travel",
            Self::Rent => "Rent",
            Self::Shopping => "Shopping",
            Self::Other => "Other",
        }
    }

    /// Position in the stable category ordering
    pub fn ordinal(&self) -> usize {
        CATEGORIES
            .iter()
            .position(|c| c == self)
            .unwrap_or(CATEGORIES.len())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FOOD" => Ok(Self::Food),
            "TRAVEL" => Ok(Self::Travel),
            "RENT" => Ok(Self::Rent),
            "SHOPPING" => Ok(Self::Shopping),
            "OTHER" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded income or expense entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub kind: TransactionKind,
    pub category: Category,
    /// Non-negative amount; the kind determines the sign contribution
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Signed contribution to the balance: +amount for income, -amount for expense
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

/// Payload for creating or editing a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub category: Category,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
}

/// Per-user spending cap for one calendar month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyBudget {
    pub id: i64,
    pub user_id: i64,
    /// 1-12
    pub month: u32,
    pub year: i32,
    pub budget_amount: Decimal,
}

impl MonthlyBudget {
    /// "March 2026" style label for the budget period
    pub fn period_label(&self) -> String {
        const MONTHS: [&str; 12] = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];
        let name = MONTHS
            .get(self.month.saturating_sub(1) as usize)
            .unwrap_or(&"Unknown");
        format!("{} {}", name, self.year)
    }
}

/// A savings target with a deadline and optional installment plan inputs
///
/// At most one of `monthly_commitment` / `planned_months` is authoritative;
/// the planner derives the other. Progress is never stored: it is always
/// recomputed as income minus expense over `[start_date, today]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_commitment: Option<Decimal>,
    pub planned_months: Option<u32>,
    /// Set only by explicit user action, never inferred from balance
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl SavingsGoal {
    /// Days until the deadline, clamped to zero for past deadlines
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days().max(0)
    }

    /// Whole months until the deadline: ceiling division of the day span
    /// by 30, floored at 1
    pub fn months_remaining(&self, today: NaiveDate) -> i64 {
        let days = self.days_remaining(today);
        ((days + 29) / 30).max(1)
    }
}

/// Payload for creating a savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSavingsGoal {
    pub name: String,
    pub target_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_commitment: Option<Decimal>,
    pub planned_months: Option<u32>,
}

/// Achievement badge kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Badge {
    /// All-time savings rate of 15% or better
    SavingsChampion,
    /// Stayed within budget for the recent checked months
    BudgetMaster,
    /// Cut month-over-month expenses by 10% or more
    ExpenseReducer,
}

impl Badge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SavingsChampion => "SAVINGS_CHAMPION",
            Self::BudgetMaster => "BUDGET_MASTER",
            Self::ExpenseReducer => "EXPENSE_REDUCER",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SavingsChampion => "Savings Champion",
            Self::BudgetMaster => "Budget Master",
            Self::ExpenseReducer => "Expense Reducer",
        }
    }
}

impl std::str::FromStr for Badge {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SAVINGS_CHAMPION" => Ok(Self::SavingsChampion),
            "BUDGET_MASTER" => Ok(Self::BudgetMaster),
            "EXPENSE_REDUCER" => Ok(Self::ExpenseReducer),
            _ => Err(format!("Unknown badge: {}", s)),
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A granted achievement badge; unique per (user, badge) and never revoked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementBadge {
    pub id: i64,
    pub user_id: i64,
    pub badge: Badge,
    pub awarded_at: DateTime<Utc>,
}

/// A calendar (year, month) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The (year, month) `n` months before this one
    pub fn months_back(&self, n: u32) -> Self {
        let mut year = self.year;
        let mut month = self.month as i32 - n as i32;
        while month <= 0 {
            month += 12;
            year -= 1;
        }
        Self {
            year,
            month: month as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_kind_round_trip() {
        assert_eq!(TransactionKind::Income.as_str(), "INCOME");
        assert_eq!(
            TransactionKind::from_str("expense").unwrap(),
            TransactionKind::Expense
        );
        assert!(TransactionKind::from_str("transfer").is_err());
    }

    #[test]
    fn test_category_ordering() {
        assert_eq!(Category::Food.ordinal(), 0);
        assert_eq!(Category::Other.ordinal(), 4);
        assert_eq!(Category::from_str("SHOPPING").unwrap(), Category::Shopping);
    }

    #[test]
    fn test_months_back_wraps_year() {
        let ym = YearMonth::new(2026, 2);
        assert_eq!(ym.months_back(1), YearMonth::new(2026, 1));
        assert_eq!(ym.months_back(2), YearMonth::new(2025, 12));
        assert_eq!(ym.months_back(14), YearMonth::new(2024, 12));
    }

    #[test]
    fn test_goal_days_remaining_clamped() {
        let goal = SavingsGoal {
            id: 1,
            user_id: 1,
            name: "Laptop".to_string(),
            target_amount: Decimal::new(500000, 2),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            monthly_commitment: None,
            planned_months: None,
            completed: false,
            created_at: Utc::now(),
        };

        let before = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert_eq!(goal.days_remaining(before), 28);
        // 28 days -> one month
        assert_eq!(goal.months_remaining(before), 1);

        let after = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        assert_eq!(goal.days_remaining(after), 0);
        assert_eq!(goal.months_remaining(after), 1);
    }

    #[test]
    fn test_signed_amount() {
        let mut tx = Transaction {
            id: 1,
            user_id: 1,
            kind: TransactionKind::Income,
            category: Category::Other,
            amount: Decimal::new(12550, 2),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            created_at: Utc::now(),
        };
        assert_eq!(tx.signed_amount(), Decimal::new(12550, 2));
        tx.kind = TransactionKind::Expense;
        assert_eq!(tx.signed_amount(), Decimal::new(-12550, 2));
    }

    #[test]
    fn test_period_label() {
        let budget = MonthlyBudget {
            id: 1,
            user_id: 1,
            month: 3,
            year: 2026,
            budget_amount: Decimal::ZERO,
        };
        assert_eq!(budget.period_label(), "March 2026");
    }
}

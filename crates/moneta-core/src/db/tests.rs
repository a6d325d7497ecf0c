//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_tx(
        kind: TransactionKind,
        category: Category,
        amount: Decimal,
        day: NaiveDate,
    ) -> NewTransaction {
        NewTransaction {
            kind,
            category,
            amount,
            description: "test".to_string(),
            date: day,
        }
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        let txs = db.list_transactions(1, 10, 0).unwrap();
        assert!(txs.is_empty());
    }

    #[test]
    fn test_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('transactions') WHERE name IN ('id', 'user_id', 'kind', 'category', 'amount_minor', 'description', 'date', 'created_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 8, "transactions table should have 8 expected columns");

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('monthly_budgets') WHERE name IN ('id', 'user_id', 'month', 'year', 'budget_minor')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 5, "monthly_budgets table should have 5 expected columns");

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('savings_goals') WHERE name IN ('id', 'user_id', 'name', 'target_minor', 'start_date', 'end_date', 'monthly_commitment_minor', 'planned_months', 'completed', 'created_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 10, "savings_goals table should have 10 expected columns");

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('achievement_badges') WHERE name IN ('id', 'user_id', 'badge', 'awarded_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 4, "achievement_badges table should have 4 expected columns");
    }

    #[test]
    fn test_transaction_crud() {
        let db = Database::in_memory().unwrap();

        let id = db
            .insert_transaction(
                1,
                &new_tx(
                    TransactionKind::Expense,
                    Category::Food,
                    dec!(42.50),
                    date(2026, 3, 15),
                ),
            )
            .unwrap();
        assert!(id > 0);

        let tx = db.get_transaction(1, id).unwrap();
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.category, Category::Food);
        assert_eq!(tx.amount, dec!(42.50));
        assert_eq!(tx.date, date(2026, 3, 15));

        db.update_transaction(
            1,
            id,
            &new_tx(
                TransactionKind::Income,
                Category::Other,
                dec!(100),
                date(2026, 3, 16),
            ),
        )
        .unwrap();
        let tx = db.get_transaction(1, id).unwrap();
        assert_eq!(tx.kind, TransactionKind::Income);
        assert_eq!(tx.amount, dec!(100.00));

        db.delete_transaction(1, id).unwrap();
        assert!(matches!(
            db.get_transaction(1, id),
            Err(crate::error::Error::NotFound(_))
        ));
    }

    #[test]
    fn test_transactions_are_owner_scoped() {
        let db = Database::in_memory().unwrap();
        let id = db
            .insert_transaction(
                1,
                &new_tx(
                    TransactionKind::Expense,
                    Category::Food,
                    dec!(10),
                    date(2026, 3, 1),
                ),
            )
            .unwrap();

        // another user cannot read, update or delete it
        assert!(db.get_transaction(2, id).is_err());
        assert!(db.delete_transaction(2, id).is_err());
        assert!(db
            .update_transaction(
                2,
                id,
                &new_tx(
                    TransactionKind::Expense,
                    Category::Food,
                    dec!(1),
                    date(2026, 3, 1)
                ),
            )
            .is_err());

        // owner still sees it untouched
        assert_eq!(db.get_transaction(1, id).unwrap().amount, dec!(10.00));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let db = Database::in_memory().unwrap();
        let result = db.insert_transaction(
            1,
            &new_tx(
                TransactionKind::Expense,
                Category::Food,
                dec!(-5),
                date(2026, 3, 1),
            ),
        );
        assert!(matches!(result, Err(crate::error::Error::InvalidAmount(_))));
    }

    #[test]
    fn test_list_transactions_most_recent_first() {
        let db = Database::in_memory().unwrap();
        for day in [5, 20, 12] {
            db.insert_transaction(
                1,
                &new_tx(
                    TransactionKind::Expense,
                    Category::Food,
                    dec!(10),
                    date(2026, 3, day),
                ),
            )
            .unwrap();
        }

        let txs = db.list_transactions(1, 10, 0).unwrap();
        let days: Vec<u32> = txs.iter().map(|t| chrono::Datelike::day(&t.date)).collect();
        assert_eq!(days, vec![20, 12, 5]);
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let db = Database::in_memory().unwrap();
        let total = db
            .sum_amount(LedgerFilter::for_user(1).kind(TransactionKind::Expense))
            .unwrap();
        assert_eq!(total, Decimal::ZERO);
        assert_eq!(db.count_transactions(LedgerFilter::for_user(1)).unwrap(), 0);
    }

    #[test]
    fn test_sum_is_exact_over_many_cents() {
        let db = Database::in_memory().unwrap();
        // 0.10 a hundred times must be exactly 10.00
        for _ in 0..100 {
            db.insert_transaction(
                1,
                &new_tx(
                    TransactionKind::Expense,
                    Category::Food,
                    dec!(0.10),
                    date(2026, 3, 1),
                ),
            )
            .unwrap();
        }

        let total = db
            .sum_amount(LedgerFilter::for_user(1).kind(TransactionKind::Expense))
            .unwrap();
        assert_eq!(total, dec!(10.00));
    }

    #[test]
    fn test_filters_compose() {
        let db = Database::in_memory().unwrap();
        db.insert_transaction(
            1,
            &new_tx(
                TransactionKind::Expense,
                Category::Food,
                dec!(50),
                date(2026, 3, 10),
            ),
        )
        .unwrap();
        db.insert_transaction(
            1,
            &new_tx(
                TransactionKind::Expense,
                Category::Travel,
                dec!(70),
                date(2026, 3, 11),
            ),
        )
        .unwrap();
        db.insert_transaction(
            1,
            &new_tx(
                TransactionKind::Expense,
                Category::Food,
                dec!(30),
                date(2026, 4, 1),
            ),
        )
        .unwrap();
        db.insert_transaction(
            2,
            &new_tx(
                TransactionKind::Expense,
                Category::Food,
                dec!(999),
                date(2026, 3, 10),
            ),
        )
        .unwrap();

        let march = YearMonth { year: 2026, month: 3 };
        let march_food = db
            .sum_amount(
                LedgerFilter::for_user(1)
                    .kind(TransactionKind::Expense)
                    .category(Category::Food)
                    .period(march),
            )
            .unwrap();
        assert_eq!(march_food, dec!(50.00));

        let march_total = db
            .monthly_total(1, TransactionKind::Expense, march)
            .unwrap();
        assert_eq!(march_total, dec!(120.00));

        assert!(db.month_has_transactions(1, march).unwrap());
        assert!(!db
            .month_has_transactions(1, YearMonth { year: 2026, month: 1 })
            .unwrap());
    }

    #[test]
    fn test_category_totals_ordered_with_stable_ties() {
        let db = Database::in_memory().unwrap();
        db.insert_transaction(
            1,
            &new_tx(
                TransactionKind::Expense,
                Category::Travel,
                dec!(100),
                date(2026, 3, 1),
            ),
        )
        .unwrap();
        db.insert_transaction(
            1,
            &new_tx(
                TransactionKind::Expense,
                Category::Food,
                dec!(100),
                date(2026, 3, 2),
            ),
        )
        .unwrap();
        db.insert_transaction(
            1,
            &new_tx(
                TransactionKind::Expense,
                Category::Rent,
                dec!(500),
                date(2026, 3, 3),
            ),
        )
        .unwrap();
        // income never shows up in expense totals
        db.insert_transaction(
            1,
            &new_tx(
                TransactionKind::Income,
                Category::Other,
                dec!(9999),
                date(2026, 3, 4),
            ),
        )
        .unwrap();

        let totals = db.expense_totals_by_category(1, None).unwrap();
        let order: Vec<Category> = totals.iter().map(|t| t.category).collect();
        // Food ties Travel at 100 and wins on declaration order
        assert_eq!(order, vec![Category::Rent, Category::Food, Category::Travel]);
        assert_eq!(totals[0].total, dec!(500.00));
    }

    #[test]
    fn test_category_averages_are_exact() {
        let db = Database::in_memory().unwrap();
        for amount in [dec!(10), dec!(20), dec!(40)] {
            db.insert_transaction(
                1,
                &new_tx(TransactionKind::Expense, Category::Food, amount, date(2026, 3, 1)),
            )
            .unwrap();
        }

        let averages = db.average_expense_by_category(1).unwrap();
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].category, Category::Food);
        assert_eq!(averages[0].transaction_count, 3);
        // 70 / 3 in Decimal, not a float approximation of it
        assert_eq!(averages[0].average, dec!(70) / dec!(3));
        assert_eq!(crate::money::round_money(averages[0].average), dec!(23.33));
    }

    #[test]
    fn test_largest_expenses_and_top_days() {
        let db = Database::in_memory().unwrap();
        db.insert_transaction(
            1,
            &new_tx(TransactionKind::Expense, Category::Food, dec!(10), date(2026, 3, 1)),
        )
        .unwrap();
        db.insert_transaction(
            1,
            &new_tx(TransactionKind::Expense, Category::Food, dec!(30), date(2026, 3, 1)),
        )
        .unwrap();
        db.insert_transaction(
            1,
            &new_tx(TransactionKind::Expense, Category::Food, dec!(25), date(2026, 3, 2)),
        )
        .unwrap();

        let largest = db.largest_expenses(1, 2).unwrap();
        assert_eq!(largest.len(), 2);
        assert_eq!(largest[0].amount, dec!(30.00));
        assert_eq!(largest[1].amount, dec!(25.00));

        let days = db.top_expense_days(1, 10).unwrap();
        assert_eq!(days[0].date, date(2026, 3, 1));
        assert_eq!(days[0].total, dec!(40.00));
        assert_eq!(days[1].total, dec!(25.00));
    }

    #[test]
    fn test_budget_get_or_create_is_idempotent() {
        let db = Database::in_memory().unwrap();
        let period = YearMonth { year: 2026, month: 3 };

        assert!(db.get_budget(1, period).unwrap().is_none());

        let first = db.get_or_create_budget(1, period).unwrap();
        assert_eq!(first.budget_amount, Decimal::ZERO);

        let second = db.get_or_create_budget(1, period).unwrap();
        assert_eq!(second.id, first.id);

        let conn = db.conn().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM monthly_budgets WHERE user_id = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_save_budget_upserts() {
        let db = Database::in_memory().unwrap();
        let period = YearMonth { year: 2026, month: 3 };

        let created = db.save_budget(1, period, dec!(500)).unwrap();
        assert_eq!(created.budget_amount, dec!(500.00));

        let updated = db.save_budget(1, period, dec!(750.25)).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.budget_amount, dec!(750.25));
    }

    #[test]
    fn test_save_budget_validation() {
        let db = Database::in_memory().unwrap();
        assert!(db
            .save_budget(1, YearMonth { year: 2026, month: 13 }, dec!(100))
            .is_err());
        assert!(db
            .save_budget(1, YearMonth { year: 1999, month: 3 }, dec!(100))
            .is_err());
        assert!(db
            .save_budget(1, YearMonth { year: 2026, month: 3 }, dec!(-1))
            .is_err());
    }

    #[test]
    fn test_goal_lifecycle() {
        let db = Database::in_memory().unwrap();
        let goal = db
            .create_goal(
                1,
                &NewSavingsGoal {
                    name: "Vacation".to_string(),
                    target_amount: dec!(1200),
                    start_date: date(2026, 1, 1),
                    end_date: date(2026, 9, 30),
                    monthly_commitment: None,
                    planned_months: Some(6),
                },
            )
            .unwrap();
        assert_eq!(goal.target_amount, dec!(1200.00));
        assert_eq!(goal.planned_months, Some(6));
        assert!(!goal.completed);

        let active = db.active_goal(1, date(2026, 6, 1)).unwrap();
        assert_eq!(active.map(|g| g.id), Some(goal.id));

        // past its deadline the goal is no longer active
        assert!(db.active_goal(1, date(2026, 10, 1)).unwrap().is_none());

        db.mark_goal_completed(1, goal.id).unwrap();
        assert!(db.get_goal(1, goal.id).unwrap().completed);
        assert!(db.active_goal(1, date(2026, 6, 1)).unwrap().is_none());

        db.delete_goal(1, goal.id).unwrap();
        assert!(db.get_goal(1, goal.id).is_err());
    }

    #[test]
    fn test_active_goal_prefers_nearest_deadline() {
        let db = Database::in_memory().unwrap();
        let far = db
            .create_goal(
                1,
                &NewSavingsGoal {
                    name: "Car".to_string(),
                    target_amount: dec!(8000),
                    start_date: date(2026, 1, 1),
                    end_date: date(2027, 6, 30),
                    monthly_commitment: None,
                    planned_months: None,
                },
            )
            .unwrap();
        let near = db
            .create_goal(
                1,
                &NewSavingsGoal {
                    name: "Laptop".to_string(),
                    target_amount: dec!(1500),
                    start_date: date(2026, 1, 1),
                    end_date: date(2026, 12, 31),
                    monthly_commitment: None,
                    planned_months: None,
                },
            )
            .unwrap();

        let active = db.active_goal(1, date(2026, 6, 1)).unwrap().unwrap();
        assert_eq!(active.id, near.id);
        assert_ne!(active.id, far.id);
    }

    #[test]
    fn test_goal_validation() {
        let db = Database::in_memory().unwrap();
        let base = NewSavingsGoal {
            name: "Bad".to_string(),
            target_amount: dec!(100),
            start_date: date(2026, 1, 1),
            end_date: date(2026, 6, 30),
            monthly_commitment: None,
            planned_months: None,
        };

        let mut zero_target = base.clone();
        zero_target.target_amount = Decimal::ZERO;
        assert!(db.create_goal(1, &zero_target).is_err());

        let mut backwards = base.clone();
        backwards.end_date = date(2025, 12, 31);
        assert!(db.create_goal(1, &backwards).is_err());

        let mut zero_months = base.clone();
        zero_months.planned_months = Some(0);
        assert!(db.create_goal(1, &zero_months).is_err());

        let mut bad_commitment = base;
        bad_commitment.monthly_commitment = Some(Decimal::ZERO);
        assert!(db.create_goal(1, &bad_commitment).is_err());
    }

    #[test]
    fn test_badge_grants_are_unique() {
        let db = Database::in_memory().unwrap();

        assert!(!db.has_badge(1, Badge::SavingsChampion).unwrap());
        assert!(db.award_badge(1, Badge::SavingsChampion).unwrap());
        assert!(db.has_badge(1, Badge::SavingsChampion).unwrap());

        // second grant is a no-op
        assert!(!db.award_badge(1, Badge::SavingsChampion).unwrap());
        assert_eq!(db.list_badges(1).unwrap().len(), 1);

        // a different user is unaffected
        assert!(!db.has_badge(2, Badge::SavingsChampion).unwrap());
    }
}

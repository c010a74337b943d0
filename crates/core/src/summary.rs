use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::Category;
use super::money::Money;
use super::transaction::Transaction;

/// Totals derived from one statement. Breakdown keys exist only for
/// categories that received at least one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: Money,
    pub total_expenses: Money,
    pub net_balance_change: Money,
    pub transaction_count: usize,
    #[serde(rename = "categories")]
    pub category_breakdown: BTreeMap<Category, Money>,
}

impl Summary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fold one classified transaction into the running totals.
    pub fn record(&mut self, tx: &Transaction, category: Category) {
        self.total_income += tx.paid_in;
        self.total_expenses += tx.withdrawn;
        self.net_balance_change = self.total_income - self.total_expenses;
        self.transaction_count += 1;
        *self.category_breakdown.entry(category).or_default() += tx.amount();
    }

    pub fn category_total(&self) -> Money {
        self.category_breakdown.values().copied().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::DEFAULT_STATUS;

    fn tx(details: &str, paid_in: i64, withdrawn: i64) -> Transaction {
        Transaction {
            receipt_no: "R1".to_string(),
            completion_time: "01/01/24 10:30".to_string(),
            details: details.to_string(),
            transaction_status: DEFAULT_STATUS.to_string(),
            paid_in: Money::from_cents(paid_in),
            withdrawn: Money::from_cents(withdrawn),
            balance: Money::zero(),
        }
    }

    #[test]
    fn empty_summary_is_zeroed() {
        let s = Summary::empty();
        assert!(s.total_income.is_zero());
        assert!(s.total_expenses.is_zero());
        assert!(s.category_breakdown.is_empty());
        assert!(s.is_empty());
    }

    #[test]
    fn record_accumulates_totals_and_breakdown() {
        let mut s = Summary::empty();
        s.record(&tx("salary", 100_000, 0), Category::MoneyReceived);
        s.record(&tx("naivas", 0, 25_000), Category::Shopping);
        s.record(&tx("quickmart", 0, 5_000), Category::Shopping);

        assert_eq!(s.total_income, Money::from_cents(100_000));
        assert_eq!(s.total_expenses, Money::from_cents(30_000));
        assert_eq!(s.net_balance_change, Money::from_cents(70_000));
        assert_eq!(s.transaction_count, 3);
        assert_eq!(s.category_breakdown[&Category::Shopping], Money::from_cents(30_000));
        assert_eq!(s.category_total(), s.total_income + s.total_expenses);
    }

    #[test]
    fn zero_amount_still_creates_key() {
        let mut s = Summary::empty();
        s.record(&tx("reversal", 0, 0), Category::OtherExpenses);
        assert_eq!(s.category_breakdown.get(&Category::OtherExpenses), Some(&Money::zero()));
    }

    #[test]
    fn record_saturates_instead_of_overflowing() {
        use rust_decimal::Decimal;
        let mut huge = tx("garbled", 0, 0);
        huge.paid_in = Money::from_decimal_exact(Decimal::MAX);
        let mut s = Summary::empty();
        s.record(&huge, Category::OtherExpenses);
        s.record(&huge, Category::OtherExpenses);
        assert_eq!(s.total_income, Money::from_decimal_exact(Decimal::MAX));
        assert_eq!(s.category_breakdown[&Category::OtherExpenses], s.total_income);
        assert_eq!(s.transaction_count, 2);
    }

    #[test]
    fn serializes_breakdown_with_label_keys() {
        let mut s = Summary::empty();
        s.record(&tx("airtime", 0, 10_000), Category::AirtimeData);
        let json = serde_json::to_value(&s).unwrap();
        assert!(json["categories"].get("Airtime & Data").is_some());
    }
}

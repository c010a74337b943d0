use serde::{Deserialize, Serialize};

use super::money::Money;

/// Status assigned when the statement row carries none of its own.
pub const DEFAULT_STATUS: &str = "Completed";

/// One statement row. Dates and statuses are kept as the literal statement text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub receipt_no: String,
    pub completion_time: String,
    pub details: String,
    pub transaction_status: String,
    pub paid_in: Money,
    pub withdrawn: Money,
    pub balance: Money,
}

impl Transaction {
    /// The amount attributed to this row's category: `paid_in` when nonzero,
    /// otherwise `withdrawn`.
    pub fn amount(&self) -> Money {
        if self.paid_in.is_zero() {
            self.withdrawn
        } else {
            self.paid_in
        }
    }

    /// Continuation text from a wrapped statement line.
    pub fn extend_details(&mut self, continuation: &str) {
        self.details.push(' ');
        self.details.push_str(continuation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(paid_in: i64, withdrawn: i64) -> Transaction {
        Transaction {
            receipt_no: "QAB12CD34E".to_string(),
            completion_time: "2024-01-15 10:30:00".to_string(),
            details: "Customer Transfer to".to_string(),
            transaction_status: DEFAULT_STATUS.to_string(),
            paid_in: Money::from_cents(paid_in),
            withdrawn: Money::from_cents(withdrawn),
            balance: Money::zero(),
        }
    }

    #[test]
    fn amount_prefers_paid_in() {
        assert_eq!(tx(5000, 0).amount(), Money::from_cents(5000));
        assert_eq!(tx(0, 1200).amount(), Money::from_cents(1200));
        assert_eq!(tx(700, 300).amount(), Money::from_cents(700));
        assert!(tx(0, 0).amount().is_zero());
    }

    #[test]
    fn extend_details_joins_with_single_space() {
        let mut t = tx(0, 100);
        t.extend_details("0712345678 JOHN DOE");
        assert_eq!(t.details, "Customer Transfer to 0712345678 JOHN DOE");
    }

    #[test]
    fn serializes_snake_case_fields() {
        let json = serde_json::to_value(tx(100, 0)).unwrap();
        assert_eq!(json["receipt_no"], "QAB12CD34E");
        assert_eq!(json["transaction_status"], "Completed");
        assert!(json.get("paid_in").is_some());
    }
}

use pesa_core::{Category, Money, Summary, Transaction};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::gated::{Classification, GatedClassifier};

/// Amounts above this are flagged in the log (statement units).
pub const DEFAULT_LARGE_TRANSACTION_THRESHOLD: i64 = 10_000;

/// Folds a transaction sequence into a [`Summary`], classifying each
/// transaction's details on the way.
pub struct Aggregator {
    classifier: GatedClassifier,
    large_transaction_threshold: Money,
}

impl Aggregator {
    pub fn new(classifier: GatedClassifier) -> Self {
        Self {
            classifier,
            large_transaction_threshold: Money::from_cents(DEFAULT_LARGE_TRANSACTION_THRESHOLD * 100),
        }
    }

    pub fn with_large_transaction_threshold(mut self, threshold: Money) -> Self {
        self.large_transaction_threshold = threshold;
        self
    }

    pub fn classifier(&self) -> &GatedClassifier {
        &self.classifier
    }

    pub async fn summarize(&self, transactions: &[Transaction]) -> Summary {
        self.summarize_detailed(transactions).await.0
    }

    /// Summary plus the per-transaction classification, index-aligned with
    /// the input.
    pub async fn summarize_detailed(
        &self,
        transactions: &[Transaction],
    ) -> (Summary, Vec<Classification>) {
        let mut summary = Summary::empty();
        let mut classifications = Vec::with_capacity(transactions.len());

        for tx in transactions {
            let classification = self.classifier.classify(&tx.details).await;
            let amount = tx.amount();
            if amount > self.large_transaction_threshold {
                info!(
                    receipt = %tx.receipt_no,
                    %amount,
                    category = %classification.category,
                    "large transaction: {}",
                    tx.details
                );
            }
            summary.record(tx, classification.category);
            classifications.push(classification);
        }

        log_distribution(&classifications);
        debug!(
            income = %summary.total_income,
            expenses = %summary.total_expenses,
            net = %summary.net_balance_change,
            "summary computed"
        );
        (summary, classifications)
    }
}

fn log_distribution(classifications: &[Classification]) {
    let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
    for c in classifications {
        *counts.entry(c.category).or_default() += 1;
    }
    for (category, count) in counts {
        debug!(%category, count, "category distribution");
    }
}

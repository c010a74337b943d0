use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The closed spending taxonomy shared by the rule and semantic classifiers.
///
/// Declaration order is the report order used by [`crate::Summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Airtime & Data")]
    AirtimeData,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Utilities")]
    Utilities,
    #[serde(rename = "Food & Dining")]
    FoodDining,
    #[serde(rename = "Merchant Payments")]
    MerchantPayments,
    #[serde(rename = "Money Received")]
    MoneyReceived,
    #[serde(rename = "Cash Withdrawals")]
    CashWithdrawals,
    #[serde(rename = "Send Money")]
    SendMoney,
    #[serde(rename = "Loans & Savings")]
    LoansSavings,
    #[serde(rename = "Safaricom Services")]
    SafaricomServices,
    #[serde(rename = "Bills & Utilities")]
    BillsUtilities,
    #[serde(rename = "Other Expenses")]
    OtherExpenses,
    #[serde(rename = "Uncategorized")]
    Uncategorized,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown category: '{0}'")]
pub struct UnknownCategory(pub String);

impl Category {
    pub const ALL: [Category; 13] = [
        Category::AirtimeData,
        Category::Shopping,
        Category::Utilities,
        Category::FoodDining,
        Category::MerchantPayments,
        Category::MoneyReceived,
        Category::CashWithdrawals,
        Category::SendMoney,
        Category::LoansSavings,
        Category::SafaricomServices,
        Category::BillsUtilities,
        Category::OtherExpenses,
        Category::Uncategorized,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::AirtimeData => "Airtime & Data",
            Category::Shopping => "Shopping",
            Category::Utilities => "Utilities",
            Category::FoodDining => "Food & Dining",
            Category::MerchantPayments => "Merchant Payments",
            Category::MoneyReceived => "Money Received",
            Category::CashWithdrawals => "Cash Withdrawals",
            Category::SendMoney => "Send Money",
            Category::LoansSavings => "Loans & Savings",
            Category::SafaricomServices => "Safaricom Services",
            Category::BillsUtilities => "Bills & Utilities",
            Category::OtherExpenses => "Other Expenses",
            Category::Uncategorized => "Uncategorized",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Case-insensitive exact match against the labels; no fuzzy matching.
impl std::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

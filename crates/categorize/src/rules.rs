use pesa_core::Category;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Failed to parse rule table: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Rule table is empty")]
    Empty,
}

/// Keywords are matched as lower-case substrings, not whole words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: Category, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(rename = "rule")]
    rules: Vec<CategoryRule>,
}

/// Ordered, first-match-wins keyword cascade.
///
/// Rule order is precedence: several keyword sets overlap ("till" and "pos"
/// appear under both Shopping and Merchant Payments), so an earlier rule
/// shadows a later one.
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    rules: Vec<CategoryRule>,
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self::mpesa()
    }
}

impl RuleClassifier {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|r| CategoryRule {
                category: r.category,
                keywords: r.keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { rules }
    }

    /// The built-in table tuned to M-PESA statement wording.
    pub fn mpesa() -> Self {
        Self::new(vec![
            CategoryRule::new(Category::AirtimeData, &["airtime", "data", "bundle"]),
            CategoryRule::new(Category::Shopping, &["till", "pos", "shop", "naivas", "quickmart"]),
            CategoryRule::new(
                Category::Utilities,
                &["bill", "utility", "water", "electricity", "internet", "pharmaceuticals", "gas"],
            ),
            CategoryRule::new(Category::FoodDining, &["restaurant", "cafe", "java", "cj", "mint & salt"]),
            CategoryRule::new(Category::MerchantPayments, &["till", "pay bill", "merchant", "pos"]),
            CategoryRule::new(
                Category::MoneyReceived,
                &["received from", "from ", "deposit", "absa", "sent by"],
            ),
            CategoryRule::new(Category::CashWithdrawals, &["withdraw", "agent", "atm"]),
            CategoryRule::new(Category::SendMoney, &["send money", "sent to", "to ", "transfer"]),
            CategoryRule::new(Category::LoansSavings, &["m-shwari", "fuliza", "loan", "save"]),
            CategoryRule::new(Category::SafaricomServices, &["safaricom", "mpesa"]),
            CategoryRule::new(Category::BillsUtilities, &["bill", "payment"]),
        ])
    }

    /// Load an ordered table of `[[rule]]` entries.
    pub fn from_toml(toml_content: &str) -> Result<Self, RuleError> {
        let file: RuleFile = toml::from_str(toml_content)?;
        if file.rules.is_empty() {
            return Err(RuleError::Empty);
        }
        Ok(Self::new(file.rules))
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn find_matching_rule(&self, details: &str) -> Option<&CategoryRule> {
        let lowered = details.to_lowercase();
        self.rules.iter().find(|r| r.matches(&lowered))
    }

    /// `Uncategorized` for empty details, `Other Expenses` when nothing matches.
    pub fn classify(&self, details: &str) -> Category {
        if details.trim().is_empty() {
            return Category::Uncategorized;
        }
        self.find_matching_rule(details)
            .map_or(Category::OtherExpenses, |r| r.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(details: &str) -> Category {
        RuleClassifier::mpesa().classify(details)
    }

    #[test]
    fn naivas_is_shopping() {
        assert_eq!(classify("PAYMENT TO NAIVAS SUPERMARKET"), Category::Shopping);
        assert_eq!(classify("payment to naivas supermarket"), Category::Shopping);
    }

    #[test]
    fn empty_is_uncategorized() {
        assert_eq!(classify(""), Category::Uncategorized);
        assert_eq!(classify("   "), Category::Uncategorized);
    }

    #[test]
    fn no_match_is_other_expenses() {
        assert_eq!(classify("ZZZ"), Category::OtherExpenses);
    }

    #[test]
    fn airtime_rule_shadows_everything() {
        assert_eq!(classify("Airtime Purchase"), Category::AirtimeData);
        assert_eq!(classify("Bundle purchase via till"), Category::AirtimeData);
        assert_eq!(classify("Safaricom Data Bundles"), Category::AirtimeData);
    }

    #[test]
    fn shopping_shadows_merchant_payments() {
        // "till" and "pos" would also satisfy Merchant Payments.
        assert_eq!(classify("Merchant Payment Till 123456"), Category::Shopping);
        assert_eq!(classify("POS purchase"), Category::Shopping);
        assert_eq!(classify("Merchant Payment Online"), Category::MerchantPayments);
    }

    #[test]
    fn utilities_shadow_later_bill_rule() {
        assert_eq!(classify("Pay Bill to 888880 KPLC"), Category::Utilities);
    }

    #[test]
    fn food_rule() {
        assert_eq!(classify("Java House Westlands"), Category::FoodDining);
        assert_eq!(classify("MINT & SALT"), Category::FoodDining);
    }

    #[test]
    fn money_received_precedes_send_money() {
        assert_eq!(classify("Funds received from JOHN DOE"), Category::MoneyReceived);
        assert_eq!(classify("Funds sent by ACME"), Category::MoneyReceived);
        // Substring matching: "deposit" contains "pos".
        assert_eq!(classify("Deposit of Funds at Agent"), Category::Shopping);
    }

    #[test]
    fn cash_withdrawal() {
        assert_eq!(classify("Customer Withdrawal At Agent Till"), Category::Shopping);
        assert_eq!(classify("Customer Withdrawal At Agent 12345"), Category::CashWithdrawals);
    }

    #[test]
    fn send_money() {
        assert_eq!(classify("Customer Transfer to 0712xxx678"), Category::SendMoney);
    }

    #[test]
    fn loans_and_savings() {
        assert_eq!(classify("M-Shwari Lock"), Category::LoansSavings);
        assert_eq!(classify("OverDraft of Credit Party FULIZA"), Category::LoansSavings);
    }

    #[test]
    fn safaricom_services() {
        assert_eq!(classify("SAFARICOM LIMITED"), Category::SafaricomServices);
    }

    #[test]
    fn payment_falls_to_bills() {
        assert_eq!(classify("Online payment"), Category::BillsUtilities);
    }

    #[test]
    fn mpesa_table_order_is_fixed() {
        let order: Vec<Category> = RuleClassifier::mpesa().rules().iter().map(|r| r.category).collect();
        assert_eq!(
            order,
            vec![
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
            ]
        );
    }

    #[test]
    fn from_toml_preserves_order() {
        let toml = r#"
            [[rule]]
            category = "Food & Dining"
            keywords = ["KFC"]

            [[rule]]
            category = "Shopping"
            keywords = ["kfc", "carrefour"]
        "#;
        let engine = RuleClassifier::from_toml(toml).unwrap();
        assert_eq!(engine.classify("KFC Junction"), Category::FoodDining);
        assert_eq!(engine.classify("Carrefour"), Category::Shopping);
        assert_eq!(engine.classify("unknown"), Category::OtherExpenses);
    }

    #[test]
    fn from_toml_rejects_bad_input() {
        assert!(matches!(
            RuleClassifier::from_toml("rule = []"),
            Err(RuleError::Empty)
        ));
        assert!(matches!(
            RuleClassifier::from_toml("[[rule]]\ncategory = \"Nope\"\nkeywords = []"),
            Err(RuleError::Toml(_))
        ));
    }
}

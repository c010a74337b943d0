use async_trait::async_trait;
use pesa_core::Category;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier API key is required")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Classifier returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed classifier response: {0}")]
    MalformedResponse(String),
    #[error("Classifier timed out after {0:?}")]
    Timeout(Duration),
    #[error("Classifier failed: {0}")]
    Backend(String),
}

/// A label as reported by the external classifier, not yet validated
/// against the closed set.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticLabel {
    pub label: String,
    /// Self-reported certainty, 0.0–1.0.
    pub confidence: f32,
}

impl SemanticLabel {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence: if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) },
        }
    }
}

/// External classification capability. Implementations may block on the
/// network; callers bound every call with a timeout.
#[async_trait]
pub trait SemanticClassifier: Send + Sync {
    async fn classify(&self, description: &str) -> Result<SemanticLabel, ClassifierError>;
}

/// The labels offered to the external classifier, and the category each
/// maps to. "Withdrawals" is the semantic spelling of Cash Withdrawals.
pub const SEMANTIC_LABELS: [(&str, Category); 8] = [
    ("Airtime & Data", Category::AirtimeData),
    ("Shopping", Category::Shopping),
    ("Utilities", Category::Utilities),
    ("Merchant Payments", Category::MerchantPayments),
    ("Withdrawals", Category::CashWithdrawals),
    ("Send Money", Category::SendMoney),
    ("Safaricom Services", Category::SafaricomServices),
    ("Other Expenses", Category::OtherExpenses),
];

/// Case-insensitive exact match against [`SEMANTIC_LABELS`].
pub fn map_semantic_label(label: &str) -> Option<Category> {
    let wanted = label.trim();
    SEMANTIC_LABELS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
        .map(|(_, category)| *category)
}

// ── Mock backend (used for tests and offline runs) ────────────────────────────

/// Replays a fixed answer, optionally after a delay.
pub struct MockSemanticClassifier {
    response: Result<SemanticLabel, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockSemanticClassifier {
    pub fn answering(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            response: Ok(SemanticLabel::new(label, confidence)),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SemanticClassifier for MockSemanticClassifier {
    async fn classify(&self, _description: &str) -> Result<SemanticLabel, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone().map_err(ClassifierError::Backend)
    }
}

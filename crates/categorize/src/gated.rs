use pesa_core::Category;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::rules::RuleClassifier;
use crate::semantic::{map_semantic_label, ClassifierError, SemanticClassifier};

/// Semantic answers below this confidence are replaced by the rule result.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.7;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which tier produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Rules,
    Semantic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub category: Category,
    pub confidence: f32,
    pub tier: Tier,
}

impl Classification {
    fn from_rules(category: Category) -> Self {
        Self {
            category,
            confidence: 1.0,
            tier: Tier::Rules,
        }
    }
}

/// Rule engine as the baseline, with an optional semantic classifier that
/// may override it when it answers in time, inside the closed label set, and
/// with enough confidence.
pub struct GatedClassifier {
    rules: RuleClassifier,
    semantic: Option<Arc<dyn SemanticClassifier>>,
    threshold: f32,
    timeout: Duration,
}

impl GatedClassifier {
    pub fn new(rules: RuleClassifier) -> Self {
        Self {
            rules,
            semantic: None,
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_semantic(mut self, semantic: Arc<dyn SemanticClassifier>) -> Self {
        self.semantic = Some(semantic);
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_semantic(&self) -> bool {
        self.semantic.is_some()
    }

    pub fn rules(&self) -> &RuleClassifier {
        &self.rules
    }

    pub async fn classify(&self, details: &str) -> Classification {
        let Some(semantic) = &self.semantic else {
            return Classification::from_rules(self.rules.classify(details));
        };
        if details.trim().is_empty() {
            return Classification::from_rules(Category::Uncategorized);
        }

        let answer = match tokio::time::timeout(self.timeout, semantic.classify(details)).await {
            Ok(result) => result,
            Err(_) => Err(ClassifierError::Timeout(self.timeout)),
        };

        match answer {
            Ok(label) if label.confidence.is_nan() || label.confidence < self.threshold => {
                debug!(
                    label = %label.label,
                    confidence = label.confidence,
                    "low confidence, falling back to rules"
                );
            }
            Ok(label) => match map_semantic_label(&label.label) {
                Some(category) => {
                    return Classification {
                        category,
                        confidence: label.confidence,
                        tier: Tier::Semantic,
                    };
                }
                None => warn!(label = %label.label, "label outside the closed set, falling back to rules"),
            },
            Err(e) => warn!("semantic classification failed, falling back to rules: {e}"),
        }

        Classification::from_rules(self.rules.classify(details))
    }
}

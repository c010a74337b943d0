pub mod aggregate;
pub mod gated;
pub mod openai;
pub mod rules;
pub mod semantic;

pub use aggregate::{Aggregator, DEFAULT_LARGE_TRANSACTION_THRESHOLD};
pub use gated::{Classification, GatedClassifier, Tier, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_TIMEOUT};
pub use openai::{OpenAiClassifier, OpenAiConfig};
pub use rules::{CategoryRule, RuleClassifier, RuleError};
pub use semantic::{
    map_semantic_label, ClassifierError, MockSemanticClassifier, SemanticClassifier,
    SemanticLabel, SEMANTIC_LABELS,
};

use anyhow::{bail, Context, Result};
use pesa_categorize::{
    GatedClassifier, OpenAiClassifier, OpenAiConfig, RuleClassifier, DEFAULT_CONFIDENCE_THRESHOLD,
    DEFAULT_LARGE_TRANSACTION_THRESHOLD,
};
use pesa_core::Money;
use pesa_extract::PdfToText;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Optional TOML file with an ordered `[[rule]]` table.
    pub rules: Option<PathBuf>,
    pub classifier: ClassifierConfig,
    pub extractor: ExtractorConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub confidence_threshold: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let openai = OpenAiConfig::default();
        Self {
            api_key: None,
            model: openai.model,
            base_url: openai.base_url,
            temperature: openai.temperature,
            timeout_secs: openai.timeout.as_secs(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub pdftotext: PathBuf,
    pub timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            pdftotext: PathBuf::from("pdftotext"),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub large_transaction_threshold: i64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            large_transaction_threshold: DEFAULT_LARGE_TRANSACTION_THRESHOLD,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "pesa", "Pesa").map(|d| d.config_dir().join("config.toml"))
}

impl Config {
    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.classifier.api_key = Some(key);
        }
    }

    pub fn rule_classifier(&self) -> Result<RuleClassifier> {
        let Some(path) = &self.rules else {
            return Ok(RuleClassifier::mpesa());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading rules {}", path.display()))?;
        RuleClassifier::from_toml(&content).with_context(|| format!("loading rules {}", path.display()))
    }

    /// Rules-only unless an API key is configured and `semantic` is allowed.
    pub fn gated_classifier(&self, semantic: bool) -> Result<GatedClassifier> {
        let c = &self.classifier;
        if !(0.0..=1.0).contains(&c.confidence_threshold) {
            bail!("classifier.confidence_threshold must be within 0.0..=1.0");
        }
        let timeout = Duration::from_secs(c.timeout_secs);
        let gated = GatedClassifier::new(self.rule_classifier()?)
            .with_threshold(c.confidence_threshold)
            .with_timeout(timeout);

        let api_key = c.api_key.as_deref().filter(|k| !k.trim().is_empty());
        match (semantic, api_key) {
            (true, Some(key)) => {
                let openai = OpenAiClassifier::new(OpenAiConfig {
                    api_key: key.to_string(),
                    model: c.model.clone(),
                    base_url: c.base_url.clone(),
                    temperature: c.temperature,
                    timeout,
                })?;
                Ok(gated.with_semantic(Arc::new(openai)))
            }
            (true, None) => {
                tracing::info!("{API_KEY_ENV} not set; classifying with rules only");
                Ok(gated)
            }
            (false, _) => Ok(gated),
        }
    }

    pub fn large_transaction_threshold(&self) -> Money {
        Money::from_cents(self.summary.large_transaction_threshold.saturating_mul(100))
    }

    pub fn pdftotext(&self) -> PdfToText {
        PdfToText::new(
            self.extractor.pdftotext.clone(),
            Duration::from_secs(self.extractor.timeout_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pesa_core::Category;

    #[test]
    fn defaults_when_empty() {
        let c: Config = toml::from_str("").unwrap();
        assert!(c.rules.is_none());
        assert!(c.classifier.api_key.is_none());
        assert_eq!(c.classifier.model, "gpt-3.5-turbo");
        assert_eq!(c.classifier.confidence_threshold, 0.7);
        assert_eq!(c.extractor.pdftotext, PathBuf::from("pdftotext"));
        assert_eq!(c.summary.large_transaction_threshold, 10_000);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let c: Config = toml::from_str(
            r#"
            [classifier]
            model = "gpt-4o-mini"
            confidence_threshold = 0.8

            [summary]
            large_transaction_threshold = 50000
            "#,
        )
        .unwrap();
        assert_eq!(c.classifier.model, "gpt-4o-mini");
        assert_eq!(c.classifier.timeout_secs, 10);
        assert_eq!(c.large_transaction_threshold(), Money::from_cents(5_000_000));
    }

    #[test]
    fn env_key_overrides_file() {
        let mut c = Config::default();
        c.classifier.api_key = Some("from-file".to_string());
        c.apply_env(|k| (k == API_KEY_ENV).then(|| "from-env".to_string()));
        assert_eq!(c.classifier.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn blank_env_key_is_ignored() {
        let mut c = Config::default();
        c.apply_env(|_| Some("  ".to_string()));
        assert!(c.classifier.api_key.is_none());
    }

    #[test]
    fn no_key_means_rules_only() {
        let g = Config::default().gated_classifier(true).unwrap();
        assert!(!g.has_semantic());
    }

    #[test]
    fn key_enables_semantic_unless_disabled() {
        let mut c = Config::default();
        c.classifier.api_key = Some("sk-test".to_string());
        assert!(c.gated_classifier(true).unwrap().has_semantic());
        assert!(!c.gated_classifier(false).unwrap().has_semantic());
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        let mut c = Config::default();
        c.classifier.confidence_threshold = 1.5;
        assert!(c.gated_classifier(false).is_err());
    }

    #[test]
    fn custom_rules_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(
            &path,
            "[[rule]]\ncategory = \"Food & Dining\"\nkeywords = [\"naivas\"]\n",
        )
        .unwrap();
        let c = Config {
            rules: Some(path),
            ..Config::default()
        };
        let rules = c.rule_classifier().unwrap();
        assert_eq!(rules.classify("NAIVAS WESTGATE"), Category::FoodDining);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}

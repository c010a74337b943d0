use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::semantic::{ClassifierError, SemanticClassifier, SemanticLabel, SEMANTIC_LABELS};

const SYSTEM_PROMPT: &str =
    "You are a helpful financial assistant that categorizes M-PESA transactions.";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    /// Chat-completions compatible endpoint root, without the trailing path.
    pub base_url: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.3,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Chat-completions backed classifier.
pub struct OpenAiClassifier {
    client: reqwest::Client,
    config: OpenAiConfig,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Verdict {
    category: String,
    confidence: f32,
    #[serde(default)]
    reason: Option<String>,
}

impl OpenAiClassifier {
    pub fn new(config: OpenAiConfig) -> Result<Self, ClassifierError> {
        if config.api_key.trim().is_empty() {
            return Err(ClassifierError::MissingApiKey);
        }
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

fn prompt(description: &str) -> String {
    let labels: Vec<&str> = SEMANTIC_LABELS.iter().map(|(name, _)| *name).collect();
    format!(
        "Categorize the following M-PESA transaction into one of these categories: {}\n\n\
         Transaction: {}\n\n\
         Return a JSON object with:\n\
         {{\n  \"category\": \"The most appropriate category\",\n  \"confidence\": 0.0 to 1.0,\n  \"reason\": \"Brief explanation\"\n}}",
        labels.join(", "),
        description
    )
}

/// Read the model's JSON verdict, tolerating a fenced code block around it.
fn parse_verdict(content: &str) -> Result<SemanticLabel, ClassifierError> {
    let body = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    let verdict: Verdict = serde_json::from_str(body)
        .map_err(|e| ClassifierError::MalformedResponse(format!("{e}: {body}")))?;
    if let Some(reason) = &verdict.reason {
        tracing::debug!(category = %verdict.category, %reason, "classifier verdict");
    }
    Ok(SemanticLabel::new(verdict.category, verdict.confidence))
}

#[async_trait]
impl SemanticClassifier for OpenAiClassifier {
    async fn classify(&self, description: &str) -> Result<SemanticLabel, ClassifierError> {
        let body = Req {
            model: &self.config.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Msg {
                    role: "user",
                    content: prompt(description),
                },
            ],
            temperature: self.config.temperature,
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let out: Resp = resp
            .json()
            .await
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;
        let content = out
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ClassifierError::MalformedResponse("no choices".to_string()))?;

        parse_verdict(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_requires_api_key() {
        assert!(matches!(
            OpenAiClassifier::new(OpenAiConfig::default()),
            Err(ClassifierError::MissingApiKey)
        ));
    }

    #[test]
    fn endpoint_joins_base_url() {
        let c = OpenAiClassifier::new(OpenAiConfig {
            api_key: "sk-test".to_string(),
            base_url: "http://localhost:8080/v1/".to_string(),
            ..OpenAiConfig::default()
        })
        .unwrap();
        assert_eq!(c.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn prompt_lists_every_semantic_label() {
        let p = prompt("Customer Transfer to 0712xxx678");
        for (name, _) in SEMANTIC_LABELS {
            assert!(p.contains(name), "missing {name}");
        }
        assert!(p.contains("Transaction: Customer Transfer to 0712xxx678"));
    }

    #[test]
    fn parse_verdict_plain_json() {
        let v = parse_verdict(r#"{"category": "Shopping", "confidence": 0.92, "reason": "supermarket"}"#)
            .unwrap();
        assert_eq!(v.label, "Shopping");
        assert!((v.confidence - 0.92).abs() < f32::EPSILON);
    }

    #[test]
    fn parse_verdict_fenced_json_without_reason() {
        let v = parse_verdict("```json\n{\"category\": \"Send Money\", \"confidence\": 0.8}\n```").unwrap();
        assert_eq!(v.label, "Send Money");
    }

    #[test]
    fn parse_verdict_rejects_prose() {
        assert!(matches!(
            parse_verdict("I think this is Shopping."),
            Err(ClassifierError::MalformedResponse(_))
        ));
    }
}

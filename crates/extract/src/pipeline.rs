use pesa_categorize::{Aggregator, Tier};
use pesa_core::{Category, Summary, Transaction};
use pesa_import::{parse_statement, AmountWarning, ParsedStatement};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::extractor::{ExtractError, TextExtractor};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Text extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorizedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category: Category,
    pub confidence: f32,
    pub tier: Tier,
}

/// The result of one statement run.
#[derive(Debug, Clone, Serialize)]
pub struct StatementReport {
    pub header_found: bool,
    pub transactions: Vec<CategorizedTransaction>,
    pub amount_warnings: Vec<AmountWarning>,
    pub summary: Summary,
}

impl StatementReport {
    pub fn empty() -> Self {
        Self {
            header_found: false,
            transactions: Vec::new(),
            amount_warnings: Vec::new(),
            summary: Summary::empty(),
        }
    }
}

/// Orchestrates: read → extract text → tokenize → classify → summarize.
///
/// Holds no per-run state, so one pipeline may serve many statements.
pub struct StatementPipeline<E: TextExtractor> {
    extractor: E,
    aggregator: Aggregator,
}

impl<E: TextExtractor> StatementPipeline<E> {
    pub fn new(extractor: E, aggregator: Aggregator) -> Self {
        Self { extractor, aggregator }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Process a statement document on disk.
    pub async fn process_file(&self, path: &Path) -> Result<StatementReport, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        info!("Extracting text from {}", path.display());
        self.process_bytes(&bytes).await
    }

    /// Process raw document bytes. Only extractor failures are errors.
    pub async fn process_bytes(&self, data: &[u8]) -> Result<StatementReport, PipelineError> {
        let text = self.extractor.extract(data).await?;
        if text.trim().is_empty() {
            info!("extractor returned no text content");
            return Ok(StatementReport::empty());
        }
        Ok(self.process_text(&text).await)
    }

    /// Run already-extracted statement text.
    pub async fn process_text(&self, text: &str) -> StatementReport {
        self.summarize(parse_statement(text)).await
    }

    /// Classify and summarize transactions recovered by any importer.
    pub async fn summarize(&self, parsed: ParsedStatement) -> StatementReport {
        let (summary, classifications) = self
            .aggregator
            .summarize_detailed(&parsed.transactions)
            .await;

        info!(
            transactions = parsed.transactions.len(),
            header_found = parsed.header_found,
            coerced_amounts = parsed.amount_warnings.len(),
            "statement processed"
        );

        let transactions = parsed
            .transactions
            .into_iter()
            .zip(classifications)
            .map(|(transaction, c)| CategorizedTransaction {
                transaction,
                category: c.category,
                confidence: c.confidence,
                tier: c.tier,
            })
            .collect();

        StatementReport {
            header_found: parsed.header_found,
            transactions,
            amount_warnings: parsed.amount_warnings,
            summary,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

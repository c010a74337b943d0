use anyhow::{Context, Result};
use pesa_categorize::{Aggregator, Classification};
use pesa_extract::{PdfToText, StatementPipeline, StatementReport};
use pesa_import::import_csv;
use serde::Serialize;
use std::path::Path;

use crate::config::Config;

/// How a statement file is read, chosen from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pdf,
    Csv,
    Text,
}

impl InputKind {
    pub fn detect(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => Self::Pdf,
            Some("csv") => Self::Csv,
            _ => Self::Text,
        }
    }
}

pub fn build_pipeline(config: &Config, semantic: bool) -> Result<StatementPipeline<PdfToText>> {
    let aggregator = Aggregator::new(config.gated_classifier(semantic)?)
        .with_large_transaction_threshold(config.large_transaction_threshold());
    Ok(StatementPipeline::new(config.pdftotext(), aggregator))
}

pub async fn process(
    pipeline: &StatementPipeline<PdfToText>,
    path: &Path,
) -> Result<StatementReport> {
    let report = match InputKind::detect(path) {
        InputKind::Pdf => pipeline
            .process_file(path)
            .await
            .with_context(|| format!("processing {}", path.display()))?,
        InputKind::Csv => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            let parsed = import_csv(file).with_context(|| format!("importing {}", path.display()))?;
            pipeline.summarize(parsed).await
        }
        InputKind::Text => {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            pipeline.process_text(&String::from_utf8_lossy(&bytes)).await
        }
    };

    if !report.header_found && report.transactions.is_empty() {
        tracing::warn!("no transaction table found in {}", path.display());
    }
    Ok(report)
}

#[derive(Debug, Serialize)]
pub struct ClassifyOutput<'a> {
    pub description: &'a str,
    #[serde(flatten)]
    pub classification: Classification,
}

pub async fn classify<'a>(
    pipeline: &StatementPipeline<PdfToText>,
    description: &'a str,
) -> ClassifyOutput<'a> {
    let classification = pipeline.aggregator().classifier().classify(description).await;
    ClassifyOutput {
        description,
        classification,
    }
}

pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

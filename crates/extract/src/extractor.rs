use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to start {binary}: {source}")]
    Spawn {
        binary: String,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Text extraction failed (exit {status:?}): {stderr}")]
    Failed { status: Option<i32>, stderr: String },
    #[error("Text extraction timed out after {0:?}")]
    Timeout(Duration),
}

/// Abstraction over the statement-to-text converter.
/// Implementations accept the raw document bytes and return the page text;
/// an empty string means the document had no text content.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: &[u8]) -> Result<String, ExtractError>;
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set string regardless of input.
pub struct MockExtractor {
    pub text: String,
}

impl MockExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl TextExtractor for MockExtractor {
    async fn extract(&self, _document: &[u8]) -> Result<String, ExtractError> {
        Ok(self.text.clone())
    }
}

// ── pdftotext backend ─────────────────────────────────────────────────────────

/// Runs poppler's `pdftotext -layout`, streaming the PDF over stdin.
pub struct PdfToText {
    binary: PathBuf,
    timeout: Duration,
}

impl Default for PdfToText {
    fn default() -> Self {
        Self::new("pdftotext", Duration::from_secs(30))
    }
}

impl PdfToText {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }
}

#[async_trait]
impl TextExtractor for PdfToText {
    async fn extract(&self, document: &[u8]) -> Result<String, ExtractError> {
        let mut child = Command::new(&self.binary)
            .args(["-layout", "-", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExtractError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let data = document.to_vec();
            // stdout must be drained while stdin is still being written.
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(&data).await {
                    tracing::debug!("pdftotext closed stdin early: {e}");
                }
            });
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ExtractError::Timeout(self.timeout))??;

        if !output.status.success() {
            return Err(ExtractError::Failed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_preset_text() {
        let e = MockExtractor::new("Receipt Time Details\nrow");
        assert_eq!(e.extract(b"%PDF-1.4").await.unwrap(), "Receipt Time Details\nrow");
    }

    #[tokio::test]
    async fn mock_ignores_document_content() {
        let e = MockExtractor::new("hello");
        assert_eq!(e.extract(b"").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn missing_binary_is_spawn_error() {
        let e = PdfToText::new("/nonexistent/bin/pdftotext", Duration::from_secs(1));
        let err = e.extract(b"%PDF-1.4").await.unwrap_err();
        assert!(matches!(err, ExtractError::Spawn { .. }), "got {err}");
    }
}

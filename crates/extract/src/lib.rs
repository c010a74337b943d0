pub mod extractor;
pub mod pipeline;

pub use extractor::{ExtractError, MockExtractor, PdfToText, TextExtractor};
pub use pipeline::{CategorizedTransaction, PipelineError, StatementPipeline, StatementReport};

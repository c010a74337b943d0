use pesa_core::Transaction;
use serde::Serialize;
use tracing::{debug, warn};

use crate::line::{self, AmountWarning};
use crate::normalize::{normalized_lines, NormalizedLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    ScanningForHeader,
    InDataRegion,
}

/// Transactions recovered from one statement, in source order.
///
/// An empty `transactions` list is a valid result: either no header was
/// found or the data region held no transaction-shaped rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedStatement {
    pub transactions: Vec<Transaction>,
    pub header_found: bool,
    pub amount_warnings: Vec<AmountWarning>,
}

/// Two-state scanner over normalized statement lines.
#[derive(Debug)]
pub struct StatementParser {
    state: ScanState,
    parsed: ParsedStatement,
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementParser {
    pub fn new() -> Self {
        Self {
            state: ScanState::ScanningForHeader,
            parsed: ParsedStatement::default(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn push_line(&mut self, line: &NormalizedLine) {
        // Multi-page statements repeat the column header; it is never data.
        if line::is_header(&line.text) {
            if self.state == ScanState::ScanningForHeader {
                debug!(line = line.number, "found transaction table header");
            }
            self.state = ScanState::InDataRegion;
            self.parsed.header_found = true;
            return;
        }

        if self.state == ScanState::ScanningForHeader {
            return;
        }

        if line::is_boilerplate(&line.text) {
            debug!(line = line.number, "skipping boilerplate");
            return;
        }

        let fields = line.fields();
        match line::parse_fields(&fields) {
            Ok(row) => {
                for (column, token) in row.coerced {
                    warn!(line = line.number, %column, token = %token, "unparseable amount taken as zero");
                    self.parsed.amount_warnings.push(AmountWarning {
                        line: line.number,
                        column,
                        token,
                    });
                }
                self.parsed.transactions.push(row.transaction);
            }
            Err(e) => match self.parsed.transactions.last_mut() {
                Some(last) => {
                    debug!(line = line.number, "continuation of {}: {e}", last.receipt_no);
                    last.extend_details(&line.text);
                }
                None => debug!(line = line.number, "dropping line before first transaction"),
            },
        }
    }

    pub fn finish(self) -> ParsedStatement {
        self.parsed
    }
}

/// Run the whole text through the scanner.
pub fn parse_statement(text: &str) -> ParsedStatement {
    let mut parser = StatementParser::new();
    for line in normalized_lines(text) {
        parser.push_line(&line);
    }
    let parsed = parser.finish();
    debug!(
        transactions = parsed.transactions.len(),
        header_found = parsed.header_found,
        "statement parsed"
    );
    parsed
}

use pesa_core::{Money, Transaction, DEFAULT_STATUS};
use std::io::Read;
use thiserror::Error;
use tracing::warn;

use crate::line::{parse_amount, AmountColumn, AmountWarning};
use crate::statement::ParsedStatement;

/// Receipt, completion time, details, status, paid in, withdrawn, balance.
const CSV_COLUMNS: usize = 7;

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Import a statement exported as CSV. The first row is the header; rows
/// with fewer than seven columns are skipped.
pub fn import_csv<R: Read>(data: R) -> Result<ParsedStatement, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut parsed = ParsedStatement {
        header_found: true,
        ..ParsedStatement::default()
    };

    for result in reader.records() {
        let record = result?;
        if record.len() < CSV_COLUMNS {
            continue;
        }
        let line = record.position().map_or(0, |p| p.line() as usize);

        let mut amount = |column: AmountColumn, idx: usize| {
            let token = record.get(idx).unwrap_or_default();
            parse_amount(token).unwrap_or_else(|| {
                warn!(line, %column, token, "unparseable CSV amount taken as zero");
                parsed.amount_warnings.push(AmountWarning {
                    line,
                    column,
                    token: token.to_string(),
                });
                Money::zero()
            })
        };
        let paid_in = amount(AmountColumn::PaidIn, 4);
        let withdrawn = amount(AmountColumn::Withdrawn, 5);
        let balance = amount(AmountColumn::Balance, 6);

        let status = match record.get(3).unwrap_or_default() {
            "" => DEFAULT_STATUS,
            s => s,
        };

        parsed.transactions.push(Transaction {
            receipt_no: record.get(0).unwrap_or_default().to_string(),
            completion_time: record.get(1).unwrap_or_default().to_string(),
            details: record.get(2).unwrap_or_default().to_string(),
            transaction_status: status.to_string(),
            paid_in,
            withdrawn,
            balance,
        });
    }

    Ok(parsed)
}

use pesa_core::{Money, Transaction, DEFAULT_STATUS};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Receipt, date, time, one detail token, then three amounts.
pub const MIN_FIELDS: usize = 7;

const HEADER_MARKERS: [&str; 3] = ["Receipt", "Time", "Details"];
const BOILERPLATE_PREFIXES: [&str; 3] = ["Page ", "Balance B/", "M-PESA"];
const BOILERPLATE_MARKER: &str = "Statement";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("Insufficient fields: expected at least 7, found {0}")]
    InsufficientFields(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountColumn {
    PaidIn,
    Withdrawn,
    Balance,
}

impl fmt::Display for AmountColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountColumn::PaidIn => write!(f, "paid_in"),
            AmountColumn::Withdrawn => write!(f, "withdrawn"),
            AmountColumn::Balance => write!(f, "balance"),
        }
    }
}

/// An amount token that could not be read as a number and was taken as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmountWarning {
    pub line: usize,
    pub column: AmountColumn,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub transaction: Transaction,
    /// Columns whose token was coerced to zero, with the offending token.
    pub coerced: Vec<(AmountColumn, String)>,
}

/// The header row that marks the start of the transaction table.
pub fn is_header(line: &str) -> bool {
    HEADER_MARKERS.iter().all(|m| line.contains(m))
}

/// Page footers, carried-forward balances and statement banners.
pub fn is_boilerplate(line: &str) -> bool {
    BOILERPLATE_PREFIXES.iter().any(|p| line.starts_with(p)) || line.contains(BOILERPLATE_MARKER)
}

/// Interpret whitespace-delimited fields positionally:
/// `receipt date time details... paid_in withdrawn balance`.
pub fn parse_fields(fields: &[&str]) -> Result<ParsedRow, LineError> {
    if fields.len() < MIN_FIELDS {
        return Err(LineError::InsufficientFields(fields.len()));
    }

    let amount_start = fields.len() - 3;
    let mut coerced = Vec::new();
    let mut amount = |column: AmountColumn, token: &str| match parse_amount(token) {
        Some(m) => m,
        None => {
            coerced.push((column, token.to_string()));
            Money::zero()
        }
    };

    let paid_in = amount(AmountColumn::PaidIn, fields[amount_start]);
    let withdrawn = amount(AmountColumn::Withdrawn, fields[amount_start + 1]);
    let balance = amount(AmountColumn::Balance, fields[amount_start + 2]);

    let transaction = Transaction {
        receipt_no: fields[0].to_string(),
        completion_time: format!("{} {}", fields[1], fields[2]),
        details: fields[3..amount_start].join(" "),
        transaction_status: DEFAULT_STATUS.to_string(),
        paid_in,
        withdrawn,
        balance,
    };

    Ok(ParsedRow { transaction, coerced })
}

/// Strip thousands separators and parse, keeping every digit. An empty
/// token is zero; `None` means the token is not a number at all.
pub fn parse_amount(token: &str) -> Option<Money> {
    let clean = token.replace(',', "");
    if clean.is_empty() {
        return Some(Money::zero());
    }
    Decimal::from_str(&clean).ok().map(Money::from_decimal_exact)
}

pub mod csv;
pub mod line;
pub mod normalize;
pub mod statement;

pub use csv::{import_csv, CsvError};
pub use line::{parse_amount, parse_fields, AmountColumn, AmountWarning, LineError, ParsedRow};
pub use normalize::{normalized_lines, NormalizedLine, NormalizedLines};
pub use statement::{parse_statement, ParsedStatement, ScanState, StatementParser};

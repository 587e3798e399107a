use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Layout of the fixed payables spreadsheet the rows are appended to.
/// The writer itself lives outside this workspace; it scans column C from
/// [`FIRST_DATA_ROW`] for the first blank row and fills one row per entry.
pub const FIRST_DATA_ROW: u32 = 6;
pub const SUPPLIER_COLUMN: char = 'C';
pub const CATEGORY_COLUMN: char = 'D';
pub const ACCOUNT_COLUMN: char = 'E';
pub const AMOUNT_COLUMN: char = 'F';
pub const REGISTER_DATE_COLUMN: char = 'J';
pub const DUE_DATE_COLUMN: char = 'K';

/// One row of the payables sheet, fully resolved: the reconciled supplier name
/// when a match was accepted, otherwise the statement description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayableRow {
    pub supplier: String,
    pub category: String,
    pub account: String,
    pub amount: Decimal,
    /// `DD/MM/YYYY`.
    pub register_date: String,
    /// `DD/MM/YYYY`, supplied by the caller for the whole batch.
    pub due_date: String,
}

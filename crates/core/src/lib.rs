pub mod bank;
pub mod record;
pub mod sheet;

pub use bank::{Bank, StatementFormat, UnknownBank};
pub use record::{TransactionRecord, CREDIT_CARD_CATEGORY};
pub use sheet::PayableRow;

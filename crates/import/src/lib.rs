pub mod banks;
pub mod normalize;
pub mod ofx;
pub mod reconcile;
pub mod report;
pub mod router;

pub use reconcile::{Category, ReconciledRecord, Supplier, MATCH_THRESHOLD};
pub use report::{ParseReport, SkipReason, SkippedLine};
pub use router::{parse_page_text, parse_tag_statement, ParseContext};

use fatura_core::TransactionRecord;

/// Why a line that looked like a transaction was rejected.
///
/// Lines matching no pattern at all are not reported — the layouts bury
/// transactions in running text, so non-matching lines are the common case and
/// skipping them silently is the intended lossy filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Summary/noise vocabulary (totals, balances, payments, ...).
    NoiseKeyword,
    /// Credit, refund or bill payment — only purchases become records.
    CreditOrRefund,
    /// Monetary value failed to convert.
    BadAmount,
    /// Cleaning left nothing usable as a description.
    EmptyDescription,
    /// Tag block missing one of its required sub-fields.
    IncompleteBlock,
}

#[derive(Debug, Clone)]
pub struct SkippedLine {
    /// 1-based line (or block) number in the source document.
    pub line: usize,
    pub reason: SkipReason,
    pub excerpt: String,
}

/// Outcome of parsing one statement: accepted records in source order, plus
/// the diagnostics a reviewer needs to audit what was dropped. Per-line
/// problems never abort the document.
#[derive(Debug, Default)]
pub struct ParseReport {
    pub records: Vec<TransactionRecord>,
    pub skipped: Vec<SkippedLine>,
    /// User-facing notices ("parser not implemented", "no transactions found").
    pub notices: Vec<String>,
}

impl ParseReport {
    /// Empty result for an institution without a parser — a notice, not an error.
    pub fn unsupported(notice: impl Into<String>) -> Self {
        ParseReport {
            notices: vec![notice.into()],
            ..ParseReport::default()
        }
    }

    pub fn push_skip(&mut self, line: usize, reason: SkipReason, excerpt: &str) {
        let excerpt = if excerpt.chars().count() > 80 {
            excerpt.chars().take(80).collect()
        } else {
            excerpt.to_string()
        };
        self.skipped.push(SkippedLine { line, reason, excerpt });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_carries_notice_and_no_records() {
        let report = ParseReport::unsupported("no parser yet");
        assert!(report.records.is_empty());
        assert_eq!(report.notices, vec!["no parser yet".to_string()]);
    }

    #[test]
    fn push_skip_truncates_long_excerpts() {
        let mut report = ParseReport::default();
        report.push_skip(3, SkipReason::BadAmount, &"x".repeat(200));
        assert_eq!(report.skipped[0].excerpt.chars().count(), 80);
        assert_eq!(report.skipped[0].line, 3);
    }
}

//! Bradesco card statements. Every row ends in a single-letter debit/credit
//! marker; only `D` rows become records. Descriptions carry the heaviest
//! clutter of the supported layouts — installment phrases, authorization
//! codes, dash-numbered suffixes — all handled by the shared code scrubber.

use fatura_core::TransactionRecord;

use crate::normalize::{self, re};
use crate::report::{ParseReport, SkipReason};
use crate::router::ParseContext;

const NOISE_KEYWORDS: &[&str] = &[
    "TOTAL",
    "SALDO",
    "PAGAMENTO",
    "ANTERIOR",
    "LIMITE",
    "ENCARGOS",
    "JUROS",
];

re!(re_row, r"(\d{2}/\d{2})\s+(.+?)\s+([\d\.]+,\d{2})\s*([A-Z])\s*$");

const DEBIT_MARKER: &str = "D";

pub fn parse(text: &str, ctx: &ParseContext) -> ParseReport {
    let mut report = ParseReport::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let upper = line.to_uppercase();
        if NOISE_KEYWORDS.iter().any(|k| upper.contains(k)) {
            report.push_skip(idx + 1, SkipReason::NoiseKeyword, line);
            continue;
        }
        let Some(caps) = re_row().captures(line) else {
            continue;
        };

        if &caps[4] != DEBIT_MARKER {
            report.push_skip(idx + 1, SkipReason::CreditOrRefund, line);
            continue;
        }
        let value_str = &caps[3];
        if value_str.contains('-') {
            report.push_skip(idx + 1, SkipReason::CreditOrRefund, line);
            continue;
        }
        let Some(value) = normalize::parse_brl_value(value_str) else {
            report.push_skip(idx + 1, SkipReason::BadAmount, line);
            continue;
        };

        let description = clean_description(&caps[2]);
        if description.is_empty() {
            report.push_skip(idx + 1, SkipReason::EmptyDescription, line);
            continue;
        }
        let date = normalize::expand_short_date(&caps[1], ctx.year);
        report.records.push(TransactionRecord::purchase(
            normalize::tidy_description(&description),
            value,
            date,
        ));
    }

    tracing::debug!(records = report.records.len(), "bradesco statement scanned");
    report
}

/// The shared statement-code scrubber, run to a fixed point.
pub fn clean_description(desc: &str) -> String {
    normalize::fixpoint(desc.to_string(), |d| normalize::strip_statement_codes(d))
}

//! Banco do Brasil card statements. Rows read `DD/MM  description  value`;
//! credits show up either with a minus sign glued to the currency marker or
//! spelled out ("CRÉDITO", "ESTORNO"), so both spellings are filtered.

use fatura_core::TransactionRecord;

use crate::normalize::{self, re};
use crate::report::{ParseReport, SkipReason};
use crate::router::ParseContext;

const NOISE_KEYWORDS: &[&str] = &[
    "LANÇAMENTOS",
    "TOTAL",
    "FATURA",
    "SALDO",
    "RESUMO",
    "ANTERIOR",
    "PARCIAL",
];

re!(re_row, r"(\d{2}/\d{2})\s+(.*?)\s+([\d\.]+,\d{2})");
re!(re_parc_token, r"(?i)\s*PARC\s+\d{2}/\d{2}");

pub fn parse(text: &str, ctx: &ParseContext) -> ParseReport {
    let mut report = ParseReport::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if NOISE_KEYWORDS.iter().any(|k| line.contains(k)) {
            report.push_skip(idx + 1, SkipReason::NoiseKeyword, line);
            continue;
        }
        let upper = line.to_uppercase();
        if line.contains(" - ") || line.contains("-R$") || upper.contains("CRÉDITO") || upper.contains("ESTORNO")
        {
            report.push_skip(idx + 1, SkipReason::CreditOrRefund, line);
            continue;
        }
        let Some(caps) = re_row().captures(line) else {
            continue;
        };

        let Some(value) = normalize::parse_brl_value(&caps[3]) else {
            report.push_skip(idx + 1, SkipReason::BadAmount, line);
            continue;
        };
        let description = clean_description(&caps[2]);
        let date = normalize::expand_short_date(&caps[1], ctx.year);
        report.records.push(TransactionRecord::purchase(
            normalize::tidy_description(&description),
            value,
            date,
        ));
    }

    tracing::debug!(records = report.records.len(), "banco do brasil statement scanned");
    report
}

/// Drop `PARC NN/NN` installment tokens anywhere and a known city used as a
/// trailing suffix.
pub fn clean_description(desc: &str) -> String {
    normalize::fixpoint(desc.to_string(), |d| {
        let d = re_parc_token().replace_all(d, "");
        let d = normalize::strip_city_suffix(&d, normalize::KNOWN_CITIES);
        normalize::collapse_whitespace(&d)
    })
}

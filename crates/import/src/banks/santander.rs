//! Santander card statements. The only layout whose dates sometimes carry
//! their own year, and the one that most often arrives as a scanned image —
//! recognized text is noisy, so the cleaning here is the most aggressive and
//! the result is re-cased to Title Case.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use fatura_core::TransactionRecord;

use crate::normalize::{self, re};
use crate::report::{ParseReport, SkipReason};
use crate::router::ParseContext;

const NOISE_KEYWORDS: &[&str] = &[
    "TOTAL",
    "SALDO",
    "PAGAMENTO",
    "FATURA",
    "ANTERIOR",
    "CRÉDITO",
    "DÉBITO AUTOM",
    "ENCARGOS",
    "ANUIDADE DIFERENCIADA",
    "RESUMO",
    "LIMITE",
    "DISPONÍVEL",
];

re!(re_row, r"(\d{2}/\d{2}(?:/\d{2,4})?)\s+(.+?)\s+(?:R\$)?\s*([\d.,]+,\d{2})");
re!(re_negative_value, r"-\s*[\d.,]+,\d{2}");
re!(re_trailing_installment, r"\s+\d{2}/\d{2}\s*$");
re!(re_trailing_code, r"\s+[A-Z0-9]{6,8}$");

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
        if re_negative_value().is_match(line) {
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
        if value <= Decimal::ZERO {
            report.push_skip(idx + 1, SkipReason::CreditOrRefund, line);
            continue;
        }

        let description = clean_description(&caps[2]);
        // Recognized pages produce rows whose description dissolves entirely
        // under cleaning; those are dropped, not recorded.
        if description.is_empty() {
            report.push_skip(idx + 1, SkipReason::EmptyDescription, line);
            continue;
        }

        let date = expand_date(&caps[1], ctx.year);
        report.records.push(TransactionRecord::purchase(
            normalize::tidy_description(&description),
            value,
            date,
        ));
    }

    tracing::debug!(records = report.records.len(), "santander statement scanned");
    report
}

/// `DD/MM` takes the statement year; `DD/MM/YY` is expanded to `20YY`;
/// `DD/MM/YYYY` is used as-is. Anything else lands on the fallback date.
fn expand_date(date_str: &str, statement_year: i32) -> NaiveDate {
    let parts: Vec<&str> = date_str.split('/').collect();
    let (day, month) = match (
        parts.first().and_then(|p| p.parse::<u32>().ok()),
        parts.get(1).and_then(|p| p.parse::<u32>().ok()),
    ) {
        (Some(d), Some(m)) => (d, m),
        _ => return normalize::fallback_date(),
    };
    let year = match parts.get(2) {
        None => statement_year,
        Some(y) if y.len() == 2 => match y.parse::<i32>() {
            Ok(y) => 2000 + y,
            Err(_) => return normalize::fallback_date(),
        },
        Some(y) => match y.parse::<i32>() {
            Ok(y) => y,
            Err(_) => return normalize::fallback_date(),
        },
    };
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(normalize::fallback_date)
}

/// Strip trailing installment tags and authorization codes, turn asterisks
/// into spaces, and Title-Case the remaining words. A residue of just the
/// currency marker counts as empty.
pub fn clean_description(desc: &str) -> String {
    let cleaned = normalize::fixpoint(desc.to_string(), |d| {
        let d = re_trailing_installment().replace(d, "");
        let d = re_trailing_code().replace(&d, "");
        normalize::collapse_whitespace(&d.replace('*', " "))
    });
    if cleaned.eq_ignore_ascii_case("R$") {
        return String::new();
    }
    title_case(&cleaned)
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
SANTANDER ELITE PLATINUM
Vencimento 05/11/2024
12/10  DROGASIL*FILIAL021 EMCT06D6  R$ 89,50
14/10/24  UBER TRIP 01/02  R$ 32,00
15/10  ESTORNO COMPRA  - 45,90
16/10  R$  R$ 10,00
";

    fn parse_sample() -> ParseReport {
        parse(SAMPLE, &ParseContext::new(2024))
    }

    #[test]
    fn rows_are_title_cased_and_scrubbed() {
        let report = parse_sample();
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].description, "Drogasil Filial021");
        assert_eq!(report.records[0].amount, Decimal::new(8950, 2));
        assert_eq!(report.records[0].formatted_date(), "12/10/2024");
    }

    #[test]
    fn two_digit_year_in_date_is_expanded() {
        let report = parse_sample();
        assert_eq!(report.records[1].description, "Uber Trip");
        assert_eq!(report.records[1].formatted_date(), "14/10/2024");
    }

    #[test]
    fn negative_values_are_credits() {
        let report = parse_sample();
        assert!(report
            .skipped
            .iter()
            .any(|s| s.reason == SkipReason::CreditOrRefund && s.excerpt.contains("ESTORNO")));
    }

    #[test]
    fn marker_only_description_is_discarded() {
        let report = parse_sample();
        assert!(report
            .skipped
            .iter()
            .any(|s| s.reason == SkipReason::EmptyDescription));
        assert!(!report.records.iter().any(|r| r.description == "R$"));
    }

    #[test]
    fn expand_date_variants() {
        assert_eq!(
            expand_date("03/02", 2024),
            NaiveDate::from_ymd_opt(2024, 2, 3).unwrap()
        );
        assert_eq!(
            expand_date("03/02/23", 2024),
            NaiveDate::from_ymd_opt(2023, 2, 3).unwrap()
        );
        assert_eq!(
            expand_date("03/02/2022", 2024),
            NaiveDate::from_ymd_opt(2022, 2, 3).unwrap()
        );
        assert_eq!(expand_date("31/02", 2024), normalize::fallback_date());
    }

    #[test]
    fn clean_description_is_idempotent() {
        for desc in [
            "DROGASIL*FILIAL021 EMCT06D6",
            "UBER TRIP 01/02",
            "PADARIA DO ZE",
        ] {
            let once = clean_description(desc);
            assert_eq!(clean_description(&once), once);
        }
    }
}

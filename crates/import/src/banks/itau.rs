//! Itaú card statements. Rows read `DD/MM  description  R$ value`; the value
//! is always introduced by the currency marker, which keeps it out of the
//! description capture.

use fatura_core::TransactionRecord;

use crate::normalize::{self, re};
use crate::report::{ParseReport, SkipReason};
use crate::router::ParseContext;

const NOISE_KEYWORDS: &[&str] = &[
    "Total",
    "Saldo",
    "Pagamento",
    "Encargos",
    "Tarifas",
    "Custo Efetivo",
];

re!(re_row, r"(\d{2}/\d{2})\s+([^\n]+?)\s+R\$?([\d\.]+,\d{2})");
re!(re_trailing_installment, r"\s*\d{2}/\d{2}$");
re!(re_trailing_un_installment, r"\s*un\d{2}/\d{2}$");

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
        let Some(caps) = re_row().captures(line) else {
            continue;
        };

        let value_str = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
        if value_str.contains('-') {
            report.push_skip(idx + 1, SkipReason::CreditOrRefund, line);
            continue;
        }
        let Some(value) = normalize::parse_brl_value(value_str) else {
            report.push_skip(idx + 1, SkipReason::BadAmount, line);
            continue;
        };

        let description = clean_description(caps.get(2).map(|m| m.as_str()).unwrap_or_default());
        let date = normalize::expand_short_date(caps.get(1).map(|m| m.as_str()).unwrap_or_default(), ctx.year);
        report.records.push(TransactionRecord::purchase(
            normalize::tidy_description(&description),
            value,
            date,
        ));
    }

    tracing::debug!(records = report.records.len(), "itau statement scanned");
    report
}

/// Strip the trailing `unNN/NN` and `NN/NN` installment tags.
pub fn clean_description(desc: &str) -> String {
    normalize::fixpoint(desc.to_string(), |d| {
        let d = re_trailing_un_installment().replace(d, "");
        let d = re_trailing_installment().replace(&d, "");
        normalize::collapse_whitespace(&d)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const SAMPLE: &str = "\
Extrato de cartão
Vencimento 10/07/2024
05/06   SUPERMERCADO ZAFFARI 02/05   R$152,30
07/06   POSTO SHELL   R$210,00
Pagamento efetuado   R$1.000,00
09/06   FARMACIA PANVEL un01/03   R$38,90
Total da fatura   R$401,20
";

    fn parse_sample() -> ParseReport {
        parse(SAMPLE, &ParseContext::new(2024))
    }

    #[test]
    fn rows_are_extracted_with_context_year() {
        let report = parse_sample();
        assert_eq!(report.records.len(), 3);
        assert_eq!(report.records[0].description, "SUPERMERCADO ZAFFARI");
        assert_eq!(report.records[0].amount, Decimal::new(15230, 2));
        assert_eq!(report.records[0].formatted_date(), "05/06/2024");
    }

    #[test]
    fn noise_lines_are_reported_as_skipped() {
        let report = parse_sample();
        assert!(report
            .skipped
            .iter()
            .any(|s| s.reason == SkipReason::NoiseKeyword && s.excerpt.contains("Pagamento")));
        assert!(report
            .skipped
            .iter()
            .any(|s| s.excerpt.contains("Total da fatura")));
    }

    #[test]
    fn value_requires_currency_marker() {
        let report = parse("05/06 LOJA SEM MARCADOR 152,30\n", &ParseContext::new(2024));
        assert!(report.records.is_empty());
    }

    #[test]
    fn clean_description_strips_both_installment_shapes() {
        assert_eq!(clean_description("LIVRARIA CULTURA 03/10"), "LIVRARIA CULTURA");
        assert_eq!(clean_description("FARMACIA PANVEL un01/03"), "FARMACIA PANVEL");
        assert_eq!(clean_description("PADARIA REAL"), "PADARIA REAL");
    }

    #[test]
    fn clean_description_is_idempotent() {
        for desc in ["LIVRARIA CULTURA 03/10", "FARMACIA un01/03", "LOJA 01/12 02/12"] {
            let once = clean_description(desc);
            assert_eq!(clean_description(&once), once);
        }
    }
}

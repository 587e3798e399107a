//! Entry points: bank → format → parser dispatch.

use chrono::Datelike;

use fatura_core::Bank;

use crate::banks;
use crate::normalize;
use crate::ofx;
use crate::report::ParseReport;

/// Per-document parsing context. The statement year is inferred once from the
/// whole text and handed to every parser explicitly; short `DD/MM` dates are
/// expanded with it.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext {
    pub year: i32,
}

impl ParseContext {
    pub fn new(year: i32) -> Self {
        ParseContext { year }
    }

    /// Year of the first complete `DD/MM/YYYY` date in the document, falling
    /// back to the current calendar year.
    pub fn from_text(text: &str) -> Self {
        let year = normalize::infer_statement_year(text)
            .unwrap_or_else(|| chrono::Local::now().year());
        ParseContext { year }
    }
}

/// Parse the extracted page text of a statement for a page-text bank.
///
/// Institutions without a parser, or a tag-format bank routed here by
/// mistake, fail soft: empty report plus a notice, never an error.
pub fn parse_page_text(bank: Bank, text: &str, ctx: &ParseContext) -> ParseReport {
    let report = match bank {
        Bank::Itau => banks::itau::parse(text, ctx),
        Bank::BancoDoBrasil => banks::banco_brasil::parse(text, ctx),
        Bank::Caixa => banks::caixa::parse(text, ctx),
        Bank::Bradesco => banks::bradesco::parse(text, ctx),
        Bank::Santander => banks::santander::parse(text, ctx),
        Bank::Nubank | Bank::Inter => {
            return ParseReport::unsupported(format!(
                "{} statements are not supported yet",
                bank.label()
            ))
        }
        Bank::Sicoob => {
            return ParseReport::unsupported(
                "Sicoob delivers tag-based statements; use the OFX file instead",
            )
        }
    };
    annotate_empty(report)
}

/// Parse a tag-based (OFX) statement from raw bytes.
pub fn parse_tag_statement(bytes: &[u8]) -> ParseReport {
    annotate_empty(ofx::parse_statement(bytes))
}

/// "No transactions found" is an outcome the caller must be told about, not
/// an error.
fn annotate_empty(mut report: ParseReport) -> ParseReport {
    if report.records.is_empty() && report.notices.is_empty() {
        report
            .notices
            .push("no transactions found in statement".to_string());
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use fatura_core::StatementFormat;

    #[test]
    fn format_routing_matches_bank_table() {
        assert_eq!(Bank::Sicoob.format(), StatementFormat::TagBased);
        assert_eq!(Bank::Caixa.format(), StatementFormat::PageText);
    }

    #[test]
    fn stub_banks_fail_soft_with_notice() {
        for bank in [Bank::Nubank, Bank::Inter] {
            let report = parse_page_text(bank, "01/02 LOJA 10,00", &ParseContext::new(2024));
            assert!(report.records.is_empty());
            assert_eq!(report.notices.len(), 1);
            assert!(report.notices[0].contains("not supported"));
        }
    }

    #[test]
    fn tag_bank_routed_as_page_text_fails_soft() {
        let report = parse_page_text(Bank::Sicoob, "whatever", &ParseContext::new(2024));
        assert!(report.records.is_empty());
        assert!(!report.notices.is_empty());
    }

    #[test]
    fn empty_result_carries_a_notice() {
        let report = parse_page_text(Bank::Itau, "nada por aqui", &ParseContext::new(2024));
        assert!(report.records.is_empty());
        assert_eq!(report.notices, vec!["no transactions found in statement"]);
    }

    #[test]
    fn context_year_prefers_document_date() {
        let ctx = ParseContext::from_text("Vencimento 10/08/2023");
        assert_eq!(ctx.year, 2023);
    }

    #[test]
    fn context_year_defaults_to_current_year() {
        let ctx = ParseContext::from_text("texto sem nenhuma data completa");
        assert_eq!(ctx.year, chrono::Local::now().year());
    }

    #[test]
    fn dispatch_reaches_the_real_parsers() {
        let text = "02/08  PADARIA PRIMAVERA SAO PAULO  18,50\n";
        let report = parse_page_text(Bank::BancoDoBrasil, text, &ParseContext::new(2023));
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].description, "PADARIA PRIMAVERA");
    }
}

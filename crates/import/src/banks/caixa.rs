//! Caixa card statements. Transactions are grouped under named sections
//! ("ANUIDADE", "COMPRAS", "COMPRAS PARCELADAS"), each with its own row
//! grammar and an explicit closing vocabulary. The scanner is an explicit
//! state machine: `state + line -> next state + optional outcome`, so the
//! transitions are testable on their own.

use chrono::NaiveDate;

use fatura_core::TransactionRecord;

use crate::normalize::{self, re};
use crate::report::{ParseReport, SkipReason};
use crate::router::ParseContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Anuidade,
    Compras,
    ComprasParceladas,
}

impl Section {
    /// Longest label first, so "COMPRAS PARCELADAS" is not mistaken for
    /// "COMPRAS".
    const ALL: [Section; 3] = [Section::ComprasParceladas, Section::Compras, Section::Anuidade];

    pub fn label(self) -> &'static str {
        match self {
            Section::Anuidade => "ANUIDADE",
            Section::Compras => "COMPRAS",
            Section::ComprasParceladas => "COMPRAS PARCELADAS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionState {
    #[default]
    Idle,
    InSection(Section),
}

/// Vocabulary that closes the current section.
const CLOSING_KEYWORDS: &[&str] = &[
    "OUTROS",
    "Demonstrativo",
    "Total final",
    "Valor total desta fatura",
    "Total COMPRAS",
    "Total COMPRAS PARCELADAS",
];

/// Column titles repeated under each section header; consumed without
/// affecting state.
const HEADER_KEYWORDS: &[&str] = &[
    "Data",
    "Descrição",
    "Cidade/País",
    "Valor U$$",
    "Crédito/Débito",
    "Total",
    "Valor Original",
    "Cotação",
];

re!(re_card_header, r"^[A-Z\s]+\s*\(Cartão\s+\d+\)");
// City words are upper-case and at least two letters each; single capital
// letters ("X", "A") stay with the description.
re!(re_purchase_row, r"(\d{2}/\d{2})\s+(.+?)\s+([A-Z]{2,}(?:\s+[A-Z]{2,})*)\s+([\d\.]+,\d{2})\s*D\s*$");
re!(re_fee_row, r"^([A-Z\s\d/]+?)\s+([\d\.]+,\d{2})\s*D\s*$");
re!(re_loose_row, r"(\d{2}/\d{2})\s+(.+)\s+([\d\.]+,\d{2})\s*D");

/// Annual-fee rows have no date of their own; they are booked on the first of
/// this fixed month. Kept as-is for sheet compatibility (see DESIGN.md).
pub const ANNUAL_FEE_MONTH: u32 = 8;

fn annual_fee_date(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, ANNUAL_FEE_MONTH, 1).unwrap_or_else(normalize::fallback_date)
}

pub fn parse(text: &str, ctx: &ParseContext) -> ParseReport {
    let mut report = ParseReport::default();
    let mut state = SectionState::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let (next, outcome) = step(state, line, ctx.year);
        state = next;
        match outcome {
            Some(Ok(record)) => report.records.push(record),
            Some(Err(reason)) => report.push_skip(idx + 1, reason, line),
            None => {}
        }
    }

    tracing::debug!(records = report.records.len(), "caixa statement scanned");
    report
}

/// One transition of the section scanner.
pub fn step(
    state: SectionState,
    line: &str,
    year: i32,
) -> (SectionState, Option<Result<TransactionRecord, SkipReason>>) {
    if let Some(section) = detect_section(line) {
        return (SectionState::InSection(section), None);
    }
    let SectionState::InSection(section) = state else {
        return (SectionState::Idle, None);
    };

    if CLOSING_KEYWORDS.iter().any(|k| line.contains(k)) {
        return (SectionState::Idle, None);
    }
    // A header for some other card block also ends the section; headers that
    // name a recognized section were already handled above.
    if re_card_header().is_match(line) {
        return (SectionState::Idle, None);
    }
    if HEADER_KEYWORDS.iter().any(|k| line.contains(k)) {
        return (state, None);
    }

    (state, extract_row(section, line, year))
}

fn detect_section(line: &str) -> Option<Section> {
    Section::ALL.into_iter().find(|s| {
        let label = s.label();
        line.contains(label) && (line.contains("Cartão") || line == label)
    })
}

fn extract_row(
    section: Section,
    line: &str,
    year: i32,
) -> Option<Result<TransactionRecord, SkipReason>> {
    if let Some(caps) = re_purchase_row().captures(line) {
        // Ordinary purchase: the ALL-CAPS city column is dropped.
        let Some(value) = normalize::parse_brl_value(&caps[4]) else {
            return Some(Err(SkipReason::BadAmount));
        };
        let description = normalize::tidy_description(&scrub(&caps[2]));
        let date = normalize::expand_short_date(&caps[1], year);
        return Some(Ok(TransactionRecord::purchase(description, value, date)));
    }

    if section == Section::Anuidade {
        if let Some(caps) = re_fee_row().captures(line) {
            let Some(value) = normalize::parse_brl_value(&caps[2]) else {
                return Some(Err(SkipReason::BadAmount));
            };
            let description = normalize::tidy_description(&caps[1]);
            return Some(Ok(TransactionRecord::purchase(
                description,
                value,
                annual_fee_date(year),
            )));
        }
        return None;
    }

    if let Some(caps) = re_loose_row().captures(line) {
        let Some(value) = normalize::parse_brl_value(&caps[3]) else {
            return Some(Err(SkipReason::BadAmount));
        };
        let description = normalize::tidy_description(&scrub(&drop_trailing_city(&caps[2])));
        let date = normalize::expand_short_date(&caps[1], year);
        return Some(Ok(TransactionRecord::purchase(description, value, date)));
    }

    None
}

/// Loose rows have no delimited city column; the trailing two tokens are
/// taken as the city and dropped. Short descriptions are kept whole.
fn drop_trailing_city(desc: &str) -> String {
    let tokens: Vec<&str> = desc.split_whitespace().collect();
    if tokens.len() >= 3 {
        tokens[..tokens.len() - 2].join(" ")
    } else {
        tokens.join(" ")
    }
}

fn scrub(desc: &str) -> String {
    normalize::fixpoint(desc.to_string(), |d| normalize::strip_statement_codes(d))
}

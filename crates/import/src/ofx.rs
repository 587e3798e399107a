//! Tag-based statement extractor (OFX, used by Sicoob cards).
//!
//! The files are SGML-flavored: `<STMTTRN>…</STMTTRN>` blocks with
//! `<TRNTYPE>`, `<DTPOSTED>`, `<TRNAMT>` and `<MEMO>` sub-tags. A block only
//! becomes a record when all four sub-fields are present and the amount is a
//! debit; everything else is reported as skipped.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use fatura_core::TransactionRecord;

use crate::normalize::{self, re};
use crate::report::{ParseReport, SkipReason};

re!(re_block, r"(?s)<STMTTRN>(.*?)</STMTTRN>");
re!(re_trntype, r"<TRNTYPE>(.*?)</TRNTYPE>");
re!(re_dtposted, r"<DTPOSTED>(\d{8}).*?</DTPOSTED>");
re!(re_trnamt, r"<TRNAMT>(-?\d+\.?\d*)");
re!(re_memo, r"<MEMO>(.*?)</MEMO>");
re!(re_memo_installment, r"\s+\d{2}/\d{2}\s+");
re!(re_currency_tail, r"\s*-?\s*US\$.*$");

/// Cities stripped from memo fields — [`normalize::KNOWN_CITIES`] plus a
/// variant the issuer's own text extraction mangles.
const MEMO_CITIES: &[&str] = &[
    "RIBEIRAO PRET",
    "RIBEIRAO PRE",
    "SAO PAULO",
    "OSASCO",
    "HORTOLANDIA",
    "BELO HORIZON",
    "SAN FRANCISCO",
    "ARIBEIRAO PRE",
];

/// Decode statement bytes: UTF-8 first, Latin-1 on failure. Exactly two
/// encodings are ever attempted.
pub fn decode_statement(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        // Latin-1 maps each byte to the same-numbered code point.
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

pub fn parse_statement(bytes: &[u8]) -> ParseReport {
    parse_text(&decode_statement(bytes))
}

pub fn parse_text(text: &str) -> ParseReport {
    let mut report = ParseReport::default();
    let mut blocks = 0usize;

    for caps in re_block().captures_iter(text) {
        blocks += 1;
        let block = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

        let trntype = capture(re_trntype(), block);
        let posted = capture(re_dtposted(), block);
        let amount = capture(re_trnamt(), block);
        let memo = capture(re_memo(), block);

        let (Some(_trntype), Some(posted), Some(amount_str), Some(memo)) =
            (trntype, posted, amount, memo)
        else {
            report.push_skip(blocks, SkipReason::IncompleteBlock, block.trim());
            continue;
        };

        let Ok(amount) = Decimal::from_str(amount_str.trim()) else {
            report.push_skip(blocks, SkipReason::BadAmount, amount_str);
            continue;
        };
        if amount >= Decimal::ZERO {
            // Payments and refunds come through as positive entries.
            tracing::debug!(block = blocks, "ignoring non-debit tag block");
            report.push_skip(blocks, SkipReason::CreditOrRefund, memo.trim());
            continue;
        }

        let date = parse_posted_date(posted.trim());
        let description = normalize::tidy_description(&clean_memo(memo.trim()));
        report
            .records
            .push(TransactionRecord::purchase(description, amount.abs(), date));
    }

    tracing::debug!(blocks, records = report.records.len(), "tag statement scanned");
    report
}

fn capture<'t>(re: &regex::Regex, block: &'t str) -> Option<&'t str> {
    re.captures(block).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// `YYYYMMDD` prefix to a date; unparsable values land on the fixed fallback
/// date rather than failing the block.
fn parse_posted_date(posted: &str) -> NaiveDate {
    let parsed = (posted.len() >= 8)
        .then(|| {
            let y = posted[0..4].parse::<i32>().ok()?;
            let m = posted[4..6].parse::<u32>().ok()?;
            let d = posted[6..8].parse::<u32>().ok()?;
            NaiveDate::from_ymd_opt(y, m, d)
        })
        .flatten();
    parsed.unwrap_or_else(normalize::fallback_date)
}

/// Memo cleaning for this issuer: drop the embedded `NN/NN` installment
/// token, cut at the first known city, drop a trailing foreign-currency
/// annotation.
pub fn clean_memo(memo: &str) -> String {
    normalize::fixpoint(memo.to_string(), |m| {
        let no_installment = re_memo_installment().replace_all(m, " ");
        let no_city = normalize::truncate_at_city(&no_installment, MEMO_CITIES);
        let collapsed = normalize::collapse_whitespace(&no_city);
        re_currency_tail().replace(&collapsed, "").trim().to_string()
    })
}

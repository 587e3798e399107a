//! Shared description/value primitives used by every statement parser.
//!
//! Institution parsers compose these into their own cleaning rule sets; each
//! rule set is applied to a fixed point so cleaning is idempotent.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static regex::Regex {
            static R: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
            R.get_or_init(|| regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}
pub(crate) use re;

re!(re_full_date, r"\d{2}/\d{2}/(\d{4})");
re!(re_installment_phrase, r"(?i)\s+\d{2}\s+DE\s+\d{2}");
re!(re_trailing_short_date, r"\s+\d{2}/\d{2}$");
re!(re_loose_fraction, r"\s+\d{1,2}/\s*\d{1,2}");
re!(re_dash_number, r"\s+-\s+\d+");
re!(re_six_digit_code, r"\s+\d{6}");

/// Descriptions longer than this are cut and marked with an ellipsis.
pub const MAX_DESCRIPTION_LEN: usize = 50;

/// City names the issuers append to merchant labels. Parsers strip these as
/// trailing suffixes; the OFX memo cleaner also knows a recognizer-mangled
/// variant on top of this list.
pub const KNOWN_CITIES: &[&str] = &[
    "RIBEIRAO PRET",
    "RIBEIRAO PRE",
    "SAO PAULO",
    "OSASCO",
    "HORTOLANDIA",
    "BELO HORIZON",
    "SAN FRANCISCO",
];

// ── Whitespace and length ────────────────────────────────────────────────────

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Final tidy applied to every record description: collapse runs of
/// whitespace, then cap the length with a trailing ellipsis.
pub fn tidy_description(s: &str) -> String {
    let collapsed = collapse_whitespace(s);
    match collapsed.char_indices().nth(MAX_DESCRIPTION_LEN) {
        Some((byte_pos, _)) => format!("{}...", &collapsed[..byte_pos]),
        None => collapsed,
    }
}

// ── City stripping ───────────────────────────────────────────────────────────

/// Drop a known city appearing as a whitespace-separated trailing suffix.
/// Single pass; callers wanting idempotence run it to a fixed point.
pub fn strip_city_suffix(s: &str, cities: &[&str]) -> String {
    let trimmed = s.trim_end();
    for city in cities {
        let Some(cut) = trimmed.len().checked_sub(city.len()) else {
            continue;
        };
        if !trimmed.is_char_boundary(cut) {
            continue;
        }
        let (head, tail) = trimmed.split_at(cut);
        if tail.eq_ignore_ascii_case(city) && head.ends_with(|c: char| c.is_whitespace()) {
            return head.trim_end().to_string();
        }
    }
    trimmed.to_string()
}

/// Cut the text at the first occurrence of any known city, dropping the city
/// and everything after it. Memo fields glue the city straight onto trailing
/// currency noise, so the whole tail goes.
pub fn truncate_at_city(s: &str, cities: &[&str]) -> String {
    let mut cut = s.len();
    for city in cities {
        if let Some(pos) = find_ignore_ascii_case(s, city) {
            cut = cut.min(pos);
        }
    }
    s[..cut].trim_end().to_string()
}

// Cities are plain ASCII, so a byte-wise scan can never land inside a
// multi-byte character of the haystack.
fn find_ignore_ascii_case(hay: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || hay.len() < needle.len() {
        return None;
    }
    hay.as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
}

// ── Statement codes (shared by the Caixa and Bradesco layouts) ───────────────

/// One pass of the code-scrubbing rules: `NN DE NN` installment phrases,
/// trailing short dates, loose `N/N` fragments, dash-number suffixes,
/// six-digit authorization codes, asterisks.
pub fn strip_statement_codes(s: &str) -> String {
    let s = re_installment_phrase().replace_all(s, "");
    let s = re_trailing_short_date().replace(&s, "");
    let s = re_loose_fraction().replace_all(&s, "");
    let s = re_dash_number().replace_all(&s, "");
    let s = re_six_digit_code().replace_all(&s, "");
    let s = s.replace('*', " ");
    collapse_whitespace(&s)
}

/// Apply a cleaning pass until it stops changing the text. All institution
/// rule sets shrink their input, so this terminates quickly.
pub(crate) fn fixpoint(mut s: String, pass: impl Fn(&str) -> String) -> String {
    loop {
        let next = pass(&s);
        if next == s {
            return s;
        }
        s = next;
    }
}

// ── Values and dates ─────────────────────────────────────────────────────────

/// Convert `thousands-dot, decimal-comma` notation ("1.234,56") to a decimal.
pub fn parse_brl_value(s: &str) -> Option<Decimal> {
    let plain = s.trim().replace('.', "").replace(',', ".");
    Decimal::from_str(&plain).ok()
}

/// Statement year: the year of the first complete `DD/MM/YYYY` date anywhere
/// in the document, if there is one.
pub fn infer_statement_year(text: &str) -> Option<i32> {
    re_full_date()
        .captures(text)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Where unparsable dates land instead of failing the line.
/// Kept as-is for compatibility with the existing payable sheets; see
/// DESIGN.md — this looks like a placeholder, not a business rule.
pub fn fallback_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

/// Expand a short `DD/MM` date with the statement year. Malformed or
/// impossible dates collapse to [`fallback_date`].
pub fn expand_short_date(date_str: &str, year: i32) -> NaiveDate {
    let cleaned = date_str.replace(' ', "");
    let mut parts = cleaned.split('/');
    let day = parts.next().and_then(|p| p.parse::<u32>().ok());
    let month = parts.next().and_then(|p| p.parse::<u32>().ok());
    match (day, month) {
        (Some(d), Some(m)) => NaiveDate::from_ymd_opt(year, m, d).unwrap_or_else(fallback_date),
        _ => fallback_date(),
    }
}

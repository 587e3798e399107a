//! Fuzzy reconciliation of extracted descriptions against the supplier
//! directory. The directory is a read-only snapshot fetched elsewhere; this
//! module only scores names and applies the acceptance threshold.

use serde::{Deserialize, Serialize};

use fatura_core::TransactionRecord;

/// A supplier as delivered by the directory service. The trade name is the
/// preferred label; the legal name is the fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(default, alias = "nome_fantasia")]
    pub trade_name: Option<String>,
    #[serde(default, alias = "razao_social")]
    pub legal_name: Option<String>,
}

impl Supplier {
    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.trade_name.as_deref()).or_else(|| non_blank(self.legal_name.as_deref()))
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// An expense category from the directory. Used only as labels for manual
/// resolution; extraction always books against the fixed card category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(alias = "descricao")]
    pub description: String,
}

/// Directory categories minus the placeholder entry the service returns for
/// unassigned funds.
pub fn usable_categories(categories: &[Category]) -> Vec<&Category> {
    categories
        .iter()
        .filter(|c| !c.description.trim().eq_ignore_ascii_case("disponível"))
        .collect()
}

/// A record plus its best directory candidate. `supplier` is `None` when no
/// candidate cleared the threshold — the record is surfaced for manual
/// resolution, never dropped. `score` is the best similarity either way.
#[derive(Debug, Clone)]
pub struct ReconciledRecord {
    pub record: TransactionRecord,
    pub supplier: Option<String>,
    pub score: u8,
}

/// A candidate is accepted only when its score strictly exceeds this.
pub const MATCH_THRESHOLD: u8 = 80;

/// Case-folded similarity on a 0–100 scale: Levenshtein distance over
/// characters, normalized by the longer length.
pub fn similarity(a: &str, b: &str) -> u8 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return 100;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 100;
    }
    let dist = levenshtein(&a, &b).min(max_len);
    ((max_len - dist) * 100 / max_len) as u8
}

/// Two-row Levenshtein over characters; the shorter sequence drives the inner
/// loop to keep the rows small.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    let (a, b) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let (m, n) = (a.len(), b.len());
    if m == 0 {
        return n;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Best candidate for one description: linear scan over every supplier,
/// highest score wins. Fine at statement scale (tens of rows × hundreds of
/// suppliers).
pub fn best_match<'a>(description: &str, suppliers: &'a [Supplier]) -> (Option<&'a str>, u8) {
    let mut best = None;
    let mut high = 0u8;
    for supplier in suppliers {
        if let Some(name) = supplier.display_name() {
            let score = similarity(description, name);
            if score > high {
                high = score;
                best = Some(name);
            }
        }
    }
    (best, high)
}

/// Reconcile every record against the directory snapshot, preserving the
/// input order.
pub fn reconcile(records: Vec<TransactionRecord>, suppliers: &[Supplier]) -> Vec<ReconciledRecord> {
    records
        .into_iter()
        .map(|record| {
            let (name, score) = best_match(&record.description, suppliers);
            let supplier = if score > MATCH_THRESHOLD {
                name.map(str::to_string)
            } else {
                None
            };
            ReconciledRecord { record, supplier, score }
        })
        .collect()
}

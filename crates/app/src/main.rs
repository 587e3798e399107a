mod config;
mod export;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use fatura_core::{Bank, StatementFormat};
use fatura_import::{reconcile, ParseContext, ParseReport, Supplier};

#[derive(Parser, Debug)]
#[command(
    name = "fatura",
    version,
    about = "Converte extratos de cartão de crédito em lançamentos de contas a pagar"
)]
struct Args {
    /// Issuing bank: sicoob, "banco do brasil", caixa, itau, bradesco, santander, ...
    bank: String,

    /// OFX file (tag-based banks), extracted page text, or a directory of
    /// scanned page images.
    input: PathBuf,

    /// Account label written on every payable row.
    #[arg(long)]
    account: Option<String>,

    /// Due date for the whole batch, DD/MM/YYYY.
    #[arg(long = "due-date")]
    due_date: Option<String>,

    /// Supplier directory snapshot (JSON) used for reconciliation.
    #[arg(long)]
    suppliers: Option<PathBuf>,

    /// Category directory snapshot (JSON), surfaced when manual resolution is
    /// needed.
    #[arg(long)]
    categories: Option<PathBuf>,

    /// Output CSV with the payable rows.
    #[arg(long, default_value = "contas_a_pagar.csv")]
    out: PathBuf,

    /// Config file with batch defaults (./fatura.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let cfg = config::load(args.config.as_deref())?;

    let account = args
        .account
        .or(cfg.account)
        .context("an account label is required (--account or fatura.toml)")?;
    let due_date = args
        .due_date
        .or(cfg.due_date)
        .context("a due date is required (--due-date or fatura.toml)")?;
    chrono::NaiveDate::parse_from_str(&due_date, "%d/%m/%Y")
        .with_context(|| format!("due date '{due_date}' is not DD/MM/YYYY"))?;

    let bank: Bank = args.bank.parse()?;
    let report = read_statement(bank, &args.input)?;

    for notice in &report.notices {
        tracing::warn!("{notice}");
    }
    for skip in &report.skipped {
        tracing::debug!(line = skip.line, reason = ?skip.reason, "skipped: {}", skip.excerpt);
    }
    if report.records.is_empty() {
        println!("No transactions found — nothing to write.");
        return Ok(());
    }

    let suppliers = load_suppliers(args.suppliers.or(cfg.suppliers))?;
    let reconciled = reconcile::reconcile(report.records, &suppliers);

    let unmatched = reconciled.iter().filter(|r| r.supplier.is_none()).count();
    if unmatched > 0 && !suppliers.is_empty() {
        tracing::warn!("{unmatched} record(s) need manual supplier resolution");
        for r in reconciled.iter().filter(|r| r.supplier.is_none()) {
            tracing::warn!(score = r.score, "unmatched: {}", r.record.description);
        }
        if let Some(path) = args.categories.or(cfg.categories) {
            let categories: Vec<reconcile::Category> = read_json(&path)?;
            tracing::info!(
                "{} directory categories available for manual assignment",
                reconcile::usable_categories(&categories).len()
            );
        }
    }

    let rows: Vec<_> = reconciled
        .iter()
        .map(|r| export::payable_row(r, &account, &due_date))
        .collect();
    export::write_rows(&args.out, &rows)?;
    println!("{} payable row(s) written to {}", rows.len(), args.out.display());
    Ok(())
}

fn read_statement(bank: Bank, input: &Path) -> Result<ParseReport> {
    match bank.format() {
        StatementFormat::TagBased => {
            let bytes =
                fs::read(input).with_context(|| format!("reading {}", input.display()))?;
            Ok(fatura_import::parse_tag_statement(&bytes))
        }
        StatementFormat::PageText => {
            let text = if input.is_dir() {
                recognize_pages(input)?
            } else {
                fs::read_to_string(input)
                    .with_context(|| format!("reading {}", input.display()))?
            };
            let ctx = ParseContext::from_text(&text);
            Ok(fatura_import::parse_page_text(bank, &text, &ctx))
        }
    }
}

fn load_suppliers(path: Option<PathBuf>) -> Result<Vec<Supplier>> {
    match path {
        Some(path) => read_json(&path),
        None => {
            tracing::info!("no supplier snapshot given; rows will carry statement descriptions");
            Ok(Vec::new())
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(feature = "tesseract")]
fn recognize_pages(dir: &Path) -> Result<String> {
    use fatura_ocr::recognizer::tesseract_backend::TesseractRecognizer;
    let source = fatura_ocr::ImageDirSource::open(dir)?;
    Ok(fatura_ocr::extract_document_text(&source, &TesseractRecognizer::new(None))?)
}

#[cfg(not(feature = "tesseract"))]
fn recognize_pages(dir: &Path) -> Result<String> {
    // Validate the directory either way so the error points at the real
    // problem first.
    let _ = fatura_ocr::ImageDirSource::open(dir)?;
    anyhow::bail!("scanned-page input requires a build with the `tesseract` feature")
}

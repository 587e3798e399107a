//! Mapping of reconciled records onto payable rows, written as CSV.
//!
//! The CSV mirrors the fixed-layout sheet the rows are destined for, one
//! column per target column in order (C, D, E, F, J, K); the actual cell
//! writing happens outside this workspace.

use std::path::Path;

use anyhow::{Context, Result};

use fatura_core::PayableRow;
use fatura_import::ReconciledRecord;

const HEADER: [&str; 6] = [
    "Fornecedor",
    "Categoria",
    "Conta Corrente",
    "Valor da Conta",
    "Data de Registro",
    "Data de Vencimento",
];

/// An accepted match replaces the statement description; otherwise the
/// description itself goes on the sheet.
pub fn payable_row(reconciled: &ReconciledRecord, account: &str, due_date: &str) -> PayableRow {
    let record = &reconciled.record;
    PayableRow {
        supplier: reconciled
            .supplier
            .clone()
            .unwrap_or_else(|| record.description.clone()),
        category: record.category.clone(),
        account: account.to_string(),
        amount: record.amount,
        register_date: record.formatted_date(),
        due_date: due_date.to_string(),
    }
}

pub fn write_rows(path: &Path, rows: &[PayableRow]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(HEADER)?;
    for row in rows {
        let amount = row.amount.to_string();
        writer.write_record([
            row.supplier.as_str(),
            row.category.as_str(),
            row.account.as_str(),
            amount.as_str(),
            row.register_date.as_str(),
            row.due_date.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fatura_core::TransactionRecord;
    use rust_decimal::Decimal;

    fn reconciled(desc: &str, supplier: Option<&str>) -> ReconciledRecord {
        ReconciledRecord {
            record: TransactionRecord::purchase(
                desc,
                Decimal::new(12345, 2),
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            ),
            supplier: supplier.map(str::to_string),
            score: supplier.map_or(40, |_| 95),
        }
    }

    #[test]
    fn accepted_match_replaces_description() {
        let row = payable_row(&reconciled("MERCADO X", Some("Mercado Xavier LTDA")), "Conta", "10/03/2025");
        assert_eq!(row.supplier, "Mercado Xavier LTDA");
        assert_eq!(row.register_date, "01/02/2025");
        assert_eq!(row.due_date, "10/03/2025");
    }

    #[test]
    fn unmatched_record_keeps_description() {
        let row = payable_row(&reconciled("MERCADO X", None), "Conta", "10/03/2025");
        assert_eq!(row.supplier, "MERCADO X");
        assert_eq!(row.category, fatura_core::CREDIT_CARD_CATEGORY);
    }

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contas.csv");
        let rows = vec![
            payable_row(&reconciled("MERCADO X", None), "Conta", "10/03/2025"),
            payable_row(&reconciled("POSTO Y", Some("Posto Ypiranga")), "Conta", "10/03/2025"),
        ];
        write_rows(&path, &rows).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Fornecedor,"));
        assert!(lines[1].contains("MERCADO X"));
        assert!(lines[2].contains("Posto Ypiranga"));
        assert!(lines[2].contains("123.45"));
    }
}

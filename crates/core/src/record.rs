use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed category label for every card purchase; the accounting side expects
/// this exact spelling.
pub const CREDIT_CARD_CATEGORY: &str = "Cartão de Credito";

/// One purchase extracted from a statement.
///
/// `amount` is always strictly positive — credits, refunds and bill payments
/// are filtered out by the parsers before a record is built, never represented
/// as negative amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl TransactionRecord {
    pub fn purchase(description: impl Into<String>, amount: Decimal, date: NaiveDate) -> Self {
        debug_assert!(amount > Decimal::ZERO, "purchase amounts are positive");
        TransactionRecord {
            description: description.into(),
            category: CREDIT_CARD_CATEGORY.to_string(),
            amount,
            date,
        }
    }

    /// Register date in the `DD/MM/YYYY` shape the payables sheet uses.
    pub fn formatted_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_sets_fixed_category() {
        let r = TransactionRecord::purchase(
            "LOJA ABC",
            Decimal::new(4590, 2),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        );
        assert_eq!(r.category, CREDIT_CARD_CATEGORY);
        assert_eq!(r.amount, Decimal::new(4590, 2));
    }

    #[test]
    fn formatted_date_is_day_month_year() {
        let r = TransactionRecord::purchase(
            "X",
            Decimal::ONE,
            NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
        );
        assert_eq!(r.formatted_date(), "07/03/2025");
    }
}

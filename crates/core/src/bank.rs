use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Interchange format a bank delivers its card statements in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementFormat {
    /// `<TAG>value</TAG>` interchange blocks (OFX).
    TagBased,
    /// Per-page text extracted from a document, no field delimiters.
    PageText,
}

/// Issuing institutions the pipeline knows about.
///
/// The binding to a [`StatementFormat`] is a fixed table, not discovered at
/// runtime. Nubank and Inter are listed but have no page-text parser yet;
/// requests for them come back as an empty result with a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bank {
    Sicoob,
    BancoDoBrasil,
    Caixa,
    Itau,
    Bradesco,
    Santander,
    Nubank,
    Inter,
}

#[derive(Error, Debug)]
#[error("unknown bank: '{0}'")]
pub struct UnknownBank(pub String);

impl Bank {
    pub fn all() -> &'static [Bank] {
        &[
            Bank::Sicoob,
            Bank::BancoDoBrasil,
            Bank::Caixa,
            Bank::Itau,
            Bank::Bradesco,
            Bank::Santander,
            Bank::Nubank,
            Bank::Inter,
        ]
    }

    pub fn format(self) -> StatementFormat {
        match self {
            Bank::Sicoob => StatementFormat::TagBased,
            Bank::BancoDoBrasil
            | Bank::Caixa
            | Bank::Itau
            | Bank::Bradesco
            | Bank::Santander
            | Bank::Nubank
            | Bank::Inter => StatementFormat::PageText,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Bank::Sicoob => "Sicoob",
            Bank::BancoDoBrasil => "Banco do Brasil",
            Bank::Caixa => "Caixa",
            Bank::Itau => "Itaú",
            Bank::Bradesco => "Bradesco",
            Bank::Santander => "Santander",
            Bank::Nubank => "Nubank",
            Bank::Inter => "Inter",
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Bank {
    type Err = UnknownBank;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accent-insensitive on the one label that carries one ("Itaú").
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == 'ú' { 'u' } else { c })
            .collect();
        match key.as_str() {
            "sicoob" => Ok(Bank::Sicoob),
            "banco do brasil" | "bb" => Ok(Bank::BancoDoBrasil),
            "caixa" => Ok(Bank::Caixa),
            "itau" => Ok(Bank::Itau),
            "bradesco" => Ok(Bank::Bradesco),
            "santander" => Ok(Bank::Santander),
            "nubank" => Ok(Bank::Nubank),
            "inter" | "banco inter" => Ok(Bank::Inter),
            _ => Err(UnknownBank(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn format_binding_is_static() {
        assert_eq!(Bank::Sicoob.format(), StatementFormat::TagBased);
        for bank in Bank::all() {
            if *bank != Bank::Sicoob {
                assert_eq!(bank.format(), StatementFormat::PageText);
            }
        }
    }

    #[test]
    fn from_str_accepts_human_labels() {
        assert_eq!(Bank::from_str("Banco do Brasil").unwrap(), Bank::BancoDoBrasil);
        assert_eq!(Bank::from_str("ITAÚ").unwrap(), Bank::Itau);
        assert_eq!(Bank::from_str("itau").unwrap(), Bank::Itau);
        assert_eq!(Bank::from_str(" santander ").unwrap(), Bank::Santander);
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert!(Bank::from_str("banco imaginário").is_err());
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for bank in Bank::all() {
            assert_eq!(Bank::from_str(&bank.to_string()).unwrap(), *bank);
        }
    }
}

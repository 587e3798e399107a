use thiserror::Error;

/// Language the statements are printed in; passed to the recognition engine.
pub const RECOGNITION_LANG: &str = "por";

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("image decode error: {0}")]
    ImageDecode(String),
    #[error("recognition engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available — build with the `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over the optical recognition engine.
/// Implementations accept encoded PNG/JPEG bytes of one statement page and
/// return the recognized text.
pub trait OcrBackend {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError>;
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set string — lets the fallback policy and the page-text
/// parsers be tested without Tesseract installed.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError, RECOGNITION_LANG};
    use leptess::LepTess;

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>) -> Self {
            Self { data_path, lang: RECOGNITION_LANG.to_string() }
        }

        pub fn with_lang(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_preset_text() {
        let r = MockRecognizer::new("COMPRAS\n01/02 MERCADO X SAO PAULO 123,45D");
        assert_eq!(
            r.recognize(b"fake image data").unwrap(),
            "COMPRAS\n01/02 MERCADO X SAO PAULO 123,45D"
        );
    }

    #[test]
    fn mock_ignores_image_content() {
        let r = MockRecognizer::new("ola");
        assert_eq!(r.recognize(b"anything").unwrap(), "ola");
        assert_eq!(r.recognize(b"").unwrap(), "ola");
    }
}

//! Decides, per document, whether the primary text extraction is usable or
//! the pages must be rasterized and recognized instead.

use thiserror::Error;

use crate::preprocess;
use crate::recognizer::OcrBackend;

/// Below this many characters of embedded text the document is treated as a
/// scan with no text layer.
pub const MIN_EMBEDDED_TEXT_LEN: usize = 100;

/// Resolution used when rasterizing a page for recognition.
pub const RASTER_DPI: u32 = 300;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to open document: {0}")]
    Open(String),
    #[error("failed to read page {page}: {message}")]
    Page { page: usize, message: String },
}

/// The external document backend: per-page embedded text plus on-demand
/// rasterization. Pages are 0-indexed and returned in document order.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// The page's embedded text layer; empty for scanned pages.
    fn page_text(&self, page: usize) -> Result<String, ExtractError>;

    /// Rasterize the page at `dpi`, returning encoded PNG/JPEG bytes.
    fn rasterize(&self, page: usize, dpi: u32) -> Result<Vec<u8>, ExtractError>;
}

/// Extract the document's text, falling back to per-page optical recognition
/// when the embedded layer is too thin.
///
/// A failure to read a page's embedded text aborts the document; once in the
/// recognition path, individual page failures are logged and skipped so one
/// bad scan never loses the rest of the statement. Page order is preserved
/// either way.
pub fn extract_document_text<S, B>(source: &S, backend: &B) -> Result<String, ExtractError>
where
    S: PageSource,
    B: OcrBackend,
{
    let mut text = String::new();
    for page in 0..source.page_count() {
        let page_text = source.page_text(page)?;
        if !page_text.is_empty() {
            text.push_str(&page_text);
            text.push('\n');
        }
    }

    if text.trim().chars().count() >= MIN_EMBEDDED_TEXT_LEN {
        return Ok(text);
    }

    tracing::info!("document has no usable text layer, running optical recognition");
    for page in 0..source.page_count() {
        let image = match source.rasterize(page, RASTER_DPI) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(page = page + 1, "page rasterization failed: {e}");
                continue;
            }
        };
        let prepared = match preprocess::prepare_page(&image) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(page = page + 1, "page preprocessing failed: {e}");
                continue;
            }
        };
        match backend.recognize(&prepared) {
            Ok(recognized) => {
                text.push_str(&recognized);
                text.push('\n');
            }
            Err(e) => tracing::warn!(page = page + 1, "page recognition failed: {e}"),
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::{MockRecognizer, OcrError};
    use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
    use std::cell::Cell;
    use std::io::Cursor;

    fn tiny_png() -> Vec<u8> {
        let img: GrayImage = ImageBuffer::from_fn(4, 4, |_, _| Luma([200u8]));
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    struct StubSource {
        texts: Vec<String>,
        rasters: Vec<Result<Vec<u8>, ()>>,
    }

    impl PageSource for StubSource {
        fn page_count(&self) -> usize {
            self.texts.len()
        }
        fn page_text(&self, page: usize) -> Result<String, ExtractError> {
            Ok(self.texts[page].clone())
        }
        fn rasterize(&self, page: usize, _dpi: u32) -> Result<Vec<u8>, ExtractError> {
            self.rasters[page].clone().map_err(|_| ExtractError::Page {
                page,
                message: "raster failure".into(),
            })
        }
    }

    struct CountingRecognizer {
        calls: Cell<usize>,
        text: String,
    }

    impl OcrBackend for CountingRecognizer {
        fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.text.clone())
        }
    }

    #[test]
    fn rich_text_layer_skips_recognition() {
        let source = StubSource {
            texts: vec!["x".repeat(200)],
            rasters: vec![Ok(tiny_png())],
        };
        let recognizer = CountingRecognizer { calls: Cell::new(0), text: "unused".into() };
        let text = extract_document_text(&source, &recognizer).unwrap();
        assert!(text.contains(&"x".repeat(200)));
        assert_eq!(recognizer.calls.get(), 0);
    }

    #[test]
    fn thin_text_layer_triggers_per_page_recognition() {
        let source = StubSource {
            texts: vec![String::new(), String::new()],
            rasters: vec![Ok(tiny_png()), Ok(tiny_png())],
        };
        let recognizer = CountingRecognizer { calls: Cell::new(0), text: "pagina".into() };
        let text = extract_document_text(&source, &recognizer).unwrap();
        assert_eq!(recognizer.calls.get(), 2);
        assert_eq!(text.matches("pagina").count(), 2);
    }

    #[test]
    fn failing_page_is_skipped_not_fatal() {
        let source = StubSource {
            texts: vec![String::new(), String::new()],
            rasters: vec![Err(()), Ok(tiny_png())],
        };
        let text = extract_document_text(&source, &MockRecognizer::new("ok")).unwrap();
        assert_eq!(text.trim(), "ok");
    }

    #[test]
    fn recognized_pages_keep_document_order() {
        struct Scanned;
        impl PageSource for Scanned {
            fn page_count(&self) -> usize {
                3
            }
            fn page_text(&self, _page: usize) -> Result<String, ExtractError> {
                Ok(String::new())
            }
            fn rasterize(&self, _page: usize, _dpi: u32) -> Result<Vec<u8>, ExtractError> {
                Ok(tiny_png())
            }
        }
        // Names each recognition in call order so the output betrays any
        // reordering.
        struct Sequence(Cell<usize>);
        impl OcrBackend for Sequence {
            fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
                let n = self.0.get();
                self.0.set(n + 1);
                Ok(format!("pagina {n}"))
            }
        }

        let text = extract_document_text(&Scanned, &Sequence(Cell::new(0))).unwrap();
        let positions: Vec<_> = (0..3)
            .map(|n| text.find(&format!("pagina {n}")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}

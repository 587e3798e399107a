pub mod fallback;
pub mod pages;
pub mod preprocess;
pub mod recognizer;

pub use fallback::{extract_document_text, ExtractError, PageSource, MIN_EMBEDDED_TEXT_LEN, RASTER_DPI};
pub use pages::ImageDirSource;
pub use preprocess::{prepare_page, PreprocessError};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, RECOGNITION_LANG};

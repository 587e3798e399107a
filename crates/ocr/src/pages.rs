//! A [`PageSource`] over a directory of scanned page images — the shape
//! statements arrive in when the bank only offers a paper copy and the pages
//! were photographed or scanned one file each.

use std::path::PathBuf;

use crate::fallback::{ExtractError, PageSource};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "tif", "tiff"];

/// Pages are the image files of one directory, ordered by file name.
pub struct ImageDirSource {
    pages: Vec<PathBuf>,
}

impl ImageDirSource {
    pub fn open(dir: &std::path::Path) -> Result<Self, ExtractError> {
        let entries = std::fs::read_dir(dir).map_err(|e| ExtractError::Open(e.to_string()))?;
        let mut pages: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| {
                        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
                    })
            })
            .collect();
        pages.sort();
        if pages.is_empty() {
            return Err(ExtractError::Open(format!(
                "no page images found in {}",
                dir.display()
            )));
        }
        Ok(ImageDirSource { pages })
    }
}

impl PageSource for ImageDirSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Plain images carry no embedded text layer, so the fallback always
    /// kicks in.
    fn page_text(&self, _page: usize) -> Result<String, ExtractError> {
        Ok(String::new())
    }

    /// The files are already rasters; `dpi` is whatever they were scanned at.
    fn rasterize(&self, page: usize, _dpi: u32) -> Result<Vec<u8>, ExtractError> {
        std::fs::read(&self.pages[page]).map_err(|e| ExtractError::Page {
            page,
            message: e.to_string(),
        })
    }
}

//! Normalization of rasterized statement pages before recognition.
//! Scanned card statements arrive as low-contrast grayscale-ish scans; a
//! grayscale conversion plus contrast stretch is enough to make the row text
//! legible to the engine.

use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("failed to load page image: {0}")]
    Load(#[from] image::ImageError),
    #[error("failed to encode processed page: {0}")]
    Encode(String),
}

/// Pages rasterized at 300 DPI land well above what the engine needs; cap the
/// longer edge to keep recognition time bounded.
const MAX_EDGE: u32 = 2800;

/// Take encoded page bytes (PNG / JPEG / …), normalize, and return PNG bytes
/// ready for recognition.
pub fn prepare_page(data: &[u8]) -> Result<Vec<u8>, PreprocessError> {
    let img = image::load_from_memory(data)?;
    encode_as_png(normalize(img))
}

fn normalize(img: DynamicImage) -> DynamicImage {
    let img = if img.width() > MAX_EDGE || img.height() > MAX_EDGE {
        img.resize(MAX_EDGE, MAX_EDGE, image::imageops::FilterType::Lanczos3)
    } else {
        img
    };

    let gray: GrayImage = img.to_luma8();

    let (min_px, max_px) = gray
        .pixels()
        .fold((255u8, 0u8), |(mn, mx), p| (mn.min(p[0]), mx.max(p[0])));

    if max_px == min_px {
        // Uniform page (blank scan) — nothing to stretch.
        return DynamicImage::ImageLuma8(gray);
    }

    let range = (max_px - min_px) as u32;
    let stretched: GrayImage = ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        let p = gray.get_pixel(x, y)[0];
        let v = ((p - min_px) as u32 * 255 / range) as u8;
        Luma([v])
    });

    DynamicImage::ImageLuma8(stretched)
}

fn encode_as_png(img: DynamicImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbaImage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BitmapError {
    #[error("invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
}

/// Decodes the service's base64 GIF into an RGBA bitmap.
pub fn decode(gif_base64: &str) -> Result<RgbaImage, BitmapError> {
    let compact: String = gif_base64.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    let image = image::load_from_memory_with_format(&bytes, ImageFormat::Gif)?;
    Ok(image.to_rgba8())
}

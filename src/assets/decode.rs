use std::io::Cursor;
use std::path::Path;

use crate::foundation::error::{SkinError, SkinResult};
use crate::foundation::pixel::PixelBuffer;

/// Decode encoded image bytes into straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> SkinResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| SkinError::resource(format!("decode image from memory: {e}")))?;
    PixelBuffer::from_image(dyn_img.to_rgba8())
}

/// Encode a pixel grid as PNG bytes.
pub fn encode_png(src: &PixelBuffer) -> SkinResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(src.to_image()?)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| SkinError::resource(format!("encode png: {e}")))?;
    Ok(buf)
}

/// Read and decode an image file.
pub fn load_image(path: impl AsRef<Path>) -> SkinResult<PixelBuffer> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| SkinError::resource(format!("read image '{}': {e}", path.display())))?;
    decode_image(&bytes)
        .map_err(|e| SkinError::resource(format!("image '{}': {e}", path.display())))
}

/// Write a pixel grid as a PNG file, creating parent directories as needed.
pub fn save_png(path: impl AsRef<Path>, src: &PixelBuffer) -> SkinResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            SkinError::resource(format!("create dir '{}': {e}", parent.display()))
        })?;
    }
    let bytes = encode_png(src)?;
    std::fs::write(path, bytes)
        .map_err(|e| SkinError::resource(format!("write png '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

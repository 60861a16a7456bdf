use std::sync::Arc;

use crate::codec::size_class::SizeClass;
use crate::foundation::error::{SkinError, SkinResult};
use crate::foundation::pixel::PixelBuffer;

/// Columns packed per row for cape textures.
pub const CAPE_WIDTH: u32 = 64;

/// Packed client texture: 4 bytes per pixel, row-major, `R, G, B, A'` with inverted alpha.
///
/// Immutable once built; the byte length always matches [`PackedTexture::size_class`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedTexture {
    size_class: SizeClass,
    bytes: Arc<Vec<u8>>,
}

impl PackedTexture {
    /// Validate a raw packed buffer and identify its size class.
    pub fn from_bytes(bytes: Vec<u8>) -> SkinResult<Self> {
        let size_class = SizeClass::from_byte_len(bytes.len())?;
        Ok(Self {
            size_class,
            bytes: Arc::new(bytes),
        })
    }

    /// Size class derived from the byte length.
    pub fn size_class(&self) -> SizeClass {
        self.size_class
    }

    /// `(width, height)` of the packed grid.
    pub fn dimensions(&self) -> (u32, u32) {
        self.size_class.dimensions()
    }

    /// Packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Packed length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; every size class has a non-zero length.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Alpha transform applied when packing a loaded image: `(!a << 1) & 0xFF`.
pub fn encode_alpha(a: u8) -> u8 {
    ((u32::from(!a) << 1) & 0xFF) as u8
}

/// Alpha transform applied when unpacking for display: `127 - stored / 2`.
///
/// This is not the inverse of [`encode_alpha`]; the two directions follow different upstream
/// conventions and must stay as they are for client compatibility.
pub fn decode_alpha(stored: u8) -> u8 {
    127 - stored / 2
}

/// Pack a pixel grid whose dimensions are one of the canonical size classes.
pub fn encode_texture(src: &PixelBuffer) -> SkinResult<PackedTexture> {
    let size_class = SizeClass::from_dimensions(src.width(), src.height())?;
    let mut out = Vec::with_capacity(size_class.byte_len());
    for [r, g, b, a] in src.pixels() {
        out.extend_from_slice(&[r, g, b, encode_alpha(a)]);
    }
    Ok(PackedTexture {
        size_class,
        bytes: Arc::new(out),
    })
}

/// Unpack a validated packed texture.
pub fn decode_texture(packed: &PackedTexture) -> SkinResult<PixelBuffer> {
    let (width, height) = packed.dimensions();
    unpack(width, height, packed.as_bytes())
}

/// Unpack raw bytes, identifying the grid size from their length.
pub fn decode_bytes(bytes: &[u8]) -> SkinResult<PixelBuffer> {
    let (width, height) = SizeClass::from_byte_len(bytes.len())?.dimensions();
    unpack(width, height, bytes)
}

/// Pack a cape image: the leftmost [`CAPE_WIDTH`] columns of every row.
pub fn encode_cape(src: &PixelBuffer) -> SkinResult<PackedTexture> {
    if src.width() < CAPE_WIDTH {
        return Err(SkinError::format(format!(
            "cape image must be at least {CAPE_WIDTH} pixels wide, got {}",
            src.width()
        )));
    }
    let size_class = SizeClass::from_dimensions(CAPE_WIDTH, src.height())?;
    let row_bytes = (src.width() as usize) * 4;
    let mut out = Vec::with_capacity(size_class.byte_len());
    for row in src.as_raw().chunks_exact(row_bytes) {
        for px in row[..(CAPE_WIDTH as usize) * 4].chunks_exact(4) {
            out.extend_from_slice(&[px[0], px[1], px[2], encode_alpha(px[3])]);
        }
    }
    Ok(PackedTexture {
        size_class,
        bytes: Arc::new(out),
    })
}

fn unpack(width: u32, height: u32, bytes: &[u8]) -> SkinResult<PixelBuffer> {
    let expected = (width as usize) * (height as usize) * 4;
    if bytes.len() != expected {
        return Err(SkinError::format(format!(
            "packed texture {width}x{height} needs {expected} bytes, got {}",
            bytes.len()
        )));
    }
    let mut rgba8 = Vec::with_capacity(expected);
    for px in bytes.chunks_exact(4) {
        rgba8.extend_from_slice(&[px[0], px[1], px[2], decode_alpha(px[3])]);
    }
    PixelBuffer::from_raw(width, height, rgba8)
}

#[cfg(test)]
#[path = "../../tests/unit/codec/texture.rs"]
mod tests;

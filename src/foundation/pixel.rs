use crate::foundation::error::{SkinError, SkinResult};

/// Straight-alpha RGBA8 sample (`[r, g, b, a]`, alpha 255 = opaque).
pub type Rgba8 = [u8; 4];

/// Fully transparent black.
pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];

/// Row-major straight-alpha RGBA8 pixel grid.
///
/// This is the common intermediate between image loading, compositing and the packed texture
/// codec. The backing storage is tightly packed, 4 bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    rgba8: Vec<u8>,
}

impl PixelBuffer {
    /// Create a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> SkinResult<Self> {
        Self::filled(width, height, TRANSPARENT)
    }

    /// Create a buffer where every pixel is `px`.
    pub fn filled(width: u32, height: u32, px: Rgba8) -> SkinResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            rgba8: px.repeat(len / 4),
        })
    }

    /// Wrap raw RGBA8 bytes. The length must be exactly `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, rgba8: Vec<u8>) -> SkinResult<Self> {
        let expected = byte_len(width, height)?;
        if rgba8.len() != expected {
            return Err(SkinError::format(format!(
                "pixel grid {width}x{height} needs {expected} bytes, got {}",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw row-major RGBA8 bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.rgba8
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.rgba8
    }

    /// Consume the buffer and return its raw bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.rgba8
    }

    /// Sample at `(x, y)`, or `None` when outside the grid.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        let idx = self.index(x, y)?;
        let px = &self.rgba8[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Overwrite the sample at `(x, y)`.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba8) -> SkinResult<()> {
        let idx = self.index(x, y).ok_or_else(|| {
            SkinError::validation(format!(
                "pixel ({x}, {y}) outside {}x{} grid",
                self.width, self.height
            ))
        })?;
        self.rgba8[idx..idx + 4].copy_from_slice(&px);
        Ok(())
    }

    /// Iterate samples in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgba8> + '_ {
        self.rgba8
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Build from an `image` crate RGBA buffer.
    pub fn from_image(img: image::RgbaImage) -> SkinResult<Self> {
        let (width, height) = img.dimensions();
        Self::from_raw(width, height, img.into_raw())
    }

    /// Convert into an `image` crate RGBA buffer.
    pub fn to_image(&self) -> SkinResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.rgba8.clone())
            .ok_or_else(|| SkinError::format("pixel grid does not match its dimensions"))
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + (x as usize)) * 4)
    }
}

fn byte_len(width: u32, height: u32) -> SkinResult<usize> {
    if width == 0 || height == 0 {
        return Err(SkinError::validation(format!(
            "pixel grid dimensions must be > 0, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SkinError::validation("pixel grid size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/pixel.rs"]
mod tests;

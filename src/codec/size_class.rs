use crate::foundation::error::{SkinError, SkinResult};

/// Canonical packed skin formats recognized by the client.
///
/// A packed buffer's byte length identifies its class; every supported `(width, height)` pair
/// is listed here and nowhere else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SizeClass {
    /// 64×32, the pre-overlay layout.
    Legacy64x32,
    /// 64×64, the classic layout with overlay layers.
    Classic64x64,
    /// 128×128 high-resolution layout.
    Hd128x128,
    /// 128×256 high-resolution layout.
    Hd128x256,
}

impl SizeClass {
    /// Every supported class, smallest first.
    pub const ALL: [SizeClass; 4] = [
        SizeClass::Legacy64x32,
        SizeClass::Classic64x64,
        SizeClass::Hd128x128,
        SizeClass::Hd128x256,
    ];

    /// `(width, height)` in pixels.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            SizeClass::Legacy64x32 => (64, 32),
            SizeClass::Classic64x64 => (64, 64),
            SizeClass::Hd128x128 => (128, 128),
            SizeClass::Hd128x256 => (128, 256),
        }
    }

    /// Packed length in bytes (4 bytes per pixel).
    pub fn byte_len(self) -> usize {
        let (w, h) = self.dimensions();
        (w as usize) * (h as usize) * 4
    }

    /// Identify the class of a packed buffer from its length.
    pub fn from_byte_len(len: usize) -> SkinResult<Self> {
        match len {
            8192 => Ok(SizeClass::Legacy64x32),
            16384 => Ok(SizeClass::Classic64x64),
            65536 => Ok(SizeClass::Hd128x128),
            131072 => Ok(SizeClass::Hd128x256),
            other => Err(SkinError::format(format!(
                "unrecognized packed texture length: {other}"
            ))),
        }
    }

    /// Identify the class of a pixel grid from its dimensions.
    pub fn from_dimensions(width: u32, height: u32) -> SkinResult<Self> {
        match (width, height) {
            (64, 32) => Ok(SizeClass::Legacy64x32),
            (64, 64) => Ok(SizeClass::Classic64x64),
            (128, 128) => Ok(SizeClass::Hd128x128),
            (128, 256) => Ok(SizeClass::Hd128x256),
            (w, h) => Err(SkinError::format(format!(
                "unsupported texture dimensions: {w}x{h}"
            ))),
        }
    }

    /// Scale applied to model UV units when deriving bounds for this class.
    pub fn bounds_scale(self) -> f64 {
        match self {
            SizeClass::Legacy64x32 | SizeClass::Classic64x64 => 1.0,
            SizeClass::Hd128x128 | SizeClass::Hd128x256 => 2.0,
        }
    }

    /// `(maxX, maxY)` used by the transparency audit; `None` for classes that are not audited.
    pub fn audit_extent(self) -> Option<(u32, u32)> {
        match self {
            SizeClass::Legacy64x32 | SizeClass::Classic64x64 | SizeClass::Hd128x128 => {
                Some(self.dimensions())
            }
            SizeClass::Hd128x256 => None,
        }
    }
}

impl std::fmt::Display for SizeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (w, h) = self.dimensions();
        write!(f, "{w}x{h}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/size_class.rs"]
mod tests;

use std::sync::Arc;

use crate::codec::size_class::SizeClass;
use crate::codec::texture::PackedTexture;
use crate::foundation::error::{SkinError, SkinResult};
use crate::geometry::bounds::{BoundsTable, UvBoundsSet};

/// Stored (packed) alpha below this value counts as transparent.
pub const OPACITY_THRESHOLD: u8 = 127;

/// Raw tallies behind a transparency percentage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct TransparencyCounts {
    /// Visible-region pixels whose stored alpha is below [`OPACITY_THRESHOLD`].
    pub transparent: u64,
    /// Visible-region pixels inspected; overlapping rectangles count twice.
    pub total: u64,
}

impl TransparencyCounts {
    /// Rounded percentage in `[0, 100]`.
    pub fn percent(&self) -> u8 {
        let pct = (self.transparent as f64) * 100.0 / (self.total.max(1) as f64);
        pct.round() as u8
    }
}

/// Count transparent pixels of a packed buffer inside every qualifying rectangle.
pub fn count_transparent(bytes: &[u8], bounds: &UvBoundsSet) -> SkinResult<TransparencyCounts> {
    let class = SizeClass::from_byte_len(bytes.len())?;
    let (max_x, max_y) = class.audit_extent().ok_or_else(|| {
        SkinError::format(format!("{class} textures are not audited for transparency"))
    })?;

    let mut counts = TransparencyCounts::default();
    for rect in bounds.rects().iter().filter(|r| r.fits(max_x, max_y)) {
        for y in rect.min_y..=rect.max_y {
            for x in rect.min_x..=rect.max_x {
                let offset = ((max_x as usize) * (y as usize) + (x as usize)) * 4 + 3;
                // rects touching the extent can reach past the last row
                let Some(&alpha) = bytes.get(offset) else {
                    continue;
                };
                if alpha < OPACITY_THRESHOLD {
                    counts.transparent += 1;
                }
                counts.total += 1;
            }
        }
    }
    Ok(counts)
}

/// Percentage of visible-region pixels that are transparent in raw packed bytes.
pub fn audit_bytes(bytes: &[u8], bounds: &UvBoundsSet) -> SkinResult<u8> {
    Ok(count_transparent(bytes, bounds)?.percent())
}

/// Percentage of visible-region pixels that are transparent in a packed texture.
pub fn audit_transparency(packed: &PackedTexture, bounds: &UvBoundsSet) -> SkinResult<u8> {
    audit_bytes(packed.as_bytes(), bounds)
}

/// Audits packed textures against the shared bounds table, picking the set by size class.
#[derive(Clone, Debug)]
pub struct TransparencyAuditor {
    bounds: Arc<BoundsTable>,
}

impl TransparencyAuditor {
    /// Create an auditor over a startup-computed bounds table.
    pub fn new(bounds: Arc<BoundsTable>) -> Self {
        Self { bounds }
    }

    /// Bounds table in use.
    pub fn bounds(&self) -> &Arc<BoundsTable> {
        &self.bounds
    }

    /// Audit a validated packed texture.
    pub fn audit(&self, packed: &PackedTexture) -> SkinResult<u8> {
        audit_transparency(packed, self.bounds.for_size_class(packed.size_class()))
    }

    /// Audit raw packed bytes; unknown lengths are a format error.
    pub fn audit_bytes(&self, bytes: &[u8]) -> SkinResult<u8> {
        let class = SizeClass::from_byte_len(bytes.len())?;
        audit_bytes(bytes, self.bounds.for_size_class(class))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audit/transparency.rs"]
mod tests;

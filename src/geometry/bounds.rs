use std::sync::Arc;

use crate::codec::size_class::SizeClass;
use crate::foundation::error::{SkinError, SkinResult};
use crate::geometry::model::CuboidModel;

/// Flattened cube: size and UV origin in model units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Cuboid {
    /// Box extents `[x, y, z]`.
    pub size: [f64; 3],
    /// Texture-space origin `[u, v]`.
    pub uv: [f64; 2],
}

/// Inclusive texture-space rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct UvRect {
    /// Left column.
    pub min_x: i32,
    /// Top row.
    pub min_y: i32,
    /// Right column (inclusive).
    pub max_x: i32,
    /// Bottom row (inclusive).
    pub max_y: i32,
}

impl UvRect {
    /// Number of pixels covered; zero for degenerate rectangles.
    pub fn pixel_count(&self) -> u64 {
        let w = i64::from(self.max_x) - i64::from(self.min_x) + 1;
        let h = i64::from(self.max_y) - i64::from(self.min_y) + 1;
        if w <= 0 || h <= 0 {
            return 0;
        }
        (w as u64) * (h as u64)
    }

    /// Whether the rectangle qualifies for a texture of extent `(max_x, max_y)`.
    ///
    /// The upper bound is compared with `<=`, so a rectangle may touch the extent itself.
    pub fn fits(&self, max_x: u32, max_y: u32) -> bool {
        self.min_x >= 0
            && self.min_y >= 0
            && i64::from(self.max_x) <= i64::from(max_x)
            && i64::from(self.max_y) <= i64::from(max_y)
    }
}

/// Ordered UV rectangles derived from one model at one scale.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct UvBoundsSet {
    scale: f64,
    rects: Vec<UvRect>,
}

impl UvBoundsSet {
    /// Scale the set was computed at.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Rectangles in cuboid order, two per cuboid.
    pub fn rects(&self) -> &[UvRect] {
        &self.rects
    }

    /// Number of rectangles.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// `true` when the model had no cuboids.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Flatten every bone's cubes in description order.
///
/// Any mirrored bone or cube rejects the whole model; bones without cubes are skipped.
pub fn extract_cuboids(model: &CuboidModel) -> SkinResult<Vec<Cuboid>> {
    let mut out = Vec::new();
    for bone in model.bones() {
        if bone.mirror {
            return Err(SkinError::unsupported_geometry(format!(
                "bone '{}' of '{}' uses mirrored UVs",
                bone.name,
                model.name()
            )));
        }
        let Some(cubes) = &bone.cubes else {
            continue;
        };
        for cube in cubes {
            if cube.mirror {
                return Err(SkinError::unsupported_geometry(format!(
                    "cube of bone '{}' in '{}' uses mirrored UVs",
                    bone.name,
                    model.name()
                )));
            }
            out.push(Cuboid {
                size: cube.size,
                uv: cube.uv,
            });
        }
    }
    Ok(out)
}

/// Unwrap each cuboid into its two texture-space footprints at `scale`.
///
/// Scaled values are truncated to integers before the rectangles are derived. Cuboids whose
/// scaled values or corners leave the `i32` range are an [`SkinError::UnsupportedGeometry`].
pub fn compute_bounds(cuboids: &[Cuboid], scale: f64) -> SkinResult<UvBoundsSet> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(SkinError::validation(format!(
            "bounds scale must be finite and > 0, got {scale}"
        )));
    }

    let scaled = |v: f64| i32::try_from((scale * v) as i64).ok().map(i64::from);
    let mut rects = Vec::with_capacity(cuboids.len() * 2);
    for (i, c) in cuboids.iter().enumerate() {
        let out_of_range = || {
            SkinError::unsupported_geometry(format!(
                "cuboid {i} (size {:?}, uv {:?}) exceeds texture coordinate range at scale {scale}",
                c.size, c.uv
            ))
        };
        let (Some(x), Some(y), Some(z), Some(u), Some(v)) = (
            scaled(c.size[0]),
            scaled(c.size[1]),
            scaled(c.size[2]),
            scaled(c.uv[0]),
            scaled(c.uv[1]),
        ) else {
            return Err(out_of_range());
        };

        // top/bottom faces
        let top = uv_rect(u + z, v, u + z + 2 * x - 1, v + z - 1).ok_or_else(out_of_range)?;
        // side faces
        let side =
            uv_rect(u, v + z, u + 2 * (z + x) - 1, v + z + y - 1).ok_or_else(out_of_range)?;
        rects.push(top);
        rects.push(side);
    }

    Ok(UvBoundsSet { scale, rects })
}

/// Inputs are sums of `i32`-range values, so only the narrowing can fail.
fn uv_rect(min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> Option<UvRect> {
    Some(UvRect {
        min_x: i32::try_from(min_x).ok()?,
        min_y: i32::try_from(min_y).ok()?,
        max_x: i32::try_from(max_x).ok()?,
        max_y: i32::try_from(max_y).ok()?,
    })
}

/// Bounds for one model at both texture scales, built once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundsTable {
    standard: UvBoundsSet,
    hd: UvBoundsSet,
}

impl BoundsTable {
    /// Compute the 1.0 and 2.0 scale sets from flattened cuboids.
    pub fn from_cuboids(cuboids: &[Cuboid]) -> SkinResult<Self> {
        Ok(Self {
            standard: compute_bounds(cuboids, 1.0)?,
            hd: compute_bounds(cuboids, 2.0)?,
        })
    }

    /// Extract cuboids from `model` and compute both scale sets.
    #[tracing::instrument(skip(model), fields(geometry = model.name()))]
    pub fn from_model(model: &CuboidModel) -> SkinResult<Self> {
        let cuboids = extract_cuboids(model)?;
        let table = Self::from_cuboids(&cuboids)?;
        tracing::debug!(
            cuboids = cuboids.len(),
            rects = table.standard.len(),
            "computed uv bounds"
        );
        Ok(table)
    }

    /// Wrap in an `Arc` for sharing across request handlers.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Set used by 64-wide textures.
    pub fn standard(&self) -> &UvBoundsSet {
        &self.standard
    }

    /// Set used by 128-wide textures.
    pub fn hd(&self) -> &UvBoundsSet {
        &self.hd
    }

    /// Set matching the texture width of `class`.
    pub fn for_size_class(&self, class: SizeClass) -> &UvBoundsSet {
        match class {
            SizeClass::Legacy64x32 | SizeClass::Classic64x64 => &self.standard,
            SizeClass::Hd128x128 | SizeClass::Hd128x256 => &self.hd,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/bounds.rs"]
mod tests;

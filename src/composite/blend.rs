use crate::foundation::math::{div_round_u32, mul_div255_u8};
use crate::foundation::pixel::{PixelBuffer, Rgba8, TRANSPARENT};

/// Colour treated as fully transparent in an overlay, matched on all four channels.
///
/// The default key is transparent black. Any pixel with zero alpha already leaves the base
/// untouched under [`over`], so the default only changes output once it is set to a colour
/// with non-zero alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ColorKey(
    /// Key colour as straight-alpha RGBA.
    pub Rgba8,
);

impl Default for ColorKey {
    fn default() -> Self {
        Self(TRANSPARENT)
    }
}

impl ColorKey {
    /// Whether `px` is the key colour.
    pub fn matches(self, px: Rgba8) -> bool {
        px == self.0
    }
}

/// Straight-alpha source-over: `src` on top of `dst`.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let da = u32::from(dst[3]);
    let inv = 255 - sa;
    // alpha scaled by 255, never zero here
    let a_num = sa * 255 + da * inv;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * da * inv;
        out[i] = div_round_u32(c, a_num) as u8;
    }
    out[3] = src[3].saturating_add(mul_div255_u8(da as u16, inv as u16));
    out
}

/// Composite `top` onto `base` at `(x, y)` using the default transparent-black key.
pub fn overlay(base: &PixelBuffer, top: &PixelBuffer, x: i64, y: i64) -> PixelBuffer {
    overlay_keyed(base, top, x, y, Some(ColorKey::default()))
}

/// Composite `top` onto `base` at `(x, y)`.
///
/// The result keeps `base`'s dimensions; parts of `top` outside it are clipped. Pixels equal to
/// `key` are skipped regardless of their alpha.
pub fn overlay_keyed(
    base: &PixelBuffer,
    top: &PixelBuffer,
    x: i64,
    y: i64,
    key: Option<ColorKey>,
) -> PixelBuffer {
    let (bw, bh) = (i64::from(base.width()), i64::from(base.height()));
    let (tw, th) = (i64::from(top.width()), i64::from(top.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = x.saturating_add(tw).min(bw);
    let y1 = y.saturating_add(th).min(bh);

    let mut out = base.clone();
    let dst = out.as_raw_mut();
    let src = top.as_raw();
    for dy in y0..y1 {
        for dx in x0..x1 {
            let sidx = (((dy - y) * tw + (dx - x)) * 4) as usize;
            let s = [src[sidx], src[sidx + 1], src[sidx + 2], src[sidx + 3]];
            if key.is_some_and(|k| k.matches(s)) {
                continue;
            }
            let didx = ((dy * bw + dx) * 4) as usize;
            let d = [dst[didx], dst[didx + 1], dst[didx + 2], dst[didx + 3]];
            dst[didx..didx + 4].copy_from_slice(&over(d, s));
        }
    }

    out
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blend.rs"]
mod tests;

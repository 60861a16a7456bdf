use image::imageops::{self, FilterType};

use crate::foundation::error::{SkinError, SkinResult};
use crate::foundation::pixel::PixelBuffer;

const FILTER: FilterType = FilterType::CatmullRom;

/// Resize `src` towards `width`×`height`.
///
/// Without `crop` the aspect ratio is kept: the limiting dimension becomes the target and the
/// other one shrinks, so the result may be smaller than requested on one axis. With `crop` the
/// source is first cut (from the top-left) to the target aspect ratio and then scaled to exactly
/// `width`×`height`.
pub fn resize(src: &PixelBuffer, width: u32, height: u32, crop: bool) -> SkinResult<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(SkinError::validation(format!(
            "resize target must be > 0, got {width}x{height}"
        )));
    }

    let img = src.to_image()?;
    let out = if crop {
        let (cw, ch) = crop_extent(src.dimensions(), (width, height));
        let cropped = imageops::crop_imm(&img, 0, 0, cw, ch).to_image();
        imageops::resize(&cropped, width, height, FILTER)
    } else {
        let (fw, fh) = fit_extent(src.dimensions(), (width, height));
        if (fw, fh) == src.dimensions() {
            return Ok(src.clone());
        }
        imageops::resize(&img, fw, fh, FILTER)
    };

    PixelBuffer::from_image(out)
}

/// Output size of an aspect-preserving fit of `src` into `target`.
pub fn fit_extent(src: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let ratio = f64::from(src.0) / f64::from(src.1);
    let (w, h) = target;
    if f64::from(w) / f64::from(h) > ratio {
        (round_dim(f64::from(h) * ratio, w), h)
    } else {
        (w, round_dim(f64::from(w) / ratio, h))
    }
}

/// Source region (anchored at the origin) whose aspect ratio matches `target`.
pub fn crop_extent(src: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let ratio = f64::from(src.0) / f64::from(src.1);
    let target_ratio = f64::from(target.0) / f64::from(target.1);
    if ratio > target_ratio {
        (round_dim(f64::from(src.1) * target_ratio, src.0), src.1)
    } else {
        (src.0, round_dim(f64::from(src.0) / target_ratio, src.1))
    }
}

fn round_dim(v: f64, max: u32) -> u32 {
    (v.round() as u32).clamp(1, max)
}

#[cfg(test)]
#[path = "../../tests/unit/composite/resize.rs"]
mod tests;

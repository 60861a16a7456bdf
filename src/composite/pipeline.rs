use crate::codec::size_class::SizeClass;
use crate::codec::texture::{PackedTexture, encode_texture};
use crate::composite::blend::{ColorKey, overlay_keyed};
use crate::composite::resize::resize;
use crate::foundation::error::SkinResult;
use crate::foundation::pixel::PixelBuffer;

/// Options for merging a costume overlay onto a base skin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositeOpts {
    /// Crop the overlay to the target aspect ratio instead of fitting it.
    pub crop: bool,
    /// Overlay colour treated as transparent; `None` disables keying.
    ///
    /// Defaults to transparent black, which matches only pixels that source-over skips anyway.
    /// Set an opaque colour (e.g. a green-screen background) for keying to have an effect.
    pub color_key: Option<ColorKey>,
}

impl Default for CompositeOpts {
    fn default() -> Self {
        Self {
            crop: false,
            color_key: Some(ColorKey::default()),
        }
    }
}

/// Resize + overlay + encode for costume requests.
#[derive(Clone, Debug, Default)]
pub struct CompositePipeline {
    opts: CompositeOpts,
}

impl CompositePipeline {
    /// Create a pipeline with the given options.
    pub fn new(opts: CompositeOpts) -> Self {
        Self { opts }
    }

    /// Options in use.
    pub fn opts(&self) -> CompositeOpts {
        self.opts
    }

    /// Size the overlay is resized to for a given base skin.
    ///
    /// High-resolution 128×128 bases take a 128×128 overlay; every other base takes 64×64.
    pub fn overlay_target(base: &PixelBuffer) -> (u32, u32) {
        match SizeClass::from_dimensions(base.width(), base.height()) {
            Ok(SizeClass::Hd128x128) => (128, 128),
            _ => (64, 64),
        }
    }

    /// Merge `overlay` onto `base` at the origin. An absent overlay returns `base` unchanged.
    pub fn compose(
        &self,
        base: &PixelBuffer,
        overlay: Option<&PixelBuffer>,
    ) -> SkinResult<PixelBuffer> {
        let Some(top) = overlay else {
            return Ok(base.clone());
        };
        let (w, h) = Self::overlay_target(base);
        let resized = resize(top, w, h, self.opts.crop)?;
        tracing::trace!(
            base_w = base.width(),
            base_h = base.height(),
            overlay_w = resized.width(),
            overlay_h = resized.height(),
            "compose overlay"
        );
        Ok(overlay_keyed(base, &resized, 0, 0, self.opts.color_key))
    }

    /// [`CompositePipeline::compose`] followed by packing for the client.
    pub fn compose_packed(
        &self,
        base: &PixelBuffer,
        overlay: Option<&PixelBuffer>,
    ) -> SkinResult<PackedTexture> {
        encode_texture(&self.compose(base, overlay)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/pipeline.rs"]
mod tests;

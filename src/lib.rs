//! Skinforge is an avatar skin texture toolkit.
//!
//! It converts between straight-alpha RGBA images and the packed skin byte format, derives
//! visible-surface UV rectangles from a cuboid humanoid model, audits packed skins for
//! transparency and composites costume overlays onto saved skins:
//!
//! - Pack and unpack textures with [`encode_texture`] / [`decode_texture`]
//! - Build a [`BoundsTable`] once from a [`CuboidModel`] and share it
//! - Audit with a [`TransparencyAuditor`], merge with a [`CompositePipeline`]
//! - Tie it together per player with a [`CosmeticHandler`]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod audit;
mod codec;
mod composite;
mod cosmetic;
mod foundation;
mod geometry;

pub use crate::foundation::error::{SkinError, SkinResult};
pub use crate::foundation::pixel::{PixelBuffer, Rgba8, TRANSPARENT};

pub use crate::codec::size_class::SizeClass;
pub use crate::codec::texture::{
    CAPE_WIDTH, PackedTexture, decode_alpha, decode_bytes, decode_texture, encode_alpha,
    encode_cape, encode_texture,
};

pub use crate::geometry::bounds::{
    BoundsTable, Cuboid, UvBoundsSet, UvRect, compute_bounds, extract_cuboids,
};
pub use crate::geometry::model::{Bone, Cube, CuboidModel};

pub use crate::audit::transparency::{
    OPACITY_THRESHOLD, TransparencyAuditor, TransparencyCounts, audit_bytes, audit_transparency,
    count_transparent,
};

pub use crate::composite::blend::{ColorKey, over, overlay, overlay_keyed};
pub use crate::composite::pipeline::{CompositeOpts, CompositePipeline};
pub use crate::composite::resize::{crop_extent, fit_extent, resize};

pub use crate::assets::decode::{decode_image, encode_png, load_image, save_png};
pub use crate::assets::fs::{FsCosmeticSource, FsSkinStore, load_base_assets, normalize_asset_id};

pub use crate::cosmetic::handler::{BaseAssets, CosmeticHandler, CosmeticRequest};
pub use crate::cosmetic::opts::CosmeticOpts;
pub use crate::cosmetic::skin::{
    CosmeticSource, InMemoryDelivery, InMemorySkinStore, Skin, SkinDelivery, SkinStore,
};

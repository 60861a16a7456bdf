use std::sync::Arc;

use crate::assets::fs::{FsCosmeticSource, FsSkinStore, load_base_assets};
use crate::audit::transparency::TransparencyAuditor;
use crate::codec::texture::{PackedTexture, decode_bytes, encode_cape, encode_texture};
use crate::composite::pipeline::CompositePipeline;
use crate::cosmetic::opts::CosmeticOpts;
use crate::cosmetic::skin::{CosmeticSource, Skin, SkinDelivery, SkinStore};
use crate::foundation::error::{SkinError, SkinResult};
use crate::foundation::pixel::PixelBuffer;
use crate::geometry::bounds::BoundsTable;
use crate::geometry::model::CuboidModel;

/// Assets loaded once at startup.
#[derive(Clone, Debug)]
pub struct BaseAssets {
    /// Humanoid model the UV bounds are derived from.
    pub model: CuboidModel,
    /// Default ("steve") skin image.
    pub default_image: PixelBuffer,
    /// Geometry JSON sent with default and reset skins.
    pub default_geometry: String,
}

/// What a cosmetic request asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CosmeticRequest<'a> {
    /// Saved skin with a costume merged over it, optionally wearing a cape.
    Costume {
        /// Costume identifier.
        costume: &'a str,
        /// Cape identifier.
        cape: Option<&'a str>,
    },
    /// The costume image alone, with the costume geometry.
    CostumeOnly {
        /// Costume identifier.
        costume: &'a str,
    },
    /// Saved skin with the default geometry and no cape.
    Reset,
}

/// Builds player skins from saved skins, costumes and capes.
///
/// Bounds are computed once in [`CosmeticHandler::new`] and shared read-only afterwards.
pub struct CosmeticHandler<S, P> {
    opts: CosmeticOpts,
    auditor: TransparencyAuditor,
    pipeline: CompositePipeline,
    default_skin: Skin,
    source: S,
    store: P,
}

impl CosmeticHandler<FsCosmeticSource, FsSkinStore> {
    /// Handler over the on-disk resource and data layout named by `opts`.
    pub fn from_opts(opts: CosmeticOpts) -> SkinResult<Self> {
        let base = load_base_assets(&opts)?;
        let source = FsCosmeticSource::from_opts(&opts);
        let store = FsSkinStore::from_opts(&opts);
        Self::new(opts, base, source, store)
    }
}

impl<S: CosmeticSource, P: SkinStore> CosmeticHandler<S, P> {
    /// Compute UV bounds and pack the default skin.
    #[tracing::instrument(skip_all, fields(geometry = base.model.name()))]
    pub fn new(opts: CosmeticOpts, base: BaseAssets, source: S, store: P) -> SkinResult<Self> {
        opts.validate()?;
        let bounds = BoundsTable::from_model(&base.model)?.shared();
        let default_skin = Skin {
            skin_id: String::new(),
            data: encode_texture(&base.default_image)?,
            cape: None,
            geometry_name: opts.default_geometry_name.clone(),
            geometry_data: base.default_geometry,
        };
        tracing::info!(
            default_class = %default_skin.data.size_class(),
            "cosmetic handler ready"
        );
        Ok(Self {
            auditor: TransparencyAuditor::new(bounds),
            pipeline: CompositePipeline::new(opts.composite),
            opts,
            default_skin,
            source,
            store,
        })
    }

    /// Options in use.
    pub fn opts(&self) -> &CosmeticOpts {
        &self.opts
    }

    /// Shared bounds table.
    pub fn bounds(&self) -> &Arc<BoundsTable> {
        self.auditor.bounds()
    }

    /// Default skin under `skin_id`.
    pub fn default_skin(&self, skin_id: &str) -> Skin {
        self.default_skin.with_skin_id(skin_id)
    }

    /// Installed costumes.
    pub fn available_costumes(&self) -> SkinResult<Vec<String>> {
        self.source.costume_ids()
    }

    /// Installed capes.
    pub fn available_capes(&self) -> SkinResult<Vec<String>> {
        self.source.cape_ids()
    }

    /// Packed cape texture.
    pub fn cape_data(&self, cape: &str) -> SkinResult<PackedTexture> {
        encode_cape(&self.source.cape_image(cape)?)
    }

    /// Decode a packed skin received from a client and persist it for `player`.
    #[tracing::instrument(skip(self, packed), fields(len = packed.len()))]
    pub fn save_skin(&self, player: &str, packed: &[u8]) -> SkinResult<()> {
        let img = decode_bytes(packed)?;
        self.store.save_skin(player, &img)
    }

    /// Percentage of the visible surface of a packed skin that is transparent.
    pub fn transparency_percentage(&self, packed: &[u8]) -> SkinResult<u8> {
        self.auditor.audit_bytes(packed)
    }

    /// Saved skin with `costume` merged over it.
    #[tracing::instrument(skip(self))]
    pub fn costume_skin(
        &self,
        player: &str,
        skin_id: &str,
        costume: &str,
        cape: Option<&str>,
    ) -> SkinResult<Skin> {
        let base = self.saved_skin(player)?;
        let overlay = self.source.costume_image(costume)?;
        let data = self.pipeline.compose_packed(&base, Some(&overlay))?;
        let cape = cape.map(|c| self.cape_data(c)).transpose()?;
        Ok(Skin {
            skin_id: skin_id.to_string(),
            data,
            cape,
            geometry_name: self.opts.costume_geometry_name.clone(),
            geometry_data: self.source.costume_geometry(costume)?,
        })
    }

    /// The costume image alone as the skin.
    #[tracing::instrument(skip(self))]
    pub fn costume_only(&self, skin_id: &str, costume: &str) -> SkinResult<Skin> {
        let img = self.source.costume_image(costume)?;
        Ok(Skin {
            skin_id: skin_id.to_string(),
            data: encode_texture(&img)?,
            cape: None,
            geometry_name: self.opts.costume_geometry_name.clone(),
            geometry_data: self.source.costume_geometry(costume)?,
        })
    }

    /// Saved skin restored with the default geometry.
    #[tracing::instrument(skip(self))]
    pub fn reset_skin(&self, player: &str, skin_id: &str) -> SkinResult<Skin> {
        let base = self.saved_skin(player)?;
        Ok(Skin {
            skin_id: skin_id.to_string(),
            data: encode_texture(&base)?,
            cape: None,
            geometry_name: self.opts.default_geometry_name.clone(),
            geometry_data: self.default_skin.geometry_data.clone(),
        })
    }

    /// Build the skin for `request` and hand it to `delivery`.
    pub fn apply<D: SkinDelivery>(
        &self,
        delivery: &mut D,
        player: &str,
        skin_id: &str,
        request: CosmeticRequest<'_>,
    ) -> SkinResult<Skin> {
        let skin = match request {
            CosmeticRequest::Costume { costume, cape } => {
                self.costume_skin(player, skin_id, costume, cape)?
            }
            CosmeticRequest::CostumeOnly { costume } => self.costume_only(skin_id, costume)?,
            CosmeticRequest::Reset => self.reset_skin(player, skin_id)?,
        };
        delivery.deliver(player, &skin)?;
        Ok(skin)
    }

    fn saved_skin(&self, player: &str) -> SkinResult<PixelBuffer> {
        self.store
            .load_skin(player)?
            .ok_or_else(|| SkinError::resource(format!("no saved skin for player '{player}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cosmetic/handler.rs"]
mod tests;

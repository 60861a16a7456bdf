use std::collections::HashMap;
use std::sync::Mutex;

use crate::codec::texture::PackedTexture;
use crate::foundation::error::{SkinError, SkinResult};
use crate::foundation::pixel::PixelBuffer;

/// Everything the client needs to render a player's avatar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skin {
    /// Client-side skin identifier, carried over from the player's current skin.
    pub skin_id: String,
    /// Packed skin texture.
    pub data: PackedTexture,
    /// Packed cape texture, if a cape is worn.
    pub cape: Option<PackedTexture>,
    /// Geometry identifier the client should bind, e.g. `geometry.humanoid.customSlim`.
    pub geometry_name: String,
    /// Raw geometry JSON sent alongside the texture.
    pub geometry_data: String,
}

impl Skin {
    /// Same skin under a different identifier.
    pub fn with_skin_id(&self, skin_id: impl Into<String>) -> Self {
        Self {
            skin_id: skin_id.into(),
            ..self.clone()
        }
    }
}

/// Installed costume and cape assets.
pub trait CosmeticSource {
    /// Identifiers of costumes that ship both an image and a geometry, sorted.
    fn costume_ids(&self) -> SkinResult<Vec<String>>;

    /// Identifiers of installed capes, sorted.
    fn cape_ids(&self) -> SkinResult<Vec<String>>;

    /// Costume overlay image.
    fn costume_image(&self, id: &str) -> SkinResult<PixelBuffer>;

    /// Costume geometry JSON text.
    fn costume_geometry(&self, id: &str) -> SkinResult<String>;

    /// Cape image.
    fn cape_image(&self, id: &str) -> SkinResult<PixelBuffer>;
}

/// Per-player persisted skin image.
pub trait SkinStore {
    /// Saved skin of `player`, or `None` if nothing was saved yet.
    fn load_skin(&self, player: &str) -> SkinResult<Option<PixelBuffer>>;

    /// Persist `skin` as the saved skin of `player`, replacing any previous one.
    fn save_skin(&self, player: &str, skin: &PixelBuffer) -> SkinResult<()>;
}

/// Hands a computed skin to a connected player.
pub trait SkinDelivery {
    /// Apply `skin` to `player` and broadcast it.
    fn deliver(&mut self, player: &str, skin: &Skin) -> SkinResult<()>;
}

/// Process-local [`SkinStore`], mostly useful for tests and tools.
#[derive(Debug, Default)]
pub struct InMemorySkinStore {
    skins: Mutex<HashMap<String, PixelBuffer>>,
}

impl SkinStore for InMemorySkinStore {
    fn load_skin(&self, player: &str) -> SkinResult<Option<PixelBuffer>> {
        let skins = self
            .skins
            .lock()
            .map_err(|_| SkinError::resource("in-memory skin store poisoned"))?;
        Ok(skins.get(player).cloned())
    }

    fn save_skin(&self, player: &str, skin: &PixelBuffer) -> SkinResult<()> {
        let mut skins = self
            .skins
            .lock()
            .map_err(|_| SkinError::resource("in-memory skin store poisoned"))?;
        skins.insert(player.to_string(), skin.clone());
        Ok(())
    }
}

/// [`SkinDelivery`] that records every delivered skin.
#[derive(Debug, Default)]
pub struct InMemoryDelivery {
    /// `(player, skin)` pairs in delivery order.
    pub delivered: Vec<(String, Skin)>,
}

impl SkinDelivery for InMemoryDelivery {
    fn deliver(&mut self, player: &str, skin: &Skin) -> SkinResult<()> {
        self.delivered.push((player.to_string(), skin.clone()));
        Ok(())
    }
}

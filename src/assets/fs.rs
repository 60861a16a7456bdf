use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::assets::decode::{load_image, save_png};
use crate::cosmetic::handler::BaseAssets;
use crate::cosmetic::opts::CosmeticOpts;
use crate::cosmetic::skin::{CosmeticSource, SkinStore};
use crate::foundation::error::{SkinError, SkinResult};
use crate::foundation::pixel::PixelBuffer;
use crate::geometry::model::CuboidModel;

/// Validate an identifier used as a file stem (costume, cape or player name).
///
/// Rejects empty names, path separators and parent traversals.
pub fn normalize_asset_id(id: &str) -> SkinResult<&str> {
    if id.is_empty() {
        return Err(SkinError::validation("asset id must be non-empty"));
    }
    if id.contains('/') || id.contains('\\') {
        return Err(SkinError::validation(format!(
            "asset id '{id}' must not contain path separators"
        )));
    }
    if id == "." || id == ".." {
        return Err(SkinError::validation(format!(
            "asset id '{id}' is not a file name"
        )));
    }
    Ok(id)
}

/// Load the humanoid model, default skin image and default geometry named by `opts`.
#[tracing::instrument(skip(opts), fields(resources = %opts.resources_dir.display()))]
pub fn load_base_assets(opts: &CosmeticOpts) -> SkinResult<BaseAssets> {
    let model = CuboidModel::from_path(opts.humanoid_path(), &opts.geometry_key)?;
    let default_image = load_image(opts.default_image_path())?;
    let default_geometry = read_text(&opts.default_geometry_path())?;
    Ok(BaseAssets {
        model,
        default_image,
        default_geometry,
    })
}

/// Costume and cape assets laid out as `<artifact>/<id>.{png,json}` and `<cape>/<id>.png`.
#[derive(Clone, Debug)]
pub struct FsCosmeticSource {
    artifact_dir: PathBuf,
    cape_dir: PathBuf,
}

impl FsCosmeticSource {
    /// Source over explicit directories.
    pub fn new(artifact_dir: impl Into<PathBuf>, cape_dir: impl Into<PathBuf>) -> Self {
        Self {
            artifact_dir: artifact_dir.into(),
            cape_dir: cape_dir.into(),
        }
    }

    /// Source over the directories named by `opts`.
    pub fn from_opts(opts: &CosmeticOpts) -> Self {
        Self::new(opts.artifact_dir(), opts.cape_dir())
    }
}

impl CosmeticSource for FsCosmeticSource {
    #[tracing::instrument(skip(self), fields(dir = %self.artifact_dir.display()))]
    fn costume_ids(&self) -> SkinResult<Vec<String>> {
        let json = stems_with_extension(&self.artifact_dir, "json")?;
        let png = stems_with_extension(&self.artifact_dir, "png")?;
        let ids: Vec<String> = json.intersection(&png).cloned().collect();
        tracing::debug!(count = ids.len(), "listed costumes");
        Ok(ids)
    }

    fn cape_ids(&self) -> SkinResult<Vec<String>> {
        Ok(stems_with_extension(&self.cape_dir, "png")?
            .into_iter()
            .collect())
    }

    fn costume_image(&self, id: &str) -> SkinResult<PixelBuffer> {
        let id = normalize_asset_id(id)?;
        load_image(self.artifact_dir.join(format!("{id}.png")))
    }

    fn costume_geometry(&self, id: &str) -> SkinResult<String> {
        let id = normalize_asset_id(id)?;
        read_text(&self.artifact_dir.join(format!("{id}.json")))
    }

    fn cape_image(&self, id: &str) -> SkinResult<PixelBuffer> {
        let id = normalize_asset_id(id)?;
        load_image(self.cape_dir.join(format!("{id}.png")))
    }
}

/// Saved player skins stored as `<dir>/<player>.png`.
#[derive(Clone, Debug)]
pub struct FsSkinStore {
    dir: PathBuf,
}

impl FsSkinStore {
    /// Store rooted at `dir`; the directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the skin directory named by `opts`.
    pub fn from_opts(opts: &CosmeticOpts) -> Self {
        Self::new(opts.skin_dir())
    }

    /// File backing the saved skin of `player`.
    pub fn skin_path(&self, player: &str) -> SkinResult<PathBuf> {
        let player = normalize_asset_id(player)?;
        Ok(self.dir.join(format!("{player}.png")))
    }
}

impl SkinStore for FsSkinStore {
    fn load_skin(&self, player: &str) -> SkinResult<Option<PixelBuffer>> {
        let path = self.skin_path(player)?;
        if !path.is_file() {
            return Ok(None);
        }
        load_image(&path).map(Some)
    }

    fn save_skin(&self, player: &str, skin: &PixelBuffer) -> SkinResult<()> {
        save_png(self.skin_path(player)?, skin)
    }
}

fn read_text(path: &Path) -> SkinResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| SkinError::resource(format!("read '{}': {e}", path.display())))
}

fn stems_with_extension(dir: &Path, ext: &str) -> SkinResult<BTreeSet<String>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| SkinError::resource(format!("list '{}': {e}", dir.display())))?;

    let mut out = BTreeSet::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| SkinError::resource(format!("list '{}': {e}", dir.display())))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(ext) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            out.insert(stem.to_string());
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fs.rs"]
mod tests;

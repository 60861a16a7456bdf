use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::composite::pipeline::CompositeOpts;
use crate::foundation::error::{SkinError, SkinResult};

/// Cosmetic handler configuration.
///
/// Every field has a default, so a config file only needs to name what it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CosmeticOpts {
    /// Read-only assets: `humanoid.json`, `steve.png`, `steve.json`, `artifact/`, `cape/`.
    pub resources_dir: PathBuf,
    /// Writable data; saved player skins live under `skin/`.
    pub data_dir: PathBuf,
    /// Geometry selected from `humanoid.json` for UV bounds.
    pub geometry_key: String,
    /// Geometry name bound by default and reset skins.
    pub default_geometry_name: String,
    /// Geometry name bound by costume skins.
    pub costume_geometry_name: String,
    /// Costume merge options.
    pub composite: CompositeOpts,
}

impl Default for CosmeticOpts {
    fn default() -> Self {
        Self {
            resources_dir: PathBuf::from("resources/cosmetic"),
            data_dir: PathBuf::from("data/cosmetic"),
            geometry_key: "geometry.humanoid".to_string(),
            default_geometry_name: "geometry.humanoid.customSlim".to_string(),
            costume_geometry_name: "geometry.cosmetic/artifact".to_string(),
            composite: CompositeOpts::default(),
        }
    }
}

impl CosmeticOpts {
    /// Parse options from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SkinResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| SkinError::validation(format!("parse cosmetic options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SkinResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SkinError::resource(format!("open cosmetic options '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject options that cannot work.
    pub fn validate(&self) -> SkinResult<()> {
        if self.geometry_key.trim().is_empty() {
            return Err(SkinError::validation("geometry_key must be non-empty"));
        }
        if self.default_geometry_name.trim().is_empty()
            || self.costume_geometry_name.trim().is_empty()
        {
            return Err(SkinError::validation("geometry names must be non-empty"));
        }
        Ok(())
    }

    /// Humanoid model used for UV bounds.
    pub fn humanoid_path(&self) -> PathBuf {
        self.resources_dir.join("humanoid.json")
    }

    /// Default skin image.
    pub fn default_image_path(&self) -> PathBuf {
        self.resources_dir.join("steve.png")
    }

    /// Default skin geometry.
    pub fn default_geometry_path(&self) -> PathBuf {
        self.resources_dir.join("steve.json")
    }

    /// Costume images and geometries.
    pub fn artifact_dir(&self) -> PathBuf {
        self.resources_dir.join("artifact")
    }

    /// Cape images.
    pub fn cape_dir(&self) -> PathBuf {
        self.resources_dir.join("cape")
    }

    /// Saved player skins.
    pub fn skin_dir(&self) -> PathBuf {
        self.data_dir.join("skin")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cosmetic/opts.rs"]
mod tests;

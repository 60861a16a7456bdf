use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::foundation::error::{SkinError, SkinResult};

/// Key of the array-style geometry layout (`format_version` 1.12 and later).
const GEOMETRY_ARRAY_KEY: &str = "minecraft:geometry";

/// One box attached to a bone: size in model units and the UV origin of its unwrap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cube {
    /// Box extents `[x, y, z]`.
    pub size: [f64; 3],
    /// Texture-space origin `[u, v]` of the unwrapped faces.
    pub uv: [f64; 2],
    /// Per-cube mirrored UV flag.
    #[serde(default)]
    pub mirror: bool,
}

/// Named skeletal part owning zero or more cubes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    /// Bone name, e.g. `"head"`.
    #[serde(default)]
    pub name: String,
    /// Mirrored UV layout for every cube of the bone.
    #[serde(default)]
    pub mirror: bool,
    /// Attached cubes; `None` for pure pivot bones.
    #[serde(default)]
    pub cubes: Option<Vec<Cube>>,
}

#[derive(Debug, Deserialize)]
struct GeometryDef {
    #[serde(default)]
    bones: Vec<Bone>,
}

/// Cuboid-based model description, loaded once and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CuboidModel {
    name: String,
    bones: Vec<Bone>,
}

impl CuboidModel {
    /// Build a model from already-parsed bones.
    pub fn new(name: impl Into<String>, bones: Vec<Bone>) -> Self {
        Self {
            name: name.into(),
            bones,
        }
    }

    /// Geometry identifier the model was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bones in description order.
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Select `geometry_key` from a parsed model description.
    ///
    /// Both the keyed layout (`{"geometry.humanoid": {"bones": [...]}}`, where a key may carry
    /// an inheritance suffix such as `"geometry.a:geometry.base"`) and the array layout under
    /// `"minecraft:geometry"` (matched by `description.identifier`) are accepted.
    pub fn from_value(root: &Value, geometry_key: &str) -> SkinResult<Self> {
        let node = find_geometry(root, geometry_key).ok_or_else(|| {
            SkinError::resource(format!("geometry '{geometry_key}' not found in model"))
        })?;
        let def = GeometryDef::deserialize(node).map_err(|e| {
            SkinError::resource(format!("parse geometry '{geometry_key}': {e}"))
        })?;
        Ok(Self::new(geometry_key, def.bones))
    }

    /// Parse a model description from JSON text.
    pub fn from_json_str(json: &str, geometry_key: &str) -> SkinResult<Self> {
        let root: Value = serde_json::from_str(json)
            .map_err(|e| SkinError::resource(format!("parse model JSON: {e}")))?;
        Self::from_value(&root, geometry_key)
    }

    /// Parse a model description from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R, geometry_key: &str) -> SkinResult<Self> {
        let root: Value = serde_json::from_reader(r)
            .map_err(|e| SkinError::resource(format!("parse model JSON: {e}")))?;
        Self::from_value(&root, geometry_key)
    }

    /// Parse a model description from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>, geometry_key: &str) -> SkinResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SkinError::resource(format!("open model JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f), geometry_key)
    }
}

fn find_geometry<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    if let Some(obj) = root.as_object() {
        let keyed = obj
            .iter()
            .find(|(k, _)| k.as_str() == key || k.split(':').next() == Some(key));
        if let Some((_, v)) = keyed {
            return Some(v);
        }
    }

    root.get(GEOMETRY_ARRAY_KEY)?.as_array()?.iter().find(|g| {
        g.pointer("/description/identifier").and_then(Value::as_str) == Some(key)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/model.rs"]
mod tests;

use std::collections::BTreeMap;

use super::*;
use crate::codec::size_class::SizeClass;
use crate::cosmetic::skin::{InMemoryDelivery, InMemorySkinStore};

#[derive(Default)]
struct MemorySource {
    costumes: BTreeMap<String, (PixelBuffer, String)>,
    capes: BTreeMap<String, PixelBuffer>,
}

impl CosmeticSource for MemorySource {
    fn costume_ids(&self) -> SkinResult<Vec<String>> {
        Ok(self.costumes.keys().cloned().collect())
    }

    fn cape_ids(&self) -> SkinResult<Vec<String>> {
        Ok(self.capes.keys().cloned().collect())
    }

    fn costume_image(&self, id: &str) -> SkinResult<PixelBuffer> {
        self.costumes
            .get(id)
            .map(|(img, _)| img.clone())
            .ok_or_else(|| SkinError::resource(format!("no costume {id}")))
    }

    fn costume_geometry(&self, id: &str) -> SkinResult<String> {
        self.costumes
            .get(id)
            .map(|(_, geo)| geo.clone())
            .ok_or_else(|| SkinError::resource(format!("no costume {id}")))
    }

    fn cape_image(&self, id: &str) -> SkinResult<PixelBuffer> {
        self.capes
            .get(id)
            .cloned()
            .ok_or_else(|| SkinError::resource(format!("no cape {id}")))
    }
}

fn base_assets() -> BaseAssets {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/humanoid.json");
    BaseAssets {
        model: CuboidModel::from_path(path, "geometry.humanoid").unwrap(),
        default_image: PixelBuffer::filled(64, 64, [120, 90, 60, 255]).unwrap(),
        default_geometry: r#"{"geometry.humanoid.customSlim":{}}"#.to_string(),
    }
}

fn handler() -> CosmeticHandler<MemorySource, InMemorySkinStore> {
    let mut source = MemorySource::default();
    let mut crown = PixelBuffer::new(64, 64).unwrap();
    for x in 0..64 {
        crown.set_pixel(x, 0, [255, 215, 0, 255]).unwrap();
    }
    source
        .costumes
        .insert("crown".to_string(), (crown, r#"{"crown":true}"#.to_string()));
    source.costumes.insert(
        "tiny".to_string(),
        (PixelBuffer::new(10, 10).unwrap(), "{}".to_string()),
    );
    source.capes.insert(
        "red".to_string(),
        PixelBuffer::filled(64, 32, [200, 0, 0, 255]).unwrap(),
    );

    CosmeticHandler::new(
        CosmeticOpts::default(),
        base_assets(),
        source,
        InMemorySkinStore::default(),
    )
    .unwrap()
}

fn save_plain_skin(h: &CosmeticHandler<MemorySource, InMemorySkinStore>, player: &str) {
    let skin = PixelBuffer::filled(64, 64, [0, 0, 255, 255]).unwrap();
    let packed = encode_texture(&skin).unwrap();
    h.save_skin(player, packed.as_bytes()).unwrap();
}

#[test]
fn default_skin_takes_requested_id() {
    let h = handler();
    let skin = h.default_skin("abc");
    assert_eq!(skin.skin_id, "abc");
    assert_eq!(skin.data.size_class(), SizeClass::Classic64x64);
    assert_eq!(skin.geometry_name, "geometry.humanoid.customSlim");
    assert!(skin.cape.is_none());
    assert_eq!(h.default_skin("").skin_id, "");
}

#[test]
fn bounds_are_built_once_from_model() {
    let h = handler();
    assert_eq!(h.bounds().standard().len(), 24);
    assert_eq!(h.bounds().hd().len(), 24);
}

#[test]
fn listings_come_from_source() {
    let h = handler();
    assert_eq!(
        h.available_costumes().unwrap(),
        vec!["crown".to_string(), "tiny".to_string()]
    );
    assert_eq!(h.available_capes().unwrap(), vec!["red".to_string()]);
}

#[test]
fn costume_skin_merges_overlay_and_cape() {
    let h = handler();
    save_plain_skin(&h, "steve");

    let skin = h.costume_skin("steve", "id-1", "crown", Some("red")).unwrap();
    assert_eq!(skin.skin_id, "id-1");
    assert_eq!(skin.geometry_name, "geometry.cosmetic/artifact");
    assert_eq!(skin.geometry_data, r#"{"crown":true}"#);
    assert_eq!(skin.cape.as_ref().unwrap().size_class(), SizeClass::Legacy64x32);

    let merged = decode_bytes(skin.data.as_bytes()).unwrap();
    assert_eq!(&merged.pixel(5, 0).unwrap()[..3], &[255, 215, 0]);
    let untouched = merged.pixel(5, 40).unwrap();
    assert_eq!(&untouched[..3], &[0, 0, 255]);
}

#[test]
fn costume_without_saved_skin_is_resource_error() {
    let h = handler();
    assert!(matches!(
        h.costume_skin("nobody", "x", "crown", None),
        Err(SkinError::Resource(_))
    ));
    assert!(matches!(
        h.reset_skin("nobody", "x"),
        Err(SkinError::Resource(_))
    ));
}

#[test]
fn costume_only_uses_costume_image_and_geometry() {
    let h = handler();
    let skin = h.costume_only("x", "crown").unwrap();
    assert_eq!(skin.geometry_name, "geometry.cosmetic/artifact");
    assert_eq!(skin.data.size_class(), SizeClass::Classic64x64);
    assert!(skin.cape.is_none());
    // images outside the known size classes cannot be packed
    assert!(matches!(
        h.costume_only("x", "tiny"),
        Err(SkinError::Format(_))
    ));
    assert!(matches!(
        h.costume_only("x", "missing"),
        Err(SkinError::Resource(_))
    ));
}

#[test]
fn reset_restores_default_geometry() {
    let h = handler();
    save_plain_skin(&h, "alex");
    let skin = h.reset_skin("alex", "id-2").unwrap();
    assert_eq!(skin.geometry_name, "geometry.humanoid.customSlim");
    assert_eq!(skin.geometry_data, h.default_skin("").geometry_data);
    assert!(skin.cape.is_none());
}

#[test]
fn apply_delivers_built_skin() {
    let h = handler();
    save_plain_skin(&h, "steve");
    let mut delivery = InMemoryDelivery::default();

    let skin = h
        .apply(
            &mut delivery,
            "steve",
            "id-3",
            CosmeticRequest::Costume {
                costume: "crown",
                cape: None,
            },
        )
        .unwrap();
    h.apply(&mut delivery, "steve", "id-3", CosmeticRequest::Reset)
        .unwrap();

    assert_eq!(delivery.delivered.len(), 2);
    assert_eq!(delivery.delivered[0].0, "steve");
    assert_eq!(delivery.delivered[0].1, skin);
}

#[test]
fn failed_request_delivers_nothing() {
    let h = handler();
    let mut delivery = InMemoryDelivery::default();
    assert!(
        h.apply(&mut delivery, "ghost", "x", CosmeticRequest::Reset)
            .is_err()
    );
    assert!(delivery.delivered.is_empty());
}

#[test]
fn save_skin_rejects_bad_length_and_transparency_is_audited() {
    let h = handler();
    assert!(matches!(
        h.save_skin("steve", &[0u8; 10]),
        Err(SkinError::Format(_))
    ));

    let opaque = vec![255u8; 16384];
    assert_eq!(h.transparency_percentage(&opaque).unwrap(), 0);
    assert!(matches!(
        h.transparency_percentage(&[0u8; 131072]),
        Err(SkinError::Format(_))
    ));
}

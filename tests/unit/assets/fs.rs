use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("unit_assets_fs")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn touch(path: PathBuf) {
    std::fs::write(path, b"{}").unwrap();
}

#[test]
fn asset_ids_must_be_plain_file_stems() {
    assert_eq!(normalize_asset_id("crown").unwrap(), "crown");
    assert_eq!(normalize_asset_id("Steve_01").unwrap(), "Steve_01");
    for bad in ["", ".", "..", "a/b", "..\\x", "/etc"] {
        assert!(
            matches!(normalize_asset_id(bad), Err(SkinError::Validation(_))),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn costumes_need_both_image_and_geometry() {
    let root = scratch("costumes");
    let artifact = root.join("artifact");
    let cape = root.join("cape");
    std::fs::create_dir_all(&artifact).unwrap();
    std::fs::create_dir_all(&cape).unwrap();

    let px = PixelBuffer::filled(64, 64, [1, 2, 3, 255]).unwrap();
    for id in ["wings", "crown"] {
        save_png(artifact.join(format!("{id}.png")), &px).unwrap();
        touch(artifact.join(format!("{id}.json")));
    }
    save_png(artifact.join("orphan.png"), &px).unwrap();
    touch(artifact.join("loose.json"));
    touch(artifact.join("notes.txt"));
    save_png(cape.join("red.png"), &px).unwrap();
    save_png(cape.join("blue.png"), &px).unwrap();

    let source = FsCosmeticSource::new(&artifact, &cape);
    assert_eq!(
        source.costume_ids().unwrap(),
        vec!["crown".to_string(), "wings".to_string()]
    );
    assert_eq!(
        source.cape_ids().unwrap(),
        vec!["blue".to_string(), "red".to_string()]
    );
    assert_eq!(source.costume_image("crown").unwrap(), px);
    assert_eq!(source.costume_geometry("crown").unwrap(), "{}");
    assert!(matches!(
        source.cape_image("green"),
        Err(SkinError::Resource(_))
    ));
    assert!(matches!(
        source.costume_image("../cape/red"),
        Err(SkinError::Validation(_))
    ));
}

#[test]
fn missing_directory_is_resource_error() {
    let root = scratch("missing");
    let source = FsCosmeticSource::new(root.join("nope"), root.join("nope"));
    assert!(matches!(source.costume_ids(), Err(SkinError::Resource(_))));
}

#[test]
fn skin_store_saves_and_loads_by_player() {
    let root = scratch("store");
    let store = FsSkinStore::new(root.join("skin"));

    assert_eq!(store.load_skin("steve").unwrap(), None);

    let skin = PixelBuffer::filled(64, 32, [10, 20, 30, 127]).unwrap();
    store.save_skin("steve", &skin).unwrap();
    assert_eq!(store.skin_path("steve").unwrap(), root.join("skin/steve.png"));
    assert_eq!(store.load_skin("steve").unwrap(), Some(skin));
    assert!(store.save_skin("..", &PixelBuffer::new(1, 1).unwrap()).is_err());
}

#[test]
fn base_assets_follow_opts_layout() {
    let root = scratch("base");
    let res = root.join("res");
    std::fs::create_dir_all(&res).unwrap();
    std::fs::copy(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/humanoid.json"),
        res.join("humanoid.json"),
    )
    .unwrap();
    save_png(
        res.join("steve.png"),
        &PixelBuffer::filled(64, 64, [9, 9, 9, 255]).unwrap(),
    )
    .unwrap();
    std::fs::write(res.join("steve.json"), "{\"geo\":1}").unwrap();

    let opts = CosmeticOpts {
        resources_dir: res.clone(),
        data_dir: root.join("data"),
        ..CosmeticOpts::default()
    };
    let base = load_base_assets(&opts).unwrap();
    assert_eq!(base.model.name(), "geometry.humanoid");
    assert_eq!(base.default_image.dimensions(), (64, 64));
    assert_eq!(base.default_geometry, "{\"geo\":1}");

    std::fs::remove_file(res.join("steve.json")).unwrap();
    assert!(matches!(
        load_base_assets(&opts),
        Err(SkinError::Resource(_))
    ));
}

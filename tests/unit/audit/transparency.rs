use super::*;
use crate::codec::texture::encode_texture;
use crate::foundation::pixel::PixelBuffer;
use crate::geometry::bounds::{Cuboid, UvRect, compute_bounds};
use crate::geometry::model::CuboidModel;

fn fixture_table() -> BoundsTable {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/humanoid.json");
    let model = CuboidModel::from_path(path, "geometry.humanoid").unwrap();
    BoundsTable::from_model(&model).unwrap()
}

fn packed_with_alpha(len: usize, alpha: u8) -> Vec<u8> {
    let mut bytes = vec![128u8; len];
    for px in bytes.chunks_exact_mut(4) {
        px[3] = alpha;
    }
    bytes
}

#[test]
fn zero_stored_alpha_is_fully_transparent() {
    let table = fixture_table();
    let bytes = packed_with_alpha(16384, 0);
    assert_eq!(audit_bytes(&bytes, table.standard()).unwrap(), 100);
}

#[test]
fn max_stored_alpha_is_opaque() {
    let table = fixture_table();
    let bytes = packed_with_alpha(16384, 255);
    assert_eq!(audit_bytes(&bytes, table.standard()).unwrap(), 0);
}

#[test]
fn threshold_is_strictly_below_127() {
    let table = fixture_table();
    assert_eq!(
        audit_bytes(&packed_with_alpha(16384, 127), table.standard()).unwrap(),
        0
    );
    assert_eq!(
        audit_bytes(&packed_with_alpha(16384, 126), table.standard()).unwrap(),
        100
    );
}

#[test]
fn counts_cover_every_qualifying_rect() {
    let table = fixture_table();
    let counts = count_transparent(&packed_with_alpha(16384, 0), table.standard()).unwrap();
    let expected: u64 = table.standard().rects().iter().map(UvRect::pixel_count).sum();
    assert_eq!(counts.total, expected);
    assert_eq!(counts.transparent, expected);
}

#[test]
fn legacy_class_skips_rects_below_row_32() {
    let table = fixture_table();
    let counts = count_transparent(&packed_with_alpha(8192, 0), table.standard()).unwrap();
    let expected: u64 = table
        .standard()
        .rects()
        .iter()
        .filter(|r| r.fits(64, 32))
        .map(UvRect::pixel_count)
        .sum();
    assert_eq!(counts.total, expected);
    assert!(counts.total < table.standard().rects().iter().map(UvRect::pixel_count).sum());
}

#[test]
fn overlapping_rects_double_count() {
    let cuboids = [
        Cuboid {
            size: [2.0, 2.0, 2.0],
            uv: [0.0, 0.0],
        },
        Cuboid {
            size: [2.0, 2.0, 2.0],
            uv: [0.0, 0.0],
        },
    ];
    let set = compute_bounds(&cuboids, 1.0).unwrap();
    let mut bytes = packed_with_alpha(16384, 255);
    // pixel (2, 0) sits in the first rect of both cuboids
    bytes[(2 * 4) + 3] = 0;
    let counts = count_transparent(&bytes, &set).unwrap();
    assert_eq!(counts.total, 2 * (8 + 16));
    assert_eq!(counts.transparent, 2);
    assert_eq!(counts.percent(), 4);
}

#[test]
fn empty_bounds_yield_zero() {
    let set = compute_bounds(&[], 1.0).unwrap();
    assert_eq!(audit_bytes(&packed_with_alpha(16384, 0), &set).unwrap(), 0);
}

#[test]
fn unaudited_and_unknown_lengths_fail() {
    let table = fixture_table();
    assert!(matches!(
        audit_bytes(&packed_with_alpha(131072, 0), table.hd()),
        Err(SkinError::Format(_))
    ));
    assert!(matches!(
        audit_bytes(&[0u8; 1000], table.standard()),
        Err(SkinError::Format(_))
    ));
}

#[test]
fn auditor_selects_hd_set_for_128_textures() {
    let auditor = TransparencyAuditor::new(fixture_table().shared());
    let opaque_hd = PixelBuffer::filled(128, 128, [1, 1, 1, 0]).unwrap();
    let packed = encode_texture(&opaque_hd).unwrap();
    // alpha 0 packs to 254, which reads as opaque
    assert_eq!(auditor.audit(&packed).unwrap(), 0);

    let red = PixelBuffer::filled(64, 64, [255, 0, 0, 255]).unwrap();
    let packed = encode_texture(&red).unwrap();
    assert_eq!(auditor.audit(&packed).unwrap(), 100);
    assert_eq!(auditor.audit_bytes(packed.as_bytes()).unwrap(), 100);
}

#[test]
fn rows_past_the_buffer_end_are_not_counted() {
    // side rect (0,63)-(1,64) qualifies for 64x64 but its last row lies past the buffer
    let bounds = compute_bounds(
        &[Cuboid {
            size: [1.0, 2.0, 0.0],
            uv: [0.0, 63.0],
        }],
        1.0,
    )
    .unwrap();
    assert_eq!(
        bounds.rects()[1],
        UvRect {
            min_x: 0,
            min_y: 63,
            max_x: 1,
            max_y: 64
        }
    );

    let opaque = packed_with_alpha(16384, 255);
    assert_eq!(
        count_transparent(&opaque, &bounds).unwrap(),
        TransparencyCounts {
            transparent: 0,
            total: 2
        }
    );

    let clear = packed_with_alpha(16384, 0);
    assert_eq!(
        count_transparent(&clear, &bounds).unwrap(),
        TransparencyCounts {
            transparent: 2,
            total: 2
        }
    );
    assert_eq!(audit_bytes(&clear, &bounds).unwrap(), 100);
}

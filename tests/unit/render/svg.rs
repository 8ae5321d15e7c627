use super::*;

const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#00ff80"/></svg>"##;

#[test]
fn raster_size_follows_transform_scale() {
    let mut cache = SvgCache::default();
    let p = cache.paint(SQUARE, 20.0, 10.0, Affine::IDENTITY).unwrap();
    assert_eq!((p.width, p.height), (20.0, 10.0));
    let p = cache.paint(SQUARE, 20.0, 10.0, Affine::scale(2.0)).unwrap();
    assert_eq!((p.width, p.height), (40.0, 20.0));
    let mapped = p.transform * crate::foundation::core::Point::new(40.0, 20.0);
    assert!((mapped.x - 40.0).abs() < 1e-9 && (mapped.y - 20.0).abs() < 1e-9);
}

#[test]
fn rotation_does_not_change_raster_size() {
    let mut cache = SvgCache::default();
    let p = cache
        .paint(SQUARE, 10.0, 10.0, Affine::rotate(0.7))
        .unwrap();
    assert_eq!((p.width, p.height), (10.0, 10.0));
}

#[test]
fn rasters_and_trees_are_cached() {
    let mut cache = SvgCache::default();
    cache.paint(SQUARE, 10.0, 10.0, Affine::IDENTITY).unwrap();
    cache.paint(SQUARE, 10.0, 10.0, Affine::IDENTITY).unwrap();
    assert_eq!(cache.trees.len(), 1);
    assert_eq!(cache.rasters.len(), 1);
}

#[test]
fn invalid_markup_is_an_error() {
    let mut cache = SvgCache::default();
    assert!(cache.paint("<svg", 10.0, 10.0, Affine::IDENTITY).is_err());
}

use super::*;

#[test]
fn padded_height_wins_on_tall_images() {
    // 24 + ceil(28.8) = 53, well under 30% of 400.
    assert_eq!(compute_band_height(400, 24).unwrap(), 53);
}

#[test]
fn ceiling_clamps_large_fonts() {
    // 30% of 100 is the cap.
    assert_eq!(compute_band_height(100, 24).unwrap(), 30);
}

#[test]
fn band_is_within_bounds_and_monotonic_in_font_size() {
    for h in [4u32, 7, 10, 33, 100, 480, 1080, 4096] {
        let cap = (f64::from(h) * 0.3).floor() as u32;
        let mut prev = 0;
        for f in 1..=300 {
            let v = compute_band_height(h, f).unwrap();
            assert!(v >= 1 && v <= cap, "h={h} f={f} v={v}");
            assert!(v >= prev, "h={h} f={f} not monotonic");
            prev = v;
        }
    }
}

#[test]
fn degenerate_inputs_are_rejected() {
    assert!(matches!(
        compute_band_height(0, 24),
        Err(CaptionError::Validation(_))
    ));
    assert!(matches!(
        compute_band_height(100, 0),
        Err(CaptionError::Validation(_))
    ));
    // floor(3 * 0.3) == 0 leaves no room for a band.
    assert!(matches!(
        compute_band_height(3, 24),
        Err(CaptionError::Validation(_))
    ));
    assert!(BandGeometry::for_image(0, 100, 24).is_err());
}

#[test]
fn geometry_splits_layer_at_band_top() {
    let g = BandGeometry::for_image(64, 100, 24).unwrap();
    assert_eq!(g.band_height, 30);
    assert_eq!(g.band_top_y(), 70);
    assert_eq!(g.stacked_height(1), 100);
    assert_eq!(g.stacked_height(4), 190);
}

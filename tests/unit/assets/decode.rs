use super::*;
use crate::foundation::error::CaptionError;

fn png_of(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    encode_png(&img).unwrap()
}

#[test]
fn decode_keeps_straight_alpha() {
    let bytes = png_of(2, 3, [100, 50, 200, 128]);
    let img = decode_source_image(&bytes, &InputLimits::default()).unwrap();
    assert_eq!(img.dimensions(), (2, 3));
    assert_eq!(img.get_pixel(1, 2).0, [100, 50, 200, 128]);
}

#[test]
fn oversized_dimensions_are_rejected_before_decode() {
    let bytes = png_of(20, 8, [0, 0, 0, 255]);
    let limits = InputLimits {
        max_bytes: 1024 * 1024,
        max_dimension: 16,
    };
    assert!(matches!(
        decode_source_image(&bytes, &limits),
        Err(CaptionError::OversizedInput(_))
    ));
}

#[test]
fn oversized_byte_len_is_rejected() {
    let bytes = png_of(4, 4, [0, 0, 0, 255]);
    let limits = InputLimits {
        max_bytes: 8,
        max_dimension: 4096,
    };
    assert!(matches!(
        decode_source_image(&bytes, &limits),
        Err(CaptionError::OversizedInput(_))
    ));
}

#[test]
fn garbage_bytes_fail_to_decode() {
    let err = decode_source_image(b"not an image", &InputLimits::default()).unwrap_err();
    assert!(matches!(err, CaptionError::Other(_)));
}

#[test]
fn load_from_file_round_trips() {
    let dir = std::path::PathBuf::from("target").join("captionstack_decode");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("src.png");
    std::fs::write(&path, png_of(3, 3, [9, 8, 7, 255])).unwrap();

    let img = load_source_image(&path, &InputLimits::default()).unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [9, 8, 7, 255]);
    assert!(load_source_image(&dir.join("missing.png"), &InputLimits::default()).is_err());
}

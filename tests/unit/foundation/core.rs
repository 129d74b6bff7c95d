use super::*;

#[test]
fn default_style_is_valid() {
    StyleConfig::default().validate().unwrap();
}

#[test]
fn style_json_fills_missing_fields_from_defaults() {
    let style = StyleConfig::from_json_str(
        r##"{ "font_size_px": 40, "bg_color": "#336699", "bg_opacity": 0.8 }"##,
    )
    .unwrap();
    assert_eq!(style.font_size_px, 40);
    assert_eq!(style.bg_color, Rgb8::new(0x33, 0x66, 0x99));
    assert_eq!(style.font_family, "sans-serif");
    assert_eq!(style.text_color, Rgb8::new(255, 255, 255));
}

#[test]
fn style_json_rejects_bad_values() {
    assert!(StyleConfig::from_json_str(r#"{ "bg_opacity": 1.5 }"#).is_err());
    assert!(StyleConfig::from_json_str(r#"{ "font_size_px": 0 }"#).is_err());
    assert!(StyleConfig::from_json_str(r##"{ "text_color": "#12" }"##).is_err());
    assert!(StyleConfig::from_json_str(r##"{ "colour": "#123456" }"##).is_err());
}

#[test]
fn style_round_trips_through_json() {
    let style = StyleConfig {
        font_size_px: 18,
        font_family: "Noto Sans".to_owned(),
        text_color: Rgb8::new(250, 240, 10),
        bg_color: Rgb8::new(0, 0, 0),
        bg_opacity: 0.25,
    };
    let json = serde_json::to_string(&style).unwrap();
    assert_eq!(StyleConfig::from_json_str(&json).unwrap(), style);
}

#[test]
fn limits_reject_oversized_sources() {
    let limits = InputLimits::default();
    limits.check_byte_len(10 * 1024 * 1024).unwrap();
    assert!(matches!(
        limits.check_byte_len(10 * 1024 * 1024 + 1),
        Err(CaptionError::OversizedInput(_))
    ));
    limits.check_dimensions(4096, 4096).unwrap();
    assert!(matches!(
        limits.check_dimensions(4097, 10),
        Err(CaptionError::OversizedInput(_))
    ));
    assert!(matches!(
        limits.check_dimensions(10, 5000),
        Err(CaptionError::OversizedInput(_))
    ));
}

#[test]
fn caption_text_is_split_trimmed_and_filtered() {
    let lines = caption_lines_from_text("  first \n\n   \nsecond\r\n third  \n");
    assert_eq!(lines, vec!["first", "second", "third"]);
    assert!(caption_lines_from_text(" \n \n").is_empty());
}

#[test]
fn output_name_embeds_timestamp() {
    assert_eq!(default_output_name(1700), "caption_puzzle_1700.png");
}

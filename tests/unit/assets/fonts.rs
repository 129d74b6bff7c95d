use super::*;

fn system_library() -> Option<FontLibrary> {
    let mut lib = FontLibrary::new();
    lib.load_system_fonts();
    if lib.is_empty() { None } else { Some(lib) }
}

#[test]
fn family_list_is_split_and_unquoted() {
    assert_eq!(
        parse_family_list(" \"Noto Sans\" , 'DejaVu Sans',sans-serif,, "),
        vec!["Noto Sans", "DejaVu Sans", "sans-serif"]
    );
    assert!(parse_family_list("").is_empty());
}

#[test]
fn generic_names_map_to_generic_families() {
    assert!(matches!(css_family("Sans-Serif"), fontdb::Family::SansSerif));
    assert!(matches!(css_family("monospace"), fontdb::Family::Monospace));
    assert!(matches!(css_family("serif"), fontdb::Family::Serif));
    assert!(matches!(css_family("Noto Sans"), fontdb::Family::Name("Noto Sans")));
}

#[test]
fn empty_library_cannot_resolve() {
    let lib = FontLibrary::new();
    assert!(matches!(
        lib.resolve("sans-serif"),
        Err(CaptionError::RenderFailure(_))
    ));
}

#[test]
fn garbage_bytes_are_not_a_font() {
    let mut lib = FontLibrary::new();
    assert!(lib.add_font_bytes(b"definitely not a font".to_vec()).is_err());
    assert!(lib.is_empty());
}

#[test]
fn missing_dir_loads_nothing() {
    let mut lib = FontLibrary::new();
    assert_eq!(lib.load_dir(Path::new("target/no-such-font-dir")), 0);
    assert!(lib.add_font_file(Path::new("target/no-such-font.ttf")).is_err());
}

#[test]
fn resolve_matches_case_insensitively() {
    let Some(lib) = system_library() else {
        return;
    };
    let Some(family) = lib.family_names().pop() else {
        return;
    };
    let wanted = format!("NoSuchFamily, {}", family.to_ascii_uppercase());
    let resolved = lib.resolve(&wanted).unwrap();
    assert_eq!(resolved.family, family);
}

#[test]
fn unknown_family_falls_back_to_sans_serif() {
    let Some(lib) = system_library() else {
        return;
    };
    let fallback = lib.resolve("NoSuchFamily").unwrap();
    let sans = lib.resolve("sans-serif").unwrap();
    assert_eq!(fallback.id, sans.id);
}

#[test]
fn sans_serif_prefers_a_known_sans_family() {
    let Some(lib) = system_library() else {
        return;
    };
    let Some(expected) = lib.first_installed(SANS_SERIF_FAMILIES) else {
        return;
    };
    assert_eq!(lib.resolve("sans-serif").unwrap().family, expected);
}

#[test]
fn resolve_picks_the_regular_face_of_a_family() {
    let Some(lib) = system_library() else {
        return;
    };
    // A family installed with both a regular face and at least one other weight.
    let faces: Vec<FontFace> = lib
        .face_ids()
        .into_iter()
        .filter_map(|id| lib.load_face(id).ok())
        .collect();
    let Some(family) = lib.family_names().into_iter().find(|name| {
        let of_family: Vec<&FontFace> = faces.iter().filter(|f| &f.family == name).collect();
        of_family.iter().any(|f| f.weight == 400 && !f.italic)
            && of_family.iter().any(|f| f.weight != 400)
    }) else {
        return;
    };

    let face = lib.resolve(&family).unwrap();
    assert_eq!(face.family, family);
    assert_eq!(face.weight, 400);
    assert!(!face.italic);
}

#[test]
fn collection_faces_keep_their_index() {
    let Some(lib) = system_library() else {
        return;
    };
    let Some(face) = lib
        .face_ids()
        .into_iter()
        .filter_map(|id| lib.load_face(id).ok())
        .find(|f| f.index > 0)
    else {
        return;
    };
    let again = lib.load_face(face.id).unwrap();
    assert_eq!(again.index, face.index);
    assert!(again.index > 0);
}

#[test]
fn engine_lays_out_one_line() {
    let Some(lib) = system_library() else {
        return;
    };
    let face = lib.resolve("sans-serif").unwrap();
    let mut engine = TextLayoutEngine::new();
    let brush = TextBrushRgba8 {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
    let layout = engine
        .layout_line("caption stack", &face, 24.0, brush)
        .unwrap();
    assert_eq!(layout.lines().count(), 1);
    assert!(layout.width() > 0.0);
    assert_eq!(engine.registered.len(), 1);

    engine.layout_line("again", &face, 24.0, brush).unwrap();
    assert_eq!(engine.registered.len(), 1);

    assert!(engine.layout_line("x", &face, 0.0, brush).is_err());
}

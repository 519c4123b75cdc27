use super::*;

#[test]
fn builtin_always_resolves() {
    let r = FontResolver::with_dirs(Vec::new());
    assert!(matches!(
        r.resolve(&FontSpec::Builtin).unwrap(),
        ResolvedFont::Builtin
    ));
}

#[test]
fn missing_path_is_fatal_config_error() {
    let r = FontResolver::with_dirs(Vec::new());
    let err = r
        .resolve(&FontSpec::Path("/no/such/font.ttf".into()))
        .unwrap_err();
    assert!(matches!(err, ReelError::Config(_)));
    assert!(err.is_fatal());
}

#[test]
fn auto_without_candidates_names_probe_list() {
    let r = FontResolver::with_dirs(vec![PathBuf::from("/no/such/font/dir")]);
    let err = r.resolve(&FontSpec::Auto).unwrap_err();
    assert!(err.to_string().contains("DejaVuSans.ttf"));
}

#[test]
fn probe_finds_nested_candidate() {
    let root = std::env::temp_dir().join(format!("sketchreel_fonts_{}", std::process::id()));
    let nested = root.join("truetype").join("dejavu");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(nested.join("DejaVuSans.ttf"), vec![0u8; 64]).unwrap();

    let r = FontResolver::with_dirs(vec![root.clone()]);
    let ResolvedFont::Outline(font) = r.resolve(&FontSpec::Auto).unwrap() else {
        panic!("expected outline font");
    };
    assert!(font.origin.ends_with("DejaVuSans.ttf"));
    assert_eq!(font.bytes.len(), 64);

    let _ = std::fs::remove_dir_all(&root);
}

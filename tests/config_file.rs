use std::path::Path;

use doku::RenderConfig;

#[test]
fn shipped_config_matches_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("doku.toml");
    let config = RenderConfig::load(&path).expect("doku.toml should parse");
    assert_eq!(config, RenderConfig::default());
}

#[test]
fn missing_file_reports_path() {
    let err = RenderConfig::load(Path::new("does/not/exist.toml")).unwrap_err();
    assert!(err.contains("does/not/exist.toml"), "{}", err);
}

use std::path::PathBuf;

use jobsite_kiosk::{BackendKind, KioskConfig, KioskError};

#[test]
fn test_defaults() {
    let config = KioskConfig::default();
    assert_eq!(config.backend, BackendKind::Hosted);
    assert_eq!(config.drawer_width_ratio, 0.75);
    assert!(config.database_path().ends_with("jobsite-kiosk/kiosk.db"));
    assert_eq!(config.drawer_width(400.0), 300.0);
}

#[test]
fn test_load_toml_file() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
backend = "local"
database = "/tmp/kiosk-test.db"
drawer_width_ratio = 0.5

[hosted]
url = "https://example.supabase.co"
"#,
    )?;

    let config = KioskConfig::from_file(&path)?;
    assert_eq!(config.backend, BackendKind::Local);
    assert_eq!(config.database_path(), PathBuf::from("/tmp/kiosk-test.db"));
    assert_eq!(config.drawer_width(400.0), 200.0);
    assert_eq!(config.hosted.url.as_deref(), Some("https://example.supabase.co"));
    assert_eq!(config.hosted.anon_key, None);
    Ok(())
}

#[test]
fn test_explicit_missing_file_fails() {
    assert!(KioskConfig::load(Some(std::path::Path::new("/nonexistent/kiosk.toml"))).is_err());
}

#[test]
fn test_env_overrides() {
    let mut config = KioskConfig::default();
    config.apply_env(|key| match key {
        "KIOSK_URL" => Some("https://env.example".to_string()),
        "KIOSK_ANON_KEY" => Some("anon".to_string()),
        "KIOSK_DB" => Some("/data/kiosk.db".to_string()),
        _ => None,
    });
    assert_eq!(
        config.hosted_endpoint().unwrap(),
        ("https://env.example", "anon")
    );
    assert_eq!(config.database_path(), PathBuf::from("/data/kiosk.db"));
}

#[test]
fn test_hosted_requires_url_and_key() {
    let mut config = KioskConfig::default();
    assert!(matches!(
        config.hosted_endpoint(),
        Err(KioskError::Config { .. })
    ));

    config.hosted.url = Some("https://example.supabase.co".to_string());
    config.hosted.anon_key = Some("  ".to_string());
    assert!(matches!(
        config.hosted_endpoint(),
        Err(KioskError::Config { .. })
    ));
}

#[test]
fn test_bad_ratio_falls_back() {
    let config = KioskConfig {
        drawer_width_ratio: 3.0,
        ..KioskConfig::default()
    };
    assert_eq!(config.drawer_width(400.0), 300.0);
}

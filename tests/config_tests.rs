// Config loading, validation and persistence tests

use speedometer::config::AppConfig;
use speedometer::models::SpeedUnit;

const VALID_CONFIG: &str = r#"
autostart = false

[sampler]
update_interval_ms = 1000
fallback_interval_ms = 1000
stop_timeout_ms = 100

[display]
refresh_interval_ms = 50
unit = "Mbps"
decimal_places = 2
show_download = true
show_upload = true
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.sampler.update_interval_ms, 1000);
    assert_eq!(config.sampler.fallback_interval_ms, 1000);
    assert_eq!(config.sampler.stop_timeout_ms, 100);
    assert_eq!(config.display.refresh_interval_ms, 50);
    assert_eq!(config.display.unit, SpeedUnit::Mbps);
    assert_eq!(config.display.decimal_places, 2);
    assert!(!config.autostart);
}

#[test]
fn test_config_empty_uses_defaults() {
    let config = AppConfig::load_from_str("").expect("empty config");
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.sampler.update_interval_ms, 1000);
    assert_eq!(config.sampler.fallback_interval_ms, 1000);
    assert_eq!(config.sampler.stop_timeout_ms, 100);
    assert_eq!(config.display.refresh_interval_ms, 50);
    assert_eq!(config.display.unit, SpeedUnit::MBps);
    assert_eq!(config.display.decimal_places, 1);
    assert!(config.display.show_download && config.display.show_upload);
}

#[test]
fn test_config_partial_section_fills_defaults() {
    let config = AppConfig::load_from_str("[sampler]\nupdate_interval_ms = 10\n").unwrap();
    assert_eq!(config.sampler.update_interval_ms, 10);
    assert_eq!(config.sampler.fallback_interval_ms, 1000);
}

#[test]
fn test_config_validation_rejects_zero_update_interval() {
    let bad = VALID_CONFIG.replace("update_interval_ms = 1000", "update_interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("sampler.update_interval_ms"));
}

#[test]
fn test_config_validation_rejects_huge_update_interval() {
    let bad = VALID_CONFIG.replace("update_interval_ms = 1000", "update_interval_ms = 600000");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("sampler.update_interval_ms"));
}

#[test]
fn test_config_validation_rejects_zero_fallback_interval() {
    let bad = VALID_CONFIG.replace("fallback_interval_ms = 1000", "fallback_interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("fallback_interval_ms"));
}

#[test]
fn test_config_validation_rejects_zero_stop_timeout() {
    let bad = VALID_CONFIG.replace("stop_timeout_ms = 100", "stop_timeout_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("stop_timeout_ms"));
}

#[test]
fn test_config_validation_rejects_zero_refresh_interval() {
    let bad = VALID_CONFIG.replace("refresh_interval_ms = 50", "refresh_interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("display.refresh_interval_ms"));
}

#[test]
fn test_config_validation_rejects_too_many_decimals() {
    let bad = VALID_CONFIG.replace("decimal_places = 2", "decimal_places = 9");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("decimal_places"));
}

#[test]
fn test_config_validation_rejects_both_directions_hidden() {
    let bad = VALID_CONFIG
        .replace("show_download = true", "show_download = false")
        .replace("show_upload = true", "show_upload = false");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("show_download"));
}

#[test]
fn test_config_rejects_unknown_unit() {
    let bad = VALID_CONFIG.replace("unit = \"Mbps\"", "unit = \"furlongs\"");
    assert!(AppConfig::load_from_str(&bad).is_err());
}

#[test]
fn test_config_missing_file_yields_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = AppConfig::load_from_path(dir.path().join("nope.toml")).unwrap();
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_config_save_then_load() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("speedometer.toml");
    let mut config = AppConfig::load_from_str(VALID_CONFIG).unwrap();
    config.sampler.update_interval_ms = 40;
    config.display.unit = SpeedUnit::MBps;
    config.autostart = true;

    config.save(&path).unwrap();
    let loaded = AppConfig::load_from_path(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_load_or_create_writes_defaults_on_first_run() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config").join("speedometer.toml");

    let config = AppConfig::load_or_create(&path).unwrap();
    assert_eq!(config, AppConfig::default());
    assert!(path.exists());
    assert_eq!(AppConfig::load_from_path(&path).unwrap(), AppConfig::default());
}

#[test]
fn test_config_load_or_create_keeps_existing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("speedometer.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();

    let config = AppConfig::load_or_create(&path).unwrap();
    assert_eq!(config, AppConfig::load_from_str(VALID_CONFIG).unwrap());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), VALID_CONFIG);
}

#[test]
fn test_config_save_refuses_invalid() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("speedometer.toml");
    let mut config = AppConfig::default();
    config.sampler.update_interval_ms = 0;
    assert!(config.save(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn test_sampler_config_mapping() {
    let config = AppConfig::load_from_str(VALID_CONFIG).unwrap();
    let sc = config.sampler.sampler_config();
    assert_eq!(sc.update_interval_ms, 1000);
    assert_eq!(sc.fallback_interval_ms, 1000);
    assert_eq!(sc.stop_timeout_ms, 100);
    assert_eq!(config.display.settings().decimal_places, 2);
}

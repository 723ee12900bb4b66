use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

use git_semv::config::load_config;

#[test]
fn test_load_config_from_custom_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(
        &path,
        r#"
        [tags]
        prefix = "release-"

        [remote]
        push = false
        "#,
    )
    .unwrap();

    let config = load_config(Some(path.to_str().unwrap())).unwrap();
    assert_eq!(config.tags.prefix, "release-");
    assert!(!config.remote.push);
    // untouched sections keep their defaults
    assert_eq!(config.auto.minor_threshold_pct, 20.0);
}

#[test]
fn test_load_config_rejects_invalid_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "tags = not toml").unwrap();

    assert!(load_config(Some(path.to_str().unwrap())).is_err());
}

#[test]
#[serial]
fn test_load_config_from_working_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("gitsemv.toml"),
        r#"
        [auto]
        minor_threshold_pct = 50.0
        "#,
    )
    .unwrap();

    let original_dir = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();

    let config = load_config(None).unwrap();

    env::set_current_dir(original_dir).unwrap();

    assert_eq!(config.auto.minor_threshold_pct, 50.0);
    assert_eq!(config.tags.prefix, "v");
}

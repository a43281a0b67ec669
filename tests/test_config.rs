use std::path::PathBuf;

use effect_arcade::config::ArcadeConfig;
use effect_arcade::ArcadeError;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("effect_arcade_{}_{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn defaults_are_valid() {
    let config = ArcadeConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.effects.session_ms, 2_000);
    assert_eq!(config.snake.tiles, 20);
    assert_eq!(config.snake.tick_ms, 100);
    assert_eq!(config.snake.food_points, 10);
    assert_eq!(config.snake.special_points, 50);
    assert!(!config.effects.purge_on_restart);
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let config: ArcadeConfig = toml::from_str(
        r#"
        [snake]
        tiles = 24

        [effects]
        purge_on_restart = true
        "#,
    )
    .unwrap();
    assert_eq!(config.snake.tiles, 24);
    assert_eq!(config.snake.tick_ms, 100);
    assert!(config.effects.purge_on_restart);
    assert_eq!(config.effects.session_ms, 2_000);
    assert_eq!(config.dodge, ArcadeConfig::default().dodge);
}

#[test]
fn empty_toml_is_the_default() {
    let config: ArcadeConfig = toml::from_str("").unwrap();
    assert_eq!(config, ArcadeConfig::default());
}

#[test]
fn load_reads_a_file() {
    let path = scratch_file("load.toml", "[effects]\nsession_ms = 1500\n");
    let config = ArcadeConfig::load(&path).unwrap();
    assert_eq!(config.effects.session_ms, 1_500);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn missing_file_is_a_read_error() {
    let path = std::env::temp_dir().join("effect_arcade_does_not_exist.toml");
    let err = ArcadeConfig::load(&path).unwrap_err();
    assert!(matches!(err, ArcadeError::ConfigRead { .. }));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let path = scratch_file("bad.toml", "[snake\ntiles = \"many\"\n");
    let err = ArcadeConfig::load(&path).unwrap_err();
    assert!(matches!(err, ArcadeError::ConfigParse { .. }));
    std::fs::remove_file(path).unwrap();
}

#[test]
fn load_rejects_invalid_values() {
    let path = scratch_file("zero.toml", "[snake]\ntick_ms = 0\n");
    let err = ArcadeConfig::load(&path).unwrap_err();
    assert!(matches!(err, ArcadeError::InvalidConfig(_)));
    std::fs::remove_file(path).unwrap();
}

#[test]
fn small_snake_boards_are_accepted() {
    let mut config = ArcadeConfig::default();
    config.snake.tiles = 2;
    assert!(config.validate().is_ok());
    config.snake.tiles = 8;
    assert!(config.validate().is_ok());
}

#[test]
fn validate_catches_each_bad_value() {
    let mut config = ArcadeConfig::default();
    config.snake.tiles = 0;
    assert!(config.validate().is_err());

    let mut config = ArcadeConfig::default();
    config.snake.tiles = 1;
    assert!(config.validate().is_err());

    let mut config = ArcadeConfig::default();
    config.snake.special_chance = 1.5;
    assert!(config.validate().is_err());

    let mut config = ArcadeConfig::default();
    config.effects.viewport_height = 0.0;
    assert!(config.validate().is_err());

    let mut config = ArcadeConfig::default();
    config.dodge.height = 150.0;
    assert!(config.validate().is_err());

    let mut config = ArcadeConfig::default();
    config.dodge.tick_ms = 0;
    assert!(config.validate().is_err());
}

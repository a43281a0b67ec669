/// Tunables for both games, loadable from a TOML file.
///
/// ```toml
/// [effects]
/// session_ms = 2000
///
/// [snake]
/// tiles = 24
/// ```
///
/// Missing keys fall back to the built-in defaults.

use std::path::Path;

use serde::Deserialize;

use crate::controller::SESSION_MS;
use crate::effects::Viewport;
use crate::error::{ArcadeError, Result};

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub effects: EffectConfig,
    pub dodge: DodgeConfig,
    pub snake: SnakeConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// How long a triggered effect pauses play.
    pub session_ms: u64,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Throw away lingering particles when a game restarts.
    pub purge_on_restart: bool,
}

impl Default for EffectConfig {
    fn default() -> Self {
        EffectConfig {
            session_ms: SESSION_MS,
            viewport_width: 800.0,
            viewport_height: 600.0,
            purge_on_restart: false,
        }
    }
}

impl EffectConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.viewport_width,
            height: self.viewport_height,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DodgeConfig {
    pub width: f32,
    pub height: f32,
    pub tick_ms: u64,
    pub player_x: f32,
    pub player_y: f32,
    pub player_size: f32,
    pub player_speed: f32,
    pub obstacle_count: usize,
    pub obstacle_size: f32,
    /// Delay before a touched obstacle is replaced.
    pub respawn_ms: u64,
}

impl Default for DodgeConfig {
    fn default() -> Self {
        DodgeConfig {
            width: 800.0,
            height: 600.0,
            tick_ms: 1000 / 60,
            player_x: 400.0,
            player_y: 500.0,
            player_size: 40.0,
            player_speed: 5.0,
            obstacle_count: 8,
            obstacle_size: 50.0,
            respawn_ms: 2_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    /// Grid is `tiles × tiles`.
    pub tiles: i32,
    pub tick_ms: u64,
    pub food_points: u32,
    pub special_points: u32,
    /// Chance of a special food appearing after a normal pickup.
    pub special_chance: f64,
    /// Ticks a special food stays on the board.
    pub special_ticks: u32,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        SnakeConfig {
            tiles: 20,
            tick_ms: 100,
            food_points: 10,
            special_points: 50,
            special_chance: 0.3,
            special_ticks: 150,
        }
    }
}

impl ArcadeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ArcadeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ArcadeConfig =
            toml::from_str(&text).map_err(|source| ArcadeError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(ArcadeError::InvalidConfig(msg.to_string()));
        if self.dodge.tick_ms == 0 || self.snake.tick_ms == 0 {
            return invalid("tick_ms must be positive");
        }
        if self.snake.tiles < 2 {
            return invalid("snake.tiles must be at least 2");
        }
        if self.effects.viewport_width <= 0.0 || self.effects.viewport_height <= 0.0 {
            return invalid("effect viewport must be positive");
        }
        if self.dodge.width <= self.dodge.obstacle_size
            || self.dodge.height <= crate::dodge::SAFE_BAND_PX
        {
            return invalid("dodge canvas too small for its obstacles");
        }
        if !(0.0..=1.0).contains(&self.snake.special_chance) {
            return invalid("snake.special_chance must be within 0..=1");
        }
        Ok(())
    }
}

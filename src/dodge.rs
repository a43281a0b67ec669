/// Obstacle-dodging game.
///
/// The player square moves while arrow keys are held; every obstacle is a
/// special entity, and touching one sets off its effect. The touched obstacle
/// is removed at once and replaced [`DodgeConfig::respawn_ms`] later.
///
/// The helpers at the top are pure: they take the current values and return
/// new ones. `DodgeGame` owns the timeline and wires them together.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::{ArcadeConfig, DodgeConfig};
use crate::controller::EffectController;
use crate::effects::{EffectEvent, EffectTimer, GameVariant};
use crate::entities::{draw_entity, HeldKeys, Obstacle, Player, Rect};
use crate::timeline::{Timeline, TimerId};

/// Rows at the bottom of the canvas kept clear of new obstacles.
pub const SAFE_BAND_PX: f32 = 200.0;

// ── Pure helpers ──────────────────────────────────────────────────────────────

/// Strict overlap: touching edges do not count.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Move one step per held key. A key only moves the player while it is not
/// already against that edge.
pub fn move_player(player: &Player, keys: HeldKeys, width: f32, height: f32) -> Player {
    let mut rect = player.rect;
    let speed = player.speed;
    if keys.left && rect.x > 0.0 {
        rect.x -= speed;
    }
    if keys.right && rect.x < width - rect.width {
        rect.x += speed;
    }
    if keys.up && rect.y > 0.0 {
        rect.y -= speed;
    }
    if keys.down && rect.y < height - rect.height {
        rect.y += speed;
    }
    Player { rect, ..player.clone() }
}

/// A random catalog entry at a random spot above the safe band.
pub fn random_obstacle(config: &DodgeConfig, rng: &mut impl Rng) -> Obstacle {
    let size = config.obstacle_size;
    let max_x = (config.width - size).max(1.0);
    let max_y = (config.height - SAFE_BAND_PX).max(1.0);
    Obstacle {
        rect: Rect {
            x: rng.gen_range(0.0..max_x),
            y: rng.gen_range(0.0..max_y),
            width: size,
            height: size,
        },
        entity: draw_entity(rng),
    }
}

/// Index of the first obstacle the player is touching.
pub fn first_contact(player: &Player, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles.iter().position(|o| overlaps(&player.rect, &o.rect))
}

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct DodgeState {
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub width: f32,
    pub height: f32,
    pub paused: bool,
    /// Ticks that actually advanced the simulation.
    pub frame: u64,
}

/// Build the starting state: player in place, a full set of obstacles.
pub fn init_state(config: &DodgeConfig, rng: &mut impl Rng) -> DodgeState {
    DodgeState {
        player: Player {
            rect: Rect {
                x: config.player_x,
                y: config.player_y,
                width: config.player_size,
                height: config.player_size,
            },
            speed: config.player_speed,
        },
        obstacles: (0..config.obstacle_count)
            .map(|_| random_obstacle(config, rng))
            .collect(),
        width: config.width,
        height: config.height,
        paused: false,
        frame: 0,
    }
}

// ── Game driver ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum DodgeTimer {
    Tick,
    Respawn,
    Effect(EffectEvent),
}

impl From<EffectEvent> for DodgeTimer {
    fn from(event: EffectEvent) -> Self {
        DodgeTimer::Effect(event)
    }
}

impl EffectTimer for DodgeTimer {
    fn as_effect(&self) -> Option<&EffectEvent> {
        match self {
            DodgeTimer::Effect(event) => Some(event),
            _ => None,
        }
    }
}

pub struct DodgeGame {
    pub state: DodgeState,
    pub effects: EffectController,
    config: DodgeConfig,
    timers: Timeline<DodgeTimer>,
    loop_timer: Option<TimerId>,
    keys: HeldKeys,
}

impl DodgeGame {
    /// Set up the board and start the tick interval at time `now`.
    pub fn new(config: &ArcadeConfig, now: u64, rng: &mut impl Rng) -> Self {
        let mut timers = Timeline::new();
        let loop_timer = timers.every(now, config.dodge.tick_ms, DodgeTimer::Tick);
        info!(obstacles = config.dodge.obstacle_count, "dodge game started");
        DodgeGame {
            state: init_state(&config.dodge, rng),
            effects: EffectController::new(
                GameVariant::Dodge,
                config.effects.viewport(),
                config.effects.session_ms,
            ),
            config: config.dodge.clone(),
            timers,
            loop_timer: Some(loop_timer),
            keys: HeldKeys::default(),
        }
    }

    /// Keys held from now on.
    pub fn set_keys(&mut self, keys: HeldKeys) {
        self.keys = keys;
    }

    /// Run every timer due up to `now`, in order.
    pub fn advance(&mut self, now: u64, rng: &mut impl Rng) {
        while let Some((at, timer)) = self.timers.pop_due(now) {
            match timer {
                DodgeTimer::Tick => self.tick(at, rng),
                DodgeTimer::Respawn => {
                    self.state.obstacles.push(random_obstacle(&self.config, rng));
                    debug!(at, "obstacle replaced");
                }
                DodgeTimer::Effect(event) => {
                    self.effects
                        .handle(event, at, &mut self.state.paused, &mut self.timers)
                }
            }
        }
    }

    fn tick(&mut self, at: u64, rng: &mut impl Rng) {
        if self.state.paused {
            return;
        }
        self.state.frame += 1;
        self.state.player =
            move_player(&self.state.player, self.keys, self.state.width, self.state.height);

        if let Some(index) = first_contact(&self.state.player, &self.state.obstacles) {
            let obstacle = self.state.obstacles.remove(index);
            if let Err(err) = self.effects.trigger(
                obstacle.entity,
                at,
                &mut self.state.paused,
                rng,
                &mut self.timers,
            ) {
                warn!(%err, "contact ignored");
            }
            self.timers.after(at, self.config.respawn_ms, DodgeTimer::Respawn);
        }
    }

    /// Stop the tick interval. Effect and respawn timers keep running.
    pub fn stop(&mut self) {
        if let Some(id) = self.loop_timer.take() {
            self.timers.cancel(id);
            info!("dodge game stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.loop_timer.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }
}

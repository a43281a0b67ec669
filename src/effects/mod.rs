/// Effect catalog: one spawner per [`EffectKind`].
///
/// | effect      | batch                          | stagger | lifetime        |
/// |-------------|--------------------------------|---------|-----------------|
/// | lightning   | 5 bolts                        | 200 ms  | 300 ms          |
/// | storm       | 50 rain + 2 s wind oscillation | 50 ms   | 2000 ms         |
/// | celebration | 30 confetti (+10 balloons)     | 100 ms  | 3000 / 5000 ms  |
/// | trash       | 40 items (+1 dust cloud)       | 100 ms  | 2000 ms         |
///
/// Balloons and the dust cloud only appear in the dodge game.
///
/// Spawning only schedules [`EffectEvent::Spawn`] entries; the removal of a
/// particle is scheduled when it appears and is never cancelled by the end of
/// the session that created it.

use rand::Rng;
use tracing::debug;

use crate::entities::EffectKind;
use crate::timeline::{Timeline, TimerId};

pub mod overlay;
pub mod particles;

use particles::{Particle, ParticleId, ParticleKind};

pub const BOLT_COUNT: usize = 5;
pub const BOLT_STAGGER_MS: u64 = 200;
pub const BOLT_LIFETIME_MS: u64 = 300;

pub const RAIN_COUNT: usize = 50;
pub const RAIN_STAGGER_MS: u64 = 50;
pub const RAIN_LIFETIME_MS: u64 = 2_000;
pub const WIND_PERIOD_MS: u64 = 100;
pub const WIND_DURATION_MS: u64 = 2_000;
pub const WIND_AMPLITUDE_PX: i32 = 10;

pub const CONFETTI_COUNT: usize = 30;
pub const CONFETTI_STAGGER_MS: u64 = 100;
pub const CONFETTI_LIFETIME_MS: u64 = 3_000;
pub const BALLOON_COUNT: usize = 10;
pub const BALLOON_LIFETIME_MS: u64 = 5_000;

pub const TRASH_COUNT: usize = 40;
pub const TRASH_STAGGER_MS: u64 = 100;
pub const TRASH_LIFETIME_MS: u64 = 2_000;
pub const DUST_LIFETIME_MS: u64 = 2_000;

/// Timed work belonging to the effect subsystem.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectEvent {
    /// Put a particle on the overlay and schedule its removal.
    Spawn(Particle),
    Despawn(ParticleId),
    /// Periodic: push the viewport sideways and flip direction.
    WindGust,
    /// Stop the given gust timer and recentre the viewport.
    WindCalm(TimerId),
    /// Periodic: reveal the next message character.
    TypeNext,
    /// Make the reveal word visible.
    RevealWord,
    /// The effect window is over.
    EndSession,
}

/// Implemented by a game's timer enum so the effect subsystem can share the
/// game's timeline.
pub trait EffectTimer: From<EffectEvent> + Clone {
    fn as_effect(&self) -> Option<&EffectEvent>;
}

impl EffectTimer for EffectEvent {
    fn as_effect(&self) -> Option<&EffectEvent> {
        Some(self)
    }
}

/// Which game is hosting the effect. The dodge game gets the extra balloons
/// and dust cloud.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameVariant {
    Dodge,
    Snake,
}

/// Size of the overlay in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Hands out overlay-unique particle ids.
#[derive(Debug, Default)]
pub struct ParticleIds(ParticleId);

impl ParticleIds {
    pub fn next(&mut self) -> ParticleId {
        let id = self.0;
        self.0 += 1;
        id
    }
}

/// Everything a spawner needs besides the RNG and the timeline.
pub struct SpawnContext<'a> {
    pub now: u64,
    pub variant: GameVariant,
    pub viewport: Viewport,
    pub ids: &'a mut ParticleIds,
}

impl SpawnContext<'_> {
    fn schedule<E: EffectTimer>(
        &mut self,
        timers: &mut Timeline<E>,
        delay_ms: u64,
        lifetime_ms: u64,
        x: f32,
        kind: ParticleKind,
    ) {
        let particle = Particle {
            id: self.ids.next(),
            kind,
            x,
            born_at: self.now + delay_ms,
            lifetime_ms,
        };
        timers.after(self.now, delay_ms, EffectEvent::Spawn(particle).into());
    }

    fn random_x(&self, rng: &mut impl Rng) -> f32 {
        rng.gen_range(0.0..self.viewport.width.max(1.0))
    }
}

impl EffectKind {
    /// Schedule this effect's particle batch (and wind, for storms).
    pub fn spawn<E: EffectTimer>(
        self,
        ctx: &mut SpawnContext<'_>,
        rng: &mut impl Rng,
        timers: &mut Timeline<E>,
    ) {
        match self {
            EffectKind::Lightning => spawn_lightning(ctx, rng, timers),
            EffectKind::Storm => spawn_storm(ctx, rng, timers),
            EffectKind::Celebration => spawn_celebration(ctx, rng, timers),
            EffectKind::Trash => spawn_trash(ctx, rng, timers),
        }
        debug!(effect = %self, variant = ?ctx.variant, "particle batch scheduled");
    }
}

fn spawn_lightning<E: EffectTimer>(
    ctx: &mut SpawnContext<'_>,
    rng: &mut impl Rng,
    timers: &mut Timeline<E>,
) {
    for i in 0..BOLT_COUNT as u64 {
        let x = ctx.random_x(rng);
        let kind = particles::bolt(rng);
        ctx.schedule(timers, i * BOLT_STAGGER_MS, BOLT_LIFETIME_MS, x, kind);
    }
}

fn spawn_storm<E: EffectTimer>(
    ctx: &mut SpawnContext<'_>,
    rng: &mut impl Rng,
    timers: &mut Timeline<E>,
) {
    for i in 0..RAIN_COUNT as u64 {
        let x = ctx.random_x(rng);
        let kind = particles::rain(rng);
        ctx.schedule(timers, i * RAIN_STAGGER_MS, RAIN_LIFETIME_MS, x, kind);
    }
    let gust = timers.every(ctx.now, WIND_PERIOD_MS, EffectEvent::WindGust.into());
    timers.after(ctx.now, WIND_DURATION_MS, EffectEvent::WindCalm(gust).into());
}

fn spawn_celebration<E: EffectTimer>(
    ctx: &mut SpawnContext<'_>,
    rng: &mut impl Rng,
    timers: &mut Timeline<E>,
) {
    for i in 0..CONFETTI_COUNT as u64 {
        let x = ctx.random_x(rng);
        let kind = particles::confetti(rng);
        ctx.schedule(timers, i * CONFETTI_STAGGER_MS, CONFETTI_LIFETIME_MS, x, kind);
    }
    if ctx.variant == GameVariant::Dodge {
        for _ in 0..BALLOON_COUNT {
            let x = ctx.random_x(rng);
            let kind = particles::balloon(rng);
            ctx.schedule(timers, 0, BALLOON_LIFETIME_MS, x, kind);
        }
    }
}

fn spawn_trash<E: EffectTimer>(
    ctx: &mut SpawnContext<'_>,
    rng: &mut impl Rng,
    timers: &mut Timeline<E>,
) {
    for i in 0..TRASH_COUNT as u64 {
        let x = ctx.random_x(rng);
        let kind = particles::trash(rng);
        ctx.schedule(timers, i * TRASH_STAGGER_MS, TRASH_LIFETIME_MS, x, kind);
    }
    if ctx.variant == GameVariant::Dodge {
        ctx.schedule(timers, 0, DUST_LIFETIME_MS, 0.0, ParticleKind::DustCloud);
    }
}

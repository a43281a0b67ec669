/// # Effect Controller
///
/// Runs one effect session at a time.
///
/// ## States
///
/// - **Idle**: nothing playing, the game loop runs.
/// - **Active**: the pause flag is set, the overlay carries the effect class,
///   the message is on screen and the particle batch is scheduled. The only
///   way out is the session timeout.
///
/// The pause flag belongs to the game; the controller only gets it by
/// mutable reference on `trigger` and `handle`.

use rand::Rng;
use tracing::{debug, info};

use crate::effects::overlay::Overlay;
use crate::effects::{EffectEvent, EffectTimer, GameVariant, ParticleIds, SpawnContext, Viewport};
use crate::entities::{EffectKind, SpecialEntity};
use crate::error::{ArcadeError, Result};
use crate::message::{MessagePresenter, RevealMode};
use crate::timeline::Timeline;

pub const SESSION_MS: u64 = 2_000;

/// The effect currently on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectSession {
    pub effect: EffectKind,
    pub started_at: u64,
    pub duration_ms: u64,
}

impl EffectSession {
    pub fn ends_at(&self) -> u64 {
        self.started_at + self.duration_ms
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active(EffectSession),
}

#[derive(Debug)]
pub struct EffectController {
    phase: Phase,
    overlay: Overlay,
    presenter: MessagePresenter,
    variant: GameVariant,
    mode: RevealMode,
    viewport: Viewport,
    session_ms: u64,
    ids: ParticleIds,
    /// Sign of the next wind gust.
    wind_sign: i32,
}

impl EffectController {
    pub fn new(variant: GameVariant, viewport: Viewport, session_ms: u64) -> Self {
        let mode = match variant {
            GameVariant::Dodge => RevealMode::Immediate,
            GameVariant::Snake => RevealMode::Typed,
        };
        EffectController {
            phase: Phase::Idle,
            overlay: Overlay::new(),
            presenter: MessagePresenter::new(),
            variant,
            mode,
            viewport,
            session_ms,
            ids: ParticleIds::default(),
            wind_sign: 1,
        }
    }

    /// `Idle → Active`. Fails without side effects if a session is running.
    pub fn trigger<E: EffectTimer>(
        &mut self,
        entity: &SpecialEntity,
        now: u64,
        paused: &mut bool,
        rng: &mut impl Rng,
        timers: &mut Timeline<E>,
    ) -> Result<()> {
        if let Phase::Active(session) = &self.phase {
            return Err(ArcadeError::EffectActive(session.effect));
        }

        *paused = true;
        self.overlay.set_effect(Some(entity.effect));
        self.presenter.present(entity, self.mode, now, timers);

        let mut ctx = SpawnContext {
            now,
            variant: self.variant,
            viewport: self.viewport,
            ids: &mut self.ids,
        };
        entity.effect.spawn(&mut ctx, rng, timers);

        timers.after(now, self.session_ms, EffectEvent::EndSession.into());
        self.phase = Phase::Active(EffectSession {
            effect: entity.effect,
            started_at: now,
            duration_ms: self.session_ms,
        });
        info!(effect = %entity.effect, at = now, "effect triggered");
        Ok(())
    }

    /// Apply one due effect event fired at `at`.
    pub fn handle<E: EffectTimer>(
        &mut self,
        event: EffectEvent,
        at: u64,
        paused: &mut bool,
        timers: &mut Timeline<E>,
    ) {
        match event {
            EffectEvent::Spawn(particle) => {
                timers.after(
                    at,
                    particle.lifetime_ms,
                    EffectEvent::Despawn(particle.id).into(),
                );
                self.overlay.add(particle);
            }
            EffectEvent::Despawn(id) => {
                self.overlay.remove(id);
            }
            EffectEvent::WindGust => {
                self.overlay
                    .set_wind_offset(self.wind_sign * crate::effects::WIND_AMPLITUDE_PX);
                self.wind_sign = -self.wind_sign;
            }
            EffectEvent::WindCalm(gust) => {
                timers.cancel(gust);
                self.overlay.set_wind_offset(0);
                self.wind_sign = 1;
            }
            EffectEvent::TypeNext => self.presenter.type_next(at, timers),
            EffectEvent::RevealWord => self.presenter.reveal_word(),
            EffectEvent::EndSession => self.end_session(at, paused, timers),
        }
    }

    /// `Active → Idle`.
    fn end_session<E: EffectTimer>(&mut self, at: u64, paused: &mut bool, timers: &mut Timeline<E>) {
        if let Phase::Active(session) = &self.phase {
            info!(effect = %session.effect, at, "effect session over");
        }
        *paused = false;
        self.overlay.set_effect(None);
        self.presenter.hide(timers);
        self.phase = Phase::Idle;
    }

    /// Drop every particle and every pending effect timer. Only meaningful
    /// while idle, e.g. on restart.
    pub fn purge<E: EffectTimer>(&mut self, timers: &mut Timeline<E>) {
        if self.is_active() {
            return;
        }
        timers.retain(|e| e.as_effect().is_none());
        self.overlay.clear();
        self.wind_sign = 1;
        debug!("effect overlay purged");
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn session(&self) -> Option<&EffectSession> {
        match &self.phase {
            Phase::Active(session) => Some(session),
            Phase::Idle => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active(_))
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn presenter(&self) -> &MessagePresenter {
        &self.presenter
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

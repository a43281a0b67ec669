/// Transient overlay elements and how they move over their lifetime.

use rand::Rng;

pub type ParticleId = u64;

/// 24-bit colour.
pub type Rgb = (u8, u8, u8);

/// Confetti and balloon colours.
pub const CELEBRATION_PALETTE: [Rgb; 7] = [
    (0xff, 0x6b, 0x6b),
    (0x4e, 0xcd, 0xc4),
    (0x45, 0xb7, 0xd1),
    (0xf9, 0xca, 0x24),
    (0xf0, 0x93, 0x2b),
    (0xeb, 0x4d, 0x4b),
    (0x6c, 0x5c, 0xe7),
];

/// Browns and grey for flying rubbish.
pub const TRASH_PALETTE: [Rgb; 5] = [
    (0x8b, 0x45, 0x13),
    (0xa0, 0x52, 0x2d),
    (0xcd, 0x85, 0x3f),
    (0xd2, 0x69, 0x1e),
    (0x69, 0x69, 0x69),
];

pub const DUST_COLOR: Rgb = (139, 69, 19);

// Fall/rise durations of the looping overlay animations.
const RAIN_FALL_MS: u64 = 1_000;
const CONFETTI_FALL_MS: u64 = 3_000;
const TRASH_FALL_MS: u64 = 2_000;

#[derive(Clone, Debug, PartialEq)]
pub enum ParticleKind {
    /// Vertical flash from the top edge. Shakes the screen while alive.
    Bolt { height: f32 },
    Rain { length: f32, delay_ms: u64 },
    Confetti { color: Rgb, delay_ms: u64 },
    /// Floats from the bottom edge to above the top, drifting sideways and
    /// turning once.
    Balloon { color: Rgb, rise_ms: u64, drift: f32 },
    Trash {
        color: Rgb,
        width: f32,
        height: f32,
        delay_ms: u64,
    },
    /// Full-viewport radial haze.
    DustCloud,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    pub kind: ParticleKind,
    /// Left edge, viewport pixels.
    pub x: f32,
    /// Time the particle appears on the overlay.
    pub born_at: u64,
    /// Removal happens this long after `born_at`, whatever else is going on.
    pub lifetime_ms: u64,
}

/// Where a particle is drawn at a moment of its life, in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    /// Degrees, balloons only.
    pub rotation: f32,
    /// 0.0 transparent ..= 1.0 opaque.
    pub opacity: f32,
}

impl Particle {
    pub fn expires_at(&self) -> u64 {
        self.born_at + self.lifetime_ms
    }

    pub fn is_bolt(&self) -> bool {
        matches!(self.kind, ParticleKind::Bolt { .. })
    }

    /// Pose at `now`, or `None` while the particle is still waiting out its
    /// animation delay (or has already gone).
    pub fn pose(&self, now: u64, viewport_height: f32) -> Option<Pose> {
        if now < self.born_at || now >= self.expires_at() {
            return None;
        }
        let age = now - self.born_at;
        let pose = |y: f32| Pose {
            x: self.x,
            y,
            rotation: 0.0,
            opacity: 1.0,
        };
        match &self.kind {
            ParticleKind::Bolt { .. } => Some(pose(0.0)),
            ParticleKind::Rain { delay_ms, .. } => {
                fall(age, *delay_ms, RAIN_FALL_MS, viewport_height).map(pose)
            }
            ParticleKind::Confetti { delay_ms, .. } => {
                fall(age, *delay_ms, CONFETTI_FALL_MS, viewport_height).map(pose)
            }
            ParticleKind::Trash { delay_ms, .. } => {
                fall(age, *delay_ms, TRASH_FALL_MS, viewport_height).map(pose)
            }
            ParticleKind::Balloon { rise_ms, drift, .. } => {
                if age >= *rise_ms {
                    return None;
                }
                let t = age as f32 / *rise_ms as f32;
                // ease-out
                let eased = 1.0 - (1.0 - t) * (1.0 - t);
                let top = viewport_height;
                let bottom = -0.2 * viewport_height;
                Some(Pose {
                    x: self.x + drift * eased,
                    y: top + (bottom - top) * eased,
                    rotation: 360.0 * eased,
                    opacity: 1.0 - eased,
                })
            }
            ParticleKind::DustCloud => {
                // fade in to 0.6 at the midpoint, then out
                let t = age as f32 / self.lifetime_ms as f32;
                let opacity = if t < 0.5 { 1.2 * t } else { 1.2 * (1.0 - t) };
                Some(Pose {
                    x: 0.0,
                    y: 0.0,
                    rotation: 0.0,
                    opacity,
                })
            }
        }
    }
}

/// Vertical position of a falling particle, looping every `period_ms`.
fn fall(age: u64, delay_ms: u64, period_ms: u64, height: f32) -> Option<f32> {
    let moving = age.checked_sub(delay_ms)?;
    let t = (moving % period_ms) as f32 / period_ms as f32;
    Some(t * height)
}

// ── Random property draws ─────────────────────────────────────────────────────

pub(crate) fn pick(rng: &mut impl Rng, palette: &[Rgb]) -> Rgb {
    palette[rng.gen_range(0..palette.len())]
}

pub(crate) fn bolt(rng: &mut impl Rng) -> ParticleKind {
    ParticleKind::Bolt {
        height: rng.gen_range(200.0..500.0),
    }
}

pub(crate) fn rain(rng: &mut impl Rng) -> ParticleKind {
    ParticleKind::Rain {
        length: rng.gen_range(30.0..80.0),
        delay_ms: rng.gen_range(0..2_000),
    }
}

pub(crate) fn confetti(rng: &mut impl Rng) -> ParticleKind {
    ParticleKind::Confetti {
        color: pick(rng, &CELEBRATION_PALETTE),
        delay_ms: rng.gen_range(0..1_000),
    }
}

pub(crate) fn balloon(rng: &mut impl Rng) -> ParticleKind {
    ParticleKind::Balloon {
        color: pick(rng, &CELEBRATION_PALETTE),
        rise_ms: rng.gen_range(2_000..5_000),
        drift: rng.gen_range(-100.0..100.0),
    }
}

pub(crate) fn trash(rng: &mut impl Rng) -> ParticleKind {
    ParticleKind::Trash {
        color: pick(rng, &TRASH_PALETTE),
        width: rng.gen_range(5.0..20.0),
        height: rng.gen_range(5.0..20.0),
        delay_ms: rng.gen_range(0..1_000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(kind: ParticleKind) -> Particle {
        Particle {
            id: 0,
            kind,
            x: 10.0,
            born_at: 1_000,
            lifetime_ms: 2_000,
        }
    }

    #[test]
    fn delayed_particle_is_hidden_until_its_delay_passes() {
        let p = particle(ParticleKind::Rain {
            length: 40.0,
            delay_ms: 500,
        });
        assert!(p.pose(1_200, 600.0).is_none());
        assert_eq!(p.pose(1_500, 600.0).map(|pose| pose.y), Some(0.0));
        assert!(p.pose(3_000, 600.0).is_none());
    }

    #[test]
    fn balloon_rises_and_turns() {
        let p = particle(ParticleKind::Balloon {
            color: CELEBRATION_PALETTE[0],
            rise_ms: 2_000,
            drift: 50.0,
        });
        let start = p.pose(1_000, 600.0).unwrap();
        let later = p.pose(2_000, 600.0).unwrap();
        assert_eq!(start.y, 600.0);
        assert!(later.y < start.y);
        assert!(later.rotation > 0.0);
        assert!(later.x > start.x);
    }
}

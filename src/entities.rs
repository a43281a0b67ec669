/// Game entity types and the special-entity catalog.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::ArcadeError;

// ── Effects ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Lightning,
    Storm,
    Celebration,
    Trash,
}

impl EffectKind {
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Lightning,
        EffectKind::Storm,
        EffectKind::Celebration,
        EffectKind::Trash,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Lightning => "lightning",
            EffectKind::Storm => "storm",
            EffectKind::Celebration => "celebration",
            EffectKind::Trash => "trash",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ArcadeError::UnknownEffect(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorTag {
    Red,
    Green,
}

impl ColorTag {
    /// Style class applied to the reveal word.
    pub fn class_name(self) -> &'static str {
        match self {
            ColorTag::Red => "red-text",
            ColorTag::Green => "green-text",
        }
    }
}

// ── Special entities ──────────────────────────────────────────────────────────

/// A catalog entry: what a special obstacle / special food looks like and
/// which effect it sets off when touched.
#[derive(Debug, PartialEq, Eq)]
pub struct SpecialEntity {
    pub glyph: &'static str,
    pub effect: EffectKind,
    pub message: &'static str,
    pub color: ColorTag,
    pub reveal_word: &'static str,
}

pub static CATALOG: [SpecialEntity; 4] = [
    SpecialEntity {
        glyph: "佺",
        effect: EffectKind::Lightning,
        message: "掌门作法",
        color: ColorTag::Red,
        reveal_word: "涨",
    },
    SpecialEntity {
        glyph: "渊",
        effect: EffectKind::Storm,
        message: "空头降临",
        color: ColorTag::Green,
        reveal_word: "跑",
    },
    SpecialEntity {
        glyph: "斌",
        effect: EffectKind::Celebration,
        message: "主任驾到",
        color: ColorTag::Red,
        reveal_word: "發",
    },
    SpecialEntity {
        glyph: "政",
        effect: EffectKind::Trash,
        message: "垃圾三门",
        color: ColorTag::Green,
        reveal_word: "拉",
    },
];

/// Uniform draw from the fixed catalog.
pub fn draw_entity(rng: &mut impl Rng) -> &'static SpecialEntity {
    &CATALOG[rng.gen_range(0..CATALOG.len())]
}

/// Catalog entry for a given effect.
pub fn entity_for(effect: EffectKind) -> &'static SpecialEntity {
    match effect {
        EffectKind::Lightning => &CATALOG[0],
        EffectKind::Storm => &CATALOG[1],
        EffectKind::Celebration => &CATALOG[2],
        EffectKind::Trash => &CATALOG[3],
    }
}

// ── Dodge game ────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    pub speed: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
    pub entity: &'static SpecialEntity,
}

/// Arrow keys currently held down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

// ── Snake ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }
}

/// Per-tick movement of the snake head. `(0, 0)` until the first key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Heading {
    pub dx: i32,
    pub dy: i32,
}

impl Heading {
    pub const STILL: Heading = Heading { dx: 0, dy: 0 };

    pub fn new(dx: i32, dy: i32) -> Self {
        Heading { dx, dy }
    }

    pub fn is_still(self) -> bool {
        self == Heading::STILL
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrow {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpecialFood {
    pub cell: Cell,
    pub entity: &'static SpecialEntity,
    /// Ticks until the food disappears on its own.
    pub ticks_left: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

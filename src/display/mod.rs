/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game. No game logic is performed; this module only translates state into
/// terminal commands. Games and the effect overlay live in pixel space and
/// are scaled into the play field here.

mod dodge;
mod snake;

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use effect_arcade::controller::EffectController;
use effect_arcade::effects::particles::{ParticleKind, Rgb, DUST_COLOR};
use effect_arcade::entities::ColorTag;

pub use dodge::render_dodge;
pub use snake::render_snake;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;
const C_BOLT: Color = Color::Rgb { r: 255, g: 255, b: 160 };
const C_RAIN: Color = Color::Rgb { r: 120, g: 160, b: 255 };
const C_MESSAGE: Color = Color::White;

/// Columns per 10 px of wind displacement.
const WIND_PX_PER_COL: i32 = 10;
/// The shake alternates direction this often.
const SHAKE_FLIP_MS: u64 = 50;

pub(crate) fn rgb((r, g, b): Rgb) -> Color {
    Color::Rgb { r, g, b }
}

// ── Pen: shifted, clipped writes ──────────────────────────────────────────────

/// Writes at screen positions shifted sideways by the current shake/wind
/// offset, dropping anything that would land off-screen.
pub(crate) struct Pen<'a, W: Write> {
    out: &'a mut W,
    shift: i32,
    width: u16,
    height: u16,
}

impl<'a, W: Write> Pen<'a, W> {
    pub(crate) fn new(out: &'a mut W, shift: i32, width: u16, height: u16) -> Self {
        Pen {
            out,
            shift,
            width,
            height,
        }
    }

    pub(crate) fn put(&mut self, col: i32, row: i32, color: Color, text: &str) -> std::io::Result<()> {
        let col = col + self.shift;
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return Ok(());
        }
        self.out.queue(cursor::MoveTo(col as u16, row as u16))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(text))?;
        Ok(())
    }

    pub(crate) fn put_on(
        &mut self,
        col: i32,
        row: i32,
        fg: Color,
        bg: Color,
        text: &str,
    ) -> std::io::Result<()> {
        self.out.queue(style::SetBackgroundColor(bg))?;
        self.put(col, row, fg, text)?;
        self.out.queue(style::SetBackgroundColor(Color::Reset))?;
        Ok(())
    }

    pub(crate) fn width(&self) -> u16 {
        self.width
    }

    pub(crate) fn height(&self) -> u16 {
        self.height
    }
}

/// Sideways shift in columns from the overlay's shake and wind.
pub(crate) fn screen_shift(effects: &EffectController, now: u64) -> i32 {
    let overlay = effects.overlay();
    let shake = if overlay.is_shaking() {
        if (now / SHAKE_FLIP_MS) % 2 == 0 {
            1
        } else {
            -1
        }
    } else {
        0
    };
    shake + overlay.wind_offset() / WIND_PX_PER_COL
}

// ── Frame pieces shared by both games ─────────────────────────────────────────

pub(crate) fn begin_frame<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    Ok(())
}

pub(crate) fn end_frame<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

pub(crate) fn draw_border<W: Write>(pen: &mut Pen<'_, W>) -> std::io::Result<()> {
    let w = pen.width() as usize;
    let h = pen.height() as i32;
    let bar = "─".repeat(w.saturating_sub(2));

    // Row 1 is the top bar, row h-2 the bottom bar
    pen.put(0, 1, C_BORDER, &format!("┌{bar}┐"))?;
    pen.put(0, h - 2, C_BORDER, &format!("└{bar}┘"))?;

    for row in 2..h - 2 {
        pen.put(0, row, C_BORDER, "│")?;
        pen.put(w as i32 - 1, row, C_BORDER, "│")?;
    }
    Ok(())
}

pub(crate) fn draw_hud<W: Write>(
    pen: &mut Pen<'_, W>,
    left: &str,
    effects: &EffectController,
) -> std::io::Result<()> {
    pen.put(1, 0, C_HUD, left)?;
    if let Some(session) = effects.session() {
        let tag = format!("[ {} ]", session.effect.name().to_uppercase());
        let col = pen.width() as i32 - tag.chars().count() as i32 - 1;
        pen.put(col, 0, Color::Magenta, &tag)?;
    }
    Ok(())
}

pub(crate) fn draw_hint<W: Write>(pen: &mut Pen<'_, W>, hint: &str) -> std::io::Result<()> {
    let row = pen.height() as i32 - 1;
    pen.put(1, row, C_HINT, hint)
}

// ── Effect overlay ────────────────────────────────────────────────────────────

/// The play field inside the border, in terminal cells.
#[derive(Clone, Copy)]
pub(crate) struct Field {
    pub left: i32,
    pub top: i32,
    pub cols: i32,
    pub rows: i32,
}

impl Field {
    pub(crate) fn inside<W: Write>(pen: &Pen<'_, W>) -> Self {
        Field {
            left: 1,
            top: 2,
            cols: pen.width() as i32 - 2,
            rows: pen.height() as i32 - 4,
        }
    }

    /// Map a point in a `w × h` pixel space to a cell.
    pub(crate) fn cell(&self, x: f32, y: f32, w: f32, h: f32) -> (i32, i32) {
        let col = self.left + (x / w * self.cols as f32) as i32;
        let row = self.top + (y / h * self.rows as f32) as i32;
        (col, row)
    }

    pub(crate) fn contains(&self, (col, row): (i32, i32)) -> bool {
        col >= self.left
            && col < self.left + self.cols
            && row >= self.top
            && row < self.top + self.rows
    }
}

pub(crate) fn draw_overlay<W: Write>(
    pen: &mut Pen<'_, W>,
    field: Field,
    effects: &EffectController,
    now: u64,
) -> std::io::Result<()> {
    let vp = effects.viewport();
    let cell_h = vp.height / field.rows.max(1) as f32;

    for particle in effects.overlay().particles() {
        let Some(pose) = particle.pose(now, vp.height) else {
            continue;
        };
        let (col, row) = field.cell(pose.x, pose.y, vp.width, vp.height);
        match &particle.kind {
            ParticleKind::Bolt { height } => {
                let len = (height / cell_h).ceil() as i32;
                for r in 0..len {
                    let glyph = if r % 2 == 0 { "╲" } else { "╱" };
                    let at = (col + r % 2, row + r);
                    if field.contains(at) {
                        pen.put(at.0, at.1, C_BOLT, glyph)?;
                    }
                }
            }
            ParticleKind::Rain { length, .. } => {
                let len = (length / cell_h).ceil().max(1.0) as i32;
                for r in 0..len {
                    if field.contains((col, row + r)) {
                        pen.put(col, row + r, C_RAIN, "│")?;
                    }
                }
            }
            ParticleKind::Confetti { color, .. } => {
                if field.contains((col, row)) {
                    pen.put(col, row, rgb(*color), "▪")?;
                }
            }
            ParticleKind::Balloon { color, .. } => {
                if field.contains((col, row)) && pose.opacity > 0.1 {
                    let glyph = if (pose.rotation as i32 / 90) % 2 == 0 { "O" } else { "0" };
                    pen.put(col, row, rgb(*color), glyph)?;
                }
            }
            ParticleKind::Trash { color, width, .. } => {
                if field.contains((col, row)) {
                    let glyph = if *width > 12.0 { "■" } else { "▫" };
                    pen.put(col, row, rgb(*color), glyph)?;
                }
            }
            ParticleKind::DustCloud => draw_dust(pen, field, pose.opacity)?,
        }
    }
    Ok(())
}

/// Radial haze: denser shading toward the centre, scaled by `opacity`.
fn draw_dust<W: Write>(pen: &mut Pen<'_, W>, field: Field, opacity: f32) -> std::io::Result<()> {
    let cx = field.left as f32 + field.cols as f32 / 2.0;
    let cy = field.top as f32 + field.rows as f32 / 2.0;
    let radius = (field.cols as f32 / 2.0).max(1.0);
    for row in field.top..field.top + field.rows {
        for col in field.left..field.left + field.cols {
            // rows are about twice as tall as columns are wide
            let dx = (col as f32 - cx) / radius;
            let dy = (row as f32 - cy) * 2.0 / radius;
            let strength = (1.0 - (dx * dx + dy * dy).sqrt() / 0.7).max(0.0) * opacity;
            let glyph = match strength {
                s if s > 0.4 => "▒",
                s if s > 0.15 => "░",
                _ => continue,
            };
            pen.put(col, row, rgb(DUST_COLOR), glyph)?;
        }
    }
    Ok(())
}

/// Message block centred in the field: the text, then the reveal word.
pub(crate) fn draw_message<W: Write>(
    pen: &mut Pen<'_, W>,
    field: Field,
    effects: &EffectController,
) -> std::io::Result<()> {
    let presenter = effects.presenter();
    if !presenter.is_visible() {
        return Ok(());
    }
    let cx = field.left + field.cols / 2;
    let cy = field.top + field.rows / 2;

    let text = presenter.shown_text();
    // CJK glyphs are two columns wide
    let text_cols = text.chars().count() as i32 * 2;
    pen.put(cx - text_cols / 2, cy - 1, C_MESSAGE, &text)?;

    if presenter.is_word_visible() {
        let color = match presenter.color() {
            ColorTag::Red => Color::Red,
            ColorTag::Green => Color::Green,
        };
        let word = format!("【{}】", presenter.word());
        let word_cols = word.chars().count() as i32 * 2;
        pen.put(cx - word_cols / 2, cy + 1, color, &word)?;
    }
    Ok(())
}

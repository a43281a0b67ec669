use std::io::Write;

use crossterm::style::Color;
use effect_arcade::dodge::DodgeGame;

use super::{
    begin_frame, draw_border, draw_hint, draw_hud, draw_message, draw_overlay, end_frame,
    screen_shift, Field, Pen,
};

const C_PLAYER: Color = Color::Green;
const C_OBSTACLE: Color = Color::Red;

/// Render one complete dodge-game frame.
pub fn render_dodge<W: Write>(
    out: &mut W,
    game: &DodgeGame,
    now: u64,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    begin_frame(out)?;
    {
        let shift = screen_shift(&game.effects, now);
        let mut pen = Pen::new(out, shift, width, height);
        let field = Field::inside(&pen);

        draw_border(&mut pen)?;
        draw_hud(&mut pen, "躲避  DODGE", &game.effects)?;

        let s = &game.state;
        for obstacle in &s.obstacles {
            let r = obstacle.rect;
            fill(&mut pen, field, r.x, r.y, r.width, r.height, s.width, s.height, C_OBSTACLE)?;
            let (col, row) =
                field.cell(r.x + r.width / 2.0, r.y + r.height / 2.0, s.width, s.height);
            pen.put_on(col - 1, row, Color::White, C_OBSTACLE, obstacle.entity.glyph)?;
        }

        let p = s.player.rect;
        fill(&mut pen, field, p.x, p.y, p.width, p.height, s.width, s.height, C_PLAYER)?;

        draw_overlay(&mut pen, field, &game.effects, now)?;
        draw_message(&mut pen, field, &game.effects)?;
        draw_hint(&mut pen, "←↑↓→ : Move   Q : Quit")?;
    }
    end_frame(out, height)
}

/// Solid block covering a pixel rectangle.
#[allow(clippy::too_many_arguments)]
fn fill<W: Write>(
    pen: &mut Pen<'_, W>,
    field: Field,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    canvas_w: f32,
    canvas_h: f32,
    color: Color,
) -> std::io::Result<()> {
    let (c0, r0) = field.cell(x, y, canvas_w, canvas_h);
    let (c1, r1) = field.cell(x + w, y + h, canvas_w, canvas_h);
    for row in r0..r1.max(r0 + 1) {
        for col in c0..c1.max(c0 + 1) {
            if field.contains((col, row)) {
                pen.put(col, row, color, "█")?;
            }
        }
    }
    Ok(())
}

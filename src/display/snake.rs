use std::io::Write;

use crossterm::style::Color;
use effect_arcade::entities::{Cell, GameStatus};
use effect_arcade::snake::{glow_alpha, SnakeGame};

use super::{
    begin_frame, draw_border, draw_hint, draw_hud, draw_message, draw_overlay, end_frame,
    screen_shift, Field, Pen,
};

const C_SNAKE: Color = Color::Rgb { r: 0, g: 255, b: 0 };
const C_FOOD: Color = Color::Rgb { r: 255, g: 0, b: 0 };
const C_BOARD: Color = Color::Rgb { r: 26, g: 26, b: 26 };
const GOLD: (f32, f32, f32) = (255.0, 215.0, 0.0);

/// Render one complete Snake frame.
pub fn render_snake<W: Write>(
    out: &mut W,
    game: &SnakeGame,
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
        draw_hud(&mut pen, &format!("贪吃蛇  {}", game.board.text()), &game.effects)?;

        let s = &game.state;
        // each grid cell is two columns wide, centred in the field
        let grid = Grid {
            left: field.left + (field.cols - s.tiles * 2).max(0) / 2,
            top: field.top + (field.rows - s.tiles).max(0) / 2,
        };
        for y in 0..s.tiles {
            for x in 0..s.tiles {
                grid.put(&mut pen, Cell::new(x, y), C_BOARD, "··")?;
            }
        }
        for segment in &s.snake {
            grid.put(&mut pen, *segment, C_SNAKE, "██")?;
        }
        grid.put(&mut pen, s.food, C_FOOD, "██")?;

        if let Some(special) = &s.special {
            let a = glow_alpha(now);
            let blend = |c: f32, base: f32| (base + (c - base) * a) as u8;
            let bg = Color::Rgb {
                r: blend(GOLD.0, 26.0),
                g: blend(GOLD.1, 26.0),
                b: blend(GOLD.2, 26.0),
            };
            let (col, row) = grid.at(special.cell);
            pen.put_on(col, row, Color::White, bg, special.entity.glyph)?;
        }

        draw_overlay(&mut pen, field, &game.effects, now)?;
        draw_message(&mut pen, field, &game.effects)?;

        if s.status == GameStatus::GameOver {
            draw_game_over(&mut pen, field, game.board.game_over_panel().unwrap_or(s.score))?;
            draw_hint(&mut pen, "R : Play Again   Q : Quit")?;
        } else {
            draw_hint(&mut pen, "←↑↓→ : Turn   Q : Quit")?;
        }
    }
    end_frame(out, height)
}

struct Grid {
    left: i32,
    top: i32,
}

impl Grid {
    fn at(&self, cell: Cell) -> (i32, i32) {
        (self.left + cell.x * 2, self.top + cell.y)
    }

    fn put<W: Write>(
        &self,
        pen: &mut Pen<'_, W>,
        cell: Cell,
        color: Color,
        text: &str,
    ) -> std::io::Result<()> {
        let (col, row) = self.at(cell);
        pen.put(col, row, color, text)
    }
}

fn draw_game_over<W: Write>(pen: &mut Pen<'_, W>, field: Field, score: u32) -> std::io::Result<()> {
    let score_line = format!("Final Score: {score:>6}");
    let lines: [(&str, Color); 4] = [
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
    ];

    let cx = field.left + field.cols / 2;
    let start_row = field.top + field.rows / 2 - lines.len() as i32 / 2;
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx - msg.chars().count() as i32 / 2;
        pen.put(col, start_row + i as i32, *color, msg)?;
    }
    Ok(())
}

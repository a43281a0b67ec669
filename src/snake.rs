/// Snake with special food.
///
/// Normal food is worth [`SnakeConfig::food_points`] and grows the snake.
/// After a normal pickup a special food may appear (one at a time) for a
/// limited number of ticks; eating it scores
/// [`SnakeConfig::special_points`] and sets off its effect, pausing the loop
/// while the effect plays.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::{ArcadeConfig, SnakeConfig};
use crate::controller::EffectController;
use crate::effects::{EffectEvent, EffectTimer, GameVariant};
use crate::entities::{draw_entity, Arrow, Cell, GameStatus, Heading, SpecialFood};
use crate::error::{ArcadeError, Result};
use crate::timeline::{Timeline, TimerId};

// ── Pure helpers ──────────────────────────────────────────────────────────────

/// New heading after an arrow press. A press that would turn the snake
/// straight back onto itself is ignored.
pub fn steer(heading: Heading, arrow: Arrow) -> Heading {
    match arrow {
        Arrow::Up if heading.dy != 1 => Heading::new(0, -1),
        Arrow::Down if heading.dy != -1 => Heading::new(0, 1),
        Arrow::Left if heading.dx != 1 => Heading::new(-1, 0),
        Arrow::Right if heading.dx != -1 => Heading::new(1, 0),
        _ => heading,
    }
}

pub fn next_head(head: Cell, heading: Heading) -> Cell {
    Cell::new(head.x + heading.dx, head.y + heading.dy)
}

/// True when moving the head to `head` ends the game: off the grid, or onto
/// any current segment.
pub fn is_fatal(head: Cell, snake: &[Cell], tiles: i32) -> bool {
    head.x < 0 || head.x >= tiles || head.y < 0 || head.y >= tiles || snake.contains(&head)
}

/// Uniform pick among cells not in `taken`.
pub fn free_cell(taken: &[Cell], tiles: i32, rng: &mut impl Rng) -> Result<Cell> {
    let free: Vec<Cell> = (0..tiles)
        .flat_map(|y| (0..tiles).map(move |x| Cell::new(x, y)))
        .filter(|cell| !taken.contains(cell))
        .collect();
    if free.is_empty() {
        return Err(ArcadeError::NoFreeCell);
    }
    Ok(free[rng.gen_range(0..free.len())])
}

/// Where a new snake starts: the middle of the board, (10, 10) on the
/// default 20×20 grid.
pub fn start_cell(tiles: i32) -> Cell {
    Cell::new(tiles / 2, tiles / 2)
}

/// Glow of the special food at wall-clock `now_ms`, in `0.0..=1.0`.
pub fn glow_alpha(now_ms: u64) -> f32 {
    ((now_ms as f64 * 0.01).sin() * 0.5 + 0.5) as f32
}

// ── Score sink ────────────────────────────────────────────────────────────────

/// What the score display and the game-over panel currently show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreBoard {
    text: String,
    final_score: Option<u32>,
}

impl Default for ScoreBoard {
    fn default() -> Self {
        ScoreBoard {
            text: Self::format(0),
            final_score: None,
        }
    }
}

impl ScoreBoard {
    pub fn format(score: u32) -> String {
        format!("score: {score}")
    }

    pub fn show_score(&mut self, score: u32) {
        self.text = Self::format(score);
    }

    pub fn show_game_over(&mut self, score: u32) {
        self.final_score = Some(score);
    }

    pub fn hide_game_over(&mut self) {
        self.final_score = None;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Final score while the game-over panel is up.
    pub fn game_over_panel(&self) -> Option<u32> {
        self.final_score
    }
}

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SnakeState {
    /// Head first.
    pub snake: Vec<Cell>,
    pub heading: Heading,
    pub food: Cell,
    pub special: Option<SpecialFood>,
    pub score: u32,
    pub status: GameStatus,
    pub paused: bool,
    pub tiles: i32,
}

pub fn init_state(config: &SnakeConfig, rng: &mut impl Rng) -> Result<SnakeState> {
    let snake = vec![start_cell(config.tiles)];
    let food = free_cell(&snake, config.tiles, rng)?;
    Ok(SnakeState {
        snake,
        heading: Heading::STILL,
        food,
        special: None,
        score: 0,
        status: GameStatus::Playing,
        paused: false,
        tiles: config.tiles,
    })
}

/// What one tick did, for the caller to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// Nothing happened (paused, stopped, or not moving yet).
    Idle,
    Moved,
    AteFood,
    /// The special food that was eaten.
    AteSpecial(SpecialFood),
    Died,
}

// ── Game driver ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum SnakeTimer {
    Tick,
    Effect(EffectEvent),
}

impl From<EffectEvent> for SnakeTimer {
    fn from(event: EffectEvent) -> Self {
        SnakeTimer::Effect(event)
    }
}

impl EffectTimer for SnakeTimer {
    fn as_effect(&self) -> Option<&EffectEvent> {
        match self {
            SnakeTimer::Effect(event) => Some(event),
            SnakeTimer::Tick => None,
        }
    }
}

pub struct SnakeGame {
    pub state: SnakeState,
    pub effects: EffectController,
    pub board: ScoreBoard,
    config: SnakeConfig,
    purge_on_restart: bool,
    timers: Timeline<SnakeTimer>,
    loop_timer: Option<TimerId>,
}

impl SnakeGame {
    pub fn new(config: &ArcadeConfig, now: u64, rng: &mut impl Rng) -> Result<Self> {
        let mut game = SnakeGame {
            state: init_state(&config.snake, rng)?,
            effects: EffectController::new(
                GameVariant::Snake,
                config.effects.viewport(),
                config.effects.session_ms,
            ),
            board: ScoreBoard::default(),
            config: config.snake.clone(),
            purge_on_restart: config.effects.purge_on_restart,
            timers: Timeline::new(),
            loop_timer: None,
        };
        game.start_loop(now);
        info!(tiles = config.snake.tiles, "snake game started");
        Ok(game)
    }

    fn start_loop(&mut self, now: u64) {
        self.loop_timer = Some(self.timers.every(now, self.config.tick_ms, SnakeTimer::Tick));
    }

    /// Arrow press. Ignored while stopped or paused.
    pub fn press(&mut self, arrow: Arrow) {
        if self.state.status != GameStatus::Playing || self.state.paused {
            return;
        }
        self.state.heading = steer(self.state.heading, arrow);
    }

    /// Run every timer due up to `now`, in order.
    pub fn advance(&mut self, now: u64, rng: &mut impl Rng) {
        while let Some((at, timer)) = self.timers.pop_due(now) {
            match timer {
                SnakeTimer::Tick => {
                    self.tick(at, rng);
                }
                SnakeTimer::Effect(event) => {
                    self.effects
                        .handle(event, at, &mut self.state.paused, &mut self.timers)
                }
            }
        }
    }

    /// One loop step at time `at`.
    pub fn tick(&mut self, at: u64, rng: &mut impl Rng) -> StepOutcome {
        if self.state.status != GameStatus::Playing || self.state.paused {
            return StepOutcome::Idle;
        }
        // A snake that has not been given a direction waits in place rather
        // than running into its own head.
        if self.state.heading.is_still() {
            return StepOutcome::Idle;
        }

        let head = next_head(self.state.snake[0], self.state.heading);
        if is_fatal(head, &self.state.snake, self.state.tiles) {
            self.game_over();
            return StepOutcome::Died;
        }
        self.state.snake.insert(0, head);

        let mut outcome = StepOutcome::Moved;
        if head == self.state.food {
            outcome = StepOutcome::AteFood;
            self.add_score(self.config.food_points);
            let mut taken = self.state.snake.clone();
            taken.extend(self.state.special.as_ref().map(|s| s.cell));
            match free_cell(&taken, self.state.tiles, rng) {
                Ok(cell) => self.state.food = cell,
                Err(err) => {
                    warn!(%err, "board full");
                    self.game_over();
                    return StepOutcome::Died;
                }
            }
            if self.state.special.is_none() && rng.gen_bool(self.config.special_chance) {
                self.spawn_special(rng);
            }
        } else {
            self.state.snake.pop();
        }

        if self.state.special.as_ref().map(|s| s.cell) == Some(head) {
            if let Some(special) = self.state.special.take() {
                self.add_score(self.config.special_points);
                if let Err(err) = self.effects.trigger(
                    special.entity,
                    at,
                    &mut self.state.paused,
                    rng,
                    &mut self.timers,
                ) {
                    warn!(%err, "special food effect skipped");
                }
                outcome = StepOutcome::AteSpecial(special);
            }
        }

        if let Some(special) = self.state.special.as_mut() {
            special.ticks_left = special.ticks_left.saturating_sub(1);
            if special.ticks_left == 0 {
                debug!(glyph = special.entity.glyph, "special food expired");
                self.state.special = None;
            }
        }

        outcome
    }

    fn spawn_special(&mut self, rng: &mut impl Rng) {
        let mut taken = self.state.snake.clone();
        taken.push(self.state.food);
        if let Ok(cell) = free_cell(&taken, self.state.tiles, rng) {
            let entity = draw_entity(rng);
            debug!(glyph = entity.glyph, x = cell.x, y = cell.y, "special food spawned");
            self.state.special = Some(SpecialFood {
                cell,
                entity,
                ticks_left: self.config.special_ticks,
            });
        }
    }

    fn add_score(&mut self, points: u32) {
        self.state.score += points;
        self.board.show_score(self.state.score);
    }

    fn game_over(&mut self) {
        self.state.status = GameStatus::GameOver;
        if let Some(id) = self.loop_timer.take() {
            self.timers.cancel(id);
        }
        self.board.show_game_over(self.state.score);
        info!(score = self.state.score, "snake game over");
    }

    /// Fresh board and a new tick interval. Only after game over.
    pub fn restart(&mut self, now: u64, rng: &mut impl Rng) -> Result<()> {
        if self.state.status != GameStatus::GameOver {
            return Ok(());
        }
        if self.purge_on_restart {
            self.effects.purge(&mut self.timers);
        }
        self.state = init_state(&self.config, rng)?;
        self.board.hide_game_over();
        self.board.show_score(0);
        self.start_loop(now);
        info!("snake game restarted");
        Ok(())
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

use effect_arcade::config::{ArcadeConfig, SnakeConfig};
use effect_arcade::entities::*;
use effect_arcade::snake::*;
use effect_arcade::ArcadeError;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn new_game() -> (SnakeGame, StdRng) {
    let mut rng = seeded_rng();
    let game = SnakeGame::new(&ArcadeConfig::default(), 0, &mut rng).unwrap();
    (game, rng)
}

/// Config where every normal pickup brings a special food.
fn always_special() -> ArcadeConfig {
    let mut config = ArcadeConfig::default();
    config.snake.special_chance = 1.0;
    config
}

// ── steer ─────────────────────────────────────────────────────────────────────

#[test]
fn first_key_sets_heading_then_reversal_is_ignored() {
    let heading = steer(Heading::STILL, Arrow::Right);
    assert_eq!(heading, Heading::new(1, 0));
    assert_eq!(steer(heading, Arrow::Left), Heading::new(1, 0));
}

#[test]
fn perpendicular_turns_are_allowed() {
    let right = Heading::new(1, 0);
    assert_eq!(steer(right, Arrow::Up), Heading::new(0, -1));
    assert_eq!(steer(right, Arrow::Down), Heading::new(0, 1));
    let up = Heading::new(0, -1);
    assert_eq!(steer(up, Arrow::Down), up);
    assert_eq!(steer(up, Arrow::Left), Heading::new(-1, 0));
}

// ── is_fatal ──────────────────────────────────────────────────────────────────

#[test]
fn leaving_the_grid_is_fatal() {
    let body = [Cell::new(0, 0)];
    assert!(is_fatal(Cell::new(-1, 0), &body, 20));
    assert!(is_fatal(Cell::new(0, -1), &body, 20));
    assert!(is_fatal(Cell::new(20, 5), &body, 20));
    assert!(is_fatal(Cell::new(5, 20), &body, 20));
    assert!(!is_fatal(Cell::new(19, 19), &body, 20));
}

#[test]
fn hitting_any_segment_is_fatal() {
    let body = [Cell::new(5, 5), Cell::new(5, 6), Cell::new(5, 7)];
    assert!(is_fatal(Cell::new(5, 7), &body, 20));
    assert!(is_fatal(Cell::new(5, 6), &body, 20));
    assert!(!is_fatal(Cell::new(6, 5), &body, 20));
}

// ── free_cell ─────────────────────────────────────────────────────────────────

#[test]
fn food_never_lands_on_the_snake() {
    let snake: Vec<Cell> = (0..4).flat_map(|y| (0..4).map(move |x| Cell::new(x, y))).collect();
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let cell = free_cell(&snake[..15], 4, &mut rng).unwrap();
        assert_eq!(cell, Cell::new(3, 3));
    }
}

#[test]
fn full_board_reports_no_free_cell() {
    let snake: Vec<Cell> = (0..3).flat_map(|y| (0..3).map(move |x| Cell::new(x, y))).collect();
    let result = free_cell(&snake, 3, &mut seeded_rng());
    assert!(matches!(result, Err(ArcadeError::NoFreeCell)));
}

#[test]
fn glow_stays_in_unit_range() {
    for t in (0..10_000).step_by(37) {
        let a = glow_alpha(t);
        assert!((0.0..=1.0).contains(&a));
    }
}

// ── init ──────────────────────────────────────────────────────────────────────

#[test]
fn init_state_starts_still_at_ten_ten() {
    let s = init_state(&SnakeConfig::default(), &mut seeded_rng()).unwrap();
    assert_eq!(s.snake, vec![Cell::new(10, 10)]);
    assert!(s.heading.is_still());
    assert_eq!(s.score, 0);
    assert!(s.special.is_none());
    assert_ne!(s.food, Cell::new(10, 10));
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn small_board_starts_in_the_middle() {
    let mut config = ArcadeConfig::default();
    config.snake.tiles = 8;
    assert!(config.validate().is_ok());
    let mut rng = seeded_rng();
    let mut game = SnakeGame::new(&config, 0, &mut rng).unwrap();
    assert_eq!(game.state.snake, vec![Cell::new(4, 4)]);
    game.state.food = Cell::new(0, 0);
    game.press(Arrow::Right);
    assert_eq!(game.tick(100, &mut rng), StepOutcome::Moved);
    assert_eq!(game.state.status, GameStatus::Playing);
}

#[test]
fn default_board_starts_at_ten_ten() {
    assert_eq!(start_cell(20), Cell::new(10, 10));
}

#[test]
fn new_game_shows_zero_score() {
    let (game, _) = new_game();
    assert_eq!(game.board.text(), "score: 0");
    assert_eq!(game.board.game_over_panel(), None);
    assert!(game.is_running());
}

// ── ticking ───────────────────────────────────────────────────────────────────

#[test]
fn still_snake_does_not_move() {
    let (mut game, mut rng) = new_game();
    game.advance(1_000, &mut rng);
    assert_eq!(game.state.snake, vec![Cell::new(10, 10)]);
    assert_eq!(game.state.status, GameStatus::Playing);
}

#[test]
fn snake_moves_one_cell_per_tick() {
    let (mut game, mut rng) = new_game();
    game.state.food = Cell::new(0, 0);
    game.press(Arrow::Right);
    game.advance(300, &mut rng);
    assert_eq!(game.state.snake, vec![Cell::new(13, 10)]);
}

#[test]
fn eating_food_scores_ten_and_grows() {
    let (mut game, mut rng) = new_game();
    game.state.food = Cell::new(11, 10);
    game.press(Arrow::Right);
    let outcome = game.tick(100, &mut rng);
    assert_eq!(outcome, StepOutcome::AteFood);
    assert_eq!(game.state.score, 10);
    assert_eq!(game.board.text(), "score: 10");
    assert_eq!(game.state.snake, vec![Cell::new(11, 10), Cell::new(10, 10)]);
    assert!(!game.state.snake.contains(&game.state.food));
}

#[test]
fn wall_ends_the_game() {
    let (mut game, mut rng) = new_game();
    game.state.snake = vec![Cell::new(19, 10)];
    game.state.food = Cell::new(0, 0);
    game.state.score = 30;
    game.press(Arrow::Right);
    assert_eq!(game.tick(100, &mut rng), StepOutcome::Died);
    assert_eq!(game.state.status, GameStatus::GameOver);
    assert_eq!(game.board.game_over_panel(), Some(30));
    assert!(!game.is_running());
}

#[test]
fn running_into_the_body_ends_the_game() {
    let (mut game, mut rng) = new_game();
    game.state.snake = vec![
        Cell::new(5, 5),
        Cell::new(6, 5),
        Cell::new(6, 6),
        Cell::new(5, 6),
        Cell::new(4, 6),
    ];
    game.state.heading = Heading::new(0, -1);
    game.state.food = Cell::new(0, 0);
    game.press(Arrow::Down); // reversal, ignored
    game.press(Arrow::Left);
    game.press(Arrow::Down);
    assert_eq!(game.tick(100, &mut rng), StepOutcome::Died);
}

#[test]
fn keys_are_ignored_after_game_over() {
    let (mut game, mut rng) = new_game();
    game.state.snake = vec![Cell::new(0, 10)];
    game.press(Arrow::Left);
    game.tick(100, &mut rng);
    game.press(Arrow::Up);
    assert_eq!(game.state.heading, Heading::new(-1, 0));
}

#[test]
fn eating_the_last_free_cell_ends_the_game() {
    let mut config = ArcadeConfig::default();
    config.snake.tiles = 2;
    let mut rng = seeded_rng();
    let mut game = SnakeGame::new(&config, 0, &mut rng).unwrap();
    game.state.snake = vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1)];
    game.state.food = Cell::new(1, 0);
    game.press(Arrow::Right);

    assert_eq!(game.tick(100, &mut rng), StepOutcome::Died);
    assert_eq!(game.state.status, GameStatus::GameOver);
    assert_eq!(game.state.score, 10);
    assert_eq!(game.board.game_over_panel(), Some(10));
    assert!(!game.is_running());
}

// ── special food ──────────────────────────────────────────────────────────────

#[test]
fn normal_pickup_can_bring_one_special_food() {
    let mut rng = seeded_rng();
    let mut game = SnakeGame::new(&always_special(), 0, &mut rng).unwrap();
    game.state.food = Cell::new(11, 10);
    game.press(Arrow::Right);
    game.tick(100, &mut rng);
    let special = game.state.special.clone().unwrap();
    assert_eq!(special.ticks_left, 149);
    assert!(!game.state.snake.contains(&special.cell));
    assert_ne!(special.cell, game.state.food);

    // a second pickup does not replace it
    let ahead = Cell::new(12, 10);
    let target = if special.cell == ahead {
        game.press(Arrow::Down);
        Cell::new(11, 11)
    } else {
        ahead
    };
    game.state.food = target;
    assert_eq!(game.tick(200, &mut rng), StepOutcome::AteFood);
    let still = game.state.special.clone().unwrap();
    assert_eq!(still.cell, special.cell);
    assert_eq!(still.ticks_left, 148);
}

#[test]
fn new_food_avoids_the_special_food() {
    let mut config = ArcadeConfig::default();
    config.snake.tiles = 3;
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = SnakeGame::new(&config, 0, &mut rng).unwrap();
        game.state.snake = vec![
            Cell::new(0, 0),
            Cell::new(0, 1),
            Cell::new(0, 2),
            Cell::new(1, 2),
            Cell::new(2, 2),
            Cell::new(2, 1),
        ];
        game.state.food = Cell::new(1, 0);
        game.state.special = Some(SpecialFood {
            cell: Cell::new(1, 1),
            entity: entity_for(EffectKind::Trash),
            ticks_left: 100,
        });
        game.press(Arrow::Right);

        assert_eq!(game.tick(100, &mut rng), StepOutcome::AteFood);
        // (2,0) is the only cell left that is neither snake nor special food
        assert_eq!(game.state.food, Cell::new(2, 0));
    }
}

#[test]
fn special_food_expires() {
    let (mut game, mut rng) = new_game();
    game.state.food = Cell::new(0, 0);
    game.state.special = Some(SpecialFood {
        cell: Cell::new(0, 19),
        entity: entity_for(EffectKind::Storm),
        ticks_left: 2,
    });
    game.press(Arrow::Right);
    game.tick(100, &mut rng);
    assert!(game.state.special.is_some());
    game.tick(200, &mut rng);
    assert!(game.state.special.is_none());
}

#[test]
fn eating_special_food_scores_fifty_and_pauses() {
    let (mut game, mut rng) = new_game();
    game.state.food = Cell::new(0, 0);
    game.state.special = Some(SpecialFood {
        cell: Cell::new(11, 10),
        entity: entity_for(EffectKind::Lightning),
        ticks_left: 100,
    });
    game.press(Arrow::Right);
    let outcome = game.tick(100, &mut rng);
    assert!(matches!(outcome, StepOutcome::AteSpecial(ref s) if s.entity.effect == EffectKind::Lightning));
    assert_eq!(game.state.score, 50);
    assert_eq!(game.board.text(), "score: 50");
    assert!(game.state.special.is_none());
    assert!(game.is_paused());
    assert!(game.effects.presenter().is_typing());
    // the snake did not grow
    assert_eq!(game.state.snake.len(), 1);
}

#[test]
fn pause_blocks_input_and_movement_until_the_session_ends() {
    let (mut game, mut rng) = new_game();
    game.state.food = Cell::new(0, 0);
    game.state.special = Some(SpecialFood {
        cell: Cell::new(11, 10),
        entity: entity_for(EffectKind::Celebration),
        ticks_left: 100,
    });
    game.press(Arrow::Right);
    game.tick(100, &mut rng);

    game.press(Arrow::Up);
    assert_eq!(game.state.heading, Heading::new(1, 0));
    game.advance(2_099, &mut rng);
    assert!(game.is_paused());
    assert_eq!(game.state.snake, vec![Cell::new(11, 10)]);

    game.advance(2_100, &mut rng);
    assert!(!game.is_paused());
    assert_eq!(game.state.snake, vec![Cell::new(12, 10)]);
}

// ── restart ───────────────────────────────────────────────────────────────────

#[test]
fn restart_resets_score_and_panel() {
    let (mut game, mut rng) = new_game();
    game.state.snake = vec![Cell::new(19, 10)];
    game.state.score = 120;
    game.press(Arrow::Right);
    game.tick(100, &mut rng);
    assert_eq!(game.state.status, GameStatus::GameOver);

    game.restart(500, &mut rng).unwrap();
    assert_eq!(game.state.status, GameStatus::Playing);
    assert_eq!(game.state.score, 0);
    assert_eq!(game.board.text(), "score: 0");
    assert_eq!(game.board.game_over_panel(), None);
    assert!(game.is_running());
    assert_eq!(game.state.snake, vec![Cell::new(10, 10)]);
}

#[test]
fn restart_while_playing_does_nothing() {
    let (mut game, mut rng) = new_game();
    game.state.score = 40;
    game.restart(100, &mut rng).unwrap();
    assert_eq!(game.state.score, 40);
}

#[test]
fn particles_outlive_a_restart_unless_purged() {
    for purge in [false, true] {
        let mut config = ArcadeConfig::default();
        config.effects.purge_on_restart = purge;
        let mut rng = seeded_rng();
        let mut game = SnakeGame::new(&config, 0, &mut rng).unwrap();
        game.state.food = Cell::new(0, 0);
        game.state.special = Some(SpecialFood {
            cell: Cell::new(11, 10),
            entity: entity_for(EffectKind::Celebration),
            ticks_left: 100,
        });
        game.press(Arrow::Right);
        game.tick(100, &mut rng);
        game.advance(2_100, &mut rng);

        // straight into the wall
        game.state.snake = vec![Cell::new(19, 10)];
        game.tick(2_150, &mut rng);
        assert_eq!(game.state.status, GameStatus::GameOver);

        game.restart(2_200, &mut rng).unwrap();
        let lingering = !game.effects.overlay().particles().is_empty();
        assert_eq!(lingering, !purge);
    }
}

mod display;

use std::collections::HashMap;
use std::env;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use effect_arcade::config::ArcadeConfig;
use effect_arcade::dodge::DodgeGame;
use effect_arcade::entities::{Arrow, GameStatus, HeldKeys, CATALOG};
use effect_arcade::snake::SnakeGame;
use effect_arcade::{ArcadeError, Result};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key counts as held if its last press/repeat event arrived within this
/// window. Covers terminals that don't emit key-release events: the OS
/// key-repeat rate is ≥ 15 Hz, so the window is refreshed before expiry.
const HOLD_WINDOW_MS: u64 = 130;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
enum Game {
    Dodge,
    Snake,
}

impl std::str::FromStr for Game {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dodge" => Ok(Game::Dodge),
            "snake" => Ok(Game::Snake),
            other => Err(ArcadeError::UnknownGame(other.to_string())),
        }
    }
}

#[derive(Default)]
struct Args {
    game: Option<Game>,
    config: Option<PathBuf>,
    seed: Option<u64>,
    log: Option<PathBuf>,
}

fn print_usage() {
    eprintln!("effect_arcade - two arcade games with special effects");
    eprintln!();
    eprintln!("Usage: effect_arcade [GAME] [OPTIONS]");
    eprintln!();
    eprintln!("Games:");
    eprintln!("  dodge     Dodge the characters (touching one sets off its effect)");
    eprintln!("  snake     Snake with special food");
    eprintln!("  (none)    Show the start menu");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config PATH  Load settings from a TOML file");
    eprintln!("  --seed N       Seed the random generator");
    eprintln!("  --log PATH     Write a trace log to PATH");
}

/// `Ok(None)` when only help was requested.
fn parse_args() -> Result<Option<Args>> {
    let argv: Vec<String> = env::args().skip(1).collect();
    let mut args = Args::default();
    let mut it = argv.iter();
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| {
            it.next()
                .cloned()
                .ok_or_else(|| ArcadeError::InvalidConfig(format!("{flag} requires a value")))
        };
        match arg.as_str() {
            "--config" => args.config = Some(PathBuf::from(value("--config")?)),
            "--log" => args.log = Some(PathBuf::from(value("--log")?)),
            "--seed" => {
                let raw = value("--seed")?;
                let seed = raw
                    .parse()
                    .map_err(|_| ArcadeError::InvalidConfig(format!("bad seed: {raw}")))?;
                args.seed = Some(seed);
            }
            "help" | "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown option: {other}");
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
            other => args.game = Some(other.parse()?),
        }
    }
    Ok(Some(args))
}

fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

// ── Input helpers ─────────────────────────────────────────────────────────────

struct Clock(Instant);

impl Clock {
    fn now(&self) -> u64 {
        self.0.elapsed().as_millis() as u64
    }
}

fn is_held(key_seen: &HashMap<KeyCode, u64>, key: KeyCode, now: u64) -> bool {
    key_seen
        .get(&key)
        .map(|&last| now.saturating_sub(last) <= HOLD_WINDOW_MS)
        .unwrap_or(false)
}

fn arrow(code: KeyCode) -> Option<Arrow> {
    match code {
        KeyCode::Up => Some(Arrow::Up),
        KeyCode::Down => Some(Arrow::Down),
        KeyCode::Left => Some(Arrow::Left),
        KeyCode::Right => Some(Arrow::Right),
        _ => None,
    }
}

/// What a game loop wants to happen next.
enum Exit {
    Menu,
    Quit,
}

fn quit_requested(code: KeyCode, modifiers: KeyModifiers) -> Option<Exit> {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Exit::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Exit::Quit),
        KeyCode::Esc => Some(Exit::Menu),
        _ => None,
    }
}

fn sleep_rest(frame_start: Instant) {
    let elapsed = frame_start.elapsed();
    if elapsed < FRAME {
        thread::sleep(FRAME - elapsed);
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<Option<Game>> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  EFFECT  ARCADE  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Dodge ", Color::Green, "Steer clear of the characters"),
        ("2", "Snake ", Color::Yellow, "Eat food, catch the specials"),
    ];
    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(3) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<8}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" — {}", desc)))?;
    }

    // Special entity legend
    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Special characters:"))?;
    for (i, entity) in CATALOG.iter().enumerate() {
        out.queue(cursor::MoveTo(cx.saturating_sub(14), cy + 1 + i as u16))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(entity.glyph))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("  {:<12} {}", entity.effect.name(), entity.message)))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy + 6))?;
    out.queue(Print("←↑↓→ : Move   ESC : Menu   Q : Quit"))?;
    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(event) => match menu_pick(&event) {
                Some(MenuPick::Play(game)) => return Ok(Some(game)),
                Some(MenuPick::Quit) => return Ok(None),
                None => {}
            },
            // input thread gone
            Err(_) => return Ok(None),
        }
    }
}

#[derive(Debug, PartialEq)]
enum MenuPick {
    Play(Game),
    Quit,
}

/// Menu reaction to one input event. Only presses count: the release of the
/// Esc that left a game must not also close the menu.
fn menu_pick(event: &Event) -> Option<MenuPick> {
    let Event::Key(KeyEvent { code, kind, .. }) = event else {
        return None;
    };
    if *kind != KeyEventKind::Press {
        return None;
    }
    match code {
        KeyCode::Char('1') => Some(MenuPick::Play(Game::Dodge)),
        KeyCode::Char('2') => Some(MenuPick::Play(Game::Snake)),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(MenuPick::Quit),
        _ => None,
    }
}

// ── Game loops ────────────────────────────────────────────────────────────────

/// Input model: arrow presses/repeats record the time they were last seen;
/// each frame the keys still inside `HOLD_WINDOW_MS` count as held. Keyboard-
/// enhanced terminals also send releases, which drop the key immediately.
fn play_dodge<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &ArcadeConfig,
    rng: &mut StdRng,
    clock: &Clock,
) -> Result<Exit> {
    let mut game = DodgeGame::new(config, clock.now(), rng);
    let mut key_seen: HashMap<KeyCode, u64> = HashMap::new();

    loop {
        let frame_start = Instant::now();
        let now = clock.now();

        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    if let Some(exit) = quit_requested(code, modifiers) {
                        game.stop();
                        return Ok(exit);
                    }
                    key_seen.insert(code, now);
                }
                KeyEventKind::Release => {
                    key_seen.remove(&code);
                }
            }
        }

        game.set_keys(HeldKeys {
            left: is_held(&key_seen, KeyCode::Left, now),
            right: is_held(&key_seen, KeyCode::Right, now),
            up: is_held(&key_seen, KeyCode::Up, now),
            down: is_held(&key_seen, KeyCode::Down, now),
        });
        game.advance(now, rng);

        let (width, height) = terminal::size()?;
        display::render_dodge(out, &game, now, width, height)?;
        sleep_rest(frame_start);
    }
}

fn play_snake<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &ArcadeConfig,
    rng: &mut StdRng,
    clock: &Clock,
) -> Result<Exit> {
    let mut game = SnakeGame::new(config, clock.now(), rng)?;

    loop {
        let frame_start = Instant::now();
        let now = clock.now();

        // Presses are one-shot turns; repeats and releases are ignored.
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            if kind != KeyEventKind::Press {
                continue;
            }
            if let Some(exit) = quit_requested(code, modifiers) {
                return Ok(exit);
            }
            match code {
                KeyCode::Char('r') | KeyCode::Char('R')
                    if game.state.status == GameStatus::GameOver =>
                {
                    game.restart(now, rng)?;
                }
                code => {
                    if let Some(arrow) = arrow(code) {
                        game.press(arrow);
                    }
                }
            }
        }

        game.advance(now, rng);

        let (width, height) = terminal::size()?;
        display::render_snake(out, &game, now, width, height)?;
        sleep_rest(frame_start);
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let Some(args) = parse_args()? else {
        return Ok(());
    };
    if let Some(path) = &args.log {
        init_logging(path)?;
    }
    let config = match &args.config {
        Some(path) => ArcadeConfig::load(path)?,
        None => ArcadeConfig::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(seed = ?args.seed, "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &config, &mut rng, args.game);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &ArcadeConfig,
    rng: &mut StdRng,
    direct: Option<Game>,
) -> Result<()> {
    let clock = Clock(Instant::now());

    if let Some(game) = direct {
        play(out, rx, config, rng, &clock, game)?;
        return Ok(());
    }

    while let Some(game) = show_menu(out, rx)? {
        if let Exit::Quit = play(out, rx, config, rng, &clock, game)? {
            break;
        }
    }
    Ok(())
}

fn play<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &ArcadeConfig,
    rng: &mut StdRng,
    clock: &Clock,
    game: Game,
) -> Result<Exit> {
    info!(?game, "game selected");
    match game {
        Game::Dodge => play_dodge(out, rx, config, rng, clock),
        Game::Snake => play_snake(out, rx, config, rng, clock),
    }
}

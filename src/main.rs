//! Invaders terminal front end
//!
//! Shows the menu, drives each session at its current tick interval and
//! records high scores. All drawing goes through `invaders::renderer`.

use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    ExecutableCommand, cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
};

use invaders::audio::{AudioManager, SoundEffect, TerminalBell};
use invaders::highscores::MAX_NAME_LEN;
use invaders::platform::{Action, FrameClock, KeyTracker, input::action_for};
use invaders::renderer::{self, Hud, Viewport};
use invaders::{HighScores, Session, Settings, SimConfig};

/// Redraw at most this often (≈30 FPS)
const FRAME: Duration = Duration::from_millis(33);

/// Longest sleep between input polls
const POLL: Duration = Duration::from_millis(5);

/// Input ignored after game over so a held key does not skip the result
const GAME_OVER_PAUSE: Duration = Duration::from_millis(600);

#[derive(Parser)]
#[command(name = "invaders")]
#[command(about = "Space Invaders in the terminal")]
struct Args {
    /// RNG seed for the first game (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,
    /// Simulation config JSON; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Settings file (default ~/.invaders/settings.json)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// High score file (overrides the settings value)
    #[arg(long)]
    scores: Option<PathBuf>,
    /// Disable sound
    #[arg(long)]
    silent: bool,
    /// Write logs here; RUST_LOG picks the level (default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Logging to the terminal would tear the game screen, so logs only go to a file
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Everything that outlives a single session
struct App {
    config: SimConfig,
    settings: Settings,
    settings_path: PathBuf,
    scores: HighScores,
    scores_path: PathBuf,
    audio: AudioManager,
    seed: u64,
    games: u64,
}

impl App {
    fn load(args: &Args) -> Result<Self> {
        let config = match &args.config {
            Some(path) => SimConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => SimConfig::default(),
        };
        config.validate().context("invalid simulation config")?;

        let settings_path = args.settings.clone().unwrap_or_else(Settings::default_path);
        let settings = Settings::load(&settings_path);

        let scores_path = args
            .scores
            .clone()
            .unwrap_or_else(|| settings.high_score_path.clone());
        let scores = HighScores::load_or_default(&scores_path);

        let audio = if args.silent || !settings.sound {
            AudioManager::disabled()
        } else {
            let mut audio = AudioManager::new(TerminalBell);
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);
            audio
        };

        Ok(Self {
            config,
            settings,
            settings_path,
            scores,
            scores_path,
            audio,
            seed: args.seed.unwrap_or_else(clock_seed),
            games: 0,
        })
    }

    /// First game uses the chosen seed, later ones count up from it
    fn next_seed(&mut self) -> u64 {
        let seed = self.seed.wrapping_add(self.games);
        self.games += 1;
        seed
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Exit {
    Menu,
    Quit,
}

/// Block for the next key press; `None` for anything else (resize, release)
fn next_key(rx: &Receiver<Event>) -> Result<Option<KeyEvent>> {
    match rx.recv().context("input thread stopped")? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

fn wait_any_key(rx: &Receiver<Event>) -> Result<()> {
    while next_key(rx)?.is_none() {}
    Ok(())
}

fn run<W: Write>(out: &mut W, rx: &Receiver<Event>, app: &mut App) -> Result<()> {
    loop {
        renderer::draw_menu(out, terminal::size()?, &app.scores)?;
        let Some(key) = next_key(rx)? else { continue };
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                if play(out, rx, app)? == Exit::Quit {
                    break;
                }
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                renderer::draw_high_scores(out, terminal::size()?, &app.scores, None)?;
                wait_any_key(rx)?;
            }
            _ if action_for(&key) == Some(Action::Quit) => break,
            _ => {}
        }
    }
    Ok(())
}

/// One session from start to the game-over screen
fn play<W: Write>(out: &mut W, rx: &Receiver<Event>, app: &mut App) -> Result<Exit> {
    let mut session = Session::start(app.config.clone(), app.next_seed())?;
    app.audio.play(SoundEffect::Startup);

    let hud = Hud {
        high_score: app.scores.top_score().unwrap_or(0),
        show_speed: app.settings.show_speed,
    };
    let mut keys = KeyTracker::new();
    let mut clock = FrameClock::new();
    let mut last = Instant::now();
    let mut last_draw: Option<Instant> = None;

    while session.is_running() {
        let now = Instant::now();

        // Drain all pending input events (non-blocking)
        while let Ok(event) = rx.try_recv() {
            let Event::Key(key) = event else { continue };
            if keys.handle(&key, now) == Some(Action::Quit) && key.kind == KeyEventKind::Press {
                log::info!("Player quit mid-game");
                session.end();
                return Ok(Exit::Quit);
            }
        }

        clock.accumulate(now.duration_since(last));
        last = now;
        while session.is_running() && clock.take_tick(session.tick_interval()) {
            let outcome = session.advance(&keys.take_input(now));
            app.audio.react(&outcome.events);
        }

        if last_draw.is_none_or(|t| now.duration_since(t) >= FRAME) || !session.is_running() {
            let (cols, rows) = terminal::size()?;
            let view = Viewport::new(cols, rows, session.config());
            renderer::render(out, &view, &session.snapshot(), &hud)?;
            last_draw = Some(now);
        }

        let wait = clock.until_next(session.tick_interval()).min(POLL);
        thread::sleep(wait.max(Duration::from_millis(1)));
    }

    let summary = session.end();

    thread::sleep(GAME_OVER_PAUSE);
    while rx.try_recv().is_ok() {}
    wait_any_key(rx)?;

    record_score(out, rx, app, summary.score)?;
    Ok(Exit::Menu)
}

/// Ask for a name if the score made the board, then save and show it
fn record_score<W: Write>(
    out: &mut W,
    rx: &Receiver<Event>,
    app: &mut App,
    score: u32,
) -> Result<()> {
    let Some(rank) = app.scores.potential_rank(score) else {
        return Ok(());
    };

    let mut name = app.settings.player_name.clone();
    loop {
        renderer::draw_name_prompt(out, terminal::size()?, score, rank, &name)?;
        let Some(key) = next_key(rx)? else { continue };
        match key.code {
            KeyCode::Enter => break,
            KeyCode::Esc => return Ok(()),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
            KeyCode::Backspace => {
                name.pop();
            }
            KeyCode::Char(c) if name.chars().count() < MAX_NAME_LEN => name.push(c),
            _ => {}
        }
    }

    let Some(rank) = app.scores.add_score(&name, score) else {
        log::info!("Score {} not recorded: empty name", score);
        return Ok(());
    };
    if let Err(e) = app.scores.save(&app.scores_path) {
        log::warn!("Failed to save high scores: {}", e);
    }
    app.settings.player_name = name.trim().to_string();
    app.settings.save(&app.settings_path);

    renderer::draw_high_scores(out, terminal::size()?, &app.scores, Some(rank))?;
    wait_any_key(rx)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    log::info!("Invaders starting...");

    let mut app = App::load(&args)?;

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key release events where the terminal supports them
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the game loop never waits on I/O
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &mut app);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("Exiting on error: {:#}", e);
    }
    result
}

use std::fs::{self, OpenOptions};
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use candy_snake::config::{CANDY_PALETTE, GameConfig, TERMINAL_CELL_PX};
use candy_snake::error::ConfigError;
use candy_snake::input::{GameInput, InputMode, SwipeTracker, map_key};
use candy_snake::leaderboard::FileStore;
use candy_snake::renderer::{self, ScreenLayout};
use candy_snake::session::Session;
use candy_snake::terminal_runtime::{AppTerminal, TerminalSession, restore_terminal};
use clap::Parser;
use crossterm::event::{self, Event, MouseButton, MouseEvent, MouseEventKind};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const DEFAULT_LOG_FILE: &str = "candy-snake.log";

#[derive(Debug, Parser)]
#[command(name = "candy-snake", version, about)]
struct Cli {
    /// JSON config file; missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Cells per board side.
    #[arg(long = "board-size")]
    board_size: Option<u16>,
    /// Seed for reproducible candy placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Directory holding the leaderboard record.
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,
    /// Write logs to this file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("candy-snake: {error}");
            process::exit(2);
        }
    };

    let data_dir = cli.data_dir.clone().unwrap_or_else(FileStore::default_dir);
    init_logging(cli.log_file.as_deref(), &data_dir);
    install_panic_hook();

    let store = FileStore::new(data_dir);
    let mut session = Session::new(config, Box::new(store), cli.seed);

    let mut terminal = TerminalSession::enter()?;
    let result = run(terminal.terminal_mut(), &mut session);
    session.shutdown();
    log::info!("exiting");
    result
}

fn load_config(cli: &Cli) -> Result<GameConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(board_size) = cli.board_size {
        config.board_size = board_size;
    }
    config.validate()?;
    Ok(config)
}

fn init_logging(log_file: Option<&Path>, data_dir: &Path) {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None if std::env::var_os("RUST_LOG").is_some() => data_dir.join(DEFAULT_LOG_FILE),
        None => return,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        let _ = fs::create_dir_all(parent);
    }

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(error) => {
            eprintln!("Failed to open log file {}: {error}", path.display());
            return;
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn run(terminal: &mut AppTerminal, session: &mut Session) -> io::Result<()> {
    let threshold = session.state().config().swipe_threshold_px;
    let mut layout = ScreenLayout::default();
    let mut swipe = SwipeTracker::default();

    loop {
        let now = Instant::now();
        session.update(now);

        let view = session.frame(now);
        terminal.draw(|frame| {
            layout = renderer::render(frame, &view, &CANDY_PALETTE);
        })?;

        let deadline = now + FRAME_INTERVAL;
        while event::poll(deadline.saturating_duration_since(Instant::now()))? {
            let mode = session.input_mode();
            let Some(input) = translate_event(event::read()?, mode, &layout, &mut swipe, threshold)
            else {
                continue;
            };

            if input == GameInput::Quit {
                return Ok(());
            }
            session.handle_input(input, Instant::now());
        }
    }
}

fn translate_event(
    event: Event,
    mode: InputMode,
    layout: &ScreenLayout,
    swipe: &mut SwipeTracker,
    threshold: f32,
) -> Option<GameInput> {
    match event {
        Event::Key(key) => map_key(key, mode),
        Event::Mouse(mouse) => translate_mouse(mouse, layout, swipe, threshold),
        _ => None,
    }
}

fn translate_mouse(
    mouse: MouseEvent,
    layout: &ScreenLayout,
    swipe: &mut SwipeTracker,
    threshold: f32,
) -> Option<GameInput> {
    let (x, y) = mouse_to_px(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(direction) = layout.pad.hit(mouse.column, mouse.row) {
                return Some(GameInput::Direction(direction));
            }
            if layout.board.contains((mouse.column, mouse.row).into()) {
                swipe.begin(x, y);
            }
            None
        }
        MouseEventKind::Up(MouseButton::Left) => {
            swipe.end(x, y, threshold).map(GameInput::Direction)
        }
        _ => None,
    }
}

/// Scales a terminal cell to approximate pixels so the swipe threshold keeps
/// its meaning.
fn mouse_to_px(column: u16, row: u16) -> (f32, f32) {
    (
        f32::from(column) * TERMINAL_CELL_PX.0,
        f32::from(row) * TERMINAL_CELL_PX.1,
    )
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));
}

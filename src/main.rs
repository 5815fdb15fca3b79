use anyhow::Context;
use clap::Parser;
use sinewave::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use sinewave::input::TerminalInput;
use sinewave::render::TerminalSession;
use sinewave::{Mode, ScreenConfig, SineAnimation};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, Level};

/// Animate a sine curve in the terminal.
///
/// Interactive controls: W/S amplitude, A/D frequency, Q/E phase, Up/Down vertical shift,
/// Space to brake, Esc to quit.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// The grid width, in columns.
    #[clap(long, default_value_t = DEFAULT_WIDTH, env = "SINEWAVE_WIDTH")]
    width: u16,

    /// The grid height, in rows.
    #[clap(long, default_value_t = DEFAULT_HEIGHT, env = "SINEWAVE_HEIGHT")]
    height: u16,

    /// The animation variant to run.
    #[clap(long, value_enum, default_value_t = Mode::Interactive, env = "SINEWAVE_MODE")]
    mode: Mode,

    /// Write logs to this file. Nothing is logged otherwise, the terminal is busy drawing.
    #[clap(long, env = "SINEWAVE_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// The maximum log level.
    #[clap(long, default_value_t = Level::INFO, env = "SINEWAVE_LOG_LEVEL")]
    log_level: Level,
}

fn init_logging(path: &Path, level: Level) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt().with_ansi(false).with_max_level(level).with_writer(Mutex::new(file)).init();
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(path) = &cli.log_file {
        init_logging(path, cli.log_level)?;
    }

    let config = ScreenConfig::new(cli.width, cli.height).context("invalid screen dimensions")?;
    info!(width = config.width(), height = config.height(), mode = %cli.mode, "starting");

    // allocate before touching the terminal so an allocation failure cannot strand it in raw mode
    let mut animation = SineAnimation::new(&config, cli.mode);
    let mut session = TerminalSession::acquire(BufWriter::new(io::stdout())).context("failed to initialize terminal")?;
    let mut input = TerminalInput::new(session.keyboard_enhanced());
    animation.run(&mut input, &mut session).context("animation stopped")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    run(Cli::parse())
}

//! patina entrypoint.
//!
//! Startup order: parse CLI, init logging, load config, load the file,
//! build the collaborators, and only then take over the terminal. Anything
//! that fails before the session starts reports to stderr and exits 1;
//! once the alternate screen is up, stderr is useless and every failure is
//! either shown on the notice row or logged to `patina.log`.

use std::io::stdout;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use core_render::Painter;
use core_terminal::{CrosstermBackend, TerminalBackend};
use crossterm::event::{self, Event};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

mod app;
mod clipboard;
mod io;

use app::App;
use clipboard::SystemClipboard;

/// How long one `poll` waits before yielding a tick; status expiry rides
/// these ticks, so it fires within this interval of its deadline.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

const USAGE: &str = "usage: patina <filename> [--theme <name>]";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "patina", version, about = "patina text editor")]
struct Args {
    /// File to edit (created on first save if absent).
    pub filename: PathBuf,
    /// Syntax color theme name (overrides the config file).
    #[arg(long = "theme")]
    pub theme: Option<String>,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            eprintln!("{USAGE}");
            return ExitCode::from(1);
        }
    };

    let _log_guard = configure_logging();
    install_panic_hook();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(target: "runtime", error = %format!("{error:#}"), "fatal");
            eprintln!("patina: {error:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: Args) -> Result<()> {
    info!(target: "runtime", "startup");
    let config = core_config::load_from(None);

    let mut backend = CrosstermBackend::new();
    let size = backend.size().context("query terminal size")?;
    let mut app = App::new(
        args.filename.clone(),
        args.theme.as_deref(),
        config,
        Box::new(SystemClipboard::new()),
        size,
    )?;
    info!(
        target: "runtime.startup",
        file = %args.filename.display(),
        grammar = app.grammar_name(),
        theme = app.theme_name(),
        width = size.0,
        height = size.1,
        "bootstrap_complete"
    );

    let _session = backend
        .enter_guard()
        .context("initialize terminal session")?;
    event_loop(&mut app)?;
    info!(target: "runtime", "shutdown");
    Ok(())
}

/// The cooperative loop: one event (or tick) is fully processed — mutation,
/// cache invalidation, viewport reconciliation — before the next is read,
/// and the screen repaints only when a handler reports it stale.
fn event_loop(app: &mut App) -> Result<()> {
    let mut painter = Painter::new(stdout());
    painter.draw(&app.frame())?;
    while !app.should_quit() {
        let mut stale = if event::poll(TICK_INTERVAL).context("poll input")? {
            match event::read().context("read input")? {
                Event::Key(key) => app.handle_key(key),
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                    true
                }
                _ => false,
            }
        } else {
            false
        };
        stale |= app.tick(Instant::now());
        if stale && !app.should_quit() {
            painter.draw(&app.frame())?;
        }
    }
    Ok(())
}

/// File-backed logging, `RUST_LOG`-filtered. The log stays out of the way
/// of the alternate screen; losing it (read-only directory, second
/// instance) is not worth failing startup over.
fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("patina.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "patina.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

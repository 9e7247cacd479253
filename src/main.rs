//! Declarative terminal forms, layouts and tabbed panels.
//!
//! `formdeck form signup.yaml` runs the form on the terminal and, when it is
//! submitted, prints the values as JSON on stdout.
//! `formdeck check signup.yaml --kind form` builds it without a terminal.
//! `--format yaml` prints YAML instead, and `--values preset.yaml` fills
//! widgets in before the session starts.

use std::io::{self, stderr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use formdeck::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use formdeck::config::AppConfig;
use formdeck::shell::output;
use formdeck::{ui, Format, ImportError, Screen, ScreenKind};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), version, about = "Declarative terminal forms")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Print the submitted values as single-line JSON.
    #[arg(long, global = true)]
    compact: bool,

    /// Encoding of the submitted values.
    #[arg(long, value_enum, global = true, default_value_t = Format::Json)]
    format: Format,

    /// Preset widget values from a JSON or YAML file.
    #[arg(long, global = true, value_name = "FILE")]
    values: Option<PathBuf>,

    /// Write logs to this file instead of stderr (filter with RUST_LOG).
    #[arg(long = "log-file", global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the default key-binding file and exit.
    #[arg(long = "dump-config")]
    dump_config: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a form; prints the values on submit.
    Form { file: PathBuf },
    /// Run a layout.
    Layout { file: PathBuf },
    /// Run a tabbed panel; prints the values per group on submit.
    Tabs { file: PathBuf },
    /// Load and build a descriptor without opening the terminal.
    Check {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = ScreenKind::Form)]
        kind: ScreenKind,
    },
}

// ───────────────────────────────────────── logging ───────────

/// Logs go to `log_file` when given, otherwise to stderr. The returned guard
/// flushes the file writer when dropped.
fn init_tracing(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::from_default_env();
    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr) // never pollute stdout
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .with_context(|| format!("log file {} has no file name", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}

// ───────────────────────────────────────── check ─────────────

fn check(kind: ScreenKind, file: &Path, values: Option<&Path>) -> Result<()> {
    let mut screen = Screen::load(kind, file)
        .with_context(|| format!("checking {}", file.display()))?;
    eprintln!("{}: {}", file.display(), screen.summary());
    if let Some(values) = values {
        for failure in prefill(&mut screen, values)? {
            eprintln!("{}: {failure}", values.display());
        }
    }
    Ok(())
}

fn prefill(screen: &mut Screen, values: &Path) -> Result<Vec<ImportError>> {
    screen
        .prefill(values)
        .with_context(|| format!("presetting values from {}", values.display()))
}

// ───────────────────────────────────────── event loop ────────

async fn run(state: &mut AppState) -> Result<()> {
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // Widgets that size themselves from the terminal start out measured.
    let size = terminal.size()?;
    handler::handle_event(state, &AppEvent::Resize(size.width, size.height));

    let mut events = spawn_event_reader(Duration::from_millis(state.config.tick_rate_ms));
    let outcome = event_loop(&mut terminal, state, &mut events).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    outcome
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
    events: &mut tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        if state.needs_redraw {
            terminal.draw(|frame| ui::draw(frame, state))?;
            state.needs_redraw = false;
        }

        let Some(event) = events.recv().await else {
            tracing::warn!("terminal event stream closed");
            break;
        };
        handler::handle_event(state, &event);

        if state.should_quit {
            break;
        }
    }
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_file.as_deref())?;

    if cli.dump_config {
        print!("{}", AppConfig::default().serialise());
        return Ok(());
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };
    let (kind, file) = match command {
        Command::Check { file, kind } => return check(kind, &file, cli.values.as_deref()),
        Command::Form { file } => (ScreenKind::Form, file),
        Command::Layout { file } => (ScreenKind::Layout, file),
        Command::Tabs { file } => (ScreenKind::Tabs, file),
    };

    let mut screen = Screen::load(kind, &file)
        .with_context(|| format!("loading {}", file.display()))?;
    if let Some(values) = cli.values.as_deref() {
        prefill(&mut screen, values)?;
    }
    let mut state = AppState::new(screen, AppConfig::load());
    run(&mut state).await?;

    if handler::submitted(&state) {
        output::print_result(&state.screen, cli.format, !cli.compact)?;
    }
    Ok(())
}

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use deskfolio::actor::broadcast::BroadcastReceiver;
use deskfolio::actor::desktop::Desktop;
use deskfolio::actor::terminal::Terminal;
use deskfolio::common::config::{Config, LayoutMode, config_file};
use deskfolio::common::keys::KeyCombo;
use deskfolio::common::log;
use deskfolio::common::prefs::{FileStore, MemoryStore, PreferenceStore, preferences_file};
use deskfolio::layout_engine::{PositionMap, Viewport};
use serde::Serialize;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{info, warn};

#[derive(Parser)]
struct Cli {
    /// Read the configuration from this file instead of ~/.deskfolio.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1200.0)]
    width: f64,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Start in this layout regardless of the stored preference.
    #[arg(long)]
    layout: Option<LayoutMode>,

    /// Read commands from this file instead of stdin.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Do not read or write stored preferences.
    #[arg(long)]
    no_persist: bool,

    /// Check the configuration file and exit.
    #[arg(long)]
    validate: bool,

    /// Also print desktop events as they are broadcast.
    #[arg(long)]
    events: bool,
}

/// What gets printed after every input line.
#[derive(Serialize)]
struct Frame<'a> {
    input: &'a str,
    output: String,
    layout: LayoutMode,
    locked: bool,
    active: Option<&'a str>,
    taskbar: Vec<&'a str>,
    positions: &'a PositionMap,
}

fn main() -> anyhow::Result<()> {
    let opt: Cli = Parser::parse();
    log::init_logging();

    let path = opt.config.clone().unwrap_or_else(config_file);
    let mut config = if path.exists() {
        Config::read(&path)?
    } else {
        Config::default()
    };

    let issues = config.validate();
    if opt.validate {
        if issues.is_empty() {
            println!("{}: ok", path.display());
            return Ok(());
        }
        for issue in &issues {
            println!("{issue}");
        }
        bail!("{} configuration issue(s) in {}", issues.len(), path.display());
    }
    for issue in &issues {
        warn!("config: {issue}");
    }
    let fixes = config.auto_fix_values();
    if fixes > 0 {
        info!(fixes, "repaired configuration values");
    }

    let prefs = open_preferences(&opt, &config);

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(run(opt, config, prefs))
}

fn open_preferences(opt: &Cli, config: &Config) -> Box<dyn PreferenceStore> {
    if opt.no_persist || !config.settings.persist_preferences {
        return Box::new(MemoryStore::new());
    }
    match FileStore::open(preferences_file()) {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!("could not open preferences, not persisting: {e:#}");
            Box::new(MemoryStore::new())
        }
    }
}

async fn run(
    opt: Cli,
    config: Config,
    prefs: Box<dyn PreferenceStore>,
) -> anyhow::Result<()> {
    let (events_tx, events_rx) = deskfolio::actor::channel();
    let viewport = Viewport::new(opt.width, opt.height);
    let (mut desktop, orchestrator) = Desktop::new(&config, prefs, viewport, Some(events_tx));
    if let Some(mode) = opt.layout {
        desktop.layout().set_layout_mode(mode);
    }

    let layout_task = tokio::spawn(orchestrator.run());
    let event_task = tokio::spawn(print_events(events_rx, opt.events));

    let input: Box<dyn BufRead> = match &opt.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening script {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let mut terminal = Terminal::new();
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let output = execute_line(&mut desktop, &mut terminal, line);
        desktop.layout().flush().await;

        let positions = desktop.layout().positions();
        let frame = Frame {
            input: line,
            output,
            layout: desktop.layout().current_layout(),
            locked: desktop.layout().is_locked(),
            active: desktop.registry().active_tab().map(|t| t.id.as_str()),
            taskbar: desktop.registry().open_tabs().map(|t| t.id.as_str()).collect(),
            positions: &positions,
        };
        println!("{}", serde_json::to_string(&frame)?);
    }

    // Dropping the desktop drops the registry, which stops the orchestrator,
    // which in turn closes the event stream.
    drop(desktop);
    layout_task.await?;
    event_task.await?;
    Ok(())
}

/// Runs one script line. `key`, `resize`, `register` and `select` drive the
/// desktop directly; `term <cmd>` and anything else go to the terminal.
fn execute_line(desktop: &mut Desktop, terminal: &mut Terminal, line: &str) -> String {
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    match verb {
        "key" => match rest.parse::<KeyCombo>() {
            Ok(combo) => match desktop.handle_key(&combo) {
                Ok(()) => combo.to_string(),
                Err(e) => format!("Error: {e}"),
            },
            Err(e) => format!("Error: {e}"),
        },
        "resize" => {
            let mut dims = rest.split_whitespace().map(str::parse::<f64>);
            match (dims.next(), dims.next()) {
                (Some(Ok(width)), Some(Ok(height))) if width >= 0.0 && height >= 0.0 => {
                    desktop.resize(Viewport::new(width, height));
                    format!("Resized to {width}x{height}")
                }
                _ => "Error: usage: resize <width> <height>".to_string(),
            }
        }
        "register" => {
            let (id, title) = rest.split_once(char::is_whitespace).unwrap_or((rest, rest));
            if id.is_empty() {
                "Error: usage: register <id> [title]".to_string()
            } else if desktop.register_window(id, title.trim()) {
                format!("Registered {id}")
            } else {
                format!("{id} is already registered")
            }
        }
        "select" => match desktop.select_taskbar_entry(rest) {
            Ok(()) => format!("Selected {rest}"),
            Err(e) => format!("Error: {e}"),
        },
        "term" => terminal.execute(desktop, rest),
        _ => terminal.execute(desktop, line),
    }
}

async fn print_events(events: BroadcastReceiver, print: bool) {
    let mut events = UnboundedReceiverStream::new(events);
    while let Some((span, event)) = events.next().await {
        let _guard = span.enter();
        if !print {
            continue;
        }
        match serde_json::to_string(&event) {
            Ok(json) => println!("{json}"),
            Err(e) => warn!("could not serialize {event:?}: {e}"),
        }
    }
}

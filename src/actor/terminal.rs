//! The simulated terminal. Only the commands that drive the desktop are
//! implemented; everything else answers "command not found".

use std::str::FromStr;

use strum::IntoEnumIterator;
use tracing::debug;

use crate::actor::desktop::{CommandError, Desktop};
use crate::common::config::LayoutMode;
use crate::common::prefs::ThemeMode;
use crate::model::{RegistryError, TabState};

type Handler = fn(&mut Terminal, &mut Desktop, &[&str]) -> String;

struct Command {
    name: &'static str,
    description: &'static str,
    run: Handler,
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        description: "Show available commands",
        run: |_, _, _| help(),
    },
    Command {
        name: "about",
        description: "Open About Me window",
        run: |_, desktop, _| open(desktop, "about"),
    },
    Command {
        name: "skills",
        description: "Open Skills window",
        run: |_, desktop, _| open(desktop, "skills"),
    },
    Command {
        name: "projects",
        description: "Open Projects window",
        run: |_, desktop, _| open(desktop, "projects"),
    },
    Command {
        name: "contact",
        description: "Open Contact window",
        run: |_, desktop, _| open(desktop, "contact"),
    },
    Command {
        name: "open",
        description: "Open a window (open <id>)",
        run: |_, desktop, args| with_window(args, "open", |id| open(desktop, id)),
    },
    Command {
        name: "close",
        description: "Close a window (close <id>)",
        run: |_, desktop, args| {
            with_window(args, "close", |id| {
                report(desktop.close_window(id), format!("Closed {id}"))
            })
        },
    },
    Command {
        name: "minimize",
        description: "Minimize or restore a window (minimize <id>)",
        run: |_, desktop, args| {
            with_window(args, "minimize", |id| {
                let result = desktop.toggle_minimize(id);
                let now = if desktop.registry().is_visible(id) { "Restored" } else { "Minimized" };
                report(result, format!("{now} {id}"))
            })
        },
    },
    Command {
        name: "maximize",
        description: "Maximize or restore a window (maximize <id>)",
        run: |_, desktop, args| {
            with_window(args, "maximize", |id| {
                let result = desktop.toggle_maximize(id);
                let now =
                    if desktop.registry().is_maximized(id) { "Maximized" } else { "Restored" };
                report(result, format!("{now} {id}"))
            })
        },
    },
    Command {
        name: "focus",
        description: "Bring a window to the front (focus <id>)",
        run: |_, desktop, args| {
            with_window(args, "focus", |id| {
                report(desktop.focus_window(id), format!("Focused {id}"))
            })
        },
    },
    Command {
        name: "windows",
        description: "List windows and their state",
        run: |_, desktop, _| windows(desktop),
    },
    Command {
        name: "layout",
        description: "Change window layout (layout [grid|main-horizontal|main-vertical|floating])",
        run: |_, desktop, args| change_layout(desktop, args.first().copied()),
    },
    Command {
        name: "layout-list",
        description: "List available layouts",
        run: |_, desktop, _| list_layouts(desktop),
    },
    Command {
        name: "shortcuts",
        description: "Show keyboard shortcuts",
        run: |_, desktop, _| desktop.shortcuts_help(),
    },
    Command {
        name: "lock-positions",
        description: "Lock window positions so they don't change when clicking tabs",
        run: |_, desktop, _| lock(desktop, true),
    },
    Command {
        name: "unlock-positions",
        description: "Unlock window positions so they can change when clicking tabs",
        run: |_, desktop, _| lock(desktop, false),
    },
    Command {
        name: "theme",
        description: "Show or change the theme (theme [light|dark|auto])",
        run: |_, desktop, args| theme(desktop, args.first().copied()),
    },
    Command {
        name: "echo",
        description: "Display a message",
        run: |_, _, args| args.join(" "),
    },
    Command {
        name: "history",
        description: "Display command history",
        run: |term, _, _| term.history_listing(),
    },
    Command {
        name: "clear",
        description: "Clear the terminal",
        run: |term, _, _| {
            term.history.clear();
            String::new()
        },
    },
    Command {
        name: "exit",
        description: "Close terminal window",
        run: |_, desktop, _| {
            report(desktop.close_window("terminal"), "Terminal closed. Goodbye!".to_string())
        },
    },
];

/// Line-oriented command interpreter bound to a desktop.
#[derive(Debug, Default)]
pub struct Terminal {
    history: Vec<String>,
}

impl Terminal {
    pub fn new() -> Self { Self::default() }

    pub fn history(&self) -> &[String] { &self.history }

    /// Runs one input line and returns what the terminal prints.
    pub fn execute(&mut self, desktop: &mut Desktop, line: &str) -> String {
        let line = line.trim();
        if line.is_empty() {
            return String::new();
        }
        self.history.push(line.to_string());

        let mut words = line.split_whitespace();
        let Some(name) = words.next() else { return String::new() };
        let args: Vec<&str> = words.collect();
        let name = name.to_lowercase();

        match COMMANDS.iter().find(|c| c.name == name) {
            Some(command) => {
                debug!(command = command.name, ?args, "running terminal command");
                (command.run)(self, desktop, &args)
            }
            None => format!("Command not found: {name}. Type 'help' for available commands."),
        }
    }

    fn history_listing(&self) -> String {
        self.history
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{:>4}  {line}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn help() -> String {
    let mut out = String::from("Available commands:\n");
    for command in COMMANDS {
        out.push_str(&format!("  {:<16} {}\n", command.name, command.description));
    }
    out
}

fn with_window(args: &[&str], usage: &str, f: impl FnOnce(&str) -> String) -> String {
    match args.first() {
        Some(id) => f(id),
        None => format!("Error: Please specify a window.\nUsage: {usage} <id>"),
    }
}

fn report(result: Result<(), CommandError>, ok: String) -> String {
    match result {
        Ok(()) => ok,
        Err(CommandError::Registry(RegistryError::NotFound(id))) => {
            format!("Error: no such window: {id}")
        }
        Err(e) => format!("Error: {e}"),
    }
}

fn open(desktop: &mut Desktop, id: &str) -> String {
    let title = desktop.registry().get(id).map(|t| t.title.clone());
    let result = desktop.open_window(id);
    report(result, format!("Opening {}...", title.as_deref().unwrap_or(id)))
}

fn windows(desktop: &Desktop) -> String {
    desktop
        .tabs()
        .iter()
        .map(|tab| {
            let state = match tab.state() {
                TabState::Closed => "closed",
                TabState::Minimized => "minimized",
                TabState::Maximized => "maximized",
                TabState::Visible => "visible",
            };
            let marker = if tab.active { '*' } else { ' ' };
            format!("{marker} {:<12} {:<10} {}", tab.id.as_str(), state, tab.title)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn change_layout(desktop: &mut Desktop, arg: Option<&str>) -> String {
    let Some(arg) = arg else {
        return format!(
            "Error: Please specify a layout type.\nUsage: layout [{}]",
            layout_names().join("|")
        );
    };
    match LayoutMode::from_str(arg) {
        Ok(mode) => {
            desktop.set_layout(mode);
            format!("Layout changed to: {mode}")
        }
        Err(_) => format!(
            "Error: Invalid layout type: {arg}\nValid layouts: {}",
            layout_names().join(", ")
        ),
    }
}

fn layout_names() -> Vec<String> { LayoutMode::iter().map(|m| m.to_string()).collect() }

fn list_layouts(desktop: &Desktop) -> String {
    let current = desktop.layout().current_layout();
    let mut out = String::from("Available window layouts:\n");
    for mode in LayoutMode::iter() {
        let (marker, note) = if mode == current {
            ('*', "Currently active")
        } else {
            ('o', mode.description())
        };
        out.push_str(&format!("{marker} {mode}\n  {note}\n"));
    }
    out.push_str("Usage: layout [name]");
    out
}

fn lock(desktop: &mut Desktop, locked: bool) -> String {
    desktop.set_lock_positions(locked);
    if locked {
        "Window positions locked\nWindows will stay in their current positions".to_string()
    } else {
        "Window positions unlocked\nWindows will rearrange when you click tabs".to_string()
    }
}

fn theme(desktop: &mut Desktop, arg: Option<&str>) -> String {
    let next = match arg {
        None => desktop.theme().next(),
        Some(arg) => match ThemeMode::from_str(arg) {
            Ok(theme) => theme,
            Err(_) => return format!("Error: Invalid theme: {arg}\nValid themes: light, dark, auto"),
        },
    };
    desktop.set_theme(next);
    format!("Theme set to {next}")
}

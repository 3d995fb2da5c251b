//! The desktop controller: owns the registry, the layout handle and the
//! user's preferences, and turns commands from the shortcut table and the
//! terminal into registry and layout calls.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::actor::broadcast::{BroadcastEvent, BroadcastSender};
use crate::actor::orchestrator::{LayoutControls, LayoutHandle, LayoutOrchestrator};
use crate::common::config::{Config, LayoutMode};
use crate::common::keys::KeyCombo;
use crate::common::prefs::{self, LAYOUT_KEY, PreferenceStore, THEME_KEY, ThemeMode};
use crate::layout_engine::{TilingEngine, Viewport};
use crate::model::{RegistryError, Tab, TabId, TabRegistry};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DesktopCommand {
    SetLayout(LayoutMode),
    ShowShortcuts,
    OpenWindow(TabId),
    CloseWindow(TabId),
    FocusWindow(TabId),
    ToggleMinimize(TabId),
    ToggleMaximize(TabId),
    SelectTaskbarEntry(TabId),
    SetLockPositions(bool),
    CycleTheme,
}

impl DesktopCommand {
    /// One-line description for the shortcut overlay.
    pub fn describe(&self) -> String {
        match self {
            DesktopCommand::SetLayout(mode) => format!("Switch to {mode} layout"),
            DesktopCommand::ShowShortcuts => "Show keyboard shortcuts".to_string(),
            DesktopCommand::OpenWindow(id) => format!("Open {id}"),
            DesktopCommand::CloseWindow(id) => format!("Close {id}"),
            DesktopCommand::FocusWindow(id) => format!("Focus {id}"),
            DesktopCommand::ToggleMinimize(id) => format!("Minimize or restore {id}"),
            DesktopCommand::ToggleMaximize(id) => format!("Maximize or restore {id}"),
            DesktopCommand::SelectTaskbarEntry(id) => format!("Taskbar click on {id}"),
            DesktopCommand::SetLockPositions(true) => "Lock window positions".to_string(),
            DesktopCommand::SetLockPositions(false) => "Unlock window positions".to_string(),
            DesktopCommand::CycleTheme => "Cycle theme".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("no binding for {0}")]
    Unbound(KeyCombo),
}

pub type Result<T> = std::result::Result<T, CommandError>;

pub struct Desktop {
    registry: TabRegistry,
    layout: LayoutHandle,
    keys: Vec<(KeyCombo, DesktopCommand)>,
    prefs: Box<dyn PreferenceStore>,
    theme: ThemeMode,
    shortcuts_visible: bool,
    broadcast: Option<BroadcastSender>,
}

impl Desktop {
    /// Builds the desktop and the orchestrator that lays it out. The caller
    /// is expected to spawn [`LayoutOrchestrator::run`].
    ///
    /// Stored preferences win over the config file for theme and layout mode.
    pub fn new(
        config: &Config,
        prefs: Box<dyn PreferenceStore>,
        viewport: Viewport,
        broadcast: Option<BroadcastSender>,
    ) -> (Self, LayoutOrchestrator) {
        let settings = &config.settings;
        let mut registry = TabRegistry::new();
        for window in &settings.windows {
            registry.register_tab(window.id.as_str(), window.title.as_str());
        }

        let mode = prefs::load(prefs.as_ref(), LAYOUT_KEY).unwrap_or(settings.layout.mode);
        let theme = prefs::load(prefs.as_ref(), THEME_KEY).unwrap_or(settings.theme);
        info!(%mode, %theme, windows = settings.windows.len(), "starting desktop");

        let (orchestrator, layout) = LayoutOrchestrator::new(
            TilingEngine::new(settings.layout.clone()),
            registry.subscribe(),
            LayoutControls {
                mode,
                locked: settings.layout.lock_positions,
            },
            viewport,
            broadcast.clone(),
        );

        let desktop = Desktop {
            registry,
            layout,
            keys: config.keys.clone(),
            prefs,
            theme,
            shortcuts_visible: false,
            broadcast,
        };
        (desktop, orchestrator)
    }

    pub fn registry(&self) -> &TabRegistry { &self.registry }

    pub fn layout(&self) -> &LayoutHandle { &self.layout }

    pub fn theme(&self) -> ThemeMode { self.theme }

    pub fn shortcuts_visible(&self) -> bool { self.shortcuts_visible }

    pub fn tabs(&self) -> &[Tab] { self.registry.tabs() }

    /// Registers a panel after startup. Returns `false` if the id is taken.
    pub fn register_window(&mut self, id: &str, title: &str) -> bool {
        self.registry.register_tab(id, title)
    }

    pub fn handle_key(&mut self, combo: &KeyCombo) -> Result<()> {
        let Some(command) = self.command_for(combo).cloned() else {
            debug!(%combo, "unbound key");
            return Err(CommandError::Unbound(combo.clone()));
        };
        debug!(%combo, ?command, "key binding matched");
        self.handle_command(&command)
    }

    pub fn handle_command(&mut self, command: &DesktopCommand) -> Result<()> {
        match command {
            DesktopCommand::SetLayout(mode) => self.set_layout(*mode),
            DesktopCommand::ShowShortcuts => {
                self.shortcuts_visible = !self.shortcuts_visible;
                debug!(visible = self.shortcuts_visible, "toggled shortcut overlay");
            }
            DesktopCommand::OpenWindow(id) => self.registry.open_tab(id.as_str())?,
            DesktopCommand::CloseWindow(id) => self.registry.close_tab(id.as_str())?,
            DesktopCommand::FocusWindow(id) => self.registry.set_active_tab(id.as_str())?,
            DesktopCommand::ToggleMinimize(id) => self.registry.toggle_minimize(id.as_str())?,
            DesktopCommand::ToggleMaximize(id) => self.registry.maximize_tab(id.as_str())?,
            DesktopCommand::SelectTaskbarEntry(id) => {
                self.registry.select_taskbar_entry(id.as_str())?
            }
            DesktopCommand::SetLockPositions(locked) => self.layout.set_lock_positions(*locked),
            DesktopCommand::CycleTheme => self.set_theme(self.theme.next()),
        }
        Ok(())
    }

    pub fn open_window(&mut self, id: &str) -> Result<()> { Ok(self.registry.open_tab(id)?) }

    pub fn close_window(&mut self, id: &str) -> Result<()> { Ok(self.registry.close_tab(id)?) }

    pub fn focus_window(&mut self, id: &str) -> Result<()> {
        Ok(self.registry.set_active_tab(id)?)
    }

    pub fn toggle_minimize(&mut self, id: &str) -> Result<()> {
        Ok(self.registry.toggle_minimize(id)?)
    }

    pub fn toggle_maximize(&mut self, id: &str) -> Result<()> {
        Ok(self.registry.maximize_tab(id)?)
    }

    pub fn select_taskbar_entry(&mut self, id: &str) -> Result<()> {
        Ok(self.registry.select_taskbar_entry(id)?)
    }

    /// Switches the layout mode and remembers it for the next run.
    pub fn set_layout(&mut self, mode: LayoutMode) {
        self.layout.set_layout_mode(mode);
        self.persist(LAYOUT_KEY, &mode.to_string());
    }

    pub fn set_lock_positions(&mut self, locked: bool) { self.layout.set_lock_positions(locked); }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        if theme == self.theme {
            return;
        }
        info!(from = %self.theme, to = %theme, "theme changed");
        self.theme = theme;
        self.persist(THEME_KEY, &theme.to_string());
        if let Some(tx) = &self.broadcast {
            tx.send(BroadcastEvent::ThemeChanged { theme });
        }
    }

    pub fn resize(&self, viewport: Viewport) { self.layout.resize(viewport); }

    pub fn command_for(&self, combo: &KeyCombo) -> Option<&DesktopCommand> {
        self.keys.iter().find(|(k, _)| k == combo).map(|(_, cmd)| cmd)
    }

    /// Text of the shortcut overlay.
    pub fn shortcuts_help(&self) -> String {
        let mut help = String::from("Keyboard shortcuts:\n");
        for (combo, command) in &self.keys {
            help.push_str(&format!("  {:<12} {}\n", combo.to_string(), command.describe()));
        }
        help.push_str("\nLayouts:\n");
        let current = self.layout.current_layout();
        for mode in LayoutMode::iter() {
            let marker = if mode == current { '*' } else { ' ' };
            help.push_str(&format!("  {marker} {:<16} {}\n", mode.to_string(), mode.description()));
        }
        let lock = if self.layout.is_locked() { "locked" } else { "unlocked" };
        help.push_str(&format!("\nWindow positions are {lock}.\n"));
        help
    }

    fn persist(&mut self, key: &str, value: &str) {
        if let Err(e) = self.prefs.set(key, value) {
            warn!(key, value, "could not save preference: {e:#}");
        }
    }
}

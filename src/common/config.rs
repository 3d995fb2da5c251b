use std::path::{Path, PathBuf};

use anyhow::Context;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::actor::desktop::DesktopCommand;
use crate::common::keys::KeyCombo;
use crate::common::prefs::ThemeMode;

pub fn data_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(std::env::temp_dir).join(".deskfolio")
}
pub fn config_file() -> PathBuf {
    dirs::home_dir().unwrap_or_else(std::env::temp_dir).join(".deskfolio.toml")
}

#[derive(Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    keys: FxHashMap<String, DesktopCommand>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Config {
    pub settings: Settings,
    pub keys: Vec<(KeyCombo, DesktopCommand)>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub theme: ThemeMode,
    /// Keep theme and layout choices across runs.
    #[serde(default = "yes")]
    pub persist_preferences: bool,
    #[serde(default)]
    pub layout: LayoutSettings,
    /// Panels registered at startup, in registration order. The first one
    /// starts open and focused.
    #[serde(default = "default_windows")]
    pub windows: Vec<WindowEntry>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
pub struct WindowEntry {
    pub id: String,
    pub title: String,
}

/// Layout mode enum
#[derive(
    Serialize,
    Deserialize,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Clone,
    Copy,
    Default,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum LayoutMode {
    /// Equal cells, row-major, ordered by window id.
    Grid,
    /// Focused window on top, the rest in a row underneath.
    MainHorizontal,
    /// Focused window on the left, the rest in a column beside it.
    MainVertical,
    /// Cascaded windows at a preferred size.
    #[default]
    Floating,
}

impl LayoutMode {
    pub fn description(self) -> &'static str {
        match self {
            LayoutMode::Grid => "Equal grid distribution for all windows",
            LayoutMode::MainHorizontal => "Main window + horizontal stack",
            LayoutMode::MainVertical => "Main window + vertical stack",
            LayoutMode::Floating => "Free-floating windows",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    /// Layout used until the user picks another one.
    #[serde(default)]
    pub mode: LayoutMode,
    /// Start with positions locked.
    #[serde(default)]
    pub lock_positions: bool,
    /// Space between neighbouring windows (in pixels)
    #[serde(default = "default_gap")]
    pub gap: f64,
    /// Space between windows and the viewport edges (in pixels)
    #[serde(default = "default_margin")]
    pub margin: f64,
    /// Height of the taskbar band at the top of the viewport. Windows are
    /// never placed above it.
    #[serde(default = "default_header_height")]
    pub header_height: f64,
    /// Inset of a maximized window from the viewport edges.
    #[serde(default = "default_maximized_margin")]
    pub maximized_margin: f64,
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub stack: StackSettings,
    #[serde(default)]
    pub floating: FloatingSettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct GridSettings {
    /// Share of the available area a lone window gets, per axis.
    #[serde(default = "default_single_window_ratio")]
    pub single_window_ratio: f64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct StackSettings {
    /// Share of the available area given to the main window along the split axis.
    #[serde(default = "default_main_ratio")]
    pub main_ratio: f64,
    /// Upper bound on the main window's width.
    #[serde(default = "default_max_main_width")]
    pub max_main_width: f64,
    /// Size of a lone window in the stack layouts.
    #[serde(default = "default_single_width")]
    pub single_width: f64,
    #[serde(default = "default_single_height")]
    pub single_height: f64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct FloatingSettings {
    /// Preferred window size, clamped to the available area.
    #[serde(default = "default_floating_width")]
    pub width: f64,
    #[serde(default = "default_floating_height")]
    pub height: f64,
    /// Per-window diagonal shift of the cascade.
    #[serde(default = "default_cascade_offset")]
    pub cascade_offset: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            persist_preferences: true,
            layout: LayoutSettings::default(),
            windows: default_windows(),
        }
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            mode: LayoutMode::default(),
            lock_positions: false,
            gap: default_gap(),
            margin: default_margin(),
            header_height: default_header_height(),
            maximized_margin: default_maximized_margin(),
            grid: GridSettings::default(),
            stack: StackSettings::default(),
            floating: FloatingSettings::default(),
        }
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            single_window_ratio: default_single_window_ratio(),
        }
    }
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            main_ratio: default_main_ratio(),
            max_main_width: default_max_main_width(),
            single_width: default_single_width(),
            single_height: default_single_height(),
        }
    }
}

impl Default for FloatingSettings {
    fn default() -> Self {
        Self {
            width: default_floating_width(),
            height: default_floating_height(),
            cascade_offset: default_cascade_offset(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.windows.is_empty() {
            issues.push("at least one window must be configured".to_string());
        }

        let mut seen = crate::common::collections::HashSet::default();
        for (index, window) in self.windows.iter().enumerate() {
            if window.id.trim().is_empty() {
                issues.push(format!("Window {} has an empty id", index));
            } else if !seen.insert(window.id.as_str()) {
                issues.push(format!("Duplicate window id '{}' in entry {}", window.id, index));
            }
        }

        issues.extend(self.layout.validate());

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        let before = self.windows.len();
        let mut seen = crate::common::collections::HashSet::default();
        self.windows
            .retain(|w| !w.id.trim().is_empty() && seen.insert(w.id.clone()));
        fixes += before - self.windows.len();

        if self.windows.is_empty() {
            self.windows = default_windows();
            fixes += 1;
        }

        fixes += self.layout.auto_fix_values();

        fixes
    }
}

impl LayoutSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for (name, value) in [
            ("gap", self.gap),
            ("margin", self.margin),
            ("header_height", self.header_height),
            ("maximized_margin", self.maximized_margin),
        ] {
            if !is_non_negative(value) {
                issues.push(format!("{} must be non-negative, got {}", name, value));
            }
        }

        issues.extend(self.grid.validate());
        issues.extend(self.stack.validate());
        issues.extend(self.floating.validate());

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if !is_non_negative(self.gap) {
            self.gap = default_gap();
            fixes += 1;
        }
        if !is_non_negative(self.margin) {
            self.margin = default_margin();
            fixes += 1;
        }
        if !is_non_negative(self.header_height) {
            self.header_height = default_header_height();
            fixes += 1;
        }
        if !is_non_negative(self.maximized_margin) {
            self.maximized_margin = default_maximized_margin();
            fixes += 1;
        }

        fixes + self.grid.auto_fix_values()
            + self.stack.auto_fix_values()
            + self.floating.auto_fix_values()
    }
}

fn is_ratio(value: f64) -> bool { value > 0.0 && value <= 1.0 }

fn is_positive(value: f64) -> bool { value.is_finite() && value > 0.0 }

fn is_non_negative(value: f64) -> bool { value.is_finite() && value >= 0.0 }

impl GridSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !is_ratio(self.single_window_ratio) {
            issues.push(format!(
                "grid.single_window_ratio must be in (0, 1], got {}",
                self.single_window_ratio
            ));
        }
        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        if is_ratio(self.single_window_ratio) {
            return 0;
        }
        self.single_window_ratio = default_single_window_ratio();
        1
    }
}

impl StackSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(self.main_ratio > 0.0 && self.main_ratio < 1.0) {
            issues.push(format!(
                "stack.main_ratio must be in (0, 1), got {}",
                self.main_ratio
            ));
        }

        for (name, value) in [
            ("stack.max_main_width", self.max_main_width),
            ("stack.single_width", self.single_width),
            ("stack.single_height", self.single_height),
        ] {
            if !is_positive(value) {
                issues.push(format!("{} must be positive, got {}", name, value));
            }
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if !(self.main_ratio > 0.0 && self.main_ratio < 1.0) {
            self.main_ratio = default_main_ratio();
            fixes += 1;
        }
        if !is_positive(self.max_main_width) {
            self.max_main_width = default_max_main_width();
            fixes += 1;
        }
        if !is_positive(self.single_width) {
            self.single_width = default_single_width();
            fixes += 1;
        }
        if !is_positive(self.single_height) {
            self.single_height = default_single_height();
            fixes += 1;
        }

        fixes
    }
}

impl FloatingSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !is_positive(self.width) {
            issues.push(format!("floating.width must be positive, got {}", self.width));
        }
        if !is_positive(self.height) {
            issues.push(format!("floating.height must be positive, got {}", self.height));
        }
        if !is_non_negative(self.cascade_offset) {
            issues.push(format!(
                "floating.cascade_offset must be non-negative, got {}",
                self.cascade_offset
            ));
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if !is_positive(self.width) {
            self.width = default_floating_width();
            fixes += 1;
        }
        if !is_positive(self.height) {
            self.height = default_floating_height();
            fixes += 1;
        }
        if !is_non_negative(self.cascade_offset) {
            self.cascade_offset = default_cascade_offset();
            fixes += 1;
        }

        fixes
    }
}

fn yes() -> bool { true }

fn default_gap() -> f64 { 24.0 }

fn default_margin() -> f64 { 40.0 }

// taskbar offset(8) + height(28) + padding(4) + border(2) + gap(8)
fn default_header_height() -> f64 { 50.0 }

fn default_maximized_margin() -> f64 { 8.0 }

fn default_single_window_ratio() -> f64 { 0.85 }

fn default_main_ratio() -> f64 { 0.6 }

fn default_max_main_width() -> f64 { 800.0 }

fn default_single_width() -> f64 { 720.0 }

fn default_single_height() -> f64 { 480.0 }

fn default_floating_width() -> f64 { 1000.0 }

fn default_floating_height() -> f64 { 620.0 }

fn default_cascade_offset() -> f64 { 30.0 }

fn default_windows() -> Vec<WindowEntry> {
    [
        ("about", "About Me"),
        ("skills", "Skills"),
        ("projects", "Projects"),
        ("contact", "Contact"),
        ("terminal", "Terminal"),
    ]
    .into_iter()
    .map(|(id, title)| WindowEntry {
        id: id.to_string(),
        title: title.to_string(),
    })
    .collect()
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&buf)
    }

    pub fn default() -> Config {
        Self::parse(include_str!("../../deskfolio.default.toml"))
            .expect("embedded default config is valid")
    }

    /// Save the current config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let config_file = ConfigFile {
            settings: self.settings.clone(),
            keys: self
                .keys
                .iter()
                .map(|(combo, command)| (combo.to_string(), command.clone()))
                .collect(),
        };

        let toml_string = toml::to_string_pretty(&config_file)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;

        Ok(())
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> { self.settings.validate() }

    /// Attempts to fix configuration values automatically.
    /// Returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize { self.settings.auto_fix_values() }

    pub fn command_for(&self, combo: &KeyCombo) -> Option<&DesktopCommand> {
        self.keys.iter().find(|(k, _)| k == combo).map(|(_, cmd)| cmd)
    }

    fn parse(buf: &str) -> anyhow::Result<Config> {
        let c: ConfigFile = toml::from_str(buf)?;
        let mut keys = Vec::with_capacity(c.keys.len());
        for (key, cmd) in c.keys {
            let combo: KeyCombo =
                key.parse().with_context(|| format!("Could not parse key binding: {key}"))?;
            keys.push((combo, cmd));
        }
        // Map iteration order is arbitrary; keep help output stable.
        keys.sort_by_key(|(combo, _)| combo.to_string());
        Ok(Config { settings: c.settings, keys })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config_parses() { super::Config::default(); }

    #[test]
    fn default_config_matches_builtin_defaults() {
        let config = Config::default();
        assert_eq!(config.settings.layout, LayoutSettings::default());
        assert_eq!(config.settings.windows, default_windows());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn default_keys_cover_layout_switching() {
        let config = Config::default();
        for (combo, mode) in [
            ("Meta+g", LayoutMode::Grid),
            ("Ctrl+g", LayoutMode::Grid),
            ("Meta+h", LayoutMode::MainHorizontal),
            ("Ctrl+v", LayoutMode::MainVertical),
            ("Meta+f", LayoutMode::Floating),
        ] {
            let combo: KeyCombo = combo.parse().unwrap();
            assert_eq!(
                config.command_for(&combo),
                Some(&DesktopCommand::SetLayout(mode)),
                "{combo}"
            );
        }
        let help: KeyCombo = "Ctrl+?".parse().unwrap();
        assert_eq!(config.command_for(&help), Some(&DesktopCommand::ShowShortcuts));
    }

    #[test]
    fn layout_mode_string_forms() {
        assert_eq!(LayoutMode::MainHorizontal.to_string(), "main-horizontal");
        assert_eq!("Main-Vertical".parse::<LayoutMode>().unwrap(), LayoutMode::MainVertical);
        assert!("tabbed".parse::<LayoutMode>().is_err());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config = Config::parse(
            r#"
            [settings.layout]
            mode = "grid"
            gap = 10.0

            [keys]
            "Alt + 1" = { open_window = "about" }
            "#,
        )
        .unwrap();
        assert_eq!(config.settings.layout.mode, LayoutMode::Grid);
        assert_eq!(config.settings.layout.gap, 10.0);
        assert_eq!(config.settings.layout.margin, 40.0);
        assert_eq!(config.settings.windows.len(), 5);
        assert_eq!(config.keys.len(), 1);
        assert_eq!(config.keys[0].0.to_string(), "Alt+1");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Config::parse("[settings.layout]\ngutter = 3.0\n").is_err());
        assert!(Config::parse("[keys]\n\"Ctrl+\" = \"show_shortcuts\"\n").is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.settings.layout.gap = -1.0;
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("gap must be non-negative"));

        let fixes = config.auto_fix_values();
        assert_eq!(fixes, 1);
        assert_eq!(config.settings.layout.gap, 24.0);

        config.settings.layout.stack.main_ratio = 1.5;
        config.settings.layout.floating.width = 0.0;
        assert_eq!(config.validate().len(), 2);
        assert_eq!(config.auto_fix_values(), 2);
        assert_eq!(config.settings.layout.stack.main_ratio, 0.6);
        assert_eq!(config.settings.layout.floating.width, 1000.0);
    }

    #[test]
    fn non_finite_values_are_rejected_and_fixed() {
        let mut config = Config::parse(
            r#"
            [settings.layout]
            gap = nan
            margin = inf

            [settings.layout.floating]
            width = inf
            cascade_offset = nan
            "#,
        )
        .unwrap();
        assert_eq!(config.validate().len(), 4);

        assert_eq!(config.auto_fix_values(), 4);
        assert!(config.validate().is_empty());
        assert_eq!(config.settings.layout, LayoutSettings::default());
    }

    #[test]
    fn duplicate_windows_are_reported_and_dropped() {
        let mut config = Config::default();
        config.settings.windows.push(WindowEntry {
            id: "about".into(),
            title: "Again".into(),
        });
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("Duplicate window id 'about'"));

        assert_eq!(config.auto_fix_values(), 1);
        assert_eq!(config.settings.windows.len(), 5);
    }

    #[test]
    fn save_then_read_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deskfolio.toml");

        let mut config = Config::default();
        config.settings.layout.mode = LayoutMode::MainVertical;
        config.save(&path).unwrap();

        let loaded = Config::read(&path).unwrap();
        assert_eq!(loaded.settings, config.settings);
        assert_eq!(loaded.keys.len(), config.keys.len());
    }
}

//! Keyboard combinations as the shortcut table sees them.
//!
//! A combo is written `Meta+Ctrl+Alt+Shift+key` with modifiers always in that
//! order and the key lowercased. Named keys are shortened the same way the
//! host reports them: `ArrowUp` becomes `up`, `Escape` becomes `esc` and the
//! space bar becomes `space`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct KeyCombo {
    pub meta: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub key: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyComboError {
    #[error("key combination is empty")]
    Empty,
    #[error("key combination '{0}' has no key, only modifiers")]
    MissingKey(String),
    #[error("key combination '{0}' names more than one key")]
    MultipleKeys(String),
}

impl KeyCombo {
    /// Builds a combo from a raw key event.
    pub fn from_event(key: &str, meta: bool, ctrl: bool, alt: bool, shift: bool) -> Self {
        Self {
            meta,
            ctrl,
            alt,
            shift,
            key: normalize_key(key),
        }
    }
}

fn normalize_key(key: &str) -> String {
    if key == " " {
        return "space".to_string();
    }
    let lower = key.trim().to_lowercase();
    match lower.as_str() {
        "escape" => "esc".to_string(),
        "arrowup" => "up".to_string(),
        "arrowdown" => "down".to_string(),
        "arrowleft" => "left".to_string(),
        "arrowright" => "right".to_string(),
        _ => lower,
    }
}

impl FromStr for KeyCombo {
    type Err = KeyComboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyComboError::Empty);
        }

        // A trailing "++" means the key itself is '+'.
        let (body, plus_key) = match s.strip_suffix("++") {
            Some(rest) => (rest, true),
            None => (s, false),
        };

        let mut combo = KeyCombo::default();
        let mut key: Option<String> = plus_key.then(|| "+".to_string());
        for part in body.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "meta" | "cmd" | "win" | "super" => combo.meta = true,
                "ctrl" | "control" => combo.ctrl = true,
                "alt" | "option" => combo.alt = true,
                "shift" => combo.shift = true,
                _ => {
                    if key.is_some() {
                        return Err(KeyComboError::MultipleKeys(s.to_string()));
                    }
                    key = Some(normalize_key(part));
                }
            }
        }

        combo.key = key.ok_or_else(|| KeyComboError::MissingKey(s.to_string()))?;
        Ok(combo)
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = [
            (self.meta, "Meta"),
            (self.ctrl, "Ctrl"),
            (self.alt, "Alt"),
            (self.shift, "Shift"),
        ];
        for (_, name) in modifiers.iter().filter(|(on, _)| *on) {
            write!(f, "{name}+")?;
        }
        f.write_str(&self.key)
    }
}

impl Serialize for KeyCombo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeyCombo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

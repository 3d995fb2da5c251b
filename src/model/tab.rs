use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Stable identifier of a registered panel, e.g. `about` or `terminal`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Debug for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "TabId({})", self.0) }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for TabId {
    fn from(value: &str) -> Self { Self(value.to_string()) }
}

impl From<String> for TabId {
    fn from(value: String) -> Self { Self(value) }
}

impl Borrow<str> for TabId {
    fn borrow(&self) -> &str { &self.0 }
}

impl PartialEq<str> for TabId {
    fn eq(&self, other: &str) -> bool { self.0 == other }
}

impl PartialEq<&str> for TabId {
    fn eq(&self, other: &&str) -> bool { self.0 == *other }
}

pub type ZIndex = u64;

/// Stacking level reported for a maximized window, above anything the
/// allocator will realistically hand out.
pub const MAXIMIZED_Z_INDEX: ZIndex = 9999;

/// One registered panel.
///
/// A closed tab is stored as `open = false, minimized = true`; [`Tab::state`]
/// gives the collapsed view.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Tab {
    pub id: TabId,
    pub title: String,
    pub active: bool,
    pub open: bool,
    pub minimized: bool,
    pub maximized: bool,
    pub z_index: ZIndex,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TabState {
    Closed,
    Minimized,
    Maximized,
    Visible,
}

impl Tab {
    pub fn state(&self) -> TabState {
        if !self.open {
            TabState::Closed
        } else if self.minimized {
            TabState::Minimized
        } else if self.maximized {
            TabState::Maximized
        } else {
            TabState::Visible
        }
    }

    /// Open and not minimized. Maximized windows count as shown.
    pub fn is_shown(&self) -> bool { self.open && !self.minimized }

    /// Participates in tiling.
    pub fn is_tileable(&self) -> bool { self.is_shown() && !self.maximized }

    /// Stacking level the rendering layer should use.
    pub fn effective_z_index(&self) -> ZIndex {
        if self.maximized { MAXIMIZED_Z_INDEX } else { self.z_index }
    }
}

/// Immutable view of the registry handed to observers.
pub type TabSnapshot = Arc<Vec<Tab>>;

/// The focused tab among shown tabs, if any.
pub fn active_id(tabs: &[Tab]) -> Option<&TabId> {
    tabs.iter().find(|t| t.active && t.is_shown()).map(|t| &t.id)
}

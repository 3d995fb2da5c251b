//! The tab registry is the single owner of panel state.
//!
//! Every transition keeps these invariants:
//! - ids are unique;
//! - if any tab is open and not minimized, exactly one such tab is active, and
//!   no other tab is;
//! - at most one tab is maximized;
//! - z-indices come from a counter that only moves forward.
//!
//! Observers get a fresh [`TabSnapshot`] after every successful mutation.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, trace};

use super::tab::{Tab, TabId, TabSnapshot, ZIndex};

/// Stacking counter origin; the first registered tab gets `BASE_Z_INDEX + 1`.
const BASE_Z_INDEX: ZIndex = 100;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no such window: {0}")]
    NotFound(TabId),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug)]
pub struct TabRegistry {
    tabs: Vec<Tab>,
    last_z_index: ZIndex,
    changes: watch::Sender<TabSnapshot>,
}

impl Default for TabRegistry {
    fn default() -> Self { Self::new() }
}

impl TabRegistry {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            tabs: Vec::new(),
            last_z_index: BASE_Z_INDEX,
            changes,
        }
    }

    /// Subscribes to change notifications. The receiver starts out holding
    /// the current snapshot, marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<TabSnapshot> { self.changes.subscribe() }

    pub fn tabs(&self) -> &[Tab] { &self.tabs }

    pub fn snapshot(&self) -> TabSnapshot { self.changes.borrow().clone() }

    /// Tabs that have a taskbar entry.
    pub fn open_tabs(&self) -> impl Iterator<Item = &Tab> { self.tabs.iter().filter(|t| t.open) }

    pub fn get(&self, id: &str) -> Option<&Tab> { self.tabs.iter().find(|t| t.id == id) }

    pub fn active_tab(&self) -> Option<&Tab> { self.tabs.iter().find(|t| t.active) }

    pub fn is_visible(&self, id: &str) -> bool { self.get(id).is_some_and(Tab::is_shown) }

    pub fn is_maximized(&self, id: &str) -> bool { self.get(id).is_some_and(|t| t.maximized) }

    pub fn has_maximized(&self) -> bool { self.tabs.iter().any(|t| t.maximized) }

    pub fn z_index_of(&self, id: &str) -> Option<ZIndex> {
        self.get(id).map(Tab::effective_z_index)
    }

    /// Adds a panel. Returns `false` and changes nothing if the id is taken.
    ///
    /// Only the very first registered tab starts open and focused.
    pub fn register_tab(&mut self, id: impl Into<TabId>, title: impl Into<String>) -> bool {
        let id = id.into();
        if self.get(id.as_str()).is_some() {
            trace!(%id, "tab already registered");
            return false;
        }
        let first = self.tabs.is_empty();
        let z_index = self.allocate_z_index();
        debug!(%id, first, z_index, "registering tab");
        self.tabs.push(Tab {
            id,
            title: title.into(),
            active: first,
            open: first,
            minimized: false,
            maximized: false,
            z_index,
        });
        self.repair_active();
        self.publish();
        true
    }

    /// Focuses a tab, summoning it if needed. Maximized flags are untouched.
    pub fn set_active_tab(&mut self, id: &str) -> Result<()> {
        let idx = self.index_of(id)?;
        let z_index = self.allocate_z_index();
        for (i, tab) in self.tabs.iter_mut().enumerate() {
            tab.active = i == idx;
        }
        let tab = &mut self.tabs[idx];
        tab.open = true;
        tab.minimized = false;
        tab.z_index = z_index;
        debug!(id, z_index, "focused tab");
        self.publish();
        Ok(())
    }

    /// Minimizes a shown tab or restores a minimized one. Either way the tab
    /// leaves the maximized state.
    pub fn toggle_minimize(&mut self, id: &str) -> Result<()> {
        let idx = self.index_of(id)?;
        let restoring = self.tabs[idx].minimized;
        if restoring {
            let z_index = self.allocate_z_index();
            for (i, tab) in self.tabs.iter_mut().enumerate() {
                tab.active = i == idx;
            }
            let tab = &mut self.tabs[idx];
            tab.open = true;
            tab.minimized = false;
            tab.z_index = z_index;
        } else {
            let tab = &mut self.tabs[idx];
            tab.minimized = true;
            tab.active = false;
        }
        self.tabs[idx].maximized = false;
        debug!(id, restoring, "toggled minimize");
        self.repair_active();
        self.publish();
        Ok(())
    }

    pub fn close_tab(&mut self, id: &str) -> Result<()> {
        let idx = self.index_of(id)?;
        let tab = &mut self.tabs[idx];
        tab.open = false;
        tab.minimized = true;
        tab.active = false;
        tab.maximized = false;
        debug!(id, "closed tab");
        self.repair_active();
        self.publish();
        Ok(())
    }

    /// Opens and focuses a tab. Other tabs only lose focus.
    pub fn open_tab(&mut self, id: &str) -> Result<()> {
        let idx = self.index_of(id)?;
        let z_index = self.allocate_z_index();
        for (i, tab) in self.tabs.iter_mut().enumerate() {
            if i == idx {
                tab.open = true;
                tab.minimized = false;
                tab.active = true;
                tab.maximized = false;
                tab.z_index = z_index;
            } else {
                tab.active = false;
            }
        }
        debug!(id, z_index, "opened tab");
        self.repair_active();
        self.publish();
        Ok(())
    }

    /// Toggles the maximized state of a tab.
    ///
    /// Entering maximize focuses the tab and takes both focus and maximize
    /// away from every other tab. Leaving it only clears the flag.
    pub fn maximize_tab(&mut self, id: &str) -> Result<()> {
        let idx = self.index_of(id)?;
        let entering = !self.tabs[idx].maximized;
        if entering {
            let z_index = self.allocate_z_index();
            for (i, tab) in self.tabs.iter_mut().enumerate() {
                if i == idx {
                    tab.open = true;
                    tab.minimized = false;
                    tab.active = true;
                    tab.maximized = true;
                    tab.z_index = z_index;
                } else {
                    tab.active = false;
                    tab.maximized = false;
                }
            }
        } else {
            for tab in &mut self.tabs {
                tab.maximized = false;
            }
        }
        debug!(id, entering, "toggled maximize");
        self.repair_active();
        self.publish();
        Ok(())
    }

    /// Taskbar click: minimizes the focused window, focuses anything else.
    pub fn select_taskbar_entry(&mut self, id: &str) -> Result<()> {
        let idx = self.index_of(id)?;
        let tab = &self.tabs[idx];
        if tab.is_shown() && tab.active {
            self.toggle_minimize(id)
        } else {
            self.set_active_tab(id)
        }
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.tabs
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| RegistryError::NotFound(TabId::new(id)))
    }

    fn allocate_z_index(&mut self) -> ZIndex {
        self.last_z_index += 1;
        self.last_z_index
    }

    /// Focuses the first shown tab when shown tabs exist but none is focused.
    fn repair_active(&mut self) {
        let mut shown = self.tabs.iter().enumerate().filter(|(_, t)| t.is_shown());
        let Some((first, _)) = shown.clone().next() else { return };
        if shown.any(|(_, t)| t.active) {
            return;
        }
        let z_index = self.allocate_z_index();
        let tab = &mut self.tabs[first];
        tab.active = true;
        tab.z_index = z_index;
        debug!(id = %tab.id, z_index, "repaired active window");
    }

    fn publish(&self) {
        trace!(tabs = self.tabs.len(), "publishing tab snapshot");
        self.changes.send_replace(Arc::new(self.tabs.clone()));
    }
}

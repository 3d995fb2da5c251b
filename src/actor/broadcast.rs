use serde::{Deserialize, Serialize};

use crate::common::config::LayoutMode;
use crate::common::prefs::ThemeMode;

/// Notifications for observers outside the desktop, serialized one per line
/// by the driver.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type")]
pub enum BroadcastEvent {
    LayoutModeChanged {
        mode: LayoutMode,
    },
    PositionsLocked {
        locked: bool,
    },
    /// A recompute finished. `windows` lists the placed ids in map order.
    LayoutApplied {
        mode: LayoutMode,
        windows: Vec<String>,
        maximized: Option<String>,
    },
    ThemeChanged {
        theme: ThemeMode,
    },
}

pub type BroadcastSender = crate::actor::Sender<BroadcastEvent>;
pub type BroadcastReceiver = crate::actor::Receiver<BroadcastEvent>;

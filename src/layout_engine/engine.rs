use tracing::{debug, trace};

use super::geometry::{SameAs, Viewport, WindowPosition};
use super::systems::{FloatingLayoutSystem, LayoutCalcInputs, LayoutSystem, LayoutSystemKind};
use super::utils;
use crate::common::collections::BTreeMap;
use crate::common::config::{LayoutMode, LayoutSettings};
use crate::model::{Tab, TabId};

/// Rectangle per window id, as handed to the rendering layer.
pub type PositionMap = BTreeMap<TabId, WindowPosition>;

/// Maps tab state to window rectangles.
///
/// The engine holds configuration only. [`TilingEngine::compute_layout`] is a
/// pure function of its arguments; [`TilingEngine::compute_floating_layout`]
/// additionally threads the caller's previous positions through so floating
/// windows stay where they were first placed.
#[derive(Debug, Clone, Default)]
pub struct TilingEngine {
    settings: LayoutSettings,
}

impl TilingEngine {
    pub fn new(settings: LayoutSettings) -> Self { Self { settings } }

    pub fn settings(&self) -> &LayoutSettings { &self.settings }

    /// Open, non-minimized, non-maximized tabs in placement order.
    ///
    /// Grid orders by id. The stack layouts put the active tab first and keep
    /// the rest by id.
    pub fn tileable<'a>(
        mode: LayoutMode,
        tabs: &'a [Tab],
        active: Option<&TabId>,
    ) -> Vec<&'a TabId> {
        let mut ids: Vec<&TabId> =
            tabs.iter().filter(|t| t.is_tileable()).map(|t| &t.id).collect();
        match mode {
            LayoutMode::Grid => ids.sort(),
            _ => ids.sort_by_key(|&id| (Some(id) != active, id)),
        }
        ids
    }

    /// Stateless layout of every tileable tab under `mode`.
    ///
    /// Maximized tabs are not included; see [`TilingEngine::maximized_frame`].
    pub fn compute_layout(
        &self,
        mode: LayoutMode,
        tabs: &[Tab],
        active: Option<&TabId>,
        viewport: Viewport,
    ) -> PositionMap {
        let windows = Self::tileable(mode, tabs, active);
        let system = LayoutSystemKind::from(mode);
        let inputs = LayoutCalcInputs::new(viewport, &self.settings);
        let positions: PositionMap =
            system.calculate_layout(&windows, inputs).into_iter().collect();
        trace!(%mode, count = positions.len(), "computed layout");
        positions
    }

    /// Floating layout that keeps positions from `previous`.
    ///
    /// Windows already in `previous` keep their rectangle. Newly shown
    /// windows get the cascade slot of their index in registration order, or
    /// the next free one if a kept window already sits there. A lone new
    /// window gets the centered frame. Windows no longer tileable are dropped.
    pub fn compute_floating_layout(
        &self,
        tabs: &[Tab],
        previous: &PositionMap,
        viewport: Viewport,
    ) -> PositionMap {
        let inputs = LayoutCalcInputs::new(viewport, &self.settings);
        let windows: Vec<&TabId> =
            tabs.iter().filter(|t| t.is_tileable()).map(|t| &t.id).collect();

        let kept: Vec<WindowPosition> =
            windows.iter().filter_map(|&id| previous.get(id).copied()).collect();

        let mut positions = PositionMap::new();
        for (index, &id) in windows.iter().enumerate() {
            let frame = match previous.get(id) {
                Some(frame) => *frame,
                None if windows.len() == 1 => FloatingLayoutSystem::centered_frame(&inputs),
                None => {
                    let taken = |frame: WindowPosition| {
                        kept.iter().chain(positions.values()).any(|f| f.same_as(frame))
                    };
                    let mut slot = index;
                    let mut frame = FloatingLayoutSystem::cascade_frame(slot, &inputs);
                    while taken(frame) && slot < index + windows.len() {
                        slot += 1;
                        frame = FloatingLayoutSystem::cascade_frame(slot, &inputs);
                    }
                    debug!(%id, slot, "placing new floating window");
                    frame
                }
            };
            positions.insert(id.clone(), frame);
        }
        positions
    }

    /// Fixed frame for a maximized window.
    pub fn maximized_frame(&self, viewport: Viewport) -> WindowPosition {
        utils::maximized_frame(viewport, &self.settings)
    }
}

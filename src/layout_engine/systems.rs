use enum_dispatch::enum_dispatch;

use super::geometry::{Viewport, WindowPosition};
use super::utils::compute_tiling_area;
use crate::common::config::{LayoutMode, LayoutSettings};
use crate::model::TabId;

#[derive(Clone, Copy)]
pub(crate) struct LayoutCalcInputs<'a> {
    pub(crate) viewport: Viewport,
    pub(crate) area: WindowPosition,
    pub(crate) settings: &'a LayoutSettings,
}

impl<'a> LayoutCalcInputs<'a> {
    pub(crate) fn new(viewport: Viewport, settings: &'a LayoutSettings) -> Self {
        Self {
            viewport,
            area: compute_tiling_area(viewport, settings),
            settings,
        }
    }
}

/// One tiling algorithm.
///
/// `windows` is already filtered to the tileable set and sorted in placement
/// order; implementations return exactly one rectangle per entry, with
/// non-negative sizes.
#[enum_dispatch]
pub(crate) trait LayoutSystem {
    fn calculate_layout(
        &self,
        windows: &[&TabId],
        inputs: LayoutCalcInputs<'_>,
    ) -> Vec<(TabId, WindowPosition)>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

mod floating;
pub(crate) use floating::FloatingLayoutSystem;
mod grid;
pub(crate) use grid::GridLayoutSystem;
mod master_stack;
pub(crate) use master_stack::MasterStackLayoutSystem;

#[derive(Debug)]
#[enum_dispatch(LayoutSystem)]
pub(crate) enum LayoutSystemKind {
    Grid(GridLayoutSystem),
    MasterStack(MasterStackLayoutSystem),
    Floating(FloatingLayoutSystem),
}

impl From<LayoutMode> for LayoutSystemKind {
    fn from(mode: LayoutMode) -> Self {
        match mode {
            LayoutMode::Grid => GridLayoutSystem.into(),
            LayoutMode::MainHorizontal => MasterStackLayoutSystem::new(Orientation::Horizontal).into(),
            LayoutMode::MainVertical => MasterStackLayoutSystem::new(Orientation::Vertical).into(),
            LayoutMode::Floating => FloatingLayoutSystem.into(),
        }
    }
}

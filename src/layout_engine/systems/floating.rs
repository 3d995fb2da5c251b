use super::{LayoutCalcInputs, LayoutSystem};
use crate::layout_engine::geometry::WindowPosition;
use crate::model::TabId;

/// Preferred-size windows, cascaded diagonally so none fully covers another.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct FloatingLayoutSystem;

impl FloatingLayoutSystem {
    fn preferred_size(inputs: &LayoutCalcInputs<'_>) -> (f64, f64) {
        let floating = &inputs.settings.floating;
        (
            floating.width.min(inputs.area.width).max(0.0),
            floating.height.min(inputs.area.height).max(0.0),
        )
    }

    pub(crate) fn centered_frame(inputs: &LayoutCalcInputs<'_>) -> WindowPosition {
        let (width, height) = Self::preferred_size(inputs);
        let area = inputs.area;
        WindowPosition {
            top: area.top + (area.height - height) / 2.0,
            left: area.left + (area.width - width) / 2.0,
            width,
            height,
        }
    }

    pub(crate) fn cascade_frame(index: usize, inputs: &LayoutCalcInputs<'_>) -> WindowPosition {
        let (width, height) = Self::preferred_size(inputs);
        let shift = index as f64 * inputs.settings.floating.cascade_offset;
        WindowPosition {
            top: inputs.area.top + shift,
            left: inputs.area.left + shift,
            width,
            height,
        }
    }
}

impl LayoutSystem for FloatingLayoutSystem {
    fn calculate_layout(
        &self,
        windows: &[&TabId],
        inputs: LayoutCalcInputs<'_>,
    ) -> Vec<(TabId, WindowPosition)> {
        match windows {
            [] => vec![],
            [only] => vec![((*only).clone(), Self::centered_frame(&inputs))],
            _ => windows
                .iter()
                .enumerate()
                .map(|(index, &id)| (id.clone(), Self::cascade_frame(index, &inputs)))
                .collect(),
        }
    }
}

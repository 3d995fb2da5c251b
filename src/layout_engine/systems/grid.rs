use super::{LayoutCalcInputs, LayoutSystem};
use crate::layout_engine::geometry::WindowPosition;
use crate::model::TabId;

/// Row-major grid of equal cells, `ceil(sqrt(n))` columns wide.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct GridLayoutSystem;

impl GridLayoutSystem {
    pub(crate) fn dimensions(count: usize) -> (usize, usize) {
        if count == 0 {
            return (0, 0);
        }
        let cols = (count as f64).sqrt().ceil() as usize;
        (cols, count.div_ceil(cols))
    }
}

impl LayoutSystem for GridLayoutSystem {
    fn calculate_layout(
        &self,
        windows: &[&TabId],
        inputs: LayoutCalcInputs<'_>,
    ) -> Vec<(TabId, WindowPosition)> {
        let area = inputs.area;
        match windows {
            [] => vec![],
            // A lone window would touch every margin as a 1x1 cell.
            [only] => {
                let ratio = inputs.settings.grid.single_window_ratio;
                let width = area.width * ratio;
                let height = area.height * ratio;
                let frame = WindowPosition {
                    top: area.top + (area.height - height) / 2.0,
                    left: area.left + (area.width - width) / 2.0,
                    width,
                    height,
                };
                vec![((*only).clone(), frame.clamped())]
            }
            _ => {
                let gap = inputs.settings.gap;
                let (cols, rows) = Self::dimensions(windows.len());
                let cell_width = (area.width - gap * (cols - 1) as f64) / cols as f64;
                let cell_height = (area.height - gap * (rows - 1) as f64) / rows as f64;
                let cell_width = cell_width.max(0.0);
                let cell_height = cell_height.max(0.0);

                windows
                    .iter()
                    .enumerate()
                    .map(|(index, &id)| {
                        let col = (index % cols) as f64;
                        let row = (index / cols) as f64;
                        let frame = WindowPosition {
                            top: area.top + row * (cell_height + gap),
                            left: area.left + col * (cell_width + gap),
                            width: cell_width,
                            height: cell_height,
                        };
                        (id.clone(), frame)
                    })
                    .collect()
            }
        }
    }
}

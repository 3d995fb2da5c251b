use super::{LayoutCalcInputs, LayoutSystem, Orientation};
use crate::layout_engine::geometry::WindowPosition;
use crate::model::TabId;

/// One main window plus a stack of the rest.
///
/// `Horizontal` puts the main window on top and lays the stack out as a row
/// of columns underneath; `Vertical` puts it on the left with the stack as a
/// column of rows to its right. The main window is the first entry, which the
/// engine arranges to be the focused one.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MasterStackLayoutSystem {
    orientation: Orientation,
}

impl MasterStackLayoutSystem {
    pub(crate) fn new(orientation: Orientation) -> Self { Self { orientation } }

    /// Lone window at the preferred stack size, centered.
    fn single_frame(inputs: &LayoutCalcInputs<'_>) -> WindowPosition {
        let settings = inputs.settings;
        let area = inputs.area;
        let width = settings.stack.single_width.min(area.width);
        let height = settings.stack.single_height.min(area.height);
        WindowPosition {
            top: settings.header_height + settings.margin.max((area.height - height) / 2.0),
            left: settings.margin.max((inputs.viewport.width - width) / 2.0),
            width,
            height,
        }
        .clamped()
    }

    /// Splits `len` into `count` equal segments separated by `gap`.
    fn segment(len: f64, count: usize, gap: f64) -> f64 {
        ((len - gap * (count.saturating_sub(1)) as f64) / count as f64).max(0.0)
    }
}

impl LayoutSystem for MasterStackLayoutSystem {
    fn calculate_layout(
        &self,
        windows: &[&TabId],
        inputs: LayoutCalcInputs<'_>,
    ) -> Vec<(TabId, WindowPosition)> {
        let Some((&main, stack)) = windows.split_first() else { return vec![] };
        if stack.is_empty() {
            return vec![(main.clone(), Self::single_frame(&inputs))];
        }

        let area = inputs.area;
        let gap = inputs.settings.gap;
        let ratio = inputs.settings.stack.main_ratio;
        let max_main_width = inputs.settings.stack.max_main_width;
        let half_gap = gap / 2.0;

        let mut sizes = Vec::with_capacity(windows.len());
        match self.orientation {
            Orientation::Horizontal => {
                let main_frame = WindowPosition {
                    top: area.top,
                    left: area.left,
                    width: (area.width * ratio).min(max_main_width),
                    height: area.height * ratio - half_gap,
                };
                sizes.push((main.clone(), main_frame.clamped()));

                let top = area.top + area.height * ratio + half_gap;
                let height = area.height * (1.0 - ratio) - half_gap;
                let width = Self::segment(area.width, stack.len(), gap);
                for (index, &id) in stack.iter().enumerate() {
                    let frame = WindowPosition {
                        top,
                        left: area.left + index as f64 * (width + gap),
                        width,
                        height,
                    };
                    sizes.push((id.clone(), frame.clamped()));
                }
            }
            Orientation::Vertical => {
                let main_frame = WindowPosition {
                    top: area.top,
                    left: area.left,
                    width: (area.width * ratio - half_gap).min(max_main_width),
                    height: area.height,
                };
                sizes.push((main.clone(), main_frame.clamped()));

                let left = area.left + area.width * ratio + half_gap;
                let width = area.width * (1.0 - ratio) - half_gap;
                let height = Self::segment(area.height, stack.len(), gap);
                for (index, &id) in stack.iter().enumerate() {
                    let frame = WindowPosition {
                        top: area.top + index as f64 * (height + gap),
                        left,
                        width,
                        height,
                    };
                    sizes.push((id.clone(), frame.clamped()));
                }
            }
        }
        sizes
    }
}

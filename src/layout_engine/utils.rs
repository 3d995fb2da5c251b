use super::geometry::{Viewport, WindowPosition};
use crate::common::config::LayoutSettings;

/// Area windows are tiled into: the viewport below the taskbar band, inset by
/// the margin on every side.
pub fn compute_tiling_area(viewport: Viewport, settings: &LayoutSettings) -> WindowPosition {
    WindowPosition {
        top: settings.header_height + settings.margin,
        left: settings.margin,
        width: (viewport.width - settings.margin * 2.0).max(0.0),
        height: (viewport.height - settings.header_height - settings.margin * 2.0).max(0.0),
    }
}

/// Fixed frame of a maximized window. Independent of what else is open.
pub fn maximized_frame(viewport: Viewport, settings: &LayoutSettings) -> WindowPosition {
    let inset = settings.maximized_margin;
    WindowPosition {
        top: settings.header_height,
        left: inset,
        width: viewport.width - inset * 2.0,
        height: viewport.height - settings.header_height - inset,
    }
    .clamped()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tiling_area_subtracts_header_and_margins() {
        let area = compute_tiling_area(Viewport::new(1200.0, 800.0), &LayoutSettings::default());
        assert_eq!(area, WindowPosition::new(90.0, 40.0, 1120.0, 670.0));
    }

    #[test]
    fn tiny_viewports_never_go_negative() {
        let settings = LayoutSettings::default();
        let area = compute_tiling_area(Viewport::new(50.0, 60.0), &settings);
        assert_eq!(area.width, 0.0);
        assert_eq!(area.height, 0.0);
        let max = maximized_frame(Viewport::new(10.0, 10.0), &settings);
        assert_eq!(max.width, 0.0);
        assert_eq!(max.height, 0.0);
    }

    #[test]
    fn maximized_frame_sits_below_header() {
        let max = maximized_frame(Viewport::new(1200.0, 800.0), &LayoutSettings::default());
        assert_eq!(max, WindowPosition::new(50.0, 8.0, 1184.0, 742.0));
    }
}

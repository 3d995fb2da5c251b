use pretty_assertions::assert_eq;
use strum::IntoEnumIterator;

use super::*;
use crate::common::config::{LayoutMode, LayoutSettings};
use crate::layout_engine::utils::compute_tiling_area;
use crate::model::{Tab, TabId};

const VIEWPORT: Viewport = Viewport { width: 1200.0, height: 800.0 };

fn engine() -> TilingEngine { TilingEngine::new(LayoutSettings::default()) }

fn shown(ids: &[&str]) -> Vec<Tab> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| Tab {
            id: TabId::new(*id),
            title: id.to_uppercase(),
            active: i == 0,
            open: true,
            minimized: false,
            maximized: false,
            z_index: 101 + i as u64,
        })
        .collect()
}

fn pos(top: f64, left: f64, width: f64, height: f64) -> WindowPosition {
    WindowPosition::new(top, left, width, height)
}

#[track_caller]
fn assert_frame(map: &PositionMap, id: &str, expected: WindowPosition) {
    let actual = map.get(id).unwrap_or_else(|| panic!("{id} missing from {map:#?}"));
    assert!(actual.same_as(expected), "{id}: {actual:?} != {expected:?}");
}

#[test]
fn grid_two_by_two_fills_available_area() {
    let tabs = shown(&["terminal", "about", "skills", "contact"]);
    let map = engine().compute_layout(LayoutMode::Grid, &tabs, None, VIEWPORT);
    assert_eq!(map.len(), 4);

    // Row-major by id: about, contact / skills, terminal.
    assert_frame(&map, "about", pos(90.0, 40.0, 548.0, 323.0));
    assert_frame(&map, "contact", pos(90.0, 612.0, 548.0, 323.0));
    assert_frame(&map, "skills", pos(437.0, 40.0, 548.0, 323.0));
    assert_frame(&map, "terminal", pos(437.0, 612.0, 548.0, 323.0));

    let area = compute_tiling_area(VIEWPORT, engine().settings());
    let gap = engine().settings().gap;
    let cells = map.values().collect::<Vec<_>>();
    assert!((cells[0].width * 2.0 + gap - area.width).abs() < 1e-9);
    assert!((cells[0].height * 2.0 + gap - area.height).abs() < 1e-9);
}

#[test]
fn grid_rects_stay_inside_area() {
    let ids: Vec<String> = (0..12).map(|i| format!("w{i:02}")).collect();
    let area = compute_tiling_area(VIEWPORT, engine().settings());
    for n in 1..=ids.len() {
        let refs: Vec<&str> = ids[..n].iter().map(String::as_str).collect();
        let map = engine().compute_layout(LayoutMode::Grid, &shown(&refs), None, VIEWPORT);
        assert_eq!(map.len(), n);
        for (id, rect) in &map {
            assert!(rect.width > 0.0 && rect.height > 0.0, "n={n} {id}: {rect:?}");
            assert!(area.contains_rect(rect), "n={n} {id}: {rect:?} outside {area:?}");
        }
        let rects: Vec<_> = map.values().collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.overlaps(b), "n={n}: {a:?} overlaps {b:?}");
            }
        }
    }
}

#[test]
fn grid_single_window_is_centered_not_full() {
    let map = engine().compute_layout(LayoutMode::Grid, &shown(&["about"]), None, VIEWPORT);
    // 85% of 1120x670, centered in the area.
    assert_frame(&map, "about", pos(140.25, 124.0, 952.0, 569.5));
}

#[test]
fn main_horizontal_puts_active_window_on_top() {
    let tabs = shown(&["about", "contact", "skills"]);
    let active = TabId::new("skills");
    let map = engine().compute_layout(LayoutMode::MainHorizontal, &tabs, Some(&active), VIEWPORT);

    assert_frame(&map, "skills", pos(90.0, 40.0, 672.0, 390.0));
    assert_frame(&map, "about", pos(504.0, 40.0, 548.0, 256.0));
    assert_frame(&map, "contact", pos(504.0, 612.0, 548.0, 256.0));
}

#[test]
fn main_vertical_puts_active_window_on_the_left() {
    let tabs = shown(&["about", "contact", "skills"]);
    let active = TabId::new("contact");
    let map = engine().compute_layout(LayoutMode::MainVertical, &tabs, Some(&active), VIEWPORT);

    assert_frame(&map, "contact", pos(90.0, 40.0, 660.0, 670.0));
    assert_frame(&map, "about", pos(90.0, 724.0, 436.0, 323.0));
    assert_frame(&map, "skills", pos(437.0, 724.0, 436.0, 323.0));
}

#[test]
fn main_width_is_capped() {
    let tabs = shown(&["about", "skills"]);
    let wide = Viewport::new(2400.0, 800.0);
    for mode in [LayoutMode::MainHorizontal, LayoutMode::MainVertical] {
        let map = engine().compute_layout(mode, &tabs, None, wide);
        assert_eq!(map["about"].width, 800.0, "{mode}");
    }
}

#[test]
fn stack_layouts_center_a_lone_window() {
    for mode in [LayoutMode::MainHorizontal, LayoutMode::MainVertical] {
        let map = engine().compute_layout(mode, &shown(&["about"]), None, VIEWPORT);
        assert_frame(&map, "about", pos(145.0, 240.0, 720.0, 480.0));
    }
}

#[test]
fn floating_cascades_from_area_origin() {
    let tabs = shown(&["about", "skills", "terminal"]);
    let map = engine().compute_layout(LayoutMode::Floating, &tabs, None, VIEWPORT);
    assert_frame(&map, "about", pos(90.0, 40.0, 1000.0, 620.0));
    assert_frame(&map, "skills", pos(120.0, 70.0, 1000.0, 620.0));
    assert_frame(&map, "terminal", pos(150.0, 100.0, 1000.0, 620.0));
}

#[test]
fn floating_layout_is_incremental() {
    let engine = engine();
    let mut tabs = shown(&["about", "skills"]);
    tabs[1].open = false;

    let first = engine.compute_floating_layout(&tabs, &PositionMap::new(), VIEWPORT);
    let pos_a = first["about"];
    assert_frame(&first, "about", pos(115.0, 100.0, 1000.0, 620.0));

    tabs[1].open = true;
    let second = engine.compute_floating_layout(&tabs, &first, VIEWPORT);
    assert_eq!(second.len(), 2);
    assert_eq!(second["about"], pos_a);
    let pos_b = second["skills"];
    assert_frame(&second, "skills", pos(120.0, 70.0, 1000.0, 620.0));

    tabs[0].open = false;
    let third = engine.compute_floating_layout(&tabs, &second, VIEWPORT);
    assert_eq!(third.len(), 1);
    assert_eq!(third["skills"], pos_b);
}

#[test]
fn floating_new_window_skips_occupied_slot() {
    let engine = engine();
    let mut tabs = shown(&["a", "b", "c"]);
    tabs[2].open = false;
    let first = engine.compute_floating_layout(&tabs, &PositionMap::new(), VIEWPORT);
    let pos_b = first["b"];
    assert_frame(&first, "b", pos(120.0, 70.0, 1000.0, 620.0));

    tabs[0].open = false;
    tabs[2].open = true;
    let second = engine.compute_floating_layout(&tabs, &first, VIEWPORT);
    assert_eq!(second["b"], pos_b);
    assert_frame(&second, "c", pos(150.0, 100.0, 1000.0, 620.0));
}

#[test]
fn floating_keeps_positions_across_resize() {
    let engine = engine();
    let tabs = shown(&["about", "skills"]);
    let before = engine.compute_floating_layout(&tabs, &PositionMap::new(), VIEWPORT);
    let after = engine.compute_floating_layout(&tabs, &before, Viewport::new(640.0, 480.0));
    assert_eq!(before, after);
}

#[test]
fn maximized_tab_is_excluded_from_tiling() {
    let engine = engine();
    let mut both = shown(&["about", "skills"]);
    both[0].maximized = true;
    let alone = shown(&["skills"]);
    let skills = TabId::new("skills");

    for mode in LayoutMode::iter() {
        let with_max = engine.compute_layout(mode, &both, Some(&skills), VIEWPORT);
        let without = engine.compute_layout(mode, &alone, Some(&skills), VIEWPORT);
        assert!(!with_max.contains_key("about"), "{mode}");
        assert_eq!(with_max, without, "{mode}");
    }
}

#[test]
fn hidden_tabs_are_not_tiled() {
    let mut tabs = shown(&["about", "contact", "skills"]);
    tabs[1].minimized = true;
    tabs[2].open = false;
    for mode in LayoutMode::iter() {
        let map = engine().compute_layout(mode, &tabs, None, VIEWPORT);
        assert_eq!(map.keys().map(TabId::as_str).collect::<Vec<_>>(), ["about"], "{mode}");
    }
}

#[test]
fn degenerate_inputs_do_not_panic() {
    let engine = engine();
    for mode in LayoutMode::iter() {
        assert!(engine.compute_layout(mode, &[], None, VIEWPORT).is_empty());
    }
    assert!(engine.compute_floating_layout(&[], &PositionMap::new(), VIEWPORT).is_empty());

    let tiny = Viewport::new(30.0, 20.0);
    let tabs = shown(&["about", "contact", "projects", "skills", "terminal"]);
    for mode in LayoutMode::iter() {
        for n in 1..=tabs.len() {
            let map = engine.compute_layout(mode, &tabs[..n], None, tiny);
            assert_eq!(map.len(), n);
            for rect in map.values() {
                assert!(rect.width >= 0.0 && rect.height >= 0.0, "{mode}: {rect:?}");
            }
        }
    }
    let max = engine.maximized_frame(tiny);
    assert!(max.width >= 0.0 && max.height >= 0.0);
}

#[test]
fn tileable_ordering() {
    let tabs = shown(&["terminal", "about", "skills"]);
    let active = TabId::new("skills");
    let grid = TilingEngine::tileable(LayoutMode::Grid, &tabs, Some(&active));
    assert_eq!(grid, [&TabId::new("about"), &TabId::new("skills"), &TabId::new("terminal")]);
    let stack = TilingEngine::tileable(LayoutMode::MainVertical, &tabs, Some(&active));
    assert_eq!(stack, [&TabId::new("skills"), &TabId::new("about"), &TabId::new("terminal")]);
}

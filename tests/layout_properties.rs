use proptest::prelude::*;

use trellis::client::{ClientLayout, DragTarget, LayoutRegistry, Page, ParentBox, ResizeController};
use trellis::layout::minimum::{minimum_height, row_minimum_heights};
use trellis::{Alignment, DomElement, ElementKind, Grid, GridLayout, LayoutItem, Session, Sides, Size};
use trellis::widget::BlockWidget;

fn block(id: &str, width: i32, height: i32) -> LayoutItem {
    LayoutItem::widget(BlockWidget::new(id, Size::new(width, height)))
}

fn measure(_: &DomElement) -> Size {
    Size::new(20, 10)
}

fn row_heights(page: &Page, id: &str) -> Vec<i32> {
    page.container(id)
        .map(|c| c.table.rows.iter().map(|r| r.height).collect())
        .unwrap_or_default()
}

proptest! {
    #[test]
    fn minimum_height_is_rows_plus_spacing(
        heights in prop::collection::vec(prop::option::of(0i32..200), 1..8),
        spacing in 0i32..20,
    ) {
        let mut grid = Grid::new(heights.len(), 1);
        grid.set_vertical_spacing(spacing);
        for (row, height) in heights.iter().enumerate() {
            if let Some(h) = height {
                grid.set_cell(row, 0, block(&format!("b{row}"), 5, *h), 1, 1, Alignment::default())
                    .unwrap();
            }
        }

        let expected: i32 = heights.iter().map(|h| h.unwrap_or(0)).sum::<i32>()
            + spacing * (heights.len() as i32 - 1);
        prop_assert_eq!(minimum_height(&grid), expected);
        prop_assert_eq!(row_minimum_heights(&grid).iter().sum::<i32>(), expected - spacing * (heights.len() as i32 - 1));
    }

    #[test]
    fn stretch_rows_fill_the_parent_and_respect_minima(
        rows in prop::collection::vec((-3i32..5, 0i32..60), 1..6),
        slack in 0i32..400,
    ) {
        let mut layout = GridLayout::new("g", rows.len(), 1);
        layout.set_contents_margins(Sides::default());
        layout.grid_mut().set_vertical_spacing(0);
        for (i, (stretch, min)) in rows.iter().enumerate() {
            layout.grid_mut().set_row_stretch(i, *stretch);
            layout.set_cell(i, 0, block(&format!("b{i}"), 5, *min), 1, 1, Alignment::default()).unwrap();
        }
        let dom = layout.create_dom(true, true, &mut Session::default()).unwrap();
        let config = layout.render_config().cloned().unwrap();
        let mut page = Page::new();
        page.mount(&dom, ParentBox::new(200, 100), &measure).unwrap();
        let measured = row_heights(&page, "g");

        // Without any positive stretch every row shares the height equally.
        let stretching: Vec<bool> = config.stretch.iter().map(|s| *s > 0).collect();
        let fixed: i32 = measured.iter().zip(&stretching).filter(|(_, s)| !**s).map(|(h, _)| h).sum();

        // Every proportional share clears its minimum with room for rounding.
        let total_stretch: i32 = config.stretch.iter().filter(|s| **s > 0).sum();
        let n = rows.len() as i32;
        let shares = config
            .stretch
            .iter()
            .zip(&config.min_height)
            .filter(|(s, _)| **s > 0)
            .map(|(s, min)| ((min + n) * total_stretch + s - 1) / s)
            .max()
            .unwrap_or(0);
        let required: i32 = config.min_height.iter().sum();
        let available = shares.max(required) + slack;
        page.set_parent("g", ParentBox::new(200, fixed + available));

        let client = ClientLayout::new(config.clone());
        prop_assert!(client.adjust(&mut page));
        let heights = row_heights(&page, "g");
        let mut stretched = 0;
        for (i, h) in heights.iter().enumerate() {
            if stretching[i] {
                prop_assert!(*h >= config.min_height[i], "{} < {}", h, config.min_height[i]);
                stretched += h;
            } else {
                prop_assert_eq!(*h, measured[i], "fixed row {} moved", i);
            }
        }
        prop_assert_eq!(stretched, available);
    }
}

#[test]
fn two_by_two_equal_stretch_renders_halves() {
    let mut layout = GridLayout::new("g", 2, 2);
    layout
        .grid_mut()
        .set_column_stretch(0, 1)
        .set_column_stretch(1, 1)
        .set_row_stretch(0, 1)
        .set_row_stretch(1, 1);
    let dom = layout.create_dom(true, true, &mut Session::default()).unwrap();

    let table = dom.first_child().unwrap();
    let widths: Vec<_> = table
        .children_of_kind(ElementKind::ColGroup)
        .flat_map(|g| g.children())
        .map(|c| c.style("width"))
        .collect();
    assert_eq!(widths, vec![Some("50%"), Some("50%")]);
    let tbody = table.children_of_kind(ElementKind::TBody).next().unwrap();
    assert!(tbody.children().iter().all(|tr| tr.style("height") == Some("50%")));
}

#[test]
fn dragging_a_row_handle_moves_twenty_pixels() {
    let mut layout = GridLayout::new("g", 2, 1);
    layout.set_contents_margins(Sides::default());
    layout
        .grid_mut()
        .set_vertical_spacing(10)
        .set_row_stretch(0, 1)
        .set_row_stretch(1, 1)
        .set_row_resizable(0, true);

    let mut session = Session::default();
    let dom = layout.create_dom(true, true, &mut session).unwrap();
    let mut page = Page::new();
    page.mount(&dom, ParentBox::new(100, 210), &measure).unwrap();
    let mut registry = LayoutRegistry::new();
    registry.apply_all(&session.take_statements(), &mut page).unwrap();
    assert_eq!(row_heights(&page, "g"), vec![100, 10, 100]);

    let target = DragTarget::handles(&page, "g").remove(0);
    let mut controller = ResizeController::new();
    assert!(controller.pointer_down(target, &page));
    assert_eq!(controller.pointer_move(20, &mut page, &mut registry), 20);
    assert_eq!(controller.pointer_up(), Some(20));
    assert_eq!(row_heights(&page, "g"), vec![120, 10, 80]);
}

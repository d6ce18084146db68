//! Interactive drag resizing of rows and columns.
//!
//! A gesture runs `pointer_down` → `pointer_move`* → `pointer_up`. Bounds are
//! captured when the gesture starts; each move applies only the step since
//! the previous move, then the registry reflows every layout.

use crate::client::page::{ColumnWidth, Page};
use crate::client::reflow::set_physical_column_width;
use crate::client::registry::LayoutRegistry;

/// A drag handle: the logical row above or the logical column left of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragTarget {
    Row { layout: String, track: usize },
    Column { layout: String, track: usize },
}

impl DragTarget {
    pub fn layout(&self) -> &str {
        match self {
            DragTarget::Row { layout, .. } | DragTarget::Column { layout, .. } => layout,
        }
    }

    pub fn track(&self) -> usize {
        match self {
            DragTarget::Row { track, .. } | DragTarget::Column { track, .. } => *track,
        }
    }

    /// Every handle in the container `id`, rows first.
    pub fn handles(page: &Page, id: &str) -> Vec<DragTarget> {
        let Some(container) = page.container(id) else {
            return Vec::new();
        };
        let rows = container
            .table
            .row_handles()
            .into_iter()
            .map(|track| DragTarget::Row {
                layout: id.to_string(),
                track,
            });
        let columns = container
            .table
            .column_handles()
            .into_iter()
            .map(|track| DragTarget::Column {
                layout: id.to_string(),
                track,
            });
        rows.chain(columns).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        target: DragTarget,
        min: i32,
        max: i32,
        applied: i32,
    },
}

#[derive(Debug, Default)]
pub struct ResizeController {
    state: DragState,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Allowed total delta of the current gesture.
    pub fn bounds(&self) -> Option<(i32, i32)> {
        match &self.state {
            DragState::Dragging { min, max, .. } => Some((*min, *max)),
            DragState::Idle => None,
        }
    }

    /// Start a gesture on `target`. Returns `false` if the handle does not
    /// exist on the page.
    pub fn pointer_down(&mut self, target: DragTarget, page: &Page) -> bool {
        let Some(container) = page.container(target.layout()) else {
            return false;
        };
        let table = &container.table;
        let track = target.track();
        let sizes = match &target {
            DragTarget::Row { .. } => table
                .physical_row(track)
                .zip(table.physical_row(track + 1))
                .map(|(a, b)| (table.rows[a].height, table.rows[b].height)),
            DragTarget::Column { .. } => table
                .physical_column(track)
                .zip(table.physical_column(track + 1))
                .map(|(a, b)| (table.columns[a].resolved, table.columns[b].resolved)),
        };
        let Some((previous, next)) = sizes else {
            return false;
        };
        self.state = DragState::Dragging {
            target,
            min: -previous,
            max: next,
            applied: 0,
        };
        true
    }

    /// Move the pointer to `total_delta` pixels from where the gesture
    /// started. Returns the clamped delta now in effect.
    pub fn pointer_move(
        &mut self,
        total_delta: i32,
        page: &mut Page,
        registry: &mut LayoutRegistry,
    ) -> i32 {
        let DragState::Dragging {
            target,
            min,
            max,
            applied,
        } = &mut self.state
        else {
            return 0;
        };
        let clamped = total_delta.clamp(*min, *max);
        let step = clamped - *applied;
        if step == 0 {
            return clamped;
        }
        let moved = match target {
            DragTarget::Row { layout, track } => resize_rows(layout, *track, step, page, registry),
            DragTarget::Column { layout, track } => {
                resize_columns(layout, *track, step, page, registry)
            }
        };
        if moved {
            *applied = clamped;
            registry.metrics_mut().record_drag_step();
        }
        *applied
    }

    /// Finish the gesture, returning the delta that was applied.
    pub fn pointer_up(&mut self) -> Option<i32> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { applied, .. } => Some(applied),
            DragState::Idle => None,
        }
    }
}

fn resize_rows(
    id: &str,
    g: usize,
    step: i32,
    page: &mut Page,
    registry: &mut LayoutRegistry,
) -> bool {
    let Some(container) = page.container(id) else {
        return false;
    };
    let table = &container.table;
    let Some((previous, next)) = table
        .physical_row(g)
        .zip(table.physical_row(g + 1))
        .map(|(a, b)| (table.rows[a].height, table.rows[b].height))
    else {
        return false;
    };
    let Some(layout) = registry.get_mut(id) else {
        return false;
    };
    let stretch = &mut layout.config_mut().stretch;
    if g + 1 >= stretch.len() {
        return false;
    }

    // A dragged stretch row turns fixed so the reflow keeps its new height.
    if stretch[g] > 0 && stretch[g + 1] > 0 {
        stretch[g] = -1;
    }
    if stretch[g + 1] == 0 {
        stretch[g + 1] = -1;
    }
    let (fix_previous, fix_next) = (stretch[g] <= 0, stretch[g + 1] <= 0);

    if fix_previous {
        layout.set_row_height(page, g, previous + step);
    }
    if fix_next {
        layout.set_row_height(page, g + 1, next - step);
    }
    registry.refresh_digest(id);
    reflow(id, page, registry);
    true
}

fn resize_columns(
    id: &str,
    g: usize,
    step: i32,
    page: &mut Page,
    registry: &mut LayoutRegistry,
) -> bool {
    let Some(container) = page.container_mut(id) else {
        return false;
    };
    let table = &mut container.table;
    let Some((a, b)) = table.physical_column(g).zip(table.physical_column(g + 1)) else {
        return false;
    };
    let (previous, next) = (table.columns[a].resolved, table.columns[b].resolved);

    if table.columns[a].width.percent() > 0.0 && table.columns[b].width.percent() > 0.0 {
        table.columns[a].width = ColumnWidth::Auto;
        let total: f64 = table.columns.iter().map(|c| c.width.percent()).sum();
        if total > 0.0 {
            for col in &mut table.columns {
                if let ColumnWidth::Percent(pct) = col.width {
                    col.width = ColumnWidth::Percent(pct * 100.0 / total);
                }
            }
        }
    }
    let (fix_previous, fix_next) = (
        table.columns[a].width.percent() == 0.0,
        table.columns[b].width.percent() == 0.0,
    );

    if fix_previous {
        set_physical_column_width(container, a, previous + step);
    }
    if fix_next {
        set_physical_column_width(container, b, next - step);
    }
    reflow(id, page, registry);
    true
}

fn reflow(id: &str, page: &mut Page, registry: &mut LayoutRegistry) {
    page.mark_dirty(id);
    registry.adjust(None, page);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::page::ParentBox;
    use crate::dom::DomElement;
    use crate::geometry::{Sides, Size};
    use crate::layout::GridLayout;
    use crate::session::Session;

    fn measure(_: &DomElement) -> Size {
        Size::new(0, 0)
    }

    fn setup(mut layout: GridLayout, parent: ParentBox) -> (Page, LayoutRegistry) {
        let mut session = Session::default();
        let dom = layout.create_dom(true, true, &mut session).unwrap();
        let mut page = Page::new();
        page.mount(&dom, parent, &measure).unwrap();
        let mut registry = LayoutRegistry::new();
        registry
            .apply_all(&session.take_statements(), &mut page)
            .unwrap();
        (page, registry)
    }

    fn row_heights(page: &Page) -> Vec<i32> {
        page.container("g")
            .unwrap()
            .table
            .rows
            .iter()
            .map(|r| r.height)
            .collect()
    }

    fn two_stretch_rows() -> (Page, LayoutRegistry) {
        let mut layout = GridLayout::new("g", 2, 1);
        layout.set_contents_margins(Sides::default());
        layout
            .grid_mut()
            .set_vertical_spacing(10)
            .set_row_stretch(0, 1)
            .set_row_stretch(1, 1)
            .set_row_resizable(0, true);
        setup(layout, ParentBox::new(100, 210))
    }

    #[test]
    fn dragging_between_stretch_rows_moves_the_boundary() {
        let (mut page, mut registry) = two_stretch_rows();
        assert_eq!(row_heights(&page), vec![100, 10, 100]);

        let handles = DragTarget::handles(&page, "g");
        assert_eq!(
            handles,
            vec![DragTarget::Row {
                layout: "g".into(),
                track: 0
            }]
        );

        let mut controller = ResizeController::new();
        assert!(controller.pointer_down(handles[0].clone(), &page));
        assert_eq!(controller.bounds(), Some((-100, 100)));

        assert_eq!(controller.pointer_move(20, &mut page, &mut registry), 20);
        assert_eq!(row_heights(&page), vec![120, 10, 80]);
        assert_eq!(registry.get("g").unwrap().config().stretch, vec![-1, 1]);

        controller.pointer_move(30, &mut page, &mut registry);
        assert_eq!(row_heights(&page), vec![130, 10, 70]);

        assert_eq!(controller.pointer_up(), Some(30));
        assert!(!controller.is_dragging());
        assert_eq!(registry.metrics().drag_steps, 2);
    }

    #[test]
    fn deltas_clamp_to_the_captured_bounds() {
        let (mut page, mut registry) = two_stretch_rows();
        let mut controller = ResizeController::new();
        controller.pointer_down(
            DragTarget::Row {
                layout: "g".into(),
                track: 0,
            },
            &page,
        );
        assert_eq!(controller.pointer_move(-500, &mut page, &mut registry), -100);
        assert_eq!(row_heights(&page)[0], 0);
    }

    #[test]
    fn moves_without_a_gesture_are_ignored() {
        let (mut page, mut registry) = two_stretch_rows();
        let mut controller = ResizeController::new();
        assert_eq!(controller.pointer_move(15, &mut page, &mut registry), 0);
        assert_eq!(controller.pointer_up(), None);
        assert!(!controller.pointer_down(
            DragTarget::Row {
                layout: "g".into(),
                track: 1
            },
            &page
        ));
    }

    #[test]
    fn dragging_a_column_pins_it_and_renormalises_the_rest() {
        let mut layout = GridLayout::new("g", 1, 2);
        layout.set_contents_margins(Sides::default());
        layout
            .grid_mut()
            .set_horizontal_spacing(10)
            .set_column_stretch(0, 1)
            .set_column_stretch(1, 1)
            .set_column_resizable(0, true);
        let (mut page, mut registry) = setup(layout, ParentBox::new(410, 100));

        let target = DragTarget::Column {
            layout: "g".into(),
            track: 0,
        };
        assert_eq!(DragTarget::handles(&page, "g"), vec![target.clone()]);

        let mut controller = ResizeController::new();
        assert!(controller.pointer_down(target, &page));
        assert_eq!(controller.bounds(), Some((-200, 200)));
        controller.pointer_move(20, &mut page, &mut registry);

        let columns = &page.container("g").unwrap().table.columns;
        assert_eq!(columns[0].width, ColumnWidth::Px(220));
        assert_eq!(columns[2].width, ColumnWidth::Percent(100.0));
        assert_eq!(columns[2].resolved, 180);
    }
}

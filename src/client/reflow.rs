//! Client reflow: distributes the height available to a layout container over
//! its rows and pushes the results into cells and content.
//!
//! Rows with a non-positive stretch keep their measured height; positive
//! stretch rows share what is left, floored at their minimum height.

use crate::client::page::{
    ClientCell, ClientContainer, ClientContent, ClientRow, ColumnWidth, ContentKind, Page,
};
use crate::layout::RenderConfig;

/// What a single [`ClientLayout::adjust_outcome`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustOutcome {
    /// The container is gone; the layout should be dropped.
    Missing,
    /// Hidden container, retried on a later pass.
    Deferred,
    /// Parent size unchanged and nothing dirty.
    Unchanged,
    Reflowed,
}

impl AdjustOutcome {
    pub fn keep(&self) -> bool {
        !matches!(self, AdjustOutcome::Missing)
    }
}

/// Client-side half of a grid layout: the render config plus the reflow
/// algorithm that distributes the available height over its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientLayout {
    config: RenderConfig,
}

impl ClientLayout {
    pub fn new(config: RenderConfig) -> Self {
        config.assert_consistent();
        Self { config }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub(crate) fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    /// Reflow the container. Returns `false` only when the container no
    /// longer exists.
    pub fn adjust(&self, page: &mut Page) -> bool {
        self.adjust_outcome(page).keep()
    }

    pub fn adjust_outcome(&self, page: &mut Page) -> AdjustOutcome {
        let Some(container) = page.container_mut(&self.config.id) else {
            return AdjustOutcome::Missing;
        };
        if container.hidden {
            return AdjustOutcome::Deferred;
        }

        container.table.style_height = None;
        let memo_key = container.parent.memo_key();
        if !container.dirty && container.table.memo == Some(memo_key) {
            return AdjustOutcome::Unchanged;
        }

        self.distribute(container);

        container.table.memo = Some(memo_key);
        container.dirty = false;

        if container.table.fixed_layout {
            fit_auto_columns(container);
        }
        AdjustOutcome::Reflowed
    }

    fn distribute(&self, container: &mut ClientContainer) {
        let stretch = &self.config.stretch;
        let min_height = &self.config.min_height;

        let mut available = container.parent.available_height()
            - container.margins.vertical()
            - container.parent.sibling_heights.iter().sum::<i32>();
        let mut required = 0;
        let mut total_stretch = 0;

        let mut logical = 0;
        for row in &container.table.rows {
            if row.handle {
                available -= row.height;
                continue;
            }
            let (s, min) = row_config(stretch, min_height, logical);
            required += min;
            if s <= 0 {
                available -= row.height;
            } else {
                total_stretch += s;
            }
            logical += 1;
        }

        let available = available.max(required);
        if total_stretch == 0 || available <= 0 {
            return;
        }

        let last_stretch = last_positive(stretch, logical);
        let mut remaining = available;
        let mut logical = 0;
        for row in container.table.rows.iter_mut() {
            if row.handle {
                continue;
            }
            let n = logical;
            logical += 1;
            let (s, min) = row_config(stretch, min_height, n);
            if s == 0 {
                continue;
            }
            let height = if s < 0 {
                row.height
            } else if Some(n) == last_stretch {
                let height = remaining.max(min);
                remaining -= height;
                height
            } else {
                let share = f64::from(available) * f64::from(s) / f64::from(total_stretch);
                let height = share.min(f64::from(remaining)).max(f64::from(min)).round() as i32;
                remaining -= height;
                height
            };
            adjust_row(row, height);
        }
    }

    /// Force logical row `logical` to `height` pixels.
    pub fn set_row_height(&self, page: &mut Page, logical: usize, height: i32) -> bool {
        let Some(container) = page.container_mut(&self.config.id) else {
            return false;
        };
        let Some(index) = container.table.physical_row(logical) else {
            return false;
        };
        adjust_row(&mut container.table.rows[index], height);
        true
    }

    /// Give logical column `logical` a fixed pixel width.
    pub fn set_column_width(&self, page: &mut Page, logical: usize, width: i32) -> bool {
        let Some(container) = page.container_mut(&self.config.id) else {
            return false;
        };
        let Some(index) = container.table.physical_column(logical) else {
            return false;
        };
        set_physical_column_width(container, index, width);
        true
    }
}

fn row_config(stretch: &[i32], min_height: &[i32], n: usize) -> (i32, i32) {
    (
        stretch.get(n).copied().unwrap_or(0),
        min_height.get(n).copied().unwrap_or(0),
    )
}

fn last_positive(stretch: &[i32], rows: usize) -> Option<usize> {
    stretch.iter().take(rows).rposition(|s| *s > 0)
}

/// Push a row height down into its cells and their content.
pub(crate) fn adjust_row(row: &mut ClientRow, height: i32) {
    row.height = height;
    for cell in &mut row.cells {
        adjust_cell(cell, height);
    }
}

fn adjust_cell(cell: &mut ClientCell, row_height: i32) {
    let k = (row_height - cell.padding.vertical()).max(0);
    cell.height = Some(k);
    if cell.vertical_align {
        return;
    }
    let cell_width = cell.width;
    let padding_h = cell.padding.horizontal();
    let Some(content) = cell.content.as_mut() else {
        return;
    };

    if matches!(content.kind, ContentKind::Centered { .. }) {
        content.style_height = Some(k);
        if let ContentKind::Centered {
            inner,
            inner_cell_height,
        } = &mut content.kind
        {
            *inner_cell_height = Some(k);
            size_content(inner, k, cell_width - padding_h);
        }
    } else {
        size_content(content, k, cell_width - padding_h);
    }
}

/// Fit content into a cell content box of `width` x `height`.
fn size_content(target: &mut ClientContent, height: i32, width: i32) {
    let height = height - target.margin_v();
    if matches!(target.kind, ContentKind::Resizable { .. }) {
        let width = width - target.margins.horizontal();
        target.resize(width, height);
        return;
    }
    match &mut target.kind {
        ContentKind::TextEdit {
            bottom_margin,
            textarea_height,
        } => {
            *textarea_height = Some(height - *bottom_margin);
            target.style_height = Some(height);
        }
        _ => target.style_height = Some(height),
    }
}

pub(crate) fn set_physical_column_width(container: &mut ClientContainer, index: usize, width: i32) {
    let table = &mut container.table;
    table.columns[index].width = ColumnWidth::Px(width);
    for cell in table
        .rows
        .iter_mut()
        .filter(|row| !row.handle)
        .flat_map(|row| row.cells.iter_mut())
        .filter(|cell| cell.physical_col == index && cell.col_span == 1)
    {
        let margin_h = cell.margin_h();
        if let Some(content) = cell.content.as_mut() {
            content.style_width = Some(width - margin_h);
        }
    }
    table.resolve_widths(container.parent.available_width());
}

/// In fixed table layout, pin every width-less column to its widest
/// single-span content.
fn fit_auto_columns(container: &mut ClientContainer) {
    let table = &mut container.table;
    let mut changed = false;
    for k in 0..table.columns.len() {
        if table.columns[k].handle || table.columns[k].width != ColumnWidth::Auto {
            continue;
        }
        let width = table.natural_column_width(k);
        if width > 0 {
            table.columns[k].width = ColumnWidth::Px(width);
            changed = true;
        }
    }
    if changed {
        table.resolve_widths(container.parent.available_width());
    }
}

//! Measured page state the reflow engine works against.
//!
//! The host builds a [`Page`] from generated markup plus its own
//! measurements; the reflow engine then reads offset sizes from it and writes
//! heights and widths back, the way the browser-side code touches the DOM.

use std::collections::HashMap;

use crate::dom::{DomElement, ElementKind};
use crate::error::{LayoutError, Result};
use crate::geometry::{Sides, Size, parse_px};
use crate::layout::{CENTER_WRAPPER_CLASS, HORIZONTAL_HANDLE_CLASS, VERTICAL_HANDLE_CLASS};
use crate::widget::TEXT_EDIT_WRAPPER_CLASS;

/// The element a layout container is mounted in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentBox {
    /// Height from the parent's own style, when it has one.
    pub explicit_height: Option<i32>,
    pub client_width: i32,
    pub client_height: i32,
    pub padding: Sides,
    /// Outer heights of the container's siblings.
    pub sibling_heights: Vec<i32>,
}

impl ParentBox {
    pub fn new(client_width: i32, client_height: i32) -> Self {
        Self {
            client_width,
            client_height,
            ..Self::default()
        }
    }

    pub fn with_explicit_height(mut self, height: i32) -> Self {
        self.explicit_height = Some(height);
        self
    }

    pub fn with_padding(mut self, padding: Sides) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_sibling(mut self, height: i32) -> Self {
        self.sibling_heights.push(height);
        self
    }

    /// Height the container may occupy before siblings and margins.
    pub fn available_height(&self) -> i32 {
        self.explicit_height
            .unwrap_or(self.client_height - self.padding.vertical())
    }

    pub fn available_width(&self) -> i32 {
        self.client_width - self.padding.horizontal()
    }

    pub(crate) fn memo_key(&self) -> (i32, i32) {
        (self.client_width, self.client_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    Auto,
    Percent(f64),
    Px(i32),
}

impl ColumnWidth {
    fn parse(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return ColumnWidth::Auto;
        };
        if let Some(pct) = value.trim().strip_suffix('%') {
            if let Ok(pct) = pct.trim().parse() {
                return ColumnWidth::Percent(pct);
            }
        }
        parse_px(value).map_or(ColumnWidth::Auto, ColumnWidth::Px)
    }

    pub fn percent(&self) -> f64 {
        match self {
            ColumnWidth::Percent(pct) => *pct,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientColumn {
    pub width: ColumnWidth,
    pub handle: bool,
    /// Width in pixels after the last resolve.
    pub resolved: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentKind {
    Plain,
    /// Content that accepts an explicit `resize(width, height)` call.
    Resizable { last_resize: Option<Size> },
    /// A nested layout container; only its height is set.
    Nested,
    TextEdit {
        bottom_margin: i32,
        textarea_height: Option<i32>,
    },
    Centered {
        inner: Box<ClientContent>,
        inner_cell_height: Option<i32>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientContent {
    pub id: Option<String>,
    pub kind: ContentKind,
    pub margins: Sides,
    /// Border plus padding.
    pub insets: Sides,
    /// Offset size.
    pub size: Size,
    pub style_width: Option<i32>,
    pub style_height: Option<i32>,
}

impl ClientContent {
    /// Vertical space the content needs around its content box.
    pub fn margin_v(&self) -> i32 {
        self.margins.vertical() + self.insets.vertical()
    }

    pub fn outer_width(&self) -> i32 {
        self.size.width + self.margins.horizontal()
    }

    pub fn outer_height(&self) -> i32 {
        self.size.height + self.margins.vertical()
    }

    pub fn last_resize(&self) -> Option<Size> {
        match &self.kind {
            ContentKind::Resizable { last_resize } => *last_resize,
            ContentKind::Centered { inner, .. } => inner.last_resize(),
            _ => None,
        }
    }

    pub(crate) fn resize(&mut self, width: i32, height: i32) {
        if let ContentKind::Resizable { last_resize } = &mut self.kind {
            *last_resize = Some(Size::new(width, height));
            self.size = Size::new(
                width + self.insets.horizontal(),
                height + self.insets.vertical(),
            );
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientCell {
    pub handle: bool,
    pub physical_col: usize,
    pub row_span: usize,
    pub col_span: usize,
    pub padding: Sides,
    pub vertical_align: bool,
    /// Offset width.
    pub width: i32,
    /// Explicit style height set by the reflow engine.
    pub height: Option<i32>,
    pub content: Option<ClientContent>,
}

impl ClientCell {
    /// Horizontal space around the content inside the cell.
    pub fn margin_h(&self) -> i32 {
        self.padding.horizontal()
            + self
                .content
                .as_ref()
                .map_or(0, |content| content.margins.horizontal())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientRow {
    pub handle: bool,
    /// Offset height.
    pub height: i32,
    pub cells: Vec<ClientCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientTable {
    pub fixed_layout: bool,
    /// Explicit height style on the table; cleared at the start of a reflow.
    pub style_height: Option<String>,
    pub columns: Vec<ClientColumn>,
    pub rows: Vec<ClientRow>,
    /// Parent client size seen by the last completed reflow.
    pub memo: Option<(i32, i32)>,
}

impl ClientTable {
    /// Index into `rows` of the `logical`-th non-handle row.
    pub fn physical_row(&self, logical: usize) -> Option<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.handle)
            .nth(logical)
            .map(|(i, _)| i)
    }

    /// Index into `columns` of the `logical`-th non-handle column.
    pub fn physical_column(&self, logical: usize) -> Option<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, col)| !col.handle)
            .nth(logical)
            .map(|(i, _)| i)
    }

    pub fn logical_row_count(&self) -> usize {
        self.rows.iter().filter(|row| !row.handle).count()
    }

    /// Logical rows that have a drag handle below them.
    pub fn row_handles(&self) -> Vec<usize> {
        let mut logical = 0;
        let mut handles = Vec::new();
        for row in &self.rows {
            if row.handle {
                if logical > 0 {
                    handles.push(logical - 1);
                }
            } else {
                logical += 1;
            }
        }
        handles
    }

    /// Logical columns that have a drag handle to their right.
    pub fn column_handles(&self) -> Vec<usize> {
        let mut logical = 0;
        let mut handles = Vec::new();
        for col in &self.columns {
            if col.handle {
                if logical > 0 {
                    handles.push(logical - 1);
                }
            } else {
                logical += 1;
            }
        }
        handles
    }

    /// Turn column widths into pixels for the given table width and update
    /// the offset widths of every cell. Percentages share what the pixel and
    /// auto columns leave over.
    pub fn resolve_widths(&mut self, available: i32) {
        if self.columns.is_empty() {
            return;
        }
        let mut fixed = 0;
        for k in 0..self.columns.len() {
            let resolved = match self.columns[k].width {
                ColumnWidth::Px(width) => width,
                ColumnWidth::Auto => self.natural_column_width(k),
                ColumnWidth::Percent(_) => continue,
            };
            self.columns[k].resolved = resolved;
            fixed += resolved;
        }
        let shared = f64::from((available - fixed).max(0));
        for col in &mut self.columns {
            if let ColumnWidth::Percent(pct) = col.width {
                col.resolved = (pct * shared / 100.0).round() as i32;
            }
        }

        let widths: Vec<i32> = self.columns.iter().map(|c| c.resolved).collect();
        for cell in self.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
            let end = (cell.physical_col + cell.col_span).min(widths.len());
            let start = cell.physical_col.min(end);
            cell.width = widths[start..end].iter().sum();
        }
    }

    /// Widest single-span content (plus its cell padding) in physical column `k`.
    pub fn natural_column_width(&self, k: usize) -> i32 {
        self.rows
            .iter()
            .filter(|row| !row.handle)
            .flat_map(|row| row.cells.iter())
            .filter(|cell| cell.physical_col == k && cell.col_span == 1)
            .filter_map(|cell| {
                cell.content
                    .as_ref()
                    .map(|content| content.size.width + cell.margin_h())
            })
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientContainer {
    pub id: String,
    pub hidden: bool,
    pub dirty: bool,
    pub margins: Sides,
    pub parent: ParentBox,
    pub table: ClientTable,
}

/// Every mounted layout container, keyed by id.
#[derive(Debug, Default)]
pub struct Page {
    containers: HashMap<String, ClientContainer>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a generated layout container.
    ///
    /// `measure` reports the offset size of leaf content as the host would
    /// lay it out. Row heights and column widths are derived from those.
    pub fn mount(
        &mut self,
        dom: &DomElement,
        parent: ParentBox,
        measure: &dyn Fn(&DomElement) -> Size,
    ) -> Result<&mut ClientContainer> {
        let container = build_container(dom, parent, measure)?;
        let id = container.id.clone();
        self.containers.insert(id.clone(), container);
        self.containers
            .get_mut(&id)
            .ok_or(LayoutError::UnknownLayout(id))
    }

    pub fn insert(&mut self, container: ClientContainer) {
        self.containers.insert(container.id.clone(), container);
    }

    pub fn remove(&mut self, id: &str) -> Option<ClientContainer> {
        self.containers.remove(id)
    }

    pub fn container(&self, id: &str) -> Option<&ClientContainer> {
        self.containers.get(id)
    }

    pub fn container_mut(&mut self, id: &str) -> Option<&mut ClientContainer> {
        self.containers.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.containers.contains_key(id)
    }

    pub fn set_hidden(&mut self, id: &str, hidden: bool) -> bool {
        self.container_mut(id)
            .map(|container| container.hidden = hidden)
            .is_some()
    }

    pub fn mark_dirty(&mut self, id: &str) -> bool {
        self.container_mut(id)
            .map(|container| container.dirty = true)
            .is_some()
    }

    /// Viewport or parent change; the memo no longer matches so the next
    /// reflow recomputes.
    pub fn set_parent(&mut self, id: &str, parent: ParentBox) -> bool {
        self.container_mut(id)
            .map(|container| container.parent = parent)
            .is_some()
    }
}

fn build_container(
    dom: &DomElement,
    parent: ParentBox,
    measure: &dyn Fn(&DomElement) -> Size,
) -> Result<ClientContainer> {
    let id = dom
        .id()
        .ok_or_else(|| LayoutError::Malformed("layout container has no id".into()))?
        .to_string();
    let table = dom
        .children_of_kind(ElementKind::Table)
        .next()
        .ok_or_else(|| LayoutError::Malformed(format!("container `{id}` has no table")))?;

    let columns = table
        .children_of_kind(ElementKind::ColGroup)
        .flat_map(|group| group.children_of_kind(ElementKind::Col))
        .map(|col| ClientColumn {
            width: ColumnWidth::parse(col.style("width")),
            handle: col.has_class(VERTICAL_HANDLE_CLASS),
            resolved: 0,
        })
        .collect();

    let mut rows = Vec::new();
    let mut occupied: Vec<usize> = Vec::new();
    for tr in table
        .children_of_kind(ElementKind::TBody)
        .flat_map(|tbody| tbody.children_of_kind(ElementKind::Tr))
    {
        if tr.has_class(HORIZONTAL_HANDLE_CLASS) {
            let height = tr.style("height").and_then(parse_px).unwrap_or(0);
            let cells = tr
                .children_of_kind(ElementKind::Td)
                .map(|td| build_cell(td, 0, measure))
                .collect();
            rows.push(ClientRow {
                handle: true,
                height,
                cells,
            });
            continue;
        }

        let mut cells = Vec::new();
        let mut ptr = 0;
        for td in tr.children_of_kind(ElementKind::Td) {
            while occupied.get(ptr).is_some_and(|n| *n > 0) {
                ptr += 1;
            }
            let cell = build_cell(td, ptr, measure);
            if occupied.len() < ptr + cell.col_span {
                occupied.resize(ptr + cell.col_span, 0);
            }
            for slot in &mut occupied[ptr..ptr + cell.col_span] {
                *slot = cell.row_span;
            }
            ptr += cell.col_span;
            cells.push(cell);
        }
        for slot in occupied.iter_mut().filter(|n| **n > 0) {
            *slot -= 1;
        }

        let height = cells
            .iter()
            .filter(|cell| cell.row_span == 1)
            .map(|cell| {
                cell.padding.vertical() + cell.content.as_ref().map_or(0, |c| c.outer_height())
            })
            .max()
            .unwrap_or(0);
        rows.push(ClientRow {
            handle: false,
            height,
            cells,
        });
    }

    let mut table = ClientTable {
        fixed_layout: table.style("table-layout") == Some("fixed"),
        style_height: table.style("height").map(str::to_string),
        columns,
        rows,
        memo: None,
    };
    table.resolve_widths(parent.available_width());

    Ok(ClientContainer {
        id,
        hidden: false,
        dirty: true,
        margins: Sides::default(),
        parent,
        table,
    })
}

fn build_cell(td: &DomElement, physical_col: usize, measure: &dyn Fn(&DomElement) -> Size) -> ClientCell {
    let span = |name: &str| {
        td.attribute(name)
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(1)
    };
    ClientCell {
        handle: td.has_class(VERTICAL_HANDLE_CLASS),
        physical_col,
        row_span: span("rowspan"),
        col_span: span("colspan"),
        padding: td.style("padding").and_then(Sides::parse_css).unwrap_or_default(),
        vertical_align: td.style("vertical-align").is_some(),
        width: 0,
        height: None,
        content: td.first_child().map(|child| build_content(child, measure)),
    }
}

fn build_content(el: &DomElement, measure: &dyn Fn(&DomElement) -> Size) -> ClientContent {
    let margins = el.style("margin").and_then(Sides::parse_css).unwrap_or_default();
    let insets = el.style("padding").and_then(Sides::parse_css).unwrap_or_default();

    let kind = if el.kind() == ElementKind::Table && el.has_class(CENTER_WRAPPER_CLASS) {
        let inner = el
            .children_of_kind(ElementKind::TBody)
            .flat_map(|b| b.children_of_kind(ElementKind::Tr))
            .flat_map(|tr| tr.children_of_kind(ElementKind::Td))
            .find_map(|td| td.first_child());
        match inner {
            Some(inner) => ContentKind::Centered {
                inner: Box::new(build_content(inner, measure)),
                inner_cell_height: None,
            },
            None => ContentKind::Plain,
        }
    } else if el.has_class(TEXT_EDIT_WRAPPER_CLASS) {
        ContentKind::TextEdit {
            bottom_margin: el.style("margin-bottom").and_then(parse_px).unwrap_or(0),
            textarea_height: None,
        }
    } else if el.children_of_kind(ElementKind::Table).next().is_some() && el.id().is_some() {
        ContentKind::Nested
    } else if el.is_resizable() {
        ContentKind::Resizable { last_resize: None }
    } else {
        ContentKind::Plain
    };

    let size = match &kind {
        ContentKind::Centered { inner, .. } => inner.size,
        _ => measure(el),
    };

    ClientContent {
        id: el.id().map(str::to_string),
        kind,
        margins,
        insets,
        size,
        style_width: el.style("width").and_then(parse_px),
        style_height: el.style("height").and_then(parse_px),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Alignment, GridLayout, HAlign, LayoutItem};
    use crate::session::Session;
    use crate::widget::{BlockWidget, TextEditWidget};

    fn measure(_: &DomElement) -> Size {
        Size::new(40, 20)
    }

    #[test]
    fn mount_reads_columns_rows_and_content() {
        let mut layout = GridLayout::new("g", 2, 2);
        layout.grid_mut().set_column_resizable(0, true).set_row_resizable(0, true);
        layout
            .set_cell(0, 0, LayoutItem::widget(BlockWidget::new("a", Size::new(1, 1)).with_resize()), 1, 1, Alignment::default())
            .unwrap();
        layout
            .set_cell(0, 1, LayoutItem::widget(BlockWidget::new("b", Size::new(1, 1))), 1, 1, Alignment::horizontal(HAlign::Center))
            .unwrap();
        layout
            .set_cell(1, 0, LayoutItem::widget(TextEditWidget::new("t", 2, 10).with_bottom_margin(3)), 1, 2, Alignment::default())
            .unwrap();
        let dom = layout.create_dom(true, true, &mut Session::default()).unwrap();

        let mut page = Page::new();
        let container = page.mount(&dom, ParentBox::new(400, 300), &measure).unwrap();
        let table = &container.table;

        assert!(table.fixed_layout);
        assert_eq!(table.columns.len(), 3);
        assert!(table.columns[1].handle);
        assert_eq!(table.columns[0].width, ColumnWidth::Percent(50.0));
        assert_eq!(table.rows.len(), 3);
        assert!(table.rows[1].handle);
        assert_eq!(table.rows[1].height, 6);
        assert_eq!(table.row_handles(), vec![0]);
        assert_eq!(table.column_handles(), vec![0]);

        let first = &table.rows[0].cells;
        assert!(matches!(first[0].content.as_ref().unwrap().kind, ContentKind::Resizable { .. }));
        assert!(first[1].handle);
        assert_eq!(first[2].physical_col, 2);
        assert!(matches!(first[2].content.as_ref().unwrap().kind, ContentKind::Centered { .. }));
        // 9px top margin, 0 bottom (handle below), 20px content
        assert_eq!(table.rows[0].height, 29);

        let edit = table.rows[2].cells[0].content.as_ref().unwrap();
        assert!(matches!(edit.kind, ContentKind::TextEdit { bottom_margin: 3, .. }));
        assert_eq!(table.rows[2].cells[0].col_span, 3);
        assert!(container.dirty);
    }

    #[test]
    fn rowspans_shift_later_cells_right() {
        let mut layout = GridLayout::new("g", 2, 2);
        for (r, c, rs) in [(0, 0, 2), (0, 1, 1), (1, 1, 1)] {
            let id = format!("c{r}{c}");
            layout
                .set_cell(r, c, LayoutItem::widget(BlockWidget::new(id, Size::new(1, 1))), rs, 1, Alignment::default())
                .unwrap();
        }
        let dom = layout.create_dom(true, true, &mut Session::default()).unwrap();
        let mut page = Page::new();
        let container = page.mount(&dom, ParentBox::new(200, 100), &measure).unwrap();

        assert_eq!(container.table.rows[1].cells[0].physical_col, 1);
    }

    #[test]
    fn percent_columns_resolve_against_the_parent() {
        let mut layout = GridLayout::new("g", 1, 2);
        layout.grid_mut().set_column_stretch(0, 3).set_column_stretch(1, 1);
        let dom = layout.create_dom(true, true, &mut Session::default()).unwrap();
        let mut page = Page::new();
        let container = page
            .mount(&dom, ParentBox::new(420, 100).with_padding(Sides::new(0, 10, 0, 10)), &measure)
            .unwrap();

        let widths: Vec<i32> = container.table.columns.iter().map(|c| c.resolved).collect();
        assert_eq!(widths, vec![300, 100]);
        assert_eq!(container.table.rows[0].cells[1].width, 100);
    }

    #[test]
    fn markup_without_a_table_is_rejected() {
        let dom = DomElement::new(ElementKind::Div).with_id("x");
        let mut page = Page::new();
        let err = page.mount(&dom, ParentBox::default(), &measure);
        assert!(matches!(err, Err(LayoutError::Malformed(_))));
    }

    #[test]
    fn page_flags_track_containers() {
        let layout_dom = GridLayout::new("g", 1, 1)
            .create_dom(true, true, &mut Session::default())
            .unwrap();
        let mut page = Page::new();
        page.mount(&layout_dom, ParentBox::new(10, 10), &measure).unwrap();

        assert!(page.set_hidden("g", true));
        assert!(page.container("g").unwrap().hidden);
        assert!(!page.mark_dirty("nope"));
        assert!(page.remove("g").is_some());
        assert!(!page.contains("g"));
    }
}

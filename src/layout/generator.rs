//! Static generator: grid model to table-shaped DOM.
//!
//! The generated tree is `div#id > table > [colgroup] > tbody > tr*`. Column
//! and row sizes are expressed as percentages of the stretch totals; the
//! client reflow engine later turns row percentages into pixels.

use crate::dom::{DomElement, ElementKind};
use crate::error::Result;
use crate::geometry::{Sides, px};
use crate::layout::GridLayout;
use crate::layout::grid::{Cell, HAlign, Slot, Track, VAlign};
use crate::session::{Session, Statement};

pub const CENTER_WRAPPER_CLASS: &str = "hcenter";
pub const VERTICAL_HANDLE_CLASS: &str = "resize-handle-vertical";
pub const HORIZONTAL_HANDLE_CLASS: &str = "resize-handle-horizontal";

pub const LAYOUT_SCRIPT_KEY: &str = "js/grid-layout.js";
pub const RESIZE_SCRIPT_KEY: &str = "js/grid-layout-resize.js";

/// Read-only snapshot of the grid shape used while cells are rendered.
struct Frame {
    rows: Vec<Track>,
    columns: Vec<Track>,
    handle_below: Vec<bool>,
    handle_after: Vec<bool>,
    total_row_stretch: i32,
    total_column_stretch: i32,
    physical_columns: usize,
    horizontal_spacing: i32,
    vertical_spacing: i32,
    margins: Sides,
    fixed_layout: bool,
    justify_width_ok: bool,
}

impl Frame {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Percentage for a track, or `None` when it keeps its natural size.
    fn share(stretch: i32, total: i32, count: usize, fit: bool) -> Option<i32> {
        let stretch = stretch.max(0);
        if stretch != 0 || (fit && total == 0) {
            if total == 0 {
                Some(100 / count as i32)
            } else {
                Some(100 * stretch / total)
            }
        } else {
            None
        }
    }

    fn row_share(&self, row: usize, fit_height: bool) -> Option<i32> {
        Self::share(
            self.rows[row].stretch,
            self.total_row_stretch,
            self.row_count(),
            fit_height,
        )
    }

    fn column_share(&self, col: usize) -> Option<i32> {
        Self::share(
            self.columns[col].stretch,
            self.total_column_stretch,
            self.column_count(),
            true,
        )
    }

    fn handle_width(&self) -> i32 {
        self.horizontal_spacing.max(1)
    }

    fn handle_height(&self) -> i32 {
        self.vertical_spacing.max(1)
    }

    fn top_padding(&self, row: usize) -> i32 {
        if row == 0 {
            self.margins.top
        } else if self.handle_below[row - 1] {
            0
        } else {
            (self.vertical_spacing + 1) / 2
        }
    }

    fn bottom_padding(&self, last_row: usize) -> i32 {
        if last_row + 1 == self.row_count() {
            self.margins.bottom
        } else if self.handle_below[last_row] {
            0
        } else {
            self.vertical_spacing / 2
        }
    }

    fn left_padding(&self, col: usize) -> i32 {
        if col == 0 {
            self.margins.left
        } else if self.handle_after[col - 1] {
            0
        } else {
            (self.horizontal_spacing + 1) / 2
        }
    }

    fn right_padding(&self, last_col: usize) -> i32 {
        if last_col + 1 == self.column_count() {
            self.margins.right
        } else if self.handle_after[last_col] {
            0
        } else {
            self.horizontal_spacing / 2
        }
    }

    /// Effective fit flags and the physical column span of a cell.
    fn fit(&self, row: usize, col: usize, cell: &Cell) -> (bool, bool, usize) {
        let mut fit_width =
            cell.col_span == self.column_count() || self.total_column_stretch == 0;
        let mut fit_height = cell.row_span == self.row_count() || self.total_row_stretch == 0;

        let row_stretch = self.rows[row].stretch.max(0);
        for track in &self.rows[row..row + cell.row_span] {
            if track.stretch != 0 {
                fit_height = true;
            } else if row_stretch == 0 {
                fit_height = false;
            }
        }

        let mut col_span = cell.col_span;
        for (j, track) in self.columns[col..col + cell.col_span].iter().enumerate() {
            if track.stretch != 0 {
                fit_width = true;
            }
            if j + 1 < cell.col_span && track.resizable {
                col_span += 1;
            }
        }

        if matches!(cell.alignment.horizontal, Some(h) if h != HAlign::Justify) {
            fit_width = false;
        }
        if cell.alignment.vertical.is_some() {
            fit_height = false;
        }
        (fit_width, fit_height, col_span)
    }
}

impl GridLayout {
    /// Render the layout as a static DOM subtree.
    ///
    /// Support scripts and the shared stylesheet rule are queued on `session`
    /// the first time any layout renders; a fit-height render also queues the
    /// client registration of this layout.
    pub fn create_dom(
        &mut self,
        fit_width: bool,
        fit_height: bool,
        session: &mut Session,
    ) -> Result<DomElement> {
        self.force_update = false;
        load_support_scripts(session, self.grid.has_resize_handles());

        let frame = self.frame(session);

        let mut container = DomElement::new(ElementKind::Div)
            .with_id(self.id.clone())
            .with_style("position", "relative");
        if fit_height {
            container.set_style("height", "100%");
        }

        let mut table = DomElement::new(ElementKind::Table);
        if fit_width {
            if self.fixed_layout {
                table.set_style("table-layout", "fixed");
            }
            table.set_style("width", "100%");
        }
        if fit_height {
            table.set_style("height", "100%");
        }

        if fit_height {
            let config = self.build_render_config();
            session.do_javascript(Statement::RegisterLayout(config.clone()));
            self.store_render_config(config);
        }

        if fit_width && frame.column_count() > 0 {
            table.add_child(column_group(&frame));
        }

        let mut tbody = DomElement::new(ElementKind::TBody);
        for row in 0..frame.row_count() {
            tbody.add_child(self.render_row(&frame, row, fit_height, session)?);
            if frame.handle_below[row] {
                tbody.add_child(handle_row(&frame));
            }
        }

        table.add_child(tbody);
        container.add_child(table);
        Ok(container)
    }

    fn frame(&self, session: &Session) -> Frame {
        let grid = &self.grid;
        Frame {
            rows: grid.rows().to_vec(),
            columns: grid.columns().to_vec(),
            handle_below: (0..grid.row_count())
                .map(|r| grid.has_handle_below(r))
                .collect(),
            handle_after: (0..grid.column_count())
                .map(|c| grid.has_handle_after(c))
                .collect(),
            total_row_stretch: grid.total_row_stretch(),
            total_column_stretch: grid.total_column_stretch(),
            physical_columns: grid.physical_column_count(),
            horizontal_spacing: grid.horizontal_spacing(),
            vertical_spacing: grid.vertical_spacing(),
            margins: self.effective_margins(),
            fixed_layout: self.fixed_layout,
            justify_width_ok: session.capabilities().justify_width_ok,
        }
    }

    fn render_row(
        &mut self,
        frame: &Frame,
        row: usize,
        fit_height: bool,
        session: &mut Session,
    ) -> Result<DomElement> {
        let mut tr = DomElement::new(ElementKind::Tr);
        let height = frame.row_share(row, fit_height).map(|pct| format!("{pct}%"));
        if let Some(height) = &height {
            tr.set_style("height", height.clone());
        }

        for col in 0..frame.column_count() {
            match self.grid.slot(row, col) {
                Slot::Anchor(_) => {}
                Slot::Empty => {
                    let padding = Sides::new(
                        frame.top_padding(row),
                        frame.right_padding(col),
                        frame.bottom_padding(row),
                        frame.left_padding(col),
                    );
                    let mut td = DomElement::new(ElementKind::Td);
                    if let Some(height) = &height {
                        td.set_style("height", height.clone());
                    }
                    finish_cell(&mut td, padding, None);
                    tr.add_child(td);
                    if frame.handle_after[col] {
                        tr.add_child(handle_cell(frame, padding));
                    }
                    continue;
                }
                Slot::Covered { row: r, col: c } => {
                    let (r, c) = (*r, *c);
                    // Rows below the anchor still own the handle column right of the span.
                    let last_col = self.grid.cell(r, c).map(|cell| c + cell.col_span - 1);
                    if r < row && last_col == Some(col) && frame.handle_after[col] {
                        let padding =
                            Sides::new(frame.top_padding(row), 0, frame.bottom_padding(row), 0);
                        tr.add_child(handle_cell(frame, padding));
                    }
                    continue;
                }
            }

            let Slot::Anchor(cell) = self.grid.slot_mut(row, col) else {
                continue;
            };
            let (fit_width, fit_height_cell, col_span) = frame.fit(row, col, cell);
            let last_row = row + cell.row_span - 1;
            let last_col = col + cell.col_span - 1;
            let padding = Sides::new(
                frame.top_padding(row),
                frame.right_padding(last_col),
                frame.bottom_padding(last_row),
                frame.left_padding(col),
            );
            let alignment = cell.alignment;
            let row_span = cell.row_span;

            let mut td = DomElement::new(ElementKind::Td);
            let mut text_align = None;
            let mut content = cell.item.render(fit_width, fit_height_cell, session)?;
            match alignment.horizontal.unwrap_or(HAlign::Justify) {
                HAlign::Center => {
                    content = center_wrapper(content, alignment.vertical.is_none());
                }
                side @ (HAlign::Left | HAlign::Right) => {
                    let side = if side == HAlign::Left { "left" } else { "right" };
                    if content.is_default_inline() {
                        text_align = Some(side);
                    } else {
                        content.set_style("float", side);
                    }
                }
                HAlign::Justify => {
                    if content.style("width").is_none()
                        && frame.fixed_layout
                        && frame.justify_width_ok
                        && !content.is_default_inline()
                    {
                        content.set_style("width", "100%");
                    }
                }
            }
            td.add_child(content);

            if alignment.vertical.is_none() {
                if let Some(height) = &height {
                    td.set_style("height", height.clone());
                }
            }
            finish_cell(&mut td, padding, alignment.vertical);
            if let Some(side) = text_align {
                td.set_style("text-align", side);
            }
            if row_span != 1 {
                td.set_attribute("rowspan", row_span.to_string());
            }
            if col_span != 1 {
                td.set_attribute("colspan", col_span.to_string());
            }
            tr.add_child(td);

            if frame.handle_after[last_col] {
                let handle_padding = Sides::new(padding.top, 0, padding.bottom, 0);
                tr.add_child(handle_cell(frame, handle_padding));
            }
        }
        Ok(tr)
    }
}

fn finish_cell(td: &mut DomElement, padding: Sides, vertical: Option<VAlign>) {
    if let Some(css) = padding.to_css() {
        td.set_style("padding", css);
    }
    if let Some(vertical) = vertical {
        td.set_style("vertical-align", vertical.css());
    }
    td.set_style("overflow-x", "hidden");
}

fn column_group(frame: &Frame) -> DomElement {
    let mut group = DomElement::new(ElementKind::ColGroup);
    for col in 0..frame.column_count() {
        let mut c = DomElement::new(ElementKind::Col);
        if let Some(pct) = frame.column_share(col) {
            c.set_style("width", format!("{pct}%"));
        }
        group.add_child(c);
        if frame.handle_after[col] {
            group.add_child(
                DomElement::new(ElementKind::Col)
                    .with_class(VERTICAL_HANDLE_CLASS)
                    .with_style("width", px(frame.handle_width())),
            );
        }
    }
    group
}

fn handle_cell(frame: &Frame, padding: Sides) -> DomElement {
    let mut td = DomElement::new(ElementKind::Td).with_class(VERTICAL_HANDLE_CLASS);
    if let Some(css) = padding.to_css() {
        td.set_style("padding", css);
    }
    td.add_child(DomElement::new(ElementKind::Div).with_style("width", px(frame.handle_width())));
    td
}

fn handle_row(frame: &Frame) -> DomElement {
    let height = px(frame.handle_height());
    let mut tr = DomElement::new(ElementKind::Tr)
        .with_class(HORIZONTAL_HANDLE_CLASS)
        .with_style("height", height.clone());
    let mut td = DomElement::new(ElementKind::Td);
    if frame.physical_columns != 1 {
        td.set_attribute("colspan", frame.physical_columns.to_string());
    }
    if let Some(css) = Sides::new(0, frame.margins.right, 0, frame.margins.left).to_css() {
        td.set_style("padding", css);
    }
    td.add_child(DomElement::new(ElementKind::Div).with_style("height", height));
    tr.add_child(td);
    tr
}

/// Single-cell table that centres `content` horizontally.
fn center_wrapper(content: DomElement, full_height: bool) -> DomElement {
    let mut td = DomElement::new(ElementKind::Td);
    let mut table = DomElement::new(ElementKind::Table).with_class(CENTER_WRAPPER_CLASS);
    if full_height {
        td.set_style("height", "100%");
        table.set_style("height", "100%");
    }
    td.add_child(content);
    let mut tr = DomElement::new(ElementKind::Tr);
    tr.add_child(td);
    let mut tbody = DomElement::new(ElementKind::TBody);
    tbody.add_child(tr);
    table.add_child(tbody);
    table
}

fn load_support_scripts(session: &mut Session, resizable: bool) {
    let namespace = session.config().script_namespace.clone();
    if session.ensure_script_loaded(LAYOUT_SCRIPT_KEY, &layout_script(&namespace)) {
        session.add_stylesheet_rule(
            &format!("table.{CENTER_WRAPPER_CLASS}"),
            "margin: 0px auto; position: relative",
        );
        session.add_auto_javascript(Statement::AdjustLayouts(None));
    }
    if resizable {
        session.ensure_script_loaded(RESIZE_SCRIPT_KEY, &resize_script(&namespace));
    }
}

fn layout_script(namespace: &str) -> String {
    format!(
        "window.{namespace} = window.{namespace} || {{}};\n\
         {namespace}.layouts = {namespace}.layouts || new {namespace}.LayoutRegistry();"
    )
}

fn resize_script(namespace: &str) -> String {
    format!(
        "{namespace}.resizeHandles = {namespace}.resizeHandles || \
         new {namespace}.ResizeController({namespace}.layouts);"
    )
}

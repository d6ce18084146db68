//! Grid model - rows, columns and the cell matrix of a grid layout.
//!
//! Pure data plus structural queries. Populating the matrix validates spans
//! up front (bounds and overlap), so the generator can assume a well formed
//! grid. Mutations do not notify anyone; the owning layout is signalled
//! explicitly by its caller.
//!
//! # Example
//! ```
//! use trellis::layout::grid::{Alignment, Grid};
//! use trellis::layout::LayoutItem;
//! use trellis::widget::TextWidget;
//!
//! let mut grid = Grid::new(2, 2);
//! grid.set_row_stretch(1, 1);
//! grid.set_cell(0, 0, LayoutItem::widget(TextWidget::new("title", "Title")), 1, 2, Alignment::default())?;
//! grid.set_cell(1, 0, LayoutItem::widget(TextWidget::new("body", "Body")), 1, 1, Alignment::default())?;
//! # Ok::<(), trellis::layout::GridError>(())
//! ```

use thiserror::Error;

use crate::layout::LayoutItem;

pub const DEFAULT_SPACING: i32 = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({row}, {col}) spans {row_span}x{col_span} past a {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
        rows: usize,
        cols: usize,
    },
    #[error("cell ({row}, {col}) overlaps an already populated region")]
    Overlap { row: usize, col: usize },
    #[error("cell ({row}, {col}) has a zero span")]
    InvalidSpan { row: usize, col: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Right,
    Center,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

impl VAlign {
    pub fn css(&self) -> &'static str {
        match self {
            VAlign::Top => "top",
            VAlign::Middle => "middle",
            VAlign::Bottom => "bottom",
        }
    }
}

/// Horizontal and vertical alignment flags of a cell. `None` means unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alignment {
    pub horizontal: Option<HAlign>,
    pub vertical: Option<VAlign>,
}

impl Alignment {
    pub const fn new(horizontal: Option<HAlign>, vertical: Option<VAlign>) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub const fn horizontal(align: HAlign) -> Self {
        Self::new(Some(align), None)
    }

    pub const fn vertical(align: VAlign) -> Self {
        Self::new(None, Some(align))
    }
}

/// Row or column descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Track {
    /// Share of leftover space; zero or negative means "natural size".
    pub stretch: i32,
    /// Whether a drag handle follows this track.
    pub resizable: bool,
}

/// Item anchored at a matrix position together with its span.
#[derive(Debug)]
pub struct Cell {
    pub item: LayoutItem,
    pub row_span: usize,
    pub col_span: usize,
    pub alignment: Alignment,
}

/// State of one matrix position.
#[derive(Debug, Default)]
pub enum Slot {
    #[default]
    Empty,
    Anchor(Cell),
    /// Covered by the span of the cell anchored at `(row, col)`.
    Covered { row: usize, col: usize },
}

impl Slot {
    pub fn is_covered(&self) -> bool {
        matches!(self, Slot::Covered { .. })
    }
}

#[derive(Debug)]
pub struct Grid {
    rows: Vec<Track>,
    columns: Vec<Track>,
    slots: Vec<Vec<Slot>>,
    horizontal_spacing: i32,
    vertical_spacing: i32,
}

impl Grid {
    pub fn new(rows: usize, columns: usize) -> Self {
        let slots = (0..rows)
            .map(|_| (0..columns).map(|_| Slot::Empty).collect())
            .collect();
        Self {
            rows: vec![Track::default(); rows],
            columns: vec![Track::default(); columns],
            slots,
            horizontal_spacing: DEFAULT_SPACING,
            vertical_spacing: DEFAULT_SPACING,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn rows(&self) -> &[Track] {
        &self.rows
    }

    pub fn columns(&self) -> &[Track] {
        &self.columns
    }

    pub fn row(&self, index: usize) -> Track {
        self.rows[index]
    }

    pub fn column(&self, index: usize) -> Track {
        self.columns[index]
    }

    pub fn set_row_stretch(&mut self, row: usize, stretch: i32) -> &mut Self {
        self.rows[row].stretch = stretch;
        self
    }

    pub fn set_column_stretch(&mut self, col: usize, stretch: i32) -> &mut Self {
        self.columns[col].stretch = stretch;
        self
    }

    pub fn set_row_resizable(&mut self, row: usize, resizable: bool) -> &mut Self {
        self.rows[row].resizable = resizable;
        self
    }

    pub fn set_column_resizable(&mut self, col: usize, resizable: bool) -> &mut Self {
        self.columns[col].resizable = resizable;
        self
    }

    pub fn horizontal_spacing(&self) -> i32 {
        self.horizontal_spacing
    }

    pub fn vertical_spacing(&self) -> i32 {
        self.vertical_spacing
    }

    pub fn set_horizontal_spacing(&mut self, spacing: i32) -> &mut Self {
        self.horizontal_spacing = spacing.max(0);
        self
    }

    pub fn set_vertical_spacing(&mut self, spacing: i32) -> &mut Self {
        self.vertical_spacing = spacing.max(0);
        self
    }

    /// Place `item` at `(row, col)` covering `row_span` x `col_span` positions.
    pub fn set_cell(
        &mut self,
        row: usize,
        col: usize,
        item: LayoutItem,
        row_span: usize,
        col_span: usize,
        alignment: Alignment,
    ) -> Result<(), GridError> {
        if row_span == 0 || col_span == 0 {
            return Err(GridError::InvalidSpan { row, col });
        }
        if row + row_span > self.row_count() || col + col_span > self.column_count() {
            return Err(GridError::OutOfBounds {
                row,
                col,
                row_span,
                col_span,
                rows: self.row_count(),
                cols: self.column_count(),
            });
        }
        for r in row..row + row_span {
            for c in col..col + col_span {
                if !matches!(self.slots[r][c], Slot::Empty) {
                    return Err(GridError::Overlap { row: r, col: c });
                }
            }
        }

        for r in row..row + row_span {
            for c in col..col + col_span {
                self.slots[r][c] = Slot::Covered { row, col };
            }
        }
        self.slots[row][col] = Slot::Anchor(Cell {
            item,
            row_span,
            col_span,
            alignment,
        });
        Ok(())
    }

    /// Remove the cell anchored at `(row, col)`, freeing its whole span.
    pub fn take_cell(&mut self, row: usize, col: usize) -> Option<Cell> {
        let cell = match std::mem::take(&mut self.slots[row][col]) {
            Slot::Anchor(cell) => cell,
            other => {
                self.slots[row][col] = other;
                return None;
            }
        };
        for r in row..row + cell.row_span {
            for c in col..col + cell.col_span {
                self.slots[r][c] = Slot::Empty;
            }
        }
        Some(cell)
    }

    pub fn slot(&self, row: usize, col: usize) -> &Slot {
        &self.slots[row][col]
    }

    pub fn slot_mut(&mut self, row: usize, col: usize) -> &mut Slot {
        &mut self.slots[row][col]
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        match &self.slots[row][col] {
            Slot::Anchor(cell) => Some(cell),
            _ => None,
        }
    }

    /// Anchored cells in row-major order.
    pub fn anchors(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        self.slots.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, slot)| match slot {
                Slot::Anchor(cell) => Some((r, c, cell)),
                _ => None,
            })
        })
    }

    pub fn anchors_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.slots.iter_mut().flatten().filter_map(|slot| match slot {
            Slot::Anchor(cell) => Some(cell),
            _ => None,
        })
    }

    /// Position of the cell holding the item with the given key.
    pub fn find(&self, key: &str) -> Option<(usize, usize)> {
        self.anchors()
            .find(|(_, _, cell)| cell.item.key() == key)
            .map(|(r, c, _)| (r, c))
    }

    pub fn total_row_stretch(&self) -> i32 {
        self.rows.iter().map(|t| t.stretch.max(0)).sum()
    }

    pub fn total_column_stretch(&self) -> i32 {
        self.columns.iter().map(|t| t.stretch.max(0)).sum()
    }

    /// A horizontal drag handle sits below `row`.
    pub fn has_handle_below(&self, row: usize) -> bool {
        row + 1 < self.row_count() && self.rows[row].resizable
    }

    /// A vertical drag handle sits right of `col`.
    pub fn has_handle_after(&self, col: usize) -> bool {
        col + 1 < self.column_count() && self.columns[col].resizable
    }

    pub fn has_resize_handles(&self) -> bool {
        (0..self.row_count()).any(|r| self.has_handle_below(r))
            || (0..self.column_count()).any(|c| self.has_handle_after(c))
    }

    /// Column count including the spacer columns holding vertical handles.
    pub fn physical_column_count(&self) -> usize {
        self.column_count()
            + (0..self.column_count())
                .filter(|c| self.has_handle_after(*c))
                .count()
    }
}

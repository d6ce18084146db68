//! Minimum-size aggregation over the grid.
//!
//! A row needs as much height as its tallest anchored item; the grid needs the
//! sum of its rows plus the spacing between them. Columns are symmetric.
//! Spanning items count towards their anchor row/column only.

use crate::layout::grid::Grid;

pub fn row_minimum_heights(grid: &Grid) -> Vec<i32> {
    let mut minima = vec![0; grid.row_count()];
    for (row, _, cell) in grid.anchors() {
        minima[row] = minima[row].max(cell.item.minimum_height());
    }
    minima
}

pub fn column_minimum_widths(grid: &Grid) -> Vec<i32> {
    let mut minima = vec![0; grid.column_count()];
    for (_, col, cell) in grid.anchors() {
        minima[col] = minima[col].max(cell.item.minimum_width());
    }
    minima
}

pub fn minimum_height(grid: &Grid) -> i32 {
    combine(&row_minimum_heights(grid), grid.vertical_spacing())
}

pub fn minimum_width(grid: &Grid) -> i32 {
    combine(&column_minimum_widths(grid), grid.horizontal_spacing())
}

fn combine(minima: &[i32], spacing: i32) -> i32 {
    if minima.is_empty() {
        return 0;
    }
    minima.iter().sum::<i32>() + (minima.len() as i32 - 1) * spacing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::layout::LayoutItem;
    use crate::layout::grid::Alignment;
    use crate::widget::BlockWidget;

    fn block(id: &str, width: i32, height: i32) -> LayoutItem {
        LayoutItem::widget(BlockWidget::new(id, Size::new(width, height)))
    }

    #[test]
    fn minimum_height_adds_rows_and_spacing() {
        let mut grid = Grid::new(3, 2);
        grid.set_vertical_spacing(5);
        grid.set_cell(0, 0, block("a", 10, 20), 1, 1, Alignment::default())
            .unwrap();
        grid.set_cell(0, 1, block("b", 10, 35), 1, 1, Alignment::default())
            .unwrap();
        grid.set_cell(2, 0, block("c", 10, 12), 1, 1, Alignment::default())
            .unwrap();

        assert_eq!(row_minimum_heights(&grid), vec![35, 0, 12]);
        assert_eq!(minimum_height(&grid), 35 + 0 + 12 + 2 * 5);
    }

    #[test]
    fn minimum_width_is_symmetric() {
        let mut grid = Grid::new(1, 3);
        grid.set_horizontal_spacing(4);
        grid.set_cell(0, 0, block("a", 30, 1), 1, 2, Alignment::default())
            .unwrap();
        grid.set_cell(0, 2, block("b", 50, 1), 1, 1, Alignment::default())
            .unwrap();

        assert_eq!(column_minimum_widths(&grid), vec![30, 0, 50]);
        assert_eq!(minimum_width(&grid), 80 + 2 * 4);
    }

    #[test]
    fn empty_grid_needs_nothing() {
        assert_eq!(minimum_height(&Grid::new(0, 0)), 0);
        assert_eq!(minimum_width(&Grid::new(2, 0)), 0);
    }
}

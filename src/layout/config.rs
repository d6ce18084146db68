use blake3::Hash;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::geometry::Sides;
use crate::layout::grid::Grid;
use crate::layout::minimum::row_minimum_heights;

/// Per-row sizing state shared between the generator and the client reflow.
///
/// Created fresh on every full render. The resize controller mutates
/// `stretch` in place between renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub id: String,
    pub stretch: Vec<i32>,
    pub min_height: Vec<i32>,
}

impl RenderConfig {
    /// # Panics
    /// Panics if `stretch` and `min_height` differ in length.
    pub fn new(id: impl Into<String>, stretch: Vec<i32>, min_height: Vec<i32>) -> Self {
        let config = Self {
            id: id.into(),
            stretch,
            min_height,
        };
        config.assert_consistent();
        config
    }

    /// Derive the config for a grid rendered with the given outer margins.
    ///
    /// When no row stretches, every row gets stretch 1 so the available height
    /// is shared evenly.
    pub fn for_grid(id: impl Into<String>, grid: &Grid, margins: Sides) -> Self {
        let row_count = grid.row_count();
        let all_equal = grid.total_row_stretch() == 0;
        let stretch = grid
            .rows()
            .iter()
            .map(|track| if all_equal { 1 } else { track.stretch })
            .collect();

        let min_height = row_minimum_heights(grid)
            .into_iter()
            .enumerate()
            .map(|(i, min)| {
                let mut min = min;
                min += if i == 0 {
                    margins.top
                } else {
                    grid.vertical_spacing()
                };
                if i + 1 == row_count {
                    min += margins.bottom;
                }
                min
            })
            .collect();

        Self::new(id, stretch, min_height)
    }

    pub fn row_count(&self) -> usize {
        self.stretch.len()
    }

    /// # Panics
    /// Panics if the per-row arrays have drifted apart.
    pub fn assert_consistent(&self) {
        assert_eq!(
            self.stretch.len(),
            self.min_height.len(),
            "render config rows out of sync"
        );
    }

    pub fn digest(&self) -> Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.id.as_bytes());
        hasher.update(&(self.stretch.len() as u64).to_le_bytes());
        for value in self.stretch.iter().chain(self.min_height.iter()) {
            hasher.update(&value.to_le_bytes());
        }
        hasher.finalize()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a registration payload received from the wire.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        if config.stretch.len() != config.min_height.len() {
            return Err(LayoutError::Malformed(format!(
                "layout `{}` has {} stretch values for {} rows",
                config.id,
                config.stretch.len(),
                config.min_height.len()
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::layout::LayoutItem;
    use crate::layout::grid::Alignment;
    use crate::widget::BlockWidget;

    fn grid() -> Grid {
        let mut grid = Grid::new(3, 1);
        grid.set_vertical_spacing(6);
        for (row, height) in [(0, 20), (1, 40), (2, 10)] {
            let item = LayoutItem::widget(BlockWidget::new(format!("b{row}"), Size::new(5, height)));
            grid.set_cell(row, 0, item, 1, 1, Alignment::default())
                .unwrap();
        }
        grid
    }

    #[test]
    fn margins_fold_into_first_and_last_rows() {
        let mut grid = grid();
        grid.set_row_stretch(1, 2);
        let config = RenderConfig::for_grid("g", &grid, Sides::new(9, 0, 7, 0));

        assert_eq!(config.stretch, vec![0, 2, 0]);
        assert_eq!(config.min_height, vec![20 + 9, 40 + 6, 10 + 6 + 7]);
    }

    #[test]
    fn no_stretch_means_equal_shares() {
        let config = RenderConfig::for_grid("g", &grid(), Sides::default());
        assert_eq!(config.stretch, vec![1, 1, 1]);
    }

    #[test]
    fn serialises_with_camel_case_keys() {
        let config = RenderConfig::new("g", vec![1], vec![12]);
        assert_eq!(
            config.to_json().unwrap(),
            r#"{"id":"g","stretch":[1],"minHeight":[12]}"#
        );
    }

    #[test]
    fn wire_payload_with_mismatched_rows_is_rejected() {
        let err = RenderConfig::from_json(r#"{"id":"g","stretch":[1,1],"minHeight":[3]}"#);
        assert!(matches!(err, Err(LayoutError::Malformed(_))));
    }

    #[test]
    #[should_panic(expected = "render config rows out of sync")]
    fn mismatched_arrays_panic() {
        RenderConfig::new("g", vec![1, 2], vec![0]);
    }

    #[test]
    fn digest_tracks_stretch_changes() {
        let a = RenderConfig::new("g", vec![1, 1], vec![0, 0]);
        let mut b = a.clone();
        assert_eq!(a.digest(), b.digest());
        b.stretch[0] = -1;
        assert_ne!(a.digest(), b.digest());
    }
}

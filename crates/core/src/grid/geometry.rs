//! Cell placement for the sensor grid.

use crate::core_types::Vec2;
use crate::error::{Result, VizError};
use crate::scene::Rect;
use serde::{Deserialize, Serialize};

/// Sensor sheet rows
pub const HW_ROWS: usize = 44;
/// Sensor sheet columns
pub const HW_COLS: usize = 52;

/// Grid dimensions and cell spacing in view units
///
/// The grid is centered on the origin. Columns run left to right; row 0 is the
/// top row, so it gets the highest y coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub rows: usize,
    pub cols: usize,
    /// Center-to-center spacing
    pub cell_size: f32,
    /// Gap subtracted from each drawn square
    pub padding: f32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            rows: HW_ROWS,
            cols: HW_COLS,
            cell_size: 0.25,
            padding: 0.01,
        }
    }
}

impl GridGeometry {
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Full grid extent as `(width, height)`
    pub fn extent(&self) -> (f32, f32) {
        (
            self.cols as f32 * self.cell_size,
            self.rows as f32 * self.cell_size,
        )
    }

    /// Side of each drawn square
    pub fn draw_size(&self) -> f32 {
        self.cell_size - self.padding
    }

    pub fn cell_center(&self, row: usize, col: usize) -> Vec2 {
        let (width, height) = self.extent();
        let offset = Vec2::new(-width / 2.0, -height / 2.0);
        let half = self.cell_size / 2.0;
        Vec2::new(
            offset.x + col as f32 * self.cell_size + half,
            offset.y + (self.rows - 1 - row) as f32 * self.cell_size + half,
        )
    }

    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        Rect::square(self.cell_center(row, col), self.draw_size())
    }

    /// Cell whose spacing square contains `p`, if any
    pub fn cell_at(&self, p: Vec2) -> Option<(usize, usize)> {
        let (width, height) = self.extent();
        let x = p.x + width / 2.0;
        let y = p.y + height / 2.0;
        if x < 0.0 || y < 0.0 || x >= width || y >= height {
            return None;
        }
        let col = (x / self.cell_size) as usize;
        let from_bottom = (y / self.cell_size) as usize;
        let row = self.rows.checked_sub(1 + from_bottom)?;
        (col < self.cols).then_some((row, col))
    }

    /// Check dimensions and spacing
    ///
    /// # Errors
    ///
    /// Returns [`VizError::InvalidConfig`] for an empty grid, a non-positive
    /// cell size, or a padding outside `[0, cell_size)`.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(VizError::invalid_config(
                "geometry",
                format!("grid must have cells, got {}x{}", self.rows, self.cols),
            ));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(VizError::non_positive(
                "geometry.cell_size",
                f64::from(self.cell_size),
            ));
        }
        if !(0.0..self.cell_size).contains(&self.padding) {
            return Err(VizError::invalid_config(
                "geometry.padding",
                format!(
                    "must be in [0, cell_size), got {} with cell_size {}",
                    self.padding, self.cell_size
                ),
            ));
        }
        Ok(())
    }
}

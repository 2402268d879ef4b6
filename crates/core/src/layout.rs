//! Sensor layout providers
//!
//! A layout answers one question: does grid position `(col, row)` carry a
//! physical sensor? Note the argument order, column first, which matches how
//! sensor sheets are described (x, y). The hardware grid evaluates the layout
//! exactly once per cell at construction and never asks again.

use crate::error::{Result, VizError};

/// Validity mask over the sensor grid
pub trait SensorLayout {
    /// True when `(col, row)` corresponds to a physical sensor
    fn is_valid(&self, col: usize, row: usize) -> bool;
}

impl<F> SensorLayout for F
where
    F: Fn(usize, usize) -> bool,
{
    fn is_valid(&self, col: usize, row: usize) -> bool {
        self(col, row)
    }
}

/// Number of valid cells in a `rows x cols` grid, i.e. the expected reading length
pub fn count_valid<L: SensorLayout + ?Sized>(layout: &L, rows: usize, cols: usize) -> usize {
    (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (col, row)))
        .filter(|&(col, row)| layout.is_valid(col, row))
        .count()
}

/// Every cell carries a sensor
#[derive(Debug, Clone, Copy, Default)]
pub struct FullLayout;

impl SensorLayout for FullLayout {
    fn is_valid(&self, _col: usize, _row: usize) -> bool {
        true
    }
}

/// Explicit mask, typically loaded from a sensor sheet definition
///
/// Text form: one line per row, `#` for a sensor and `.` for an empty position.
/// Positions outside the mask are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskLayout {
    rows: usize,
    cols: usize,
    /// Row-major validity bits
    cells: Vec<bool>,
}

impl MaskLayout {
    /// Parse a mask from its text form. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::InvalidLayout`] when the mask is empty, when rows have
    /// different lengths, or when a character other than `#`/`.` appears.
    pub fn parse(text: &str) -> Result<Self> {
        let mut cells = Vec::new();
        let mut rows = 0;
        let mut cols = None;

        for (line_no, line) in text.lines().map(str::trim).enumerate() {
            if line.is_empty() {
                continue;
            }
            let width = line.chars().count();
            match cols {
                None => cols = Some(width),
                Some(expected) if expected != width => {
                    return Err(VizError::InvalidLayout(format!(
                        "line {} has {width} columns, expected {expected}",
                        line_no + 1
                    )));
                }
                Some(_) => {}
            }
            for ch in line.chars() {
                match ch {
                    '#' => cells.push(true),
                    '.' => cells.push(false),
                    other => {
                        return Err(VizError::InvalidLayout(format!(
                            "unexpected '{other}' on line {}",
                            line_no + 1
                        )));
                    }
                }
            }
            rows += 1;
        }

        let cols = cols.ok_or_else(|| VizError::InvalidLayout("mask is empty".to_string()))?;
        Ok(Self { rows, cols, cells })
    }

    /// Snapshot any layout into an explicit mask
    pub fn capture<L: SensorLayout + ?Sized>(layout: &L, rows: usize, cols: usize) -> Self {
        let cells = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (col, row)))
            .map(|(col, row)| layout.is_valid(col, row))
            .collect();
        Self { rows, cols, cells }
    }

    /// Mask dimensions as `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Render back to the text form
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        if self.cols == 0 {
            return out;
        }
        for row in self.cells.chunks(self.cols) {
            out.extend(row.iter().map(|&v| if v { '#' } else { '.' }));
            out.push('\n');
        }
        out
    }
}

impl SensorLayout for MaskLayout {
    fn is_valid(&self, col: usize, row: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }
}

/// Procedural dental arch: a horseshoe band between two concentric ellipses
///
/// The arch opens toward the bottom of the grid (row `rows - 1`), with the
/// incisors at the top. Used when no sensor sheet is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchLayout {
    pub rows: usize,
    pub cols: usize,
    /// Band thickness as a fraction of the outer radii
    pub thickness: f32,
    /// Fraction of the grid height, from the top, covered by the arch
    pub depth: f32,
}

impl ArchLayout {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            thickness: 0.35,
            depth: 0.95,
        }
    }
}

impl SensorLayout for ArchLayout {
    fn is_valid(&self, col: usize, row: usize) -> bool {
        if row >= self.rows || col >= self.cols {
            return false;
        }
        // Ellipse centered on the bottom edge, so only its upper half is drawn
        let cx = (self.cols as f32 - 1.0) / 2.0;
        let cy = self.rows as f32 - 1.0;
        let rx = self.cols as f32 / 2.0;
        let ry = self.rows as f32 * self.depth;

        let dx = (col as f32 - cx) / rx;
        let dy = (row as f32 - cy) / ry;
        let r = (dx * dx + dy * dy).sqrt();
        (1.0 - self.thickness..=1.0).contains(&r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_layout() {
        let layout = |col: usize, row: usize| row == 0 && col < 2;
        assert!(layout.is_valid(0, 0));
        assert!(layout.is_valid(1, 0));
        assert!(!layout.is_valid(2, 0));
        assert_eq!(count_valid(&layout, 44, 52), 2);
    }

    #[test]
    fn test_full_layout_counts_everything() {
        assert_eq!(count_valid(&FullLayout, 44, 52), 44 * 52);
    }

    #[test]
    fn test_mask_parse_and_lookup() {
        let mask = MaskLayout::parse(
            "
            #..#
            .##.
            ",
        )
        .unwrap();
        assert_eq!(mask.dimensions(), (2, 4));
        assert!(mask.is_valid(0, 0));
        assert!(!mask.is_valid(1, 0));
        assert!(mask.is_valid(2, 1));
        // Out of bounds is never valid
        assert!(!mask.is_valid(4, 0));
        assert!(!mask.is_valid(0, 2));
        assert_eq!(mask.to_text(), "#..#\n.##.\n");
    }

    #[test]
    fn test_mask_parse_errors() {
        assert!(matches!(MaskLayout::parse(""), Err(VizError::InvalidLayout(_))));
        assert!(matches!(
            MaskLayout::parse("##\n###"),
            Err(VizError::InvalidLayout(_))
        ));
        assert!(matches!(
            MaskLayout::parse("#x"),
            Err(VizError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_capture_matches_source() {
        let arch = ArchLayout::new(44, 52);
        let mask = MaskLayout::capture(&arch, 44, 52);
        assert_eq!(count_valid(&mask, 44, 52), count_valid(&arch, 44, 52));
        let reparsed = MaskLayout::parse(&mask.to_text()).unwrap();
        assert_eq!(reparsed, mask);
    }

    #[test]
    fn test_arch_is_a_band() {
        let arch = ArchLayout::new(44, 52);
        let valid = count_valid(&arch, 44, 52);
        assert!(valid > 200, "arch too sparse: {valid}");
        assert!(valid < 44 * 52 / 2, "arch too dense: {valid}");
        // Palate center (inside the inner ellipse) carries no sensor
        assert!(!arch.is_valid(26, 40));
        // Incisor region near the top center does
        assert!(arch.is_valid(26, 2));
    }
}

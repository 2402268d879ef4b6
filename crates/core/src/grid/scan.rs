//! Row-major pairing of valid cells with a flat reading sequence
//!
//! Readings carry one entry per valid cell in row-major order, skipping
//! invalid positions. The cursor into the readings advances only on valid
//! cells; once it runs past the end every remaining valid cell is paired with
//! `None`. Surplus readings are ignored.

use crate::layout::{MaskLayout, SensorLayout};

/// A valid cell and the reading assigned to it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellReading {
    pub row: usize,
    pub col: usize,
    /// `None` once the readings are exhausted
    pub value: Option<f64>,
}

/// Iterate valid cells of `mask` in row-major order with their readings
pub fn scan_valid<'a>(
    mask: &'a MaskLayout,
    readings: &'a [f64],
) -> impl Iterator<Item = CellReading> + 'a {
    let (rows, cols) = mask.dimensions();
    let mut cursor = 0usize;
    (0..rows)
        .flat_map(move |row| (0..cols).map(move |col| (row, col)))
        .filter(move |&(row, col)| mask.is_valid(col, row))
        .map(move |(row, col)| {
            let value = readings.get(cursor).copied();
            if value.is_some() {
                cursor += 1;
            }
            CellReading { row, col, value }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_skips_invalid_cells() {
        let mask = MaskLayout::parse("#.#\n.#.").unwrap();
        let got: Vec<_> = scan_valid(&mask, &[1.0, 2.0, 3.0]).collect();
        assert_eq!(
            got,
            vec![
                CellReading { row: 0, col: 0, value: Some(1.0) },
                CellReading { row: 0, col: 2, value: Some(2.0) },
                CellReading { row: 1, col: 1, value: Some(3.0) },
            ]
        );
    }

    #[test]
    fn test_short_readings_fall_back() {
        let mask = MaskLayout::parse("###").unwrap();
        let values: Vec<_> = scan_valid(&mask, &[7.0]).map(|c| c.value).collect();
        assert_eq!(values, vec![Some(7.0), None, None]);
    }

    #[test]
    fn test_surplus_readings_ignored() {
        let mask = MaskLayout::parse(".#").unwrap();
        let got: Vec<_> = scan_valid(&mask, &[4.0, 5.0, 6.0]).collect();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].value, Some(4.0));
    }
}

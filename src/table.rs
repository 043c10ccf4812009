use crate::raster::Rasterizer;
use crate::rle::Runs;

// Printable ASCII; row index = code point - 0x20
pub const FIRST_CHAR: char = ' ';
pub const LAST_CHAR: char = '~';

pub struct GlyphTable {
    pub rows: Vec<Vec<u32>>,
    pub columns: usize,
    pub width: u32,
    pub height: u32,
}

impl GlyphTable {
    /// Builds the complete table for one (font, size) variant: every
    /// printable ASCII character rasterized and run-length encoded, in
    /// code point order.
    pub fn new(raster: &Rasterizer) -> Self {
        let mut rows = Vec::new();
        for ch in FIRST_CHAR..=LAST_CHAR {
            let bitmap = raster.glyph(ch);
            // Materialize the lazy run sequence; padding needs every length
            rows.push(Runs::new(&bitmap.bits).collect());
        }
        Self::from_rows(rows, raster.width(), raster.height())
    }

    /// Pads all rows with zeroes to the length of the longest one.
    pub fn from_rows(mut rows: Vec<Vec<u32>>, width: u32, height: u32) -> Self {
        let columns = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(columns, 0);
        }
        Self{ rows, columns, width, height }
    }

    /// Estimated size of the emitted table in bytes, one unsigned int per
    /// cell. Informational only.
    pub fn memory_usage(&self) -> usize {
        self.rows.len() * self.columns * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_range_covers_printable_ascii() {
        let chars: Vec<char> = (FIRST_CHAR..=LAST_CHAR).collect();
        assert_eq!(chars.len(), 95);
        assert_eq!(chars[0], ' ');
        assert_eq!(*chars.last().unwrap(), '~');
    }

    #[test]
    fn rows_are_padded_to_longest() {
        let table = GlyphTable::from_rows(vec![vec![4], vec![1, 2, 1], vec![2, 2]], 2, 2);
        assert_eq!(table.columns, 3);
        assert_eq!(table.rows[0], vec![4, 0, 0]);
        assert_eq!(table.rows[1], vec![1, 2, 1]);
        assert_eq!(table.rows[2], vec![2, 2, 0]);
    }

    #[test]
    fn padding_preserves_run_sums() {
        let rows = vec![vec![4], vec![1, 2, 1]];
        let table = GlyphTable::from_rows(rows, 2, 2);
        for row in &table.rows {
            let total: u32 = row.iter().sum();
            assert_eq!(total, 4);
        }
    }

    #[test]
    fn empty_rows_make_empty_table() {
        let table = GlyphTable::from_rows(vec![Vec::new(); 95], 0, 20);
        assert_eq!(table.columns, 0);
        assert_eq!(table.rows.len(), 95);
        assert_eq!(table.memory_usage(), 0);
    }

    #[test]
    fn memory_usage_counts_four_bytes_per_cell() {
        let table = GlyphTable::from_rows(vec![vec![1, 3]; 95], 2, 2);
        assert_eq!(table.memory_usage(), 95 * 2 * 4);
    }
}

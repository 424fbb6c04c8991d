use super::color::{Color, Hsla};

/// How a single grid cell is filled for a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellFill {
    /// The flat background color
    Background,
    /// Part of the wave trail
    Lit(Hsla),
}

impl CellFill {
    /// The opacity of the wave at this cell, 0 for background cells.
    pub fn brightness(&self) -> f32 {
        match self {
            Self::Background => 0.0,
            Self::Lit(color) => color.alpha,
        }
    }

    /// Resolve this fill into an opaque color.
    pub fn resolve(&self, background: Color, surface: Color) -> Color {
        match self {
            Self::Background => background,
            Self::Lit(color) => color.over(surface),
        }
    }
}

/// The cells painted for a single animation frame.
///
/// Cells are stored row major. Every row of a column holds the same fill since the wave only moves
/// horizontally.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    columns: usize,
    rows: usize,
    cells: Vec<CellFill>,
}

impl Frame {
    /// Build a frame by repeating one fill per column across every row.
    pub(crate) fn from_columns(column_fills: Vec<CellFill>, rows: usize) -> Self {
        let columns = column_fills.len();
        let mut cells = Vec::with_capacity(columns * rows);
        for _ in 0..rows {
            cells.extend_from_slice(&column_fills);
        }
        Self { columns, rows, cells }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get the fill at the given position, if it's within bounds.
    pub fn cell(&self, x: usize, y: usize) -> Option<CellFill> {
        if x >= self.columns || y >= self.rows {
            return None;
        }
        self.cells.get(y * self.columns + x).copied()
    }

    /// Get the fill shared by every row of column `x`.
    pub fn column(&self, x: usize) -> Option<CellFill> {
        self.cell(x, 0)
    }

    /// The indexes of the columns that are part of the wave trail.
    pub fn lit_columns(&self) -> Vec<usize> {
        (0..self.columns).filter(|x| matches!(self.column(*x), Some(CellFill::Lit(_)))).collect()
    }

    /// Iterate over all cells as `(x, y, fill)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, CellFill)> + '_ {
        self.cells.iter().enumerate().map(|(index, fill)| (index % self.columns, index / self.columns, *fill))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(alpha: f32) -> CellFill {
        CellFill::Lit(Hsla::new(180.0, 100.0, 50.0, alpha))
    }

    #[test]
    fn rows_repeat_columns() {
        let frame = Frame::from_columns(vec![lit(1.0), CellFill::Background, lit(0.5)], 4);
        assert_eq!(frame.columns(), 3);
        assert_eq!(frame.rows(), 4);
        for y in 0..4 {
            assert_eq!(frame.cell(0, y), Some(lit(1.0)));
            assert_eq!(frame.cell(1, y), Some(CellFill::Background));
            assert_eq!(frame.cell(2, y), Some(lit(0.5)));
        }
        assert_eq!(frame.iter().count(), 12);
    }

    #[test]
    fn out_of_bounds() {
        let frame = Frame::from_columns(vec![CellFill::Background; 2], 2);
        assert_eq!(frame.cell(2, 0), None);
        assert_eq!(frame.cell(0, 2), None);
    }

    #[test]
    fn lit_columns() {
        let frame = Frame::from_columns(vec![CellFill::Background, lit(0.3), lit(0.9), CellFill::Background], 1);
        assert_eq!(frame.lit_columns(), vec![1, 2]);
    }

    #[test]
    fn resolve_fill() {
        let background = Color::new(240, 240, 240);
        let surface = Color::new(255, 255, 255);
        assert_eq!(CellFill::Background.resolve(background, surface), background);
        assert_eq!(lit(1.0).resolve(background, surface), Color::new(0, 255, 255));
        assert_eq!(CellFill::Background.brightness(), 0.0);
    }
}

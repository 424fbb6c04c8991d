use super::properties::WindowSize;

/// Terminal columns per unit of cell height. Terminal cells are roughly twice as tall as wide.
const COLUMNS_PER_UNIT: u16 = 2;

/// The bounce counter panel dimensions, including its border.
pub(crate) const PANEL_WIDTH: u16 = 16;
pub(crate) const PANEL_HEIGHT: u16 = 5;

/// Spacing between the grid and the panel.
const PANEL_GAP_COLUMNS: u16 = 4;
const PANEL_GAP_ROWS: u16 = 1;

/// Rows reserved at the bottom of the screen for the control bar.
const CONTROL_BAR_ROWS: u16 = 1;

/// The size of the drawn grid for a given window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridGeometry {
    /// The size of a square cell, in terminal rows
    pub cell_size: u16,
    /// The terminal columns a single cell spans, including its gap
    pub cell_width: u16,
    /// The terminal rows a single cell spans, including its gap
    pub cell_height: u16,
    /// The painted columns within a cell
    pub fill_width: u16,
    /// The painted rows within a cell
    pub fill_height: u16,
    /// The total width of the grid, in terminal columns
    pub width: u16,
    /// The total height of the grid, in terminal rows
    pub height: u16,
}

impl GridGeometry {
    /// Compute the largest square cell size that fits `grid_columns` x `grid_rows` cells in the
    /// given fraction of the window.
    ///
    /// Returns `None` if the window is too small to fit a single row of cells.
    pub fn compute(window: WindowSize, grid_columns: usize, grid_rows: usize, viewport_fraction: f32) -> Option<Self> {
        if grid_columns == 0 || grid_rows == 0 {
            return None;
        }
        let available_width = window.columns as f32 * viewport_fraction / COLUMNS_PER_UNIT as f32;
        let available_height = window.rows as f32 * viewport_fraction;
        let size_by_width = (available_width / grid_columns as f32).floor();
        let size_by_height = (available_height / grid_rows as f32).floor();
        let cell_size = size_by_width.min(size_by_height);
        if cell_size.is_nan() || cell_size < 1.0 {
            return None;
        }
        let cell_size = cell_size as u16;
        let cell_width = cell_size * COLUMNS_PER_UNIT;
        let cell_height = cell_size;
        Some(Self {
            cell_size,
            cell_width,
            cell_height,
            fill_width: cell_width - 1,
            fill_height: if cell_height > 1 { cell_height - 1 } else { cell_height },
            width: cell_width.saturating_mul(grid_columns as u16),
            height: cell_height.saturating_mul(grid_rows as u16),
        })
    }
}

/// A position on the screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenPosition {
    pub column: u16,
    pub row: u16,
}

/// Where every element is placed on the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneLayout {
    pub window: WindowSize,
    /// The grid's geometry, if it fits
    pub grid: Option<GridGeometry>,
    pub grid_origin: ScreenPosition,
    /// The bounce counter panel's top left corner, if it fits
    pub panel_origin: Option<ScreenPosition>,
    /// The row the control bar is drawn at
    pub control_bar_row: u16,
}

impl SceneLayout {
    pub fn compute(window: WindowSize, grid_columns: usize, grid_rows: usize, viewport_fraction: f32) -> Self {
        let grid = GridGeometry::compute(window, grid_columns, grid_rows, viewport_fraction);
        let control_bar_row = window.rows.saturating_sub(CONTROL_BAR_ROWS);
        let usable_rows = control_bar_row;
        let Some(geometry) = grid else {
            return Self {
                window,
                grid,
                grid_origin: ScreenPosition::default(),
                panel_origin: None,
                control_bar_row,
            };
        };

        let side_by_side_width = geometry.width + PANEL_GAP_COLUMNS + PANEL_WIDTH;
        let stacked_height = geometry.height + PANEL_GAP_ROWS + PANEL_HEIGHT;
        let (grid_origin, panel_origin) = if side_by_side_width <= window.columns {
            let height = geometry.height.max(PANEL_HEIGHT);
            let left = center(window.columns, side_by_side_width);
            let top = center(usable_rows, height);
            let grid_origin = ScreenPosition { column: left, row: top + center(height, geometry.height) };
            let panel_origin = ScreenPosition {
                column: left + geometry.width + PANEL_GAP_COLUMNS,
                row: top + center(height, PANEL_HEIGHT),
            };
            (grid_origin, Some(panel_origin))
        } else if stacked_height <= usable_rows {
            let width = geometry.width.max(PANEL_WIDTH);
            let left = center(window.columns, width);
            let top = center(usable_rows, stacked_height);
            let grid_origin = ScreenPosition { column: left + center(width, geometry.width), row: top };
            let panel_origin = ScreenPosition {
                column: left + center(width, PANEL_WIDTH),
                row: top + geometry.height + PANEL_GAP_ROWS,
            };
            (grid_origin, Some(panel_origin))
        } else {
            let grid_origin = ScreenPosition {
                column: center(window.columns, geometry.width),
                row: center(usable_rows, geometry.height),
            };
            (grid_origin, None)
        };
        Self { window, grid, grid_origin, panel_origin, control_bar_row }
    }
}

fn center(outer: u16, inner: u16) -> u16 {
    outer.saturating_sub(inner) / 2
}

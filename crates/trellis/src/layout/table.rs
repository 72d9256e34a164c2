//! Grid layout for table nodes.
//!
//! A table is laid out in its own coordinate space with the origin at the
//! top-left of the table content. Three groups of cells are produced, in
//! this order:
//!
//! 1. the column header band, one cell per column, as tall as the default
//!    column inset;
//! 2. the row header band, one cell per row, as wide as the default row
//!    inset;
//! 3. the interior grid, one cell per (row, column) pair.
//!
//! A header band is omitted when no column (or row) declares non-zero insets
//! of its own, see [`Table::number_of_columns`]. The interior grid starts
//! right of the row band and below the column band, each counted only when
//! present.
//!
//! ```text
//!            +--------+----------------+
//!            | col 0  | col 1          |  column header band
//! +----------+--------+----------------+
//! | row 0    | (0,0)  | (0,1)          |
//! +----------+--------+----------------+
//! | row 1    | (1,0)  | (1,1)          |
//! +----------+--------+----------------+
//!  row header band
//! ```

use trellis_core::{
    color::Color,
    geometry::{Geometry, Insets},
};

/// One column of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub id: String,
    pub width: f32,
    pub minimum_width: f32,
    pub insets: Insets,
}

impl Column {
    pub fn new(id: impl Into<String>, width: f32) -> Self {
        Self {
            id: id.into(),
            width: width.max(0.0),
            minimum_width: 0.0,
            insets: Insets::default(),
        }
    }

    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }
}

/// One row of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: String,
    pub height: f32,
    pub minimum_height: f32,
    pub insets: Insets,
}

impl Row {
    pub fn new(id: impl Into<String>, height: f32) -> Self {
        Self {
            id: id.into(),
            height: height.max(0.0),
            minimum_height: 0.0,
            insets: Insets::default(),
        }
    }

    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }
}

/// Fill colors of a table and the direction its lanes run in.
///
/// `header_*` paint the headers of the lanes; `lane_*` paint the lanes
/// themselves and the headers across them. With lanes as rows (the
/// default) the row band uses the header colors and the column band the
/// lane colors; lanes as columns swap the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    pub header_main: Color,
    pub header_alternating: Color,
    pub lane_main: Color,
    pub lane_alternating: Color,
    pub lanes_as_columns: bool,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            header_main: color_or_white("#C4D7ED"),
            header_alternating: color_or_white("#ABC8E2"),
            lane_main: color_or_white("#FFFFFF"),
            lane_alternating: color_or_white("#F2F2F2"),
            lanes_as_columns: false,
        }
    }
}

fn color_or_white(value: &str) -> Color {
    Color::new(value).unwrap_or_else(|_| Color::white())
}

/// Table structure: columns, rows and insets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    /// Only `top` is used: the height of the column header band.
    pub default_column_insets: Insets,
    /// Only `left` is used: the width of the row header band.
    pub default_row_insets: Insets,
    /// Space between the node border and the table content.
    pub insets: Insets,
}

impl Table {
    /// Number of columns declaring non-zero insets of their own.
    ///
    /// Columns without insets are still laid out; this count only decides
    /// whether the column header band is drawn.
    pub fn number_of_columns(&self) -> usize {
        self.columns.iter().filter(|c| !c.insets.is_zero()).count()
    }

    /// Number of rows declaring non-zero insets of their own.
    pub fn number_of_rows(&self) -> usize {
        self.rows.iter().filter(|r| !r.insets.is_zero()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}

/// What a laid out cell represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    ColumnHeader,
    RowHeader,
    Interior,
}

/// A positioned, filled rectangle of the table.
///
/// Header cells carry only the index of their own axis; the other is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub role: CellRole,
    pub row: Option<usize>,
    pub column: Option<usize>,
    pub bounds: Geometry,
    pub fill: Color,
}

/// The result of [`layout_table`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableLayout {
    cells: Vec<TableCell>,
}

impl TableLayout {
    /// All cells, headers first.
    pub fn cells(&self) -> &[TableCell] {
        &self.cells
    }

    pub fn cells_with_role(&self, role: CellRole) -> impl Iterator<Item = &TableCell> {
        self.cells.iter().filter(move |cell| cell.role == role)
    }

    /// The interior cell at (`row`, `column`).
    pub fn cell(&self, row: usize, column: usize) -> Option<&TableCell> {
        self.cells_with_role(CellRole::Interior)
            .find(|cell| cell.row == Some(row) && cell.column == Some(column))
    }

    /// Shifts every cell, used to place the table inside its node.
    pub fn translate(mut self, dx: f32, dy: f32) -> Self {
        for cell in &mut self.cells {
            cell.bounds = cell.bounds.translate(dx, dy);
        }
        self
    }

    pub fn into_cells(self) -> Vec<TableCell> {
        self.cells
    }
}

fn alternate(index: usize, main: Color, alternating: Color) -> Color {
    if index % 2 == 0 { main } else { alternating }
}

/// Computes header bands and the cell grid of `table`.
///
/// # Example
///
/// ```
/// # use trellis::layout::table::{layout_table, Column, Row, Table, TableStyle};
/// let table = Table {
///     columns: vec![Column::new("c0", 10.0), Column::new("c1", 20.0)],
///     rows: vec![Row::new("r0", 5.0), Row::new("r1", 15.0)],
///     ..Table::default()
/// };
/// let layout = layout_table(&table, &TableStyle::default());
/// let cell = layout.cell(1, 1).unwrap();
/// assert_eq!((cell.bounds.x(), cell.bounds.y()), (10.0, 5.0));
/// assert_eq!((cell.bounds.width(), cell.bounds.height()), (20.0, 15.0));
/// ```
pub fn layout_table(table: &Table, style: &TableStyle) -> TableLayout {
    let (row_header_colors, column_header_colors) = if style.lanes_as_columns {
        (
            (style.lane_main, style.lane_alternating),
            (style.header_main, style.header_alternating),
        )
    } else {
        (
            (style.header_main, style.header_alternating),
            (style.lane_main, style.lane_alternating),
        )
    };

    let column_band = if table.number_of_columns() > 0 {
        table.default_column_insets.top().max(0.0)
    } else {
        0.0
    };
    let row_band = if table.number_of_rows() > 0 {
        table.default_row_insets.left().max(0.0)
    } else {
        0.0
    };

    let mut cells = Vec::with_capacity(
        table.columns.len() + table.rows.len() + table.columns.len() * table.rows.len(),
    );

    if table.number_of_columns() > 0 {
        let mut x = row_band;
        for (column_idx, column) in table.columns.iter().enumerate() {
            cells.push(TableCell {
                role: CellRole::ColumnHeader,
                row: None,
                column: Some(column_idx),
                bounds: Geometry::new(x, 0.0, column.width, column_band),
                fill: alternate(column_idx, column_header_colors.0, column_header_colors.1),
            });
            x += column.width;
        }
    }

    if table.number_of_rows() > 0 {
        let mut y = column_band;
        for (row_idx, row) in table.rows.iter().enumerate() {
            cells.push(TableCell {
                role: CellRole::RowHeader,
                row: Some(row_idx),
                column: None,
                bounds: Geometry::new(0.0, y, row_band, row.height),
                fill: alternate(row_idx, row_header_colors.0, row_header_colors.1),
            });
            y += row.height;
        }
    }

    let mut y = column_band;
    for (row_idx, row) in table.rows.iter().enumerate() {
        let mut x = row_band;
        for (column_idx, column) in table.columns.iter().enumerate() {
            let lane = if style.lanes_as_columns {
                column_idx
            } else {
                row_idx
            };
            cells.push(TableCell {
                role: CellRole::Interior,
                row: Some(row_idx),
                column: Some(column_idx),
                bounds: Geometry::new(x, y, column.width, row.height),
                fill: alternate(lane, style.lane_main, style.lane_alternating),
            });
            x += column.width;
        }
        y += row.height;
    }

    TableLayout { cells }
}

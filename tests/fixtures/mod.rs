//! Test fixtures for building grids in memory.
//!
//! # Example
//!
//! ```rust
//! use fixtures::GridBuilder;
//!
//! let grid = GridBuilder::new(10, 5)
//!     .value("A1", "Hello")
//!     .value("B2", "42")
//!     .span("C3:D4")
//!     .read_only("A1")
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use gridcore::cell_ref::{parse_cell_range, parse_cell_ref};
use gridcore::{Block, Coord, Grid, GridConfig, StringTable, TableHandle};

/// Builder for a single-view grid over a [`StringTable`].
#[derive(Debug, Clone)]
pub struct GridBuilder {
    rows: i32,
    cols: i32,
    config: GridConfig,
    values: Vec<(Coord, String)>,
    col_types: Vec<(i32, String)>,
    spans: Vec<Block>,
    read_only: Vec<Coord>,
    client: Option<(i32, i32)>,
}

impl GridBuilder {
    pub fn new(rows: i32, cols: i32) -> Self {
        Self {
            rows,
            cols,
            config: GridConfig::default(),
            values: Vec::new(),
            col_types: Vec::new(),
            spans: Vec::new(),
            read_only: Vec::new(),
            client: None,
        }
    }

    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Set a value by A1 reference.
    pub fn value(mut self, cell: &str, value: &str) -> Self {
        let coord = parse_cell_ref(cell).expect("valid cell reference");
        self.values.push((coord, value.to_string()));
        self
    }

    /// Fill rows starting at A1.
    pub fn rows(mut self, rows: &[&[&str]]) -> Self {
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let coord = Coord::new(i32::try_from(r).unwrap(), i32::try_from(c).unwrap());
                self.values.push((coord, (*value).to_string()));
            }
        }
        self
    }

    pub fn col_type(mut self, col: i32, type_name: &str) -> Self {
        self.col_types.push((col, type_name.to_string()));
        self
    }

    /// Merge a range such as `"B2:C3"`.
    pub fn span(mut self, range: &str) -> Self {
        self.spans.push(parse_cell_range(range).expect("valid range"));
        self
    }

    pub fn read_only(mut self, cell: &str) -> Self {
        self.read_only.push(parse_cell_ref(cell).expect("valid cell reference"));
        self
    }

    /// Client size of the view, labels included.
    pub fn client_size(mut self, width: i32, height: i32) -> Self {
        self.client = Some((width, height));
        self
    }

    pub fn table(&self) -> StringTable {
        let mut table = StringTable::new(self.rows, self.cols);
        for (col, name) in &self.col_types {
            table.set_col_type(*col, name);
        }
        table
    }

    pub fn build(self) -> Grid {
        let mut grid = Grid::with_table(self.config.clone(), TableHandle::owned(self.table()));
        for (coord, value) in &self.values {
            grid.set_cell_value(*coord, value).expect("value inside the grid");
        }
        for block in &self.spans {
            grid.set_span(*block).expect("span inside the grid");
        }
        for coord in &self.read_only {
            grid.set_read_only(*coord, true).expect("cell inside the grid");
        }
        if let Some((w, h)) = self.client {
            grid.set_client_size(w, h);
        }
        grid
    }
}

/// Every non-empty value of the grid, row-major.
pub fn non_empty_cells(grid: &Grid) -> Vec<(Coord, String)> {
    Block::new(0, 0, grid.number_rows(), grid.number_cols())
        .cells()
        .filter(|c| !grid.is_empty_cell(*c))
        .map(|c| (c, grid.cell_value(c)))
        .collect()
}

use crate::excel::Cell;

/// A single worksheet: a grid of cells indexed 1-based, so row 0 and
/// column 0 of `data` are unused padding.
#[derive(Clone, Debug)]
pub struct Sheet {
    pub name: String,
    pub data: Vec<Vec<Cell>>,
    pub max_rows: usize,
    pub max_cols: usize,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            data: vec![vec![Cell::empty(); 1]; 1],
            max_rows: 0,
            max_cols: 0,
        }
    }

    /// Returns the cell at (row, col), or `None` if the position is out of
    /// range or the cell is empty. Empty cells are indistinguishable from
    /// absent ones.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.data
            .get(row)
            .and_then(|cells| cells.get(col))
            .filter(|cell| !cell.is_empty())
    }

    /// The cell's text at (row, col), or `""` when empty or out of range.
    pub fn value(&self, row: usize, col: usize) -> &str {
        self.cell(row, col).map_or("", |cell| cell.value.as_str())
    }

    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        self.ensure_cell_exists(row, col);

        let occupied = !cell.is_empty();
        self.data[row][col] = cell;

        if occupied {
            self.max_rows = self.max_rows.max(row);
            self.max_cols = self.max_cols.max(col);
        }
    }

    fn ensure_cell_exists(&mut self, row: usize, col: usize) {
        // Expand rows if needed
        if row >= self.data.len() {
            let default_row_len = if self.data.is_empty() {
                col + 1
            } else {
                self.data[0].len()
            };
            let rows_to_add = row + 1 - self.data.len();

            self.data
                .extend(vec![vec![Cell::empty(); default_row_len]; rows_to_add]);
        }

        // Expand columns if needed
        if col >= self.data[0].len() {
            for row_data in &mut self.data {
                row_data.resize_with(col + 1, Cell::empty);
            }
        }
    }

    /// Inserts a blank row at `at` (1-based), shifting that row and
    /// everything below it down by one.
    pub fn insert_row(&mut self, at: usize) {
        if at == 0 {
            return;
        }

        let width = self.data.first().map_or(1, Vec::len);
        while self.data.len() < at {
            self.data.push(vec![Cell::empty(); width]);
        }
        self.data.insert(at, vec![Cell::empty(); width]);

        if self.max_rows >= at {
            self.max_rows += 1;
        }
    }

    pub fn is_blank(&self) -> bool {
        self.max_rows == 0 && self.max_cols == 0
    }
}

use anyhow::{Context, Result};

use crate::excel::{Cell, Sheet};
use crate::template::{bind_url, shift_placeholders};

// Every template and header file declares its usable dimensions in the
// metadata row (row 1): B1 holds the body row count, D1 the column count.
// The declared numbers are authoritative; occupied cells are never counted.
const ROW_COUNT_COL: usize = 2;
const COL_COUNT_COL: usize = 4;

/// A template body with its declared dimensions. The body sits one row
/// below the metadata row in the source file; `Template` re-exposes it in
/// 1-based body-relative coordinates.
pub struct Template {
    rows: usize,
    cols: usize,
    body: Vec<Vec<Cell>>,
}

impl Template {
    pub fn from_sheet(sheet: &Sheet) -> Result<Self> {
        let rows = declared_dimension(sheet, ROW_COUNT_COL, "row count")?;
        let cols = declared_dimension(sheet, COL_COUNT_COL, "column count")?;

        let mut body = vec![vec![Cell::empty(); cols + 1]; rows + 1];
        for row in 1..=rows {
            for col in 1..=cols {
                if let Some(cell) = sheet.cell(row + 1, col) {
                    body[row][col] = cell.clone();
                }
            }
        }

        Ok(Self { rows, cols, body })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.body
            .get(row)
            .and_then(|cells| cells.get(col))
            .filter(|cell| !cell.is_empty())
    }

    /// A copy of this template with the organization's URL bound into every
    /// text and formula cell. Number, date and boolean cells are copied
    /// as-is; substitution never applies to them.
    pub fn bind(&self, url: &str) -> Template {
        let mut body = self.body.clone();
        for row in body.iter_mut().skip(1) {
            for cell in row.iter_mut().skip(1) {
                if cell.is_text() {
                    cell.value = bind_url(&cell.value, url);
                }
            }
        }

        Template {
            rows: self.rows,
            cols: self.cols,
            body,
        }
    }
}

/// The header row for one category: the literal values from row 2 of the
/// header file, over the declared column count.
pub struct Header {
    cols: usize,
    values: Vec<Cell>,
}

impl Header {
    pub fn from_sheet(sheet: &Sheet) -> Result<Self> {
        let cols = declared_dimension(sheet, COL_COUNT_COL, "column count")?;

        let mut values = vec![Cell::empty(); cols + 1];
        for col in 1..=cols {
            if let Some(cell) = sheet.cell(2, col) {
                values[col] = cell.clone();
            }
        }

        Ok(Self { cols, values })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn value(&self, col: usize) -> Option<&Cell> {
        self.values.get(col).filter(|cell| !cell.is_empty())
    }
}

fn declared_dimension(sheet: &Sheet, col: usize, what: &str) -> Result<usize> {
    let cell = sheet.cell(1, col).with_context(|| {
        format!(
            "sheet '{}' has no declared {} in row 1, column {}",
            sheet.name, what, col
        )
    })?;

    cell.value.trim().parse::<usize>().ok().with_context(|| {
        format!(
            "declared {} in sheet '{}' is not a number: '{}'",
            what, sheet.name, cell.value
        )
    })
}

/// Assembles the full contents of one destination sheet: `repeat_count`
/// URL-bound copies of the template block stacked vertically, each copy's
/// `{{n}}` placeholders shifted by its block offset, with the header row on
/// top. A repeat count of zero yields the header row alone.
pub fn materialize(
    template: &Template,
    header: &Header,
    url: &str,
    repeat_count: usize,
) -> Result<Sheet> {
    let bound = template.bind(url);
    let block_rows = bound.rows();

    let mut out = Sheet::new("");
    for repeat in 0..repeat_count {
        let offset = repeat * block_rows;
        for row in 1..=block_rows {
            for col in 1..=bound.cols() {
                let Some(cell) = bound.cell(row, col) else {
                    continue;
                };
                let value = shift_placeholders(&cell.value, offset as i64)?;
                out.set_cell(offset + row, col, Cell::new(value, cell.is_formula));
            }
        }
    }

    // Row 1 is reserved for the header; the blocks shift down one row.
    out.insert_row(1);
    for col in 1..=header.cols() {
        if let Some(cell) = header.value(col) {
            out.set_cell(1, col, cell.clone());
        }
    }

    Ok(out)
}

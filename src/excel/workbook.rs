use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto};
use rust_xlsxwriter::{Format, Formula, Workbook as XlsxWorkbook};
use std::path::{Path, PathBuf};

use crate::excel::{Cell, CellType, Sheet};

/// Name of the single sheet a freshly created workbook starts with. A
/// workbook must hold at least one sheet at all times, so new workbooks are
/// born with this stub instead of empty.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

pub struct Workbook {
    sheets: Vec<Sheet>,
    file_path: PathBuf,
}

impl Workbook {
    /// Opens an existing workbook, eagerly loading every sheet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Workbook> {
        let path_ref = path.as_ref();

        let mut workbook = open_workbook_auto(path_ref)
            .with_context(|| format!("unable to parse Excel file: {}", path_ref.display()))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let mut sheets = Vec::with_capacity(sheet_names.len());

        for name in &sheet_names {
            let range = workbook
                .worksheet_range(name)
                .with_context(|| format!("unable to read worksheet: {}", name))?;
            sheets.push(sheet_from_range(name, range));
        }

        if sheets.is_empty() {
            anyhow::bail!("no worksheets found in {}", path_ref.display());
        }

        Ok(Workbook {
            sheets,
            file_path: path_ref.to_path_buf(),
        })
    }

    /// Creates a new in-memory workbook that will be saved to `path`. It
    /// starts with a single blank default sheet.
    pub fn create<P: AsRef<Path>>(path: P) -> Workbook {
        Workbook {
            sheets: vec![Sheet::new(DEFAULT_SHEET_NAME)],
            file_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn contains_sheet(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|sheet| sheet.name == name)
    }

    /// The workbook's first sheet. Loading guarantees at least one sheet,
    /// so this is the calamine/openpyxl "active sheet" equivalent.
    pub fn first_sheet(&self) -> &Sheet {
        &self.sheets[0]
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.position(name).map(|index| &self.sheets[index])
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.position(name).map(|index| &mut self.sheets[index])
    }

    pub fn add_sheet(&mut self, name: &str) -> Result<()> {
        if self.contains_sheet(name) {
            anyhow::bail!("sheet '{}' already exists", name);
        }
        self.sheets.push(Sheet::new(name));
        Ok(())
    }

    pub fn remove_sheet(&mut self, name: &str) -> Result<()> {
        let index = self
            .position(name)
            .with_context(|| format!("sheet '{}' does not exist", name))?;

        if self.sheets.len() == 1 {
            anyhow::bail!("cannot remove '{}': a workbook must keep at least one sheet", name);
        }

        self.sheets.remove(index);
        Ok(())
    }

    /// Makes sure a sheet named `name` exists and is blank, discarding any
    /// stale content. When `name` is the workbook's only sheet it cannot
    /// simply be removed and recreated, so a scratch sheet is parked in the
    /// workbook first; the sheet count never drops to zero at any point.
    pub fn ensure_empty_sheet(&mut self, name: &str) -> Result<&mut Sheet> {
        if self.contains_sheet(name) {
            if self.sheets.len() == 1 {
                let scratch = self.scratch_name(name);
                self.add_sheet(&scratch)?;
                self.remove_sheet(name)?;
                self.add_sheet(name)?;
                self.remove_sheet(&scratch)?;
            } else {
                self.remove_sheet(name)?;
                self.add_sheet(name)?;
            }
        } else {
            self.add_sheet(name)?;
        }

        self.sheet_mut(name)
            .with_context(|| format!("sheet '{}' missing after creation", name))
    }

    fn scratch_name(&self, avoid: &str) -> String {
        let mut candidate = String::from("__mastersheet_scratch__");
        while candidate == avoid || self.contains_sheet(&candidate) {
            candidate.push('_');
        }
        candidate
    }

    /// Removes the default stub sheet a created workbook starts with, if it
    /// is still blank and other sheets exist by now.
    pub fn drop_default_placeholder(&mut self) -> Result<()> {
        if self.sheets.len() > 1 {
            let is_blank = self
                .sheet(DEFAULT_SHEET_NAME)
                .is_some_and(Sheet::is_blank);
            if is_blank {
                self.remove_sheet(DEFAULT_SHEET_NAME)?;
            }
        }
        Ok(())
    }

    /// Writes the workbook to its file path. A failed save leaves the
    /// in-memory workbook untouched, so the caller may retry the save
    /// without rebuilding anything.
    pub fn save(&self) -> Result<()> {
        let mut workbook = XlsxWorkbook::new();

        let number_format = Format::new().set_num_format("General");
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet().set_name(&sheet.name)?;

            for col in 0..sheet.max_cols {
                worksheet.set_column_width(col as u16, 15)?;
            }

            for row in 1..sheet.data.len() {
                if row > sheet.max_rows {
                    continue;
                }
                for col in 1..sheet.data[row].len() {
                    if col > sheet.max_cols {
                        continue;
                    }
                    let cell = &sheet.data[row][col];
                    if cell.value.is_empty() {
                        continue;
                    }

                    let row_idx = (row - 1) as u32;
                    let col_idx = (col - 1) as u16;

                    match cell.cell_type {
                        CellType::Number => {
                            if let Ok(num) = cell.value.parse::<f64>() {
                                worksheet.write_number_with_format(
                                    row_idx,
                                    col_idx,
                                    num,
                                    &number_format,
                                )?;
                            } else {
                                worksheet.write_string(row_idx, col_idx, &cell.value)?;
                            }
                        }
                        CellType::Date => {
                            worksheet.write_string_with_format(
                                row_idx,
                                col_idx,
                                &cell.value,
                                &date_format,
                            )?;
                        }
                        CellType::Boolean => {
                            if let Ok(b) = cell.value.parse::<bool>() {
                                worksheet.write_boolean(row_idx, col_idx, b)?;
                            } else {
                                worksheet.write_string(row_idx, col_idx, &cell.value)?;
                            }
                        }
                        CellType::Text => {
                            if cell.is_formula {
                                let formula = Formula::new(&cell.value);
                                worksheet.write_formula(row_idx, col_idx, formula)?;
                            } else {
                                worksheet.write_string(row_idx, col_idx, &cell.value)?;
                            }
                        }
                        CellType::Empty => {}
                    }
                }
            }
        }

        workbook
            .save(&self.file_path)
            .with_context(|| format!("unable to save workbook to {}", self.file_path.display()))?;

        Ok(())
    }
}

fn sheet_from_range(name: &str, range: calamine::Range<Data>) -> Sheet {
    let (height, width) = range.get_size();

    let mut sheet = Sheet::new(name);
    sheet.data = vec![vec![Cell::empty(); width + 1]; height + 1];
    sheet.max_rows = height;
    sheet.max_cols = width;

    // Process only non-empty cells
    for (row_idx, col_idx, cell) in range.used_cells() {
        let (value, cell_type) = match cell {
            Data::Empty => (String::new(), CellType::Empty),

            Data::String(s) => (s.clone(), CellType::Text),

            Data::Float(f) => {
                let value = if *f == (*f as i64) as f64 && f.abs() < 1e10 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                };
                (value, CellType::Number)
            }

            Data::Int(i) => (i.to_string(), CellType::Number),

            Data::Bool(b) => (
                if *b {
                    "TRUE".to_string()
                } else {
                    "FALSE".to_string()
                },
                CellType::Boolean,
            ),

            Data::Error(e) => (format!("Error: {:?}", e), CellType::Text),

            Data::DateTime(dt) => (dt.to_string(), CellType::Date),

            Data::DateTimeIso(s) => (s.clone(), CellType::Date),

            Data::DurationIso(s) => (s.clone(), CellType::Text),
        };

        // Calamine exposes cached formula results, not formula text, so a
        // leading '=' is the best formula signal available.
        let is_formula = !value.is_empty() && value.starts_with('=');

        sheet.data[row_idx + 1][col_idx + 1] = Cell::new_with_type(value, is_formula, cell_type);
    }

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workbook_with(names: &[&str]) -> Workbook {
        let mut workbook = Workbook::create("test.xlsx");
        for name in names {
            workbook.add_sheet(name).unwrap();
        }
        workbook.remove_sheet(DEFAULT_SHEET_NAME).unwrap();
        workbook
    }

    fn fill(workbook: &mut Workbook, name: &str) {
        workbook
            .sheet_mut(name)
            .unwrap()
            .set_cell(1, 1, Cell::new("stale".to_string(), false));
    }

    #[test]
    fn ensure_empty_sheet_creates_missing_sheet() {
        let mut workbook = workbook_with(&["Other"]);

        workbook.ensure_empty_sheet("Acme").unwrap();

        assert_eq!(workbook.sheet_names(), vec!["Other", "Acme"]);
    }

    #[test]
    fn ensure_empty_sheet_discards_stale_content() {
        let mut workbook = workbook_with(&["Other", "Acme"]);
        fill(&mut workbook, "Acme");

        let sheet = workbook.ensure_empty_sheet("Acme").unwrap();

        assert!(sheet.is_blank());
        assert_eq!(workbook.sheet_count(), 2);
    }

    #[test]
    fn ensure_empty_sheet_replaces_the_sole_sheet() {
        let mut workbook = workbook_with(&["Acme"]);
        fill(&mut workbook, "Acme");

        let sheet = workbook.ensure_empty_sheet("Acme").unwrap();

        assert!(sheet.is_blank());
        assert_eq!(workbook.sheet_names(), vec!["Acme"]);
    }

    #[test]
    fn ensure_empty_sheet_handles_scratch_name_collision() {
        let mut workbook = workbook_with(&["__mastersheet_scratch__"]);
        fill(&mut workbook, "__mastersheet_scratch__");

        let sheet = workbook.ensure_empty_sheet("__mastersheet_scratch__").unwrap();

        assert!(sheet.is_blank());
        assert_eq!(workbook.sheet_names(), vec!["__mastersheet_scratch__"]);
    }

    #[test]
    fn remove_sheet_refuses_to_empty_the_workbook() {
        let mut workbook = workbook_with(&["Only"]);

        assert!(workbook.remove_sheet("Only").is_err());
        assert_eq!(workbook.sheet_count(), 1);
    }

    #[test]
    fn add_sheet_rejects_duplicate_names() {
        let mut workbook = workbook_with(&["Acme"]);

        assert!(workbook.add_sheet("Acme").is_err());
    }

    #[test]
    fn drop_default_placeholder_removes_blank_stub() {
        let mut workbook = Workbook::create("test.xlsx");
        workbook.add_sheet("Acme").unwrap();

        workbook.drop_default_placeholder().unwrap();

        assert_eq!(workbook.sheet_names(), vec!["Acme"]);
    }

    #[test]
    fn drop_default_placeholder_keeps_sole_stub() {
        let mut workbook = Workbook::create("test.xlsx");

        workbook.drop_default_placeholder().unwrap();

        assert_eq!(workbook.sheet_names(), vec![DEFAULT_SHEET_NAME]);
    }

    #[test]
    fn drop_default_placeholder_keeps_written_stub() {
        let mut workbook = Workbook::create("test.xlsx");
        fill(&mut workbook, DEFAULT_SHEET_NAME);
        workbook.add_sheet("Acme").unwrap();

        workbook.drop_default_placeholder().unwrap();

        assert_eq!(workbook.sheet_names(), vec![DEFAULT_SHEET_NAME, "Acme"]);
    }
}

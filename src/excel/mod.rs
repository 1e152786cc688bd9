mod cell;
mod sheet;
mod workbook;

pub use cell::{Cell, CellType};
pub use sheet::Sheet;
pub use workbook::{DEFAULT_SHEET_NAME, Workbook};

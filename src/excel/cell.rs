#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub value: String,
    pub is_formula: bool,
    pub cell_type: CellType,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellType {
    Text,
    Number,
    Date,
    Boolean,
    Empty,
}

impl Cell {
    pub fn new(value: String, is_formula: bool) -> Self {
        let cell_type = if value.is_empty() {
            CellType::Empty
        } else if is_formula {
            CellType::Text
        } else if value.parse::<f64>().is_ok() {
            CellType::Number
        } else if (value.contains('/') && value.split('/').count() == 3)
            || (value.contains('-') && value.split('-').count() == 3)
        {
            CellType::Date
        } else if value == "true" || value == "false" {
            CellType::Boolean
        } else {
            CellType::Text
        };

        Self::new_with_type(value, is_formula, cell_type)
    }

    pub fn new_with_type(value: String, is_formula: bool, cell_type: CellType) -> Self {
        Self {
            value,
            is_formula,
            cell_type,
        }
    }

    pub fn empty() -> Self {
        Self {
            value: String::new(),
            is_formula: false,
            cell_type: CellType::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Whether the cell holds text (plain or formula) that template
    /// substitution may rewrite. Number, date and boolean cells pass
    /// through the template pipeline untouched.
    pub fn is_text(&self) -> bool {
        self.is_formula || self.cell_type == CellType::Text
    }
}

//! Builds a master XLSX workbook from reusable sheet templates.
//!
//! Each of the three template categories (pathways, clubs, athletics) ships
//! as a template file plus a header file. For every organization in the
//! roster the builder substitutes the organization's URL into the template,
//! repeats the template block with `{{n}}` placeholders shifted per block,
//! and installs the result as a named sheet in the destination workbook.

pub mod builder;
pub mod config;
pub mod excel;
pub mod prompt;
pub mod template;

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Roster;
use crate::excel::{Sheet, Workbook};
use crate::template::{Header, Template, materialize};

/// The three fixed kinds of sheet the master workbook carries per
/// organization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Pathways,
    Clubs,
    Athletics,
}

impl Category {
    /// Fixed processing order; sheet creation order follows it.
    pub const ALL: [Category; 3] = [Category::Pathways, Category::Clubs, Category::Athletics];

    /// File stem of the category's template and header files.
    pub fn stem(self) -> &'static str {
        match self {
            Category::Pathways => "pathways",
            Category::Clubs => "clubs",
            Category::Athletics => "athletics",
        }
    }

    /// Destination sheet name for one organization. The pathways sheet
    /// carries the organization's own name.
    pub fn sheet_name(self, org: &str) -> String {
        match self {
            Category::Pathways => org.to_string(),
            Category::Clubs => format!("{} Clubs", org),
            Category::Athletics => format!("{} Athletics", org),
        }
    }
}

/// Parsed template and header for one category.
pub struct CategoryAssets {
    pub template: Template,
    pub header: Header,
}

impl CategoryAssets {
    fn load(category: Category, templates_dir: &Path, headers_dir: &Path) -> Result<Self> {
        let template_path = templates_dir.join(format!("{}.xlsx", category.stem()));
        let template_workbook = Workbook::open(&template_path)?;
        let template = Template::from_sheet(template_workbook.first_sheet())
            .with_context(|| format!("bad {} template: {}", category.stem(), template_path.display()))?;

        let header_path = headers_dir.join(format!("{}.xlsx", category.stem()));
        let header_workbook = Workbook::open(&header_path)?;
        let header = Header::from_sheet(header_workbook.first_sheet())
            .with_context(|| format!("bad {} header: {}", category.stem(), header_path.display()))?;

        Ok(Self { template, header })
    }
}

/// Templates and headers for all three categories. Loading parses the
/// declared dimensions up front, so a malformed category fails the run
/// before the destination workbook is touched.
pub struct TemplateSet {
    pathways: CategoryAssets,
    clubs: CategoryAssets,
    athletics: CategoryAssets,
}

impl TemplateSet {
    pub fn new(
        pathways: CategoryAssets,
        clubs: CategoryAssets,
        athletics: CategoryAssets,
    ) -> Self {
        Self {
            pathways,
            clubs,
            athletics,
        }
    }

    pub fn load(templates_dir: &Path, headers_dir: &Path) -> Result<Self> {
        Ok(Self::new(
            CategoryAssets::load(Category::Pathways, templates_dir, headers_dir)?,
            CategoryAssets::load(Category::Clubs, templates_dir, headers_dir)?,
            CategoryAssets::load(Category::Athletics, templates_dir, headers_dir)?,
        ))
    }

    pub fn assets(&self, category: Category) -> &CategoryAssets {
        match category {
            Category::Pathways => &self.pathways,
            Category::Clubs => &self.clubs,
            Category::Athletics => &self.athletics,
        }
    }
}

/// Materializes one destination sheet per (category, organization) pair
/// and installs it into the workbook, replacing any stale sheet of the
/// same name. Errors carry the offending sheet's name and are never
/// swallowed; a half-substituted sheet must not survive silently.
pub fn build_workbook(
    workbook: &mut Workbook,
    templates: &TemplateSet,
    roster: &Roster,
) -> Result<()> {
    for category in Category::ALL {
        let assets = templates.assets(category);
        for (org, params) in roster {
            let sheet_name = category.sheet_name(org);
            let grid = materialize(&assets.template, &assets.header, &params.url, params.program_count)
                .with_context(|| {
                    format!(
                        "failed to build sheet '{}' ({} for {})",
                        sheet_name,
                        category.stem(),
                        org
                    )
                })?;

            let sheet = workbook.ensure_empty_sheet(&sheet_name)?;
            install(sheet, &grid);
            println!("Generated sheet: {}", sheet_name);
        }
    }

    Ok(())
}

fn install(sheet: &mut Sheet, grid: &Sheet) {
    for (row, cells) in grid.data.iter().enumerate().skip(1) {
        for (col, cell) in cells.iter().enumerate().skip(1) {
            if !cell.is_empty() {
                sheet.set_cell(row, col, cell.clone());
            }
        }
    }
}

use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use mastersheet::builder::{TemplateSet, build_workbook};
use mastersheet::config::{Roster, load_roster};
use mastersheet::excel::Workbook;
use mastersheet::prompt;

/// Build a master XLSX workbook from per-category sheet templates.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Name of the workbook to edit or create, without the .xlsx extension
    #[arg(required = true)]
    workbook: String,

    /// Directory holding the destination workbooks
    #[arg(long, default_value = "sheets")]
    sheets_dir: PathBuf,

    /// Directory holding the category template files
    #[arg(long, default_value = "templates")]
    templates_dir: PathBuf,

    /// Directory holding the category header files
    #[arg(long, default_value = "headers")]
    headers_dir: PathBuf,

    /// JSON roster file mapping organization names to their parameters;
    /// when omitted, organizations are entered interactively
    #[arg(long)]
    roster: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let templates = TemplateSet::load(&cli.templates_dir, &cli.headers_dir)?;

    let workbook_path = cli.sheets_dir.join(format!("{}.xlsx", cli.workbook));
    let (mut workbook, created) = if workbook_path.exists() {
        (Workbook::open(&workbook_path)?, false)
    } else {
        println!("Did not find workbook of that name. Creating new workbook.");
        (Workbook::create(&workbook_path), true)
    };

    let roster: Roster = match &cli.roster {
        Some(path) => load_roster(path)?,
        None => prompt::read_roster_interactive()?,
    };

    if roster.is_empty() {
        println!("No organizations entered; nothing to do.");
        return Ok(());
    }

    build_workbook(&mut workbook, &templates, &roster)?;

    if created {
        workbook.drop_default_placeholder()?;
    }

    save_with_retry(&workbook)?;
    println!("Saved workbook: {}", workbook.file_path().display());

    Ok(())
}

/// Retries only the save step; the built workbook is never recomputed.
fn save_with_retry(workbook: &Workbook) -> Result<()> {
    loop {
        match workbook.save() {
            Ok(()) => return Ok(()),
            Err(err) => {
                eprintln!("Unable to save: {:#}", err);
                print!("Is the file open in another program? Press Enter to retry, or type q to give up: ");
                io::stdout().flush()?;

                let mut line = String::new();
                io::stdin().lock().read_line(&mut line)?;
                if line.trim().eq_ignore_ascii_case("q") {
                    return Err(err.context("workbook was not saved"));
                }
            }
        }
    }
}

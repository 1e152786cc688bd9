use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Per-organization template parameters: the spreadsheet URL to bind into
/// formulas and the number of template block repeats.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct OrgParams {
    pub url: String,
    pub program_count: usize,
}

/// Organization name -> parameters. Insertion order is preserved so sheet
/// creation order is reproducible; names are unique by construction.
pub type Roster = IndexMap<String, OrgParams>;

pub fn validate_url(url: &str) -> Result<()> {
    if !url.starts_with("https://") {
        bail!("'{}' is not a valid URL (it must start with https://)", url);
    }
    Ok(())
}

/// Parses a program count the way the operator types it: digits only. The
/// count may overshoot the real number of programs; the master sheet then
/// simply looks at rows that stay empty.
pub fn parse_program_count(input: &str) -> Result<usize> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        bail!("'{}' is not a number", input);
    }
    trimmed
        .parse()
        .with_context(|| format!("program count '{}' is out of range", trimmed))
}

/// Loads a roster from a JSON file mapping organization names to their
/// parameters, validating every URL up front.
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Roster> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("unable to read roster file: {}", path.display()))?;

    let roster: Roster = serde_json::from_str(&text)
        .with_context(|| format!("unable to parse roster file: {}", path.display()))?;

    for (name, params) in &roster {
        validate_url(&params.url).with_context(|| format!("organization '{}'", name))?;
    }

    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn https_urls_are_accepted() {
        assert!(validate_url("https://docs.example/sheet").is_ok());
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert!(validate_url("http://docs.example/sheet").is_err());
        assert!(validate_url("docs.example/sheet").is_err());
        assert!(validate_url("").is_err());
    }

    #[test]
    fn program_count_parses_digits() {
        assert_eq!(parse_program_count("42").unwrap(), 42);
        assert_eq!(parse_program_count(" 7 ").unwrap(), 7);
        assert_eq!(parse_program_count("0").unwrap(), 0);
    }

    #[test]
    fn program_count_rejects_non_digits() {
        assert!(parse_program_count("4x").is_err());
        assert!(parse_program_count("-1").is_err());
        assert!(parse_program_count("").is_err());
    }

    #[test]
    fn roster_loads_in_file_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "Zeta High": {{"url": "https://z.example", "program_count": 3}},
                "Acme High": {{"url": "https://a.example", "program_count": 0}}
            }}"#
        )
        .unwrap();

        let roster = load_roster(file.path()).unwrap();

        let names: Vec<_> = roster.keys().cloned().collect();
        assert_eq!(names, vec!["Zeta High", "Acme High"]);
        assert_eq!(roster["Zeta High"].program_count, 3);
        assert_eq!(roster["Acme High"].url, "https://a.example");
    }

    #[test]
    fn roster_with_bad_url_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"Acme High": {{"url": "ftp://a.example", "program_count": 1}}}}"#
        )
        .unwrap();

        assert!(load_roster(file.path()).is_err());
    }
}

use anyhow::{Result, bail};
use std::io::{self, BufRead, Write};

use crate::config::{OrgParams, Roster, parse_program_count, validate_url};

/// Gathers the organization roster from stdin: name / URL / program count
/// per organization, until an empty name ends the list.
pub fn read_roster_interactive() -> Result<Roster> {
    let stdin = io::stdin();
    let mut lock = stdin.lock();
    read_roster(&mut lock)
}

/// Same as [`read_roster_interactive`] but over any reader. Invalid URLs
/// and counts re-prompt in a loop; the validators live in `config` so the
/// rules are testable without a terminal.
pub fn read_roster<R: BufRead>(input: &mut R) -> Result<Roster> {
    let mut roster = Roster::new();

    loop {
        let Some(name) = prompt_line(input, "Sheet name: ")? else {
            break;
        };
        if name.is_empty() {
            break;
        }

        let url = read_url(input)?;
        let program_count = read_program_count(input)?;
        roster.insert(name, OrgParams { url, program_count });
    }

    Ok(roster)
}

fn read_url<R: BufRead>(input: &mut R) -> Result<String> {
    loop {
        let Some(url) = prompt_line(input, "URL to substitute in: ")? else {
            bail!("input ended while waiting for a URL");
        };
        match validate_url(&url) {
            Ok(()) => return Ok(url),
            Err(err) => println!("{}. Try again.", err),
        }
    }
}

fn read_program_count<R: BufRead>(input: &mut R) -> Result<usize> {
    loop {
        let Some(line) = prompt_line(input, "Maximum possible number of programs at this school: ")?
        else {
            bail!("input ended while waiting for a program count");
        };
        match parse_program_count(&line) {
            Ok(count) => return Ok(count),
            Err(err) => println!("{}. Try again.", err),
        }
    }
}

/// One prompted line, trimmed. `None` means the input ended.
fn prompt_line<R: BufRead>(input: &mut R, prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_organizations_until_blank_name() {
        let mut input = Cursor::new("Acme High\nhttps://a.example\n12\nZeta High\nhttps://z.example\n0\n\n");

        let roster = read_roster(&mut input).unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(
            roster["Acme High"],
            OrgParams {
                url: "https://a.example".to_string(),
                program_count: 12,
            }
        );
        assert_eq!(roster["Zeta High"].program_count, 0);
    }

    #[test]
    fn invalid_entries_reprompt_until_valid() {
        let mut input =
            Cursor::new("Acme High\nnot-a-url\nhttps://a.example\nten\n10\n\n");

        let roster = read_roster(&mut input).unwrap();

        assert_eq!(roster["Acme High"].url, "https://a.example");
        assert_eq!(roster["Acme High"].program_count, 10);
    }

    #[test]
    fn end_of_input_at_name_prompt_ends_the_roster() {
        let mut input = Cursor::new("Acme High\nhttps://a.example\n3\n");

        let roster = read_roster(&mut input).unwrap();

        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn end_of_input_mid_record_is_an_error() {
        let mut input = Cursor::new("Acme High\n");

        assert!(read_roster(&mut input).is_err());
    }

    #[test]
    fn empty_input_yields_empty_roster() {
        let mut input = Cursor::new("\n");

        let roster = read_roster(&mut input).unwrap();

        assert!(roster.is_empty());
    }
}

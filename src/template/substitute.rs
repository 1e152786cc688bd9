/// Sentinel token in template text that stands in for an organization's
/// spreadsheet URL.
const URL_TOKEN: &str = "URL";

/// Replaces every occurrence of the `URL` sentinel with the organization's
/// URL wrapped in double quotes, yielding a formula string literal so
/// cross-sheet links resolve once the workbook is opened.
pub fn bind_url(text: &str, url: &str) -> String {
    text.replace(URL_TOKEN, &format!("\"{}\"", url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_token_with_quoted_url() {
        assert_eq!(
            bind_url("=IMPORTRANGE(URL, \"A1\")", "https://a.example"),
            "=IMPORTRANGE(\"https://a.example\", \"A1\")"
        );
    }

    #[test]
    fn replaces_every_occurrence() {
        assert_eq!(bind_url("URL URL", "https://x"), "\"https://x\" \"https://x\"");
    }

    #[test]
    fn text_without_token_is_unchanged() {
        assert_eq!(bind_url("nothing here", "https://x"), "nothing here");
    }

    #[test]
    fn idempotent_when_url_has_no_token() {
        let once = bind_url("link: URL", "https://a.example");
        assert_eq!(bind_url(&once, "https://a.example"), once);
    }
}

use anyhow::{Result, bail};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Rewrites every `{{n}}` placeholder in `text` to the decimal of
/// `n + offset`, dropping the delimiters. Repeated template blocks refer to
/// rows a fixed distance below the base block, so shifting the embedded
/// numbers by the block height retargets a block at its own repeat.
///
/// Placeholder content that is not an integer, an unterminated opening
/// delimiter, and a closing delimiter without an opener are all template
/// corruption and fail the call; a wrong number must never reach the
/// output silently.
pub fn shift_placeholders(text: &str, offset: i64) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];

        let Some(end) = after.find(CLOSE) else {
            bail!("unterminated placeholder in cell text: {:?}", text);
        };

        let inner = &after[..end];
        let number: i64 = match inner.trim().parse() {
            Ok(number) => number,
            Err(_) => bail!(
                "placeholder content {:?} is not an integer in cell text: {:?}",
                inner,
                text
            ),
        };

        out.push_str(&(number + offset).to_string());
        rest = &after[end + CLOSE.len()..];
    }

    if rest.contains(CLOSE) {
        bail!("closing delimiter without an opener in cell text: {:?}", text);
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifts_placeholder_by_offset() {
        assert_eq!(shift_placeholders("=A{{3}}", 4).unwrap(), "=A7");
    }

    #[test]
    fn shifts_every_placeholder_independently() {
        assert_eq!(
            shift_placeholders("SUM(B{{1}}:B{{12}})", 10).unwrap(),
            "SUM(B11:B22)"
        );
    }

    #[test]
    fn zero_offset_keeps_numbers_but_strips_delimiters() {
        assert_eq!(shift_placeholders("a{{5}}b", 0).unwrap(), "a5b");
    }

    #[test]
    fn offset_may_push_below_zero() {
        assert_eq!(shift_placeholders("{{3}}", -5).unwrap(), "-2");
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        assert_eq!(shift_placeholders("plain text", 7).unwrap(), "plain text");
    }

    #[test]
    fn inner_whitespace_is_tolerated() {
        assert_eq!(shift_placeholders("{{ 2 }}", 1).unwrap(), "3");
    }

    #[test]
    fn non_integer_content_is_an_error() {
        assert!(shift_placeholders("{{abc}}", 1).is_err());
    }

    #[test]
    fn empty_content_is_an_error() {
        assert!(shift_placeholders("{{}}", 1).is_err());
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        assert!(shift_placeholders("x{{1", 1).is_err());
    }

    #[test]
    fn stray_closer_is_an_error() {
        assert!(shift_placeholders("x}}1", 1).is_err());
    }
}

use anyhow::Result;

use crate::attributes::Overrides;

/// Tag name the reviews shortcode is registered under
pub const SHORTCODE_TAG: &str = "wr_reviews";

/// Parse a `[wr_reviews key="value" ...]` tag into attribute overrides.
///
/// Values may be double-quoted, single-quoted or bare. Keys are
/// lower-cased. A trailing `/` (self-closing form) is accepted.
pub fn parse_shortcode(input: &str) -> Result<Overrides> {
    let inner = input
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| anyhow::anyhow!("Shortcode must be enclosed in brackets: {}", input))?;

    let inner = inner.trim().trim_end_matches('/').trim_end();

    let (tag, rest) = match inner.find(char::is_whitespace) {
        Some(pos) => (&inner[..pos], &inner[pos..]),
        None => (inner, ""),
    };

    if tag != SHORTCODE_TAG {
        anyhow::bail!("Unknown shortcode '{}', expected '{}'", tag, SHORTCODE_TAG);
    }

    parse_attributes(rest)
}

/// Parse the attribute portion of a shortcode
pub fn parse_attributes(text: &str) -> Result<Overrides> {
    let mut attrs = Overrides::new();
    let mut chars = text.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| !c.is_whitespace() && *c != '=') {
            key.push(c);
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        if chars.next_if_eq(&'=').is_none() {
            anyhow::bail!("Attribute '{}' has no value", key);
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut value = String::new();
        match chars.peek().copied() {
            Some(quote @ ('"' | '\'')) => {
                chars.next();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == quote {
                        closed = true;
                        break;
                    }
                    value.push(c);
                }
                if !closed {
                    anyhow::bail!("Unterminated value for attribute '{}'", key);
                }
            }
            _ => {
                while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                    value.push(c);
                }
            }
        }

        attrs.insert(key.to_lowercase(), value);
    }

    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shortcode() {
        let attrs =
            parse_shortcode(r#"[wr_reviews plugin_slug="akismet" limit='5' layout=carousel]"#)
                .unwrap();
        assert_eq!(attrs["plugin_slug"], "akismet");
        assert_eq!(attrs["limit"], "5");
        assert_eq!(attrs["layout"], "carousel");
    }

    #[test]
    fn test_parse_shortcode_no_attributes() {
        let attrs = parse_shortcode("[wr_reviews]").unwrap();
        assert!(attrs.is_empty());

        let attrs = parse_shortcode("[wr_reviews /]").unwrap();
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_parse_shortcode_keys_lowercased_and_spaces_kept() {
        let attrs = parse_shortcode(r#"[wr_reviews Container_Class="a b"]"#).unwrap();
        assert_eq!(attrs["container_class"], "a b");
    }

    #[test]
    fn test_parse_shortcode_errors() {
        assert!(parse_shortcode("wr_reviews limit=1").is_err());
        assert!(parse_shortcode("[gallery ids=1]").is_err());
        assert!(parse_shortcode(r#"[wr_reviews limit="3]"#).is_err());
        assert!(parse_shortcode("[wr_reviews limit]").is_err());
    }
}

//! Small string helpers shared by the resolver and the renderer.

/// Parse the leading integer of a string, `0` when there is none.
///
/// Mirrors how shortcode values have always been read: `"4 stars"` is 4,
/// `"abc"` is 0, surrounding whitespace is ignored.
pub fn leading_int(value: &str) -> i64 {
    let s = value.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    let magnitude = digits[..end]
        .chars()
        .fold(0i64, |acc, c| {
            acc.saturating_mul(10)
                .saturating_add(i64::from(c as u8 - b'0'))
        });

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Clean a user- or remote-supplied string for use as plain text.
///
/// Strips tags, removes percent-encoded octets, collapses whitespace
/// (including line breaks and tabs) and trims.
pub fn sanitize_text_field(value: &str) -> String {
    collapse_whitespace(&strip_octets(&strip_tags(value)))
}

/// Remove anything between `<` and `>`
pub fn strip_tags(value: &str) -> String {
    let mut stripped = String::with_capacity(value.len());
    let mut in_tag = false;
    for c in value.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => stripped.push(c),
            _ => {}
        }
    }
    stripped
}

pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_octets(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    let mut i = 0;
    while i < value.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            i += 3;
            continue;
        }
        let ch = value[i..].chars().next().unwrap_or_default();
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

/// Shorten `text` to at most `max` characters, ending with an ellipsis.
///
/// The cut backs off to the last whitespace inside the window so words
/// stay whole; a single word longer than `max` is cut mid-word.
pub fn truncate_words(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }

    let byte_end = text
        .char_indices()
        .nth(max)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let window = &text[..byte_end];

    let cut = match window.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => &window[..pos],
        _ => window,
    };

    format!("{}…", cut.trim_end())
}

/// Whether `value` looks like a 32-character md5 hex digest
pub fn is_md5_hex(value: &str) -> bool {
    value.len() == 32 && value.chars().all(|c| c.is_ascii_hexdigit())
}

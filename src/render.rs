use minijinja::Environment;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::attributes::Attributes;
use crate::error::RenderError;
use crate::i18n::{Catalog, RATING_TITLE};
use crate::models::{RawReview, RenderedReview};
use crate::text::{collapse_whitespace, is_md5_hex, sanitize_text_field, strip_tags, truncate_words};

const TEMPLATE_NAME: &str = "review.html";

const REVIEW_TEMPLATE: &str = concat!(
    "<div class='wr-review'>",
    "<div class='wr-review-header'>",
    "<img class='wr-review-avatar' src='{{ avatar_url|safe }}' width='{{ size }}' height='{{ size }}' alt='{{ author }}'>",
    "<div class='wr-review-meta'>",
    "<span class='wr-review-author'>",
    "{% if profile_url %}<a href='{{ profile_url|safe }}' target='_blank'>{{ author }}</a>{% else %}{{ author }}{% endif %}",
    "</span>",
    "<span class='wr-review-rating' title='{{ rating_title }}'>{{ stars }}</span>",
    "{% if date %}<time class='wr-review-date' datetime='{{ datetime }}'>{{ date }}</time>{% endif %}",
    "</div>",
    "</div>",
    "{% if title %}<h4 class='wr-review-title'>{{ title }}</h4>{% endif %}",
    "<div class='wr-review-content'>{{ content }}</div>",
    "</div>",
);

const GRAVATAR_BASE: &str = "https://secure.gravatar.com/avatar/";

#[derive(Serialize)]
struct ReviewView<'a> {
    avatar_url: String,
    size: u32,
    author: &'a str,
    profile_url: Option<String>,
    rating_title: String,
    stars: String,
    date: Option<String>,
    datetime: Option<String>,
    title: String,
    content: String,
}

/// Turns raw catalog records into display-ready reviews
pub struct ReviewRenderer {
    env: Environment<'static>,
    truncate: usize,
    gravatar_size: u32,
    no_query_string: bool,
    catalog: Catalog,
}

impl ReviewRenderer {
    pub fn new(attrs: &Attributes, catalog: &Catalog) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, REVIEW_TEMPLATE)?;

        Ok(Self {
            env,
            truncate: attrs.truncate,
            gravatar_size: attrs.gravatar_size,
            no_query_string: attrs.no_query_string,
            catalog: catalog.clone(),
        })
    }

    /// Build the markup fragment for one review
    pub fn render(&self, review: &RawReview) -> Result<RenderedReview, RenderError> {
        let created_at = review.created_at();
        let rating = review.rating.min(5);
        let rating_str = rating.to_string();

        // URLs are escaped here and passed through `safe`; the template's HTML
        // escaping would otherwise also encode `/`.
        let view = ReviewView {
            avatar_url: esc_attr(&avatar_url(review.avatar.as_deref(), self.gravatar_size)),
            size: self.gravatar_size,
            author: review.author.text.trim(),
            profile_url: profile_link(&review.author.href, self.no_query_string)
                .map(|u| esc_attr(&u)),
            rating_title: self
                .catalog
                .format(RATING_TITLE, &[("rating", rating_str.as_str())]),
            stars: stars(rating),
            date: created_at.map(|d| d.format("%B %-d, %Y").to_string()),
            datetime: created_at.map(|d| d.format("%Y-%m-%d").to_string()),
            title: collapse_whitespace(&strip_tags(&review.title)),
            content: truncate_words(
                &collapse_whitespace(&strip_tags(&review.content)),
                self.truncate,
            ),
        };

        let output = self.env.get_template(TEMPLATE_NAME)?.render(&view)?;

        debug!(rating = review.rating, bytes = output.len(), "Rendered review");

        Ok(RenderedReview {
            rating: review.rating,
            timestamp: review.timestamp,
            username: username_from_profile(&review.author.href),
            output,
        })
    }
}

/// Reviewer username: the last `/`-separated piece of the profile URL.
///
/// The catalog's display name is a nice name, not the account name, so it
/// cannot be used for exclusion. A trailing slash yields an empty username.
pub fn username_from_profile(href: &str) -> String {
    let last = href.rsplit('/').next().unwrap_or_default();
    sanitize_text_field(last)
}

/// Link target for the author name, `None` unless it is an http(s) URL
pub fn profile_link(href: &str, no_query_string: bool) -> Option<String> {
    let mut url = Url::parse(href.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    if no_query_string {
        url.set_query(None);
        url.set_fragment(None);
    }

    Some(url.to_string())
}

/// Gravatar URL for an email or md5 hash, mystery-person placeholder otherwise
pub fn avatar_url(avatar: Option<&str>, size: u32) -> String {
    let hash = match avatar.map(str::trim) {
        Some(a) if is_md5_hex(a) => Some(a.to_ascii_lowercase()),
        Some(a) if a.contains('@') => Some(format!("{:x}", md5::compute(a.to_lowercase()))),
        _ => None,
    };

    match hash {
        Some(hash) => format!("{GRAVATAR_BASE}{hash}?s={size}&d=mm"),
        None => format!("{GRAVATAR_BASE}?s={size}&d=mm&f=y"),
    }
}

/// Escape a value for a single- or double-quoted HTML attribute
pub fn esc_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{resolve, Overrides};
    use crate::models::Author;

    fn review() -> RawReview {
        RawReview {
            rating: 4,
            timestamp: 1_700_000_000,
            author: Author {
                text: "Jane Doe".to_string(),
                href: "https://profiles.wordpress.org/janedoe?ref=reviews#top".to_string(),
            },
            title: "Solid <b>plugin</b>".to_string(),
            content: "Does exactly what it says on the tin.".to_string(),
            avatar: Some("Jane@Example.com".to_string()),
        }
    }

    fn renderer(pairs: &[(&str, &str)]) -> ReviewRenderer {
        let overrides: Overrides = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ReviewRenderer::new(&resolve(&overrides), &Catalog::default()).unwrap()
    }

    #[test]
    fn test_username_from_profile() {
        assert_eq!(
            username_from_profile("https://profiles.wordpress.org/janedoe"),
            "janedoe"
        );
        assert_eq!(username_from_profile("https://profiles.wordpress.org/janedoe/"), "");
        assert_eq!(username_from_profile("jane%20doe"), "janedoe");
        assert_eq!(username_from_profile(""), "");
    }

    #[test]
    fn test_profile_link() {
        let href = "https://profiles.wordpress.org/janedoe?ref=x#y";
        assert_eq!(profile_link(href, false).unwrap(), href);
        assert_eq!(
            profile_link(href, true).unwrap(),
            "https://profiles.wordpress.org/janedoe"
        );
        assert!(profile_link("javascript:alert(1)", false).is_none());
        assert!(profile_link("not a url", false).is_none());
    }

    #[test]
    fn test_avatar_url() {
        let expected_hash = format!("{:x}", md5::compute("jane@example.com"));
        assert_eq!(
            avatar_url(Some(" Jane@Example.com "), 64),
            format!("https://secure.gravatar.com/avatar/{expected_hash}?s=64&d=mm")
        );

        let hash = "0123456789ABCDEF0123456789ABCDEF";
        assert!(avatar_url(Some(hash), 80).contains("0123456789abcdef0123456789abcdef"));

        assert_eq!(
            avatar_url(None, 80),
            "https://secure.gravatar.com/avatar/?s=80&d=mm&f=y"
        );
        assert_eq!(avatar_url(Some("nope"), 80), avatar_url(None, 80));
    }

    #[test]
    fn test_esc_attr() {
        assert_eq!(esc_attr("a'b\"c<d>&"), "a&#039;b&quot;c&lt;d&gt;&amp;");
        assert_eq!(esc_attr("https://x.org/a?b=1"), "https://x.org/a?b=1");
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(4), "★★★★☆");
        assert_eq!(stars(9), "★★★★★");
        assert_eq!(stars(0), "☆☆☆☆☆");
    }

    #[test]
    fn test_render_review() {
        let rendered = renderer(&[]).render(&review()).unwrap();

        assert_eq!(rendered.rating, 4);
        assert_eq!(rendered.timestamp, 1_700_000_000);
        assert_eq!(rendered.username, "janedoe?ref=reviews#top");
        assert!(rendered.output.starts_with("<div class='wr-review'>"));
        assert!(rendered.output.contains("★★★★☆"));
        assert!(rendered.output.contains("title='4 out of 5 stars'"));
        assert!(rendered.output.contains(">Jane Doe</a>"));
        assert!(rendered.output.contains("<h4 class='wr-review-title'>Solid plugin</h4>"));
        assert!(rendered.output.contains("November 14, 2023"));
        assert!(rendered.output.contains("width='80'"));
    }

    #[test]
    fn test_render_strips_query_string() {
        let rendered = renderer(&[("no_query_string", "1")]).render(&review()).unwrap();
        assert!(rendered
            .output
            .contains("href='https://profiles.wordpress.org/janedoe'"));
    }

    #[test]
    fn test_render_truncates_content() {
        let mut raw = review();
        raw.content = "word ".repeat(100);
        let rendered = renderer(&[("truncate", "20")]).render(&raw).unwrap();
        assert!(rendered.output.contains("word word word word…</div>"));
    }

    #[test]
    fn test_render_escapes_markup() {
        let mut raw = review();
        raw.author.text = "<script>alert('x')</script>".to_string();
        raw.content = "Tom & Jerry".to_string();
        let rendered = renderer(&[]).render(&raw).unwrap();
        assert!(!rendered.output.contains("<script>"));
        assert!(rendered.output.contains("Tom &amp; Jerry"));
    }

    #[test]
    fn test_render_missing_optional_fields() {
        let raw = RawReview {
            rating: 3,
            timestamp: 0,
            author: Author::default(),
            title: String::new(),
            content: String::new(),
            avatar: None,
        };

        let rendered = renderer(&[]).render(&raw).unwrap();
        assert_eq!(rendered.username, "");
        assert!(!rendered.output.contains("<a href"));
        assert!(!rendered.output.contains("wr-review-title"));
        assert!(rendered.output.contains("d=mm&amp;f=y"));
    }
}

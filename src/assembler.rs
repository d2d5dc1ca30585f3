use crate::attributes::Attributes;
use crate::i18n::{Catalog, LABEL_ADD_REVIEW, LABEL_ALL_REVIEWS};
use crate::models::RenderedReview;
use crate::render::esc_attr;

const REVIEWS_PAGE_BASE: &str = "https://wordpress.org/support/view/plugin-reviews/";
const SUPPORT_BASE: &str = "https://wordpress.org/support/plugin/";

/// Page listing every review of a plugin; also the fetch-error fallback target
pub fn reviews_page_url(slug: &str) -> String {
    format!("{REVIEWS_PAGE_BASE}{slug}")
}

/// Page referenced by the "no reviews found" message
pub fn support_reviews_url(slug: &str) -> String {
    format!("{SUPPORT_BASE}{slug}/reviews/")
}

/// Final markup for a set of reviews that survived the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    pub markup: String,
    pub review_count: usize,
    pub has_links: bool,
}

impl Assembled {
    /// True when the markup is just an empty container
    pub fn is_empty(&self) -> bool {
        self.review_count == 0 && !self.has_links
    }
}

/// Concatenate fragments, wrap them in the container and append links
pub fn assemble(reviews: &[RenderedReview], attrs: &Attributes, catalog: &Catalog) -> Assembled {
    let mut output: String = reviews.iter().map(|r| r.output.as_str()).collect();

    if !attrs.container.is_empty() {
        output = wrap_container(&output, attrs);
    }

    let links = links(attrs, catalog);
    let has_links = !links.is_empty();
    if has_links {
        output.push_str(&format!(
            "<p class='wr-reviews-link'>{}</p>",
            links.join(" | ")
        ));
    }

    Assembled {
        markup: output,
        review_count: reviews.len(),
        has_links,
    }
}

fn wrap_container(inner: &str, attrs: &Attributes) -> String {
    let mut attributes = Vec::new();

    if !attrs.container_class.is_empty() {
        attributes.push(format!("class='{}'", esc_attr(&attrs.container_class)));
    }

    if !attrs.container_id.is_empty() {
        attributes.push(format!("id='{}'", esc_attr(&attrs.container_id)));
    }

    let tag = &attrs.container;
    if attributes.is_empty() {
        format!("<{tag}>{inner}</{tag}>")
    } else {
        format!("<{tag} {}>{inner}</{tag}>", attributes.join(" "))
    }
}

fn links(attrs: &Attributes, catalog: &Catalog) -> Vec<String> {
    let page = esc_attr(&reviews_page_url(&attrs.plugin_slug));
    let mut links = Vec::new();

    if attrs.link_all {
        links.push(format!(
            "<a href='{page}' target='_blank' class='wr-reviews-link-all'>{}</a>",
            catalog.get(LABEL_ALL_REVIEWS)
        ));
    }

    if attrs.link_add {
        links.push(format!(
            "<a href='{page}#postform' target='_blank' class='wr-reviews-link-add'>{}</a>",
            catalog.get(LABEL_ADD_REVIEW)
        ));
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{resolve, Overrides};

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        let overrides: Overrides = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        resolve(&overrides)
    }

    fn rendered(output: &str) -> RenderedReview {
        RenderedReview {
            rating: 5,
            timestamp: 0,
            username: "u".to_string(),
            output: output.to_string(),
        }
    }

    #[test]
    fn test_default_container() {
        let out = assemble(&[rendered("<a/>"), rendered("<b/>")], &attrs(&[]), &Catalog::default());
        assert_eq!(out.markup, "<div class='wr-grid'><a/><b/></div>");
        assert_eq!(out.review_count, 2);
        assert!(!out.is_empty());
    }

    #[test]
    fn test_container_with_id_and_class() {
        let out = assemble(
            &[rendered("x")],
            &attrs(&[
                ("container", "section"),
                ("container_id", "reviews"),
                ("container_class", "mine"),
                ("layout", "carousel"),
            ]),
            &Catalog::default(),
        );
        assert_eq!(
            out.markup,
            "<section class='mine wr-carousel' id='reviews'>x</section>"
        );
    }

    #[test]
    fn test_no_container() {
        let out = assemble(&[rendered("x")], &attrs(&[("container", "")]), &Catalog::default());
        assert_eq!(out.markup, "x");
    }

    #[test]
    fn test_empty_without_links() {
        let out = assemble(&[], &attrs(&[]), &Catalog::default());
        assert_eq!(out.markup, "<div class='wr-grid'></div>");
        assert!(out.is_empty());
    }

    #[test]
    fn test_links() {
        let out = assemble(
            &[],
            &attrs(&[
                ("plugin_slug", "akismet"),
                ("link_all", "yes"),
                ("link_add", "yes"),
            ]),
            &Catalog::default(),
        );
        assert!(!out.is_empty());
        assert_eq!(
            out.markup,
            "<div class='wr-grid'></div><p class='wr-reviews-link'>\
             <a href='https://wordpress.org/support/view/plugin-reviews/akismet' target='_blank' class='wr-reviews-link-all'>See all reviews</a> | \
             <a href='https://wordpress.org/support/view/plugin-reviews/akismet#postform' target='_blank' class='wr-reviews-link-add'>Add a review</a></p>"
        );
    }

    #[test]
    fn test_single_link_has_no_separator() {
        let out = assemble(&[], &attrs(&[("link_add", "yes")]), &Catalog::default());
        assert!(out.markup.contains("wr-reviews-link-add"));
        assert!(!out.markup.contains(" | "));
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            support_reviews_url("akismet"),
            "https://wordpress.org/support/plugin/akismet/reviews/"
        );
        assert_eq!(
            reviews_page_url("akismet"),
            "https://wordpress.org/support/view/plugin-reviews/akismet"
        );
    }
}

use std::collections::BTreeMap;

use serde::Serialize;

use crate::text::{leading_int, sanitize_text_field};

/// User-supplied attribute overrides, keyed by canonical attribute name
pub type Overrides = BTreeMap<String, String>;

/// Allowed attributes with their default values
pub const DEFAULT_ATTRIBUTES: [(&str, &str); 15] = [
    ("plugin_slug", "plugin-reviews"),
    ("rating", "all"),
    ("limit", "10"),
    ("sortby", "date"),
    ("sort", "DESC"),
    ("truncate", "300"),
    ("gravatar_size", "80"),
    ("container", "div"),
    ("container_id", ""),
    ("container_class", ""),
    ("link_all", "no"),
    ("link_add", "no"),
    ("layout", "grid"),
    ("no_query_string", "0"),
    ("exclude", ""),
];

const DEFAULT_TRUNCATE: usize = 300;
const DEFAULT_GRAVATAR_SIZE: u32 = 80;

/// Presentational arrangement of the reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Grid,
    Carousel,
}

impl Layout {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "grid" => Some(Self::Grid),
            "carousel" => Some(Self::Carousel),
            _ => None,
        }
    }

    /// Class appended to the container for this layout
    pub fn class(self) -> &'static str {
        match self {
            Self::Grid => "wr-grid",
            Self::Carousel => "wr-carousel",
        }
    }
}

/// Minimum rating a review needs to be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RatingFilter {
    All,
    AtLeast(u8),
}

impl RatingFilter {
    /// `"all"` and anything outside 1-5 leave reviews unfiltered
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            return Self::All;
        }

        match leading_int(value) {
            n @ 1..=5 => Self::AtLeast(n as u8),
            _ => Self::All,
        }
    }
}

/// Review property used for ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Rating,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// How many reviews to output.
///
/// `Count(n)` keeps the first `n`; `DropLast(n)` keeps all but the last `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Limit {
    Unlimited,
    Count(usize),
    DropLast(usize),
}

impl Limit {
    /// Only `""`, `"0"` and `"none"` mean no limit.
    ///
    /// Anything else takes its leading integer, so non-numeric text yields
    /// `Count(0)` and a negative value drops that many from the end.
    pub fn parse(value: &str) -> Self {
        if matches!(value, "" | "0" | "none") {
            return Self::Unlimited;
        }

        let n = leading_int(value);
        let magnitude = usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX);
        if n < 0 {
            Self::DropLast(magnitude)
        } else {
            Self::Count(magnitude)
        }
    }

    /// Number of items kept out of `len`
    pub fn kept(self, len: usize) -> usize {
        match self {
            Self::Unlimited => len,
            Self::Count(n) => n.min(len),
            Self::DropLast(n) => len.saturating_sub(n),
        }
    }
}

/// Fully validated request options
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attributes {
    pub plugin_slug: String,
    pub rating: RatingFilter,
    pub limit: Limit,
    /// Raw sort field after validation; may hold `"DESC"` (see [`resolve`])
    pub sortby: String,
    /// Raw sort direction after validation; may hold `"rating"` (see [`resolve`])
    pub sort: String,
    pub truncate: usize,
    pub gravatar_size: u32,
    pub container: String,
    pub container_id: String,
    pub container_class: String,
    pub link_all: bool,
    pub link_add: bool,
    pub layout: Layout,
    pub no_query_string: bool,
    pub exclude: Vec<String>,
}

impl Attributes {
    /// `rating` sorts by rating, anything else by date
    pub fn sort_field(&self) -> SortField {
        if self.sortby == "rating" {
            SortField::Rating
        } else {
            SortField::Date
        }
    }

    /// `None` means the source order is kept
    pub fn sort_direction(&self) -> Option<SortDirection> {
        match self.sort.as_str() {
            "DESC" => Some(SortDirection::Desc),
            "ASC" => Some(SortDirection::Asc),
            _ => None,
        }
    }
}

impl Default for Attributes {
    fn default() -> Self {
        resolve(&Overrides::new())
    }
}

/// Default attributes as an owned map
pub fn default_attributes() -> Overrides {
    DEFAULT_ATTRIBUTES
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Merge overrides over the defaults and validate the result.
///
/// Unknown keys are ignored. Invalid values never raise; they are coerced.
/// The sortby/sort cross-check is asymmetric: an unknown sort
/// field sets the direction to `"rating"`, and an unknown direction sets
/// the field to `"DESC"`. Both leave the reviews in source order.
pub fn resolve(overrides: &Overrides) -> Attributes {
    resolve_layered(&Overrides::new(), overrides)
}

/// Like [`resolve`], with site-wide defaults applied before request overrides
pub fn resolve_layered(site: &Overrides, overrides: &Overrides) -> Attributes {
    let mut parsed = default_attributes();
    for layer in [site, overrides] {
        for (key, value) in layer {
            if let Some(slot) = parsed.get_mut(key) {
                slot.clone_from(value);
            }
        }
    }

    let get = |key: &str| parsed.get(key).cloned().unwrap_or_default();

    let mut sortby = get("sortby");
    let mut sort = get("sort").to_uppercase();

    if !matches!(sortby.as_str(), "rating" | "date") {
        sort = "rating".to_string();
    }

    if !matches!(sort.as_str(), "ASC" | "DESC") {
        sortby = "DESC".to_string();
    }

    let layout = Layout::parse(&get("layout")).unwrap_or_default();

    let mut classes: Vec<String> = get("container_class")
        .split_whitespace()
        .map(str::to_string)
        .collect();
    classes.push(layout.class().to_string());

    let truncate = match leading_int(&get("truncate")) {
        n if n > 0 => usize::try_from(n).unwrap_or(DEFAULT_TRUNCATE),
        _ => DEFAULT_TRUNCATE,
    };

    let gravatar_size = match leading_int(&get("gravatar_size")) {
        n if n > 0 => u32::try_from(n).unwrap_or(DEFAULT_GRAVATAR_SIZE),
        _ => DEFAULT_GRAVATAR_SIZE,
    };

    // Empty entries are kept: they match reviewers whose username is empty.
    let exclude_raw = get("exclude");
    let exclude = if exclude_raw.is_empty() {
        Vec::new()
    } else {
        exclude_raw.split(',').map(str::to_string).collect()
    };

    Attributes {
        plugin_slug: sanitize_text_field(&get("plugin_slug")),
        rating: RatingFilter::parse(&get("rating")),
        limit: Limit::parse(&get("limit")),
        sortby,
        sort,
        truncate,
        gravatar_size,
        container: tag_name(&get("container")),
        container_id: get("container_id"),
        container_class: classes.join(" "),
        link_all: get("link_all") == "yes",
        link_add: get("link_add") == "yes",
        layout,
        no_query_string: is_truthy(&get("no_query_string")),
        exclude,
    }
}

/// Container element name restricted to characters valid in a tag
fn tag_name(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "no" | "false"
    )
}

/// Translate editor-block attributes into canonical shortcode attributes.
///
/// The block's `sortBy` control picks the sort direction, not the field.
pub fn from_block(block: &Overrides) -> Overrides {
    let pick = |key: &str, default: &str| {
        block
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    };

    let mut attrs = Overrides::new();
    attrs.insert("plugin_slug".to_string(), pick("pluginSlug", ""));
    attrs.insert("limit".to_string(), pick("limit", "10"));
    attrs.insert("sort".to_string(), pick("sortBy", "DESC"));
    attrs.insert("rating".to_string(), pick("rating", "all"));

    // The block editor exposes a layout control, so it is honored here too.
    if let Some(layout) = block.get("layout") {
        attrs.insert("layout".to_string(), layout.clone());
    }

    attrs
}

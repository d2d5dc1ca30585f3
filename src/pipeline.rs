//! Filter → exclude → sort → limit over rendered reviews.
//!
//! Each stage is a pure function taking the sequence by value and returning
//! the next one. [`ReviewPipeline::run`] is the only way to apply them
//! together, so the order cannot change.

use std::cmp::Ordering;

use tracing::debug;

use crate::attributes::{Attributes, Limit, RatingFilter, SortDirection, SortField};
use crate::models::RenderedReview;

/// Keep reviews rated at least the filter value
pub fn filter(reviews: Vec<RenderedReview>, rating: RatingFilter) -> Vec<RenderedReview> {
    match rating {
        RatingFilter::All => reviews,
        RatingFilter::AtLeast(stars) => reviews
            .into_iter()
            .filter(|r| r.rating >= stars)
            .collect(),
    }
}

/// Drop reviews whose username exactly matches an excluded one
pub fn exclude(reviews: Vec<RenderedReview>, usernames: &[String]) -> Vec<RenderedReview> {
    if usernames.is_empty() {
        return reviews;
    }

    reviews
        .into_iter()
        .filter(|r| !usernames.iter().any(|u| *u == r.username))
        .collect()
}

/// Stable sort; tied reviews keep their relative order in both directions
pub fn sort(
    mut reviews: Vec<RenderedReview>,
    field: SortField,
    direction: Option<SortDirection>,
) -> Vec<RenderedReview> {
    let Some(direction) = direction else {
        return reviews;
    };

    let key = |r: &RenderedReview| match field {
        SortField::Rating => i64::from(r.rating),
        SortField::Date => r.timestamp,
    };

    // Reversed comparison, not a reversed result: DESC ties stay in source order.
    reviews.sort_by(|a, b| -> Ordering {
        match direction {
            SortDirection::Asc => key(a).cmp(&key(b)),
            SortDirection::Desc => key(b).cmp(&key(a)),
        }
    });

    reviews
}

/// Keep the leading reviews the limit allows
pub fn limit(mut reviews: Vec<RenderedReview>, limit: Limit) -> Vec<RenderedReview> {
    reviews.truncate(limit.kept(reviews.len()));
    reviews
}

/// The pipeline configuration for one request
#[derive(Debug, Clone)]
pub struct ReviewPipeline {
    rating: RatingFilter,
    exclude: Vec<String>,
    field: SortField,
    direction: Option<SortDirection>,
    limit: Limit,
}

impl ReviewPipeline {
    pub fn new(attrs: &Attributes) -> Self {
        Self {
            rating: attrs.rating,
            exclude: attrs.exclude.clone(),
            field: attrs.sort_field(),
            direction: attrs.sort_direction(),
            limit: attrs.limit,
        }
    }

    /// Apply all stages in their fixed order
    pub fn run(&self, reviews: Vec<RenderedReview>) -> Vec<RenderedReview> {
        let total = reviews.len();

        let reviews = filter(reviews, self.rating);
        let filtered = reviews.len();

        let reviews = exclude(reviews, &self.exclude);
        let excluded = filtered - reviews.len();

        let reviews = sort(reviews, self.field, self.direction);
        let reviews = limit(reviews, self.limit);

        debug!(
            total,
            filtered,
            excluded,
            kept = reviews.len(),
            "Review pipeline applied"
        );

        reviews
    }
}

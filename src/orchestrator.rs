use tracing::{info, instrument, warn};

use crate::assembler::{assemble, reviews_page_url, support_reviews_url};
use crate::attributes::{from_block, resolve_layered, Attributes, Overrides};
use crate::error::RenderError;
use crate::i18n::{Catalog, FETCH_ERROR, NO_REVIEWS};
use crate::models::{RenderOutcome, RenderedReview};
use crate::pipeline::ReviewPipeline;
use crate::render::{esc_attr, ReviewRenderer};
use crate::source::ReviewSource;

/// Runs one render request: resolve, fetch, normalize, pipeline, assemble
pub struct Orchestrator<S: ReviewSource> {
    source: S,
    catalog: Catalog,
    site_defaults: Overrides,
}

impl<S: ReviewSource> Orchestrator<S> {
    pub fn new(source: S, catalog: Catalog) -> Self {
        Self {
            source,
            catalog,
            site_defaults: Overrides::new(),
        }
    }

    /// Attribute values applied before every request's own attributes
    pub fn with_site_defaults(mut self, defaults: Overrides) -> Self {
        self.site_defaults = defaults;
        self
    }

    /// Resolve shortcode attributes against the defaults
    pub fn resolve(&self, overrides: &Overrides) -> Attributes {
        resolve_layered(&self.site_defaults, overrides)
    }

    /// Render from shortcode attributes
    pub async fn render(
        &self,
        overrides: &Overrides,
        fresh: bool,
    ) -> Result<RenderOutcome, RenderError> {
        let attrs = self.resolve(overrides);
        self.render_attributes(&attrs, fresh).await
    }

    /// Render from editor-block attributes
    pub async fn render_block(
        &self,
        block: &Overrides,
        fresh: bool,
    ) -> Result<RenderOutcome, RenderError> {
        self.render(&from_block(block), fresh).await
    }

    #[instrument(skip(self, attrs), fields(plugin = %attrs.plugin_slug))]
    pub async fn render_attributes(
        &self,
        attrs: &Attributes,
        fresh: bool,
    ) -> Result<RenderOutcome, RenderError> {
        let slug = &attrs.plugin_slug;

        let raw = match self.source.fetch_reviews(slug, fresh).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to fetch reviews");
                let url = esc_attr(&reviews_page_url(slug));
                return Ok(RenderOutcome::FetchFailed(
                    self.catalog.format(FETCH_ERROR, &[("url", url.as_str())]),
                ));
            }
        };

        let renderer = ReviewRenderer::new(attrs, &self.catalog)?;

        let rendered: Vec<RenderedReview> = raw
            .iter()
            .filter_map(|review| match renderer.render(review) {
                Ok(r) => Some(r),
                Err(e) => {
                    warn!(error = %e, "Skipping review that failed to render");
                    None
                }
            })
            .collect();

        let fetched = rendered.len();
        let reviews = ReviewPipeline::new(attrs).run(rendered);
        let assembled = assemble(&reviews, attrs, &self.catalog);

        info!(
            fetched,
            shown = assembled.review_count,
            "Rendered plugin reviews"
        );

        if assembled.is_empty() {
            let url = esc_attr(&support_reviews_url(slug));
            return Ok(RenderOutcome::NoReviews(
                self.catalog.format(NO_REVIEWS, &[("url", url.as_str())]),
            ));
        }

        Ok(RenderOutcome::Reviews(assembled.markup))
    }
}

pub mod assembler;
pub mod attributes;
pub mod config;
pub mod error;
pub mod i18n;
pub mod models;
pub mod options;
pub mod orchestrator;
pub mod pipeline;
pub mod render;
pub mod shortcode;
pub mod source;
pub mod text;

pub use attributes::{from_block, resolve, Attributes, Overrides};
pub use config::Config;
pub use error::{FetchError, RenderError};
pub use i18n::Catalog;
pub use models::*;
pub use options::{activate, JsonOptionStore, OptionStore, FLUSH_FLAG};
pub use orchestrator::Orchestrator;
pub use pipeline::ReviewPipeline;
pub use render::ReviewRenderer;
pub use shortcode::parse_shortcode;
pub use source::{FileSource, ReviewSource, WordPressSource};

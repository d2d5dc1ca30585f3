use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use plugin_reviews::attributes::default_attributes;
use plugin_reviews::{
    activate, parse_shortcode, Config, FileSource, JsonOptionStore, OptionStore, Orchestrator,
    Overrides, RenderOutcome, ReviewSource, WordPressSource, FLUSH_FLAG,
};

#[derive(Parser)]
#[command(name = "plugin-reviews")]
#[command(about = "Fetch plugin reviews and render them as embeddable markup")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(long, env = "PLUGIN_REVIEWS_CONFIG", default_value = ".plugin-reviews/config.yml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Render reviews for a plugin
    Render {
        /// Attribute override (e.g. --attr plugin_slug=akismet)
        #[arg(long = "attr", value_parser = parse_key_val)]
        attrs: Vec<(String, String)>,

        /// Treat --attr keys as editor-block attributes (pluginSlug, sortBy, ...)
        #[arg(long)]
        block: bool,

        /// Full shortcode tag, e.g. '[wr_reviews plugin_slug="akismet"]'
        #[arg(long, conflicts_with_all = ["attrs", "block"])]
        shortcode: Option<String>,

        /// Read reviews from a local JSON file or directory instead of the catalog
        #[arg(long)]
        reviews_file: Option<PathBuf>,

        /// Write markup to file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Request a fresh fetch on the next render
    Activate,

    /// Print the default attributes
    Defaults,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("plugin_reviews=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Render {
            attrs,
            block,
            shortcode,
            reviews_file,
            output,
        } => {
            let overrides = match shortcode {
                Some(tag) => parse_shortcode(&tag)?,
                None => attrs.into_iter().collect(),
            };

            let store = JsonOptionStore::new(&config.state.path);

            let markup = match reviews_file {
                Some(path) => {
                    let source = FileSource::new(path);
                    run_render(source, &store, &config, &overrides, block).await?
                }
                None => {
                    let source = WordPressSource::new(&config.source)?;
                    run_render(source, &store, &config, &overrides, block).await?
                }
            };

            match output {
                Some(path) => {
                    fs::write(&path, &markup)
                        .with_context(|| format!("Failed to write output: {}", path.display()))?;
                    info!(output = %path.display(), "Markup written");
                }
                None => println!("{}", markup),
            }
        }
        Commands::Activate => {
            let store = JsonOptionStore::new(&config.state.path);
            activate(&store)?;
            println!("Reviews will be refreshed on the next render.");
        }
        Commands::Defaults => {
            println!("{}", serde_json::to_string_pretty(&default_attributes())?);
        }
    }

    Ok(())
}

/// Render once, honoring a pending refresh request.
///
/// The refresh flag is cleared only after a fetch succeeds, so a failed
/// fetch retries fresh on the next render.
async fn run_render<S: ReviewSource>(
    source: S,
    store: &impl OptionStore,
    config: &Config,
    overrides: &Overrides,
    block: bool,
) -> Result<String> {
    let fresh = store.get_flag(FLUSH_FLAG)?;
    if fresh {
        info!("Refresh flag set, requesting fresh reviews");
    }

    let orchestrator =
        Orchestrator::new(source, config.catalog()).with_site_defaults(config.attributes.clone());

    let outcome = if block {
        orchestrator.render_block(overrides, fresh).await?
    } else {
        orchestrator.render(overrides, fresh).await?
    };

    if let RenderOutcome::FetchFailed(_) = &outcome {
        info!("Rendered fetch-error fallback");
    } else if fresh {
        store.set_flag(FLUSH_FLAG, false)?;
    }

    Ok(outcome.into_markup())
}

/// Parse a `key=value` argument
fn parse_key_val(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .with_context(|| format!("Invalid attribute '{}', expected key=value", s))?;
    Ok((key.trim().to_string(), value.to_string()))
}

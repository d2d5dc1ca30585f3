pub mod json;

pub use json::JsonOptionStore;

use anyhow::Result;
use tracing::info;

/// Set on activation; tells the next render to fetch fresh reviews
pub const FLUSH_FLAG: &str = "wr_reviews_flush_transient";

/// Trait for persisted key-value option backends
pub trait OptionStore {
    /// Read a boolean option, `false` when unset
    fn get_flag(&self, key: &str) -> Result<bool>;

    /// Write a boolean option
    fn set_flag(&self, key: &str, value: bool) -> Result<()>;
}

/// Activation hook: request a refresh on the next render
pub fn activate(store: &impl OptionStore) -> Result<()> {
    store.set_flag(FLUSH_FLAG, true)?;
    info!("Refresh requested for next render");
    Ok(())
}

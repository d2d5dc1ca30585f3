use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use super::OptionStore;

/// JSON file-based option store
pub struct JsonOptionStore {
    path: PathBuf,
}

impl JsonOptionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read options: {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse options: {}", self.path.display()))
    }

    fn save(&self, options: &BTreeMap<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create options directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(options)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write options: {}", self.path.display()))?;
        Ok(())
    }
}

impl OptionStore for JsonOptionStore {
    fn get_flag(&self, key: &str) -> Result<bool> {
        let options = self.load()?;
        Ok(options.get(key).and_then(Value::as_bool).unwrap_or(false))
    }

    fn set_flag(&self, key: &str, value: bool) -> Result<()> {
        let mut options = self.load()?;
        options.insert(key.to_string(), Value::Bool(value));
        self.save(&options)?;

        debug!(key, value, "Option updated");

        Ok(())
    }
}

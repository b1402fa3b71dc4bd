use std::path::Path;

use ini::Ini;
use tracing::{debug, warn};

use crate::error::BootstrapError;

pub const PLUGIN_SECTION: &str = "plugin";
pub const PLUGIN_FILENAME_KEY: &str = "filename";

/// Reads `[plugin] filename` from the settings file. A missing file reads as empty.
pub fn read_saved_plugin(path: &Path) -> Result<String, BootstrapError> {
    if !path.exists() {
        return Ok(String::new());
    }

    let settings = Ini::load_from_file(path).map_err(|source| BootstrapError::Settings {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(settings
        .get_from(Some(PLUGIN_SECTION), PLUGIN_FILENAME_KEY)
        .unwrap_or_default()
        .to_string())
}

/// Like `read_saved_plugin`, but an unreadable file is logged and treated as empty.
pub fn saved_plugin_path(path: &Path) -> String {
    match read_saved_plugin(path) {
        Ok(plugin) => {
            debug!(settings = %path.display(), plugin = %plugin, "loaded saved plugin path");
            plugin
        }
        Err(err) => {
            warn!(error = %err, "ignoring unreadable settings file");
            String::new()
        }
    }
}

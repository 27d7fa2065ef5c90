use std::path::PathBuf;

use serde::Deserialize;

/// settings as they appear in a config file, every field optional so files
/// can be layered
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    pub api_url: Option<String>,
    pub token_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub page_limit: Option<u32>,
}

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub object_store: Option<ObjectStoreConfig>,
    pub summarizer: Option<SummarizerConfig>,
    pub ocr: Option<OcrConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectStoreConfig {
    /// Pre-authenticated base URL documents are fetched from.
    pub base_url: Option<String>,
    /// Bearer token sent with each fetch.
    pub token: Option<String>,
    /// Local directory to read documents from instead of HTTP.
    pub root: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizerConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language code (e.g. "eng").
    pub language: Option<String>,
}

/// Platform config directory path: `<config_dir>/docbrief/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("docbrief").join("config.toml"))
}

/// Load config by cascading CWD `.docbrief.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".docbrief.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        object_store: Some(ObjectStoreConfig {
            base_url: overlay
                .object_store
                .as_ref()
                .and_then(|s| s.base_url.clone())
                .or_else(|| base.object_store.as_ref().and_then(|s| s.base_url.clone())),
            token: overlay
                .object_store
                .as_ref()
                .and_then(|s| s.token.clone())
                .or_else(|| base.object_store.as_ref().and_then(|s| s.token.clone())),
            root: overlay
                .object_store
                .as_ref()
                .and_then(|s| s.root.clone())
                .or_else(|| base.object_store.as_ref().and_then(|s| s.root.clone())),
        }),
        summarizer: Some(SummarizerConfig {
            endpoint: overlay
                .summarizer
                .as_ref()
                .and_then(|s| s.endpoint.clone())
                .or_else(|| base.summarizer.as_ref().and_then(|s| s.endpoint.clone())),
            api_key: overlay
                .summarizer
                .as_ref()
                .and_then(|s| s.api_key.clone())
                .or_else(|| base.summarizer.as_ref().and_then(|s| s.api_key.clone())),
            model: overlay
                .summarizer
                .as_ref()
                .and_then(|s| s.model.clone())
                .or_else(|| base.summarizer.as_ref().and_then(|s| s.model.clone())),
            max_tokens: overlay
                .summarizer
                .as_ref()
                .and_then(|s| s.max_tokens)
                .or_else(|| base.summarizer.as_ref().and_then(|s| s.max_tokens)),
            system_prompt: overlay
                .summarizer
                .as_ref()
                .and_then(|s| s.system_prompt.clone())
                .or_else(|| {
                    base.summarizer
                        .as_ref()
                        .and_then(|s| s.system_prompt.clone())
                }),
        }),
        ocr: Some(OcrConfig {
            language: overlay
                .ocr
                .as_ref()
                .and_then(|o| o.language.clone())
                .or_else(|| base.ocr.as_ref().and_then(|o| o.language.clone())),
        }),
    }
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))?;
    Ok(path)
}

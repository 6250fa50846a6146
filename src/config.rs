use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Default cap on matched documents per query and matches per document.
    #[serde(default = "default_max_results")]
    pub max_results: i64,
    /// Default number of context characters on each side of a match.
    #[serde(default = "default_context_length")]
    pub context_length: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            context_length: default_context_length(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}
fn default_max_results() -> i64 {
    10
}
fn default_context_length() -> i64 {
    200
}

/// Load configuration from a TOML file.
///
/// A missing file yields the default configuration — the service holds no
/// database paths or credentials, so every setting has a usable default.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.search.max_results < 1 {
        anyhow::bail!("search.max_results must be >= 1");
    }

    if config.search.context_length < 0 {
        anyhow::bail!("search.context_length must be >= 0");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/cor.toml")).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:7341");
        assert_eq!(config.search.max_results, 10);
        assert_eq!(config.search.context_length, 200);
    }

    #[test]
    fn test_empty_sections_use_field_defaults() {
        let config: Config = toml::from_str("[server]\n[search]\nmax_results = 5\n").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:7341");
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.search.context_length, 200);
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tessera_engine::dom::HtmlOptions;

pub const DEFAULT_CONFIG_NAME: &str = "tessera.config.json";

/// Tessera configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Pretty print rendered HTML
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Indentation used when pretty printing
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Log level used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Rounds per benchmark suite
    #[serde(default = "default_bench_iterations")]
    pub bench_iterations: u32,

    /// Where rendered forms post their data
    #[serde(default = "default_submit_path")]
    pub submit_path: String,
}

fn default_pretty() -> bool {
    true
}

fn default_indent() -> String {
    "  ".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bench_iterations() -> u32 {
    1000
}

fn default_submit_path() -> String {
    "/transactions/create/".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn html_options(&self) -> HtmlOptions {
        HtmlOptions {
            pretty: self.pretty,
            indent: self.indent.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
            indent: default_indent(),
            log_level: default_log_level(),
            bench_iterations: default_bench_iterations(),
            submit_path: default_submit_path(),
        }
    }
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Where to look for the YAML config when `PALISADE_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "palisade.yaml";

fn default_listen_addr() -> String {
    std::env::var("LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".to_string())
}

fn default_docroot() -> PathBuf {
    PathBuf::from(".")
}

fn default_recv_timeout_secs() -> u64 {
    3
}

/// Logical page overrides, all relative to the docroot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pages {
    /// Served for "/" (default: index.html).
    #[serde(default)]
    pub index: Option<String>,
    /// Body for 400 responses.
    #[serde(rename = "400", default)]
    pub bad_request: Option<String>,
    /// Body for 404 responses.
    #[serde(rename = "404", default)]
    pub not_found: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_docroot")]
    pub docroot: PathBuf,
    #[serde(default)]
    pub pages: Pages,
    /// Cap on simultaneously active sessions; unlimited when unset.
    #[serde(default)]
    pub max_connections: Option<usize>,
    #[serde(default = "default_recv_timeout_secs")]
    pub recv_timeout_secs: u64,
    /// Fire-and-forget workers, abandoned on shutdown instead of joined.
    #[serde(default)]
    pub daemon_workers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            docroot: default_docroot(),
            pages: Pages::default(),
            max_connections: None,
            recv_timeout_secs: default_recv_timeout_secs(),
            daemon_workers: false,
        }
    }
}

impl Config {
    /// Loads the YAML config named by `PALISADE_CONFIG` (default
    /// `palisade.yaml`). A missing file falls back to defaults, where
    /// `LISTEN` overrides the listen address.
    pub fn load() -> anyhow::Result<Self> {
        let path =
            std::env::var("PALISADE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                serde_yaml::from_str(&text).with_context(|| format!("invalid config: {}", path))
            }
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_secs(self.recv_timeout_secs)
    }
}

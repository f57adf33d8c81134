use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DIST_DIR: &str = "../dist";
const DEFAULT_ASSETS_DIR: &str = "../assets";

/// Where to listen and what to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub host: String,
    pub port: u16,
    /// Trunk output: `index.html` plus the wasm bundle.
    pub dist_dir: PathBuf,
    /// Static files, including the `cake/` model directory.
    pub assets_dir: PathBuf,
}

impl SiteConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("SITE_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("SITE_PORT must be a port number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: lookup("SITE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
            dist_dir: lookup("SITE_DIST_DIR")
                .unwrap_or_else(|| DEFAULT_DIST_DIR.to_owned())
                .into(),
            assets_dir: lookup("SITE_ASSETS_DIR")
                .unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_owned())
                .into(),
        })
    }

    pub fn index_file(&self) -> PathBuf {
        self.dist_dir.join("index.html")
    }

    pub fn cake_dir(&self) -> PathBuf {
        self.assets_dir.join("cake")
    }
}

//! TOML configuration with environment overrides.
//!
//! Every field has a default, so a missing config file falls back to
//! [`Config::minimal`]. After the file is read, `PORT` and
//! `APP_EDIT_PASSWORD` override the listen port and the write secret.
//!
//! ```toml
//! [catalog]
//! path = "backend/datos/maillots.json"
//!
//! [ingest]
//! source_dir = "fuente_imagenes"
//! public_images_dir = "public/images"
//! image_url_prefix = "/images"
//! image_globs = ["*.jpg", "*.jpeg", "*.png", "*.webp", "*.gif"]
//!
//! [server]
//! host = "0.0.0.0"
//! port = 3001
//!
//! [auth]
//! edit_password = "ritmicacenter"
//!
//! [browse]
//! page_size = 20
//! sample_size = 6
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const PORT_ENV: &str = "PORT";
pub const PASSWORD_ENV: &str = "APP_EDIT_PASSWORD";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub browse: BrowseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("backend/datos/maillots.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    #[serde(default = "default_public_images_dir")]
    pub public_images_dir: PathBuf,
    #[serde(default = "default_image_url_prefix")]
    pub image_url_prefix: String,
    #[serde(default = "default_image_globs")]
    pub image_globs: Vec<String>,
    #[serde(default = "default_follow_symlinks")]
    pub follow_symlinks: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            public_images_dir: default_public_images_dir(),
            image_url_prefix: default_image_url_prefix(),
            image_globs: default_image_globs(),
            follow_symlinks: default_follow_symlinks(),
        }
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("fuente_imagenes")
}
fn default_public_images_dir() -> PathBuf {
    PathBuf::from("public/images")
}
fn default_image_url_prefix() -> String {
    "/images".to_string()
}
fn default_image_globs() -> Vec<String> {
    ["*.jpg", "*.jpeg", "*.png", "*.webp", "*.gif"]
        .iter()
        .map(|g| g.to_string())
        .collect()
}
fn default_follow_symlinks() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3001
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_edit_password")]
    pub edit_password: String,
    /// Hex SHA-256 of the secret. Takes precedence over `edit_password`.
    #[serde(default)]
    pub edit_password_sha256: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            edit_password: default_edit_password(),
            edit_password_sha256: None,
        }
    }
}

fn default_edit_password() -> String {
    "ritmicacenter".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowseConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sample_size: default_sample_size(),
        }
    }
}

fn default_page_size() -> usize {
    20
}
fn default_sample_size() -> usize {
    6
}

impl Config {
    /// Hardcoded defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }
}

/// Read `path` (or fall back to defaults), apply process environment
/// overrides and validate.
pub fn load_config(path: &Path) -> Result<Config> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Like [`load_config`], with an explicit environment lookup.
pub fn load_config_with_env<F>(path: &Path, env: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| "Failed to parse config file")?
    } else {
        tracing::info!(path = %path.display(), "no config file, using defaults");
        Config::minimal()
    };

    apply_env_overrides(&mut config, env)?;
    validate(&config)?;
    Ok(config)
}

fn apply_env_overrides<F>(config: &mut Config, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = env(PORT_ENV) {
        config.server.port = port
            .trim()
            .parse()
            .with_context(|| format!("{} must be a port number, got '{}'", PORT_ENV, port))?;
    }
    if let Some(password) = env(PASSWORD_ENV) {
        config.auth.edit_password = password;
        config.auth.edit_password_sha256 = None;
    }
    Ok(())
}

fn validate(config: &Config) -> Result<()> {
    if config.browse.page_size == 0 {
        bail!("browse.page_size must be >= 1");
    }

    if config.ingest.image_globs.is_empty() {
        bail!("ingest.image_globs must not be empty");
    }

    match &config.auth.edit_password_sha256 {
        Some(digest) => {
            if digest.len() != 64 || hex::decode(digest).is_err() {
                bail!("auth.edit_password_sha256 must be 64 hex characters");
            }
        }
        None => {
            if config.auth.edit_password.is_empty() {
                bail!("auth.edit_password must not be empty");
            }
        }
    }

    Ok(())
}

//! spacetravelling: a blog front-end backed by the Prismic headless CMS
//!
//! This crate fetches posts from a Prismic repository and shapes them into
//! page data for a paginated home page and per-post pages, resolves CMS
//! preview tokens, and serves all of it over HTTP.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod preview;
pub mod prismic;
pub mod server;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

/// The main application
#[derive(Clone)]
pub struct Spacetravelling {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Spacetravelling {
    /// Create an instance from a directory, reading `_config.yml` and the environment
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config)?)
    }

    /// Create an instance from an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Result<Self> {
        config.validate()?;

        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
        })
    }

    /// A fresh client for the configured repository, serving published content
    pub fn client(&self) -> Result<prismic::PrismicClient> {
        let options = prismic::ClientOptions::new(None, self.config.access_token.as_deref());
        prismic::create_client(self.config.endpoint()?, options)
    }

    /// Generate static page data
    pub async fn generate(&self) -> anyhow::Result<usize> {
        let client = self.client()?;
        commands::generate::run(self, &client).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("_config.yml"),
            "api_endpoint: https://blog.cdn.prismic.io/api/v2\npublic_dir: out\npage_size: 3\n",
        )
        .unwrap();

        let app = Spacetravelling::new(dir.path()).unwrap();
        assert_eq!(app.config.page_size, 3);
        assert_eq!(app.public_dir, dir.path().join("out"));
        assert!(app.client().is_ok());
    }

    #[test]
    fn test_with_config_requires_endpoint() {
        let err = Spacetravelling::with_config(".", config::SiteConfig::default()).err();
        assert!(matches!(err, Some(Error::Config(_))));
    }
}

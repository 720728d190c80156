//! Site configuration (_config.yml + environment)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Error;

/// Environment variable holding the Prismic API endpoint
pub const API_ENDPOINT_ENV: &str = "PRISMIC_API_ENDPOINT";

/// Environment variable holding the Prismic access token
pub const ACCESS_TOKEN_ENV: &str = "PRISMIC_ACCESS_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub timezone: String,

    // CMS
    pub api_endpoint: Option<String>,
    pub access_token: Option<String>,

    // Listing
    pub page_size: u32,

    // Post
    pub words_per_minute: usize,

    // Preview
    pub preview_cookie: String,
    /// Mark the preview cookie `Secure`; turn off only for plain-HTTP development
    pub secure_cookie: bool,

    // Directory
    pub public_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetravelling.".to_string(),
            timezone: "America/Sao_Paulo".to_string(),

            api_endpoint: None,
            access_token: None,

            page_size: 1,

            words_per_minute: 200,

            preview_cookie: "spacetravelling_preview".to_string(),
            secure_cookie: true,

            public_dir: "public".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Override CMS settings from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(API_ENDPOINT_ENV).ok(),
            std::env::var(ACCESS_TOKEN_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, endpoint: Option<String>, token: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.is_empty()) {
            tracing::debug!("Using CMS endpoint from {}", API_ENDPOINT_ENV);
            self.api_endpoint = Some(endpoint);
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.access_token = Some(token);
        }
    }

    /// The configured CMS endpoint; a missing one is a startup misconfiguration
    pub fn endpoint(&self) -> Result<&str, Error> {
        self.api_endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                Error::Config(format!(
                    "no CMS endpoint configured (set api_endpoint or {})",
                    API_ENDPOINT_ENV
                ))
            })
    }

    /// Parse the configured timezone
    pub fn tz(&self) -> Result<chrono_tz::Tz, Error> {
        self.timezone
            .parse()
            .map_err(|_| Error::Config(format!("unknown timezone: {}", self.timezone)))
    }

    /// Validate settings that every CMS call depends on
    pub fn validate(&self) -> Result<(), Error> {
        let endpoint = self.endpoint()?;
        url::Url::parse(endpoint)?;
        self.tz()?;
        if self.page_size == 0 {
            return Err(Error::Config("page_size must be at least 1".to_string()));
        }
        if self.words_per_minute == 0 {
            return Err(Error::Config(
                "words_per_minute must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

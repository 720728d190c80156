//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Spacetravelling;

/// Remove generated page data
pub fn run(app: &Spacetravelling) -> Result<()> {
    if app.public_dir.exists() {
        fs::remove_dir_all(&app.public_dir)?;
        tracing::info!("Deleted: {:?}", app.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_clean_removes_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            api_endpoint: Some("https://blog.cdn.prismic.io/api/v2".to_string()),
            ..SiteConfig::default()
        };
        let app = Spacetravelling::with_config(dir.path(), config).unwrap();
        fs::create_dir_all(app.public_dir.join("post")).unwrap();
        fs::write(app.public_dir.join("index.json"), "{}").unwrap();

        run(&app).unwrap();
        assert!(!app.public_dir.exists());

        // Cleaning twice is fine
        run(&app).unwrap();
    }
}

//! Generate static page data

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::content::{self, HomePage};
use crate::prismic::ContentSource;
use crate::Spacetravelling;

/// Write `index.json` and one `post/<uid>.json` per prebuilt post; returns the post count
pub async fn run(app: &Spacetravelling, source: &dyn ContentSource) -> Result<usize> {
    let start = std::time::Instant::now();
    let config = &app.config;

    let pagination = content::fetch_posts(source, config.page_size, None).await?;
    let paths = pagination.uids();
    let home = HomePage {
        pagination,
        preview: false,
    };
    write_json(&app.public_dir.join("index.json"), &home).await?;

    tracing::info!("Prebuilding {} posts", paths.len());

    let post_dir = app.public_dir.join("post");
    for slug in &paths {
        let page =
            content::build_post_page(source, slug, None, config.words_per_minute).await?;
        write_json(&post_dir.join(format!("{}.json", slug)), &page).await?;
        tracing::debug!("Generated post/{}.json", slug);
    }

    tracing::info!(
        "Generated {} files in {:?}",
        paths.len() + 1,
        start.elapsed()
    );
    Ok(paths.len())
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("failed to write {:?}", path))?;
    Ok(())
}

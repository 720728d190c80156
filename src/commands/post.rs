//! Show a single post

use anyhow::Result;

use crate::content;
use crate::helpers::Helpers;
use crate::prismic::ContentSource;
use crate::Spacetravelling;

/// Print a post header, its outline and its neighbours
pub async fn run(app: &Spacetravelling, source: &dyn ContentSource, slug: &str) -> Result<()> {
    let helpers = Helpers::new(&app.config)?;
    let page =
        content::build_post_page(source, slug, None, app.config.words_per_minute).await?;
    let post = &page.post;

    println!("{}", post.title());
    println!(
        "  {} | {} | {}",
        helpers.short_date(post.summary.first_publication_date.as_ref()),
        post.summary.author,
        helpers.reading_time(page.reading_time)
    );
    if post.was_edited() {
        println!(
            "  * editado em {}",
            helpers.long_date(post.last_publication_date.as_ref())
        );
    }
    for block in &post.content {
        println!("  - {} ({} paragraphs)", block.heading, block.body.len());
    }
    if let Some(previous) = &page.adjacent.previous {
        println!("  Previous: {} [{}]", previous.title, previous.uid);
    }
    if let Some(next) = &page.adjacent.next {
        println!("  Next: {} [{}]", next.title, next.uid);
    }

    Ok(())
}

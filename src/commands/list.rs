//! List posts

use anyhow::Result;

use crate::content::{self, PostListing};
use crate::helpers::Helpers;
use crate::prismic::ContentSource;
use crate::Spacetravelling;

/// Print the first page of posts, or every page when `all` is set
pub async fn run(app: &Spacetravelling, source: &dyn ContentSource, all: bool) -> Result<()> {
    let helpers = Helpers::new(&app.config)?;
    let listing = collect(app, source, all).await?;

    println!("Posts ({}):", listing.posts().len());
    for post in listing.posts() {
        println!(
            "  {} - {} [{}] by {}",
            helpers.short_date(post.first_publication_date.as_ref()),
            post.title,
            post.uid,
            post.author
        );
    }
    if listing.has_more() {
        println!("More posts available (use --all to load them)");
    }

    Ok(())
}

async fn collect(app: &Spacetravelling, source: &dyn ContentSource, all: bool) -> Result<PostListing> {
    let first = content::fetch_posts(source, app.config.page_size, None).await?;
    let mut listing = PostListing::new(first)?;
    if all {
        while listing.load_more(source).await? {}
    }
    Ok(listing)
}

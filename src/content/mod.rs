//! Content module - post view models and the listing/detail assemblers

pub mod detail;
pub mod listing;
mod post;

pub use detail::{
    build_post_page, count_words, fetch_post, reading_time, resolve_adjacent, AdjacentPostRef,
    AdjacentPosts, PostPage, WORDS_PER_MINUTE,
};
pub use listing::{
    fetch_posts, load_more, static_paths, HomePage, PaginationCursor, PostListing, PostsPage, POST_FIELDS,
};
pub use post::{ContentBlock, Paragraph, PostDetail, PostSummary, POST_TYPE};

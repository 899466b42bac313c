//! Post collection storage.
//!
//! Posts live in two places under the project root:
//!
//! | Path | Content |
//! |------|---------|
//! | `data/posts.json` | JSON array of post metadata, in display order |
//! | `data/posts/<slug>.md` | raw markdown body, no front-matter |
//!
//! The JSON array order is the display and generation order. New posts are
//! prepended; edits replace the entry matched by its previous slug.

mod store;
mod types;

pub use store::{Placement, PostStore};
pub use types::Post;

//! The library code for the `gazette` static blog builder. The architecture
//! can be generally broken down into two distinct steps:
//!
//! 1. Loading posts from source files on disk ([`crate::post`])
//! 2. Converting the posts into output files on disk ([`crate::build`])
//!
//! A source file is YAML front-matter between `---` fences followed by a
//! Markdown body. Loading a file either produces a [`crate::post::Post`] --
//! title, display date, tags, slug, excerpt, and rendered body -- or a skip
//! signal for documents not marked `published`. The build step then renders
//! one HTML page per post plus a single index page listing every post
//! newest-first alongside a tag tally, and writes the results under the
//! output directory.
//!
//! Page rendering goes through two fixed layouts ([`crate::templates`])
//! bound by [`crate::write::Writer`]. Everything runs in one pass on one
//! thread; a build is a short-lived batch process with no state carried
//! between runs.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod excerpt;
pub mod markdown;
pub mod post;
pub mod tag;
pub mod templates;
pub mod write;

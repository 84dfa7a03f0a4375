//! Exports the [`build_site`] function which stitches together the
//! high-level steps of building the output site: loading the posts
//! ([`crate::post`]), rendering post and index pages
//! ([`crate::write`]), and writing the results under the output directory.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::config::Config;
use crate::post::{Error as LoadError, Loaded, Loader};
use crate::tag;
use crate::templates::{self, Error as TemplateError};
use crate::write::{Error as RenderError, Writer};

/// The subdirectory of the output root holding post pages.
pub const POSTS_SUBDIRECTORY: &str = "posts";

const MARKDOWN_EXTENSION: &str = ".md";

/// What a build produced: the number of posts written and every output
/// path, in the order written.
pub struct BuildReport {
    pub posts_written: usize,
    pub outputs: Vec<PathBuf>,
}

/// Builds the site from a [`Config`] object in one pass: scan the source
/// directory, load each document, write a page per published post, then
/// write the index. Progress goes to stdout, one line per output file plus
/// one line per skipped document.
///
/// `build_date` is substituted for posts with no `date` field; the caller
/// reads the clock exactly once so a build is deterministic for tests.
///
/// There are no rollback semantics: output from an aborted run is left in
/// place.
pub fn build_site(config: &Config, build_date: NaiveDate) -> Result<BuildReport> {
    println!("Building blog...");

    let posts_output_directory = config.output_dir.join(POSTS_SUBDIRECTORY);
    fs::create_dir_all(&posts_output_directory)?;

    // A missing source directory is a first run, not an error: seed the
    // directory and report an empty site.
    if !config.posts_dir.exists() {
        fs::create_dir_all(&config.posts_dir)?;
        println!(
            "No posts found. Add .md files to {}.",
            config.posts_dir.display()
        );
        return Ok(BuildReport {
            posts_written: 0,
            outputs: Vec::new(),
        });
    }

    let layouts = templates::load(config)?;
    let writer = Writer {
        site: &config.title,
        post_template: &layouts.post,
        index_template: &layouts.index,
    };
    let loader = Loader::new(build_date, config.excerpt_length);

    let mut posts = Vec::new();
    let mut outputs = Vec::new();
    for file_name in source_files(&config.posts_dir)? {
        match loader.load(&config.posts_dir.join(&file_name))? {
            Loaded::Unpublished => {
                println!("Skipping unpublished: {}", file_name);
            }
            Loaded::Published(post) => {
                let output = posts_output_directory.join(format!("{}.html", post.slug));
                fs::write(&output, writer.render_post(&post)?)?;
                println!("Generated: {}", output.display());
                outputs.push(output);
                posts.push(post);
            }
        }
    }

    let index_output = config.output_dir.join("index.html");
    fs::write(&index_output, writer.render_index(&posts, &tag::tally(&posts))?)?;
    println!("Generated: {}", index_output.display());
    outputs.push(index_output);

    Ok(BuildReport {
        posts_written: posts.len(),
        outputs,
    })
}

// Scans `dir` for source file names, sorted descending. File names govern
// the index order: date-prefixed names (`2025-01-10-title.md`) list newest
// first.
fn source_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for result in fs::read_dir(dir)? {
        let entry = result?;
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        if file_name.ends_with(MARKDOWN_EXTENSION) {
            names.push(file_name.into_owned());
        }
    }
    names.sort_by(|a, b| b.cmp(a));
    tracing::debug!("found {} source files", names.len());
    Ok(names)
}

/// The result type for building a site.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during loading posts,
/// resolving templates, rendering pages, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading posts.
    Load(LoadError),

    /// Returned for errors resolving or parsing the page layouts.
    Template(TemplateError),

    /// Returned for errors rendering pages.
    Render(RenderError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Load(err) => err.fmt(f),
            Error::Template(err) => err.fmt(f),
            Error::Render(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Load(err) => Some(err),
            Error::Template(err) => Some(err),
            Error::Render(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<LoadError> for Error {
    /// Converts [`LoadError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: LoadError) -> Error {
        Error::Load(err)
    }
}

impl From<TemplateError> for Error {
    /// Converts [`TemplateError`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: TemplateError) -> Error {
        Error::Template(err)
    }
}

impl From<RenderError> for Error {
    /// Converts [`RenderError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: RenderError) -> Error {
        Error::Render(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

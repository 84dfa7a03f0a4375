//! Defines the [`Post`], [`Loader`], and [`Error`] types, along with the
//! logic for loading posts from source files into memory. A source file is
//! YAML front-matter between `---` fences followed by a Markdown body;
//! loading produces either a fully-assembled [`Post`] or
//! [`Loaded::Unpublished`] for documents not marked `published`.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use gtmpl::Value;
use serde::Deserialize;

use crate::excerpt;
use crate::markdown;

/// One published post, assembled from a single source file. Immutable after
/// loading; consumed by both the post-page and index renderers and dropped
/// at the end of the run.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// The post title, defaulting to the source file's stem.
    pub title: String,

    /// The display date, e.g. `March 05, 2025`. Front-matter dates that
    /// aren't structured date values pass through as written.
    pub date: String,

    /// The post's tags in front-matter order.
    pub tags: Vec<String>,

    /// The URL-safe output file stem, derived from the source file's stem.
    pub slug: String,

    /// The plain-text preview shown on the index page.
    pub excerpt: String,

    /// The body rendered to an HTML fragment.
    pub body: String,
}

impl From<&Post> for Value {
    /// Converts a [`Post`] into a template [`Value`]. The same object serves
    /// both layouts: the post page binds `title`/`date`/`tags`/`content`,
    /// the index's repeated block binds `title`/`date`/`tags`/`slug`/
    /// `excerpt`.
    fn from(p: &Post) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), (&p.title).into());
        m.insert("date".to_owned(), (&p.date).into());
        m.insert("slug".to_owned(), (&p.slug).into());
        m.insert("excerpt".to_owned(), (&p.excerpt).into());
        m.insert("content".to_owned(), (&p.body).into());
        m.insert(
            "tags".to_owned(),
            Value::Array(p.tags.iter().map(|t| t.into()).collect()),
        );
        Value::Object(m)
    }
}

/// The result of loading one source document: a post, or a skip signal for
/// documents not marked `published`.
pub enum Loaded {
    Published(Post),
    Unpublished,
}

/// Loads [`Post`] objects from source files.
pub struct Loader {
    /// The date substituted for posts with no `date` field. Read once by the
    /// caller and injected here so repeated builds in tests are
    /// deterministic.
    build_date: NaiveDate,

    /// The excerpt budget, in `char`s.
    excerpt_length: usize,
}

impl Loader {
    /// Constructs a new loader. See fields on [`Loader`] for argument
    /// descriptions.
    pub fn new(build_date: NaiveDate, excerpt_length: usize) -> Loader {
        Loader {
            build_date,
            excerpt_length,
        }
    }

    /// Loads a single source file. Read or parse failures are fatal and
    /// carry the offending path.
    pub fn load(&self, path: &Path) -> Result<Loaded> {
        match self.load_file(path) {
            Ok(loaded) => Ok(loaded),
            Err(e) => Err(Error::Annotated(
                format!("loading post `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn load_file(&self, path: &Path) -> Result<Loaded> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::InvalidFileName(path.to_owned()))?;

        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        self.from_str(stem, &contents)
    }

    /// Loads a post from its source file's `stem` (file name less the
    /// extension) and `input` contents. A source file must be structured as
    /// follows:
    ///
    /// 1. Initial front-matter fence (`---`)
    /// 2. YAML front-matter with field `published` and optionally `title`,
    ///    `date`, and `tags`
    /// 3. Terminal front-matter fence (`---`)
    /// 4. Markdown body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// published: true
    /// title: Hello, world!
    /// date: 2025-01-10
    /// tags: [greet]
    /// ---
    /// Hello world.
    /// ```
    pub fn from_str(&self, stem: &str, input: &str) -> Result<Loaded> {
        fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
            const FENCE: &str = "---";
            if !input.starts_with(FENCE) {
                return Err(Error::FrontmatterMissingStartFence);
            }
            match input[FENCE.len()..].find(FENCE) {
                None => Err(Error::FrontmatterMissingEndFence),
                Some(offset) => Ok((
                    FENCE.len(),                        // yaml_start
                    FENCE.len() + offset,               // yaml_stop
                    FENCE.len() + offset + FENCE.len(), // body_start
                )),
            }
        }

        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let frontmatter: Frontmatter = serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

        if !frontmatter.published {
            return Ok(Loaded::Unpublished);
        }

        let date = match frontmatter.date {
            Some(date) => display_date(&date),
            None => {
                tracing::warn!("`{}` has no date; using the build date", stem);
                self.build_date.format(DISPLAY_DATE_FORMAT).to_string()
            }
        };

        let body = &input[body_start..];
        Ok(Loaded::Published(Post {
            title: frontmatter.title.unwrap_or_else(|| stem.to_owned()),
            date,
            tags: frontmatter.tags,
            slug: slug::slugify(stem),
            excerpt: excerpt::extract(body, self.excerpt_length),
            body: markdown::to_html(body),
        }))
    }
}

#[derive(Deserialize)]
struct Frontmatter {
    /// Whether the post should be built at all. Anything unpublished is
    /// skipped, not errored.
    #[serde(default)]
    published: bool,

    /// The title of the post.
    #[serde(default)]
    title: Option<String>,

    /// The date of the post. YAML date scalars arrive here as their literal
    /// text.
    #[serde(default)]
    date: Option<String>,

    /// The tags associated with the post, in front-matter order.
    #[serde(default)]
    tags: Vec<String>,
}

const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

// Structured date values render as e.g. `March 05, 2025`; anything else
// passes through as written.
fn display_date(date: &str) -> String {
    for format in &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(date, format) {
            return datetime.format(DISPLAY_DATE_FORMAT).to_string();
        }
    }
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(day) => day.format(DISPLAY_DATE_FORMAT).to_string(),
        Err(_) => date.to_owned(),
    }
}

/// Represents the result of a [`Post`]-load operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting front-matter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source file is missing its terminal front-matter
    /// fence (`---` i.e., the starting fence was found but the ending one
    /// was missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the front-matter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when a source file's name isn't valid UTF-8.
    InvalidFileName(PathBuf),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::InvalidFileName(path) => {
                write!(f, "invalid file name: {:?}", path)
            }
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::InvalidFileName(_) => None,
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn loader() -> Loader {
        Loader::new(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            excerpt::DEFAULT_LENGTH,
        )
    }

    fn published(loaded: Loaded) -> Post {
        match loaded {
            Loaded::Published(post) => post,
            Loaded::Unpublished => panic!("expected a published post"),
        }
    }

    #[test]
    fn test_load_published_post() -> Result<()> {
        let input = "---\n\
                     published: true\n\
                     title: Hello\n\
                     date: 2025-03-05\n\
                     tags: [intro, rust]\n\
                     ---\n\
                     Hello world.\n\n\
                     More text.\n";
        let post = published(loader().from_str("2025-03-05-hello", input)?);

        assert_eq!("Hello", post.title);
        assert_eq!("March 05, 2025", post.date);
        assert_eq!(vec!["intro", "rust"], post.tags);
        assert_eq!("2025-03-05-hello", post.slug);
        assert_eq!("Hello world.", post.excerpt);
        assert!(post.body.contains("<p>Hello world.</p>"));
        assert!(post.body.contains("<p>More text.</p>"));
        Ok(())
    }

    #[test]
    fn test_unpublished_is_skipped() -> Result<()> {
        let input = "---\npublished: false\ntitle: Draft\n---\nBody\n";
        assert!(matches!(
            loader().from_str("draft", input)?,
            Loaded::Unpublished
        ));
        Ok(())
    }

    #[test]
    fn test_missing_published_field_is_skipped() -> Result<()> {
        let input = "---\ntitle: Draft\n---\nBody\n";
        assert!(matches!(
            loader().from_str("draft", input)?,
            Loaded::Unpublished
        ));
        Ok(())
    }

    #[test]
    fn test_title_defaults_to_stem() -> Result<()> {
        let input = "---\npublished: true\ndate: 2025-01-10\n---\nBody\n";
        let post = published(loader().from_str("2025-01-10-untitled", input)?);
        assert_eq!("2025-01-10-untitled", post.title);
        Ok(())
    }

    #[test]
    fn test_missing_date_uses_build_date() -> Result<()> {
        let input = "---\npublished: true\n---\nBody\n";
        let post = published(loader().from_str("undated", input)?);
        assert_eq!("June 01, 2025", post.date);
        Ok(())
    }

    #[test]
    fn test_datetime_value_is_formatted() -> Result<()> {
        let input = "---\npublished: true\ndate: 2025-03-05 08:30:00\n---\nBody\n";
        let post = published(loader().from_str("p", input)?);
        assert_eq!("March 05, 2025", post.date);
        Ok(())
    }

    #[test]
    fn test_unstructured_date_passes_through() -> Result<()> {
        let input = "---\npublished: true\ndate: Spring 2025\n---\nBody\n";
        let post = published(loader().from_str("p", input)?);
        assert_eq!("Spring 2025", post.date);
        Ok(())
    }

    #[test]
    fn test_missing_start_fence() {
        let result = loader().from_str("p", "published: true\n---\nBody\n");
        assert!(matches!(result, Err(Error::FrontmatterMissingStartFence)));
    }

    #[test]
    fn test_missing_end_fence() {
        let result = loader().from_str("p", "---\npublished: true\nBody\n");
        assert!(matches!(result, Err(Error::FrontmatterMissingEndFence)));
    }

    #[test]
    fn test_slug_is_normalized() -> Result<()> {
        let input = "---\npublished: true\n---\nBody\n";
        let post = published(loader().from_str("My First Post!", input)?);
        assert_eq!("my-first-post", post.slug);
        Ok(())
    }

    #[test]
    fn test_slug_collapses_separator_runs() -> Result<()> {
        let input = "---\npublished: true\n---\nBody\n";
        let post = published(loader().from_str("  Hello -- World  ", input)?);
        assert_eq!("hello-world", post.slug);
        Ok(())
    }

    #[test]
    fn test_date_prefixed_stem_passes_through() -> Result<()> {
        let input = "---\npublished: true\n---\nBody\n";
        let post = published(loader().from_str("2025-01-10-hello", input)?);
        assert_eq!("2025-01-10-hello", post.slug);
        Ok(())
    }
}

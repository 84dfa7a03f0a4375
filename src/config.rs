//! Project configuration. Everything is optional: a project is any
//! directory, with an optional `gazette.yaml` overriding the defaults.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::excerpt;

/// The optional project file looked up in the project directory.
pub const PROJECT_FILE: &str = "gazette.yaml";

/// Build configuration. Deserialized from [`PROJECT_FILE`] when present;
/// every field has a default so the file may be absent entirely.
#[derive(Deserialize)]
pub struct Config {
    /// The site name bound into both layouts.
    #[serde(default = "default_title")]
    pub title: String,

    /// The directory of Markdown source documents.
    #[serde(default = "default_posts_dir")]
    pub posts_dir: PathBuf,

    /// The output root. Post pages land in a `posts/` subdirectory beneath
    /// it.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// The excerpt budget, in `char`s.
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,

    /// Optional replacement for the embedded post layout.
    #[serde(default)]
    pub post_template: Option<PathBuf>,

    /// Optional replacement for the embedded index layout.
    #[serde(default)]
    pub index_template: Option<PathBuf>,
}

fn default_title() -> String {
    String::from("Blog")
}

fn default_posts_dir() -> PathBuf {
    PathBuf::from("_posts")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("blog")
}

fn default_excerpt_length() -> usize {
    excerpt::DEFAULT_LENGTH
}

impl Default for Config {
    fn default() -> Config {
        Config {
            title: default_title(),
            posts_dir: default_posts_dir(),
            output_dir: default_output_dir(),
            excerpt_length: default_excerpt_length(),
            post_template: None,
            index_template: None,
        }
    }
}

impl Config {
    /// Loads the configuration for the project in `dir`: the parsed
    /// [`PROJECT_FILE`] when one exists, the defaults otherwise. Relative
    /// paths in the configuration are anchored at `dir`.
    pub fn load(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        let config = if path.is_file() {
            let file = File::open(&path).map_err(|err| Error::Open {
                path: path.clone(),
                err,
            })?;
            serde_yaml::from_reader(file)?
        } else {
            Config::default()
        };
        Ok(config.anchored(dir))
    }

    // Path::join leaves absolute configured paths untouched.
    fn anchored(self, dir: &Path) -> Config {
        Config {
            title: self.title,
            posts_dir: dir.join(self.posts_dir),
            output_dir: dir.join(self.output_dir),
            excerpt_length: self.excerpt_length,
            post_template: self.post_template.map(|p| dir.join(p)),
            index_template: self.index_template.map(|p| dir.join(p)),
        }
    }
}

/// Represents the result of loading a configuration.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading a configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening the project file.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing the project file as YAML.
    Deserialize(serde_yaml::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Open { path, err } => {
                write!(f, "Opening project file '{}': {}", path.display(), err)
            }
            Error::Deserialize(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { path: _, err } => Some(err),
            Error::Deserialize(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts [`serde_yaml::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator when deserializing the project file.
    fn from(err: serde_yaml::Error) -> Error {
        Error::Deserialize(err)
    }
}

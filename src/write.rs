//! Responsible for binding [`Post`] records into the page layouts. The
//! renderers are pure functions over their inputs; the build orchestrator
//! owns the file writes.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use gtmpl::{Context, Template, Value};

use crate::post::Post;
use crate::tag;

/// Binds post records and the tag tally into the two layouts.
pub struct Writer<'a> {
    /// The site name bound into both layouts.
    pub site: &'a str,

    /// The layout for post pages.
    pub post_template: &'a Template,

    /// The layout for the index page.
    pub index_template: &'a Template,
}

impl Writer<'_> {
    /// Renders one post's standalone HTML document. The body fragment is
    /// bound unescaped; see [`crate::templates`] for the trust boundary.
    pub fn render_post(&self, post: &Post) -> Result<String> {
        let mut value = Value::from(post);
        if let Value::Object(obj) = &mut value {
            obj.insert("site".to_owned(), Value::String(self.site.to_owned()));
        }
        self.render(self.post_template, value)
    }

    /// Renders the index document: every post's summary block in the given
    /// order plus the tag sidebar in sorted tag order. An empty `posts`
    /// slice renders the layout's "no posts yet" placeholder.
    pub fn render_index(
        &self,
        posts: &[Post],
        tally: &BTreeMap<String, usize>,
    ) -> Result<String> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("site".to_owned(), Value::String(self.site.to_owned()));
        m.insert(
            "posts".to_owned(),
            Value::Array(posts.iter().map(Value::from).collect()),
        );
        m.insert(
            "tags".to_owned(),
            Value::Array(tag::to_counts(tally).into_iter().map(Value::from).collect()),
        );
        self.render(self.index_template, Value::Object(m))
    }

    fn render(&self, template: &Template, value: Value) -> Result<String> {
        let mut rendered = Vec::new();
        template.execute(&mut rendered, &Context::from(value).unwrap())?;
        Ok(String::from_utf8(rendered)?)
    }
}

/// The result of a fallible page-rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-rendering operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// Returned when a template renders something that isn't UTF-8.
    Utf8(std::string::FromUtf8Error),
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`].
    /// This allows us to use the `?` operator for fallible template
    /// operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    /// Converts a [`std::string::FromUtf8Error`] into an [`Error`]. This
    /// allows us to use the `?` operator when recovering rendered text.
    fn from(err: std::string::FromUtf8Error) -> Error {
        Error::Utf8(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Utf8(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Utf8(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tag::tally;
    use crate::templates;

    fn post(title: &str, tags: &[&str]) -> Post {
        Post {
            title: title.to_owned(),
            date: String::from("March 05, 2025"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            slug: slug::slugify(title),
            excerpt: format!("{} excerpt", title),
            body: format!("<p>{} body</p>", title),
        }
    }

    fn writer<'a>(layouts: &'a templates::Layouts) -> Writer<'a> {
        Writer {
            site: "Test Blog",
            post_template: &layouts.post,
            index_template: &layouts.index,
        }
    }

    fn layouts() -> templates::Layouts {
        templates::load(&crate::config::Config::default()).unwrap()
    }

    #[test]
    fn test_render_post_binds_metadata() -> Result<()> {
        let layouts = layouts();
        let html = writer(&layouts).render_post(&post("Hello", &["intro"]))?;
        assert!(html.contains("Hello"));
        assert!(html.contains("March 05, 2025"));
        assert!(html.contains("intro"));
        assert!(html.contains("<p>Hello body</p>"));
        assert!(html.contains("Test Blog"));
        Ok(())
    }

    #[test]
    fn test_render_index_lists_posts_in_order() -> Result<()> {
        let layouts = layouts();
        let posts = vec![post("Second", &["rust"]), post("First", &["rust", "intro"])];
        let html = writer(&layouts).render_index(&posts, &tally(&posts))?;

        let second = html.find("Second").unwrap();
        let first = html.find("First").unwrap();
        assert!(second < first);
        assert!(html.contains("posts/second.html"));
        assert!(html.contains("Second excerpt"));
        assert!(!html.contains("No blog posts yet."));
        Ok(())
    }

    #[test]
    fn test_render_index_tag_tally() -> Result<()> {
        let layouts = layouts();
        let posts = vec![post("Second", &["rust"]), post("First", &["rust", "intro"])];
        let html = writer(&layouts).render_index(&posts, &tally(&posts))?;
        assert!(html.contains("rust (2)"));
        assert!(html.contains("intro (1)"));
        Ok(())
    }

    #[test]
    fn test_render_index_empty_state() -> Result<()> {
        let layouts = layouts();
        let html = writer(&layouts).render_index(&[], &BTreeMap::new())?;
        assert!(html.contains("No blog posts yet."));
        assert!(!html.contains("<article"));
        Ok(())
    }
}

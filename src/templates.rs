//! The two page layouts and the logic for parsing them. Both layouts ship
//! embedded in the binary so a project needs no theme files at all; either
//! can be replaced through the project configuration.
//!
//! Post body HTML is bound into the layouts unescaped. That is safe only
//! because the body is the output of our own Markdown renderer over
//! author-controlled sources -- never end-user input. Keep it that way; do
//! not route untrusted text through these templates.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use gtmpl::Template;

use crate::config::Config;

/// The embedded post-page layout. Bindings: `site`, `title`, `date`, `tags`
/// (sequence of strings), and `content` (trusted HTML fragment).
pub const POST_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{.title}} | {{.site}}</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&family=JetBrains+Mono:wght@400;500;700&display=swap" rel="stylesheet">
    <style>
        body { font-family: 'Inter', sans-serif; }
        .font-mono { font-family: 'JetBrains Mono', monospace; }
        .prose { max-width: 65ch; }
        .prose h1 { font-family: 'JetBrains Mono', monospace; font-size: 2.25rem; font-weight: bold; margin-top: 2rem; margin-bottom: 1rem; }
        .prose h2 { font-family: 'JetBrains Mono', monospace; font-size: 1.875rem; font-weight: bold; margin-top: 2rem; margin-bottom: 1rem; }
        .prose h3 { font-family: 'JetBrains Mono', monospace; font-size: 1.5rem; font-weight: bold; margin-top: 1.5rem; margin-bottom: 0.75rem; }
        .prose p { margin-bottom: 1rem; line-height: 1.75; color: #374151; }
        .prose pre { background-color: #1f2937; color: #f3f4f6; padding: 1rem; border-radius: 0.5rem; overflow-x: auto; margin-bottom: 1rem; }
        .prose code { background-color: #f3f4f6; padding: 0.125rem 0.25rem; border-radius: 0.25rem; font-size: 0.875rem; }
        .prose pre code { background-color: transparent; padding: 0; }
        .prose ul { list-style-type: disc; margin-left: 1.5rem; margin-bottom: 1rem; }
        .prose ol { list-style-type: decimal; margin-left: 1.5rem; margin-bottom: 1rem; }
        .prose li { margin-bottom: 0.5rem; }
        .prose a { color: #3b82f6; text-decoration: underline; }
        .prose table { border-collapse: collapse; margin-bottom: 1rem; }
        .prose th, .prose td { border: 1px solid #d1d5db; padding: 0.5rem 0.75rem; }
        .prose blockquote { border-left: 4px solid #3b82f6; padding-left: 1rem; color: #6b7280; margin-bottom: 1rem; }
    </style>
</head>
<body class="bg-white">
    <header class="fixed top-0 left-0 right-0 bg-white z-50 border-b border-gray-100">
        <div class="container mx-auto px-4 py-6 flex justify-between items-center">
            <a href="../index.html" class="text-xl font-mono font-bold">{{.site}}</a>
        </div>
    </header>

    <div class="h-20"></div>

    <article class="container mx-auto px-4 py-12">
        <div class="max-w-4xl mx-auto">
            <div class="mb-8">
                <a href="../index.html" class="text-blue-600 hover:underline text-sm">&larr; Back to {{.site}}</a>
            </div>

            <h1 class="font-mono text-4xl font-bold mb-4">{{.title}}</h1>
            <div class="text-gray-500 mb-6">{{.date}}</div>

            <div class="flex gap-2 mb-8">
                {{range .tags}}
                <span class="bg-blue-100 text-blue-600 px-3 py-1 rounded-full text-sm">{{.}}</span>
                {{end}}
            </div>

            <div class="prose">
                {{.content}}
            </div>

            <div class="mt-12 pt-8 border-t border-gray-200">
                <a href="../index.html" class="text-blue-600 hover:underline">&larr; Back to {{.site}}</a>
            </div>
        </div>
    </article>

    <footer class="py-8 border-t mt-16">
        <div class="container mx-auto px-4 text-sm text-gray-600">
            <span class="font-mono font-bold">{{.site}}</span>
        </div>
    </footer>
</body>
</html>
"#;

/// The embedded index layout. Bindings: `site`, `posts` (sequence of post
/// objects with `title`/`date`/`tags`/`slug`/`excerpt`), and `tags`
/// (sequence of name/count pairs, sorted by name). An empty `posts`
/// sequence renders the placeholder arm instead of the list.
pub const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{.site}}</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&family=JetBrains+Mono:wght@400;500;700&display=swap" rel="stylesheet">
    <style>
        body { font-family: 'Inter', sans-serif; }
        .font-mono { font-family: 'JetBrains Mono', monospace; }
    </style>
</head>
<body class="bg-white">
    <header class="fixed top-0 left-0 right-0 bg-white z-50 border-b border-gray-100">
        <div class="container mx-auto px-4 py-6 flex justify-between items-center">
            <a href="index.html" class="text-xl font-mono font-bold">{{.site}}</a>
        </div>
    </header>

    <div class="h-20"></div>

    <div class="container mx-auto px-4 py-12">
        <div class="max-w-7xl mx-auto">
            <h1 class="font-mono text-4xl font-bold mb-12">{{.site}}</h1>

            <div class="flex gap-8">
                <div class="flex-grow">
                    {{range .posts}}
                    <article class="mb-8 pb-8 border-b border-gray-200">
                        <h2 class="font-mono text-2xl font-bold mb-2">
                            <a href="posts/{{.slug}}.html" class="text-gray-900 hover:text-blue-600">
                                {{.title}}
                            </a>
                        </h2>
                        <div class="text-sm text-gray-500 mb-4">{{.date}}</div>
                        <div class="flex gap-2 mb-4">
                            {{range .tags}}
                            <span class="bg-blue-100 text-blue-600 px-3 py-1 rounded-full text-sm">{{.}}</span>
                            {{end}}
                        </div>
                        <p class="text-gray-600">{{.excerpt}}</p>
                        <a href="posts/{{.slug}}.html" class="text-blue-600 hover:underline text-sm mt-2 inline-block">
                            Read more &rarr;
                        </a>
                    </article>
                    {{else}}
                    <p class="text-gray-600">No blog posts yet.</p>
                    {{end}}
                </div>

                <aside class="w-64 flex-shrink-0">
                    <div class="bg-gray-50 p-6 rounded-lg sticky top-24">
                        <h3 class="font-mono text-lg font-bold mb-4">Tags</h3>
                        <div class="flex flex-wrap gap-2">
                            {{range .tags}}
                            <span class="bg-white border border-gray-200 px-3 py-1 rounded-full text-sm">
                                {{.name}} ({{.count}})
                            </span>
                            {{end}}
                        </div>
                    </div>
                </aside>
            </div>
        </div>
    </div>

    <footer class="py-8 border-t mt-16">
        <div class="container mx-auto px-4 text-sm text-gray-600">
            <span class="font-mono font-bold">{{.site}}</span>
        </div>
    </footer>
</body>
</html>
"#;

/// The two parsed layouts a build renders with.
pub struct Layouts {
    pub post: Template,
    pub index: Template,
}

/// Resolves and parses both layouts for a project: the configured override
/// files where present, the embedded defaults otherwise.
pub fn load(config: &Config) -> Result<Layouts> {
    Ok(Layouts {
        post: parse(&source(&config.post_template, POST_TEMPLATE)?)?,
        index: parse(&source(&config.index_template, INDEX_TEMPLATE)?)?,
    })
}

/// Parses a single template source.
pub fn parse(source: &str) -> Result<Template> {
    let mut template = Template::default();
    template.parse(source).map_err(Error::ParseTemplate)?;
    Ok(template)
}

// Loads the override file's contents, or falls back to the embedded layout.
fn source(path: &Option<PathBuf>, fallback: &str) -> Result<String> {
    match path {
        None => Ok(fallback.to_owned()),
        Some(path) => {
            let mut contents = String::new();
            File::open(path)
                .map_err(|err| Error::OpenTemplateFile {
                    path: path.to_owned(),
                    err,
                })?
                .read_to_string(&mut contents)?;
            Ok(contents)
        }
    }
}

/// Represents the result of resolving and parsing templates.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for resolving and parsing templates.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening template override files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator while reading template files.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_embedded_layouts_parse() -> Result<()> {
        parse(POST_TEMPLATE)?;
        parse(INDEX_TEMPLATE)?;
        Ok(())
    }

    #[test]
    fn test_load_with_override() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post.html");
        std::fs::write(&path, "<html>{{.title}}</html>").unwrap();

        let mut config = Config::default();
        config.post_template = Some(path);
        load(&config)?;
        Ok(())
    }

    #[test]
    fn test_missing_override_file() {
        let mut config = Config::default();
        config.post_template = Some(PathBuf::from("/does/not/exist.html"));
        assert!(matches!(
            load(&config),
            Err(Error::OpenTemplateFile { path: _, err: _ })
        ));
    }
}

//! Markdown-to-HTML conversion for post bodies, delegating to
//! [`pulldown_cmark`].

use pulldown_cmark::{html, Event, Options, Parser};

/// Converts a Markdown post body into an HTML fragment. Tables,
/// strikethrough, and task lists are enabled on top of the CommonMark core
/// (fenced code blocks are part of the core and keep their `language-*`
/// class for styling). Markdown rendering is permissive: malformed input
/// renders best-effort, so this never fails.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut body = String::new();
    html::push_html(&mut body, Parser::new_ext(markdown, options).map(hard_break));
    body
}

// Post bodies treat a single newline as a visible line break, so soft
// breaks are promoted to hard breaks before rendering.
fn hard_break(event: Event) -> Event {
    match event {
        Event::SoftBreak => Event::HardBreak,
        _ => event,
    }
}

use pulldown_cmark::{Options, Parser, html};

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

/// Create a `pulldown-cmark` parser with our default options enabled.
///
/// The preview widget and the HTML export share this so both agree on
/// which extensions are active.
pub fn parser(source: &str) -> Parser<'_> {
    Parser::new_ext(source, options())
}

/// Render markdown to an HTML fragment.
///
/// Pure: no state is kept between calls. This is the exact text written by
/// "Save as HTML".
#[must_use]
pub fn to_html(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + source.len() / 2);
    html::push_html(&mut out, parser(source));
    out
}

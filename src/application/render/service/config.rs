use std::collections::{HashMap, HashSet};

use ammonia::Builder as AmmoniaBuilder;
use comrak::options::Options;

const POST_TAGS: [&str; 19] = [
    "a",
    "b",
    "blockquote",
    "br",
    "code",
    "em",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "i",
    "li",
    "ol",
    "p",
    "pre",
    "strong",
    "ul",
];

pub(crate) fn default_options() -> Options<'static> {
    let mut options = Options::default();
    configure_extensions(&mut options);
    options
}

/// Allow-list sanitizer for post bodies. Only links carry attributes, and only
/// `href` and `title`. Disallowed tags are dropped while their text survives;
/// `script` and `style` lose their contents as well.
pub(crate) fn build_post_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    builder.tags(HashSet::from(POST_TAGS));
    builder.generic_attributes(HashSet::new());
    builder.generic_attribute_prefixes(HashSet::new());
    builder.tag_attributes(HashMap::from([("a", HashSet::from(["href", "title"]))]));
    builder.url_schemes(HashSet::from(["http", "https", "mailto"]));
    builder.link_rel(None);
    builder.strip_comments(true);

    builder
}

fn configure_extensions(options: &mut Options<'static>) {
    let ext = &mut options.extension;
    ext.autolink = true;
    ext.tagfilter = false;

    // Raw HTML is emitted as-is; the sanitizer decides what survives.
    let render = &mut options.render;
    render.r#unsafe = true;
    render.sourcepos = false;
}

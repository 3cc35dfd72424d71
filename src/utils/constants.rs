//! Shared allow-list defaults and element tables for html_bleach
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.
//! Everything here is immutable; callers customise behaviour through
//! [`CleanOptions`](crate::CleanOptions), never by touching these tables.

/// Tags allowed by default when sanitizing
///
/// Covers inline formatting, lists, quotations and links. Anything absent is
/// escaped (or stripped, depending on the `strip` option).
pub const ALLOWED_TAGS: &[&str] = &[
    "a",
    "abbr",
    "acronym",
    "b",
    "blockquote",
    "code",
    "em",
    "i",
    "li",
    "ol",
    "strong",
    "ul",
];

/// Attributes allowed by default, keyed by tag name
pub const ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "title"]),
    ("abbr", &["title"]),
    ("acronym", &["title"]),
];

/// CSS properties allowed by default inside `style` attributes
///
/// Empty: a `style` attribute that survives the attribute allow-list is
/// reduced to `style=""` unless the caller opts properties in.
pub const ALLOWED_STYLES: &[&str] = &[];

/// Document skeleton tags that are always allowed in document mode
///
/// Callers extend the tag list rather than redefining the skeleton, so
/// `tags = ["p"]` still yields `<html><head></head><body><p>…</p></body></html>`.
pub const ALLOWED_BASE_FULL_DOCUMENT_TAGS: &[&str] = &["html", "head", "body"];

/// Pseudo tag name some configurations allow-list; accepted and ignored
pub const DOCTYPE_TAG: &str = "DOCTYPE";

/// Attribute key that applies an attribute list to every tag
pub const WILDCARD_TAG: &str = "*";

/// Maximum HTML input size to prevent memory exhaustion (10 MB)
///
/// - Wikipedia largest articles: ~2-3 MB
/// - Typical user-generated content: well under 100 KB
pub const MAX_HTML_SIZE: usize = 10 * 1024 * 1024;

/// Maximum element nesting depth kept by the parse adapter
///
/// Filter, linkifier and serializer all recurse over the tree, so the parse
/// adapter truncates anything deeper than this with a warning. 99.9% of
/// real pages stay under 20 levels; single-page apps reach 30-50.
pub const MAX_NESTING_DEPTH: usize = 100;

/// Elements that never have content or an end tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// HTML elements whose text content is serialized without escaping
pub const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe",
    "noembed",
    "noframes",
    "noscript",
    "plaintext",
    "script",
    "style",
    "xmp",
];

/// HTML elements whose content is text with character references only
pub const RCDATA_ELEMENTS: &[&str] = &["textarea", "title"];

/// Elements whose direct text children the tree builder moves in front of
/// the enclosing table
pub const TABLE_CONTEXT_ELEMENTS: &[&str] = &["colgroup", "table", "tbody", "tfoot", "thead", "tr"];

/// Children a table context keeps in place; anything else is moved in front
/// of the table
pub const TABLE_CONTENT_ELEMENTS: &[&str] = &[
    "caption", "col", "colgroup", "script", "style", "tbody", "td", "template", "tfoot", "th",
    "thead", "tr",
];

/// Elements whose text the linkifier must never rewrite
///
/// Raw text and RCDATA content cannot hold child elements, and text inside
/// an anchor is already a link.
pub const LINKIFY_SKIP_ELEMENTS: &[&str] = &[
    "a",
    "iframe",
    "noembed",
    "noframes",
    "noscript",
    "plaintext",
    "script",
    "style",
    "textarea",
    "title",
    "xmp",
];

/// Disallowed elements whose content is dropped along with the tag when stripping
pub const STRIP_CONTENT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements where the parser swallows one leading newline
pub const LEADING_NEWLINE_ELEMENTS: &[&str] = &["listing", "pre", "textarea"];

/// Returns `true` when `tag` (lowercase) is a void element
#[inline]
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

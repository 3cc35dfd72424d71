//! Core option types for sanitizing and linkifying
//!
//! These are plain values: build them with struct update syntax, the
//! builders in [`super::builder`], or deserialize them from JSON. They are
//! validated when a call starts, never while the tree is being processed.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::utils::{ALLOWED_ATTRIBUTES, ALLOWED_STYLES, ALLOWED_TAGS, MAX_HTML_SIZE};

/// Attribute allow-list, either for every tag or keyed by tag name
///
/// In JSON a list deserializes to [`AllowedAttributes::Global`] and an
/// object to [`AllowedAttributes::PerTag`]; any other shape is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllowedAttributes {
    /// Attribute names allowed on every tag
    Global(Vec<String>),
    /// Tag name (or `"*"` for every tag) to attribute names
    PerTag(BTreeMap<String, Vec<String>>),
}

impl AllowedAttributes {
    /// Same attribute names for every tag
    pub fn global<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AllowedAttributes::Global(names.into_iter().map(Into::into).collect())
    }

    /// Attribute names keyed by tag; use `"*"` as the tag for a wildcard entry
    pub fn per_tag<I, T, A, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, A)>,
        T: Into<String>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (tag, names) in entries {
            map.entry(tag.into())
                .or_default()
                .extend(names.into_iter().map(Into::into));
        }
        AllowedAttributes::PerTag(map)
    }
}

impl Default for AllowedAttributes {
    fn default() -> Self {
        AllowedAttributes::per_tag(
            ALLOWED_ATTRIBUTES
                .iter()
                .map(|(tag, names)| (*tag, names.iter().copied())),
        )
    }
}

/// Options for [`clean`](crate::clean)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanOptions {
    /// Allowed tag names (case-insensitive)
    pub tags: Vec<String>,
    /// Allowed attribute names
    pub attributes: AllowedAttributes,
    /// Allowed CSS properties inside surviving `style` attributes
    pub styles: Vec<String>,
    /// Remove disallowed tags instead of escaping them
    pub strip: bool,
    pub strip_comments: bool,
    /// Force `rel="nofollow"` on every `<a href>`
    pub nofollow: bool,
    /// Parse as a body fragment rather than a full document
    pub parse_as_fragment: bool,
    /// Inputs longer than this many bytes are rejected; `None` disables the check
    pub max_input_bytes: Option<usize>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            tags: ALLOWED_TAGS.iter().map(|t| (*t).to_string()).collect(),
            attributes: AllowedAttributes::default(),
            styles: ALLOWED_STYLES.iter().map(|s| (*s).to_string()).collect(),
            strip: false,
            strip_comments: true,
            nofollow: false,
            parse_as_fragment: true,
            max_input_bytes: Some(MAX_HTML_SIZE),
        }
    }
}

/// String transform applied to linkified hrefs or link text
#[derive(Clone)]
pub struct TextCallback(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl TextCallback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn apply(&self, input: &str) -> String {
        (self.0)(input)
    }
}

impl fmt::Debug for TextCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TextCallback(..)")
    }
}

/// Options for [`linkify`](crate::linkify)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkifyOptions {
    /// Force `rel="nofollow"` on every `<a href>`, new or existing
    pub nofollow: bool,
    pub parse_as_fragment: bool,
    /// Leave text inside `<pre>` alone
    pub skip_pre: bool,
    /// Also link bare e-mail addresses as `mailto:`
    pub parse_email: bool,
    /// Replacement for the default URL grammar
    pub url_pattern: Option<String>,
    pub max_input_bytes: Option<usize>,
    /// Transform applied to the href of each new link
    #[serde(skip)]
    pub filter_url: Option<TextCallback>,
    /// Transform applied to the text of each new link
    #[serde(skip)]
    pub filter_text: Option<TextCallback>,
}

impl Default for LinkifyOptions {
    fn default() -> Self {
        Self {
            nofollow: true,
            parse_as_fragment: true,
            skip_pre: false,
            parse_email: false,
            url_pattern: None,
            max_input_bytes: Some(MAX_HTML_SIZE),
            filter_url: None,
            filter_text: None,
        }
    }
}

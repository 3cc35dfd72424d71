//! Resolved allow-list policy.
//!
//! A [`Policy`] is the validated, lowercase, set-based form of
//! [`CleanOptions`]. It is immutable once built and cheap to share across
//! threads; the tree filter only ever asks it yes/no questions.

use std::collections::{HashMap, HashSet};

use crate::config::{AllowedAttributes, CleanOptions};
use crate::dom::ParseMode;
use crate::errors::{SanitizeError, SanitizeResult};
use crate::utils::{ALLOWED_BASE_FULL_DOCUMENT_TAGS, DOCTYPE_TAG, WILDCARD_TAG};

/// Immutable allow-list configuration for one or more `clean` calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    allowed_tags: HashSet<String>,
    wildcard_attributes: HashSet<String>,
    tag_attributes: HashMap<String, HashSet<String>>,
    allowed_styles: HashSet<String>,
    strip_comments: bool,
    strip_disallowed: bool,
    add_nofollow: bool,
    is_fragment: bool,
    max_input_bytes: Option<usize>,
}

impl Policy {
    /// Validate `options` and build the lookup sets
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a tag, attribute or style name in
    /// the allow-lists could never match real markup (empty, whitespace,
    /// markup delimiters).
    pub fn resolve(options: &CleanOptions) -> SanitizeResult<Self> {
        let mut allowed_tags = HashSet::with_capacity(options.tags.len());
        for tag in &options.tags {
            if tag.eq_ignore_ascii_case(DOCTYPE_TAG) {
                // Doctype handling lives in the parse adapter
                continue;
            }
            if !is_valid_markup_name(tag) {
                return Err(SanitizeError::InvalidTagName(tag.clone()));
            }
            allowed_tags.insert(tag.to_ascii_lowercase());
        }
        if !options.parse_as_fragment {
            allowed_tags.extend(
                ALLOWED_BASE_FULL_DOCUMENT_TAGS
                    .iter()
                    .map(|tag| (*tag).to_string()),
            );
        }

        let mut wildcard_attributes = HashSet::new();
        let mut tag_attributes: HashMap<String, HashSet<String>> = HashMap::new();
        match &options.attributes {
            AllowedAttributes::Global(names) => {
                wildcard_attributes = resolve_attribute_names(WILDCARD_TAG, names)?;
            }
            AllowedAttributes::PerTag(map) => {
                for (tag, names) in map {
                    let resolved = resolve_attribute_names(tag, names)?;
                    if tag == WILDCARD_TAG {
                        wildcard_attributes.extend(resolved);
                    } else if is_valid_markup_name(tag) {
                        tag_attributes
                            .entry(tag.to_ascii_lowercase())
                            .or_default()
                            .extend(resolved);
                    } else {
                        return Err(SanitizeError::InvalidTagName(tag.clone()));
                    }
                }
            }
        }

        let mut allowed_styles = HashSet::with_capacity(options.styles.len());
        for property in &options.styles {
            if property.is_empty()
                || !property
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
            {
                return Err(SanitizeError::InvalidStyleProperty(property.clone()));
            }
            allowed_styles.insert(property.to_ascii_lowercase());
        }

        Ok(Self {
            allowed_tags,
            wildcard_attributes,
            tag_attributes,
            allowed_styles,
            strip_comments: options.strip_comments,
            strip_disallowed: options.strip,
            add_nofollow: options.nofollow,
            is_fragment: options.parse_as_fragment,
            max_input_bytes: options.max_input_bytes,
        })
    }

    /// Is the lowercase tag name allowed?
    #[must_use]
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.allowed_tags.contains(tag)
    }

    /// Is the lowercase attribute allowed on the lowercase tag?
    ///
    /// Wildcard entries apply to every tag and are additive with the
    /// tag-specific entries.
    #[must_use]
    pub fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        self.wildcard_attributes.contains(attribute)
            || self
                .tag_attributes
                .get(tag)
                .is_some_and(|names| names.contains(attribute))
    }

    /// Is the lowercase CSS property allowed?
    #[must_use]
    pub fn allows_style(&self, property: &str) -> bool {
        self.allowed_styles.contains(property)
    }

    #[must_use]
    pub fn strip_comments(&self) -> bool {
        self.strip_comments
    }

    /// `true`: disallowed tags are removed; `false`: escaped to text
    #[must_use]
    pub fn strip_disallowed(&self) -> bool {
        self.strip_disallowed
    }

    #[must_use]
    pub fn add_nofollow(&self) -> bool {
        self.add_nofollow
    }

    #[must_use]
    pub fn is_fragment(&self) -> bool {
        self.is_fragment
    }

    #[must_use]
    pub fn parse_mode(&self) -> ParseMode {
        ParseMode::from_fragment_flag(self.is_fragment)
    }

    #[must_use]
    pub fn max_input_bytes(&self) -> Option<usize> {
        self.max_input_bytes
    }
}

fn resolve_attribute_names(tag: &str, names: &[String]) -> SanitizeResult<HashSet<String>> {
    names
        .iter()
        .map(|name| {
            if is_valid_markup_name(name) {
                Ok(name.to_ascii_lowercase())
            } else {
                Err(SanitizeError::InvalidAttributeName {
                    tag: tag.to_string(),
                    name: name.clone(),
                })
            }
        })
        .collect()
}

/// A tag or attribute name that the HTML tokenizer could actually produce
/// and that is safe to echo back into markup
pub(crate) fn is_valid_markup_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace()
                || c.is_control()
                || matches!(c, '<' | '>' | '/' | '=' | '"' | '\'' | '`' | '*')
        })
}

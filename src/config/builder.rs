//! Fluent builders for [`CleanOptions`] and [`LinkifyOptions`]
//!
//! `build()` validates the result the same way a `clean`/`linkify` call
//! would, so misconfiguration surfaces where the options are assembled.

use super::types::{AllowedAttributes, CleanOptions, LinkifyOptions, TextCallback};
use crate::errors::SanitizeResult;
use crate::linkify::UrlMatcher;
use crate::policy::Policy;

#[derive(Debug, Clone, Default)]
pub struct CleanOptionsBuilder {
    options: CleanOptions,
}

impl CleanOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the allowed tag list
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Append to the allowed tag list
    #[must_use]
    pub fn extend_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn attributes(mut self, attributes: AllowedAttributes) -> Self {
        self.options.attributes = attributes;
        self
    }

    #[must_use]
    pub fn styles<I, S>(mut self, styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.styles = styles.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn strip(mut self, strip: bool) -> Self {
        self.options.strip = strip;
        self
    }

    #[must_use]
    pub fn strip_comments(mut self, strip_comments: bool) -> Self {
        self.options.strip_comments = strip_comments;
        self
    }

    #[must_use]
    pub fn nofollow(mut self, nofollow: bool) -> Self {
        self.options.nofollow = nofollow;
        self
    }

    #[must_use]
    pub fn parse_as_fragment(mut self, parse_as_fragment: bool) -> Self {
        self.options.parse_as_fragment = parse_as_fragment;
        self
    }

    #[must_use]
    pub fn max_input_bytes(mut self, limit: Option<usize>) -> Self {
        self.options.max_input_bytes = limit;
        self
    }

    /// Validate and return the options
    ///
    /// # Errors
    ///
    /// Returns the configuration error [`Policy::resolve`] would raise.
    pub fn build(self) -> SanitizeResult<CleanOptions> {
        Policy::resolve(&self.options)?;
        Ok(self.options)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinkifyOptionsBuilder {
    options: LinkifyOptions,
}

impl LinkifyOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn nofollow(mut self, nofollow: bool) -> Self {
        self.options.nofollow = nofollow;
        self
    }

    #[must_use]
    pub fn parse_as_fragment(mut self, parse_as_fragment: bool) -> Self {
        self.options.parse_as_fragment = parse_as_fragment;
        self
    }

    #[must_use]
    pub fn skip_pre(mut self, skip_pre: bool) -> Self {
        self.options.skip_pre = skip_pre;
        self
    }

    #[must_use]
    pub fn parse_email(mut self, parse_email: bool) -> Self {
        self.options.parse_email = parse_email;
        self
    }

    #[must_use]
    pub fn url_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.options.url_pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn max_input_bytes(mut self, limit: Option<usize>) -> Self {
        self.options.max_input_bytes = limit;
        self
    }

    #[must_use]
    pub fn filter_url<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.options.filter_url = Some(TextCallback::new(f));
        self
    }

    #[must_use]
    pub fn filter_text<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.options.filter_text = Some(TextCallback::new(f));
        self
    }

    /// Validate and return the options
    ///
    /// # Errors
    ///
    /// Returns [`SanitizeError::InvalidUrlPattern`](crate::SanitizeError::InvalidUrlPattern)
    /// when the custom URL pattern does not compile.
    pub fn build(self) -> SanitizeResult<LinkifyOptions> {
        UrlMatcher::from_options(&self.options)?;
        Ok(self.options)
    }
}

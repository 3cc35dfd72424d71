//! URL and e-mail detection inside text runs.
//!
//! Candidates come from a replaceable regex, then get their trailing
//! sentence punctuation trimmed. Byte offsets always land on `char`
//! boundaries because every trimmed character is ASCII.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::LinkifyOptions;
use crate::errors::SanitizeResult;

// ============================================================================
// Regex Patterns for Link Detection
// ============================================================================

/// Scheme-prefixed or bare `www.` runs, up to whitespace or markup-ish punctuation
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:(?:https?|ftps?)://|www\.)[^\s<>"'{}|\\^\[\]`]+"#)
        .expect("URL_RE: hardcoded regex is valid")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@(?:[a-z0-9-]+\.)+[a-z]{2,}\b")
        .expect("EMAIL_RE: hardcoded regex is valid")
});

/// A match that trimmed down to nothing but its prefix
static BARE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[a-z][a-z0-9+.-]*://|www\.)?$")
        .expect("BARE_PREFIX_RE: hardcoded regex is valid")
});

static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[a-z][a-z0-9+.-]*://|mailto:)")
        .expect("SCHEME_RE: hardcoded regex is valid")
});

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', '\'', '"'];

/// One link found in a text run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch<'a> {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// The matched substring, used verbatim as link text
    pub text: &'a str,
    /// Normalized link target
    pub href: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Kind {
    Url,
    Email,
}

/// Compiled link grammar for one `linkify` call
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    url: Regex,
    email: Option<Regex>,
}

impl Default for UrlMatcher {
    fn default() -> Self {
        Self {
            url: URL_RE.clone(),
            email: None,
        }
    }
}

impl UrlMatcher {
    /// Build the matcher described by `options`
    ///
    /// # Errors
    ///
    /// Returns [`SanitizeError::InvalidUrlPattern`](crate::SanitizeError::InvalidUrlPattern)
    /// when `options.url_pattern` does not compile.
    pub fn from_options(options: &LinkifyOptions) -> SanitizeResult<Self> {
        let url = match &options.url_pattern {
            Some(pattern) => Regex::new(pattern)?,
            None => URL_RE.clone(),
        };
        let email = options.parse_email.then(|| EMAIL_RE.clone());
        Ok(Self { url, email })
    }

    /// Non-overlapping links in `text`, ascending by start
    ///
    /// When a URL and an e-mail address start at the same offset the URL
    /// wins; otherwise the earlier candidate wins.
    #[must_use]
    pub fn find_matches<'a>(&self, text: &'a str) -> Vec<LinkMatch<'a>> {
        let mut candidates: Vec<(usize, Kind, usize)> = Vec::new();

        for m in self.url.find_iter(text) {
            let trimmed = trim_url(m.as_str());
            if BARE_PREFIX_RE.is_match(trimmed) {
                continue;
            }
            candidates.push((m.start(), Kind::Url, m.start() + trimmed.len()));
        }
        if let Some(email) = &self.email {
            for m in email.find_iter(text) {
                candidates.push((m.start(), Kind::Email, m.end()));
            }
        }
        candidates.sort_unstable();

        let mut matches = Vec::with_capacity(candidates.len());
        let mut cursor = 0;
        for (start, kind, end) in candidates {
            if start < cursor {
                continue;
            }
            let matched = &text[start..end];
            let href = match kind {
                Kind::Url => normalize_href(matched),
                Kind::Email => format!("mailto:{matched}"),
            };
            matches.push(LinkMatch {
                start,
                end,
                text: matched,
                href,
            });
            cursor = end;
        }
        matches
    }
}

/// Drop trailing sentence punctuation and unbalanced closing parentheses
fn trim_url(candidate: &str) -> &str {
    let opening = candidate.matches('(').count();
    let mut closing = candidate.matches(')').count();
    let mut url = candidate;
    loop {
        if let Some(shorter) = url.strip_suffix(TRAILING_PUNCTUATION) {
            url = shorter;
        } else if closing > opening && url.ends_with(')') {
            url = &url[..url.len() - 1];
            closing -= 1;
        } else {
            return url;
        }
    }
}

/// Prepend `http://` to scheme-less links such as `www.example.com`
#[must_use]
pub fn normalize_href(url: &str) -> String {
    if SCHEME_RE.is_match(url) {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

//! Tag text recovered from the input.
//!
//! The tree builder keeps no record of how a tag was written, so the text
//! that escaping puts back comes from a scan of the input. Start tags are
//! handed to elements by name in document order and end tags by name in
//! closing order. Elements the tree builder invents find no tag.

use std::collections::{HashMap, VecDeque};
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::utils::{RAW_TEXT_ELEMENTS, RCDATA_ELEMENTS};

/// Comments, bogus comments and doctypes are matched only to be skipped
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<!---?>|<!--.*?(?:--!?>|\z)|<[!?][^>]*>?|</[^a-zA-Z][^>]*>?|<(/?)([a-zA-Z][^\t\n\x0C\r />]*)(?:[^>"']|"[^"]*"|'[^']*')*>"#,
    )
    .expect("TOKEN_RE: hardcoded regex is valid")
});

/// A start tag as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StartTag<'a> {
    /// Byte offset of the `<`
    pub offset: usize,
    pub markup: &'a str,
    /// Written as `<name/>`
    pub self_closing: bool,
}

/// Unclaimed tags of the input, queued per lowercase tag name
#[derive(Debug, Default)]
pub(crate) struct SourceTags<'a> {
    html: &'a str,
    starts: HashMap<String, VecDeque<Range<usize>>>,
    ends: HashMap<String, VecDeque<Range<usize>>>,
}

impl<'a> SourceTags<'a> {
    /// Collect the tags of `html`, skipping comments and raw text content
    pub(crate) fn scan(html: &'a str) -> Self {
        let mut tags = Self {
            html,
            ..Self::default()
        };
        let lower = html.to_ascii_lowercase();
        let mut pos = 0;

        while let Some(caps) = TOKEN_RE.captures_at(html, pos) {
            let Some(whole) = caps.get(0) else { break };
            pos = whole.end();
            let Some(name) = caps.get(2) else { continue };

            let name = name.as_str().to_ascii_lowercase();
            let is_end = caps.get(1).is_some_and(|slash| !slash.is_empty());
            if is_end {
                tags.ends.entry(name).or_default().push_back(whole.range());
                continue;
            }

            if name == "plaintext" {
                pos = html.len();
            } else if RAW_TEXT_ELEMENTS.contains(&name.as_str())
                || RCDATA_ELEMENTS.contains(&name.as_str())
            {
                // Content runs to the matching end tag, which the next match picks up
                pos = lower[pos..]
                    .find(&format!("</{name}"))
                    .map_or(html.len(), |found| pos + found);
            }
            tags.starts.entry(name).or_default().push_back(whole.range());
        }
        tags
    }

    /// Take the next start tag named `name`
    pub(crate) fn claim_start(&mut self, name: &str) -> Option<StartTag<'a>> {
        let range = self.starts.get_mut(name)?.pop_front()?;
        let markup = &self.html[range.clone()];
        Some(StartTag {
            offset: range.start,
            markup,
            self_closing: markup.ends_with("/>"),
        })
    }

    /// Take the first end tag named `name` written after byte `offset`
    ///
    /// End tags written before `offset` can no longer close anything and are
    /// discarded.
    pub(crate) fn claim_end(&mut self, name: &str, offset: usize) -> Option<&'a str> {
        let queue = self.ends.get_mut(name)?;
        while queue.front().is_some_and(|range| range.start < offset) {
            queue.pop_front();
        }
        let range = queue.pop_front()?;
        Some(&self.html[range])
    }
}

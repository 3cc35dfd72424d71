//! Allow-list HTML sanitizer and linkifier.
//!
//! Untrusted markup is parsed with html5ever into an owned tree, reduced to
//! an allow-list of tags, attributes and CSS properties, and serialized back
//! to canonical HTML:
//!
//! ```
//! use html_bleach::{CleanOptions, clean};
//!
//! let out = clean("an <script>evil()</script> example", &CleanOptions::default())?;
//! assert_eq!(out, "an &lt;script&gt;evil()&lt;/script&gt; example");
//! # Ok::<(), html_bleach::SanitizeError>(())
//! ```
//!
//! [`linkify`] runs the same parse/serialize pipeline but wraps URLs found
//! in text in `<a>` elements instead of filtering.

pub mod config;
pub mod dom;
pub mod errors;
pub mod filter;
pub mod linkify;
pub mod policy;
pub mod utils;

pub use config::{
    AllowedAttributes, CleanOptions, CleanOptionsBuilder, LinkifyOptions, LinkifyOptionsBuilder,
    TextCallback,
};
pub use dom::{Attribute, Element, Namespace, Node, ParseMode, TagOrigin};
pub use errors::{SanitizeError, SanitizeResult};
pub use linkify::UrlMatcher;
pub use policy::Policy;
pub use utils::{
    ALLOWED_ATTRIBUTES, ALLOWED_BASE_FULL_DOCUMENT_TAGS, ALLOWED_STYLES, ALLOWED_TAGS,
    MAX_HTML_SIZE,
};

use dom::{SerializeOptions, parse_html, serialize};
use errors::check_input_size;

/// Sanitize `html` against the allow-lists in `options`
///
/// # Errors
///
/// Returns a configuration error when an allow-list entry is malformed and
/// [`SanitizeError::InputTooLarge`] when `html` exceeds
/// `options.max_input_bytes`. Nothing is parsed in either case.
pub fn clean(html: &str, options: &CleanOptions) -> SanitizeResult<String> {
    let policy = Policy::resolve(options)?;
    clean_with_policy(html, &policy)
}

/// Sanitize `html` with an already resolved [`Policy`]
///
/// Resolve the policy once and reuse it when cleaning many inputs with the
/// same options.
///
/// # Errors
///
/// Returns [`SanitizeError::InputTooLarge`] when `html` exceeds the policy's
/// input limit.
pub fn clean_with_policy(html: &str, policy: &Policy) -> SanitizeResult<String> {
    check_input_size(html, policy.max_input_bytes())?;

    let (output, passes) = settle(html, |input| {
        let parsed = parse_html(input, policy.parse_mode());
        let filtered = filter::filter(parsed.root, policy);
        Pass {
            unsettled: filtered.removed > 0 || has_table(&filtered.root),
            output: serialize(
                &filtered.root,
                &SerializeOptions {
                    doctype: parsed.doctype,
                },
            ),
        }
    });

    tracing::debug!(
        mode = ?policy.parse_mode(),
        passes = passes,
        input_bytes = html.len(),
        output_bytes = output.len(),
        "Cleaned HTML"
    );
    Ok(output)
}

/// Wrap URLs in the text of `html` in `<a>` elements
///
/// No tag or attribute filtering is applied; pass the result through
/// [`clean`] as well when the input is untrusted.
///
/// # Errors
///
/// Returns [`SanitizeError::InvalidUrlPattern`] when `options.url_pattern`
/// does not compile and [`SanitizeError::InputTooLarge`] when `html` exceeds
/// `options.max_input_bytes`.
pub fn linkify(html: &str, options: &LinkifyOptions) -> SanitizeResult<String> {
    let matcher = UrlMatcher::from_options(options)?;
    check_input_size(html, options.max_input_bytes)?;

    let mode = options.parse_mode();
    let (output, passes) = settle(html, |input| {
        let parsed = parse_html(input, mode);
        let linked = linkify::linkify(parsed.root, options, &matcher);
        Pass {
            unsettled: has_table(&linked),
            output: serialize(
                &linked,
                &SerializeOptions {
                    doctype: parsed.doctype,
                },
            ),
        }
    });

    tracing::debug!(
        mode = ?mode,
        passes = passes,
        input_bytes = html.len(),
        output_bytes = output.len(),
        "Linkified HTML"
    );
    Ok(output)
}

/// Upper bound on parse-rewrite-serialize rounds for one call
const MAX_PASSES: usize = 4;

/// Output of one parse-rewrite-serialize round
struct Pass {
    output: String,
    /// The tree builder may arrange `output` differently when it is parsed again
    unsettled: bool,
}

/// Run `pass` on `html`, then on its own output until that stops changing
///
/// Removing elements and foster-parenting table content can both leave
/// markup the tree builder rearranges on the next parse, such as a list
/// item nested directly in another.
fn settle(html: &str, pass: impl Fn(&str) -> Pass) -> (String, usize) {
    let mut current = pass(html);
    let mut passes = 1;
    while current.unsettled {
        if passes == MAX_PASSES {
            tracing::warn!(passes = passes, "Output still changing after the last pass");
            break;
        }
        let again = pass(&current.output);
        passes += 1;
        if again.output == current.output {
            break;
        }
        tracing::trace!(passes = passes, "Output changed on reparse");
        current = again;
    }
    (current.output, passes)
}

fn has_table(tree: &Node) -> bool {
    tree.descendants()
        .any(|node| node.as_element().is_some_and(|el| el.is_html("table")))
}

//! Allow-list tree filter.
//!
//! The filter consumes a tree and rebuilds it. Every node maps to zero,
//! one or several output nodes:
//!
//! - comments vanish when the policy strips them
//! - allowed elements keep their place, with attributes and `style`
//!   declarations reduced to the allow-list
//! - disallowed elements are either stripped (their filtered children are
//!   spliced into the parent) or escaped (the tags they were written with
//!   become text around their filtered children)
//!
//! Content left where the tree builder would not put it is then moved the
//! way a reparse would move it (see `placement`).
//!
//! Building new child vectors instead of editing them in place keeps the
//! traversal free of index bookkeeping.

mod placement;
pub mod style;

use smallvec::{SmallVec, smallvec};

use crate::dom::{Element, Namespace, Node, TagOrigin};
use crate::policy::Policy;
use crate::utils::{STRIP_CONTENT_ELEMENTS, TABLE_CONTEXT_ELEMENTS, is_void_element};

pub use style::filter_style;

/// Output of rebuilding one node; usually a single node
type Rebuilt = SmallVec<[Node; 1]>;

/// A filtered tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filtered {
    pub root: Node,
    /// Elements escaped or stripped plus comments dropped
    pub removed: usize,
}

/// Apply `policy` to `tree`
///
/// A [`Node::Document`] root stays a document. Any other root that does not
/// rebuild to exactly one node is wrapped in a document.
#[must_use]
pub fn filter(tree: Node, policy: &Policy) -> Filtered {
    let mut filter = Filter { policy, removed: 0 };
    let root = match tree {
        Node::Document(children) => Node::Document(filter.rebuild_children(children)),
        other => {
            let mut rebuilt = filter.rebuild(other);
            if rebuilt.len() == 1 {
                rebuilt.remove(0)
            } else {
                Node::Document(rebuilt.into_vec())
            }
        }
    };
    Filtered {
        root,
        removed: filter.removed,
    }
}

struct Filter<'a> {
    policy: &'a Policy,
    removed: usize,
}

impl Filter<'_> {
    fn rebuild_children(&mut self, children: Vec<Node>) -> Vec<Node> {
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            out.extend(self.rebuild(child));
        }
        out
    }

    fn rebuild(&mut self, node: Node) -> Rebuilt {
        match node {
            Node::Comment(_) if self.policy.strip_comments() => {
                self.removed += 1;
                SmallVec::new()
            }
            Node::Document(children) => smallvec![Node::Document(self.rebuild_children(children))],
            Node::Element(element) => self.rebuild_element(element),
            text_or_comment => smallvec![text_or_comment],
        }
    }

    fn rebuild_element(&mut self, mut element: Element) -> Rebuilt {
        let tag = element.tag().into_owned();

        if !self.policy.allows_tag(&tag) {
            self.removed += 1;
            return self.rebuild_disallowed(element, &tag);
        }

        filter_attributes(&mut element, &tag, self.policy);

        if self.policy.add_nofollow() && tag == "a" && element.has_attr("href") {
            element.set_attr("rel", "nofollow");
        }

        element.children = self.rebuild_children(std::mem::take(&mut element.children));

        let mut out = Rebuilt::new();
        if element.namespace == Namespace::Html {
            if tag == "html" {
                placement::move_text_to_body(&mut element);
            } else if TABLE_CONTEXT_ELEMENTS.contains(&tag.as_str()) {
                out.extend(placement::take_foster_parented(&mut element));
            }
        }
        element.name = tag;
        out.push(Node::Element(element));
        out
    }

    /// The single place where strip-vs-escape is decided
    fn rebuild_disallowed(&mut self, mut element: Element, tag: &str) -> Rebuilt {
        if self.policy.strip_disallowed() {
            if STRIP_CONTENT_ELEMENTS.contains(&tag) {
                tracing::trace!(element = %tag, "Stripping disallowed element with its content");
                return SmallVec::new();
            }
            tracing::trace!(element = %tag, "Stripping disallowed element");
            return SmallVec::from_vec(self.rebuild_children(element.children));
        }

        tracing::trace!(element = %tag, "Escaping disallowed element");
        let (start, end) = match std::mem::take(&mut element.origin) {
            TagOrigin::Source { start, end } => (Some(start), end),
            // Nothing was written for it, so only its content shows
            TagOrigin::Implied => (None, None),
            TagOrigin::Constructed => (
                Some(start_tag_markup(&element, tag)),
                (!is_void_element(tag)).then(|| format!("</{tag}>")),
            ),
        };

        let mut out = Rebuilt::new();
        out.extend(start.map(Node::Text));
        out.extend(self.rebuild_children(element.children));
        out.extend(end.map(Node::Text));
        out
    }
}

/// Start tag text rendered from an element that has no source text
fn start_tag_markup(element: &Element, tag: &str) -> String {
    let mut markup = String::with_capacity(tag.len() + 2);
    markup.push('<');
    markup.push_str(tag);
    for attr in &element.attributes {
        markup.push(' ');
        markup.push_str(&attr.name.to_ascii_lowercase());
        markup.push_str("=\"");
        markup.push_str(&attr.value);
        markup.push('"');
    }
    markup.push('>');
    markup
}

fn filter_attributes(element: &mut Element, tag: &str, policy: &Policy) {
    let attributes = std::mem::take(&mut element.attributes);
    element.attributes = attributes
        .into_iter()
        .filter_map(|mut attr| {
            let name = attr.name.to_ascii_lowercase();
            if !policy.allows_attribute(tag, &name) {
                tracing::trace!(element = %tag, attribute = %name, "Dropping disallowed attribute");
                return None;
            }
            if name == "style" {
                attr.value = filter_style(&attr.value, policy);
            }
            attr.name = name;
            Some(attr)
        })
        .collect();
}

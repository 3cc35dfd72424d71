//! Turn URL-shaped text into anchors.
//!
//! Like the filter, the linkifier rebuilds the tree: a text node becomes
//! leading text, an `a` element per match and the trailing text. Text under
//! an anchor, a raw-text element or foreign (SVG/MathML) content is never
//! touched, so running it twice links nothing new.

pub mod matcher;

use smallvec::{SmallVec, smallvec};

use crate::config::LinkifyOptions;
use crate::dom::{Element, Namespace, Node};
use crate::utils::LINKIFY_SKIP_ELEMENTS;

pub use matcher::{LinkMatch, UrlMatcher, normalize_href};

type Rebuilt = SmallVec<[Node; 1]>;

/// Wrap links found in the text of `tree` in `a` elements
///
/// Existing anchors are kept as they are, except that every `a` with an
/// `href` gets `rel="nofollow"` when `options.nofollow` is set.
#[must_use]
pub fn linkify(tree: Node, options: &LinkifyOptions, matcher: &UrlMatcher) -> Node {
    let linker = Linker { options, matcher };
    match tree {
        Node::Document(children) => Node::Document(linker.rebuild_children(children, false)),
        other => {
            let mut rebuilt = linker.rebuild(other, false);
            if rebuilt.len() == 1 {
                rebuilt.remove(0)
            } else {
                Node::Document(rebuilt.into_vec())
            }
        }
    }
}

struct Linker<'a> {
    options: &'a LinkifyOptions,
    matcher: &'a UrlMatcher,
}

impl Linker<'_> {
    fn rebuild_children(&self, children: Vec<Node>, skip: bool) -> Vec<Node> {
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            out.extend(self.rebuild(child, skip));
        }
        out
    }

    fn rebuild(&self, node: Node, skip: bool) -> Rebuilt {
        match node {
            Node::Text(text) if !skip => self.split_text(text),
            Node::Element(element) => smallvec![Node::Element(self.rebuild_element(element, skip))],
            Node::Document(children) => {
                smallvec![Node::Document(self.rebuild_children(children, skip))]
            }
            other => smallvec![other],
        }
    }

    fn rebuild_element(&self, mut element: Element, skip: bool) -> Element {
        let skip = skip || self.skips(&element);
        element.children = self.rebuild_children(std::mem::take(&mut element.children), skip);

        if self.options.nofollow && element.is_html("a") && element.has_attr("href") {
            element.set_attr("rel", "nofollow");
        }
        element
    }

    /// Whether text below `element` is left alone
    fn skips(&self, element: &Element) -> bool {
        if element.namespace != Namespace::Html {
            return true;
        }
        let tag = element.tag();
        LINKIFY_SKIP_ELEMENTS.contains(&tag.as_ref()) || (self.options.skip_pre && tag == "pre")
    }

    fn split_text(&self, text: String) -> Rebuilt {
        let matches = self.matcher.find_matches(&text);
        if matches.is_empty() {
            return smallvec![Node::Text(text)];
        }

        tracing::trace!(links = matches.len(), "Linkifying text node");
        let mut out = Rebuilt::new();
        let mut cursor = 0;
        for link in &matches {
            if link.start > cursor {
                out.push(Node::text(&text[cursor..link.start]));
            }
            out.push(Node::Element(self.anchor(link)));
            cursor = link.end;
        }
        if cursor < text.len() {
            out.push(Node::text(&text[cursor..]));
        }
        out
    }

    fn anchor(&self, link: &LinkMatch<'_>) -> Element {
        let href = match &self.options.filter_url {
            Some(callback) => callback.apply(&link.href),
            None => link.href.clone(),
        };
        let text = match &self.options.filter_text {
            Some(callback) => callback.apply(link.text),
            None => link.text.to_string(),
        };

        let mut anchor = Element::new("a").with_attr("href", href);
        if self.options.nofollow {
            anchor.set_attr("rel", "nofollow");
        }
        anchor.with_child(Node::Text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ParseMode, SerializeOptions, parse_html, serialize};

    fn run(html: &str, options: &LinkifyOptions) -> String {
        let matcher = UrlMatcher::from_options(options).unwrap();
        let parsed = parse_html(html, ParseMode::Fragment);
        serialize(
            &linkify(parsed.root, options, &matcher),
            &SerializeOptions::default(),
        )
    }

    #[test]
    fn test_text_split_around_link() {
        let tree = Node::Document(vec![Node::text("a http://x.com b")]);
        let out = linkify(tree, &LinkifyOptions::default(), &UrlMatcher::default());
        assert_eq!(
            out,
            Node::Document(vec![
                Node::text("a "),
                Node::Element(
                    Element::new("a")
                        .with_attr("href", "http://x.com")
                        .with_attr("rel", "nofollow")
                        .with_child(Node::text("http://x.com"))
                ),
                Node::text(" b"),
            ])
        );
    }

    #[test]
    fn test_text_without_links_untouched() {
        let tree = Node::Document(vec![Node::text("plain text")]);
        let out = linkify(tree.clone(), &LinkifyOptions::default(), &UrlMatcher::default());
        assert_eq!(out, tree);
    }

    #[test]
    fn test_multiple_links_in_one_node() {
        assert_eq!(
            run("http://a.com and www.b.com", &LinkifyOptions::default()),
            concat!(
                r#"<a href="http://a.com" rel="nofollow">http://a.com</a> and "#,
                r#"<a href="http://www.b.com" rel="nofollow">www.b.com</a>"#
            )
        );
    }

    #[test]
    fn test_nofollow_disabled() {
        let options = LinkifyOptions {
            nofollow: false,
            ..LinkifyOptions::default()
        };
        assert_eq!(
            run("http://a.com", &options),
            r#"<a href="http://a.com">http://a.com</a>"#
        );
    }

    #[test]
    fn test_existing_anchor_not_nested() {
        assert_eq!(
            run(r#"<a href="http://a.com" rel="me">http://a.com</a>"#, &LinkifyOptions::default()),
            r#"<a href="http://a.com" rel="nofollow">http://a.com</a>"#
        );
    }

    #[test]
    fn test_anchor_without_href_left_alone() {
        let s = r#"<a name="anchor">x</a>"#;
        assert_eq!(run(s, &LinkifyOptions::default()), s);
    }

    #[test]
    fn test_skipped_contexts() {
        let options = LinkifyOptions::default();
        let s = "<script>var u = 'http://a.com';</script>";
        assert_eq!(run(s, &options), s);
        let s = "<textarea>http://a.com</textarea>";
        assert_eq!(run(s, &options), s);
        let s = "<svg><text>http://a.com</text></svg>";
        assert_eq!(run(s, &options), s);
    }

    #[test]
    fn test_skip_pre() {
        let s = "<pre>http://a.com</pre>";
        let options = LinkifyOptions {
            skip_pre: true,
            ..LinkifyOptions::default()
        };
        assert_eq!(run(s, &options), s);
        assert_eq!(
            run(s, &LinkifyOptions::default()),
            r#"<pre><a href="http://a.com" rel="nofollow">http://a.com</a></pre>"#
        );
    }

    #[test]
    fn test_callbacks_transform_new_links() {
        let options = LinkifyOptions::builder()
            .nofollow(false)
            .filter_url(|url| format!("https://out.example/?u={url}"))
            .filter_text(|text| text.trim_start_matches("http://").to_string())
            .build()
            .unwrap();
        assert_eq!(
            run("go http://a.com", &options),
            r#"go <a href="https://out.example/?u=http://a.com">a.com</a>"#
        );
    }

    #[test]
    fn test_table_cell_linkified_in_place() {
        assert_eq!(
            run("<table><tr><td>www.a.com</td></tr></table>", &LinkifyOptions::default()),
            concat!(
                "<table><tbody><tr><td>",
                r#"<a href="http://www.a.com" rel="nofollow">www.a.com</a>"#,
                "</td></tr></tbody></table>"
            )
        );
    }
}

//! Serializer adapter: owned tree back to canonical HTML text.
//!
//! Element and attribute names are written in lowercase, attribute values
//! are always double-quoted, and text is escaped with `html-escape`. The
//! output reparses to the same tree, which is what makes `clean` and
//! `linkify` idempotent.

use super::{Element, Namespace, Node, lowercase};
use crate::utils::{LEADING_NEWLINE_ELEMENTS, RAW_TEXT_ELEMENTS, is_void_element};

/// Options for [`serialize`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Emitted verbatim before the tree (document mode doctype)
    pub doctype: Option<String>,
}

/// Render `tree` to an HTML string
#[must_use]
pub fn serialize(tree: &Node, options: &SerializeOptions) -> String {
    let mut output = String::new();
    if let Some(doctype) = &options.doctype {
        output.push_str(doctype);
    }
    serialize_node(tree, false, &mut output);
    output
}

fn serialize_node(node: &Node, raw_text: bool, output: &mut String) {
    match node {
        Node::Document(children) => {
            for child in children {
                serialize_node(child, false, output);
            }
        }
        Node::Text(text) => {
            if raw_text {
                output.push_str(text);
            } else {
                output.push_str(&html_escape::encode_text(text));
            }
        }
        Node::Comment(comment) => {
            output.push_str("<!--");
            output.push_str(comment);
            output.push_str("-->");
        }
        Node::Element(element) => serialize_element(element, output),
    }
}

fn serialize_element(element: &Element, output: &mut String) {
    let tag = element.tag();
    let is_html = element.namespace == Namespace::Html;

    output.push('<');
    output.push_str(&tag);
    for attr in &element.attributes {
        output.push(' ');
        output.push_str(&lowercase(&attr.name));
        output.push_str("=\"");
        output.push_str(&html_escape::encode_double_quoted_attribute(&attr.value));
        output.push('"');
    }
    output.push('>');

    if is_html && is_void_element(&tag) {
        return;
    }

    // The parser drops one newline right after <pre>, so write it twice
    if is_html
        && LEADING_NEWLINE_ELEMENTS.contains(&tag.as_ref())
        && matches!(element.children.first(), Some(Node::Text(t)) if t.starts_with('\n'))
    {
        output.push('\n');
    }

    let raw_text = is_html && RAW_TEXT_ELEMENTS.contains(&tag.as_ref());
    for child in &element.children {
        serialize_node(child, raw_text, output);
    }

    output.push_str("</");
    output.push_str(&tag);
    output.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Attribute, ParseMode, TagOrigin, parse_html};

    fn roundtrip(html: &str) -> String {
        let parsed = parse_html(html, ParseMode::Fragment);
        serialize(&parsed.root, &SerializeOptions::default())
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(serialize(&Node::Document(vec![]), &SerializeOptions::default()), "");
        assert_eq!(roundtrip(""), "");
    }

    #[test]
    fn test_lowercase_names_values_untouched() {
        let el = Element {
            name: "EM".into(),
            namespace: Namespace::Html,
            attributes: vec![Attribute::new("CLASS", "FOO")],
            children: vec![Node::text("BAR")],
            origin: TagOrigin::Constructed,
        };
        assert_eq!(
            serialize(&Node::Element(el), &SerializeOptions::default()),
            r#"<em class="FOO">BAR</em>"#
        );
    }

    #[test]
    fn test_void_elements_have_no_end_tag() {
        assert_eq!(roundtrip("a <br/><img src=x>"), r#"a <br><img src="x">"#);
    }

    #[test]
    fn test_text_escaping() {
        assert_eq!(roundtrip("an & entity"), "an &amp; entity");
        assert_eq!(roundtrip("tag < <em>and</em> entity"), "tag &lt; <em>and</em> entity");
        assert_eq!(roundtrip("&lt;em&gt;strong&lt;/em&gt;"), "&lt;em&gt;strong&lt;/em&gt;");
    }

    #[test]
    fn test_attribute_escaping() {
        assert_eq!(
            roundtrip(r#"<a title='say "hi"' href="/?a=1&b=2">x</a>"#),
            r#"<a title="say &quot;hi&quot;" href="/?a=1&amp;b=2">x</a>"#
        );
    }

    #[test]
    fn test_raw_text_not_escaped() {
        assert_eq!(roundtrip("<style>a > b {}</style>"), "<style>a > b {}</style>");
        assert_eq!(roundtrip("<script>if (a < b) {}</script>"), "<script>if (a < b) {}</script>");
    }

    #[test]
    fn test_foreign_style_is_escaped() {
        assert_eq!(
            roundtrip("<svg><style>&lt;img&gt;</style></svg>"),
            "<svg><style>&lt;img&gt;</style></svg>"
        );
    }

    #[test]
    fn test_comments_verbatim() {
        assert_eq!(roundtrip("<!-- c -->text"), "<!-- c -->text");
        assert_eq!(roundtrip("<!-- open"), "<!-- open-->");
    }

    #[test]
    fn test_pre_leading_newline_preserved() {
        let once = roundtrip("<pre>\n\nx</pre>");
        assert_eq!(once, "<pre>\n\nx</pre>");
        assert_eq!(roundtrip(&once), once);
    }

    #[test]
    fn test_doctype_prefix() {
        let parsed = parse_html("<!DOCTYPE html><p>x</p>", ParseMode::Document);
        let options = SerializeOptions {
            doctype: parsed.doctype.clone(),
        };
        assert_eq!(
            serialize(&parsed.root, &options),
            "<!DOCTYPE html><html><head></head><body><p>x</p></body></html>"
        );
    }

    #[test]
    fn test_unclosed_tag_gets_closed() {
        assert_eq!(roundtrip("a <em>fixed tag"), "a <em>fixed tag</em>");
    }
}

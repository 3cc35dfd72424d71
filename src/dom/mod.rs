//! Owned HTML tree used between parsing and serialization.
//!
//! The html5ever reference DOM (`markup5ever_rcdom`) is built from shared
//! `Rc` handles with interior mutability. The filter and the linkifier
//! rebuild trees rather than mutate them, so the parse adapter converts the
//! parser output into this plain owned forest: every child belongs to
//! exactly one parent and a subtree is dropped by dropping its value.

pub mod parse;
pub mod serialize;
mod source;

pub use parse::{ParseMode, ParsedHtml, parse_html};
pub use serialize::{SerializeOptions, serialize};

/// XML namespace of an element, as decided by the HTML5 tree builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Html,
    Svg,
    MathMl,
    Other,
}

impl Namespace {
    /// Map a namespace URL to the variant
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        match url {
            "http://www.w3.org/1999/xhtml" => Namespace::Html,
            "http://www.w3.org/2000/svg" => Namespace::Svg,
            "http://www.w3.org/1998/Math/MathML" => Namespace::MathMl,
            _ => Namespace::Other,
        }
    }
}

/// A single `name="value"` pair on an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// How an element came to be in the tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagOrigin {
    /// Built in code rather than parsed
    #[default]
    Constructed,
    /// Inserted by the tree builder with no matching tag in the input
    /// (implied `tbody`, reopened formatting elements)
    Implied,
    /// Written in the input; `end` is the closing tag's text when there was one
    Source { start: String, end: Option<String> },
}

/// An element with its attributes and owned children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub namespace: Namespace,
    /// Source order; names are matched ASCII-case-insensitively
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    pub origin: TagOrigin,
}

impl Element {
    /// Create an empty HTML element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Namespace::Html,
            attributes: Vec::new(),
            children: Vec::new(),
            origin: TagOrigin::Constructed,
        }
    }

    /// Lowercase tag name, borrowing when it is already lowercase
    #[must_use]
    pub fn tag(&self) -> std::borrow::Cow<'_, str> {
        lowercase(&self.name)
    }

    /// Returns `true` when this is the HTML element `tag` (lowercase)
    #[must_use]
    pub fn is_html(&self, tag: &str) -> bool {
        self.namespace == Namespace::Html && self.name.eq_ignore_ascii_case(tag)
    }

    /// Look up an attribute value by name
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Overwrite an attribute in place, or append it when absent
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }
}

/// A node of the owned tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Root of a document or of a fragment
    Document(Vec<Node>),
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    /// Children of a document or element; empty for leaves
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document(children) => children,
            Node::Element(el) => &el.children,
            Node::Text(_) | Node::Comment(_) => &[],
        }
    }

    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Depth-first pre-order iterator over this node and its descendants
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Concatenated text of this subtree
    #[cfg(test)]
    pub(crate) fn text_content(&self) -> String {
        let mut out = String::new();
        for node in self.descendants() {
            if let Node::Text(t) = node {
                out.push_str(t);
            }
        }
        out
    }
}

/// Iterator returned by [`Node::descendants`]
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// ASCII-lowercase `s`, borrowing when no change is needed
pub(crate) fn lowercase(s: &str) -> std::borrow::Cow<'_, str> {
    if s.bytes().any(|b| b.is_ascii_uppercase()) {
        std::borrow::Cow::Owned(s.to_ascii_lowercase())
    } else {
        std::borrow::Cow::Borrowed(s)
    }
}

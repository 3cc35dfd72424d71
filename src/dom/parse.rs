//! Parse adapter: html5ever output converted into the owned [`Node`] tree.
//!
//! Parsing itself (tokenizing, error recovery, implied tags, foster
//! parenting) is entirely html5ever's job. This module only chooses
//! fragment or document mode, captures the leading doctype verbatim, and
//! copies the `markup5ever_rcdom` handles into owned nodes, recording the
//! tag text each element was written with.

use std::sync::LazyLock;

use html5ever::tendril::TendrilSink;
use html5ever::{
    LocalName, Namespace as NamespaceUrl, ParseOpts, QualName, parse_document, parse_fragment,
};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;

use super::source::SourceTags;
use super::{Attribute, Element, Namespace, Node, TagOrigin};
use crate::utils::{MAX_NESTING_DEPTH, RAW_TEXT_ELEMENTS};

/// Leading `<!DOCTYPE …>` token, possibly after whitespace
static DOCTYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\A\s*(<!DOCTYPE[^>]*>)").expect("DOCTYPE_RE: hardcoded regex is valid")
});

/// How the input text is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Parsed in a `<body>` context; no html/head/body wrapper is created
    Fragment,
    /// Parsed as a full document; the skeleton is always present
    Document,
}

impl ParseMode {
    #[must_use]
    pub fn from_fragment_flag(parse_as_fragment: bool) -> Self {
        if parse_as_fragment {
            ParseMode::Fragment
        } else {
            ParseMode::Document
        }
    }
}

/// A parsed input: the tree plus what lives outside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHtml {
    /// Always a [`Node::Document`]; for fragments its children are the fragment nodes
    pub root: Node,
    /// Verbatim leading doctype token (document mode only)
    pub doctype: Option<String>,
    pub mode: ParseMode,
}

/// Parse `html` into an owned tree
#[must_use]
pub fn parse_html(html: &str, mode: ParseMode) -> ParsedHtml {
    let mut converter = Converter {
        tags: SourceTags::scan(html),
    };

    match mode {
        ParseMode::Fragment => {
            let context = QualName::new(
                None,
                NamespaceUrl::from("http://www.w3.org/1999/xhtml"),
                LocalName::from("body"),
            );
            let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new(), false)
                .one(html);

            // The fragment parser puts everything under a synthetic <html> root
            let mut children = Vec::new();
            for root in dom.document.children.borrow().iter() {
                children.extend(converter.children(root, 0));
            }

            ParsedHtml {
                root: Node::Document(children),
                doctype: None,
                mode,
            }
        }
        ParseMode::Document => {
            let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
            let doctype = DOCTYPE_RE
                .captures(html)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string());

            ParsedHtml {
                root: Node::Document(converter.children(&dom.document, 0)),
                doctype,
                mode,
            }
        }
    }
}

/// Copies rcdom handles into owned nodes, pairing elements with their tag text
struct Converter<'a> {
    tags: SourceTags<'a>,
}

impl Converter<'_> {
    fn children(&mut self, handle: &Handle, depth: usize) -> Vec<Node> {
        let mut out = Vec::new();
        for child in handle.children.borrow().iter() {
            self.convert(child, depth, &mut out);
        }
        out
    }

    fn convert(&mut self, handle: &Handle, depth: usize, out: &mut Vec<Node>) {
        match &handle.data {
            NodeData::Document => out.push(Node::Document(self.children(handle, depth))),
            NodeData::Text { contents } => out.push(Node::Text(contents.borrow().to_string())),
            NodeData::Comment { contents } => out.push(Node::Comment(contents.to_string())),
            NodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                if depth >= MAX_NESTING_DEPTH {
                    tracing::warn!(
                        element = %name.local,
                        depth = depth,
                        limit = MAX_NESTING_DEPTH,
                        "Maximum HTML nesting depth exceeded - flattening <{}> to its text",
                        name.local
                    );
                    self.flatten(handle, out);
                    return;
                }

                let tag = name.local.to_ascii_lowercase();
                let start = self.tags.claim_start(&tag);

                let attributes = attrs
                    .borrow()
                    .iter()
                    .map(|attr| {
                        let name = match &attr.name.prefix {
                            Some(prefix) => format!("{prefix}:{}", attr.name.local),
                            None => attr.name.local.to_string(),
                        };
                        Attribute::new(name, attr.value.to_string())
                    })
                    .collect();

                let mut children = self.children(handle, depth + 1);
                if let Some(contents) = template_contents.borrow().as_ref() {
                    children.extend(self.children(contents, depth + 1));
                }

                // End tags pair up in closing order, so claim after the children
                let origin = match start {
                    None => TagOrigin::Implied,
                    Some(start) => TagOrigin::Source {
                        start: start.markup.to_string(),
                        end: if start.self_closing {
                            None
                        } else {
                            self.tags
                                .claim_end(&tag, start.offset)
                                .map(str::to_string)
                        },
                    },
                };

                out.push(Node::Element(Element {
                    name: name.local.to_string(),
                    namespace: Namespace::from_url(&name.ns),
                    attributes,
                    children,
                    origin,
                }));
            }
            NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {}
        }
    }

    /// Keep the text of a subtree below the depth cap, dropping its elements
    ///
    /// Walks with an explicit stack so arbitrarily deep input cannot
    /// exhaust the call stack.
    fn flatten(&mut self, handle: &Handle, out: &mut Vec<Node>) {
        let mut stack = vec![Handle::clone(handle)];
        while let Some(node) = stack.pop() {
            match &node.data {
                NodeData::Text { contents } => out.push(Node::Text(contents.borrow().to_string())),
                NodeData::Element {
                    name,
                    template_contents,
                    ..
                } => {
                    let tag = name.local.to_ascii_lowercase();
                    self.tags.claim_start(&tag);
                    if Namespace::from_url(&name.ns) == Namespace::Html
                        && RAW_TEXT_ELEMENTS.contains(&tag.as_ref())
                    {
                        continue;
                    }
                    if let Some(contents) = template_contents.borrow().as_ref() {
                        stack.extend(contents.children.borrow().iter().rev().cloned());
                    }
                    stack.extend(node.children.borrow().iter().rev().cloned());
                }
                _ => {}
            }
        }
    }
}

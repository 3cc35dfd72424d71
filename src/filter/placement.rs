//! Tree-builder placement rules for filtered trees.
//!
//! Removing an element can leave content where the HTML5 tree builder
//! never puts it, and a reparse of the output would then move it. Two such
//! moves are made here up front: visible text in `<head>` or loose in
//! `<html>` goes to `<body>`, and anything a table keeps only as structure
//! goes in front of the table.

use crate::dom::{Element, Namespace, Node};
use crate::utils::TABLE_CONTENT_ELEMENTS;

/// HTML whitespace; the only text a head or a table may hold
fn is_html_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0C' | '\r')
}

fn is_visible_text(node: &Node) -> bool {
    matches!(node, Node::Text(text) if !text.chars().all(is_html_whitespace))
}

fn is_html_element(node: &Node, tag: &str) -> bool {
    node.as_element().is_some_and(|el| el.is_html(tag))
}

/// Move visible text out of `<head>` and `<html>` into `<body>`
///
/// The tree builder closes the head at the first visible character, so
/// that text and every head child after it go to the start of the body.
/// Loose text before the body is prepended to it, text after it appended.
pub(super) fn move_text_to_body(html: &mut Element) {
    let mut before_body = Vec::new();
    let mut after_body = Vec::new();
    let mut seen_body = false;

    let children = std::mem::take(&mut html.children);
    html.children.reserve(children.len());
    for child in children {
        match child {
            Node::Element(mut head) if head.is_html("head") => {
                if let Some(index) = head.children.iter().position(is_visible_text) {
                    before_body.extend(head.children.split_off(index));
                }
                html.children.push(Node::Element(head));
            }
            Node::Element(body) if body.is_html("body") => {
                seen_body = true;
                html.children.push(Node::Element(body));
            }
            text if is_visible_text(&text) => {
                if seen_body {
                    after_body.push(text);
                } else {
                    before_body.push(text);
                }
            }
            other => html.children.push(other),
        }
    }

    if before_body.is_empty() && after_body.is_empty() {
        return;
    }
    tracing::trace!(
        moved = before_body.len() + after_body.len(),
        "Moving document text into <body>"
    );

    let index = match html.children.iter().position(|c| is_html_element(c, "body")) {
        Some(index) => index,
        None => {
            let at = html
                .children
                .iter()
                .position(|c| is_html_element(c, "head"))
                .map_or(0, |head| head + 1);
            html.children.insert(at, Node::Element(Element::new("body")));
            at
        }
    };
    if let Node::Element(body) = &mut html.children[index] {
        let existing = std::mem::take(&mut body.children);
        body.children = before_body;
        body.children.extend(existing);
        body.children.extend(after_body);
    }
}

/// Remove and return the children a table context does not keep
///
/// A run of adjacent text moves as a whole when any of it is visible.
/// Elements other than table structure move with their subtree. Order is
/// preserved; the caller puts the result in front of `element`.
pub(super) fn take_foster_parented(element: &mut Element) -> Vec<Node> {
    let children = std::mem::take(&mut element.children);
    let mut fostered = Vec::new();
    let mut run = Vec::new();

    for child in children {
        if matches!(child, Node::Text(_)) {
            run.push(child);
            continue;
        }
        flush_text_run(&mut run, &mut element.children, &mut fostered);
        if stays_in_table(&child) {
            element.children.push(child);
        } else {
            fostered.push(child);
        }
    }
    flush_text_run(&mut run, &mut element.children, &mut fostered);

    if !fostered.is_empty() {
        tracing::trace!(
            element = %element.name,
            moved = fostered.len(),
            "Moving content in front of table"
        );
    }
    fostered
}

fn flush_text_run(run: &mut Vec<Node>, kept: &mut Vec<Node>, fostered: &mut Vec<Node>) {
    if run.iter().any(is_visible_text) {
        fostered.append(run);
    } else {
        kept.append(run);
    }
}

fn stays_in_table(node: &Node) -> bool {
    match node {
        Node::Comment(_) => true,
        Node::Element(el) if el.namespace == Namespace::Html => {
            let tag = el.tag();
            TABLE_CONTENT_ELEMENTS.contains(&tag.as_ref())
                || (tag == "input"
                    && el
                        .attr("type")
                        .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden")))
        }
        _ => false,
    }
}

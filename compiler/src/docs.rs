//! Flattens `<desc>` trees into plain comment text.

use lazy_static::lazy_static;
use regex::Regex;
use xidlgen_schema::{DocElement, DocNode};

lazy_static! {
    // Doxygen-style directives such as `@a name` or `@c true`.
    static ref AT_DIRECTIVE: Regex = Regex::new(r"\s*@[A-Za-z]+\b\s*").unwrap();
    static ref COMMENT_END:  Regex = Regex::new(r"\*/").unwrap();
}

/// Renders a documentation node list to flat text.
pub fn render_doc(nodes: &[DocNode]) -> String {
    let text = render_nodes(nodes);
    AT_DIRECTIVE.replace_all(&text, " ").into_owned()
}

fn render_nodes(nodes: &[DocNode]) -> String {
    nodes.iter().map(render_node).collect()
}

fn render_node(node: &DocNode) -> String {
    match node {
        DocNode::Text(text) => text.text.clone(),
        DocNode::Element(element) => render_element(element),
    }
}

fn render_element(element: &DocElement) -> String {
    let content = render_nodes(&element.children);
    match element.tag.as_str() {
        "link" => {
            let target = element.attribute("to").unwrap_or_default();
            target.strip_prefix('#').unwrap_or(target).to_string()
        }
        "li" => format!("- {}", content.trim_start()),
        "see" => format!("See: {}", content),
        "note" if element.attribute("internal") == Some("yes") => String::new(),
        "note" => format!("Note: {}", content),
        "result" => format!("Error {}: {}", element.attribute("name").unwrap_or_default(), content),
        _ => content,
    }
}

/// Splits rendered text into comment lines: trimmed, without leading or
/// trailing blank lines, and with runs of blank lines collapsed to one.
pub fn comment_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = COMMENT_END.replace_all(line.trim(), "*\\/").into_owned();
        if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

// SPDX-License-Identifier: PMPL-1.0-or-later
//! Rules over DOM structure: contrast, text alternatives, headings, form
//! labels, keyboard access, links, language and ARIA usage.

pub mod alt_text;
pub mod aria;
pub mod color_contrast;
pub mod forms;
pub mod headings;
pub mod keyboard;
pub mod language;
pub mod links;

use crate::document::{DocumentModel, NodeId};

/// Text of the elements named by an `aria-labelledby` style id list.
/// `None` when none of the ids exist.
pub(crate) fn referenced_text(doc: &DocumentModel, ids: &str) -> Option<String> {
    let parts: Vec<String> = ids
        .split_whitespace()
        .filter_map(|id| doc.element_by_id(id))
        .map(|n| doc.text_content(n))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Accessible name from ARIA attributes, then content, then `title`
pub(crate) fn accessible_name(doc: &DocumentModel, id: NodeId) -> String {
    let node = doc.node(id);
    if let Some(text) = node
        .attr_non_empty("aria-labelledby")
        .and_then(|ids| referenced_text(doc, ids))
        .filter(|t| !t.trim().is_empty())
    {
        return text.trim().to_string();
    }
    if let Some(label) = node.attr_non_empty("aria-label") {
        return label.to_string();
    }

    let mut parts = Vec::new();
    for n in std::iter::once(id).chain(doc.descendants(id)) {
        let child = doc.node(n);
        if child.attr_is("aria-hidden", "true") {
            continue;
        }
        if !child.text.is_empty() {
            parts.push(child.text.clone());
        }
        if n != id && matches!(child.tag.as_str(), "img" | "area" | "input") {
            if let Some(alt) = child.attr_non_empty("alt").or_else(|| child.attr_non_empty("aria-label")) {
                parts.push(alt.to_string());
            }
        }
    }
    let content = parts.join(" ");
    if !content.trim().is_empty() {
        return content.trim().to_string();
    }

    node.attr_non_empty("title").unwrap_or_default().to_string()
}

/// Heading tags map to their level
pub(crate) fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ElementSpec;

    #[test]
    fn test_accessible_name_sources() {
        let tree = ElementSpec::new("body")
            .child(ElementSpec::new("span").attr("id", "lbl").text("Search"))
            .child(ElementSpec::new("a").attr("href", "/a").attr("aria-labelledby", "lbl"))
            .child(ElementSpec::new("a").attr("href", "/b").attr("aria-label", "Home"))
            .child(
                ElementSpec::new("a")
                    .attr("href", "/c")
                    .child(ElementSpec::new("img").attr("alt", "Logo")),
            )
            .child(ElementSpec::new("a").attr("href", "/d").attr("title", "Help"));
        let doc = DocumentModel::from_tree("u", tree, Vec::new(), Vec::new()).expect("valid");
        let names: Vec<String> = doc
            .elements_by_tag("a")
            .map(|(id, _)| accessible_name(&doc, id))
            .collect();
        assert_eq!(names, vec!["Search", "Home", "Logo", "Help"]);
    }
}

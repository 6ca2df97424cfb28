// SPDX-License-Identifier: PMPL-1.0-or-later
//! Link purpose - WCAG 2.4.4 Link Purpose (In Context, Level A), 2.4.9 Link Purpose (Link Only, Level AAA)

use super::accessible_name;
use crate::document::{DocumentModel, NodeId};
use crate::model::{Severity, Violation};
use std::collections::{BTreeMap, BTreeSet};

pub const RULE_ID: &str = "link_accessibility";

/// Link text that says nothing about the destination
const GENERIC_LINK_TEXT: &[&str] = &[
    "click",
    "click here",
    "continue",
    "details",
    "go",
    "here",
    "learn more",
    "link",
    "more",
    "more info",
    "more information",
    "read more",
    "this",
    "this link",
];

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c.is_ascii_punctuation() || c == '»' || c == '›' || c == '→')
        .trim()
        .to_lowercase()
}

fn is_link(doc: &DocumentModel, id: NodeId) -> bool {
    let node = doc.node(id);
    (matches!(node.tag.as_str(), "a" | "area") && node.has_attr("href")) || node.role().as_deref() == Some("link")
}

pub fn check(doc: &DocumentModel) -> Vec<Violation> {
    let mut violations = Vec::new();
    // visible text → (destinations, elements)
    let mut groups: BTreeMap<String, (BTreeSet<String>, Vec<NodeId>)> = BTreeMap::new();

    for (id, node) in doc.elements() {
        if !is_link(doc, id) || doc.is_rendered_hidden(id) {
            continue;
        }
        let name = normalize(&accessible_name(doc, id));
        if name.is_empty() {
            violations.push(
                Violation::new(RULE_ID, Severity::Moderate, "Link has no accessible text")
                    .with_criteria(&["2.4.4"])
                    .with_element(doc.element_ref(id)),
            );
            continue;
        }
        if GENERIC_LINK_TEXT.contains(&name.as_str()) {
            violations.push(
                Violation::new(
                    RULE_ID,
                    Severity::Moderate,
                    format!("Link text \"{}\" does not describe its destination", name),
                )
                .with_criteria(&["2.4.4"])
                .with_element(doc.element_ref(id)),
            );
            continue;
        }

        let disambiguated = node.attr_non_empty("aria-label").is_some()
            || node.attr_non_empty("aria-labelledby").is_some()
            || node.attr_non_empty("title").is_some();
        if disambiguated {
            continue;
        }
        let href = node.attr("href").unwrap_or("").trim().to_string();
        let entry = groups.entry(name).or_default();
        entry.0.insert(href);
        entry.1.push(id);
    }

    for (text, (destinations, ids)) in groups {
        if destinations.len() < 2 {
            continue;
        }
        violations.push(
            Violation::new(
                RULE_ID,
                Severity::Moderate,
                format!(
                    "{} links share the text \"{}\" but lead to {} different destinations",
                    ids.len(),
                    text,
                    destinations.len()
                ),
            )
            .with_criteria(&["2.4.9"])
            .with_elements(ids.into_iter().map(|id| doc.element_ref(id))),
        );
    }

    violations
}

// SPDX-License-Identifier: PMPL-1.0-or-later
//! Heading structure - WCAG 1.3.1 Info and Relationships (Level A)
//!
//! Headings in document order may go at most one level deeper than the
//! deepest heading seen so far. The first heading sets the baseline.

use super::heading_level;
use crate::document::{DocumentModel, NodeId};
use crate::model::{Severity, Violation};

pub const RULE_ID: &str = "heading_structure";

/// Level of a native heading or an ARIA heading (`aria-level` defaults to 2)
fn level_of(doc: &DocumentModel, id: NodeId) -> Option<u8> {
    let node = doc.node(id);
    if node.role().as_deref() == Some("heading") {
        let level = node
            .attr("aria-level")
            .and_then(|l| l.trim().parse::<u8>().ok())
            .filter(|l| (1..=6).contains(l))
            .or_else(|| heading_level(&node.tag))
            .unwrap_or(2);
        return Some(level);
    }
    if node.role().is_some_and(|r| r == "presentation" || r == "none") {
        return None;
    }
    heading_level(&node.tag)
}

pub fn check(doc: &DocumentModel) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut running_max: Option<u8> = None;

    for (id, _) in doc.elements() {
        let Some(level) = level_of(doc, id) else {
            continue;
        };
        if doc.is_rendered_hidden(id) {
            continue;
        }
        match running_max {
            None => running_max = Some(level),
            Some(max) => {
                if level > max + 1 {
                    violations.push(
                        Violation::new(
                            RULE_ID,
                            Severity::Serious,
                            format!(
                                "Heading level h{} follows h{}; level h{} is skipped",
                                level,
                                max,
                                max + 1
                            ),
                        )
                        .with_criteria(&["1.3.1"])
                        .with_element(doc.element_ref(id)),
                    );
                }
                running_max = Some(max.max(level));
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ElementSpec;

    fn doc_of(tags: &[&str]) -> DocumentModel {
        let body = tags
            .iter()
            .fold(ElementSpec::new("body"), |body, tag| body.child(ElementSpec::new(tag).text("Heading")));
        DocumentModel::from_tree("u", ElementSpec::new("html").child(body), Vec::new(), Vec::new())
            .expect("valid")
    }

    #[test]
    fn test_sequential_headings() {
        assert!(check(&doc_of(&["h1", "h2", "h3"])).is_empty());
        assert!(check(&doc_of(&["h1", "h2", "h3", "h2", "h3", "h1", "h2"])).is_empty());
    }

    #[test]
    fn test_skipped_level() {
        let v = check(&doc_of(&["h1", "h3"]));
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].severity, Severity::Serious);
        assert!(v[0].description.contains("h2 is skipped"));
    }

    #[test]
    fn test_first_heading_sets_baseline() {
        assert!(check(&doc_of(&["h2", "h3"])).is_empty());
        assert_eq!(check(&doc_of(&["h2", "h4"])).len(), 1);
    }

    #[test]
    fn test_aria_heading() {
        let body = ElementSpec::new("body")
            .child(ElementSpec::new("h1").text("Title"))
            .child(ElementSpec::new("div").attr("role", "heading").attr("aria-level", "4").text("Deep"));
        let doc = DocumentModel::from_tree("u", body, Vec::new(), Vec::new()).expect("valid");
        let v = check(&doc);
        assert_eq!(v.len(), 1);
        assert!(v[0].description.contains("h4"));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
//! Form labels - WCAG 1.3.1 Info and Relationships, 3.3.2 Labels or Instructions (Level A)
//!
//! Every user-editable control needs a programmatic label: `<label for>`,
//! a wrapping `<label>`, `aria-label` or `aria-labelledby`. Unlabeled
//! required fields are critical.

use crate::document::{DocumentModel, NodeId};
use crate::model::{Severity, Violation};
use std::collections::HashSet;

pub const RULE_ID: &str = "form_labels";

/// Input types that carry their own label or are not user-editable
const EXEMPT_INPUT_TYPES: &[&str] = &["hidden", "submit", "reset", "button", "image"];

fn needs_label(doc: &DocumentModel, id: NodeId) -> bool {
    let node = doc.node(id);
    match node.tag.as_str() {
        "input" => !EXEMPT_INPUT_TYPES.contains(&node.input_type().as_str()),
        "select" | "textarea" => true,
        _ => false,
    }
}

fn is_labeled(doc: &DocumentModel, id: NodeId, label_targets: &HashSet<&str>) -> bool {
    let node = doc.node(id);
    if node.attr_non_empty("aria-label").is_some() {
        return true;
    }
    if node
        .attr_non_empty("aria-labelledby")
        .and_then(|ids| super::referenced_text(doc, ids))
        .is_some()
    {
        return true;
    }
    if node.id().is_some_and(|elem_id| label_targets.contains(elem_id)) {
        return true;
    }
    doc.ancestors(id).any(|a| doc.node(a).tag == "label")
}

pub fn check(doc: &DocumentModel) -> Vec<Violation> {
    let label_targets: HashSet<&str> = doc
        .elements_by_tag("label")
        .filter_map(|(_, n)| n.attr_non_empty("for"))
        .collect();

    let mut violations = Vec::new();
    for (id, node) in doc.elements() {
        // Unrendered controls are out of the accessibility tree
        if !needs_label(doc, id) || doc.is_rendered_hidden(id) || is_labeled(doc, id, &label_targets) {
            continue;
        }
        let required = node.has_attr("required") || node.attr_is("aria-required", "true");
        let (severity, qualifier) = if required {
            (Severity::Critical, "Required form")
        } else {
            (Severity::Serious, "Form")
        };
        let kind = if node.tag == "input" {
            format!("input type=\"{}\"", node.input_type())
        } else {
            node.tag.clone()
        };
        violations.push(
            Violation::new(
                RULE_ID,
                severity,
                format!("{} control <{}> has no associated label", qualifier, kind),
            )
            .with_criteria(&["1.3.1", "3.3.2"])
            .with_element(doc.element_ref(id)),
        );
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(body: &str) -> Vec<Violation> {
        let html = format!("<html lang=\"en\"><body><form>{}</form></body></html>", body);
        let doc = DocumentModel::from_html("u", &html, &[], &[]).expect("valid");
        check(&doc)
    }

    #[test]
    fn test_labeled_controls() {
        let v = run(
            r#"<label for="email">Email</label><input id="email" type="email">
               <label>Name <input type="text"></label>
               <input type="search" aria-label="Search">
               <span id="q">Question</span><textarea aria-labelledby="q"></textarea>
               <input type="hidden" name="token"><input type="submit" value="Send">"#,
        );
        assert!(v.is_empty(), "unexpected: {:?}", v);
    }

    #[test]
    fn test_unlabeled_controls() {
        let v = run(r#"<input type="text" name="city"><select><option>A</option></select>"#);
        assert_eq!(v.len(), 2);
        assert!(v.iter().all(|x| x.severity == Severity::Serious));
    }

    #[test]
    fn test_required_is_critical() {
        let v = run(r#"<input type="tel" required><input aria-required="true">"#);
        assert_eq!(v.len(), 2);
        assert!(v.iter().all(|x| x.severity == Severity::Critical));
    }

    #[test]
    fn test_hidden_controls_are_skipped() {
        let v = run(
            r#"<input type="text" name="honeypot" hidden>
               <div style="display: none"><select name="legacy"><option>A</option></select></div>
               <textarea style="visibility:hidden"></textarea>
               <input type="email" name="visible">"#,
        );
        assert_eq!(v.len(), 1);
        assert!(v[0].description.contains("input type=\"email\""));
    }

    #[test]
    fn test_labelledby_missing_target_does_not_label() {
        let v = run(r#"<input type="text" aria-labelledby="nowhere">"#);
        assert_eq!(v.len(), 1);
    }
}

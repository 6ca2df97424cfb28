// SPDX-License-Identifier: PMPL-1.0-or-later
//! ARIA usage - WCAG 4.1.2 Name, Role, Value (Level A)
//!
//! Validates correct use of ARIA attributes:
//! - `aria-labelledby`/`aria-describedby` reference existing ids
//! - aria-hidden content contains no focusable elements
//! - `role="button"` on a non-focusable tag comes with a tabindex
//! - Role tokens are defined WAI-ARIA roles

use crate::document::{DocumentModel, NodeId};
use crate::model::{Severity, Violation};

pub const RULE_ID: &str = "aria_usage";

/// Attributes holding id references
const IDREF_ATTRIBUTES: &[&str] = &["aria-labelledby", "aria-describedby"];

/// WAI-ARIA 1.2 roles, including the document-structure and landmark roles
const KNOWN_ROLES: &[&str] = &[
    "alert", "alertdialog", "application", "article", "banner", "blockquote", "button", "caption",
    "cell", "checkbox", "code", "columnheader", "combobox", "complementary", "contentinfo",
    "definition", "deletion", "dialog", "directory", "document", "emphasis", "feed", "figure",
    "form", "generic", "grid", "gridcell", "group", "heading", "img", "insertion", "link", "list",
    "listbox", "listitem", "log", "main", "marquee", "math", "menu", "menubar", "menuitem",
    "menuitemcheckbox", "menuitemradio", "meter", "navigation", "none", "note", "option",
    "paragraph", "presentation", "progressbar", "radio", "radiogroup", "region", "row",
    "rowgroup", "rowheader", "scrollbar", "search", "searchbox", "separator", "slider",
    "spinbutton", "status", "strong", "subscript", "superscript", "switch", "tab", "table",
    "tablist", "tabpanel", "term", "textbox", "time", "timer", "toolbar", "tooltip", "tree",
    "treegrid", "treeitem",
];

fn push(violations: &mut Vec<Violation>, doc: &DocumentModel, id: NodeId, severity: Severity, description: String) {
    violations.push(
        Violation::new(RULE_ID, severity, description)
            .with_criteria(&["4.1.2"])
            .with_element(doc.element_ref(id)),
    );
}

fn check_idrefs(doc: &DocumentModel, id: NodeId, violations: &mut Vec<Violation>) {
    let node = doc.node(id);
    for attr in IDREF_ATTRIBUTES {
        let Some(value) = node.attr(attr) else {
            continue;
        };
        let missing: Vec<&str> = value
            .split_whitespace()
            .filter(|r| doc.element_by_id(r).is_none())
            .collect();
        if !missing.is_empty() {
            push(
                violations,
                doc,
                id,
                Severity::Moderate,
                format!("{} references missing id(s): {}", attr, missing.join(", ")),
            );
        }
    }
}

fn check_hidden_focusable(doc: &DocumentModel, id: NodeId, violations: &mut Vec<Violation>) {
    let node = doc.node(id);
    if !node.is_keyboard_focusable() {
        return;
    }
    let hidden_by = doc
        .self_and_ancestors(id)
        .find(|n| doc.node(*n).attr_is("aria-hidden", "true"));
    if let Some(container) = hidden_by {
        let how = if container == id { "has" } else { "is inside an element with" };
        push(
            violations,
            doc,
            id,
            Severity::Serious,
            format!("Focusable <{}> {} aria-hidden=\"true\"", node.tag, how),
        );
    }
}

fn check_button_role(doc: &DocumentModel, id: NodeId, violations: &mut Vec<Violation>) {
    let node = doc.node(id);
    if node.role().as_deref() == Some("button") && !node.is_natively_focusable() && node.tabindex().is_none() {
        push(
            violations,
            doc,
            id,
            Severity::Moderate,
            format!("<{} role=\"button\"> is not focusable; add tabindex=\"0\"", node.tag),
        );
    }
}

fn check_known_role(doc: &DocumentModel, id: NodeId, violations: &mut Vec<Violation>) {
    let Some(role) = doc.node(id).role() else {
        return;
    };
    if !KNOWN_ROLES.contains(&role.as_str()) {
        push(
            violations,
            doc,
            id,
            Severity::Minor,
            format!("role=\"{}\" is not a WAI-ARIA role", role),
        );
    }
}

pub fn check(doc: &DocumentModel) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (id, _) in doc.elements() {
        check_idrefs(doc, id, &mut violations);
        check_hidden_focusable(doc, id, &mut violations);
        check_button_role(doc, id, &mut violations);
        check_known_role(doc, id, &mut violations);
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(body: &str) -> Vec<Violation> {
        let html = format!("<html lang=\"en\"><body>{}</body></html>", body);
        let doc = DocumentModel::from_html("u", &html, &[], &[]).expect("valid");
        check(&doc)
    }

    #[test]
    fn test_valid_aria() {
        let v = run(
            r#"<h2 id="t">Settings</h2><section aria-labelledby="t" role="region">
               <div role="button" tabindex="0">Save</div>
               <span aria-hidden="true">★</span></section>"#,
        );
        assert!(v.is_empty(), "unexpected: {:?}", v);
    }

    #[test]
    fn test_missing_idref() {
        let v = run(r#"<input type="text" aria-describedby="hint missing"><p id="hint">Hint</p>"#);
        assert_eq!(v.len(), 1);
        assert!(v[0].description.contains("missing"));
        assert_eq!(v[0].severity, Severity::Moderate);
    }

    #[test]
    fn test_hidden_focusable() {
        let v = run(r#"<div aria-hidden="true"><a href="/x">Link</a></div><button aria-hidden="true">X</button>"#);
        assert_eq!(v.len(), 2);
        assert!(v.iter().all(|x| x.severity == Severity::Serious));
    }

    #[test]
    fn test_button_role_and_unknown_role() {
        let v = run(r#"<span role="button">Go</span><div role="buton">Typo</div>"#);
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].severity, Severity::Moderate);
        assert_eq!(v[1].severity, Severity::Minor);
    }
}

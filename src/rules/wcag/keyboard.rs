// SPDX-License-Identifier: PMPL-1.0-or-later
//! Keyboard navigation - WCAG 2.1.1 Keyboard (Level A), 2.4.3 Focus Order (Level A)
//!
//! Checks for keyboard accessibility:
//! - Non-native elements with click handlers are focusable and expose a role
//! - Interactive elements are not removed from the tab order with tabindex="-1"
//! - No positive tabindex values (disrupts natural tab order)

use crate::document::{DocumentModel, Node, NodeId};
use crate::model::{Severity, Violation};

pub const RULE_ID: &str = "keyboard_navigation";

/// Inline handler attributes that imply pointer-only activation
const CLICK_HANDLERS: &[&str] = &["onclick", "onmousedown", "onmouseup", "ondblclick"];

/// Roles that make an element an interactive widget
pub(crate) const INTERACTIVE_ROLES: &[&str] = &[
    "button",
    "checkbox",
    "combobox",
    "gridcell",
    "link",
    "listbox",
    "menuitem",
    "menuitemcheckbox",
    "menuitemradio",
    "option",
    "radio",
    "scrollbar",
    "searchbox",
    "slider",
    "spinbutton",
    "switch",
    "tab",
    "textbox",
    "treeitem",
];

fn has_click_handler(node: &Node) -> bool {
    CLICK_HANDLERS.iter().any(|h| node.has_attr(h))
}

fn has_interactive_role(node: &Node) -> bool {
    node.role().is_some_and(|r| INTERACTIVE_ROLES.contains(&r.as_str()))
}

fn violation(doc: &DocumentModel, id: NodeId, severity: Severity, criterion: &str, description: String) -> Violation {
    Violation::new(RULE_ID, severity, description)
        .with_criteria(&[criterion])
        .with_element(doc.element_ref(id))
}

pub fn check(doc: &DocumentModel) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (id, node) in doc.elements() {
        let tabindex = node.tabindex();

        if has_click_handler(node) && !node.is_natively_focusable() {
            let reachable = tabindex.is_some_and(|t| t >= 0);
            match node.role() {
                None => {
                    let reach = if reachable { "" } else { " and is not keyboard focusable" };
                    violations.push(violation(
                        doc,
                        id,
                        Severity::Serious,
                        "2.1.1",
                        format!("<{}> has a click handler but no role{}", node.tag, reach),
                    ));
                    continue;
                }
                Some(role) if !reachable => {
                    violations.push(violation(
                        doc,
                        id,
                        Severity::Moderate,
                        "2.1.1",
                        format!(
                            "<{} role=\"{}\"> has a click handler but is not reachable with the keyboard (needs tabindex=\"0\")",
                            node.tag, role
                        ),
                    ));
                    continue;
                }
                Some(_) => {}
            }
        }

        if tabindex.is_some_and(|t| t < 0) && (node.is_natively_focusable() || has_interactive_role(node)) {
            violations.push(violation(
                doc,
                id,
                Severity::Moderate,
                "2.1.1",
                format!("Interactive <{}> is removed from the tab order by tabindex=\"-1\"", node.tag),
            ));
        } else if let Some(t) = tabindex.filter(|t| *t > 0) {
            violations.push(violation(
                doc,
                id,
                Severity::Minor,
                "2.4.3",
                format!("<{}> has positive tabindex=\"{}\", which disrupts the natural tab order", node.tag, t),
            ));
        }
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
    fn test_accessible_widgets() {
        let v = run(
            r#"<button onclick="go()">Go</button>
               <div role="button" tabindex="0" onclick="go()">Go</div>
               <a href="/x" onclick="track()">Link</a>"#,
        );
        assert!(v.is_empty(), "unexpected: {:?}", v);
    }

    #[test]
    fn test_click_div_without_role() {
        let v = run(r#"<div onclick="go()">Go</div>"#);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].severity, Severity::Serious);
        assert_eq!(v[0].wcag_criteria, vec!["2.1.1"]);
    }

    #[test]
    fn test_role_without_tabindex() {
        let v = run(r#"<span role="button" onmousedown="go()">Go</span>"#);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].severity, Severity::Moderate);
    }

    #[test]
    fn test_negative_tabindex_on_interactive() {
        let v = run(r#"<button tabindex="-1">Hidden</button><div tabindex="-1">Panel</div>"#);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].severity, Severity::Moderate);
    }

    #[test]
    fn test_positive_tabindex() {
        let v = run(r#"<input type="text" tabindex="3" aria-label="x">"#);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].severity, Severity::Minor);
        assert_eq!(v[0].wcag_criteria, vec!["2.4.3"]);
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
//! Language - WCAG 3.1.1 Language of Page (Level A), 3.1.2 Language of Parts (Level AA)

use crate::document::DocumentModel;
use crate::model::{Severity, Violation};
use regex::Regex;
use std::sync::LazyLock;

pub const RULE_ID: &str = "language_attributes";

/// BCP 47 shape: primary subtag followed by 1-8 character subtags
static LANG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-zA-Z]{2,3}|[a-zA-Z]{5,8}|[xXiI])(?:-[a-zA-Z0-9]{1,8})*$").expect("valid regex")
});

pub fn is_well_formed(lang: &str) -> bool {
    LANG_RE.is_match(lang.trim())
}

pub fn check(doc: &DocumentModel) -> Vec<Violation> {
    let mut violations = Vec::new();
    let root = doc.root();
    let root_node = doc.node(root);

    let lang = root_node
        .attr_non_empty("lang")
        .or_else(|| root_node.attr_non_empty("xml:lang"));
    match lang {
        None => violations.push(
            Violation::new(
                RULE_ID,
                Severity::Serious,
                format!("Document root <{}> has no lang attribute", root_node.tag),
            )
            .with_criteria(&["3.1.1"]),
        ),
        Some(value) if !is_well_formed(value) => violations.push(
            Violation::new(
                RULE_ID,
                Severity::Serious,
                format!("Document language \"{}\" is not a valid language tag", value),
            )
            .with_criteria(&["3.1.1"])
            .with_element(doc.element_ref(root)),
        ),
        Some(_) => {}
    }

    for id in doc.descendants(root) {
        let Some(value) = doc.node(id).attr("lang") else {
            continue;
        };
        // lang="" marks the language as unknown and is allowed
        if value.trim().is_empty() || is_well_formed(value) {
            continue;
        }
        violations.push(
            Violation::new(
                RULE_ID,
                Severity::Moderate,
                format!("lang=\"{}\" is not a valid language tag", value),
            )
            .with_criteria(&["3.1.2"])
            .with_element(doc.element_ref(id)),
        );
    }

    violations
}

// SPDX-License-Identifier: PMPL-1.0-or-later
//! Image alt text - WCAG 1.1.1 Non-text Content (Level A)
//!
//! Checks that images expose a text alternative:
//! - Every `<img>` must have an `alt` attribute (not missing)
//! - `role="img"` and `<input type="image">` need alt, aria-label,
//!   aria-labelledby or title
//! - Alt text must be descriptive (not generic like "image", or a filename)
//! - Decorative images use `alt=""` (empty, not missing)

use crate::document::{DocumentModel, NodeId};
use crate::model::{Severity, Violation};
use regex::Regex;
use std::sync::LazyLock;

pub const RULE_ID: &str = "alt_text";

/// Generic alt text values that indicate lazy/unhelpful descriptions
const GENERIC_ALT_VALUES: &[&str] = &[
    "image",
    "photo",
    "picture",
    "icon",
    "graphic",
    "img",
    "banner",
    "logo",
    "untitled",
    "screenshot",
    "thumbnail",
    "placeholder",
];

static FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\w\-. /]+\.(?:jpe?g|png|gif|svg|webp|bmp|avif|tiff?)$").expect("valid regex")
});

fn is_presentational(doc: &DocumentModel, id: NodeId) -> bool {
    let node = doc.node(id);
    matches!(node.role().as_deref(), Some("presentation") | Some("none"))
        || node.attr_is("aria-hidden", "true")
}

/// Name from ARIA attributes or title
fn has_aria_name(doc: &DocumentModel, id: NodeId) -> bool {
    let node = doc.node(id);
    node.attr_non_empty("aria-label").is_some()
        || node
            .attr_non_empty("aria-labelledby")
            .and_then(|ids| super::referenced_text(doc, ids))
            .is_some()
        || node.attr_non_empty("title").is_some()
}

pub fn check(doc: &DocumentModel) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (id, node) in doc.elements() {
        let tag = node.tag.as_str();
        let is_img = tag == "img";
        let is_image_input = tag == "input" && node.input_type() == "image";
        let is_role_img = !is_img && node.role().as_deref() == Some("img");
        if !(is_img || is_image_input || is_role_img) {
            continue;
        }

        match node.attr("alt") {
            None if is_img => {
                if is_presentational(doc, id) || node.attr_non_empty("aria-label").is_some() {
                    continue;
                }
                if node
                    .attr_non_empty("aria-labelledby")
                    .and_then(|ids| super::referenced_text(doc, ids))
                    .is_some()
                {
                    continue;
                }
                violations.push(
                    Violation::new(
                        RULE_ID,
                        Severity::Critical,
                        "Image is missing an alt attribute. Use alt=\"description\" for informative images or alt=\"\" for decorative ones.",
                    )
                    .with_criteria(&["1.1.1"])
                    .with_element(doc.element_ref(id)),
                );
            }
            None => {
                if has_aria_name(doc, id) || (is_role_img && is_presentational(doc, id)) {
                    continue;
                }
                let what = if is_image_input { "Image button" } else { "Element with role=\"img\"" };
                violations.push(
                    Violation::new(
                        RULE_ID,
                        Severity::Critical,
                        format!("{} has no text alternative (alt, aria-label, aria-labelledby or title)", what),
                    )
                    .with_criteria(&["1.1.1"])
                    .with_element(doc.element_ref(id)),
                );
            }
            Some(alt) if !alt.trim().is_empty() => {
                let alt_lower = alt.trim().to_lowercase();
                if GENERIC_ALT_VALUES.contains(&alt_lower.as_str()) {
                    violations.push(
                        Violation::new(
                            RULE_ID,
                            Severity::Minor,
                            format!("Image has generic alt text \"{}\". Alt text should describe the image content.", alt.trim()),
                        )
                        .with_criteria(&["1.1.1"])
                        .with_element(doc.element_ref(id)),
                    );
                } else if FILENAME_RE.is_match(&alt_lower) {
                    violations.push(
                        Violation::new(
                            RULE_ID,
                            Severity::Minor,
                            format!("Image alt text appears to be a filename: \"{}\"", alt.trim()),
                        )
                        .with_criteria(&["1.1.1"])
                        .with_element(doc.element_ref(id)),
                    );
                }
            }
            Some(_) => {
                // alt="" is valid for decorative images
            }
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
    fn test_missing_alt() {
        let v = run(r#"<img src="a.jpg">"#);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].rule_id, "alt_text");
        assert_eq!(v[0].severity, Severity::Critical);
        assert_eq!(v[0].wcag_criteria, vec!["1.1.1"]);
    }

    #[test]
    fn test_empty_alt_is_valid_decorative() {
        assert!(run(r#"<img src="a.jpg" alt="">"#).is_empty());
    }

    #[test]
    fn test_accessible_images() {
        let v = run(
            r#"<img src="logo.png" alt="Company logo">
               <img src="chart.png" alt="Bar chart showing Q4 revenue growth of 15%">
               <img src="spacer.gif" role="presentation">
               <span role="img" aria-label="Five stars">★★★★★</span>"#,
        );
        assert!(v.is_empty(), "unexpected: {:?}", v);
    }

    #[test]
    fn test_role_img_without_name() {
        let v = run(r#"<div role="img" class="chart"></div><input type="image" src="go.png">"#);
        assert_eq!(v.len(), 2);
        assert!(v.iter().all(|x| x.severity == Severity::Critical));
    }

    #[test]
    fn test_generic_and_filename_alt() {
        let v = run(r#"<img src="p.jpg" alt="photo"><img src="hero.jpg" alt="hero-banner.jpg">"#);
        assert_eq!(v.len(), 2);
        assert!(v.iter().all(|x| x.severity == Severity::Minor));
        assert!(v[1].description.contains("filename"));
    }
}

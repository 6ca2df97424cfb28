// SPDX-License-Identifier: PMPL-1.0-or-later
//! Color contrast - WCAG 1.4.3 Contrast (Minimum), 1.4.6 Contrast (Enhanced)
//!
//! For every element with direct text, resolves the effective foreground
//! (inherited `color`) and background (ancestors' backgrounds composited
//! bottom-up over a white canvas) and compares the ratio against the
//! threshold for the text size.

use crate::contrast::{
    composite, contrast_ratio, extract_color, is_large_text, parse_color, required_ratio, Color,
};
use crate::document::{DocumentModel, NodeId};
use crate::model::{Severity, Violation, WcagLevel};
use crate::units::font_size_px;

pub const RULE_ID: &str = "color_contrast";

/// Elements whose text is never rendered as page content
const SKIPPED_TAGS: &[&str] = &[
    "html", "head", "title", "meta", "script", "style", "noscript", "template", "option", "textarea",
];

/// User-agent default font sizes, in em
fn default_font_scale(tag: &str) -> Option<f64> {
    match tag {
        "h1" => Some(2.0),
        "h2" => Some(1.5),
        "h3" => Some(1.17),
        "h4" => Some(1.0),
        "h5" => Some(0.83),
        "h6" => Some(0.67),
        "small" => Some(0.83),
        _ => None,
    }
}

fn bold_by_default(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "b" | "strong" | "th")
}

/// Background layer declared on an element, if any. `Err` when the
/// background is an image or gradient, which cannot be resolved statically.
fn background_layer(doc: &DocumentModel, id: NodeId) -> Result<Option<Color>, ()> {
    if let Some(image) = doc.style_value(id, "background-image") {
        if image.trim() != "none" {
            return Err(());
        }
    }
    if let Some(color) = doc.style_value(id, "background-color") {
        return Ok(parse_color(color));
    }
    if let Some(shorthand) = doc.style_value(id, "background") {
        let lower = shorthand.to_lowercase();
        if lower.contains("url(") || lower.contains("gradient(") {
            return Err(());
        }
        return Ok(extract_color(&lower));
    }
    Ok(None)
}

/// Effective opaque background behind an element
fn effective_background(doc: &DocumentModel, id: NodeId) -> Option<Color> {
    let mut layers = Vec::new();
    for n in doc.self_and_ancestors(id) {
        match background_layer(doc, n) {
            Err(()) => return None,
            Ok(Some(color)) if !color.is_transparent() => {
                layers.push(color);
                if color.is_opaque() {
                    break;
                }
            }
            Ok(_) => {}
        }
    }
    Some(layers.into_iter().rev().fold(Color::WHITE, |below, layer| composite(layer, below)))
}

fn effective_foreground(doc: &DocumentModel, id: NodeId) -> Color {
    doc.inherited_value(id, "color")
        .and_then(|(_, v)| parse_color(v))
        .unwrap_or(Color::BLACK)
}

/// A declared `font-size`: em and % resolve against the parent size,
/// rem and keywords against the root size
fn resolve_font_size(value: &str, parent_px: f64, base_px: f64) -> Option<f64> {
    let value = value.trim().to_lowercase();
    let root_relative = value.ends_with("rem") || value.starts_with(|c: char| c.is_ascii_alphabetic());
    font_size_px(&value, if root_relative { base_px } else { parent_px })
}

/// Used font size, resolved from the root down. Elements without a
/// declared size inherit their parent's size, scaled by the user-agent
/// default for their tag.
fn font_px(doc: &DocumentModel, id: NodeId, base_px: f64) -> f64 {
    let mut chain: Vec<NodeId> = doc.self_and_ancestors(id).collect();
    chain.reverse();

    let mut size = base_px;
    for n in chain {
        size = match doc.style_value(n, "font-size") {
            // Unresolvable values (inherit, calc(), vw) keep the parent size
            Some(v) => resolve_font_size(v, size, base_px).unwrap_or(size),
            None => default_font_scale(&doc.node(n).tag).map_or(size, |scale| scale * size),
        };
    }
    size
}

fn is_bold(doc: &DocumentModel, id: NodeId) -> bool {
    match doc.inherited_value(id, "font-weight") {
        Some((_, weight)) => {
            let w = weight.trim().to_lowercase();
            w == "bold" || w == "bolder" || w.parse::<u32>().is_ok_and(|n| n >= 700)
        }
        None => doc.self_and_ancestors(id).any(|n| bold_by_default(&doc.node(n).tag)),
    }
}

/// Check every text-bearing element against the contrast threshold for
/// `target` (AAA also reports 1.4.6 failures)
pub fn check(doc: &DocumentModel, target: WcagLevel, base_px: f64) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (id, node) in doc.elements() {
        if node.text.trim().is_empty() || SKIPPED_TAGS.contains(&node.tag.as_str()) {
            continue;
        }
        if doc.is_within(id, "head") || doc.is_rendered_hidden(id) {
            continue;
        }
        let Some(background) = effective_background(doc, id) else {
            continue;
        };
        let foreground = composite(effective_foreground(doc, id), background);
        let ratio = contrast_ratio(foreground, background);

        let size = font_px(doc, id, base_px);
        let large = is_large_text(size, is_bold(doc, id));
        let aa = required_ratio(WcagLevel::AA, large);
        let aaa = required_ratio(WcagLevel::AAA, large);
        let kind = if large { "large" } else { "normal" };

        if ratio < aa {
            violations.push(
                Violation::new(
                    RULE_ID,
                    Severity::Serious,
                    format!(
                        "Contrast ratio {:.2}:1 of {} on {} is below the {}:1 minimum for {} text",
                        ratio,
                        foreground.to_hex(),
                        background.to_hex(),
                        aa,
                        kind
                    ),
                )
                .with_criteria(&["1.4.3"])
                .with_element(doc.element_ref(id)),
            );
        } else if target == WcagLevel::AAA && ratio < aaa {
            violations.push(
                Violation::new(
                    RULE_ID,
                    Severity::Moderate,
                    format!(
                        "Contrast ratio {:.2}:1 of {} on {} meets AA but not the {}:1 enhanced minimum for {} text",
                        ratio,
                        foreground.to_hex(),
                        background.to_hex(),
                        aaa,
                        kind
                    ),
                )
                .with_criteria(&["1.4.6"])
                .with_element(doc.element_ref(id)),
            );
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ElementSpec;

    fn doc_with(p: ElementSpec, body_bg: &str) -> DocumentModel {
        let tree = ElementSpec::new("html")
            .child(ElementSpec::new("body").style("background-color", body_bg).child(p));
        DocumentModel::from_tree("u", tree, Vec::new(), Vec::new()).expect("valid")
    }

    #[test]
    fn test_ratio_near_seven_passes_aaa() {
        let doc = doc_with(ElementSpec::new("p").style("color", "#595959").text("Body copy"), "#FFFFFF");
        assert!(check(&doc, WcagLevel::AA, 16.0).is_empty());
        assert!(check(&doc, WcagLevel::AAA, 16.0).is_empty());
    }

    #[test]
    fn test_light_gray_fails_aa() {
        let doc = doc_with(ElementSpec::new("p").style("color", "#999999").text("Faint"), "#FFFFFF");
        let v = check(&doc, WcagLevel::AA, 16.0);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].severity, Severity::Serious);
        assert_eq!(v[0].wcag_criteria, vec!["1.4.3"]);
        assert_eq!(v[0].elements.len(), 1);
    }

    #[test]
    fn test_large_text_threshold() {
        // #767676 on white is about 4.54:1; #949494 is about 3.03:1
        let large = ElementSpec::new("p")
            .style("color", "#949494")
            .style("font-size", "24px")
            .text("Big");
        assert!(check(&doc_with(large, "#fff"), WcagLevel::AA, 16.0).is_empty());

        let heading = ElementSpec::new("h1").style("color", "#949494").text("Title");
        assert!(check(&doc_with(heading, "#fff"), WcagLevel::AA, 16.0).is_empty());

        let small = ElementSpec::new("p").style("color", "#949494").text("Small");
        assert_eq!(check(&doc_with(small, "#fff"), WcagLevel::AA, 16.0).len(), 1);
    }

    #[test]
    fn test_heading_scale_applies_over_inherited_size() {
        // body declares a size; h1 still renders at 2em and is large text
        let heading = ElementSpec::new("h1").style("color", "#949494").text("Title");
        let tree = ElementSpec::new("html").child(
            ElementSpec::new("body")
                .style("background-color", "#fff")
                .style("font-size", "16px")
                .child(heading),
        );
        let doc = DocumentModel::from_tree("u", tree, Vec::new(), Vec::new()).expect("valid");
        assert!(check(&doc, WcagLevel::AA, 16.0).is_empty());

        // An explicit 1em keeps it at body size, which is normal text
        let sized = ElementSpec::new("h1")
            .style("color", "#949494")
            .style("font-size", "1em")
            .style("font-weight", "normal")
            .text("Title");
        let tree = ElementSpec::new("html").child(
            ElementSpec::new("body")
                .style("background-color", "#fff")
                .style("font-size", "16px")
                .child(sized),
        );
        let doc = DocumentModel::from_tree("u", tree, Vec::new(), Vec::new()).expect("valid");
        assert_eq!(check(&doc, WcagLevel::AA, 16.0).len(), 1);
    }

    #[test]
    fn test_em_sizes_compound() {
        let doc = {
            let tree = ElementSpec::new("body")
                .style("font-size", "20px")
                .child(ElementSpec::new("div").style("font-size", "1.25em").child(ElementSpec::new("p").text("x")));
            DocumentModel::from_tree("u", tree, Vec::new(), Vec::new()).expect("valid")
        };
        assert_eq!(font_px(&doc, NodeId(2), 16.0), 25.0);
        assert_eq!(font_px(&doc, NodeId(0), 16.0), 20.0);
    }

    #[test]
    fn test_enhanced_only_at_aaa() {
        let p = ElementSpec::new("p").style("color", "#767676").text("Mid gray");
        let doc = doc_with(p, "#ffffff");
        assert!(check(&doc, WcagLevel::AA, 16.0).is_empty());
        let v = check(&doc, WcagLevel::AAA, 16.0);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].severity, Severity::Moderate);
        assert_eq!(v[0].wcag_criteria, vec!["1.4.6"]);
    }

    #[test]
    fn test_semi_transparent_background_composited() {
        // 50% black over white is about #808080; white text on it fails AA
        let p = ElementSpec::new("p")
            .style("color", "#fff")
            .style("background-color", "rgba(0, 0, 0, 0.5)")
            .text("Overlay");
        let v = check(&doc_with(p, "#fff"), WcagLevel::AA, 16.0);
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn test_background_image_skipped() {
        let p = ElementSpec::new("p")
            .style("color", "#999")
            .style("background", "url(hero.png) #fff")
            .text("On image");
        assert!(check(&doc_with(p, "#fff"), WcagLevel::AA, 16.0).is_empty());
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
//! CSS rules over resolved declarations
//!
//! Checks:
//! - Font sizes stay readable (WCAG 1.4.4)
//! - Body text line height >= 1.2 (WCAG 1.4.12)
//! - Focus styles do not remove the outline without a replacement (WCAG 2.4.7)
//! - Interactive targets are at least 44px (WCAG 2.5.5)
//! - Fast animations do not combine with large motion (WCAG 2.3.3)
//!
//! Rules read declarations, never layout: a value that cannot be resolved
//! to a number (calc(), var(), viewport units) is skipped rather than
//! guessed.

use crate::config::Thresholds;
use crate::document::query::SimpleSelector;
use crate::document::stylesheet::split_selector_list;
use crate::document::{truncate, DeclarationMap, DocumentModel, StyleRule, StyleTarget};
use crate::model::{ElementRef, Severity, Violation};
use crate::units::{angle_to_deg, font_size_px, length_to_px, parse_number, time_values_ms};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const FONT_SIZE: &str = "font_size";
pub const LINE_HEIGHT: &str = "line_height";
pub const FOCUS_INDICATORS: &str = "focus_indicators";
pub const TOUCH_TARGETS: &str = "touch_targets";
pub const ANIMATION_SAFETY: &str = "animation_safety";

/// Scale factor at or below which a shrinking transform counts as large
const LARGE_SHRINK_FACTOR: f64 = 0.5;

/// Size and optional `/line-height` inside a `font` shorthand
static FONT_SHORTHAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:^|\s)((?:\d*\.)?\d+(?:px|pt|pc|rem|em|%|in|cm|mm|q|ex|ch)|xx-small|x-small|small|medium|large|x-large|xx-large|xxx-large)(?:\s*/\s*(\S+))?\s",
    )
    .expect("valid regex")
});

static KEYFRAMES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)@(?:-webkit-|-moz-)?keyframes\s+([\w-]+)\s*$").expect("valid regex")
});

static TRANSFORM_FN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([a-z0-9]+)\(([^)]*)\)").expect("valid regex"));

/// Tags whose content is running body text
const BODY_TEXT_TAGS: &[&str] = &[
    "body", "main", "article", "section", "p", "li", "dd", "dt", "td", "blockquote", "figcaption",
];

/// Tags that are interactive targets
const INTERACTIVE_TAGS: &[&str] = &["a", "button", "input", "select", "textarea", "summary"];

fn is_keyframe_step(rule: &StyleRule) -> bool {
    rule.context
        .as_deref()
        .is_some_and(|c| c.to_lowercase().contains("keyframes"))
}

fn in_reduced_motion_context(rule: &StyleRule) -> bool {
    rule.context
        .as_deref()
        .is_some_and(|c| c.to_lowercase().contains("prefers-reduced-motion"))
}

/// Location record for a style rule: the element it is resolved on, or
/// the selector with its declaration block
fn rule_ref(doc: &DocumentModel, rule: &StyleRule) -> ElementRef {
    match &rule.target {
        StyleTarget::Element(id) => doc.element_ref(*id),
        StyleTarget::Selector(selector) => {
            let body = rule
                .declarations
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            let block = format!("{} {{ {} }}", selector, body);
            let snippet = match &rule.context {
                Some(ctx) => format!("{} {{ {} }}", ctx, block),
                None => block,
            };
            ElementRef::new(selector.clone(), truncate(&snippet, 160))
        }
    }
}

/// Rules other than keyframe steps, in source order
fn style_rules(doc: &DocumentModel) -> impl Iterator<Item = &StyleRule> {
    doc.resolved_styles().iter().filter(|r| !is_keyframe_step(r))
}

fn font_shorthand(decls: &DeclarationMap) -> Option<(String, Option<String>)> {
    let font = decls.get("font")?;
    let padded = format!("{} ", font);
    let caps = FONT_SHORTHAND_RE.captures(&padded)?;
    Some((caps[1].to_string(), caps.get(2).map(|m| m.as_str().to_string())))
}

fn declared_font_size(decls: &DeclarationMap) -> Option<String> {
    decls
        .get("font-size")
        .cloned()
        .or_else(|| font_shorthand(decls).map(|(size, _)| size))
}

// ============================================================================
// font_size - WCAG 1.4.4
// ============================================================================

pub fn check_font_size(doc: &DocumentModel, t: &Thresholds) -> Vec<Violation> {
    let mut violations = Vec::new();
    for rule in style_rules(doc) {
        let Some(value) = declared_font_size(&rule.declarations) else {
            continue;
        };
        let Some(px) = font_size_px(&value, t.base_font_px) else {
            continue;
        };
        // font-size: 0 hides inter-element whitespace rather than text
        if px <= 0.0 || px >= t.min_font_px {
            continue;
        }
        let severity = if px < t.min_font_px * 0.75 {
            Severity::Serious
        } else {
            Severity::Moderate
        };
        violations.push(
            Violation::new(
                FONT_SIZE,
                severity,
                format!(
                    "font-size {} resolves to {:.1}px, below the {}px minimum",
                    value.trim(),
                    px,
                    t.min_font_px
                ),
            )
            .with_criteria(&["1.4.4"])
            .with_element(rule_ref(doc, rule)),
        );
    }
    violations
}

// ============================================================================
// line_height - WCAG 1.4.12
// ============================================================================

fn is_body_text_target(doc: &DocumentModel, rule: &StyleRule) -> bool {
    match &rule.target {
        StyleTarget::Element(id) => BODY_TEXT_TAGS.contains(&doc.node(*id).tag.as_str()),
        StyleTarget::Selector(selector) => split_selector_list(selector).into_iter().any(|part| {
            SimpleSelector::parse(part)
                .and_then(|sel| sel.tag().map(|tag| BODY_TEXT_TAGS.contains(&tag)))
                .unwrap_or(false)
        }),
    }
}

/// Font size in px that a length line height is relative to
fn reference_font_px(doc: &DocumentModel, rule: &StyleRule, base_px: f64) -> Option<f64> {
    if let Some(size) = declared_font_size(&rule.declarations) {
        return font_size_px(&size, base_px);
    }
    match &rule.target {
        StyleTarget::Element(id) => doc
            .inherited_value(*id, "font-size")
            .and_then(|(_, v)| font_size_px(v, base_px)),
        StyleTarget::Selector(_) => None,
    }
}

/// Line height as a multiple of the font size
fn line_height_ratio(value: &str, font_px: Option<f64>, base_px: f64) -> Option<f64> {
    let value = value.trim().to_lowercase();
    if value == "normal" {
        return None;
    }
    if let Some(n) = parse_number(&value) {
        return Some(n);
    }
    if let Some(pct) = value.strip_suffix('%') {
        return parse_number(pct).map(|p| p / 100.0);
    }
    let font_px = font_px?;
    let px = length_to_px(&value, base_px)?;
    (font_px > 0.0).then(|| px / font_px)
}

pub fn check_line_height(doc: &DocumentModel, t: &Thresholds) -> Vec<Violation> {
    let mut violations = Vec::new();
    for rule in style_rules(doc) {
        if !is_body_text_target(doc, rule) {
            continue;
        }
        let value = match rule.declarations.get("line-height") {
            Some(v) => v.clone(),
            None => match font_shorthand(&rule.declarations).and_then(|(_, lh)| lh) {
                Some(v) => v,
                None => continue,
            },
        };
        let font_px = reference_font_px(doc, rule, t.base_font_px);
        let Some(ratio) = line_height_ratio(&value, font_px, t.base_font_px) else {
            continue;
        };
        if ratio < t.min_line_height {
            violations.push(
                Violation::new(
                    LINE_HEIGHT,
                    Severity::Moderate,
                    format!(
                        "line-height {} ({:.2}x the font size) is below {} for body text",
                        value.trim(),
                        ratio,
                        t.min_line_height
                    ),
                )
                .with_criteria(&["1.4.12"])
                .with_element(rule_ref(doc, rule)),
            );
        }
    }
    violations
}

// ============================================================================
// focus_indicators - WCAG 2.4.7
// ============================================================================

fn is_zero_length(token: &str) -> bool {
    length_to_px(token, 16.0) == Some(0.0)
}

fn removes_outline(decls: &DeclarationMap) -> bool {
    let outline = decls.get("outline").is_some_and(|v| {
        v.split_whitespace()
            .any(|t| t.eq_ignore_ascii_case("none") || is_zero_length(t))
    });
    let style = decls
        .get("outline-style")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("none"));
    let width = decls.get("outline-width").is_some_and(|v| is_zero_length(v.trim()));
    outline || style || width
}

fn has_alternative_indicator(decls: &DeclarationMap) -> bool {
    decls.iter().any(|(prop, value)| {
        let value = value.trim().to_lowercase();
        let visible = !(value == "none" || value == "0" || value == "transparent" || value == "initial");
        let indicator = prop == "box-shadow"
            || prop.starts_with("border")
            || prop.starts_with("background")
            || prop.starts_with("text-decoration");
        indicator && visible
    })
}

pub fn check_focus_indicators(doc: &DocumentModel) -> Vec<Violation> {
    let mut violations = Vec::new();
    for rule in style_rules(doc) {
        let StyleTarget::Selector(selector) = &rule.target else {
            continue;
        };
        if !selector.to_lowercase().contains(":focus") {
            continue;
        }
        if removes_outline(&rule.declarations) && !has_alternative_indicator(&rule.declarations) {
            violations.push(
                Violation::new(
                    FOCUS_INDICATORS,
                    Severity::Serious,
                    format!("\"{}\" removes the focus outline without a visible replacement", selector),
                )
                .with_criteria(&["2.4.7"])
                .with_element(rule_ref(doc, rule)),
            );
        }
    }
    violations
}

// ============================================================================
// touch_targets - WCAG 2.5.5
// ============================================================================

fn is_interactive_selector(part: &str) -> bool {
    let Some(sel) = SimpleSelector::parse(part) else {
        return false;
    };
    let tag = sel.tag().is_some_and(|t| INTERACTIVE_TAGS.contains(&t));
    let role = sel
        .attr_value("role")
        .is_some_and(|r| matches!(r, "button" | "link" | "checkbox" | "radio" | "switch" | "tab" | "menuitem"));
    let class = sel.classes().iter().any(|c| {
        let c = c.to_lowercase();
        c == "btn" || c.starts_with("btn-") || c.ends_with("-btn") || c.contains("button")
    });
    tag || role || class
}

fn is_interactive_target(doc: &DocumentModel, rule: &StyleRule) -> bool {
    match &rule.target {
        StyleTarget::Element(id) => {
            let node = doc.node(*id);
            node.is_natively_focusable()
                || node.role().is_some_and(|r| {
                    super::wcag::keyboard::INTERACTIVE_ROLES.contains(&r.as_str())
                })
        }
        StyleTarget::Selector(selector) => split_selector_list(selector)
            .into_iter()
            .any(is_interactive_selector),
    }
}

/// Largest declared size among `props`, counting only values resolvable
/// without layout
fn declared_dimension(decls: &DeclarationMap, props: &[&str], base_px: f64) -> Option<f64> {
    props
        .iter()
        .filter_map(|p| decls.get(*p))
        .filter(|v| !v.contains('%'))
        .filter_map(|v| length_to_px(v, base_px))
        .reduce(f64::max)
}

pub fn check_touch_targets(doc: &DocumentModel, t: &Thresholds) -> Vec<Violation> {
    let mut violations = Vec::new();
    for rule in style_rules(doc) {
        if !is_interactive_target(doc, rule) {
            continue;
        }
        let width = declared_dimension(&rule.declarations, &["width", "min-width"], t.base_font_px);
        let height = declared_dimension(&rule.declarations, &["height", "min-height"], t.base_font_px);
        // Visually hidden controls (1px clip pattern) are not targets
        if width.unwrap_or(f64::MAX) <= 1.0 && height.unwrap_or(f64::MAX) <= 1.0 {
            continue;
        }
        let small: Vec<String> = [("width", width), ("height", height)]
            .into_iter()
            .filter_map(|(name, v)| v.filter(|px| *px < t.min_touch_target_px).map(|px| format!("{} {:.0}px", name, px)))
            .collect();
        if small.is_empty() {
            continue;
        }
        violations.push(
            Violation::new(
                TOUCH_TARGETS,
                Severity::Moderate,
                format!(
                    "Interactive target is smaller than {}px ({})",
                    t.min_touch_target_px,
                    small.join(", ")
                ),
            )
            .with_criteria(&["2.5.5"])
            .with_element(rule_ref(doc, rule)),
        );
    }
    violations
}

// ============================================================================
// animation_safety - WCAG 2.3.3
// ============================================================================

fn numbers(args: &str) -> impl Iterator<Item = &str> {
    args.split([',', ' ']).map(str::trim).filter(|a| !a.is_empty())
}

fn is_large_scale(value: f64, t: &Thresholds) -> bool {
    value >= t.large_scale_factor || value.abs() <= LARGE_SHRINK_FACTOR
}

fn scale_value(arg: &str) -> Option<f64> {
    match arg.strip_suffix('%') {
        Some(pct) => parse_number(pct).map(|p| p / 100.0),
        None => parse_number(arg),
    }
}

fn translate_px(arg: &str, base_px: f64) -> Option<f64> {
    if arg.contains('%') {
        return None;
    }
    length_to_px(arg, base_px)
}

/// Describe the first large motion in a transform value
fn large_transform(value: &str, t: &Thresholds) -> Option<String> {
    let lower = value.to_lowercase();
    for caps in TRANSFORM_FN_RE.captures_iter(&lower) {
        let func = &caps[1];
        let args = &caps[2];
        let large = match func {
            "scale" | "scalex" | "scaley" | "scalez" | "scale3d" => {
                numbers(args).filter_map(scale_value).any(|v| is_large_scale(v, t))
            }
            "rotate" | "rotatex" | "rotatey" | "rotatez" => {
                angle_to_deg(args).is_some_and(|d| d.abs() >= t.large_rotation_deg)
            }
            "rotate3d" => numbers(args)
                .last()
                .and_then(angle_to_deg)
                .is_some_and(|d| d.abs() >= t.large_rotation_deg),
            "translate" | "translatex" | "translatey" | "translatez" | "translate3d" => numbers(args)
                .filter_map(|a| translate_px(a, t.base_font_px))
                .any(|px| px.abs() >= t.large_translate_px),
            _ => false,
        };
        if large {
            return Some(format!("{}({})", func, args.trim()));
        }
    }
    None
}

/// Large motion declared by `transform` or the individual transform properties
fn large_motion(decls: &DeclarationMap, t: &Thresholds) -> Option<String> {
    if let Some(found) = decls.get("transform").and_then(|v| large_transform(v, t)) {
        return Some(found);
    }
    if let Some(scale) = decls.get("scale") {
        if numbers(scale).filter_map(scale_value).any(|v| is_large_scale(v, t)) {
            return Some(format!("scale: {}", scale.trim()));
        }
    }
    if let Some(rotate) = decls.get("rotate") {
        if numbers(rotate)
            .last()
            .and_then(angle_to_deg)
            .is_some_and(|d| d.abs() >= t.large_rotation_deg)
        {
            return Some(format!("rotate: {}", rotate.trim()));
        }
    }
    if let Some(translate) = decls.get("translate") {
        if numbers(translate)
            .filter_map(|a| translate_px(a, t.base_font_px))
            .any(|px| px.abs() >= t.large_translate_px)
        {
            return Some(format!("translate: {}", translate.trim()));
        }
    }
    None
}

/// Durations of a shorthand's comma-separated items: the first time in each
fn shorthand_durations(value: &str) -> Vec<f64> {
    split_selector_list(value)
        .into_iter()
        .filter_map(|item| time_values_ms(item).first().copied())
        .collect()
}

fn durations(decls: &DeclarationMap, longhand: &str, shorthand: &str) -> Vec<f64> {
    match decls.get(longhand) {
        Some(v) => time_values_ms(v),
        None => decls.get(shorthand).map(|v| shorthand_durations(v)).unwrap_or_default(),
    }
}

/// Keyframe steps by animation name, outside reduced-motion contexts
fn keyframes_by_name(doc: &DocumentModel) -> HashMap<String, Vec<&StyleRule>> {
    let mut map: HashMap<String, Vec<&StyleRule>> = HashMap::new();
    for rule in doc.resolved_styles() {
        if in_reduced_motion_context(rule) {
            continue;
        }
        let Some(name) = rule
            .context
            .as_deref()
            .and_then(|c| KEYFRAMES_RE.captures(c))
            .map(|caps| caps[1].to_string())
        else {
            continue;
        };
        map.entry(name).or_default().push(rule);
    }
    map
}

/// Names of `@keyframes` a rule's animation refers to
fn animation_names<'a>(decls: &'a DeclarationMap, keyframes: &HashMap<String, Vec<&StyleRule>>) -> Vec<&'a str> {
    let source = decls.get("animation-name").or_else(|| decls.get("animation"));
    source
        .map(|v| {
            v.split([',', ' '])
                .map(str::trim)
                .filter(|token| keyframes.contains_key(*token))
                .collect()
        })
        .unwrap_or_default()
}

fn is_fast(durations: &[f64], t: &Thresholds) -> Option<f64> {
    durations
        .iter()
        .copied()
        .filter(|d| *d > 0.0 && *d < t.min_animation_ms)
        .reduce(f64::min)
}

pub fn check_animation_safety(doc: &DocumentModel, t: &Thresholds) -> Vec<Violation> {
    let keyframes = keyframes_by_name(doc);
    let mut violations = Vec::new();

    for rule in style_rules(doc) {
        if in_reduced_motion_context(rule) {
            continue;
        }
        let decls = &rule.declarations;
        let fast_animation = is_fast(&durations(decls, "animation-duration", "animation"), t);
        let fast_transition = is_fast(&durations(decls, "transition-duration", "transition"), t);

        let finding = match (fast_animation, fast_transition) {
            (Some(ms), _) => large_motion(decls, t)
                .or_else(|| {
                    animation_names(decls, &keyframes).into_iter().find_map(|name| {
                        keyframes.get(name).and_then(|steps| {
                            steps
                                .iter()
                                .find_map(|step| large_motion(&step.declarations, t))
                                .map(|m| format!("{} in @keyframes {}", m, name))
                        })
                    })
                })
                .map(|motion| ("Animation", ms, motion)),
            (None, Some(ms)) => large_motion(decls, t).map(|motion| ("Transition", ms, motion)),
            (None, None) => None,
        };

        if let Some((kind, ms, motion)) = finding {
            violations.push(
                Violation::new(
                    ANIMATION_SAFETY,
                    Severity::Moderate,
                    format!(
                        "{} lasting {}ms (under {}ms) drives large motion: {}. Wrap it in a prefers-reduced-motion query.",
                        kind, ms, t.min_animation_ms, motion
                    ),
                )
                .with_criteria(&["2.3.3"])
                .with_element(rule_ref(doc, rule)),
            );
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ElementSpec;

    fn doc_with_css(css: &str, body: &str) -> DocumentModel {
        let html = format!("<html lang=\"en\"><body>{}</body></html>", body);
        DocumentModel::from_html("u", &html, &[css.to_string()], &[]).expect("valid")
    }

    fn t() -> Thresholds {
        Thresholds::default()
    }

    #[test]
    fn test_font_size_units() {
        let doc = doc_with_css(
            ".fine { font-size: 11px } .tiny { font-size: 0.5rem } .ok { font-size: 9pt } .kw { font: x-small sans-serif }",
            "",
        );
        let v = check_font_size(&doc, &t());
        assert_eq!(v.len(), 3);
        assert_eq!(v[0].severity, Severity::Moderate);
        assert_eq!(v[1].severity, Severity::Serious);
        assert_eq!(v[2].elements[0].selector, ".kw");
    }

    #[test]
    fn test_font_size_inline_style() {
        let tree = ElementSpec::new("body").child(ElementSpec::new("p").style("font-size", "10px").text("x"));
        let doc = DocumentModel::from_tree("u", tree, Vec::new(), Vec::new()).expect("valid");
        let v = check_font_size(&doc, &t());
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].elements[0].selector, "body > p");
    }

    #[test]
    fn test_line_height() {
        let doc = doc_with_css(
            "p { line-height: 1.1 } li { line-height: 110% } body { font-size: 16px; line-height: 18px } \
             article { line-height: normal } .badge { line-height: 1 } dd { font: 16px/1 serif }",
            "",
        );
        let v = check_line_height(&doc, &t());
        let selectors: Vec<&str> = v.iter().map(|x| x.elements[0].selector.as_str()).collect();
        assert_eq!(selectors, vec!["p", "li", "body", "dd"]);
    }

    #[test]
    fn test_focus_indicators() {
        let doc = doc_with_css(
            "a:focus { outline: none } button:focus-visible { outline: 0; box-shadow: 0 0 0 3px #06c } \
             .x:focus { outline-style: none; border-color: #000 } input:focus { outline-width: 0 } a { outline: none }",
            "",
        );
        let v = check_focus_indicators(&doc);
        let selectors: Vec<&str> = v.iter().map(|x| x.elements[0].selector.as_str()).collect();
        assert_eq!(selectors, vec!["a:focus", "input:focus"]);
        assert!(v.iter().all(|x| x.severity == Severity::Serious));
    }

    #[test]
    fn test_touch_targets() {
        let doc = doc_with_css(
            ".btn-small { width: 30px; height: 30px } button { min-height: 44px; height: 20px } \
             .icon-button { width: 24px } p { width: 10px } .sr-only { width: 1px; height: 1px } \
             input[type=checkbox] { width: 50% }",
            r#"<a href="/x" style="height: 20px">x</a>"#,
        );
        let v = check_touch_targets(&doc, &t());
        let selectors: Vec<&str> = v.iter().map(|x| x.elements[0].selector.as_str()).collect();
        assert_eq!(selectors.len(), 3);
        assert_eq!(selectors[0], ".btn-small");
        assert_eq!(selectors[1], ".icon-button");
        assert!(selectors[2].ends_with("> a"));
    }

    #[test]
    fn test_animation_with_keyframes() {
        let doc = doc_with_css(
            "@keyframes pulse { from { transform: scale(1) } to { transform: scale(2) } } \
             .pulse { animation: pulse 200ms infinite } \
             .fade { animation: pulse-gentle 200ms } \
             .slow { animation: pulse 2s infinite } \
             .nudge { transition: transform 100ms; transform: translateX(150px) } \
             @media (prefers-reduced-motion: no-preference) { .spin { animation: pulse 100ms; transform: rotate(180deg) } }",
            "",
        );
        let v = check_animation_safety(&doc, &t());
        let selectors: Vec<&str> = v.iter().map(|x| x.elements[0].selector.as_str()).collect();
        assert_eq!(selectors, vec![".pulse", ".nudge"]);
        assert!(v[0].description.contains("@keyframes pulse"));
        assert_eq!(v[0].wcag_criteria, vec!["2.3.3"]);
    }

    #[test]
    fn test_large_transform_detection() {
        let t = t();
        assert!(large_transform("rotate(0.5turn)", &t).is_some());
        assert!(large_transform("scale(0.4)", &t).is_some());
        assert!(large_transform("translate(-120px, 0)", &t).is_some());
        assert!(large_transform("translateY(50%) scale(1.1)", &t).is_none());
        assert!(large_transform("rotate(45deg)", &t).is_none());
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
//! HTML adapter: markup + stylesheets + scripts → [`DocumentModel`].

use super::query::specificity;
use super::stylesheet::{parse_stylesheet, split_selector_list};
use super::{DeclarationMap, DocumentModel, ElementSpec, StyleRule};
use crate::error::{EngineError, Result};
use scraper::{ElementRef, Html, Node as HtmlNode, Selector};
use tracing::debug;

/// A stylesheet selector that takes part in the cascade
struct Matcher {
    selector: Selector,
    specificity: (u32, u32, u32),
    order: usize,
    declarations: DeclarationMap,
}

/// Whether a `<script>` element holds inline JavaScript
fn is_inline_js(el: &ElementRef<'_>) -> bool {
    if el.value().attr("src").is_some() {
        return false;
    }
    match el.value().attr("type") {
        None => true,
        Some(t) => {
            let t = t.trim().to_lowercase();
            t.is_empty() || t == "module" || t.contains("javascript") || t.contains("ecmascript")
        }
    }
}

pub(super) fn build(url: String, html: &str, stylesheets: &[String], scripts: &[String]) -> Result<DocumentModel> {
    if html.trim().is_empty() {
        return Err(EngineError::DocumentModel("HTML source is empty".to_string()));
    }

    let parsed = Html::parse_document(html);

    let style_sel = Selector::parse("style").expect("valid selector");
    let script_sel = Selector::parse("script").expect("valid selector");

    let mut css_sources: Vec<String> = parsed
        .select(&style_sel)
        .map(|el| el.text().collect::<String>())
        .collect();
    css_sources.extend(stylesheets.iter().cloned());

    let mut script_sources: Vec<String> = parsed
        .select(&script_sel)
        .filter(is_inline_js)
        .map(|el| el.text().collect::<String>())
        .filter(|s| !s.trim().is_empty())
        .collect();
    script_sources.extend(scripts.iter().cloned());

    let mut selector_rules = Vec::new();
    let mut matchers = Vec::new();
    for css in &css_sources {
        for rule in parse_stylesheet(css) {
            // Only unconditional, state-free rules cascade onto elements
            if rule.context.is_none() {
                for part in split_selector_list(&rule.selector) {
                    if part.contains(':') {
                        continue;
                    }
                    if let Ok(selector) = Selector::parse(part) {
                        matchers.push(Matcher {
                            selector,
                            specificity: specificity(part),
                            order: matchers.len(),
                            declarations: rule.declarations.clone(),
                        });
                    }
                }
            }
            let mut style = StyleRule::selector(rule.selector, rule.declarations);
            style.context = rule.context;
            selector_rules.push(style);
        }
    }
    matchers.sort_by_key(|m| (m.specificity, m.order));

    debug!(
        "Parsed {} stylesheet rule(s), {} script(s) for {}",
        selector_rules.len(),
        script_sources.len(),
        url
    );

    let root = convert(parsed.root_element(), &matchers);
    DocumentModel::from_tree(url, root, selector_rules, script_sources)
}

/// Convert a scraper element subtree into an [`ElementSpec`]
///
/// Walks with an explicit stack so nesting depth is bounded only by memory.
fn convert(root: ElementRef<'_>, matchers: &[Matcher]) -> ElementSpec {
    let mut stack = vec![open(root, matchers)];
    let mut finished = None;
    while let Some((spec, mut pending)) = stack.pop() {
        match pending.next() {
            Some(child) => {
                stack.push((spec, pending));
                stack.push(open(child, matchers));
            }
            None => match stack.last_mut() {
                Some((parent, _)) => parent.children.push(spec),
                None => finished = Some(spec),
            },
        }
    }
    finished.unwrap_or_default()
}

/// One element's own fields, plus its element children still to convert
fn open<'a>(el: ElementRef<'a>, matchers: &[Matcher]) -> (ElementSpec, std::vec::IntoIter<ElementRef<'a>>) {
    let value = el.value();
    let tag = value.name().to_lowercase();
    let mut spec = ElementSpec::new(&tag);
    spec.attributes = value
        .attrs()
        .map(|(k, v)| (k.to_lowercase(), v.to_string()))
        .collect();

    for m in matchers.iter().filter(|m| m.selector.matches(&el)) {
        spec.cascaded.extend(m.declarations.clone());
    }

    let raw_text = matches!(tag.as_str(), "script" | "style" | "template" | "noscript");
    let mut text = String::new();
    let mut children = Vec::new();
    for child in el.children() {
        match child.value() {
            HtmlNode::Text(t) if !raw_text => {
                text.push(' ');
                text.push_str(t);
            }
            HtmlNode::Element(_) => children.extend(ElementRef::wrap(child)),
            _ => {}
        }
    }
    spec.text = text;
    (spec, children.into_iter())
}

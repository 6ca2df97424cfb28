// SPDX-License-Identifier: PMPL-1.0-or-later
//! Minimal CSS parser producing selector → declaration rules.
//!
//! Handles comments, nested conditional at-rules (`@media`, `@supports`,
//! `@container`, `@layer`) and `@keyframes` blocks. Rules nested in an
//! at-rule carry its prelude as their context. Statement at-rules
//! (`@import`, `@charset`) and descriptor blocks (`@font-face`, `@page`)
//! are skipped.

use super::DeclarationMap;
use regex::Regex;
use std::sync::LazyLock;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));

static IMPORTANT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*!\s*important\s*$").expect("valid regex"));

/// One parsed style rule
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRule {
    /// Selector text, whitespace-normalized
    pub selector: String,
    pub declarations: DeclarationMap,
    /// Enclosing at-rule preludes, outermost first, joined by a space
    pub context: Option<String>,
}

/// Parse a stylesheet into flat rules in source order
pub fn parse_stylesheet(css: &str) -> Vec<ParsedRule> {
    let cleaned = COMMENT_RE.replace_all(css, "");
    let mut rules = Vec::new();
    parse_block(&cleaned, None, &mut rules);
    rules
}

/// Parse the body of a declaration block or a `style` attribute
pub fn parse_declarations(block: &str) -> DeclarationMap {
    let cleaned = COMMENT_RE.replace_all(block, "");
    let mut map = DeclarationMap::new();
    for decl in split_top_level(&cleaned, ';') {
        let Some((prop, value)) = decl.split_once(':') else {
            continue;
        };
        let prop = prop.trim().to_lowercase();
        let value = IMPORTANT_RE.replace(value.trim(), "").trim().to_string();
        if prop.is_empty() || value.is_empty() {
            continue;
        }
        map.insert(prop, value);
    }
    map
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn join_context(outer: Option<&str>, inner: &str) -> String {
    match outer {
        Some(o) => format!("{} {}", o, inner),
        None => inner.to_string(),
    }
}

fn parse_block(css: &str, context: Option<&str>, rules: &mut Vec<ParsedRule>) {
    let bytes = css.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        // Prelude runs to the next `{`, or to `;` for statement at-rules
        let Some(rel) = css[pos..].find(['{', ';', '}']) else {
            break;
        };
        let stop = pos + rel;
        let prelude = normalize_whitespace(&css[pos..stop]);

        if bytes[stop] != b'{' {
            pos = stop + 1;
            continue;
        }

        let Some(end) = find_block_end(css, stop) else {
            break;
        };
        let body = &css[stop + 1..end];
        pos = end + 1;

        if prelude.is_empty() {
            continue;
        }

        let lower = prelude.to_lowercase();
        if lower.starts_with('@') {
            if is_keyframes(&lower) {
                parse_keyframes(body, &join_context(context, &prelude), rules);
            } else if is_conditional(&lower) {
                parse_block(body, Some(&join_context(context, &prelude)), rules);
            }
            continue;
        }

        rules.push(ParsedRule {
            selector: prelude,
            declarations: parse_declarations(body),
            context: context.map(str::to_string),
        });
    }
}

fn parse_keyframes(body: &str, context: &str, rules: &mut Vec<ParsedRule>) {
    let mut steps = Vec::new();
    parse_block(body, None, &mut steps);
    rules.extend(steps.into_iter().map(|step| ParsedRule {
        context: Some(context.to_string()),
        ..step
    }));
}

fn is_keyframes(lower: &str) -> bool {
    lower.starts_with("@keyframes") || lower.starts_with("@-webkit-keyframes") || lower.starts_with("@-moz-keyframes")
}

fn is_conditional(lower: &str) -> bool {
    ["@media", "@supports", "@container", "@layer", "@document", "@scope"]
        .iter()
        .any(|p| lower.starts_with(p))
}

/// Index of the `}` closing the block opened at `open`, skipping quoted strings
fn find_block_end(css: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let bytes = css.as_bytes();
    let mut i = open;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Split on `sep` outside parentheses and quotes
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth -= 1,
                c if c == sep && depth <= 0 => {
                    parts.push(&text[start..i]);
                    start = i + c.len_utf8();
                }
                _ => {}
            },
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Split a selector list on top-level commas
pub fn split_selector_list(selector: &str) -> Vec<&str> {
    split_top_level(selector, ',')
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

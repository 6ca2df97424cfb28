// SPDX-License-Identifier: PMPL-1.0-or-later
//! Compound selector matching over the document arena.
//!
//! Only the last compound of a complex selector is matched (combinators
//! are ignored), so results are a superset of what a browser would
//! select. This is enough to resolve script lookups such as
//! `querySelector('#menu button.primary')` to candidate elements.

use super::Node;
use regex::Regex;
use std::sync::LazyLock;

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\[\s*([\w:-]+)\s*(?:([~|^$*]?=)\s*(?:"([^"]*)"|'([^']*)'|([^\]\s]*))\s*)?(?:\s+[iIsS])?\]"#)
        .expect("valid regex")
});

/// Attribute condition in a compound selector
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrCondition {
    name: String,
    op: Option<String>,
    value: String,
}

/// A compound selector: `tag#id.class[attr=value]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimpleSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
}

impl SimpleSelector {
    /// Parse the last compound of a selector. Returns `None` for
    /// selector lists and for compounds with pseudo-classes other than
    /// state pseudo-classes, which are stripped.
    pub fn parse(selector: &str) -> Option<Self> {
        let selector = selector.trim();
        if selector.is_empty() || selector.contains(',') {
            return None;
        }
        let last = last_compound(selector);
        let last = strip_pseudo(last)?;
        if last.is_empty() {
            return None;
        }

        let mut result = SimpleSelector::default();
        let mut rest = last;

        let tag_len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_' || c == '*'))
            .unwrap_or(rest.len());
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if tag != "*" {
                result.tag = Some(tag.to_lowercase());
            }
            rest = &rest[tag_len..];
        }

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('#') {
                let len = ident_len(after);
                if len == 0 {
                    return None;
                }
                result.id = Some(after[..len].to_string());
                rest = &after[len..];
            } else if let Some(after) = rest.strip_prefix('.') {
                let len = ident_len(after);
                if len == 0 {
                    return None;
                }
                result.classes.push(after[..len].to_string());
                rest = &after[len..];
            } else if rest.starts_with('[') {
                let caps = ATTR_RE.captures(rest)?;
                let whole = caps.get(0)?.len();
                let value = caps
                    .get(3)
                    .or_else(|| caps.get(4))
                    .or_else(|| caps.get(5))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                result.attrs.push(AttrCondition {
                    name: caps[1].to_lowercase(),
                    op: caps.get(2).map(|m| m.as_str().to_string()),
                    value,
                });
                rest = &rest[whole..];
            } else {
                return None;
            }
        }

        Some(result)
    }

    /// Whether a node satisfies every condition of the compound
    pub fn matches(&self, node: &Node) -> bool {
        if let Some(tag) = &self.tag {
            if node.tag != *tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.attr("id") != Some(id.as_str()) {
                return false;
            }
        }
        let classes: Vec<&str> = node.classes().collect();
        if !self.classes.iter().all(|c| classes.contains(&c.as_str())) {
            return false;
        }
        self.attrs.iter().all(|cond| {
            let Some(actual) = node.attr(&cond.name) else {
                return false;
            };
            match cond.op.as_deref() {
                None => true,
                Some("=") => actual == cond.value,
                Some("~=") => actual.split_whitespace().any(|t| t == cond.value),
                Some("|=") => actual == cond.value || actual.starts_with(&format!("{}-", cond.value)),
                Some("^=") => !cond.value.is_empty() && actual.starts_with(&cond.value),
                Some("$=") => !cond.value.is_empty() && actual.ends_with(&cond.value),
                Some("*=") => !cond.value.is_empty() && actual.contains(&cond.value),
                Some(_) => false,
            }
        })
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Value required for an attribute by an `=` condition
    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name && a.op.as_deref() == Some("="))
            .map(|a| a.value.as_str())
    }
}

fn ident_len(s: &str) -> usize {
    s.find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(s.len())
}

/// Text after the last top-level combinator
fn last_compound(selector: &str) -> &str {
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in selector.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth -= 1,
            ' ' | '>' | '+' | '~' if depth == 0 => start = i + c.len_utf8(),
            _ => {}
        }
    }
    selector[start..].trim()
}

/// State pseudo-classes that do not change which element is selected
const STATE_PSEUDOS: &[&str] = &[
    "focus", "focus-visible", "focus-within", "hover", "active", "visited", "link",
    "any-link", "target", "checked", "disabled", "enabled",
];

fn strip_pseudo(compound: &str) -> Option<&str> {
    let Some(idx) = compound.find(':') else {
        return Some(compound);
    };
    let (base, pseudo) = compound.split_at(idx);
    let all_state = pseudo
        .split(':')
        .filter(|p| !p.is_empty())
        .all(|p| STATE_PSEUDOS.contains(&p.to_lowercase().as_str()));
    if all_state {
        Some(base)
    } else {
        None
    }
}

/// Selector specificity as (ids, classes/attributes/pseudo-classes, types)
pub fn specificity(selector: &str) -> (u32, u32, u32) {
    let mut ids = 0;
    let mut classes = 0;
    let mut types = 0;
    let chars: Vec<char> = selector.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '#' => {
                ids += 1;
                i += 1;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '-' || chars[i] == '_') {
                    i += 1;
                }
                continue;
            }
            '.' => classes += 1,
            '[' => {
                classes += 1;
                while i < chars.len() && chars[i] != ']' {
                    i += 1;
                }
            }
            ':' => {
                if chars.get(i + 1) == Some(&':') {
                    types += 1;
                    i += 1;
                } else {
                    classes += 1;
                }
                i += 1;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '-') {
                    i += 1;
                }
                continue;
            }
            c if c.is_alphabetic() => {
                let prev = if i == 0 { ' ' } else { chars[i - 1] };
                if matches!(prev, ' ' | '>' | '+' | '~' | '(' | ',') {
                    types += 1;
                }
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '-' || chars[i] == '_') {
                    i += 1;
                }
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    (ids, classes, types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn node(tag: &str, attrs: &[(&str, &str)]) -> Node {
        Node {
            tag: tag.to_string(),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    #[test]
    fn test_parse_compound() {
        let sel = SimpleSelector::parse("#nav button.primary[type=\"submit\"]").expect("parse");
        assert_eq!(sel.tag(), Some("button"));
        assert_eq!(sel.classes(), &["primary".to_string()]);
        assert_eq!(sel.attr_value("type"), Some("submit"));
    }

    #[test]
    fn test_matches() {
        let sel = SimpleSelector::parse("div.card[role=button]").expect("parse");
        assert!(sel.matches(&node("div", &[("class", "card big"), ("role", "button")])));
        assert!(!sel.matches(&node("div", &[("class", "card")])));
        assert!(!sel.matches(&node("span", &[("class", "card"), ("role", "button")])));
    }

    #[test]
    fn test_id_only() {
        let sel = SimpleSelector::parse("#save").expect("parse");
        assert!(sel.matches(&node("button", &[("id", "save")])));
    }

    #[test]
    fn test_state_pseudo_stripped() {
        let sel = SimpleSelector::parse("a:focus").expect("parse");
        assert_eq!(sel.tag(), Some("a"));
        assert!(SimpleSelector::parse("li:nth-child(2)").is_none());
        assert!(SimpleSelector::parse("a, b").is_none());
    }

    #[test]
    fn test_specificity() {
        assert_eq!(specificity("p"), (0, 0, 1));
        assert_eq!(specificity(".a .b"), (0, 2, 0));
        assert_eq!(specificity("#main p.intro"), (1, 1, 1));
        assert_eq!(specificity("a:hover"), (0, 1, 1));
        assert_eq!(specificity("input[type=text]"), (0, 1, 1));
    }
}

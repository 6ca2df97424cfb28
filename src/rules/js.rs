// SPDX-License-Identifier: PMPL-1.0-or-later
//! JavaScript accessibility checks by static pattern matching
//!
//! Scripts are never executed. Handler registrations, focus calls and DOM
//! mutations are found with regexes that tolerate whitespace and any of
//! the three JS quote styles. The expression a call is made on (its
//! receiver) is recovered by scanning backwards from the call, and simple
//! lookups (`getElementById`, `querySelector`, jQuery `$()`, and variables
//! assigned from them) are resolved against the document.

use crate::document::{truncate, DocumentModel, NodeId};
use crate::model::{ElementRef, Severity, Violation};
use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

pub const KEYBOARD_HANDLERS: &str = "keyboard_handlers";
pub const FOCUS_MANAGEMENT: &str = "focus_management";
pub const DYNAMIC_CONTENT: &str = "dynamic_content";
pub const MOTION_PREFERENCES: &str = "motion_preferences";

/// `.addEventListener('type'` and jQuery `.on('types'`
static LISTENER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\.\s*(?:addEventListener|on|bind)\s*\(\s*['"`]([\w\s.:-]+)['"`]"#).expect("valid regex")
});

/// `.onclick = ...`, `.onkeydown = ...`
static HANDLER_PROP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\s*on(\w+)\s*=(?:[^=]|$)").expect("valid regex"));

/// jQuery shorthand `.click(fn)`, `.keydown(fn)`; bare `.click()` triggers instead
static JQUERY_SHORTHAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.\s*(click|dblclick|mousedown|mouseup|keydown|keyup|keypress)\s*\(\s*[^)\s]").expect("valid regex")
});

static FOCUS_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\s*focus\s*\(\s*\)").expect("valid regex"));

static FOCUS_TRAP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\.\s*key\s*===?\s*['"`]tab['"`]|\.\s*(?:keyCode|which)\s*===?\s*9\b|focus-?trap|createFocusTrap"#,
    )
    .expect("valid regex")
});

static FOCUS_RESTORE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)=\s*document\s*\.\s*activeElement|restore_?focus|return_?focus|previous(?:ly)?_?focus(?:ed)?|last_?focus(?:ed)?",
    )
    .expect("valid regex")
});

static MUTATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\.\s*(?:innerHTML|outerHTML|textContent|innerText)\s*\+?=(?:[^=]|$)|\.\s*(?:appendChild|insertBefore|insertAdjacentHTML|insertAdjacentElement|replaceChildren|replaceWith|append|prepend|html|text)\s*\(\s*[^)\s]",
    )
    .expect("valid regex")
});

static NON_DOM_ASSIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*new\s+(?:FormData|URLSearchParams|Headers)\b")
        .expect("valid regex")
});

static LIVE_UPDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)aria-live|ariaLive|setAttribute\s*\(\s*['"`]role['"`]\s*,\s*['"`](?:status|alert|log)['"`]|\.\s*role\s*=\s*['"`](?:status|alert|log)['"`]"#,
    )
    .expect("valid regex")
});

static REDUCED_MOTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)prefers-reduced-motion").expect("valid regex"));

static SMOOTH_MOTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"behavior\s*:\s*['"`]smooth['"`]|scrollBehavior|\.\s*(?:fadeIn|fadeOut|fadeToggle|fadeTo|slideDown|slideUp|slideToggle)\s*\("#,
    )
    .expect("valid regex")
});

static LARGE_MOTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\.\s*animate\s*\(|requestAnimationFrame\s*\(|\.\s*style\s*\.\s*(?:transform|webkitTransform|animation)\s*=(?:[^=]|$)|\.\s*style\s*\.\s*setProperty\s*\(\s*['"`](?:transform|animation)"#,
    )
    .expect("valid regex")
});

/// `name = document.getElementById(...)` and friends
static LOOKUP_ASSIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:(?:const|let|var)\s+)?([\w$.]+)\s*=\s*(document\s*\.\s*(?:getElementById|querySelector(?:All)?)\s*\(\s*(?:'[^']*'|"[^"]*"|`[^`]*`)\s*\)|\$\(\s*(?:'[^']*'|"[^"]*"|`[^`]*`)\s*\))"#,
    )
    .expect("valid regex")
});

static BY_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^document\.getElementById\((?:'([^']*)'|"([^"]*)"|`([^`]*)`)\)$"#).expect("valid regex")
});

static BY_SELECTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:document\.querySelector(?:All)?|\$)\((?:'([^']*)'|"([^"]*)"|`([^`]*)`)\)$"#)
        .expect("valid regex")
});

const CLICK_EVENTS: &[&str] = &["click", "dblclick", "mousedown", "mouseup"];
const KEY_EVENTS: &[&str] = &["keydown", "keyup", "keypress"];

/// Receivers whose key handlers see every key press on the page
const GLOBAL_RECEIVERS: &[&str] = &[
    "",
    "window",
    "document",
    "document.body",
    "document.documentElement",
    "$(document)",
    "$(window)",
];

// ============================================================================
// Source helpers
// ============================================================================

/// Location of a match as `scripts[i]:line` with the line as snippet
fn location(script: usize, src: &str, byte: usize) -> ElementRef {
    let line = src[..byte].matches('\n').count() + 1;
    let text = src.lines().nth(line - 1).unwrap_or("").trim();
    ElementRef::new(format!("scripts[{}]:{}", script, line), truncate(text, 120))
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// The expression a member access at `dot` is made on, whitespace removed
fn receiver_before(src: &str, dot: usize) -> String {
    let bytes = src.as_bytes();
    let mut i = dot;
    while i > 0 && bytes[i - 1].is_ascii_whitespace() {
        i -= 1;
    }
    let end = i;

    while i > 0 {
        let b = bytes[i - 1];
        if b == b')' || b == b']' {
            let open = if b == b')' { b'(' } else { b'[' };
            let mut depth = 0usize;
            let mut j = i;
            let mut found = None;
            while j > 0 {
                j -= 1;
                if bytes[j] == b {
                    depth += 1;
                } else if bytes[j] == open {
                    depth -= 1;
                    if depth == 0 {
                        found = Some(j);
                        break;
                    }
                }
            }
            match found {
                Some(j) => i = j,
                None => break,
            }
        } else if is_ident_byte(b) || b == b'.' || b == b'?' {
            i -= 1;
        } else if b.is_ascii_whitespace() {
            // Whitespace is only part of the chain around a `.`
            let mut k = i;
            while k > 0 && bytes[k - 1].is_ascii_whitespace() {
                k -= 1;
            }
            let dot_left = k > 0 && bytes[k - 1] == b'.';
            let dot_right = bytes.get(i) == Some(&b'.');
            if dot_left || dot_right {
                i = k;
            } else {
                break;
            }
        } else {
            break;
        }
    }

    src[i..end]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

/// Receiver with quote styles unified, for comparing registrations
fn normalize_receiver(expr: &str) -> String {
    expr.replace(['"', '`'], "'")
}

fn first_group<'t>(caps: &regex::Captures<'t>) -> Option<&'t str> {
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
}

/// Resolves receiver expressions to document elements
struct Lookups<'a> {
    doc: &'a DocumentModel,
    variables: HashMap<String, String>,
}

impl<'a> Lookups<'a> {
    fn new(doc: &'a DocumentModel) -> Self {
        let mut variables = HashMap::new();
        for src in doc.scripts() {
            for caps in LOOKUP_ASSIGN_RE.captures_iter(src) {
                let lookup: String = caps[2].chars().filter(|c| !c.is_whitespace()).collect();
                variables.insert(caps[1].to_string(), lookup);
            }
        }
        Self { doc, variables }
    }

    /// Elements an expression refers to; `None` when it cannot be resolved
    fn resolve(&self, expr: &str) -> Option<Vec<NodeId>> {
        let expr = self.variables.get(expr).map(String::as_str).unwrap_or(expr);
        if let Some(caps) = BY_ID_RE.captures(expr) {
            let id = first_group(&caps)?;
            return Some(self.doc.element_by_id(id).into_iter().collect());
        }
        if let Some(caps) = BY_SELECTOR_RE.captures(expr) {
            return self.doc.query_simple(first_group(&caps)?);
        }
        None
    }
}

// ============================================================================
// keyboard_handlers - WCAG 2.1.1
// ============================================================================

struct Registration {
    script: usize,
    pos: usize,
    receiver: String,
}

/// Click and key handler registrations across all scripts
fn handler_registrations(doc: &DocumentModel) -> (Vec<Registration>, HashSet<String>) {
    let mut clicks = Vec::new();
    let mut keys = HashSet::new();

    for (idx, src) in doc.scripts().iter().enumerate() {
        let mut record = |pos: usize, events: &[&str], keys: &mut HashSet<String>| {
            let receiver = receiver_before(src, pos);
            if events.iter().any(|e| KEY_EVENTS.contains(e)) {
                keys.insert(normalize_receiver(&receiver));
            }
            if events.iter().any(|e| CLICK_EVENTS.contains(e)) {
                clicks.push(Registration { script: idx, pos, receiver });
            }
        };

        for caps in LISTENER_RE.captures_iter(src) {
            let events: Vec<String> = caps[1].split_whitespace().map(|e| e.split('.').next().unwrap_or("").to_lowercase()).collect();
            let events: Vec<&str> = events.iter().map(String::as_str).collect();
            record(caps.get(0).map_or(0, |m| m.start()), &events, &mut keys);
        }
        for caps in HANDLER_PROP_RE.captures_iter(src) {
            let event = caps[1].to_lowercase();
            record(caps.get(0).map_or(0, |m| m.start()), &[event.as_str()], &mut keys);
        }
        for caps in JQUERY_SHORTHAND_RE.captures_iter(src) {
            let event = caps[1].to_string();
            record(caps.get(0).map_or(0, |m| m.start()), &[event.as_str()], &mut keys);
        }
    }

    (clicks, keys)
}

pub fn check_keyboard_handlers(doc: &DocumentModel) -> Vec<Violation> {
    let (clicks, keys) = handler_registrations(doc);
    if GLOBAL_RECEIVERS.iter().any(|g| keys.contains(*g)) {
        return Vec::new();
    }
    let lookups = Lookups::new(doc);
    // Key handlers compare by element when the receiver resolves, by text otherwise
    let key_targets: HashSet<NodeId> = keys
        .iter()
        .filter_map(|k| lookups.resolve(k))
        .flatten()
        .collect();
    let mut violations = Vec::new();

    for reg in clicks {
        let normalized = normalize_receiver(&reg.receiver);
        if GLOBAL_RECEIVERS.contains(&normalized.as_str()) || keys.contains(&normalized) {
            continue;
        }
        let targets = lookups.resolve(&reg.receiver).unwrap_or_default();
        if targets.iter().any(|id| key_targets.contains(id)) {
            continue;
        }
        // Native controls already fire click on Enter/Space
        let native = !targets.is_empty() && targets.iter().all(|id| doc.node(*id).is_natively_focusable());
        if native {
            continue;
        }
        let src = &doc.scripts()[reg.script];
        violations.push(
            Violation::new(
                KEYBOARD_HANDLERS,
                Severity::Serious,
                format!("Click handler on `{}` has no matching keyboard handler", reg.receiver),
            )
            .with_criteria(&["2.1.1"])
            .with_element(location(reg.script, src, reg.pos)),
        );
    }
    violations
}

// ============================================================================
// focus_management - WCAG 2.4.3
// ============================================================================

pub fn check_focus_management(doc: &DocumentModel) -> Vec<Violation> {
    let lookups = Lookups::new(doc);
    let mut violations = Vec::new();

    for (idx, src) in doc.scripts().iter().enumerate() {
        if let Some(trap) = FOCUS_TRAP_RE.find(src) {
            if !FOCUS_RESTORE_RE.is_match(src) {
                violations.push(
                    Violation::new(
                        FOCUS_MANAGEMENT,
                        Severity::Moderate,
                        "Focus is trapped (Tab handling) but never restored to the previously focused element",
                    )
                    .with_criteria(&["2.4.3"])
                    .with_element(location(idx, src, trap.start())),
                );
            }
        }

        for m in FOCUS_CALL_RE.find_iter(src) {
            let receiver = receiver_before(src, m.start());
            let Some(ids) = lookups.resolve(&receiver) else {
                continue;
            };
            let problem = if ids.is_empty() {
                "matches no element in the document"
            } else if ids.iter().any(|id| doc.node(*id).is_programmatically_focusable()) {
                continue;
            } else {
                "is not focusable (add tabindex=\"-1\")"
            };
            violations.push(
                Violation::new(
                    FOCUS_MANAGEMENT,
                    Severity::Moderate,
                    format!("`{}.focus()` target {}", receiver, problem),
                )
                .with_criteria(&["2.4.3"])
                .with_element(location(idx, src, m.start())),
            );
        }
    }
    violations
}

// ============================================================================
// dynamic_content - WCAG 4.1.3
// ============================================================================

/// Ids of live regions in the document
fn live_region_ids(doc: &DocumentModel) -> Vec<&str> {
    doc.elements()
        .filter(|(_, n)| {
            let live = n.attr_non_empty("aria-live").is_some_and(|v| !v.eq_ignore_ascii_case("off"));
            let role = n
                .role()
                .is_some_and(|r| matches!(r.as_str(), "status" | "alert" | "log" | "marquee" | "timer"));
            live || role || n.tag == "output"
        })
        .filter_map(|(_, n)| n.id())
        .collect()
}

/// Whether `src` names `id` as a whole token after a quote or `#`
fn references_id(src: &str, id: &str) -> bool {
    src.match_indices(id).any(|(pos, _)| {
        let before = src[..pos].chars().next_back();
        let after = src[pos + id.len()..].chars().next();
        let opens = matches!(before, Some('\'' | '"' | '`' | '#'));
        let closes = after.map_or(true, |c| !(c.is_alphanumeric() || c == '-' || c == '_'));
        opens && closes
    })
}

/// `append`/`prepend` on form data, query params or headers builds a request, not the page
fn appends_to_non_dom(src: &str, m: &regex::Match<'_>, non_dom: &HashSet<&str>) -> bool {
    let method = m.as_str().trim_start_matches(|c: char| c == '.' || c.is_whitespace());
    if !(method.starts_with("append") || method.starts_with("prepend")) || method.starts_with("appendChild") {
        return false;
    }
    let receiver = receiver_before(src, m.start());
    non_dom.contains(receiver.as_str())
        || receiver.ends_with("searchParams")
        || ["FormData(", "URLSearchParams(", "Headers("]
            .iter()
            .any(|ctor| receiver.starts_with(ctor))
}

pub fn check_dynamic_content(doc: &DocumentModel) -> Vec<Violation> {
    let live_ids = live_region_ids(doc);
    let mut violations = Vec::new();

    for (idx, src) in doc.scripts().iter().enumerate() {
        let mut lines = BTreeSet::new();
        let non_dom: HashSet<&str> = NON_DOM_ASSIGN_RE
            .captures_iter(src)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect();
        let elements: Vec<ElementRef> = MUTATION_RE
            .find_iter(src)
            .filter(|m| !appends_to_non_dom(src, m, &non_dom))
            .map(|m| location(idx, src, m.start()))
            .filter(|loc| lines.insert(loc.selector.clone()))
            .collect();
        if elements.is_empty() {
            continue;
        }
        if LIVE_UPDATE_RE.is_match(src) || live_ids.iter().any(|id| references_id(src, id)) {
            continue;
        }
        violations.push(
            Violation::new(
                DYNAMIC_CONTENT,
                Severity::Moderate,
                format!(
                    "Script updates page content in {} place(s) without announcing changes through a live region",
                    elements.len()
                ),
            )
            .with_criteria(&["4.1.3"])
            .with_elements(elements),
        );
    }
    violations
}

// ============================================================================
// motion_preferences - WCAG 2.3.3
// ============================================================================

pub fn check_motion_preferences(doc: &DocumentModel) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (idx, src) in doc.scripts().iter().enumerate() {
        if REDUCED_MOTION_RE.is_match(src) {
            continue;
        }
        let kinds = [
            (&*LARGE_MOTION_RE, Severity::Moderate, "Script animates transforms or runs an animation loop"),
            (&*SMOOTH_MOTION_RE, Severity::Minor, "Script uses smooth scrolling or fade effects"),
        ];
        for (re, severity, what) in kinds {
            let mut lines = BTreeSet::new();
            let elements: Vec<ElementRef> = re
                .find_iter(src)
                .map(|m| location(idx, src, m.start()))
                .filter(|loc| lines.insert(loc.selector.clone()))
                .collect();
            if elements.is_empty() {
                continue;
            }
            violations.push(
                Violation::new(
                    MOTION_PREFERENCES,
                    severity,
                    format!("{} without checking prefers-reduced-motion", what),
                )
                .with_criteria(&["2.3.3"])
                .with_elements(elements),
            );
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_js(body: &str, js: &str) -> DocumentModel {
        let html = format!("<html lang=\"en\"><body>{}</body></html>", body);
        DocumentModel::from_html("u", &html, &[], &[js.to_string()]).expect("valid")
    }

    #[test]
    fn test_receiver_before() {
        let src = "document.getElementById( \"menu\" )\n    .addEventListener('click', f)";
        let pos = src.find(".addEventListener").expect("present");
        assert_eq!(receiver_before(src, pos), "document.getElementById(\"menu\")");
        let src = "if (ok) card.onclick = go;";
        let pos = src.find(".onclick").expect("present");
        assert_eq!(receiver_before(src, pos), "card");
    }

    #[test]
    fn test_click_without_key_handler() {
        let doc = doc_with_js(
            r#"<div id="card">Card</div><button id="save">Save</button>"#,
            r#"
const card = document.getElementById('card');
card.addEventListener("click", open);
document.getElementById(`save`).addEventListener('click', save);
$('.tile').on('click', open);
"#,
        );
        let v = check_keyboard_handlers(&doc);
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].severity, Severity::Serious);
        assert_eq!(v[0].elements[0].selector, "scripts[0]:3");
        assert!(v[1].description.contains("$('.tile')"));
    }

    #[test]
    fn test_key_handler_on_same_target() {
        let doc = doc_with_js(
            r#"<div id="card" role="button" tabindex="0">Card</div>"#,
            r#"
card.onclick = open;
card.onkeydown = (e) => { if (e.key === 'Enter') open(); };
$(".tile").on("click keydown", open);
"#,
        );
        assert!(check_keyboard_handlers(&doc).is_empty());
    }

    #[test]
    fn test_key_handler_through_variable_alias() {
        let doc = doc_with_js(
            r#"<div id="card" role="button" tabindex="0">Card</div><div id="tile">Tile</div>"#,
            r#"
const card = document.getElementById('card');
card.addEventListener('click', open);
document.getElementById("card").addEventListener('keydown', onKey);
const tile = document.querySelector('#tile');
tile.addEventListener('click', open);
document.querySelector('#card').addEventListener('keyup', onKey);
"#,
        );
        let v = check_keyboard_handlers(&doc);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].elements[0].selector, "scripts[0]:6");
    }

    #[test]
    fn test_global_key_handler_covers_clicks() {
        let doc = doc_with_js("", "el.addEventListener('click', f);\ndocument.addEventListener('keydown', k);");
        assert!(check_keyboard_handlers(&doc).is_empty());
    }

    #[test]
    fn test_focus_targets() {
        let doc = doc_with_js(
            r#"<div id="panel">Panel</div><div id="dialog" tabindex="-1"></div><input id="name">"#,
            r#"
document.getElementById('panel').focus();
document.getElementById("dialog").focus();
const field = document.querySelector('#name');
field.focus();
document.getElementById('ghost').focus();
this.target.focus();
"#,
        );
        let v = check_focus_management(&doc);
        assert_eq!(v.len(), 2);
        assert!(v[0].description.contains("not focusable"));
        assert!(v[1].description.contains("no element"));
    }

    #[test]
    fn test_focus_trap_without_restore() {
        let trap = "modal.addEventListener('keydown', e => { if (e.key === 'Tab') { e.preventDefault(); first.focus(); } });";
        let v = check_focus_management(&doc_with_js("", trap));
        assert_eq!(v.len(), 1);
        assert!(v[0].description.contains("restored"));

        let restored = format!("const previousFocus = document.activeElement;\n{}", trap);
        assert!(check_focus_management(&doc_with_js("", &restored)).is_empty());
    }

    #[test]
    fn test_dynamic_content() {
        let js = "list.innerHTML = items.join('');\nlist.appendChild(row);\nif (a == b) {}";
        let v = check_dynamic_content(&doc_with_js("", js));
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].elements.len(), 2);

        let announced = format!("{}\nstatus.setAttribute('aria-live', 'polite');", js);
        assert!(check_dynamic_content(&doc_with_js("", &announced)).is_empty());

        let referenced = format!("{}\ndocument.getElementById('msg').textContent = 'Saved';", js);
        let body = r#"<p id="msg" role="status"></p>"#;
        assert!(check_dynamic_content(&doc_with_js(body, &referenced)).is_empty());
    }

    #[test]
    fn test_live_region_id_must_match_whole() {
        let body = r#"<p id="msg" role="status"></p><p id="msg-old"></p>"#;
        let js = "document.querySelector('#msg-old').textContent = 'Saved';";
        let v = check_dynamic_content(&doc_with_js(body, js));
        assert_eq!(v.len(), 1);

        let exact = "document.querySelector('#msg').textContent = 'Saved';";
        assert!(check_dynamic_content(&doc_with_js(body, exact)).is_empty());

        assert!(references_id("getElementById(\"msg\")", "msg"));
        assert!(!references_id("getElementById('msg_2')", "msg"));
        assert!(!references_id("const msg = 1;", "msg"));
    }

    #[test]
    fn test_request_builders_are_not_mutations() {
        let js = r#"
const data = new FormData(form);
data.append('name', value);
let params = new URLSearchParams();
params.append("page", 2);
url.searchParams.append('q', term);
new FormData(form).append('extra', 1);
fetch('/save', { method: 'POST', body: data });
"#;
        assert!(check_dynamic_content(&doc_with_js("", js)).is_empty());

        let mixed = format!("{}
list.append(row);", js);
        let v = check_dynamic_content(&doc_with_js("", &mixed));
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].elements.len(), 1);
    }

    #[test]
    fn test_motion_preferences() {
        let js = "el.animate([{transform: 'scale(1)'}], 200);\nwindow.scrollTo({ top: 0, behavior: 'smooth' });";
        let v = check_motion_preferences(&doc_with_js("", js));
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].severity, Severity::Moderate);
        assert_eq!(v[1].severity, Severity::Minor);

        let guarded = format!(
            "if (!window.matchMedia('(prefers-reduced-motion: reduce)').matches) {{\n{}\n}}",
            js
        );
        assert!(check_motion_preferences(&doc_with_js("", &guarded)).is_empty());
    }
}

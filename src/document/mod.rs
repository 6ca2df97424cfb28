// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document Model: the normalized page snapshot every rule reads.
//!
//! A document is an arena of element nodes in pre-order (index order is
//! document order), a list of resolved style rules keyed by element or
//! selector, and the page's script sources. It is immutable once built;
//! rules only ever see `&DocumentModel`.
//!
//! Two adapters build it:
//! - [`DocumentModel::from_html`] parses markup with `scraper`, collects
//!   `<style>`/`<script>` bodies, and cascades matched selector rules
//!   onto elements.
//! - [`DocumentModel::from_tree`] accepts an already-structured tree, as
//!   produced by browser automation that serializes computed styles.

mod html;
pub mod query;
pub mod stylesheet;

use crate::error::{EngineError, Result};
use crate::model::ElementRef;
use query::SimpleSelector;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Property → value, properties lowercased
pub type DeclarationMap = BTreeMap<String, String>;

/// Index of a node in its document's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// One element of the DOM tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Lowercased tag name
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    /// Direct text content, whitespace-collapsed
    pub text: String,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

/// Tags that are focusable without a tabindex
const NATIVELY_FOCUSABLE: &[&str] = &["button", "select", "textarea", "iframe", "summary", "embed", "object"];

impl Node {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Attribute value when present and not blank
    pub fn attr_non_empty(&self, name: &str) -> Option<&str> {
        self.attr(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Whether an attribute equals a value, ignoring case and padding
    pub fn attr_is(&self, name: &str, value: &str) -> bool {
        self.attr(name).is_some_and(|v| v.trim().eq_ignore_ascii_case(value))
    }

    pub fn id(&self) -> Option<&str> {
        self.attr_non_empty("id")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    /// First token of the `role` attribute, lowercased
    pub fn role(&self) -> Option<String> {
        self.attr("role")
            .and_then(|r| r.split_whitespace().next())
            .map(str::to_lowercase)
    }

    /// Parsed `tabindex`, if present and numeric
    pub fn tabindex(&self) -> Option<i32> {
        self.attr("tabindex").and_then(|t| t.trim().parse().ok())
    }

    /// Lowercased `type` of an `<input>`, defaulting to "text"
    pub fn input_type(&self) -> String {
        self.attr("type").map(|t| t.trim().to_lowercase()).unwrap_or_else(|| "text".to_string())
    }

    pub fn is_disabled(&self) -> bool {
        self.has_attr("disabled")
    }

    /// Focusable by default, before tabindex is considered
    pub fn is_natively_focusable(&self) -> bool {
        let tag = self.tag.as_str();
        let native = match tag {
            "a" | "area" => self.has_attr("href"),
            "input" => self.input_type() != "hidden",
            "audio" | "video" => self.has_attr("controls"),
            _ => NATIVELY_FOCUSABLE.contains(&tag),
        };
        let editable = self
            .attr("contenteditable")
            .is_some_and(|v| !v.trim().eq_ignore_ascii_case("false"));
        (native && !self.is_disabled()) || editable
    }

    /// Reachable with the Tab key
    pub fn is_keyboard_focusable(&self) -> bool {
        match self.tabindex() {
            Some(t) if t < 0 => false,
            Some(_) => !self.is_disabled(),
            None => self.is_natively_focusable(),
        }
    }

    /// Focusable from script (`tabindex="-1"` counts)
    pub fn is_programmatically_focusable(&self) -> bool {
        self.is_natively_focusable() || (self.tabindex().is_some() && !self.is_disabled())
    }

    /// Opening tag with attributes, e.g. `<img src="a.jpg">`
    pub fn opening_tag(&self) -> String {
        let attrs: String = self
            .attributes
            .iter()
            .map(|(k, v)| {
                if v.is_empty() && k != "alt" {
                    format!(" {}", k)
                } else {
                    format!(" {}=\"{}\"", k, v)
                }
            })
            .collect();
        format!("<{}{}>", self.tag, attrs)
    }
}

/// What a style rule applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleTarget {
    /// Declarations resolved on one element
    Element(NodeId),
    /// Declarations of a stylesheet rule
    Selector(String),
}

/// Resolved declarations for one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    pub target: StyleTarget,
    pub declarations: DeclarationMap,
    /// Enclosing at-rule preludes (`@media ...`, `@keyframes name`)
    #[serde(default)]
    pub context: Option<String>,
}

impl StyleRule {
    pub fn selector(selector: impl Into<String>, declarations: DeclarationMap) -> Self {
        Self {
            target: StyleTarget::Selector(selector.into()),
            declarations,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations.get(property).map(String::as_str)
    }
}

/// Input tree for [`DocumentModel::from_tree`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub children: Vec<ElementSpec>,
    /// Styles resolved on this element by the caller
    #[serde(default)]
    pub style: DeclarationMap,
    /// Declarations cascaded from matched stylesheet rules; only used for
    /// inheritance lookups and never reported as the element's own styles
    #[serde(skip)]
    pub(crate) cascaded: DeclarationMap,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.style.insert(property.to_lowercase(), value.to_string());
        self
    }
}

/// The normalized page snapshot
#[derive(Debug, Clone, Serialize)]
pub struct DocumentModel {
    url: String,
    nodes: Vec<Node>,
    root: NodeId,
    resolved_styles: Vec<StyleRule>,
    scripts: Vec<String>,
    #[serde(skip)]
    computed: HashMap<NodeId, DeclarationMap>,
    #[serde(skip)]
    ids: HashMap<String, NodeId>,
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl DocumentModel {
    /// Build from HTML markup plus external stylesheet and script sources
    pub fn from_html(
        url: impl Into<String>,
        html: &str,
        stylesheets: &[String],
        scripts: &[String],
    ) -> Result<Self> {
        html::build(url.into(), html, stylesheets, scripts)
    }

    /// Build from a structured tree. `styles` may hold selector rules and
    /// element rules whose ids index the pre-order flattening of `root`.
    pub fn from_tree(
        url: impl Into<String>,
        root: ElementSpec,
        styles: Vec<StyleRule>,
        scripts: Vec<String>,
    ) -> Result<Self> {
        let mut nodes: Vec<Node> = Vec::new();
        let mut element_styles: Vec<StyleRule> = Vec::new();
        let mut computed: HashMap<NodeId, DeclarationMap> = HashMap::new();

        // Iterative pre-order walk; children pushed in reverse so they pop in order
        let mut stack: Vec<(ElementSpec, Option<NodeId>)> = vec![(root, None)];
        while let Some((mut spec, parent)) = stack.pop() {
            let tag = spec.tag.trim().to_lowercase();
            if tag.is_empty() {
                return Err(EngineError::DocumentModel(format!(
                    "element {} has an empty tag name",
                    nodes.len()
                )));
            }
            let id = NodeId(nodes.len());

            let mut declared = spec
                .attributes
                .get("style")
                .map(|s| stylesheet::parse_declarations(s))
                .unwrap_or_default();
            declared.extend(std::mem::take(&mut spec.style));

            let mut cascade = std::mem::take(&mut spec.cascaded);
            cascade.extend(declared.clone());
            if !cascade.is_empty() {
                computed.insert(id, cascade);
            }
            if !declared.is_empty() {
                element_styles.push(StyleRule {
                    target: StyleTarget::Element(id),
                    declarations: declared,
                    context: None,
                });
            }

            if let Some(p) = parent {
                nodes[p.0].children.push(id);
            }
            nodes.push(Node {
                tag,
                attributes: spec
                    .attributes
                    .into_iter()
                    .map(|(k, v)| (k.to_lowercase(), v))
                    .collect(),
                text: collapse_whitespace(&spec.text),
                children: Vec::new(),
                parent,
            });

            for child in spec.children.into_iter().rev() {
                stack.push((child, Some(id)));
            }
        }

        let mut resolved_styles = styles;
        for rule in &resolved_styles {
            if let StyleTarget::Element(id) = &rule.target {
                if id.0 >= nodes.len() {
                    return Err(EngineError::DocumentModel(format!(
                        "style rule targets element {} but the document has {} elements",
                        id.0,
                        nodes.len()
                    )));
                }
                let entry = computed.entry(*id).or_default();
                entry.extend(rule.declarations.clone());
            }
        }
        resolved_styles.extend(element_styles);

        let mut ids = HashMap::new();
        for (idx, node) in nodes.iter().enumerate() {
            if let Some(id) = node.id() {
                ids.entry(id.to_string()).or_insert(NodeId(idx));
            }
        }

        let doc = Self {
            url: url.into(),
            nodes,
            root: NodeId(0),
            resolved_styles,
            scripts,
            computed,
            ids,
        };
        doc.validate()?;
        Ok(doc)
    }

    /// Check structural invariants every rule relies on
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() || self.root.0 >= self.nodes.len() {
            return Err(EngineError::DocumentModel("document has no root element".to_string()));
        }
        if self.nodes[self.root.0].parent.is_some() {
            return Err(EngineError::DocumentModel("root element has a parent".to_string()));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if node.tag.is_empty() {
                return Err(EngineError::DocumentModel(format!("element {} has an empty tag name", idx)));
            }
            let dangling = node.children.iter().chain(node.parent.iter()).any(|c| c.0 >= self.nodes.len());
            if dangling {
                return Err(EngineError::DocumentModel(format!("element {} references a missing node", idx)));
            }
        }
        for rule in &self.resolved_styles {
            if let StyleTarget::Element(id) = rule.target {
                if id.0 >= self.nodes.len() {
                    return Err(EngineError::DocumentModel(format!(
                        "style rule targets missing element {}",
                        id.0
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by id. Ids are only ever produced by this document.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// All elements in document order
    pub fn elements(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Elements with a given tag, in document order
    pub fn elements_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = (NodeId, &'a Node)> + 'a {
        self.elements().filter(move |(_, n)| n.tag == tag)
    }

    /// First element carrying an `id` attribute
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id.trim()).copied()
    }

    /// Ancestors from parent up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).parent, move |p| self.node(*p).parent)
    }

    /// The node followed by its ancestors
    pub fn self_and_ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::once(id).chain(self.ancestors(id))
    }

    /// Descendants in document order (not including the node itself)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.node(n).children.iter().rev().copied());
        }
        out
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let parts = std::iter::once(id)
            .chain(self.descendants(id))
            .map(|n| self.node(n).text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>();
        parts.join(" ")
    }

    /// Whether the node or an ancestor has this tag
    pub fn is_within(&self, id: NodeId, tag: &str) -> bool {
        self.self_and_ancestors(id).any(|n| self.node(n).tag == tag)
    }

    pub fn resolved_styles(&self) -> &[StyleRule] {
        &self.resolved_styles
    }

    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// Declarations applying to the node itself (cascade plus own styles)
    pub fn computed_style(&self, id: NodeId) -> Option<&DeclarationMap> {
        self.computed.get(&id)
    }

    /// Value of a property on the node itself
    pub fn style_value(&self, id: NodeId, property: &str) -> Option<&str> {
        self.computed_style(id)
            .and_then(|s| s.get(property))
            .map(String::as_str)
    }

    /// Value of an inherited property: nearest declaration on the node
    /// or its ancestors, skipping `inherit`
    pub fn inherited_value(&self, id: NodeId, property: &str) -> Option<(NodeId, &str)> {
        self.self_and_ancestors(id).find_map(|n| {
            self.style_value(n, property)
                .filter(|v| !v.trim().eq_ignore_ascii_case("inherit"))
                .map(|v| (n, v))
        })
    }

    /// Hidden from rendering by `hidden`, `display: none` or
    /// `visibility: hidden` on the node or an ancestor
    pub fn is_rendered_hidden(&self, id: NodeId) -> bool {
        self.self_and_ancestors(id).any(|n| {
            let node = self.node(n);
            node.has_attr("hidden")
                || self.style_value(n, "display").is_some_and(|d| d.trim() == "none")
                || self.style_value(n, "visibility").is_some_and(|v| v.trim() == "hidden")
        })
    }

    /// Elements matching a compound selector; `None` when the selector is
    /// outside the supported subset
    pub fn query_simple(&self, selector: &str) -> Option<Vec<NodeId>> {
        let sel = SimpleSelector::parse(selector)?;
        Some(
            self.elements()
                .filter(|(_, n)| sel.matches(n))
                .map(|(id, _)| id)
                .collect(),
        )
    }

    /// Short CSS path for reporting, anchored at the nearest id
    pub fn selector_for(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        for n in self.self_and_ancestors(id) {
            let node = self.node(n);
            if let Some(elem_id) = node.id() {
                segments.push(format!("{}#{}", node.tag, elem_id));
                break;
            }
            let mut segment = node.tag.clone();
            let classes: Vec<&str> = node.classes().collect();
            if !classes.is_empty() {
                segment.push('.');
                segment.push_str(&classes.join("."));
            } else if let Some(parent) = node.parent {
                let siblings = &self.node(parent).children;
                let same_tag: Vec<&NodeId> = siblings.iter().filter(|s| self.node(**s).tag == node.tag).collect();
                if same_tag.len() > 1 {
                    let pos = same_tag.iter().position(|s| **s == n).unwrap_or(0) + 1;
                    segment.push_str(&format!(":nth-of-type({})", pos));
                }
            }
            segments.push(segment);
            if segments.len() >= 4 {
                break;
            }
        }
        segments.reverse();
        segments.join(" > ")
    }

    /// Opening tag excerpt, truncated for reports
    pub fn snippet(&self, id: NodeId) -> String {
        truncate(&self.node(id).opening_tag(), 160)
    }

    /// Location record for a violation
    pub fn element_ref(&self, id: NodeId) -> ElementRef {
        ElementRef::new(self.selector_for(id), self.snippet(id))
    }
}

/// Truncate on a character boundary, marking the cut with an ellipsis
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentModel {
        let tree = ElementSpec::new("html").attr("lang", "en").child(
            ElementSpec::new("body")
                .style("background-color", "#fff")
                .child(ElementSpec::new("h1").text("  Title  "))
                .child(
                    ElementSpec::new("p")
                        .attr("id", "intro")
                        .attr("style", "color: #333")
                        .text("Hello")
                        .child(ElementSpec::new("a").attr("href", "/x").text("link")),
                ),
        );
        DocumentModel::from_tree("https://example.test/", tree, Vec::new(), Vec::new())
            .expect("valid tree")
    }

    #[test]
    fn test_preorder_arena() {
        let doc = sample();
        let tags: Vec<&str> = doc.elements().map(|(_, n)| n.tag.as_str()).collect();
        assert_eq!(tags, vec!["html", "body", "h1", "p", "a"]);
        assert_eq!(doc.node(NodeId(2)).text, "Title");
        assert_eq!(doc.node(NodeId(1)).children, vec![NodeId(2), NodeId(3)]);
        assert_eq!(doc.node(NodeId(4)).parent, Some(NodeId(3)));
    }

    #[test]
    fn test_styles_and_inheritance() {
        let doc = sample();
        assert_eq!(doc.style_value(NodeId(3), "color"), Some("#333"));
        let (from, value) = doc.inherited_value(NodeId(4), "background-color").expect("inherited");
        assert_eq!(from, NodeId(1));
        assert_eq!(value, "#fff");
        let element_rules = doc
            .resolved_styles()
            .iter()
            .filter(|r| matches!(r.target, StyleTarget::Element(_)))
            .count();
        assert_eq!(element_rules, 2);
    }

    #[test]
    fn test_lookup_helpers() {
        let doc = sample();
        assert_eq!(doc.element_by_id("intro"), Some(NodeId(3)));
        assert_eq!(doc.text_content(NodeId(3)), "Hello link");
        assert_eq!(doc.query_simple("a[href]"), Some(vec![NodeId(4)]));
        assert_eq!(doc.selector_for(NodeId(4)), "p#intro > a");
        assert!(doc.node(NodeId(4)).is_keyboard_focusable());
    }

    #[test]
    fn test_empty_tag_rejected() {
        let tree = ElementSpec::new("html").child(ElementSpec::new(" "));
        let err = DocumentModel::from_tree("u", tree, Vec::new(), Vec::new()).expect_err("empty tag");
        assert!(matches!(err, EngineError::DocumentModel(_)));
    }

    #[test]
    fn test_out_of_range_style_target_rejected() {
        let styles = vec![StyleRule {
            target: StyleTarget::Element(NodeId(9)),
            declarations: DeclarationMap::new(),
            context: None,
        }];
        let err = DocumentModel::from_tree("u", ElementSpec::new("html"), styles, Vec::new())
            .expect_err("bad target");
        assert!(matches!(err, EngineError::DocumentModel(_)));
    }

    #[test]
    fn test_focusability() {
        let button = ElementSpec::new("button");
        let doc = DocumentModel::from_tree("u", ElementSpec::new("div").attr("tabindex", "-1").child(button), Vec::new(), Vec::new())
            .expect("valid");
        assert!(!doc.node(NodeId(0)).is_keyboard_focusable());
        assert!(doc.node(NodeId(0)).is_programmatically_focusable());
        assert!(doc.node(NodeId(1)).is_keyboard_focusable());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 3), "abc…");
    }
}

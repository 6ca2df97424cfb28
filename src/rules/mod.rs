// SPDX-License-Identifier: PMPL-1.0-or-later
//! Rule catalog.
//!
//! Every rule is a pure function of a [`DocumentModel`] returning the
//! violations it found. Rules are grouped by the input they read:
//! - [`wcag`]: DOM structure and computed colors
//! - [`css`]: resolved style declarations
//! - [`js`]: static matching over script sources
//!
//! [`default_rules`] builds the full catalog as [`RuleDescriptor`]s, with
//! configuration captured by each rule's closure.

pub mod css;
pub mod js;
pub mod wcag;

use crate::config::EngineConfig;
use crate::document::DocumentModel;
use crate::error::Result;
use crate::model::{Severity, Violation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Output of a single rule evaluation
pub type RuleResult = Result<Vec<Violation>>;

/// A rule's evaluate function
pub type EvaluateFn = Arc<dyn Fn(&DocumentModel) -> RuleResult + Send + Sync>;

/// Which part of the document a rule reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Wcag,
    Css,
    Js,
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleCategory::Wcag => write!(f, "wcag"),
            RuleCategory::Css => write!(f, "css"),
            RuleCategory::Js => write!(f, "js"),
        }
    }
}

impl std::str::FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wcag" => Ok(RuleCategory::Wcag),
            "css" => Ok(RuleCategory::Css),
            "js" | "javascript" => Ok(RuleCategory::Js),
            other => Err(format!("Unknown rule category: {}", other)),
        }
    }
}

/// A registered rule
#[derive(Clone)]
pub struct RuleDescriptor {
    pub id: String,
    pub category: RuleCategory,
    /// Severity the rule usually reports; individual findings may differ
    pub default_severity: Severity,
    pub wcag_criteria: Vec<String>,
    pub evaluate: EvaluateFn,
}

impl RuleDescriptor {
    pub fn new<F>(
        id: &str,
        category: RuleCategory,
        default_severity: Severity,
        wcag_criteria: &[&str],
        evaluate: F,
    ) -> Self
    where
        F: Fn(&DocumentModel) -> RuleResult + Send + Sync + 'static,
    {
        Self {
            id: id.to_string(),
            category,
            default_severity,
            wcag_criteria: wcag_criteria.iter().map(|c| c.to_string()).collect(),
            evaluate: Arc::new(evaluate),
        }
    }

    /// Build from an infallible check
    fn infallible<F>(
        id: &str,
        category: RuleCategory,
        default_severity: Severity,
        wcag_criteria: &[&str],
        check: F,
    ) -> Self
    where
        F: Fn(&DocumentModel) -> Vec<Violation> + Send + Sync + 'static,
    {
        Self::new(id, category, default_severity, wcag_criteria, move |doc| Ok(check(doc)))
    }

    /// Run the rule against a document
    pub fn evaluate(&self, doc: &DocumentModel) -> RuleResult {
        (self.evaluate)(doc)
    }
}

impl std::fmt::Debug for RuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleDescriptor")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("default_severity", &self.default_severity)
            .field("wcag_criteria", &self.wcag_criteria)
            .finish_non_exhaustive()
    }
}

/// The full rule catalog, minus rules disabled in `config`
pub fn default_rules(config: &EngineConfig) -> Vec<RuleDescriptor> {
    use RuleCategory::{Css, Js, Wcag};
    use Severity::{Critical, Minor, Moderate, Serious};

    let level = config.target_level;
    let t = config.thresholds.clone();
    let base_px = t.base_font_px;

    let font = t.clone();
    let line = t.clone();
    let touch = t.clone();
    let anim = t;

    let rules = vec![
        RuleDescriptor::infallible(wcag::color_contrast::RULE_ID, Wcag, Serious, &["1.4.3", "1.4.6"], move |doc| {
            wcag::color_contrast::check(doc, level, base_px)
        }),
        RuleDescriptor::infallible(wcag::alt_text::RULE_ID, Wcag, Critical, &["1.1.1"], wcag::alt_text::check),
        RuleDescriptor::infallible(wcag::headings::RULE_ID, Wcag, Serious, &["1.3.1"], wcag::headings::check),
        RuleDescriptor::infallible(wcag::forms::RULE_ID, Wcag, Serious, &["1.3.1", "3.3.2"], wcag::forms::check),
        RuleDescriptor::infallible(wcag::keyboard::RULE_ID, Wcag, Serious, &["2.1.1"], wcag::keyboard::check),
        RuleDescriptor::infallible(wcag::links::RULE_ID, Wcag, Moderate, &["2.4.4", "2.4.9"], wcag::links::check),
        RuleDescriptor::infallible(wcag::language::RULE_ID, Wcag, Serious, &["3.1.1", "3.1.2"], wcag::language::check),
        RuleDescriptor::infallible(wcag::aria::RULE_ID, Wcag, Moderate, &["4.1.2"], wcag::aria::check),
        RuleDescriptor::infallible(css::FONT_SIZE, Css, Moderate, &["1.4.4"], move |doc| {
            css::check_font_size(doc, &font)
        }),
        RuleDescriptor::infallible(css::LINE_HEIGHT, Css, Moderate, &["1.4.12"], move |doc| {
            css::check_line_height(doc, &line)
        }),
        RuleDescriptor::infallible(css::FOCUS_INDICATORS, Css, Serious, &["2.4.7"], css::check_focus_indicators),
        RuleDescriptor::infallible(css::TOUCH_TARGETS, Css, Moderate, &["2.5.5"], move |doc| {
            css::check_touch_targets(doc, &touch)
        }),
        RuleDescriptor::infallible(css::ANIMATION_SAFETY, Css, Moderate, &["2.3.3"], move |doc| {
            css::check_animation_safety(doc, &anim)
        }),
        RuleDescriptor::infallible(js::KEYBOARD_HANDLERS, Js, Serious, &["2.1.1"], js::check_keyboard_handlers),
        RuleDescriptor::infallible(js::FOCUS_MANAGEMENT, Js, Moderate, &["2.4.3"], js::check_focus_management),
        RuleDescriptor::infallible(js::DYNAMIC_CONTENT, Js, Moderate, &["4.1.3"], js::check_dynamic_content),
        RuleDescriptor::infallible(js::MOTION_PREFERENCES, Js, Minor, &["2.3.3"], js::check_motion_preferences),
    ];

    rules
        .into_iter()
        .filter(|r| !config.is_disabled(&r.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_catalog_ids_unique() {
        let rules = default_rules(&EngineConfig::default());
        assert_eq!(rules.len(), 17);
        let ids: HashSet<&str> = rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), rules.len());
        assert_eq!(rules.iter().filter(|r| r.category == RuleCategory::Css).count(), 5);
        assert_eq!(rules.iter().filter(|r| r.category == RuleCategory::Js).count(), 4);
    }

    #[test]
    fn test_disabled_rules_skipped() {
        let config = EngineConfig {
            disabled_rules: vec!["alt_text".to_string(), "font_size".to_string()],
            ..EngineConfig::default()
        };
        let rules = default_rules(&config);
        assert_eq!(rules.len(), 15);
        assert!(rules.iter().all(|r| r.id != "alt_text" && r.id != "font_size"));
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("CSS".parse::<RuleCategory>(), Ok(RuleCategory::Css));
        assert_eq!("javascript".parse::<RuleCategory>(), Ok(RuleCategory::Js));
        assert!("html".parse::<RuleCategory>().is_err());
        assert_eq!(RuleCategory::Wcag.to_string(), "wcag");
    }
}

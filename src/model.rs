// SPDX-License-Identifier: PMPL-1.0-or-later
//! Output records shared by every rule: severities, WCAG levels,
//! violations and the lighter pass/incomplete entries.
//!
//! The `Violation` shape is read structurally by report generators and
//! historical trend comparisons, so field names are part of the public
//! contract.

use crate::criteria;
use serde::{Deserialize, Serialize};

/// Severity of a violation, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Cosmetic or best-practice issue
    Minor,
    /// Noticeable barrier with a workaround
    Moderate,
    /// Significant barrier for some users
    Serious,
    /// Blocks access to content entirely
    Critical,
}

impl Severity {
    /// Every severity, most severe first
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::Serious,
        Severity::Moderate,
        Severity::Minor,
    ];

    /// Points deducted from the compliance score per violation
    pub fn weight(self) -> f64 {
        match self {
            Severity::Critical => 10.0,
            Severity::Serious => 5.0,
            Severity::Moderate => 2.0,
            Severity::Minor => 0.5,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Minor => write!(f, "minor"),
            Severity::Moderate => write!(f, "moderate"),
            Severity::Serious => write!(f, "serious"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minor" => Ok(Severity::Minor),
            "moderate" => Ok(Severity::Moderate),
            "serious" => Ok(Severity::Serious),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("Unknown severity: {}", other)),
        }
    }
}

/// WCAG conformance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WcagLevel {
    /// Level A - minimum conformance
    A,
    /// Level AA - standard conformance
    AA,
    /// Level AAA - enhanced conformance
    AAA,
}

impl std::fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WcagLevel::A => write!(f, "A"),
            WcagLevel::AA => write!(f, "AA"),
            WcagLevel::AAA => write!(f, "AAA"),
        }
    }
}

impl std::str::FromStr for WcagLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(WcagLevel::A),
            "AA" => Ok(WcagLevel::AA),
            "AAA" => Ok(WcagLevel::AAA),
            other => Err(format!("Unknown WCAG level: {}", other)),
        }
    }
}

/// Location of an offending element: a CSS-style path plus a short
/// source excerpt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRef {
    pub selector: String,
    pub snippet: String,
}

impl ElementRef {
    pub fn new(selector: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            snippet: snippet.into(),
        }
    }
}

/// A detected non-compliance with one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule identifier (e.g. "alt_text")
    pub rule_id: String,
    pub severity: Severity,
    /// WCAG success criteria cited (e.g. "1.1.1")
    pub wcag_criteria: Vec<String>,
    pub description: String,
    /// Link to the WCAG Understanding document for the first criterion
    pub help_url: String,
    /// Offending elements; empty for page-level findings
    pub elements: Vec<ElementRef>,
}

impl Violation {
    /// Create a new violation
    pub fn new(rule_id: &str, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            wcag_criteria: Vec::new(),
            description: description.into(),
            help_url: String::new(),
            elements: Vec::new(),
        }
    }

    /// Set the cited WCAG criteria; the help URL follows the first one
    pub fn with_criteria(mut self, criteria: &[&str]) -> Self {
        self.wcag_criteria = criteria.iter().map(|c| c.to_string()).collect();
        if let Some(url) = criteria.first().and_then(|c| criteria::help_url(c)) {
            self.help_url = url;
        }
        self
    }

    /// Override the help URL
    pub fn with_help_url(mut self, url: &str) -> Self {
        self.help_url = url.to_string();
        self
    }

    /// Attach an offending element
    pub fn with_element(mut self, element: ElementRef) -> Self {
        self.elements.push(element);
        self
    }

    /// Attach several offending elements
    pub fn with_elements(mut self, elements: impl IntoIterator<Item = ElementRef>) -> Self {
        self.elements.extend(elements);
        self
    }

    /// Lowest conformance level among the cited criteria
    pub fn level(&self) -> Option<WcagLevel> {
        self.wcag_criteria
            .iter()
            .filter_map(|c| criteria::level_of(c))
            .min()
    }

    /// Whether the violation describes the page rather than elements
    pub fn is_page_level(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A rule that ran and found nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pass {
    pub rule_id: String,
    pub note: String,
}

/// A rule that could not complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incomplete {
    pub rule_id: String,
    pub message: String,
}

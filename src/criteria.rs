// SPDX-License-Identifier: PMPL-1.0-or-later
//! WCAG 2.1 success criteria cited by the rule catalog.
//!
//! Maps a criterion number to its conformance level and the slug of its
//! W3C "Understanding" document, which becomes a violation's help URL.

use crate::model::WcagLevel;

/// One WCAG success criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Criterion {
    pub id: &'static str,
    pub name: &'static str,
    pub level: WcagLevel,
    slug: &'static str,
}

const UNDERSTANDING_BASE: &str = "https://www.w3.org/WAI/WCAG21/Understanding";

const CRITERIA: &[Criterion] = &[
    Criterion { id: "1.1.1", name: "Non-text Content", level: WcagLevel::A, slug: "non-text-content" },
    Criterion { id: "1.3.1", name: "Info and Relationships", level: WcagLevel::A, slug: "info-and-relationships" },
    Criterion { id: "1.4.3", name: "Contrast (Minimum)", level: WcagLevel::AA, slug: "contrast-minimum" },
    Criterion { id: "1.4.4", name: "Resize Text", level: WcagLevel::AA, slug: "resize-text" },
    Criterion { id: "1.4.6", name: "Contrast (Enhanced)", level: WcagLevel::AAA, slug: "contrast-enhanced" },
    Criterion { id: "1.4.8", name: "Visual Presentation", level: WcagLevel::AAA, slug: "visual-presentation" },
    Criterion { id: "1.4.12", name: "Text Spacing", level: WcagLevel::AA, slug: "text-spacing" },
    Criterion { id: "2.1.1", name: "Keyboard", level: WcagLevel::A, slug: "keyboard" },
    Criterion { id: "2.3.1", name: "Three Flashes or Below Threshold", level: WcagLevel::A, slug: "three-flashes-or-below-threshold" },
    Criterion { id: "2.3.3", name: "Animation from Interactions", level: WcagLevel::AAA, slug: "animation-from-interactions" },
    Criterion { id: "2.4.3", name: "Focus Order", level: WcagLevel::A, slug: "focus-order" },
    Criterion { id: "2.4.4", name: "Link Purpose (In Context)", level: WcagLevel::A, slug: "link-purpose-in-context" },
    Criterion { id: "2.4.6", name: "Headings and Labels", level: WcagLevel::AA, slug: "headings-and-labels" },
    Criterion { id: "2.4.7", name: "Focus Visible", level: WcagLevel::AA, slug: "focus-visible" },
    Criterion { id: "2.4.9", name: "Link Purpose (Link Only)", level: WcagLevel::AAA, slug: "link-purpose-link-only" },
    Criterion { id: "2.5.5", name: "Target Size", level: WcagLevel::AAA, slug: "target-size" },
    Criterion { id: "3.1.1", name: "Language of Page", level: WcagLevel::A, slug: "language-of-page" },
    Criterion { id: "3.1.2", name: "Language of Parts", level: WcagLevel::AA, slug: "language-of-parts" },
    Criterion { id: "3.3.2", name: "Labels or Instructions", level: WcagLevel::A, slug: "labels-or-instructions" },
    Criterion { id: "4.1.2", name: "Name, Role, Value", level: WcagLevel::A, slug: "name-role-value" },
    Criterion { id: "4.1.3", name: "Status Messages", level: WcagLevel::AA, slug: "status-messages" },
];

/// Look up a criterion by number
pub fn lookup(id: &str) -> Option<&'static Criterion> {
    CRITERIA.iter().find(|c| c.id == id.trim())
}

/// Conformance level of a criterion
pub fn level_of(id: &str) -> Option<WcagLevel> {
    lookup(id).map(|c| c.level)
}

/// Understanding-document URL of a criterion
pub fn help_url(id: &str) -> Option<String> {
    lookup(id).map(|c| format!("{}/{}.html", UNDERSTANDING_BASE, c.slug))
}

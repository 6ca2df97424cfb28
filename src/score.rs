// SPDX-License-Identifier: PMPL-1.0-or-later
//! Severity classification and compliance scoring.
//!
//! The score starts at 100 and loses a fixed weight per violation
//! (critical 10, serious 5, moderate 2, minor 0.5), clamped to [0, 100].
//! It is computed from counts, so it depends only on the violation
//! multiset.
//!
//! The achieved level is the highest level whose criteria are all free of
//! violations: a violation counts against the lowest level among the
//! criteria it cites, and violations citing no known criterion are ignored.

use crate::model::{Severity, Violation, WcagLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// WCAG level a page achieves
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AchievedLevel {
    #[serde(rename = "none")]
    None,
    A,
    AA,
    AAA,
}

impl std::fmt::Display for AchievedLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AchievedLevel::None => write!(f, "none"),
            AchievedLevel::A => write!(f, "A"),
            AchievedLevel::AA => write!(f, "AA"),
            AchievedLevel::AAA => write!(f, "AAA"),
        }
    }
}

/// Aggregate view of a run's violations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Count per severity; every severity is present
    pub by_severity: BTreeMap<Severity, usize>,
    /// 0.0 to 100.0
    pub compliance_score: f64,
    pub wcag_level: AchievedLevel,
}

impl Summary {
    pub fn from_violations(violations: &[Violation]) -> Self {
        let by_severity = severity_counts(violations);
        Self {
            compliance_score: compliance_score(&by_severity),
            wcag_level: achieved_level(violations),
            by_severity,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.by_severity.values().sum()
    }
}

/// Violations per severity, with zero entries for absent severities
pub fn severity_counts(violations: &[Violation]) -> BTreeMap<Severity, usize> {
    let mut counts: BTreeMap<Severity, usize> = Severity::ALL.iter().map(|s| (*s, 0)).collect();
    for v in violations {
        *counts.entry(v.severity).or_insert(0) += 1;
    }
    counts
}

/// Weighted score from severity counts, clamped to [0, 100]
pub fn compliance_score(counts: &BTreeMap<Severity, usize>) -> f64 {
    let deducted: f64 = counts
        .iter()
        .map(|(severity, count)| severity.weight() * *count as f64)
        .sum();
    (100.0 - deducted).clamp(0.0, 100.0)
}

/// Highest conformance level not contradicted by a violation
pub fn achieved_level(violations: &[Violation]) -> AchievedLevel {
    match violations.iter().filter_map(Violation::level).min() {
        None => AchievedLevel::AAA,
        Some(WcagLevel::AAA) => AchievedLevel::AA,
        Some(WcagLevel::AA) => AchievedLevel::A,
        Some(WcagLevel::A) => AchievedLevel::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn v(severity: Severity, criterion: &str) -> Violation {
        Violation::new("rule", severity, "x").with_criteria(&[criterion])
    }

    #[test]
    fn test_no_violations() {
        let summary = Summary::from_violations(&[]);
        assert_eq!(summary.compliance_score, 100.0);
        assert_eq!(summary.wcag_level, AchievedLevel::AAA);
        assert_eq!(summary.by_severity.len(), 4);
        assert_eq!(summary.total(), 0);
    }

    #[test]
    fn test_weights() {
        let violations = vec![
            v(Severity::Critical, "1.1.1"),
            v(Severity::Serious, "1.4.3"),
            v(Severity::Moderate, "2.4.4"),
            v(Severity::Minor, "1.1.1"),
        ];
        let summary = Summary::from_violations(&violations);
        assert_eq!(summary.compliance_score, 82.5);
        assert_eq!(summary.count(Severity::Serious), 1);
    }

    #[test]
    fn test_score_clamped() {
        let violations: Vec<Violation> = (0..20).map(|_| v(Severity::Critical, "1.1.1")).collect();
        assert_eq!(Summary::from_violations(&violations).compliance_score, 0.0);
    }

    #[test]
    fn test_achieved_level() {
        assert_eq!(achieved_level(&[v(Severity::Moderate, "1.4.6")]), AchievedLevel::AA);
        assert_eq!(achieved_level(&[v(Severity::Serious, "1.4.3")]), AchievedLevel::A);
        assert_eq!(achieved_level(&[v(Severity::Critical, "1.1.1")]), AchievedLevel::None);
        assert_eq!(achieved_level(&[v(Severity::Minor, "9.9.9")]), AchievedLevel::AAA);

        let mixed = Violation::new("r", Severity::Serious, "x").with_criteria(&["1.4.6", "1.4.3"]);
        assert_eq!(achieved_level(&[mixed]), AchievedLevel::A);
    }

    #[test]
    fn test_achieved_level_is_highest_clean_level() {
        let aa_only = [v(Severity::Serious, "1.4.3"), v(Severity::Moderate, "2.4.7")];
        assert_eq!(achieved_level(&aa_only), AchievedLevel::A);

        let with_aaa = [v(Severity::Serious, "1.4.3"), v(Severity::Moderate, "1.4.6")];
        assert_eq!(achieved_level(&with_aaa), AchievedLevel::A);

        let with_a = [v(Severity::Moderate, "1.4.6"), v(Severity::Critical, "1.1.1")];
        assert_eq!(achieved_level(&with_a), AchievedLevel::None);
    }

    #[test]
    fn test_level_serializes_as_string() {
        assert_eq!(serde_json::to_string(&AchievedLevel::None).expect("json"), "\"none\"");
        assert_eq!(serde_json::to_string(&AchievedLevel::AA).expect("json"), "\"AA\"");
    }

    fn severity_strategy() -> impl Strategy<Value = Severity> {
        prop_oneof![
            Just(Severity::Minor),
            Just(Severity::Moderate),
            Just(Severity::Serious),
            Just(Severity::Critical),
        ]
    }

    proptest! {
        #[test]
        fn prop_score_in_range(severities in prop::collection::vec(severity_strategy(), 0..60)) {
            let violations: Vec<Violation> = severities.iter().map(|s| v(*s, "2.4.4")).collect();
            let score = Summary::from_violations(&violations).compliance_score;
            prop_assert!((0.0..=100.0).contains(&score));
        }

        #[test]
        fn prop_score_order_independent(severities in prop::collection::vec(severity_strategy(), 0..40)) {
            let forward: Vec<Violation> = severities.iter().map(|s| v(*s, "1.4.3")).collect();
            let mut reversed = forward.clone();
            reversed.reverse();
            prop_assert_eq!(
                Summary::from_violations(&forward),
                Summary::from_violations(&reversed)
            );
        }
    }
}

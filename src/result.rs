// SPDX-License-Identifier: PMPL-1.0-or-later
//! Result assembly.
//!
//! [`ResultAssembler`] collects per-rule outcomes while a run is in
//! progress; [`ResultAssembler::finish`] orders them, derives the summary
//! and freezes everything into a [`TestResult`].

use crate::model::{Incomplete, Pass, Violation};
use crate::rules::RuleResult;
use crate::score::Summary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use uuid::Uuid;

/// Outcome of evaluating one document. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    run_id: Uuid,
    url: String,
    evaluated_at: DateTime<Utc>,
    violations: Vec<Violation>,
    passes: Vec<Pass>,
    incomplete: Vec<Incomplete>,
    summary: Summary,
}

impl TestResult {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn evaluated_at(&self) -> DateTime<Utc> {
        self.evaluated_at
    }

    /// Violations, most severe first, then by rule id
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    pub fn incomplete(&self) -> &[Incomplete] {
        &self.incomplete
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

/// Accumulates rule outcomes for one document
#[derive(Debug, Default)]
pub struct ResultAssembler {
    url: String,
    violations: Vec<Violation>,
    passes: Vec<Pass>,
    incomplete: Vec<Incomplete>,
}

impl ResultAssembler {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn add_violations(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }

    pub fn add_pass(&mut self, rule_id: &str, note: impl Into<String>) {
        self.passes.push(Pass {
            rule_id: rule_id.to_string(),
            note: note.into(),
        });
    }

    pub fn add_incomplete(&mut self, rule_id: &str, message: impl Into<String>) {
        self.incomplete.push(Incomplete {
            rule_id: rule_id.to_string(),
            message: message.into(),
        });
    }

    /// Record what a rule returned: violations, a pass, or an incomplete entry
    pub fn add_outcome(&mut self, rule_id: &str, outcome: RuleResult) {
        match outcome {
            Ok(violations) if violations.is_empty() => self.add_pass(rule_id, "No issues found"),
            Ok(violations) => self.add_violations(violations),
            Err(e) => self.add_incomplete(rule_id, e.to_string()),
        }
    }

    pub fn finish(mut self) -> TestResult {
        // Stable: equal keys keep the order rules reported them in
        self.violations
            .sort_by(|a, b| (Reverse(a.severity), &a.rule_id).cmp(&(Reverse(b.severity), &b.rule_id)));
        self.passes.sort_by(|a, b| a.rule_id.cmp(&b.rule_id));
        self.incomplete.sort_by(|a, b| a.rule_id.cmp(&b.rule_id));

        let summary = Summary::from_violations(&self.violations);
        TestResult {
            run_id: Uuid::new_v4(),
            url: self.url,
            evaluated_at: Utc::now(),
            violations: self.violations,
            passes: self.passes,
            incomplete: self.incomplete,
            summary,
        }
    }
}

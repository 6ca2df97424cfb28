// SPDX-License-Identifier: PMPL-1.0-or-later
//! Rule registry and execution engine.
//!
//! The registry is populated once and then only read. Runs validate the
//! document, evaluate the selected rules (fanned out across the rayon
//! pool when parallel), and hand every outcome to a [`ResultAssembler`].
//! A rule that returns an error or panics becomes an `Incomplete` entry;
//! the run itself still completes.

use crate::config::EngineConfig;
use crate::document::DocumentModel;
use crate::error::{EngineError, Result};
use crate::model::{Severity, Violation};
use crate::result::{ResultAssembler, TestResult};
use crate::rules::{default_rules, RuleCategory, RuleDescriptor, RuleResult};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Registered rules keyed by id
#[derive(Debug)]
pub struct RuleRegistry {
    rules: BTreeMap<String, RuleDescriptor>,
    parallel: bool,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRegistry {
    /// Empty registry that runs rules in parallel
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
            parallel: true,
        }
    }

    /// Registry holding the full catalog configured by `config`
    pub fn with_default_rules(config: &EngineConfig) -> Result<Self> {
        let mut registry = Self::new().with_parallel(config.parallel);
        for rule in default_rules(config) {
            registry.register_descriptor(rule)?;
        }
        info!("Registered {} rule(s)", registry.len());
        Ok(registry)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Register a rule; fails if the id is taken
    pub fn register<F>(
        &mut self,
        id: &str,
        evaluate: F,
        category: RuleCategory,
        default_severity: Severity,
        wcag_criteria: &[&str],
    ) -> Result<()>
    where
        F: Fn(&DocumentModel) -> RuleResult + Send + Sync + 'static,
    {
        self.register_descriptor(RuleDescriptor::new(id, category, default_severity, wcag_criteria, evaluate))
    }

    pub fn register_descriptor(&mut self, rule: RuleDescriptor) -> Result<()> {
        if self.rules.contains_key(&rule.id) {
            return Err(EngineError::DuplicateRule(rule.id));
        }
        debug!("Registering rule {} ({})", rule.id, rule.category);
        self.rules.insert(rule.id.clone(), rule);
        Ok(())
    }

    /// Registered ids in order
    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    pub fn descriptor(&self, id: &str) -> Option<&RuleDescriptor> {
        self.rules.get(id)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &RuleDescriptor> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every registered rule
    pub fn run_all(&self, doc: &DocumentModel) -> Result<TestResult> {
        self.execute(doc, self.rules.values().collect())
    }

    /// Run the named rules. Any unknown id fails the run before a rule executes.
    pub fn run_subset(&self, doc: &DocumentModel, rule_ids: &[&str]) -> Result<TestResult> {
        let mut selected: Vec<&RuleDescriptor> = Vec::with_capacity(rule_ids.len());
        for id in rule_ids {
            let rule = self
                .rules
                .get(*id)
                .ok_or_else(|| EngineError::UnknownRule(id.to_string()))?;
            if !selected.iter().any(|r| r.id == rule.id) {
                selected.push(rule);
            }
        }
        self.execute(doc, selected)
    }

    /// Run every rule of one category
    pub fn run_category(&self, doc: &DocumentModel, category: RuleCategory) -> Result<TestResult> {
        self.execute(doc, self.rules.values().filter(|r| r.category == category).collect())
    }

    /// Run all rules against several documents in parallel
    pub fn run_batch(&self, docs: &[DocumentModel]) -> Vec<Result<TestResult>> {
        info!("Evaluating {} document(s)", docs.len());
        docs.par_iter().map(|doc| self.run_all(doc)).collect()
    }

    fn execute(&self, doc: &DocumentModel, rules: Vec<&RuleDescriptor>) -> Result<TestResult> {
        doc.validate()?;
        info!("Running {} rule(s) against {}", rules.len(), doc.url());

        let outcomes: Vec<(&str, RuleResult)> = if self.parallel {
            rules.par_iter().map(|r| (r.id.as_str(), run_isolated(r, doc))).collect()
        } else {
            rules.iter().map(|r| (r.id.as_str(), run_isolated(r, doc))).collect()
        };

        let mut assembler = ResultAssembler::new(doc.url());
        for (id, outcome) in outcomes {
            match &outcome {
                Ok(v) => debug!("Rule {} reported {} violation(s)", id, v.len()),
                Err(e) => warn!("Rule {} incomplete: {}", id, e),
            }
            assembler.add_outcome(id, outcome);
        }

        let result = assembler.finish();
        info!(
            "Found {} violation(s), score {:.1}, level {}",
            result.violations().len(),
            result.summary().compliance_score,
            result.summary().wcag_level
        );
        Ok(result)
    }
}

/// Evaluate one rule, turning errors and panics into `RuleExecution`
fn run_isolated(rule: &RuleDescriptor, doc: &DocumentModel) -> RuleResult {
    match catch_unwind(AssertUnwindSafe(|| rule.evaluate(doc))) {
        Ok(Ok(violations)) => Ok(violations),
        Ok(Err(e @ EngineError::RuleExecution { .. })) => Err(e),
        Ok(Err(e)) => Err(EngineError::rule(&rule.id, e.to_string())),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "rule panicked".to_string());
            Err(EngineError::rule(&rule.id, format!("panicked: {}", message)))
        }
    }
}

/// Keep violations whose severity is listed, preserving order
pub fn filter_by_severity(violations: &[Violation], severities: &[Severity]) -> Vec<Violation> {
    violations
        .iter()
        .filter(|v| severities.contains(&v.severity))
        .cloned()
        .collect()
}

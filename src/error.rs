// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for a11y-engine

use thiserror::Error;

/// Main error type for the rule engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// A rule id was registered twice
    #[error("Rule already registered: {0}")]
    DuplicateRule(String),

    /// A run requested a rule id the registry does not hold
    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    /// A rule could not complete; the registry records it as incomplete
    #[error("Rule {rule_id} failed: {message}")]
    RuleExecution { rule_id: String, message: String },

    /// The input document is malformed
    #[error("Malformed document model: {0}")]
    DocumentModel(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl EngineError {
    /// Shorthand used by rule implementations
    pub fn rule(rule_id: &str, message: impl Into<String>) -> Self {
        EngineError::RuleExecution {
            rule_id: rule_id.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

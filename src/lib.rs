// SPDX-License-Identifier: PMPL-1.0-or-later
//! a11y-engine - WCAG accessibility rule engine
//!
//! Evaluates a normalized page model (DOM tree, resolved style
//! declarations and script sources) against a registry of accessibility
//! rules and produces a scored, severity-ordered [`TestResult`].
//!
//! ## Rule catalog
//!
//! - **WCAG** (DOM): color contrast (1.4.3/1.4.6), alt text (1.1.1),
//!   heading structure (1.3.1), form labels (3.3.2), keyboard navigation
//!   (2.1.1), link purpose (2.4.4/2.4.9), language (3.1.1/3.1.2), ARIA
//!   usage (4.1.2)
//! - **CSS**: font size (1.4.4), line height (1.4.12), focus indicators
//!   (2.4.7), touch targets (2.5.5), animation safety (2.3.3)
//! - **JS**: keyboard handlers (2.1.1), focus management (2.4.3), dynamic
//!   content (4.1.3), motion preferences (2.3.3)
//!
//! ## Example
//!
//! ```no_run
//! use a11y_engine::{DocumentModel, EngineConfig, RuleRegistry};
//!
//! let doc = DocumentModel::from_html(
//!     "https://example.test/",
//!     "<html lang=\"en\"><body><img src=\"a.png\"></body></html>",
//!     &[],
//!     &[],
//! )?;
//! let registry = RuleRegistry::with_default_rules(&EngineConfig::default())?;
//! let result = registry.run_all(&doc)?;
//! println!("score {}", result.summary().compliance_score);
//! # Ok::<(), a11y_engine::EngineError>(())
//! ```

pub mod config;
pub mod contrast;
pub mod criteria;
pub mod document;
pub mod error;
pub mod model;
pub mod registry;
pub mod report;
pub mod result;
pub mod rules;
pub mod score;
pub mod units;

pub use config::{load_config, EngineConfig, Thresholds};
pub use document::{DocumentModel, ElementSpec, NodeId, StyleRule, StyleTarget};
pub use error::{EngineError, Result};
pub use model::{ElementRef, Incomplete, Pass, Severity, Violation, WcagLevel};
pub use registry::{filter_by_severity, RuleRegistry};
pub use result::TestResult;
pub use rules::{RuleCategory, RuleDescriptor, RuleResult};
pub use score::{AchievedLevel, Summary};

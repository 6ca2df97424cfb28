// SPDX-License-Identifier: PMPL-1.0-or-later
//! Plain renderings of a [`TestResult`] for the command line.
//!
//! Supports two output formats:
//! - Text: violations grouped by severity with WCAG references
//! - JSON: the serialized result, field names unchanged

use crate::model::Severity;
use crate::result::TestResult;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Render a result in the requested format
pub fn generate_report(result: &TestResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => generate_text_report(result),
        OutputFormat::Json => generate_json_report(result),
    }
}

fn generate_text_report(result: &TestResult) -> String {
    let mut output = String::new();
    let summary = result.summary();

    output.push_str(&format!("=== Accessibility Report: {} ===\n", result.url()));
    output.push_str(&format!(
        "Run {} at {}\n\n",
        result.run_id(),
        result.evaluated_at().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    if result.violations().is_empty() {
        output.push_str("No accessibility issues found. All checks passed.\n\n");
    } else {
        let counts: Vec<String> = Severity::ALL
            .iter()
            .map(|s| format!("{} {}", summary.count(*s), s))
            .collect();
        output.push_str(&format!(
            "Found {} violation(s): {}\n\n",
            summary.total(),
            counts.join(", ")
        ));
    }

    for severity in Severity::ALL {
        let group: Vec<_> = result
            .violations()
            .iter()
            .filter(|v| v.severity == severity)
            .collect();
        if group.is_empty() {
            continue;
        }

        output.push_str(&format!("--- {} ({}) ---\n", severity, group.len()));
        for violation in group {
            output.push_str(&format!("[{}] {}\n", violation.rule_id, violation.description));
            if !violation.wcag_criteria.is_empty() {
                let level = violation
                    .level()
                    .map(|l| format!(" (Level {})", l))
                    .unwrap_or_default();
                output.push_str(&format!("  WCAG: {}{}\n", violation.wcag_criteria.join(", "), level));
            }
            for element in &violation.elements {
                output.push_str(&format!("  At: {}  {}\n", element.selector, element.snippet));
            }
            if !violation.help_url.is_empty() {
                output.push_str(&format!("  Help: {}\n", violation.help_url));
            }
            output.push('\n');
        }
    }

    if !result.incomplete().is_empty() {
        output.push_str(&format!("--- incomplete ({}) ---\n", result.incomplete().len()));
        for entry in result.incomplete() {
            output.push_str(&format!("[{}] {}\n", entry.rule_id, entry.message));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "Passed: {} rule(s)\nScore: {:.1}/100\nWCAG level achieved: {}\n",
        result.passes().len(),
        summary.compliance_score,
        summary.wcag_level
    ));

    output
}

fn generate_json_report(result: &TestResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementRef, Violation};
    use crate::result::ResultAssembler;

    fn sample() -> TestResult {
        let mut asm = ResultAssembler::new("https://example.test/");
        asm.add_outcome(
            "alt_text",
            Ok(vec![Violation::new("alt_text", Severity::Critical, "Image is missing an alt attribute")
                .with_criteria(&["1.1.1"])
                .with_element(ElementRef::new("body > img", "<img src=\"a.jpg\">"))]),
        );
        asm.add_pass("font_size", "No issues found");
        asm.add_incomplete("keyboard_handlers", "Rule keyboard_handlers failed: boom");
        asm.finish()
    }

    #[test]
    fn test_text_report() {
        let report = generate_report(&sample(), OutputFormat::Text);
        assert!(report.contains("--- critical (1) ---"));
        assert!(report.contains("[alt_text] Image is missing an alt attribute"));
        assert!(report.contains("WCAG: 1.1.1 (Level A)"));
        assert!(report.contains("At: body > img"));
        assert!(report.contains("--- incomplete (1) ---"));
        assert!(report.contains("Score: 90.0/100"));
        assert!(report.contains("WCAG level achieved: none"));
    }

    #[test]
    fn test_json_report_parses() {
        let report = generate_report(&sample(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&report).expect("valid json");
        assert_eq!(value["violations"][0]["rule_id"], "alt_text");
        assert_eq!(value["violations"][0]["severity"], "critical");
        assert_eq!(value["summary"]["wcag_level"], "none");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("sarif".parse::<OutputFormat>().is_err());
    }
}

//! Report part constructors.
//!
//! Every part is a nameless flat message whose level tags its role: the
//! summary is `Summary`, hints and fixes are `Hint`, violations are `Error`
//! and everything else is `Info`.

use crate::node::DiagnosticsNode;
use crate::style::TreeStyle;
use crate::DiagnosticLevel;

use super::ErrorReport;

fn text_part(text: impl Into<String>, level: DiagnosticLevel) -> DiagnosticsNode {
    DiagnosticsNode::message(text)
        .with_style(TreeStyle::Flat)
        .with_level(level)
}

/// One-line statement of what went wrong.
pub fn summary(text: &str) -> DiagnosticsNode {
    text_part(text, DiagnosticLevel::Summary)
}

/// Explanation of the problem.
pub fn description(text: &str) -> DiagnosticsNode {
    text_part(text, DiagnosticLevel::Info)
}

/// Suggestion for resolving the problem.
pub fn hint(text: &str) -> DiagnosticsNode {
    text_part(text, DiagnosticLevel::Hint)
}

pub fn hint_with_url(text: &str, url: &str) -> DiagnosticsNode {
    text_part(format!("{text}\nSee also: {url}"), DiagnosticLevel::Hint)
}

pub fn fix(text: &str) -> DiagnosticsNode {
    text_part(format!("Fix: {text}"), DiagnosticLevel::Hint)
}

/// What the caller was expected to do.
pub fn contract(text: &str) -> DiagnosticsNode {
    text_part(text, DiagnosticLevel::Info)
}

/// How the contract was broken.
pub fn violation(text: &str) -> DiagnosticsNode {
    text_part(text, DiagnosticLevel::Error)
}

/// Blank line between sections.
pub fn spacer() -> DiagnosticsNode {
    text_part("", DiagnosticLevel::Info)
}

/// Another report, indented under this one.
pub fn nested(report: &ErrorReport) -> DiagnosticsNode {
    report.to_diagnostics_node().with_style(TreeStyle::Whitespace)
}

pub fn is_summary(node: &DiagnosticsNode) -> bool {
    node.default_level() == DiagnosticLevel::Summary
}

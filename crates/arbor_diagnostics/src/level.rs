//! Diagnostic levels.

use std::fmt;

/// Importance of a node, ordered from least to most important.
///
/// Consumers pass a minimum level; nodes below it are filtered out.
/// `Hidden` nodes are never shown regardless of the minimum.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub enum DiagnosticLevel {
    Hidden,
    Fine,
    Debug,
    #[default]
    Info,
    Warning,
    Hint,
    Summary,
    Error,
    Off,
}

impl DiagnosticLevel {
    /// Wire name of the level.
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticLevel::Hidden => "hidden",
            DiagnosticLevel::Fine => "fine",
            DiagnosticLevel::Debug => "debug",
            DiagnosticLevel::Info => "info",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Hint => "hint",
            DiagnosticLevel::Summary => "summary",
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Off => "off",
        }
    }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

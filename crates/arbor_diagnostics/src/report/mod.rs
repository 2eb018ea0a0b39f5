//! Structured error reports.
//!
//! An [`ErrorReport`] is an ordered list of parts (summary, descriptions,
//! hints, properties, stack traces, nested reports), each a
//! [`DiagnosticsNode`]. It renders either as a plain message or as a tree.
//! [`ErrorDetails`] wraps a caught error with its context for presentation,
//! and [`ErrorReporter`] routes details to a replaceable handler.

pub mod part;
mod stack;

pub use stack::{
    default_stack_filter, DiagnosticsStackTrace, StackFilter, StackFilterConfig, StackFrame,
};

use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use crate::node::DiagnosticsNode;
use crate::render::{RenderConfig, TextTreeRenderer};
use crate::style::TreeStyle;
use crate::{DiagnosticLevel, DiagnosticsError, DiagnosticsResult};

/// Fallback when an error carries no text.
pub const NO_MESSAGE: &str = "<no message available>";

/// Title of the stack-trace section.
pub const STACK_TITLE: &str = "When the exception was thrown, this was the stack";

/// A structured error assembled from parts.
///
/// The first part is always the one summary.
#[derive(Clone, Debug)]
pub struct ErrorReport {
    parts: Vec<DiagnosticsNode>,
}

impl ErrorReport {
    /// Assemble a report from parts.
    ///
    /// Fails with `InvalidArgument` unless the first part is a summary and
    /// no other part is.
    pub fn from_parts(parts: Vec<DiagnosticsNode>) -> DiagnosticsResult<Self> {
        let summaries = parts.iter().filter(|p| part::is_summary(p)).count();
        match parts.first() {
            None => Err(DiagnosticsError::InvalidArgument(
                "an error report needs a summary part".to_owned(),
            )),
            Some(first) if !part::is_summary(first) => {
                Err(DiagnosticsError::InvalidArgument(format!(
                    "the first part of an error report must be its summary, found {:?}",
                    first.to_description(None)
                )))
            }
            Some(_) if summaries > 1 => Err(DiagnosticsError::InvalidArgument(format!(
                "an error report has exactly one summary, found {summaries}"
            ))),
            Some(_) => Ok(ErrorReport { parts }),
        }
    }

    /// Split a plain message: the first line becomes the summary, every
    /// further line a description.
    pub fn from_message(message: &str) -> Self {
        let mut lines = message.split('\n');
        let summary = lines.next().unwrap_or_default();
        let mut parts = vec![part::summary(summary)];
        parts.extend(lines.map(part::description));
        ErrorReport { parts }
    }

    /// Start a report with its summary line.
    pub fn builder(summary: &str) -> ErrorReportBuilder {
        ErrorReportBuilder {
            parts: vec![part::summary(summary)],
        }
    }

    pub fn parts(&self) -> &[DiagnosticsNode] {
        &self.parts
    }

    pub fn summary(&self) -> &DiagnosticsNode {
        &self.parts[0]
    }

    /// Every part rendered without wrapping, trimmed, one per line.
    pub fn message(&self) -> String {
        let renderer = TextTreeRenderer::new(RenderConfig::unbounded());
        self.parts
            .iter()
            .map(|part| renderer.render(part).trim_end().to_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The report as a tree headed by its summary.
    pub fn to_diagnostics_node(&self) -> DiagnosticsNode {
        DiagnosticsNode::block(self.summary().to_description(None))
            .with_style(TreeStyle::Flat)
            .with_level(DiagnosticLevel::Error)
            .with_properties(self.parts[1..].to_vec())
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ErrorReport {}

/// Appends parts after the summary.
#[derive(Clone, Debug)]
pub struct ErrorReportBuilder {
    parts: Vec<DiagnosticsNode>,
}

impl ErrorReportBuilder {
    #[must_use]
    pub fn description(mut self, text: &str) -> Self {
        self.parts.push(part::description(text));
        self
    }

    #[must_use]
    pub fn hint(mut self, text: &str) -> Self {
        self.parts.push(part::hint(text));
        self
    }

    #[must_use]
    pub fn hint_with_url(mut self, text: &str, url: &str) -> Self {
        self.parts.push(part::hint_with_url(text, url));
        self
    }

    #[must_use]
    pub fn fix(mut self, text: &str) -> Self {
        self.parts.push(part::fix(text));
        self
    }

    #[must_use]
    pub fn contract(mut self, text: &str) -> Self {
        self.parts.push(part::contract(text));
        self
    }

    #[must_use]
    pub fn violation(mut self, text: &str) -> Self {
        self.parts.push(part::violation(text));
        self
    }

    #[must_use]
    pub fn spacer(mut self) -> Self {
        self.parts.push(part::spacer());
        self
    }

    /// Any node, typically a property.
    #[must_use]
    pub fn property(mut self, node: DiagnosticsNode) -> Self {
        self.parts.push(node);
        self
    }

    #[must_use]
    pub fn stack_trace(mut self, stack: &str, config: &StackFilterConfig) -> Self {
        self.parts.push(DiagnosticsStackTrace::with_default_filter(
            STACK_TITLE,
            Some(stack),
            config,
        ));
        self
    }

    #[must_use]
    pub fn nested(mut self, report: &ErrorReport) -> Self {
        self.parts.push(part::nested(report));
        self
    }

    pub fn build(self) -> ErrorReport {
        ErrorReport { parts: self.parts }
    }
}

/// The thrown value of an [`ErrorDetails`].
#[derive(Clone, Debug)]
pub enum ErrorValue {
    Report(ErrorReport),
    Message(String),
    Number(f64),
    /// A typed error, described by its short type name and message.
    Error { type_name: String, message: String },
    None,
}

impl ErrorValue {
    /// Capture a `std::error::Error` with its short type name.
    pub fn from_error<E: std::error::Error>(error: &E) -> Self {
        ErrorValue::Error {
            type_name: crate::node::short_type_name(std::any::type_name::<E>()).to_owned(),
            message: error.to_string(),
        }
    }
}

/// Produces extra nodes appended to an error presentation.
pub type InformationCollector = Rc<dyn Fn() -> Vec<DiagnosticsNode>>;

/// A caught error with everything needed to present it.
#[derive(Clone)]
pub struct ErrorDetails {
    pub exception: ErrorValue,
    pub stack: Option<String>,
    /// Who caught the error, e.g. `widgets library`.
    pub library: String,
    /// What was happening, e.g. `while building Foo`.
    pub context: Option<DiagnosticsNode>,
    pub information_collector: Option<InformationCollector>,
    /// Silent errors are not presented by the console presenter.
    pub silent: bool,
    pub stack_filter: StackFilterConfig,
}

impl fmt::Debug for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorDetails")
            .field("exception", &self.exception)
            .field("library", &self.library)
            .field("silent", &self.silent)
            .finish_non_exhaustive()
    }
}

impl ErrorDetails {
    pub fn new(exception: ErrorValue) -> Self {
        ErrorDetails {
            exception,
            stack: None,
            library: "application".to_owned(),
            context: None,
            information_collector: None,
            silent: false,
            stack_filter: StackFilterConfig::default(),
        }
    }

    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    #[must_use]
    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = library.into();
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: DiagnosticsNode) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn with_information_collector(
        mut self,
        collector: impl Fn() -> Vec<DiagnosticsNode> + 'static,
    ) -> Self {
        self.information_collector = Some(Rc::new(collector));
        self
    }

    #[must_use]
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    #[must_use]
    pub fn with_stack_filter(mut self, config: StackFilterConfig) -> Self {
        self.stack_filter = config;
        self
    }

    /// The thrown value as text; never empty.
    pub fn exception_as_string(&self) -> String {
        let text = match &self.exception {
            ErrorValue::Report(report) => report.message(),
            ErrorValue::Message(message) => message.clone(),
            ErrorValue::Number(number) => number.to_string(),
            ErrorValue::Error { type_name, message } => {
                let prefix = format!("{type_name}: ");
                message.strip_prefix(&prefix).unwrap_or(message).to_owned()
            }
            ErrorValue::None => "Unknown error".to_owned(),
        };
        if text.trim().is_empty() {
            NO_MESSAGE.to_owned()
        } else {
            text
        }
    }

    /// One-line summary node.
    pub fn summary(&self) -> DiagnosticsNode {
        if let ErrorValue::Report(report) = &self.exception {
            return report.summary().clone();
        }
        let text = self.exception_as_string();
        let first = text.split('\n').next().unwrap_or_default().trim_start();
        part::summary(first)
    }

    /// Body parts of the presentation, in order.
    pub fn body_parts(&self) -> Vec<DiagnosticsNode> {
        let verb = match &self.context {
            Some(context) => format!("thrown {}", context.to_description(None)),
            None => "thrown".to_owned(),
        };
        let mut parts = Vec::new();
        match &self.exception {
            ErrorValue::Number(number) => {
                parts.push(part::summary(&format!("The number {number} was {verb}.")));
            }
            ErrorValue::None => {
                parts.push(part::description(&format!("The following error was {verb}:")));
                parts.push(part::summary(&self.exception_as_string()));
            }
            ErrorValue::Report(report) => {
                parts.push(part::description(&format!(
                    "The following assertion was {verb}:"
                )));
                parts.extend(report.parts().iter().cloned());
            }
            ErrorValue::Message(_) => {
                parts.push(part::description(&format!("The following message was {verb}:")));
                parts.push(part::summary(&self.exception_as_string()));
            }
            ErrorValue::Error { type_name, .. } => {
                parts.push(part::description(&format!(
                    "The following {type_name} was {verb}:"
                )));
                parts.push(part::summary(&self.exception_as_string()));
            }
        }
        if let Some(stack) = &self.stack {
            parts.push(part::spacer());
            parts.push(DiagnosticsStackTrace::with_default_filter(
                STACK_TITLE,
                Some(stack),
                &self.stack_filter,
            ));
        }
        if let Some(collector) = &self.information_collector {
            parts.push(part::spacer());
            parts.extend(collector());
        }
        parts
    }

    /// Error-styled tree titled `EXCEPTION CAUGHT BY <LIBRARY>`.
    pub fn to_diagnostics_node(&self) -> DiagnosticsNode {
        DiagnosticsNode::block(format!("EXCEPTION CAUGHT BY {}", self.library.to_uppercase()))
            .with_style(TreeStyle::Error)
            .with_level(DiagnosticLevel::Error)
            .with_properties(self.body_parts())
    }
}

/// Writes reported errors to any writer.
///
/// The first error is rendered in full; later ones are abbreviated to their
/// summary.
pub struct ConsolePresenter<W: Write> {
    writer: W,
    config: RenderConfig,
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(writer: W) -> Self {
        ConsolePresenter {
            writer,
            config: RenderConfig::default().with_max_descendants(5),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Present `details`; `error_count` is the number of errors reported
    /// before this one.
    pub fn present(&mut self, details: &ErrorDetails, error_count: usize) -> io::Result<()> {
        if details.silent {
            return Ok(());
        }
        if error_count == 0 {
            let rendered = TextTreeRenderer::new(self.config.clone())
                .render(&details.to_diagnostics_node());
            writeln!(self.writer, "{}", rendered.trim_end())?;
        } else {
            writeln!(
                self.writer,
                "Another exception was thrown: {}",
                details.summary().to_description(None)
            )?;
        }
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Receives every reported error with the count of errors before it.
pub type ErrorHandler = Box<dyn FnMut(&ErrorDetails, usize)>;

fn console_handler() -> ErrorHandler {
    let mut presenter = ConsolePresenter::new(io::stderr());
    Box::new(move |details, error_count| {
        if let Err(error) = presenter.present(details, error_count) {
            tracing::warn!(%error, "failed to write error report");
        }
    })
}

/// The single error-handler slot.
///
/// Owned by the host and passed to whatever reports errors. The default
/// handler presents errors on stderr.
pub struct ErrorReporter {
    handler: ErrorHandler,
    error_count: usize,
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporter {
    pub fn new() -> Self {
        ErrorReporter {
            handler: console_handler(),
            error_count: 0,
        }
    }

    pub fn with_handler(handler: impl FnMut(&ErrorDetails, usize) + 'static) -> Self {
        ErrorReporter {
            handler: Box::new(handler),
            error_count: 0,
        }
    }

    pub fn report(&mut self, details: &ErrorDetails) {
        tracing::debug!(
            library = %details.library,
            error_count = self.error_count,
            "reporting error"
        );
        (self.handler)(details, self.error_count);
        self.error_count += 1;
    }

    pub fn set_handler(&mut self, handler: impl FnMut(&ErrorDetails, usize) + 'static) {
        self.handler = Box::new(handler);
    }

    /// Restore the stderr presenter.
    pub fn reset_handler(&mut self) {
        self.handler = console_handler();
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// The next error is presented in full again.
    pub fn reset_error_count(&mut self) {
        self.error_count = 0;
    }
}

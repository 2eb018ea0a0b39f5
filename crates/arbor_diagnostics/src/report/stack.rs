//! Stack-trace filtering and stack-trace nodes.
//!
//! Frames have the shape `#N symbol (scheme:package/path:line:col)`. The
//! default filter drops frames from configured packages and classes and
//! appends one summary line naming what was elided. Lines that do not parse
//! as frames pass through untouched.

use std::collections::BTreeMap;

use crate::node::DiagnosticsNode;
use crate::style::TreeStyle;

/// Filter applied to the lines of a stack trace before rendering.
pub type StackFilter<'a> = dyn Fn(&[String]) -> Vec<String> + 'a;

/// Which frames the default filter elides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackFilterConfig {
    /// `scheme:package` keys, e.g. `std:rt`.
    pub elided_packages: Vec<String>,
    /// Type names; a frame whose symbol is `Type::method` or `Type.method`
    /// matches `Type`.
    pub elided_classes: Vec<String>,
}

impl Default for StackFilterConfig {
    fn default() -> Self {
        StackFilterConfig {
            elided_packages: vec![
                "core:ops".to_owned(),
                "std:panicking".to_owned(),
                "std:rt".to_owned(),
                "std:sys".to_owned(),
            ],
            elided_classes: Vec::new(),
        }
    }
}

impl StackFilterConfig {
    /// Elide nothing.
    pub fn empty() -> Self {
        StackFilterConfig {
            elided_packages: Vec::new(),
            elided_classes: Vec::new(),
        }
    }

    #[must_use]
    pub fn elide_package(mut self, key: impl Into<String>) -> Self {
        self.elided_packages.push(key.into());
        self
    }

    #[must_use]
    pub fn elide_class(mut self, name: impl Into<String>) -> Self {
        self.elided_classes.push(name.into());
        self
    }
}

/// One parsed frame line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackFrame<'a> {
    pub number: usize,
    pub symbol: &'a str,
    pub scheme: &'a str,
    pub package: &'a str,
    pub path: &'a str,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl<'a> StackFrame<'a> {
    /// Parse `#N symbol (scheme:package/path:line:col)`. `None` for anything
    /// else.
    pub fn parse(source: &'a str) -> Option<Self> {
        let rest = source.trim().strip_prefix('#')?;
        let digits_end = rest.find(|c: char| !c.is_ascii_digit())?;
        let number = rest[..digits_end].parse().ok()?;
        let rest = rest[digits_end..].trim_start();
        let open = rest.rfind(" (")?;
        let symbol = rest[..open].trim();
        let location = rest[open + 2..].strip_suffix(')')?;

        let (scheme, after_scheme) = location.split_once(':')?;
        let (package, tail) = after_scheme.split_once('/').unwrap_or((after_scheme, ""));
        // Trailing `:line:col`, either of which may be missing.
        let mut path = tail;
        let mut numbers = Vec::with_capacity(2);
        while numbers.len() < 2 {
            match path.rsplit_once(':') {
                Some((head, n)) if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => {
                    numbers.push(n.parse().ok()?);
                    path = head;
                }
                _ => break,
            }
        }
        let (line, column) = match numbers.as_slice() {
            [column, line] => (Some(*line), Some(*column)),
            [line] => (Some(*line), None),
            _ => (None, None),
        };
        Some(StackFrame {
            number,
            symbol,
            scheme,
            package,
            path,
            line,
            column,
        })
    }

    /// `scheme:package`.
    pub fn package_key(&self) -> String {
        format!("{}:{}", self.scheme, self.package)
    }

    /// Type part of the symbol, if it has one.
    pub fn class_name(&self) -> Option<&'a str> {
        let symbol = self.symbol;
        symbol
            .rfind("::")
            .or_else(|| symbol.rfind('.'))
            .map(|i| &symbol[..i])
            .filter(|class| !class.is_empty())
    }
}

/// Drop elided frames and append a line naming their sources.
///
/// Total: any input yields output, and unparseable lines survive.
pub fn default_stack_filter(frames: &[String], config: &StackFilterConfig) -> Vec<String> {
    let mut removed: BTreeMap<String, usize> = BTreeMap::new();
    let mut skipped = 0;
    let mut result = Vec::with_capacity(frames.len());

    for source in frames {
        let Some(frame) = StackFrame::parse(source) else {
            result.push(source.clone());
            continue;
        };
        let class_key = frame
            .class_name()
            .filter(|class| config.elided_classes.iter().any(|c| c == class))
            .map(|class| format!("class {class}"));
        let package_key = frame.package_key();
        let key = class_key.or_else(|| {
            config
                .elided_packages
                .contains(&package_key)
                .then_some(package_key)
        });
        match key {
            Some(key) => {
                skipped += 1;
                *removed.entry(key).or_default() += 1;
            }
            None => result.push(source.clone()),
        }
    }

    // BTreeMap keys are already sorted.
    let mut sources: Vec<String> = removed.into_keys().collect();
    if skipped == 1 {
        result.push(format!("(elided one frame from {})", sources.join(", ")));
    } else if skipped > 1 {
        if sources.len() > 1 {
            if let Some(last) = sources.last_mut() {
                *last = format!("and {last}");
            }
        }
        let separator = if sources.len() > 2 { ", " } else { " " };
        result.push(format!(
            "(elided {skipped} frames from {})",
            sources.join(separator)
        ));
    }
    result
}

/// Builds stack-trace nodes.
pub struct DiagnosticsStackTrace;

impl DiagnosticsStackTrace {
    /// A flat block titled `name:` with one non-wrapping line per surviving
    /// frame.
    pub fn new(name: &str, stack: Option<&str>, filter: &StackFilter<'_>) -> DiagnosticsNode {
        let frames: Vec<String> = stack
            .map(|stack| {
                stack
                    .lines()
                    .map(str::trim_end)
                    .filter(|line| !line.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        let properties = filter(&frames).into_iter().map(frame_line).collect();
        DiagnosticsNode::block(format!("{name}:"))
            .with_style(TreeStyle::Flat)
            .with_allow_truncate(true)
            .with_properties(properties)
    }

    /// Stack trace filtered with [`default_stack_filter`] and `config`.
    pub fn with_default_filter(
        name: &str,
        stack: Option<&str>,
        config: &StackFilterConfig,
    ) -> DiagnosticsNode {
        Self::new(name, stack, &|frames: &[String]| default_stack_filter(frames, config))
    }

    /// One frame under a name, indented.
    pub fn single_frame(name: &str, frame: &str) -> DiagnosticsNode {
        DiagnosticsNode::block("")
            .with_name(name)
            .with_style(TreeStyle::Whitespace)
            .with_properties(vec![frame_line(frame.to_owned())])
    }
}

fn frame_line(line: String) -> DiagnosticsNode {
    DiagnosticsNode::message(line).with_allow_wrap(false)
}

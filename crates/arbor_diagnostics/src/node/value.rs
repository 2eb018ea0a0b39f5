//! Property payloads and their header formatting.

use std::fmt;
use std::rc::Rc;

use crate::style::StyleDescriptor;

use super::describe::Diagnosticable;

/// The payload a property node describes.
///
/// `Object` shares the described object with the host; the node never owns
/// it exclusively.
#[derive(Clone)]
pub enum DiagnosticValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
    /// Enum variant name, already in hyphen-case.
    Enum(String),
    Object(Rc<dyn Diagnosticable>),
    List(Vec<String>),
}

impl DiagnosticValue {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, DiagnosticValue::Null)
    }

    /// The described object, if this value is one.
    pub fn as_object(&self) -> Option<&Rc<dyn Diagnosticable>> {
        match self {
            DiagnosticValue::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl PartialEq for DiagnosticValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DiagnosticValue::Null, DiagnosticValue::Null) => true,
            (DiagnosticValue::Bool(a), DiagnosticValue::Bool(b)) => a == b,
            (DiagnosticValue::Int(a), DiagnosticValue::Int(b)) => a == b,
            (DiagnosticValue::Double(a), DiagnosticValue::Double(b)) => a == b,
            (DiagnosticValue::Str(a), DiagnosticValue::Str(b))
            | (DiagnosticValue::Enum(a), DiagnosticValue::Enum(b)) => a == b,
            (DiagnosticValue::Object(a), DiagnosticValue::Object(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            (DiagnosticValue::List(a), DiagnosticValue::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for DiagnosticValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticValue::Null => f.write_str("Null"),
            DiagnosticValue::Bool(v) => write!(f, "Bool({v})"),
            DiagnosticValue::Int(v) => write!(f, "Int({v})"),
            DiagnosticValue::Double(v) => write!(f, "Double({v})"),
            DiagnosticValue::Str(v) => write!(f, "Str({v:?})"),
            DiagnosticValue::Enum(v) => write!(f, "Enum({v})"),
            DiagnosticValue::Object(v) => write!(f, "Object({})", v.to_string_short()),
            DiagnosticValue::List(v) => write!(f, "List({v:?})"),
        }
    }
}

impl fmt::Display for DiagnosticValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticValue::Null => f.write_str("null"),
            DiagnosticValue::Bool(v) => write!(f, "{v}"),
            DiagnosticValue::Int(v) => write!(f, "{v}"),
            DiagnosticValue::Double(v) => f.write_str(&format_double(*v, 1)),
            DiagnosticValue::Str(v) | DiagnosticValue::Enum(v) => f.write_str(v),
            DiagnosticValue::Object(v) => f.write_str(&v.to_string_short()),
            DiagnosticValue::List(v) => {
                if v.is_empty() {
                    f.write_str("[]")
                } else {
                    f.write_str(&v.join(", "))
                }
            }
        }
    }
}

/// How a property turns its value into header text.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyFormat {
    String { quoted: bool },
    Bool,
    /// Shows `if_true`/`if_false`; a missing description hides the node.
    Flag {
        if_true: Option<String>,
        if_false: Option<String>,
    },
    Int { unit: Option<String> },
    Double {
        fraction_digits: usize,
        unit: Option<String>,
    },
    Enum,
    Object,
    Message,
    Iterable,
}

impl PropertyFormat {
    /// Wire name of the property kind.
    pub fn property_type(&self) -> &'static str {
        match self {
            PropertyFormat::String { .. } | PropertyFormat::Message => "String",
            PropertyFormat::Bool | PropertyFormat::Flag { .. } => "bool",
            PropertyFormat::Int { .. } => "int",
            PropertyFormat::Double { .. } => "double",
            PropertyFormat::Enum => "enum",
            PropertyFormat::Object => "Object",
            PropertyFormat::Iterable => "Iterable",
        }
    }

    /// Node type tag for serialized output.
    pub fn node_type(&self) -> &'static str {
        match self {
            PropertyFormat::String { .. } => "StringProperty",
            PropertyFormat::Bool => "BoolProperty",
            PropertyFormat::Flag { .. } => "FlagProperty",
            PropertyFormat::Int { .. } => "IntProperty",
            PropertyFormat::Double { .. } => "DoubleProperty",
            PropertyFormat::Enum => "EnumProperty",
            PropertyFormat::Object => "ObjectProperty",
            PropertyFormat::Message => "MessageProperty",
            PropertyFormat::Iterable => "IterableProperty",
        }
    }

    /// Render `value` under this format.
    ///
    /// `parent` is the style of the enclosing node; when it keeps properties on
    /// one line, embedded newlines in strings are escaped.
    pub fn value_to_string(
        &self,
        value: &DiagnosticValue,
        parent: Option<&StyleDescriptor>,
    ) -> String {
        match (self, value) {
            (_, DiagnosticValue::Null) => "null".to_owned(),
            (PropertyFormat::String { quoted }, DiagnosticValue::Str(text)) => {
                let text = match parent {
                    Some(style) if !style.line_break_properties => text.replace('\n', "\\n"),
                    _ => text.clone(),
                };
                if *quoted {
                    format!("\"{text}\"")
                } else {
                    text
                }
            }
            (PropertyFormat::Flag { if_true, if_false }, DiagnosticValue::Bool(flag)) => {
                let chosen = if *flag { if_true } else { if_false };
                chosen.clone().unwrap_or_else(|| flag.to_string())
            }
            (PropertyFormat::Int { unit }, DiagnosticValue::Int(v)) => {
                with_unit(v.to_string(), unit.as_deref())
            }
            (
                PropertyFormat::Double {
                    fraction_digits,
                    unit,
                },
                DiagnosticValue::Double(v),
            ) => with_unit(format_double(*v, *fraction_digits), unit.as_deref()),
            (PropertyFormat::Double { unit, .. }, DiagnosticValue::Int(v)) => {
                with_unit(v.to_string(), unit.as_deref())
            }
            (_, other) => other.to_string(),
        }
    }
}

fn with_unit(text: String, unit: Option<&str>) -> String {
    match unit {
        Some(unit) => text + unit,
        None => text,
    }
}

/// Format a double with a fixed number of fraction digits.
///
/// Non-finite values render as `NaN`, `Infinity` and `-Infinity`.
pub fn format_double(value: f64, fraction_digits: usize) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        }
    } else {
        format!("{value:.fraction_digits$}")
    }
}

/// Describe an enum variant from its `Debug` text.
///
/// Strips the enclosing type path and any payload, then converts to
/// hyphen-case: `Direction::LeftToRight` becomes `left-to-right`.
pub fn describe_enum(debug: &str) -> String {
    let variant = debug
        .split(['(', '{', ' '])
        .next()
        .unwrap_or(debug)
        .trim();
    let variant = variant
        .rsplit("::")
        .next()
        .unwrap_or(variant)
        .rsplit('.')
        .next()
        .unwrap_or(variant);
    to_hyphen_case(variant)
}

/// `LeftToRight` -> `left-to-right`, `HTTPServer` -> `http-server`,
/// `snake_case` -> `snake-case`.
pub fn to_hyphen_case(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

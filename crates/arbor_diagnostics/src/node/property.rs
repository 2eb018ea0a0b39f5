//! Property factories and property options.
//!
//! Properties are value or lazy nodes rendered in the `SingleLine` style by
//! default. The options below only touch property nodes; on block and
//! delegate nodes they are no-ops.

use std::cell::OnceCell;
use std::fmt::Debug;
use std::rc::Rc;

use crate::style::TreeStyle;

use super::{
    describe_enum, DiagnosticValue, Diagnosticable, DiagnosticsNode, NodeKind, PropertyFormat,
    PropertySpec,
};

impl DiagnosticsNode {
    fn property(name: &str, value: DiagnosticValue, format: PropertyFormat) -> Self {
        Self::from_kind(
            NodeKind::Value {
                value,
                spec: PropertySpec::new(format),
            },
            TreeStyle::SingleLine,
        )
        .with_name(name)
    }

    /// String property, unquoted unless [`quoted`](Self::quoted) is set.
    pub fn string(name: &str, value: Option<&str>) -> Self {
        let value = value.map_or(DiagnosticValue::Null, |v| DiagnosticValue::Str(v.to_owned()));
        Self::property(name, value, PropertyFormat::String { quoted: false })
    }

    pub fn bool(name: &str, value: Option<bool>) -> Self {
        let value = value.map_or(DiagnosticValue::Null, DiagnosticValue::Bool);
        Self::property(name, value, PropertyFormat::Bool)
    }

    /// Shows only the description matching `value`; hidden when that
    /// description is absent.
    pub fn flag(name: &str, value: bool, if_true: Option<&str>, if_false: Option<&str>) -> Self {
        Self::property(
            name,
            DiagnosticValue::Bool(value),
            PropertyFormat::Flag {
                if_true: if_true.map(str::to_owned),
                if_false: if_false.map(str::to_owned),
            },
        )
        .with_show_name(false)
    }

    pub fn int(name: &str, value: Option<i64>) -> Self {
        let value = value.map_or(DiagnosticValue::Null, DiagnosticValue::Int);
        Self::property(name, value, PropertyFormat::Int { unit: None })
    }

    /// Double property with one fraction digit unless
    /// [`fraction_digits`](Self::fraction_digits) says otherwise.
    pub fn double(name: &str, value: Option<f64>) -> Self {
        let value = value.map_or(DiagnosticValue::Null, DiagnosticValue::Double);
        Self::property(
            name,
            value,
            PropertyFormat::Double {
                fraction_digits: 1,
                unit: None,
            },
        )
    }

    /// Enum property described from the variant's `Debug` text.
    pub fn enum_value<T: Debug + ?Sized>(name: &str, value: Option<&T>) -> Self {
        let value = value.map_or(DiagnosticValue::Null, |v| {
            DiagnosticValue::Enum(describe_enum(&format!("{v:?}")))
        });
        Self::property(name, value, PropertyFormat::Enum)
    }

    /// Property whose value is another diagnosable object.
    pub fn object(name: &str, value: Option<Rc<dyn Diagnosticable>>) -> Self {
        let value = value.map_or(DiagnosticValue::Null, DiagnosticValue::Object);
        Self::property(name, value, PropertyFormat::Object)
    }

    /// Nameless single-line text.
    pub fn message(text: impl Into<String>) -> Self {
        Self::from_kind(
            NodeKind::Value {
                value: DiagnosticValue::Str(text.into()),
                spec: PropertySpec::new(PropertyFormat::Message),
            },
            TreeStyle::SingleLine,
        )
        .with_show_name(false)
    }

    /// `name: value` message, with the name shown.
    pub fn message_property(name: &str, text: impl Into<String>) -> Self {
        Self::message(text).with_name(name).with_show_name(true)
    }

    pub fn iterable(name: &str, values: Vec<String>) -> Self {
        Self::property(name, DiagnosticValue::List(values), PropertyFormat::Iterable)
    }

    /// Property computed on first access. A failing computation renders as
    /// `EXCEPTION (message)` at error level.
    pub fn lazy(
        name: &str,
        format: PropertyFormat,
        compute: impl Fn() -> Result<DiagnosticValue, String> + 'static,
    ) -> Self {
        Self::from_kind(
            NodeKind::Lazy {
                compute: Rc::new(compute),
                cache: OnceCell::new(),
                spec: PropertySpec::new(format),
            },
            TreeStyle::SingleLine,
        )
        .with_name(name)
    }

    fn map_spec(mut self, f: impl FnOnce(&mut PropertySpec)) -> Self {
        if let NodeKind::Value { spec, .. } | NodeKind::Lazy { spec, .. } = &mut self.kind {
            f(spec);
        }
        self
    }

    // Property options

    /// Wrap string values in double quotes.
    #[must_use]
    pub fn quoted(self, quoted: bool) -> Self {
        self.map_spec(|spec| {
            if let PropertyFormat::String { quoted: q } = &mut spec.format {
                *q = quoted;
            }
        })
    }

    /// Append `unit` to numeric values.
    #[must_use]
    pub fn with_unit(self, unit: &str) -> Self {
        self.map_spec(|spec| match &mut spec.format {
            PropertyFormat::Int { unit: u } | PropertyFormat::Double { unit: u, .. } => {
                *u = Some(unit.to_owned());
            }
            _ => {}
        })
    }

    #[must_use]
    pub fn fraction_digits(self, digits: usize) -> Self {
        self.map_spec(|spec| {
            if let PropertyFormat::Double {
                fraction_digits, ..
            } = &mut spec.format
            {
                *fraction_digits = digits;
            }
        })
    }

    /// Text shown for a null value. Implies [`show_null`](Self::show_null).
    #[must_use]
    pub fn if_null(self, text: &str) -> Self {
        self.map_spec(|spec| {
            spec.if_null = Some(text.to_owned());
            spec.show_null = true;
        })
    }

    #[must_use]
    pub fn if_empty(self, text: &str) -> Self {
        self.map_spec(|spec| spec.if_empty = Some(text.to_owned()))
    }

    #[must_use]
    pub fn tooltip(self, text: &str) -> Self {
        self.map_spec(|spec| spec.tooltip = Some(text.to_owned()))
    }

    /// Replace the formatted value with fixed text.
    #[must_use]
    pub fn description(self, text: &str) -> Self {
        self.map_spec(|spec| spec.description = Some(text.to_owned()))
    }

    /// Values equal to `value` drop to `Fine`.
    #[must_use]
    pub fn default_value(self, value: DiagnosticValue) -> Self {
        self.map_spec(|spec| spec.default_value = Some(value))
    }

    /// A null value raises the level to `Warning`.
    #[must_use]
    pub fn missing_if_null(self) -> Self {
        self.map_spec(|spec| {
            spec.missing_if_null = true;
            spec.show_null = true;
        })
    }

    #[must_use]
    pub fn show_null(self, show_null: bool) -> Self {
        self.map_spec(|spec| spec.show_null = show_null)
    }
}

/// Node describing `object`, optionally named and restyled.
pub fn to_diagnostics_node(
    object: Rc<dyn Diagnosticable>,
    name: Option<&str>,
    style: Option<TreeStyle>,
) -> DiagnosticsNode {
    let mut node = DiagnosticsNode::describe(object);
    if let Some(name) = name {
        node = node.with_name(name);
    }
    if let Some(style) = style {
        node = node.with_style(style);
    }
    node
}

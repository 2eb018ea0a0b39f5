//! The diagnostics node model.
//!
//! A [`DiagnosticsNode`] is one entry of a self-describing tree. Nodes are
//! cheap to clone (payloads and producers are reference counted), created
//! fresh for every inspection request, and read-only once built.
//!
//! The node kinds form a closed set ([`NodeKind`]):
//!
//! - **Value**: a precomputed payload with a formatting policy. No properties,
//!   no children.
//! - **Lazy**: a payload computed on first access and memoized. A failing
//!   computation turns the node into an error-level `EXCEPTION (...)` leaf.
//! - **Block**: a header plus property and child producers, either eager
//!   lists or callbacks invoked on every request.
//! - **Delegate**: defers to a [`Diagnosticable`] object's own
//!   `debug_fill_properties` / `debug_describe_children`.

mod describe;
mod property;
mod value;

pub use describe::{
    describe_identity, short_hash, short_type_name, CreationLocation,
    DiagnosticPropertiesBuilder, Diagnosticable,
};
pub use property::to_diagnostics_node;
pub use value::{describe_enum, format_double, to_hyphen_case, DiagnosticValue, PropertyFormat};

use std::borrow::Cow;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use crate::render::{RenderConfig, TextTreeRenderer};
use crate::style::{StyleDescriptor, TreeStyle};
use crate::{DiagnosticLevel, DiagnosticsError, DiagnosticsResult};

/// Character a node name must never end with; the styles supply it.
pub const NAME_SEPARATOR: char = ':';

/// Produces a list of nodes on demand.
pub type NodeProducer = Rc<dyn Fn() -> Vec<DiagnosticsNode>>;

/// Computes a lazy payload; `Err` carries the failure message.
pub type ValueProducer = Rc<dyn Fn() -> Result<DiagnosticValue, String>>;

/// Properties or children of a block node.
#[derive(Clone)]
pub enum NodeList {
    Eager(Vec<DiagnosticsNode>),
    /// Invoked on every request; callers needing stability cache the result.
    Lazy(NodeProducer),
}

impl NodeList {
    fn produce(&self) -> Cow<'_, [DiagnosticsNode]> {
        match self {
            NodeList::Eager(nodes) => Cow::Borrowed(nodes),
            NodeList::Lazy(producer) => Cow::Owned(producer()),
        }
    }
}

impl Default for NodeList {
    fn default() -> Self {
        NodeList::Eager(Vec::new())
    }
}

/// Header policy shared by value and lazy nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertySpec {
    pub format: PropertyFormat,
    /// Replaces the formatted value entirely.
    pub description: Option<String>,
    /// Shown when the value is null.
    pub if_null: Option<String>,
    /// Shown when the formatted value is empty.
    pub if_empty: Option<String>,
    /// Appended as ` (tooltip)`.
    pub tooltip: Option<String>,
    /// A value equal to this drops the level to `Fine`.
    pub default_value: Option<DiagnosticValue>,
    /// A null value raises the level to `Warning`.
    pub missing_if_null: bool,
    /// Null values are hidden unless this is set.
    pub show_null: bool,
}

impl PropertySpec {
    pub fn new(format: PropertyFormat) -> Self {
        PropertySpec {
            format,
            description: None,
            if_null: None,
            if_empty: None,
            tooltip: None,
            default_value: None,
            missing_if_null: false,
            show_null: false,
        }
    }

    fn add_tooltip(&self, text: String) -> String {
        match &self.tooltip {
            Some(tooltip) => format!("{text} ({tooltip})"),
            None => text,
        }
    }
}

/// The closed set of node kinds.
#[derive(Clone)]
pub enum NodeKind {
    Value {
        value: DiagnosticValue,
        spec: PropertySpec,
    },
    Lazy {
        compute: ValueProducer,
        cache: OnceCell<Result<DiagnosticValue, String>>,
        spec: PropertySpec,
    },
    Block {
        description: String,
        value: DiagnosticValue,
        properties: NodeList,
        children: NodeList,
    },
    Delegate {
        object: Rc<dyn Diagnosticable>,
        value: DiagnosticValue,
        description: Option<String>,
        builder: OnceCell<DiagnosticPropertiesBuilder>,
    },
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Value { .. } => "value",
            NodeKind::Lazy { .. } => "lazy",
            NodeKind::Block { .. } => "block",
            NodeKind::Delegate { .. } => "delegate",
        }
    }
}

/// One entry in a diagnostics tree.
#[derive(Clone)]
pub struct DiagnosticsNode {
    name: Option<String>,
    style: TreeStyle,
    show_name: bool,
    show_separator: bool,
    level: DiagnosticLevel,
    line_prefix: Option<String>,
    allow_wrap: bool,
    allow_name_wrap: bool,
    allow_truncate: bool,
    empty_body_description: Option<String>,
    kind: NodeKind,
}

impl DiagnosticsNode {
    pub(crate) fn from_kind(kind: NodeKind, style: TreeStyle) -> Self {
        DiagnosticsNode {
            name: None,
            style,
            show_name: true,
            show_separator: true,
            level: DiagnosticLevel::Info,
            line_prefix: None,
            allow_wrap: true,
            allow_name_wrap: true,
            allow_truncate: false,
            empty_body_description: None,
            kind,
        }
    }

    /// A composite node with a header and no body yet.
    pub fn block(description: impl Into<String>) -> Self {
        Self::from_kind(
            NodeKind::Block {
                description: description.into(),
                value: DiagnosticValue::Null,
                properties: NodeList::default(),
                children: NodeList::default(),
            },
            TreeStyle::Normal,
        )
    }

    /// A node that defers to `object` for its header, properties and children.
    pub fn describe(object: Rc<dyn Diagnosticable>) -> Self {
        let value = DiagnosticValue::Object(Rc::clone(&object));
        Self::from_kind(
            NodeKind::Delegate {
                object,
                value,
                description: None,
                builder: OnceCell::new(),
            },
            TreeStyle::Normal,
        )
    }

    /// Like [`describe`](Self::describe), but an absent object renders `<null>`.
    pub fn describe_optional(name: &str, object: Option<Rc<dyn Diagnosticable>>) -> Self {
        match object {
            Some(object) => Self::describe(object).with_name(name),
            None => Self::message("<null>").with_name(name).with_show_name(true),
        }
    }

    // Validation

    /// Check that `name` may be used as a node name.
    pub fn validate_name(name: &str) -> DiagnosticsResult<()> {
        if name.ends_with(NAME_SEPARATOR) {
            return Err(DiagnosticsError::InvalidArgument(format!(
                "node name {name:?} must not end with `{NAME_SEPARATOR}`; the style supplies the separator"
            )));
        }
        Ok(())
    }

    /// Set the name, rejecting names that end in the separator.
    pub fn try_with_name(mut self, name: impl Into<String>) -> DiagnosticsResult<Self> {
        let name = name.into();
        Self::validate_name(&name)?;
        self.name = Some(name);
        Ok(self)
    }

    // Builders

    /// Set the name. Debug builds assert it does not end in `:`.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(
            Self::validate_name(&name).is_ok(),
            "node name {name:?} must not end with `{NAME_SEPARATOR}`"
        );
        self.name = Some(name);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: TreeStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: DiagnosticLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_show_name(mut self, show_name: bool) -> Self {
        self.show_name = show_name;
        self
    }

    #[must_use]
    pub fn with_show_separator(mut self, show_separator: bool) -> Self {
        self.show_separator = show_separator;
        self
    }

    #[must_use]
    pub fn with_line_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.line_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_allow_wrap(mut self, allow_wrap: bool) -> Self {
        self.allow_wrap = allow_wrap;
        self
    }

    #[must_use]
    pub fn with_allow_name_wrap(mut self, allow_name_wrap: bool) -> Self {
        self.allow_name_wrap = allow_name_wrap;
        self
    }

    #[must_use]
    pub fn with_allow_truncate(mut self, allow_truncate: bool) -> Self {
        self.allow_truncate = allow_truncate;
        self
    }

    #[must_use]
    pub fn with_empty_body_description(mut self, text: impl Into<String>) -> Self {
        self.empty_body_description = Some(text.into());
        self
    }

    /// Replace the header of a block or delegate node.
    #[must_use]
    pub fn with_header(mut self, text: impl Into<String>) -> Self {
        match &mut self.kind {
            NodeKind::Block { description, .. } => *description = text.into(),
            NodeKind::Delegate { description, .. } => *description = Some(text.into()),
            NodeKind::Value { spec, .. } | NodeKind::Lazy { spec, .. } => {
                spec.description = Some(text.into());
            }
        }
        self
    }

    /// Attach the payload of a block node.
    #[must_use]
    pub fn with_value(mut self, new_value: DiagnosticValue) -> Self {
        if let NodeKind::Block { value, .. } = &mut self.kind {
            *value = new_value;
        }
        self
    }

    #[must_use]
    pub fn with_properties(mut self, nodes: Vec<DiagnosticsNode>) -> Self {
        if let NodeKind::Block { properties, .. } = &mut self.kind {
            *properties = NodeList::Eager(nodes);
        }
        self
    }

    #[must_use]
    pub fn with_children(mut self, nodes: Vec<DiagnosticsNode>) -> Self {
        if let NodeKind::Block { children, .. } = &mut self.kind {
            *children = NodeList::Eager(nodes);
        }
        self
    }

    #[must_use]
    pub fn with_lazy_properties(mut self, producer: impl Fn() -> Vec<DiagnosticsNode> + 'static) -> Self {
        if let NodeKind::Block { properties, .. } = &mut self.kind {
            *properties = NodeList::Lazy(Rc::new(producer));
        }
        self
    }

    #[must_use]
    pub fn with_lazy_children(mut self, producer: impl Fn() -> Vec<DiagnosticsNode> + 'static) -> Self {
        if let NodeKind::Block { children, .. } = &mut self.kind {
            *children = NodeList::Lazy(Rc::new(producer));
        }
        self
    }

    // Accessors

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn style(&self) -> TreeStyle {
        self.style
    }

    pub fn descriptor(&self) -> &'static StyleDescriptor {
        self.style.descriptor()
    }

    pub fn show_name(&self) -> bool {
        self.show_name
    }

    pub fn show_separator(&self) -> bool {
        self.show_separator
    }

    pub fn line_prefix(&self) -> Option<&str> {
        self.line_prefix.as_deref()
    }

    pub fn allow_wrap(&self) -> bool {
        self.allow_wrap
    }

    pub fn allow_name_wrap(&self) -> bool {
        self.allow_name_wrap
    }

    pub fn allow_truncate(&self) -> bool {
        self.allow_truncate
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The level the node was created with, before value-dependent rules.
    pub fn default_level(&self) -> DiagnosticLevel {
        self.level
    }

    /// Type tag used by serialized output.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Value { spec, .. } | NodeKind::Lazy { spec, .. } => spec.format.node_type(),
            NodeKind::Block { .. } => "DiagnosticsBlock",
            NodeKind::Delegate { .. } => "DiagnosticableNode",
        }
    }

    pub fn property_spec(&self) -> Option<&PropertySpec> {
        match &self.kind {
            NodeKind::Value { spec, .. } | NodeKind::Lazy { spec, .. } => Some(spec),
            _ => None,
        }
    }

    fn lazy_result(&self) -> Option<&Result<DiagnosticValue, String>> {
        match &self.kind {
            NodeKind::Lazy { compute, cache, .. } => Some(cache.get_or_init(|| {
                let result = compute();
                if let Err(error) = &result {
                    tracing::debug!(%error, "lazy property computation failed");
                }
                result
            })),
            _ => None,
        }
    }

    /// The described payload. `None` when a lazy computation failed.
    pub fn value(&self) -> Option<&DiagnosticValue> {
        match &self.kind {
            NodeKind::Value { value, .. }
            | NodeKind::Block { value, .. }
            | NodeKind::Delegate { value, .. } => Some(value),
            NodeKind::Lazy { .. } => self.lazy_result().and_then(|r| r.as_ref().ok()),
        }
    }

    /// Failure message of a lazy computation.
    pub fn exception(&self) -> Option<&str> {
        self.lazy_result()
            .and_then(|r| r.as_ref().err())
            .map(String::as_str)
    }

    /// The object this node describes, if any.
    pub fn value_object(&self) -> Option<&Rc<dyn Diagnosticable>> {
        self.value().and_then(DiagnosticValue::as_object)
    }

    pub fn creation_location(&self) -> Option<CreationLocation> {
        self.value_object().and_then(|object| object.creation_location())
    }

    fn delegate_builder(&self) -> Option<&DiagnosticPropertiesBuilder> {
        match &self.kind {
            NodeKind::Delegate {
                object, builder, ..
            } => Some(builder.get_or_init(|| {
                let mut properties = DiagnosticPropertiesBuilder::new();
                object.debug_fill_properties(&mut properties);
                properties
            })),
            _ => None,
        }
    }

    pub fn empty_body_description(&self) -> Option<&str> {
        self.empty_body_description.as_deref().or_else(|| {
            self.delegate_builder()
                .and_then(|b| b.empty_body_description.as_deref())
        })
    }

    // Visibility

    /// Effective level, after value-dependent rules.
    pub fn level(&self) -> DiagnosticLevel {
        if self.level == DiagnosticLevel::Hidden {
            return DiagnosticLevel::Hidden;
        }
        let Some(spec) = self.property_spec() else {
            return self.level;
        };
        let Some(value) = self.value() else {
            return DiagnosticLevel::Error;
        };
        if value.is_null() {
            if spec.missing_if_null {
                return DiagnosticLevel::Warning;
            }
            if !spec.show_null {
                return DiagnosticLevel::Hidden;
            }
        }
        if let (PropertyFormat::Flag { if_true, if_false }, DiagnosticValue::Bool(flag)) =
            (&spec.format, value)
        {
            let description = if *flag { if_true } else { if_false };
            if description.is_none() {
                return DiagnosticLevel::Hidden;
            }
        }
        if spec.default_value.as_ref() == Some(value) {
            return DiagnosticLevel::Fine;
        }
        self.level
    }

    /// Whether any consumer should show this node.
    pub fn show(&self) -> bool {
        self.level() != DiagnosticLevel::Hidden
    }

    /// Whether the node is dropped for the given minimum level.
    pub fn is_filtered(&self, min_level: DiagnosticLevel) -> bool {
        let level = self.level();
        level == DiagnosticLevel::Hidden || level < min_level
    }

    // Capabilities

    /// Declared properties. Lazy producers run on every call.
    pub fn get_properties(&self) -> Cow<'_, [DiagnosticsNode]> {
        match &self.kind {
            NodeKind::Value { .. } | NodeKind::Lazy { .. } => Cow::Borrowed(&[]),
            NodeKind::Block { properties, .. } => properties.produce(),
            NodeKind::Delegate { .. } => match self.delegate_builder() {
                Some(builder) => Cow::Borrowed(&builder.properties),
                None => Cow::Borrowed(&[]),
            },
        }
    }

    /// Descendants. Lazy and delegating producers run on every call.
    pub fn get_children(&self) -> Cow<'_, [DiagnosticsNode]> {
        match &self.kind {
            NodeKind::Value { .. } | NodeKind::Lazy { .. } => Cow::Borrowed(&[]),
            NodeKind::Block { children, .. } => children.produce(),
            NodeKind::Delegate { object, .. } => Cow::Owned(object.debug_describe_children()),
        }
    }

    /// Header text, without the name.
    ///
    /// `parent` is the style of the enclosing node, if any.
    pub fn to_description(&self, parent: Option<&StyleDescriptor>) -> String {
        match &self.kind {
            NodeKind::Value { spec, .. } | NodeKind::Lazy { spec, .. } => {
                self.property_description(spec, parent)
            }
            NodeKind::Block { description, .. } => description.clone(),
            NodeKind::Delegate {
                object,
                description,
                ..
            } => description
                .clone()
                .unwrap_or_else(|| object.to_string_short()),
        }
    }

    fn property_description(&self, spec: &PropertySpec, parent: Option<&StyleDescriptor>) -> String {
        if let Some(description) = &spec.description {
            return spec.add_tooltip(description.clone());
        }
        let value = match self.value() {
            Some(value) => value,
            None => {
                return format!("EXCEPTION ({})", self.exception().unwrap_or("unknown"));
            }
        };
        if value.is_null() {
            if let Some(if_null) = &spec.if_null {
                return spec.add_tooltip(if_null.clone());
            }
        }
        let is_empty_list = matches!(value, DiagnosticValue::List(items) if items.is_empty());
        let mut result = spec.format.value_to_string(value, parent);
        if result.is_empty() || is_empty_list {
            if let Some(if_empty) = &spec.if_empty {
                result = if_empty.clone();
            }
        }
        spec.add_tooltip(result)
    }

    /// Nodes are read-only views; the described value cannot be changed
    /// through them.
    pub fn is_read_only(&self) -> bool {
        true
    }

    /// Always fails: leaf kinds report `Unsupported`, composite kinds
    /// `InvalidOperation`.
    pub fn try_set_value(&self, _value: DiagnosticValue) -> DiagnosticsResult<()> {
        match &self.kind {
            NodeKind::Value { .. } | NodeKind::Lazy { .. } => Err(DiagnosticsError::Unsupported {
                operation: "set_value",
                kind: self.type_name(),
            }),
            NodeKind::Block { .. } | NodeKind::Delegate { .. } => {
                Err(DiagnosticsError::InvalidOperation(format!(
                    "{} is a read-only view of its value",
                    self.type_name()
                )))
            }
        }
    }

    // Text output

    /// One-line form: `name: description`, or the deep render for
    /// single-line styles.
    pub fn to_string_shallow(&self, parent: Option<&StyleDescriptor>) -> String {
        if self.style.is_single_line() {
            return TextTreeRenderer::new(RenderConfig::deep()).render_with_prefix(
                self,
                "",
                None,
                parent,
            );
        }
        let description = self.to_description(parent);
        match &self.name {
            Some(name) if !name.is_empty() && self.show_name => {
                let separator = if self.show_separator { ":" } else { "" };
                if description.contains('\n') {
                    format!("{name}{separator}\n{description}")
                } else {
                    format!("{name}{separator} {description}")
                }
            }
            _ => description,
        }
    }

    /// Full multi-line render with the deep-render defaults (wrap at 65).
    pub fn to_string_deep(&self) -> String {
        TextTreeRenderer::new(RenderConfig::deep()).render(self)
    }
}

impl fmt::Display for DiagnosticsNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_shallow(None))
    }
}

impl fmt::Debug for DiagnosticsNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticsNode")
            .field("kind", &self.kind.as_str())
            .field("name", &self.name)
            .field("style", &self.style)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

//! JSON-compatible serialization of node trees.
//!
//! A [`SerializationDelegate`] decides how deep to go, which properties and
//! children to keep, and which extra keys to attach. The traversal itself
//! ([`to_json_map`], [`to_json_list`]) is shared by every delegate.

use std::rc::Rc;

use arbor_stack::ensure_sufficient_stack;
use serde_json::{Map, Number, Value};

use crate::node::{format_double, DiagnosticValue, DiagnosticsNode, NodeKind, PropertyFormat};
use crate::style::TreeStyle;
use crate::DiagnosticLevel;

/// One serialized node.
pub type JsonMap = Map<String, Value>;

/// Policy for a serialization traversal.
pub trait SerializationDelegate {
    /// Remaining levels of children to include. `0` emits no `children` key.
    fn subtree_depth(&self) -> usize;

    /// Whether `properties` are emitted.
    fn include_properties(&self) -> bool;

    /// Whether property values that are themselves diagnosable objects get
    /// their own properties inlined.
    fn expand_property_values(&self) -> bool;

    /// Extra keys merged into the record of `node`.
    fn additional_node_properties(&self, node: &DiagnosticsNode, full_details: bool) -> JsonMap;

    fn filter_children(
        &self,
        nodes: Vec<DiagnosticsNode>,
        owner: &DiagnosticsNode,
    ) -> Vec<DiagnosticsNode>;

    fn filter_properties(
        &self,
        nodes: Vec<DiagnosticsNode>,
        owner: &DiagnosticsNode,
    ) -> Vec<DiagnosticsNode>;

    /// Cut a list before serialization. A shorter result marks the list as
    /// truncated.
    fn truncate_nodes_list(
        &self,
        nodes: Vec<DiagnosticsNode>,
        owner: Option<&DiagnosticsNode>,
    ) -> Vec<DiagnosticsNode>;

    /// Delegate used for `node` when it appears in a list.
    fn delegate_for_node(&self, node: &DiagnosticsNode) -> Self
    where
        Self: Sized;

    fn copy_with(&self, subtree_depth: Option<usize>, include_properties: Option<bool>) -> Self
    where
        Self: Sized;
}

/// No ids, no filtering, no truncation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefaultSerializationDelegate {
    pub subtree_depth: usize,
    pub include_properties: bool,
}

impl DefaultSerializationDelegate {
    pub fn new(subtree_depth: usize, include_properties: bool) -> Self {
        DefaultSerializationDelegate {
            subtree_depth,
            include_properties,
        }
    }
}

impl SerializationDelegate for DefaultSerializationDelegate {
    fn subtree_depth(&self) -> usize {
        self.subtree_depth
    }

    fn include_properties(&self) -> bool {
        self.include_properties
    }

    fn expand_property_values(&self) -> bool {
        false
    }

    fn additional_node_properties(&self, _node: &DiagnosticsNode, _full_details: bool) -> JsonMap {
        JsonMap::new()
    }

    fn filter_children(
        &self,
        nodes: Vec<DiagnosticsNode>,
        _owner: &DiagnosticsNode,
    ) -> Vec<DiagnosticsNode> {
        nodes
    }

    fn filter_properties(
        &self,
        nodes: Vec<DiagnosticsNode>,
        _owner: &DiagnosticsNode,
    ) -> Vec<DiagnosticsNode> {
        nodes
    }

    fn truncate_nodes_list(
        &self,
        nodes: Vec<DiagnosticsNode>,
        _owner: Option<&DiagnosticsNode>,
    ) -> Vec<DiagnosticsNode> {
        nodes
    }

    /// Each nesting level consumes one level of depth.
    fn delegate_for_node(&self, _node: &DiagnosticsNode) -> Self {
        self.copy_with(Some(self.subtree_depth.saturating_sub(1)), None)
    }

    fn copy_with(&self, subtree_depth: Option<usize>, include_properties: Option<bool>) -> Self {
        DefaultSerializationDelegate {
            subtree_depth: subtree_depth.unwrap_or(self.subtree_depth),
            include_properties: include_properties.unwrap_or(self.include_properties),
        }
    }
}

/// Serialize `node` with every key.
pub fn to_json_map<D: SerializationDelegate>(node: &DiagnosticsNode, delegate: &D) -> JsonMap {
    to_json_map_with_details(node, delegate, true)
}

/// Serialize `node`. Without `full_details` only the essential keys
/// (`description`, `shouldIndent`, delegate keys, `children`) are emitted.
pub fn to_json_map_with_details<D: SerializationDelegate>(
    node: &DiagnosticsNode,
    delegate: &D,
    full_details: bool,
) -> JsonMap {
    ensure_sufficient_stack(|| node_to_json(node, delegate, full_details))
}

fn node_to_json<D: SerializationDelegate>(
    node: &DiagnosticsNode,
    delegate: &D,
    full_details: bool,
) -> JsonMap {
    // Object-valued properties inline their object's properties, one level
    // deep, without children.
    let expanded = match node.kind() {
        NodeKind::Value { .. } | NodeKind::Lazy { .. }
            if delegate.expand_property_values() && delegate.include_properties() =>
        {
            node.value_object().map(|object| {
                let nested = delegate.copy_with(Some(0), Some(false));
                let owned = DiagnosticsNode::describe(Rc::clone(object));
                let properties =
                    nested.filter_properties(visible(owned.get_properties().into_owned()), node);
                to_json_list_with_details(properties, Some(node), &nested, full_details)
            })
        }
        _ => None,
    };

    let children = node.get_children();
    let style = node.style();
    let mut json = JsonMap::new();
    json.insert("description".into(), Value::String(node.to_description(None)));
    json.insert(
        "shouldIndent".into(),
        Value::Bool(!matches!(style, TreeStyle::Flat | TreeStyle::Error)),
    );
    json.extend(delegate.additional_node_properties(node, full_details));

    if full_details {
        json.insert("type".into(), Value::String(node.type_name().to_owned()));
        if let Some(name) = node.name() {
            json.insert("name".into(), Value::String(name.to_owned()));
        }
        if !node.show_separator() {
            json.insert("showSeparator".into(), Value::Bool(false));
        }
        let level = node.level();
        if level != DiagnosticLevel::Info {
            json.insert("level".into(), Value::String(level.as_str().to_owned()));
        }
        if !node.show_name() {
            json.insert("showName".into(), Value::Bool(false));
        }
        if let Some(text) = node.empty_body_description() {
            json.insert("emptyBodyDescription".into(), Value::String(text.to_owned()));
        }
        json.insert("style".into(), Value::String(style.as_str().to_owned()));
        if node.allow_truncate() {
            json.insert("allowTruncate".into(), Value::Bool(true));
        }
        if !children.is_empty() {
            json.insert("hasChildren".into(), Value::Bool(true));
        }
        if let Some(prefix) = node.line_prefix().filter(|p| !p.is_empty()) {
            json.insert("linePrefix".into(), Value::String(prefix.to_owned()));
        }
        if !node.allow_wrap() {
            json.insert("allowWrap".into(), Value::Bool(false));
        }
        if node.allow_name_wrap() {
            json.insert("allowNameWrap".into(), Value::Bool(true));
        }
        if delegate.include_properties() {
            let properties =
                delegate.filter_properties(visible(node.get_properties().into_owned()), node);
            json.insert(
                "properties".into(),
                Value::Array(
                    to_json_list_with_details(properties, Some(node), delegate, full_details)
                        .into_iter()
                        .map(Value::Object)
                        .collect(),
                ),
            );
        }
    }
    if delegate.subtree_depth() > 0 {
        let children = delegate.filter_children(visible(children.into_owned()), node);
        json.insert(
            "children".into(),
            Value::Array(
                to_json_list_with_details(children, Some(node), delegate, full_details)
                    .into_iter()
                    .map(Value::Object)
                    .collect(),
            ),
        );
    }

    if full_details && node.property_spec().is_some() {
        add_property_keys(node, &mut json);
    }
    if let Some(properties) = expanded {
        json.insert(
            "properties".into(),
            Value::Array(properties.into_iter().map(Value::Object).collect()),
        );
    }
    json
}

/// Drops hidden nodes. They never reach a `properties` or `children` list.
pub fn visible(mut nodes: Vec<DiagnosticsNode>) -> Vec<DiagnosticsNode> {
    nodes.retain(DiagnosticsNode::show);
    nodes
}

/// Keys specific to value and lazy nodes.
fn add_property_keys(node: &DiagnosticsNode, json: &mut JsonMap) {
    let Some(spec) = node.property_spec() else {
        return;
    };
    if let Some(default) = &spec.default_value {
        json.insert("defaultValue".into(), Value::String(default.to_string()));
    }
    if let Some(text) = &spec.if_empty {
        json.insert("ifEmpty".into(), Value::String(text.clone()));
    }
    if let Some(text) = &spec.if_null {
        json.insert("ifNull".into(), Value::String(text.clone()));
    }
    if let Some(text) = &spec.tooltip {
        json.insert("tooltip".into(), Value::String(text.clone()));
    }
    json.insert("missingIfNull".into(), Value::Bool(spec.missing_if_null));
    if let Some(exception) = node.exception() {
        json.insert("exception".into(), Value::String(exception.to_owned()));
    }
    json.insert(
        "propertyType".into(),
        Value::String(spec.format.property_type().to_owned()),
    );
    json.insert(
        "defaultLevel".into(),
        Value::String(node.default_level().as_str().to_owned()),
    );

    match &spec.format {
        PropertyFormat::String { quoted } => {
            json.insert("quoted".into(), Value::Bool(*quoted));
        }
        PropertyFormat::Int { unit: Some(unit) } | PropertyFormat::Double { unit: Some(unit), .. } => {
            json.insert("unit".into(), Value::String(unit.clone()));
        }
        PropertyFormat::Flag { if_true, if_false } => {
            if let Some(text) = if_true {
                json.insert("ifTrue".into(), Value::String(text.clone()));
            }
            if let Some(text) = if_false {
                json.insert("ifFalse".into(), Value::String(text.clone()));
            }
        }
        _ => {}
    }

    match node.value() {
        Some(DiagnosticValue::Object(_)) => {
            json.insert("isDiagnosticableValue".into(), Value::Bool(true));
        }
        Some(DiagnosticValue::List(values)) => {
            json.insert(
                "values".into(),
                Value::Array(values.iter().cloned().map(Value::String).collect()),
            );
        }
        Some(value) => {
            if let Some(value) = value_to_json(value) {
                json.insert("value".into(), value);
            }
        }
        None => {}
    }
}

/// Wire form of scalar payloads. Non-finite doubles become strings.
pub fn value_to_json(value: &DiagnosticValue) -> Option<Value> {
    match value {
        DiagnosticValue::Null => Some(Value::Null),
        DiagnosticValue::Bool(v) => Some(Value::Bool(*v)),
        DiagnosticValue::Int(v) => Some(Value::Number((*v).into())),
        DiagnosticValue::Double(v) => Some(
            Number::from_f64(*v)
                .map_or_else(|| Value::String(format_double(*v, 1)), Value::Number),
        ),
        DiagnosticValue::Str(v) | DiagnosticValue::Enum(v) => Some(Value::String(v.clone())),
        DiagnosticValue::Object(_) | DiagnosticValue::List(_) => None,
    }
}

/// Serialize a list of sibling nodes.
///
/// Hidden nodes are skipped. When the delegate truncates the list, a `...`
/// message record flagged `truncated: true` is appended.
pub fn to_json_list<D: SerializationDelegate>(
    nodes: Vec<DiagnosticsNode>,
    parent: Option<&DiagnosticsNode>,
    delegate: &D,
) -> Vec<JsonMap> {
    to_json_list_with_details(nodes, parent, delegate, true)
}

pub fn to_json_list_with_details<D: SerializationDelegate>(
    nodes: Vec<DiagnosticsNode>,
    parent: Option<&DiagnosticsNode>,
    delegate: &D,
    full_details: bool,
) -> Vec<JsonMap> {
    let nodes = visible(nodes);
    let original_len = nodes.len();
    let mut nodes = delegate.truncate_nodes_list(nodes, parent);
    let truncated = nodes.len() != original_len;
    if truncated {
        nodes.push(DiagnosticsNode::message("..."));
    }
    let mut json: Vec<JsonMap> = nodes
        .iter()
        .map(|node| to_json_map_with_details(node, &delegate.delegate_for_node(node), full_details))
        .collect();
    if truncated {
        if let Some(last) = json.last_mut() {
            last.insert("truncated".into(), Value::Bool(true));
        }
    }
    json
}

#[cfg(test)]
mod tests;

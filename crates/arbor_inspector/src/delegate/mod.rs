//! Serialization policy for inspection clients.

use std::fmt;
use std::rc::Rc;

use arbor_diagnostics::{DiagnosticLevel, DiagnosticsNode, JsonMap, SerializationDelegate};
use serde_json::Value;

use crate::registry::InspectorObject;
use crate::service::InspectorService;

/// Extra keys attached to every serialized node.
pub type AdditionalProperties = Rc<dyn Fn(&DiagnosticsNode) -> JsonMap>;

/// Serialization delegate that mints ids, filters to the summary tree and
/// reports creation locations.
///
/// Ids are only emitted when a group name is set; without one the output is
/// a plain export that keeps nothing alive.
#[derive(Clone)]
pub struct InspectorSerializationDelegate<'a> {
    service: &'a InspectorService,
    pub group_name: Option<String>,
    pub summary_tree: bool,
    pub max_descendants_truncatable_node: Option<usize>,
    pub expand_property_values: bool,
    pub subtree_depth: usize,
    pub include_properties: bool,
    pub additional_properties: Option<AdditionalProperties>,
}

impl fmt::Debug for InspectorSerializationDelegate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InspectorSerializationDelegate")
            .field("group_name", &self.group_name)
            .field("summary_tree", &self.summary_tree)
            .field("subtree_depth", &self.subtree_depth)
            .field("include_properties", &self.include_properties)
            .finish_non_exhaustive()
    }
}

impl<'a> InspectorSerializationDelegate<'a> {
    pub fn new(service: &'a InspectorService) -> Self {
        InspectorSerializationDelegate {
            service,
            group_name: None,
            summary_tree: false,
            max_descendants_truncatable_node: service.config().max_descendants_truncatable_node,
            expand_property_values: true,
            subtree_depth: 1,
            include_properties: false,
            additional_properties: None,
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: &str) -> Self {
        self.group_name = Some(group.to_owned());
        self
    }

    #[must_use]
    pub fn with_summary_tree(mut self, summary_tree: bool) -> Self {
        self.summary_tree = summary_tree;
        self
    }

    #[must_use]
    pub fn with_subtree_depth(mut self, depth: usize) -> Self {
        self.subtree_depth = depth;
        self
    }

    #[must_use]
    pub fn with_include_properties(mut self, include: bool) -> Self {
        self.include_properties = include;
        self
    }

    #[must_use]
    pub fn with_expand_property_values(mut self, expand: bool) -> Self {
        self.expand_property_values = expand;
        self
    }

    #[must_use]
    pub fn with_max_descendants(mut self, max: Option<usize>) -> Self {
        self.max_descendants_truncatable_node = max;
        self
    }

    #[must_use]
    pub fn with_additional_properties(
        mut self,
        callback: impl Fn(&DiagnosticsNode) -> JsonMap + 'static,
    ) -> Self {
        self.additional_properties = Some(Rc::new(callback));
        self
    }
}

impl SerializationDelegate for InspectorSerializationDelegate<'_> {
    fn subtree_depth(&self) -> usize {
        self.subtree_depth
    }

    fn include_properties(&self) -> bool {
        self.include_properties
    }

    fn expand_property_values(&self) -> bool {
        self.expand_property_values
    }

    fn additional_node_properties(&self, node: &DiagnosticsNode, _full_details: bool) -> JsonMap {
        let mut json = JsonMap::new();
        if self.summary_tree {
            json.insert("summaryTree".into(), Value::Bool(true));
        }
        if let Some(group) = &self.group_name {
            let object_id = self
                .service
                .to_id(&InspectorObject::Node(Rc::new(node.clone())), group);
            json.insert("objectId".into(), Value::String(object_id));
            if let Some(value) = node.value_object() {
                let value_id = self
                    .service
                    .to_id(&InspectorObject::Value(Rc::clone(value)), group);
                json.insert("valueId".into(), Value::String(value_id));
            }
        }
        if let Some(location) = node.creation_location() {
            json.insert(
                "locationId".into(),
                Value::from(self.service.location_id(&location)),
            );
            match serde_json::to_value(&location) {
                Ok(value) => {
                    json.insert("creationLocation".into(), value);
                }
                Err(error) => tracing::warn!(%error, "failed to serialize creation location"),
            }
            if self.service.local_project().contains(&location) {
                json.insert("createdByLocalProject".into(), Value::Bool(true));
            }
        }
        if let Some(callback) = &self.additional_properties {
            json.extend(callback(node));
        }
        json
    }

    fn filter_children(
        &self,
        nodes: Vec<DiagnosticsNode>,
        _owner: &DiagnosticsNode,
    ) -> Vec<DiagnosticsNode> {
        self.service.filter_children(nodes, self.summary_tree)
    }

    /// Locally created owners show their fine-level properties too.
    fn filter_properties(
        &self,
        nodes: Vec<DiagnosticsNode>,
        owner: &DiagnosticsNode,
    ) -> Vec<DiagnosticsNode> {
        let min_level = if self.service.local_project().created_locally(owner) {
            DiagnosticLevel::Fine
        } else {
            DiagnosticLevel::Info
        };
        nodes
            .into_iter()
            .filter(|node| !node.is_filtered(min_level))
            .collect()
    }

    fn truncate_nodes_list(
        &self,
        nodes: Vec<DiagnosticsNode>,
        owner: Option<&DiagnosticsNode>,
    ) -> Vec<DiagnosticsNode> {
        match self.max_descendants_truncatable_node {
            Some(max) if owner.is_some_and(DiagnosticsNode::allow_truncate) && nodes.len() > max => {
                self.service.truncate(&nodes, max)
            }
            _ => nodes,
        }
    }

    /// Depth is consumed in summary trees and at summary nodes. A details
    /// tree on its last level keeps expanding through non-summary nodes
    /// until it reaches the next summary node.
    fn delegate_for_node(&self, node: &DiagnosticsNode) -> Self {
        if self.summary_tree
            || self.subtree_depth > 1
            || self.service.should_show_in_summary_tree(node)
        {
            self.copy_with(Some(self.subtree_depth.saturating_sub(1)), None)
        } else {
            self.clone()
        }
    }

    fn copy_with(&self, subtree_depth: Option<usize>, include_properties: Option<bool>) -> Self {
        InspectorSerializationDelegate {
            subtree_depth: subtree_depth.unwrap_or(self.subtree_depth),
            include_properties: include_properties.unwrap_or(self.include_properties),
            ..self.clone()
        }
    }
}

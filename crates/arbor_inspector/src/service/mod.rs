//! Tree queries for inspection clients.
//!
//! Every query takes a group name; ids minted while answering it belong to
//! that group and stay valid until the client disposes the group. Results
//! are JSON values in the shape produced by
//! [`to_json_map`](arbor_diagnostics::to_json_map).

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use arbor_diagnostics::node::CreationLocation;
use arbor_diagnostics::serialize::{to_json_list, visible};
use arbor_diagnostics::{
    to_json_map, truncate_nodes, DiagnosticLevel, Diagnosticable, DiagnosticsNode,
    DiagnosticsResult, JsonMap, LocalProject, SerializationDelegate,
};
use arbor_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;
use serde_json::{json, Value};

use crate::config::InspectorConfig;
use crate::delegate::InspectorSerializationDelegate;
use crate::registry::{InspectorObject, ReferenceRegistry};

/// Depth used for summary trees: effectively unlimited.
const SUMMARY_TREE_DEPTH: usize = 1_000_000;

/// One step of a parent chain: a node, its children, and which child
/// continues the chain.
struct PathNode {
    node: DiagnosticsNode,
    children: Vec<DiagnosticsNode>,
    child_index: Option<usize>,
}

/// Answers inspection queries over a root object.
///
/// Single-threaded. Queries take `&self`; the registry uses interior
/// mutability because serialization mints ids mid-traversal.
pub struct InspectorService {
    config: InspectorConfig,
    local_project: LocalProject,
    registry: RefCell<ReferenceRegistry>,
    location_ids: RefCell<FxHashMap<CreationLocation, usize>>,
    root: Option<Rc<dyn Diagnosticable>>,
    selection: Option<InspectorObject>,
}

impl Default for InspectorService {
    fn default() -> Self {
        Self::new(InspectorConfig::default())
    }
}

impl InspectorService {
    pub fn new(config: InspectorConfig) -> Self {
        InspectorService {
            local_project: config.local_project(),
            config,
            registry: RefCell::new(ReferenceRegistry::new()),
            location_ids: RefCell::new(FxHashMap::default()),
            root: None,
            selection: None,
        }
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub fn local_project(&self) -> &LocalProject {
        &self.local_project
    }

    pub fn set_pub_root_directories<I, S>(&mut self, roots: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.pub_root_directories = roots.into_iter().map(Into::into).collect();
        self.local_project = self.config.local_project();
    }

    pub fn set_root(&mut self, root: Rc<dyn Diagnosticable>) {
        self.root = Some(root);
    }

    pub fn root_node(&self) -> Option<DiagnosticsNode> {
        self.root
            .as_ref()
            .map(|root| DiagnosticsNode::describe(Rc::clone(root)))
    }

    // Registry pass-throughs

    pub fn registry(&self) -> Ref<'_, ReferenceRegistry> {
        self.registry.borrow()
    }

    pub fn to_id(&self, object: &InspectorObject, group: &str) -> String {
        self.registry.borrow_mut().to_id(object, group)
    }

    pub fn to_object(&self, id: &str) -> DiagnosticsResult<InspectorObject> {
        self.registry.borrow().to_object(id)
    }

    pub fn dispose_group(&self, group: &str) {
        self.registry.borrow_mut().dispose_group(group);
    }

    pub fn dispose_id(&self, id: &str, group: &str) -> DiagnosticsResult<()> {
        self.registry.borrow_mut().dispose_id(id, group)
    }

    /// Forget every id and location id.
    pub fn dispose_all_groups(&self) {
        self.registry.borrow_mut().dispose_all_groups();
        self.location_ids.borrow_mut().clear();
    }

    /// Small integer standing for `location`, stable for the service's
    /// lifetime.
    pub fn location_id(&self, location: &CreationLocation) -> usize {
        let mut ids = self.location_ids.borrow_mut();
        let next = ids.len();
        *ids.entry(location.clone()).or_insert(next)
    }

    // Summary predicate

    /// Error nodes, nodes that describe no object, and every node when
    /// creation tracking is off belong to the summary tree; otherwise only
    /// objects created by the local project do.
    pub fn should_show_in_summary_tree(&self, node: &DiagnosticsNode) -> bool {
        if node.level() == DiagnosticLevel::Error {
            return true;
        }
        if node.value_object().is_none() || !self.config.track_creation_locations {
            return true;
        }
        self.local_project.created_locally(node)
    }

    /// Drop hidden nodes. In summary trees, also replace every non-summary
    /// node by its filtered children.
    pub(crate) fn filter_children(
        &self,
        nodes: Vec<DiagnosticsNode>,
        summary_tree: bool,
    ) -> Vec<DiagnosticsNode> {
        let nodes = visible(nodes);
        if !summary_tree {
            return nodes;
        }
        ensure_sufficient_stack(|| {
            let mut kept = Vec::with_capacity(nodes.len());
            for node in nodes {
                if self.should_show_in_summary_tree(&node) {
                    kept.push(node);
                } else {
                    kept.extend(self.filter_children(node.get_children().into_owned(), true));
                }
            }
            kept
        })
    }

    pub(crate) fn truncate(&self, nodes: &[DiagnosticsNode], max: usize) -> Vec<DiagnosticsNode> {
        let local = self
            .config
            .track_creation_locations
            .then_some(&self.local_project);
        truncate_nodes(nodes, max, local)
    }

    fn delegate(&self, group: &str) -> InspectorSerializationDelegate<'_> {
        InspectorSerializationDelegate::new(self).with_group(group)
    }

    fn node_for_id(&self, id: &str) -> DiagnosticsResult<DiagnosticsNode> {
        Ok(self.to_object(id)?.to_diagnostics_node())
    }

    // Queries

    /// The whole tree, reduced to summary nodes.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_root_summary_tree(&self, group: &str) -> Value {
        let Some(root) = self.root_node() else {
            return Value::Null;
        };
        let delegate = self
            .delegate(group)
            .with_subtree_depth(SUMMARY_TREE_DEPTH)
            .with_summary_tree(true);
        Value::Object(to_json_map(&root, &delegate))
    }

    /// The unfiltered tree with properties, `subtree_depth` levels deep.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_root_details_subtree(&self, group: &str, subtree_depth: usize) -> Value {
        let Some(root) = self.root_node() else {
            return Value::Null;
        };
        let delegate = self
            .delegate(group)
            .with_subtree_depth(subtree_depth)
            .with_include_properties(true);
        Value::Object(to_json_map(&root, &delegate))
    }

    /// Path from the root to the object behind `id`.
    ///
    /// Each entry is `{node, children, childIndex}`. An object not reachable
    /// from the root yields an empty list.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_parent_chain(&self, id: &str, group: &str) -> DiagnosticsResult<Value> {
        let target = self.to_object(id)?;
        let mut path = Vec::new();
        let target_value = match &target {
            InspectorObject::Value(value) => Some(Rc::clone(value)),
            InspectorObject::Node(node) => node.value_object().cloned(),
        };
        match (target_value, self.root_node()) {
            (Some(value), Some(root)) => {
                let target = InspectorObject::Value(value);
                if find_path(&root, &target, &mut path) {
                    path.reverse();
                }
            }
            (None, _) => {
                let node = target.to_diagnostics_node();
                let children = node.get_children().into_owned();
                path.push(PathNode {
                    node,
                    children,
                    child_index: None,
                });
            }
            (Some(_), None) => {}
        }

        let delegate = self.delegate(group).with_subtree_depth(0);
        let chain = path
            .iter()
            .map(|step| {
                json!({
                    "node": to_json_map(&step.node, &delegate),
                    "children": json_list(to_json_list(step.children.clone(), Some(&step.node), &delegate)),
                    "childIndex": step.child_index,
                })
            })
            .collect();
        Ok(Value::Array(chain))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_properties(&self, id: &str, group: &str) -> DiagnosticsResult<Value> {
        let node = self.node_for_id(id)?;
        let delegate = self.delegate(group);
        let properties = delegate.filter_properties(visible(node.get_properties().into_owned()), &node);
        Ok(json_list(to_json_list(properties, Some(&node), &delegate)))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_children(&self, id: &str, group: &str) -> DiagnosticsResult<Value> {
        let delegate = self.delegate(group);
        self.children_json(id, &delegate)
    }

    /// Children with non-summary nodes spliced out.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_children_summary_tree(&self, id: &str, group: &str) -> DiagnosticsResult<Value> {
        let delegate = self.delegate(group).with_summary_tree(true);
        self.children_json(id, &delegate)
    }

    /// Children with their properties, one level deep.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_children_details_subtree(&self, id: &str, group: &str) -> DiagnosticsResult<Value> {
        let delegate = self
            .delegate(group)
            .with_subtree_depth(1)
            .with_include_properties(true);
        self.children_json(id, &delegate)
    }

    /// The node behind `id` with properties, `subtree_depth` levels deep.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_details_subtree(
        &self,
        id: &str,
        group: &str,
        subtree_depth: usize,
    ) -> DiagnosticsResult<Value> {
        let node = self.node_for_id(id)?;
        let delegate = self
            .delegate(group)
            .with_subtree_depth(subtree_depth)
            .with_include_properties(true);
        Ok(Value::Object(to_json_map(&node, &delegate)))
    }

    fn children_json(
        &self,
        id: &str,
        delegate: &InspectorSerializationDelegate<'_>,
    ) -> DiagnosticsResult<Value> {
        let node = self.node_for_id(id)?;
        let children = self.filter_children(node.get_children().into_owned(), delegate.summary_tree);
        Ok(json_list(to_json_list(children, Some(&node), delegate)))
    }

    // Selection

    /// Select `object`. Returns whether the selection changed.
    pub fn set_selection(&mut self, object: Option<InspectorObject>) -> bool {
        let changed = match (&self.selection, &object) {
            (Some(current), Some(new)) => !current.same_object(new),
            (None, None) => false,
            _ => true,
        };
        if changed {
            tracing::debug!(selection = ?object, "selection changed");
            self.selection = object;
        }
        changed
    }

    /// Select the object behind `id`. Returns whether the selection changed.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn set_selection_by_id(&mut self, id: &str) -> DiagnosticsResult<bool> {
        let object = self.to_object(id)?;
        Ok(self.set_selection(Some(object)))
    }

    pub fn selection(&self) -> Option<&InspectorObject> {
        self.selection.as_ref()
    }

    /// The selected node, or `null` when nothing is selected.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_selected(&self, group: &str) -> Value {
        match &self.selection {
            Some(object) => {
                let node = object.to_diagnostics_node();
                Value::Object(to_json_map(&node, &self.delegate(group)))
            }
            None => Value::Null,
        }
    }
}

fn json_list(records: Vec<JsonMap>) -> Value {
    Value::Array(records.into_iter().map(Value::Object).collect())
}

/// Depth-first search for the node describing `target`. On success `path`
/// holds the steps from the target up to `node`.
fn find_path(node: &DiagnosticsNode, target: &InspectorObject, path: &mut Vec<PathNode>) -> bool {
    ensure_sufficient_stack(|| {
        let children = visible(node.get_children().into_owned());
        let is_target = node
            .value_object()
            .is_some_and(|value| InspectorObject::Value(Rc::clone(value)).same_object(target));
        if is_target {
            path.push(PathNode {
                node: node.clone(),
                children,
                child_index: None,
            });
            return true;
        }
        match children.iter().position(|child| find_path(child, target, path)) {
            Some(index) => {
                path.push(PathNode {
                    node: node.clone(),
                    children,
                    child_index: Some(index),
                });
                true
            }
            None => false,
        }
    })
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

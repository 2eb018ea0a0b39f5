//! Reference registry: stable string ids for live objects.
//!
//! An inspection client runs out of process and refers back to objects it
//! has seen by id. Ids are handed out per *group*; an object stays alive as
//! long as at least one group holds it. Identity is pointer identity, so two
//! structurally equal objects get distinct ids.

use std::fmt;
use std::rc::Rc;

use arbor_diagnostics::{Diagnosticable, DiagnosticsError, DiagnosticsNode, DiagnosticsResult};
use rustc_hash::{FxHashMap, FxHashSet};

/// Prefix of every minted id.
pub const ID_PREFIX: &str = "inspector-";

/// An object the registry can hold.
#[derive(Clone)]
pub enum InspectorObject {
    /// A node retained for follow-up queries.
    Node(Rc<DiagnosticsNode>),
    /// A host object.
    Value(Rc<dyn Diagnosticable>),
}

impl InspectorObject {
    /// Address of the referenced allocation.
    fn identity(&self) -> usize {
        match self {
            InspectorObject::Node(node) => Rc::as_ptr(node).cast::<()>() as usize,
            InspectorObject::Value(value) => Rc::as_ptr(value).cast::<()>() as usize,
        }
    }

    /// Whether both refer to the same allocation.
    pub fn same_object(&self, other: &InspectorObject) -> bool {
        self.identity() == other.identity()
    }

    /// A node describing the object: the retained node itself, or a
    /// delegating node for a host object.
    pub fn to_diagnostics_node(&self) -> DiagnosticsNode {
        match self {
            InspectorObject::Node(node) => DiagnosticsNode::clone(node),
            InspectorObject::Value(value) => DiagnosticsNode::describe(Rc::clone(value)),
        }
    }
}

impl fmt::Debug for InspectorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InspectorObject::Node(node) => f.debug_tuple("Node").field(&node.type_name()).finish(),
            InspectorObject::Value(value) => {
                f.debug_tuple("Value").field(&value.to_string_short()).finish()
            }
        }
    }
}

struct Entry {
    object: InspectorObject,
    ref_count: usize,
}

/// Bidirectional id/object map with group-scoped reference counts.
#[derive(Default)]
pub struct ReferenceRegistry {
    entries: FxHashMap<String, Entry>,
    ids_by_identity: FxHashMap<usize, String>,
    groups: FxHashMap<String, FxHashSet<String>>,
    next_id: u64,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `object`, registered in `group`.
    ///
    /// An object already registered keeps its id; its count rises by one
    /// only the first time a given group sees it.
    pub fn to_id(&mut self, object: &InspectorObject, group: &str) -> String {
        let identity = object.identity();
        let id = match self.ids_by_identity.get(&identity) {
            Some(id) => id.clone(),
            None => {
                let id = format!("{ID_PREFIX}{}", self.next_id);
                self.next_id += 1;
                self.ids_by_identity.insert(identity, id.clone());
                self.entries.insert(
                    id.clone(),
                    Entry {
                        object: object.clone(),
                        ref_count: 0,
                    },
                );
                tracing::trace!(%id, group, "minted id");
                id
            }
        };
        let added = self
            .groups
            .entry(group.to_owned())
            .or_default()
            .insert(id.clone());
        if added {
            if let Some(entry) = self.entries.get_mut(&id) {
                entry.ref_count += 1;
            }
        }
        id
    }

    /// The object behind `id`. Unknown and disposed ids are `NotFound`.
    pub fn to_object(&self, id: &str) -> DiagnosticsResult<InspectorObject> {
        self.entries
            .get(id)
            .map(|entry| entry.object.clone())
            .ok_or_else(|| DiagnosticsError::not_found(id))
    }

    /// Release every id held by `group`.
    pub fn dispose_group(&mut self, group: &str) {
        let Some(ids) = self.groups.remove(group) else {
            return;
        };
        tracing::debug!(group, ids = ids.len(), "disposing group");
        for id in ids {
            self.release(&id);
        }
    }

    /// Release `id` from `group` only.
    pub fn dispose_id(&mut self, id: &str, group: &str) -> DiagnosticsResult<()> {
        if !self.entries.contains_key(id) {
            return Err(DiagnosticsError::not_found(id));
        }
        let removed = self
            .groups
            .get_mut(group)
            .is_some_and(|ids| ids.remove(id));
        if !removed {
            return Err(DiagnosticsError::InvalidOperation(format!(
                "id is not in group {group}: {id}"
            )));
        }
        if self.groups.get(group).is_some_and(FxHashSet::is_empty) {
            self.groups.remove(group);
        }
        self.release(id);
        Ok(())
    }

    /// Forget every group and id. Numbering restarts.
    pub fn dispose_all_groups(&mut self) {
        tracing::debug!(entries = self.entries.len(), "disposing all groups");
        self.entries.clear();
        self.ids_by_identity.clear();
        self.groups.clear();
        self.next_id = 0;
    }

    /// Number of groups holding `id`.
    pub fn ref_count(&self, id: &str) -> Option<usize> {
        self.entries.get(id).map(|entry| entry.ref_count)
    }

    pub fn group_len(&self, group: &str) -> usize {
        self.groups.get(group).map_or(0, FxHashSet::len)
    }

    /// Number of live ids.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn release(&mut self, id: &str) {
        let Some(entry) = self.entries.get_mut(id) else {
            return;
        };
        entry.ref_count = entry.ref_count.saturating_sub(1);
        if entry.ref_count == 0 {
            if let Some(entry) = self.entries.remove(id) {
                self.ids_by_identity.remove(&entry.object.identity());
            }
            tracing::trace!(id, "evicted id");
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

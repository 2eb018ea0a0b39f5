//! Child-list truncation with a preference for locally created objects.

use crate::node::{CreationLocation, DiagnosticsNode};

/// Root directories of the host's own project.
///
/// Objects whose creation location lies under one of these roots are
/// "created by the local project"; everything else is library code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalProject {
    roots: Vec<String>,
}

impl LocalProject {
    pub fn new<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LocalProject {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Whether `location` lies under one of the project roots.
    pub fn contains(&self, location: &CreationLocation) -> bool {
        self.roots.iter().any(|root| location.file.starts_with(root.as_str()))
    }

    /// Whether the object `node` describes was created by the local project.
    pub fn created_locally(&self, node: &DiagnosticsNode) -> bool {
        node.creation_location()
            .is_some_and(|location| self.contains(&location))
    }
}

/// Cut `nodes` down for display.
///
/// When creation tracking is on (`local` is set), every node describes an
/// object, and at least one of them was created locally, exactly the local
/// subset is returned. Otherwise the first `max` nodes are kept.
pub fn truncate_nodes(
    nodes: &[DiagnosticsNode],
    max: usize,
    local: Option<&LocalProject>,
) -> Vec<DiagnosticsNode> {
    if let Some(local) = local {
        if nodes.iter().all(|node| node.value_object().is_some()) {
            let local_nodes: Vec<DiagnosticsNode> = nodes
                .iter()
                .filter(|node| local.created_locally(node))
                .cloned()
                .collect();
            if !local_nodes.is_empty() {
                return local_nodes;
            }
        }
    }
    nodes.iter().take(max).cloned().collect()
}

#[cfg(test)]
mod tests;

use super::*;
use crate::node::Diagnosticable;
use pretty_assertions::assert_eq;
use std::rc::Rc;

struct Located(&'static str);

impl Diagnosticable for Located {
    fn to_string_short(&self) -> String {
        self.0.to_owned()
    }

    fn creation_location(&self) -> Option<CreationLocation> {
        Some(CreationLocation::new(self.0, 1, 1))
    }
}

fn located(file: &'static str) -> DiagnosticsNode {
    DiagnosticsNode::describe(Rc::new(Located(file)))
}

fn descriptions(nodes: &[DiagnosticsNode]) -> Vec<String> {
    nodes.iter().map(|node| node.to_description(None)).collect()
}

#[test]
fn test_local_subset_wins() {
    let project = LocalProject::new(["app/"]);
    let nodes = vec![
        located("lib/a.rs"),
        located("app/b.rs"),
        located("lib/c.rs"),
        located("lib/d.rs"),
    ];

    assert_eq!(
        descriptions(&truncate_nodes(&nodes, 2, Some(&project))),
        vec!["app/b.rs"]
    );
}

#[test]
fn test_falls_back_to_prefix() {
    let project = LocalProject::new(["app/"]);
    let nodes = vec![located("lib/a.rs"), located("lib/b.rs"), located("lib/c.rs")];
    assert_eq!(
        descriptions(&truncate_nodes(&nodes, 2, Some(&project))),
        vec!["lib/a.rs", "lib/b.rs"]
    );

    let mixed = vec![located("app/a.rs"), DiagnosticsNode::block("plain"), located("lib/c.rs")];
    assert_eq!(
        descriptions(&truncate_nodes(&mixed, 1, Some(&project))),
        vec!["app/a.rs"]
    );
    assert_eq!(descriptions(&truncate_nodes(&mixed, 2, None)), vec!["app/a.rs", "plain"]);
}

#[test]
fn test_project_contains() {
    let project = LocalProject::new(["/src/app"]);
    assert!(project.contains(&CreationLocation::new("/src/app/main.rs", 1, 1)));
    assert!(!project.contains(&CreationLocation::new("/src/lib/main.rs", 1, 1)));
    assert!(LocalProject::default().is_empty());
    assert!(!project.created_locally(&DiagnosticsNode::block("no object")));
}

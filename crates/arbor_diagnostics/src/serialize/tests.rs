use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn tree() -> DiagnosticsNode {
    DiagnosticsNode::block("root")
        .with_properties(vec![DiagnosticsNode::int("w", Some(3)).with_unit("px")])
        .with_children(vec![
            DiagnosticsNode::block("a").with_children(vec![DiagnosticsNode::block("leaf")]),
            DiagnosticsNode::block("b"),
        ])
}

/// Keeps only the first node of every list.
struct FirstOnly(DefaultSerializationDelegate);

impl SerializationDelegate for FirstOnly {
    fn subtree_depth(&self) -> usize {
        self.0.subtree_depth
    }

    fn include_properties(&self) -> bool {
        self.0.include_properties
    }

    fn expand_property_values(&self) -> bool {
        false
    }

    fn additional_node_properties(&self, _node: &DiagnosticsNode, _full: bool) -> JsonMap {
        JsonMap::new()
    }

    fn filter_children(&self, nodes: Vec<DiagnosticsNode>, _: &DiagnosticsNode) -> Vec<DiagnosticsNode> {
        nodes
    }

    fn filter_properties(&self, nodes: Vec<DiagnosticsNode>, _: &DiagnosticsNode) -> Vec<DiagnosticsNode> {
        nodes
    }

    fn truncate_nodes_list(
        &self,
        nodes: Vec<DiagnosticsNode>,
        _owner: Option<&DiagnosticsNode>,
    ) -> Vec<DiagnosticsNode> {
        nodes.into_iter().take(1).collect()
    }

    fn delegate_for_node(&self, node: &DiagnosticsNode) -> Self {
        FirstOnly(self.0.delegate_for_node(node))
    }

    fn copy_with(&self, subtree_depth: Option<usize>, include_properties: Option<bool>) -> Self {
        FirstOnly(self.0.copy_with(subtree_depth, include_properties))
    }
}

#[test]
fn test_depth_zero_has_no_children_key() {
    let json = to_json_map(&tree(), &DefaultSerializationDelegate::default());

    assert_eq!(json["description"], json!("root"));
    assert_eq!(json["type"], json!("DiagnosticsBlock"));
    assert_eq!(json["style"], json!("normal"));
    assert_eq!(json["hasChildren"], json!(true));
    assert!(!json.contains_key("children"));
    assert!(!json.contains_key("properties"));
    assert!(!json.contains_key("level"));
}

#[test]
fn test_depth_is_consumed_per_level() {
    let json = to_json_map(&tree(), &DefaultSerializationDelegate::new(1, false));
    let children = json["children"].as_array().cloned().unwrap_or_default();

    assert_eq!(children.len(), 2);
    assert_eq!(children[0]["description"], json!("a"));
    assert_eq!(children[0]["hasChildren"], json!(true));
    assert!(children[0].get("children").is_none());
}

#[test]
fn test_property_record_keys() {
    let json = to_json_map(&tree(), &DefaultSerializationDelegate::new(0, true));
    let property = &json["properties"][0];

    assert_eq!(property["name"], json!("w"));
    assert_eq!(property["description"], json!("3px"));
    assert_eq!(property["type"], json!("IntProperty"));
    assert_eq!(property["propertyType"], json!("int"));
    assert_eq!(property["defaultLevel"], json!("info"));
    assert_eq!(property["missingIfNull"], json!(false));
    assert_eq!(property["unit"], json!("px"));
    assert_eq!(property["value"], json!(3));
    assert_eq!(property["style"], json!("singleLine"));
}

#[test]
fn test_non_finite_doubles_serialize_as_strings() {
    let node = DiagnosticsNode::double("d", Some(f64::NEG_INFINITY));
    let json = to_json_map(&node, &DefaultSerializationDelegate::default());

    assert_eq!(json["value"], json!("-Infinity"));
}

#[test]
fn test_hidden_and_failed_properties() {
    let hidden = to_json_map(
        &DiagnosticsNode::string("s", None),
        &DefaultSerializationDelegate::default(),
    );
    assert_eq!(hidden["level"], json!("hidden"));
    assert_eq!(hidden["value"], Value::Null);
    assert_eq!(hidden["quoted"], json!(false));

    let failed = to_json_map(
        &DiagnosticsNode::lazy("n", PropertyFormat::Int { unit: None }, || {
            Err("boom".to_owned())
        }),
        &DefaultSerializationDelegate::default(),
    );
    assert_eq!(failed["level"], json!("error"));
    assert_eq!(failed["exception"], json!("boom"));
    assert!(!failed.contains_key("value"));
}

#[test]
fn test_hidden_nodes_never_listed() {
    let root = DiagnosticsNode::block("root")
        .with_properties(vec![
            DiagnosticsNode::string("gone", None),
            DiagnosticsNode::int("kept", Some(1)),
        ])
        .with_children(vec![
            DiagnosticsNode::block("secret").with_level(DiagnosticLevel::Hidden),
            DiagnosticsNode::block("shown"),
        ]);
    let json = to_json_map(&root, &DefaultSerializationDelegate::new(1, true));

    assert_eq!(json["properties"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["properties"][0]["name"], json!("kept"));
    assert_eq!(json["children"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["children"][0]["description"], json!("shown"));

    let delegate = FirstOnly(DefaultSerializationDelegate::default());
    let list = to_json_list(root.get_children().into_owned(), Some(&root), &delegate);
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["description"], json!("shown"));
}

#[test]
fn test_iterable_values() {
    let node = DiagnosticsNode::iterable("xs", vec!["a".into(), "b".into()]);
    let json = to_json_map(&node, &DefaultSerializationDelegate::default());

    assert_eq!(json["values"], json!(["a", "b"]));
    assert_eq!(json["propertyType"], json!("Iterable"));
}

#[test]
fn test_truncated_list_gets_marker() {
    let nodes = vec![
        DiagnosticsNode::block("a"),
        DiagnosticsNode::block("b"),
        DiagnosticsNode::block("c"),
    ];
    let json = to_json_list(nodes, None, &FirstOnly(DefaultSerializationDelegate::default()));

    assert_eq!(json.len(), 2);
    assert_eq!(json[0]["description"], json!("a"));
    assert_eq!(json[1]["description"], json!("..."));
    assert_eq!(json[1]["truncated"], json!(true));
    assert!(!json[0].contains_key("truncated"));
}

#[test]
fn test_essential_details_only() {
    let json = to_json_map_with_details(&tree(), &DefaultSerializationDelegate::new(1, true), false);

    assert!(json.contains_key("description"));
    assert!(json.contains_key("shouldIndent"));
    assert!(json.contains_key("children"));
    assert!(!json.contains_key("type"));
    assert!(!json.contains_key("properties"));
}

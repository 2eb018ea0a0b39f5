use super::*;
use arbor_diagnostics::{DiagnosticPropertiesBuilder, DiagnosticValue, DiagnosticsError};
use pretty_assertions::assert_eq;

const GROUP: &str = "tree";

struct Widget {
    name: &'static str,
    file: &'static str,
    children: Vec<Rc<Widget>>,
}

impl Diagnosticable for Widget {
    fn to_string_short(&self) -> String {
        self.name.to_owned()
    }

    fn debug_fill_properties(&self, properties: &mut DiagnosticPropertiesBuilder) {
        properties.add(DiagnosticsNode::int("width", Some(3)));
        properties.add(DiagnosticsNode::int("flex", Some(0)).default_value(DiagnosticValue::Int(0)));
    }

    fn debug_describe_children(&self) -> Vec<DiagnosticsNode> {
        self.children
            .iter()
            .map(|child| DiagnosticsNode::describe(Rc::clone(child) as Rc<dyn Diagnosticable>))
            .collect()
    }

    fn creation_location(&self) -> Option<CreationLocation> {
        Some(CreationLocation::new(self.file, 1, 1))
    }
}

fn widget(name: &'static str, file: &'static str, children: Vec<Rc<Widget>>) -> Rc<Widget> {
    Rc::new(Widget {
        name,
        file,
        children,
    })
}

/// `App` (local) holding `Padding` (library) around `Text` (local), and
/// `Button` (local).
fn service(track: bool) -> InspectorService {
    let text = widget("Text", "app/text.rs", vec![]);
    let padding = widget("Padding", "lib/padding.rs", vec![text]);
    let button = widget("Button", "app/button.rs", vec![]);
    let app = widget("App", "app/main.rs", vec![padding, button]);

    let config = InspectorConfig::default()
        .with_pub_root_directories(["app/"])
        .with_creation_tracking(track);
    let mut service = InspectorService::new(config);
    service.set_root(app);
    service
}

fn descriptions(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|record| record["description"].as_str().unwrap().to_owned())
        .collect()
}

fn id(record: &Value, key: &str) -> String {
    record[key].as_str().unwrap().to_owned()
}

#[test]
fn test_summary_tree_splices_library_nodes() {
    let service = service(true);
    let tree = service.get_root_summary_tree(GROUP);

    assert_eq!(tree["description"], json!("App"));
    assert_eq!(tree["summaryTree"], json!(true));
    assert_eq!(descriptions(&tree["children"]), vec!["Text", "Button"]);
    assert_eq!(tree["children"][0]["createdByLocalProject"], json!(true));
    assert_eq!(
        tree["creationLocation"],
        json!({"file": "app/main.rs", "line": 1, "column": 1})
    );
}

#[test]
fn test_summary_tree_without_tracking_keeps_everything() {
    let service = service(false);
    let tree = service.get_root_summary_tree(GROUP);

    assert_eq!(descriptions(&tree["children"]), vec!["Padding", "Button"]);
}

#[test]
fn test_missing_root_is_null() {
    let service = InspectorService::default();
    assert_eq!(service.get_root_summary_tree(GROUP), Value::Null);
    assert_eq!(service.get_root_details_subtree(GROUP, 2), Value::Null);
}

#[test]
fn test_ids_only_with_group() {
    let service = service(true);
    let root = service.root_node().unwrap();

    let plain = to_json_map(&root, &InspectorSerializationDelegate::new(&service));
    assert!(!plain.contains_key("objectId"));
    assert!(!plain.contains_key("valueId"));
    assert!(service.registry().is_empty());

    let tree = service.get_root_summary_tree(GROUP);
    assert!(tree["objectId"].as_str().unwrap().starts_with("inspector-"));
    assert!(tree["valueId"].is_string());
}

#[test]
fn test_children_queries() {
    let service = service(true);
    let tree = service.get_root_summary_tree(GROUP);
    let app = id(&tree, "valueId");

    assert_eq!(
        descriptions(&service.get_children(&app, GROUP).unwrap()),
        vec!["Padding", "Button"]
    );
    assert_eq!(
        descriptions(&service.get_children_summary_tree(&app, GROUP).unwrap()),
        vec!["Text", "Button"]
    );

    let details = service.get_children_details_subtree(&app, GROUP).unwrap();
    assert!(details[0]["properties"].is_array());
}

#[test]
fn test_properties_filtered_by_owner_origin() {
    let service = service(true);
    let tree = service.get_root_details_subtree(GROUP, 1);
    let names = |record: &Value| -> Vec<String> {
        record["properties"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_owned())
            .collect()
    };

    assert_eq!(names(&tree), vec!["width", "flex"]);
    assert_eq!(names(&tree["children"][0]), vec!["width"]);

    let app = id(&tree, "valueId");
    let properties = service.get_properties(&app, GROUP).unwrap();
    assert_eq!(properties.as_array().unwrap().len(), 2);
}

#[test]
fn test_details_depth_extends_through_library_nodes() {
    let service = service(true);
    let tree = service.get_root_details_subtree(GROUP, 1);
    let children = &tree["children"];

    assert_eq!(descriptions(children), vec!["Padding", "Button"]);
    // Padding is not a summary node, so the last level continues to Text.
    assert_eq!(descriptions(&children[0]["children"]), vec!["Text"]);
    assert!(children[0]["children"][0].get("children").is_none());
    assert!(children[1].get("children").is_none());
}

#[test]
fn test_details_subtree_by_id() {
    let service = service(true);
    let tree = service.get_root_summary_tree(GROUP);
    let button = id(&tree["children"][1], "valueId");

    let details = service.get_details_subtree(&button, GROUP, 0).unwrap();
    assert_eq!(details["description"], json!("Button"));
    assert!(details.get("children").is_none());
    assert!(details["properties"].is_array());
}

#[test]
fn test_parent_chain() {
    let service = service(true);
    let tree = service.get_root_summary_tree(GROUP);
    let text = id(&tree["children"][0], "valueId");

    let chain = service.get_parent_chain(&text, GROUP).unwrap();
    let steps = chain.as_array().unwrap();
    let nodes: Vec<&Value> = steps.iter().map(|step| &step["node"]["description"]).collect();

    assert_eq!(nodes, vec![&json!("App"), &json!("Padding"), &json!("Text")]);
    assert_eq!(steps[0]["childIndex"], json!(0));
    assert_eq!(steps[2]["childIndex"], Value::Null);
    assert_eq!(descriptions(&steps[0]["children"]), vec!["Padding", "Button"]);
}

#[test]
fn test_selection() {
    let mut service = service(true);
    let tree = service.get_root_summary_tree(GROUP);
    let button = id(&tree["children"][1], "valueId");

    assert_eq!(service.get_selected(GROUP), Value::Null);
    assert!(service.set_selection_by_id(&button).unwrap());
    assert!(!service.set_selection_by_id(&button).unwrap());
    assert_eq!(service.get_selected(GROUP)["description"], json!("Button"));
    assert!(service.set_selection(None));
}

#[test]
fn test_disposed_ids_are_stale() {
    let service = service(true);
    let tree = service.get_root_summary_tree(GROUP);
    let app = id(&tree, "valueId");

    service.dispose_group(GROUP);

    assert_eq!(
        service.get_children(&app, GROUP).unwrap_err(),
        DiagnosticsError::not_found(app.clone())
    );
}

#[test]
fn test_truncated_children() {
    let config = InspectorConfig::default().with_max_descendants(1);
    let service = InspectorService::new(config);
    let node = DiagnosticsNode::block("list")
        .with_allow_truncate(true)
        .with_children(vec![
            DiagnosticsNode::block("a"),
            DiagnosticsNode::block("b"),
            DiagnosticsNode::block("c"),
        ]);
    let list = service.to_id(&InspectorObject::Node(Rc::new(node)), GROUP);

    let children = service.get_children(&list, GROUP).unwrap();
    assert_eq!(descriptions(&children), vec!["a", "..."]);
    assert_eq!(children[1]["truncated"], json!(true));
}

#[test]
fn test_location_ids_are_stable() {
    let service = InspectorService::default();
    let a = CreationLocation::new("a.rs", 1, 2);
    let b = CreationLocation::new("b.rs", 3, 4);

    assert_eq!(service.location_id(&a), 0);
    assert_eq!(service.location_id(&b), 1);
    assert_eq!(service.location_id(&a), 0);
}

#[test]
fn test_error_nodes_always_in_summary() {
    let service = service(true);
    let library = DiagnosticsNode::describe(widget("Padding", "lib/padding.rs", vec![]) as Rc<dyn Diagnosticable>);

    assert!(!service.should_show_in_summary_tree(&library));
    assert!(service.should_show_in_summary_tree(&library.with_level(DiagnosticLevel::Error)));
    assert!(service.should_show_in_summary_tree(&DiagnosticsNode::block("plain")));
}

#[test]
fn test_hidden_nodes_skipped_by_queries() {
    let service = InspectorService::default();
    let node = DiagnosticsNode::block("holder")
        .with_properties(vec![
            DiagnosticsNode::string("gone", None),
            DiagnosticsNode::int("kept", Some(1)),
        ])
        .with_children(vec![
            DiagnosticsNode::block("secret").with_level(DiagnosticLevel::Hidden),
            DiagnosticsNode::block("shown"),
        ]);
    let holder = service.to_id(&InspectorObject::Node(Rc::new(node)), GROUP);

    let properties = service.get_properties(&holder, GROUP).unwrap();
    assert_eq!(properties.as_array().unwrap().len(), 1);
    assert_eq!(properties[0]["name"], json!("kept"));
    assert_eq!(descriptions(&service.get_children(&holder, GROUP).unwrap()), vec!["shown"]);
    assert_eq!(
        descriptions(&service.get_children_summary_tree(&holder, GROUP).unwrap()),
        vec!["shown"]
    );

    let details = service.get_details_subtree(&holder, GROUP, 1).unwrap();
    assert_eq!(details["properties"].as_array().unwrap().len(), 1);
    assert_eq!(descriptions(&details["children"]), vec!["shown"]);
}

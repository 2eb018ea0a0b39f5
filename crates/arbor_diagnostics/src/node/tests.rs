use super::*;
use pretty_assertions::assert_eq;
use std::cell::Cell;

struct Widget {
    width: i64,
    children: Vec<Rc<dyn Diagnosticable>>,
}

impl Diagnosticable for Widget {
    fn debug_fill_properties(&self, properties: &mut DiagnosticPropertiesBuilder) {
        properties.add(DiagnosticsNode::int("width", Some(self.width)));
    }

    fn debug_describe_children(&self) -> Vec<DiagnosticsNode> {
        self.children
            .iter()
            .map(|child| DiagnosticsNode::describe(Rc::clone(child)))
            .collect()
    }
}

fn widget(width: i64) -> Rc<dyn Diagnosticable> {
    Rc::new(Widget {
        width,
        children: Vec::new(),
    })
}

#[derive(Debug)]
#[expect(dead_code, reason = "variants exist to be described")]
enum Direction {
    LeftToRight,
    RightToLeft,
    Custom(u8),
}

#[test]
fn test_property_descriptions() {
    assert_eq!(DiagnosticsNode::string("s", Some("x")).to_string(), "s: x");
    assert_eq!(
        DiagnosticsNode::string("s", Some("x")).quoted(true).to_string(),
        "s: \"x\""
    );
    assert_eq!(DiagnosticsNode::bool("b", Some(false)).to_string(), "b: false");
    assert_eq!(
        DiagnosticsNode::int("w", Some(3)).with_unit("px").to_string(),
        "w: 3px"
    );
    assert_eq!(DiagnosticsNode::double("d", Some(1.26)).to_string(), "d: 1.3");
    assert_eq!(
        DiagnosticsNode::double("d", Some(1.26))
            .fraction_digits(2)
            .to_string(),
        "d: 1.26"
    );
    assert_eq!(
        DiagnosticsNode::double("d", Some(f64::INFINITY)).to_string(),
        "d: Infinity"
    );
    assert_eq!(
        DiagnosticsNode::enum_value("dir", Some(&Direction::LeftToRight)).to_string(),
        "dir: left-to-right"
    );
    assert_eq!(
        DiagnosticsNode::enum_value("dir", Some(&Direction::Custom(4))).to_string(),
        "dir: custom"
    );
    assert_eq!(
        DiagnosticsNode::iterable("xs", vec!["a".into(), "b".into()]).to_string(),
        "xs: a, b"
    );
    assert_eq!(DiagnosticsNode::iterable("xs", vec![]).to_string(), "xs: []");
    assert_eq!(
        DiagnosticsNode::iterable("xs", vec![]).if_empty("<none>").to_string(),
        "xs: <none>"
    );
    assert_eq!(DiagnosticsNode::message("hello").to_string(), "hello");
}

#[test]
fn test_tooltip_and_description_override() {
    assert_eq!(
        DiagnosticsNode::int("w", Some(3)).tooltip("logical").to_string(),
        "w: 3 (logical)"
    );
    assert_eq!(
        DiagnosticsNode::int("w", Some(3)).description("three").to_string(),
        "w: three"
    );
}

#[test]
fn test_null_values_are_hidden_unless_requested() {
    let plain = DiagnosticsNode::int("w", None);
    assert_eq!(plain.level(), DiagnosticLevel::Hidden);
    assert!(!plain.show());

    let shown = DiagnosticsNode::int("w", None).show_null(true);
    assert!(shown.show());
    assert_eq!(shown.to_string(), "w: null");

    let if_null = DiagnosticsNode::int("w", None).if_null("unset");
    assert!(if_null.show());
    assert_eq!(if_null.to_string(), "w: unset");

    let missing = DiagnosticsNode::object("child", None).missing_if_null();
    assert_eq!(missing.level(), DiagnosticLevel::Warning);
}

#[test]
fn test_flag_shows_matching_description_only() {
    let on = DiagnosticsNode::flag("visible", true, Some("visible"), None);
    assert!(on.show());
    assert_eq!(on.to_string(), "visible");

    let off = DiagnosticsNode::flag("visible", false, Some("visible"), None);
    assert!(!off.show());
}

#[test]
fn test_default_value_drops_to_fine() {
    let node = DiagnosticsNode::int("n", Some(0)).default_value(DiagnosticValue::Int(0));
    assert_eq!(node.level(), DiagnosticLevel::Fine);
    assert!(node.is_filtered(DiagnosticLevel::Debug));
    assert!(!node.is_filtered(DiagnosticLevel::Fine));

    let other = DiagnosticsNode::int("n", Some(1)).default_value(DiagnosticValue::Int(0));
    assert_eq!(other.level(), DiagnosticLevel::Info);
}

#[test]
fn test_explicit_hidden_level_wins() {
    let node = DiagnosticsNode::block("x").with_level(DiagnosticLevel::Hidden);
    assert!(!node.show());
    assert!(node.is_filtered(DiagnosticLevel::Hidden));
}

#[test]
fn test_lazy_value_is_memoized() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let node = DiagnosticsNode::lazy("n", PropertyFormat::Int { unit: None }, move || {
        counter.set(counter.get() + 1);
        Ok(DiagnosticValue::Int(7))
    });

    assert_eq!(calls.get(), 0);
    assert_eq!(node.to_string(), "n: 7");
    assert_eq!(node.value(), Some(&DiagnosticValue::Int(7)));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_lazy_failure_is_error_level() {
    let node = DiagnosticsNode::lazy("n", PropertyFormat::Int { unit: None }, || {
        Err("boom".to_owned())
    });

    assert_eq!(node.level(), DiagnosticLevel::Error);
    assert_eq!(node.exception(), Some("boom"));
    assert_eq!(node.value(), None);
    assert_eq!(node.to_description(None), "EXCEPTION (boom)");
}

#[test]
fn test_lazy_children_are_produced_per_call() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let node = DiagnosticsNode::block("root").with_lazy_children(move || {
        counter.set(counter.get() + 1);
        vec![DiagnosticsNode::block("child")]
    });

    assert_eq!(node.get_children().len(), 1);
    assert_eq!(node.get_children().len(), 1);
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_name_validation() {
    let err = DiagnosticsNode::block("x").try_with_name("bad:").unwrap_err();
    assert!(matches!(err, DiagnosticsError::InvalidArgument(_)));

    let ok = DiagnosticsNode::block("x").try_with_name("good").unwrap();
    assert_eq!(ok.name(), Some("good"));
}

#[test]
fn test_nodes_are_read_only() {
    let leaf = DiagnosticsNode::int("n", Some(1));
    assert!(leaf.is_read_only());
    assert_eq!(
        leaf.try_set_value(DiagnosticValue::Int(2)),
        Err(DiagnosticsError::Unsupported {
            operation: "set_value",
            kind: "IntProperty",
        })
    );

    let block = DiagnosticsNode::block("b");
    assert!(matches!(
        block.try_set_value(DiagnosticValue::Null),
        Err(DiagnosticsError::InvalidOperation(_))
    ));
}

#[test]
fn test_shallow_string_with_name() {
    let node = DiagnosticsNode::block("body").with_name("title");
    assert_eq!(node.to_string_shallow(None), "title: body");

    let no_separator = DiagnosticsNode::block("body")
        .with_name("title")
        .with_show_separator(false);
    assert_eq!(no_separator.to_string_shallow(None), "title body");

    let multi_line = DiagnosticsNode::block("one\ntwo").with_name("title");
    assert_eq!(multi_line.to_string_shallow(None), "title:\none\ntwo");
}

#[test]
fn test_delegate_node_reports_object() {
    let object = widget(3);
    let node = DiagnosticsNode::describe(Rc::clone(&object));

    assert_eq!(node.type_name(), "DiagnosticableNode");
    assert_eq!(object.type_name(), "Widget");
    let description = node.to_description(None);
    assert!(description.starts_with("Widget#"), "{description}");
    assert_eq!(description.len(), "Widget#".len() + 5);
    assert_eq!(node.get_properties().len(), 1);
    assert!(node.get_children().is_empty());
    assert!(node.value_object().is_some_and(|v| Rc::ptr_eq(v, &object)));
}

#[test]
fn test_delegate_renders_properties_and_children() {
    let root: Rc<dyn Diagnosticable> = Rc::new(Widget {
        width: 1,
        children: vec![widget(2)],
    });
    let node = to_diagnostics_node(root, Some("app"), None).with_header("Root");

    assert_eq!(
        node.to_string_deep(),
        format!(
            "app: Root\n │ width: 1\n │\n └─{}\n     width: 2\n",
            node.get_children()[0].to_description(None)
        )
    );
}

#[test]
fn test_identity_helpers() {
    assert_eq!(describe_identity("Foo", "0abcd".to_owned()), "Foo#0abcd");
    let value = 5_u32;
    assert_eq!(short_hash(&value), short_hash(&value));
    assert_eq!(short_hash(&value).len(), 5);
    assert_eq!(short_type_name("a::b::Column<a::Text>"), "Column<a::Text>");
    assert_eq!(short_type_name("Plain"), "Plain");
}

#[test]
fn test_hyphen_case() {
    assert_eq!(to_hyphen_case("LeftToRight"), "left-to-right");
    assert_eq!(to_hyphen_case("HTTPServer"), "http-server");
    assert_eq!(to_hyphen_case("snake_case"), "snake-case");
    assert_eq!(describe_enum("Axis.horizontal"), "horizontal");
    assert_eq!(describe_enum("Direction::RightToLeft"), "right-to-left");
}

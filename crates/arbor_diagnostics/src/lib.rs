//! Diagnostics trees for debugging and error reporting.
//!
//! A [`DiagnosticsNode`] describes one object as a header, a list of
//! properties and a list of children. Trees are built eagerly or lazily,
//! rendered as indented line-art text by [`TextTreeRenderer`], and
//! serialized to JSON records through a [`SerializationDelegate`].
//!
//! - Nodes carry a [`TreeStyle`] that picks one static [`StyleDescriptor`]
//!   of line-art tokens. The renderer never branches on the style itself.
//! - Each node has a [`DiagnosticLevel`]; consumers filter by a minimum.
//! - [`ErrorReport`] assembles structured error messages out of parts and
//!   [`ErrorReporter`] routes caught errors to a replaceable handler.
//!
//! ```text
//! let node = DiagnosticsNode::block("Foo")
//!     .with_properties(vec![DiagnosticsNode::string("bar", Some("baz"))])
//!     .with_children(vec![DiagnosticsNode::block("A")]);
//!
//! assert_eq!(node.to_string_deep(), "Foo\n │ bar: baz\n │\n └─A\n");
//! ```

mod error;
mod level;
pub mod node;
pub mod render;
pub mod report;
pub mod serialize;
pub mod style;
pub mod truncate;
pub mod wrap;

pub use error::{DiagnosticsError, DiagnosticsResult};
pub use level::DiagnosticLevel;
pub use node::{
    to_diagnostics_node, DiagnosticPropertiesBuilder, DiagnosticValue, Diagnosticable,
    DiagnosticsNode, PropertyFormat,
};
pub use render::{RenderConfig, TextTreeRenderer};
pub use report::{
    ConsolePresenter, DiagnosticsStackTrace, ErrorDetails, ErrorReport, ErrorReportBuilder,
    ErrorReporter, ErrorValue, StackFilterConfig,
};
pub use serialize::{
    to_json_list, to_json_map, DefaultSerializationDelegate, JsonMap, SerializationDelegate,
};
pub use style::{StyleDescriptor, TreeStyle};
pub use truncate::{truncate_nodes, LocalProject};
pub use wrap::word_wrap;

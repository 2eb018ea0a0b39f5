//! The collaborator contract: objects that can describe themselves.

use std::hash::Hasher;

use rustc_hash::FxHasher;
use serde::Serialize;

use super::DiagnosticsNode;

/// Source position recorded when an object was constructed.
///
/// Attached by the host's build-time instrumentation; absence always means
/// "origin unknown".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CreationLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CreationLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        CreationLocation {
            file: file.into(),
            line,
            column,
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Collects the property nodes an object reports about itself.
#[derive(Clone, Default)]
pub struct DiagnosticPropertiesBuilder {
    pub properties: Vec<DiagnosticsNode>,
    /// Shown instead of an empty body when no properties or children exist.
    pub empty_body_description: Option<String>,
}

impl DiagnosticPropertiesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, property: DiagnosticsNode) {
        self.properties.push(property);
    }
}

/// An object that can be described by a diagnostics tree.
///
/// Every method has a default, so a host type opts in with an empty impl and
/// overrides only what it has to say.
pub trait Diagnosticable {
    /// Short type name, without module path.
    fn type_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Identity string: type name plus a short stable hash.
    fn to_string_short(&self) -> String {
        describe_identity(self.type_name(), short_hash(self))
    }

    /// Report this object's fields as property nodes.
    fn debug_fill_properties(&self, _properties: &mut DiagnosticPropertiesBuilder) {}

    /// Report this object's substructure as child nodes.
    fn debug_describe_children(&self) -> Vec<DiagnosticsNode> {
        Vec::new()
    }

    /// Where this object was created, if creation tracking is enabled.
    fn creation_location(&self) -> Option<CreationLocation> {
        None
    }
}

/// `Type#abcde`.
pub fn describe_identity(type_name: &str, hash: String) -> String {
    format!("{type_name}#{hash}")
}

/// Five hex digits derived from the object's address.
///
/// Stable for the lifetime of the object, which is all an identity string
/// needs.
pub fn short_hash<T: ?Sized>(value: &T) -> String {
    let address = std::ptr::from_ref(value).cast::<()>() as usize;
    let mut hasher = FxHasher::default();
    hasher.write_usize(address);
    format!("{:05x}", hasher.finish() & 0xFFFFF)
}

/// Strip the module path from a `std::any::type_name` result.
///
/// Only the outer path is stripped: `app::widgets::Column<app::Text>` becomes
/// `Column<app::Text>`.
pub fn short_type_name(full: &'static str) -> &'static str {
    let head_end = full.find('<').unwrap_or(full.len());
    let start = full[..head_end].rfind("::").map_or(0, |i| i + 2);
    &full[start..]
}

//! Inspection service for diagnostics trees.
//!
//! An out-of-process client asks for trees, properties and children of a
//! host's object graph and refers back to what it has seen by id:
//!
//! - [`ReferenceRegistry`] hands out `inspector-<n>` ids per group and keeps
//!   the objects alive until the group is disposed.
//! - [`InspectorSerializationDelegate`] attaches ids and creation locations
//!   while serializing, and splices non-summary nodes out of summary trees.
//! - [`InspectorService`] answers the queries.
//!
//! Enable logging with [`init_tracing`] and `RUST_LOG=arbor_inspector=debug`.

mod config;
pub mod delegate;
pub mod registry;
pub mod service;

pub use config::{init_tracing, InspectorConfig};
pub use delegate::InspectorSerializationDelegate;
pub use registry::{InspectorObject, ReferenceRegistry};
pub use service::InspectorService;

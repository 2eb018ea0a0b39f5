//! Inspector configuration and tracing setup.

use std::sync::Once;

use arbor_diagnostics::LocalProject;
use serde::{Deserialize, Serialize};

/// Settings of an [`InspectorService`](crate::InspectorService).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InspectorConfig {
    /// Directory prefixes of the host's own sources. Objects created under
    /// them belong to the summary tree.
    pub pub_root_directories: Vec<String>,
    /// Whether objects carry creation locations. Without them every object
    /// counts as local.
    pub track_creation_locations: bool,
    /// Child/property cap for truncatable nodes. `None` is unlimited.
    pub max_descendants_truncatable_node: Option<usize>,
}

impl InspectorConfig {
    #[must_use]
    pub fn with_pub_root_directories<I, S>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pub_root_directories = roots.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_creation_tracking(mut self, enabled: bool) -> Self {
        self.track_creation_locations = enabled;
        self
    }

    #[must_use]
    pub fn with_max_descendants(mut self, max: usize) -> Self {
        self.max_descendants_truncatable_node = Some(max);
        self
    }

    /// The configured roots as a [`LocalProject`].
    pub fn local_project(&self) -> LocalProject {
        LocalProject::new(self.pub_root_directories.iter().cloned())
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=arbor_inspector=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

//! LSP Backend state management.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

use tower_lsp::lsp_types::Url;

use criticlint_core::LintConfig;

use crate::store::DiagnosticStore;

/// Open document metadata.
#[derive(Debug, Clone)]
pub(crate) struct DocumentData {
    pub language_id: String,
}

/// Shared backend state.
pub(crate) struct BackendState {
    /// Documents currently open in the client.
    pub documents: RwLock<HashMap<Url, DocumentData>>,
    /// Effective lint configuration.
    pub config: RwLock<LintConfig>,
    /// Settings received from the client, layered over the workspace file.
    pub client_settings: RwLock<Option<serde_json::Value>>,
    /// Workspace root path.
    pub workspace_root: RwLock<Option<PathBuf>>,
    /// Current diagnostics per document.
    pub store: Arc<DiagnosticStore>,
    /// Serializes diagnostic notifications to the client.
    pub publish_gate: tokio::sync::Mutex<()>,
    /// Set once the user has been told the linter cannot start.
    pub spawn_failure_reported: AtomicBool,
}

impl fmt::Debug for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendState")
            .field("documents", &"<HashMap<Url, DocumentData>>")
            .field("config", &self.config)
            .field("workspace_root", &self.workspace_root)
            .field("store", &self.store)
            .finish()
    }
}

impl BackendState {
    /// Creates a new state around `store`.
    pub fn new(store: Arc<DiagnosticStore>) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            config: RwLock::new(LintConfig::default()),
            client_settings: RwLock::new(None),
            workspace_root: RwLock::new(None),
            store,
            publish_gate: tokio::sync::Mutex::new(()),
            spawn_failure_reported: AtomicBool::new(false),
        }
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new(Arc::new(DiagnosticStore::new()))
    }
}

/// Type alias for shared state.
pub type SharedState = Arc<BackendState>;

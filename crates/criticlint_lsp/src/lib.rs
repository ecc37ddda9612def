//! CriticLint LSP Server
//!
//! Language Server Protocol implementation that runs Perl::Critic on open
//! and saved Perl documents and publishes its violations as diagnostics.

pub mod config;
pub mod controller;
pub mod conversion;
mod handler;
mod state;
pub mod store;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, error, info};

use criticlint_core::CriticError;

use crate::controller::{LintOutcome, lint_document};
use crate::conversion::to_lsp_diagnostic;
use crate::state::{BackendState, SharedState};
use crate::store::DiagnosticStore;

pub use crate::controller::{PERL_LANGUAGE_ID, SkipReason, is_perl_document};

/// The LSP backend for CriticLint.
#[derive(Clone)]
pub struct Backend {
    /// LSP client for sending notifications.
    client: Client,
    /// Shared state
    state: SharedState,
}

impl Backend {
    /// Creates a new backend with its own diagnostic store.
    pub fn new(client: Client) -> Self {
        Self::with_store(client, Arc::new(DiagnosticStore::new()))
    }

    /// Creates a new backend publishing into `store`.
    pub fn with_store(client: Client, store: Arc<DiagnosticStore>) -> Self {
        Self {
            client,
            state: Arc::new(BackendState::new(store)),
        }
    }

    /// The store holding every document's current diagnostics.
    pub fn store(&self) -> &Arc<DiagnosticStore> {
        &self.state.store
    }

    /// Lints a document and, if the result is accepted, publishes it.
    pub async fn lint(&self, uri: &Url, language_id: Option<&str>) -> LintOutcome {
        let outcome = lint_document(&self.state, uri, language_id).await;

        match &outcome {
            LintOutcome::Published { count } => {
                debug!("Publishing {} diagnostic(s) for {}", count, uri);
                self.state.spawn_failure_reported.store(false, Ordering::SeqCst);
                self.publish_current(uri).await;
            }
            LintOutcome::Failed(e) => self.report_failure(uri, e).await,
            LintOutcome::Skipped(_) | LintOutcome::Superseded(_) => {}
        }

        outcome
    }

    /// Runs [`Backend::lint`] on a separate task so the notification
    /// handler returns immediately.
    fn spawn_lint(&self, uri: Url, language_id: Option<String>) {
        let backend = self.clone();
        tokio::spawn(async move {
            backend.lint(&uri, language_id.as_deref()).await;
        });
    }

    /// Sends the store's current set for `uri` to the client.
    ///
    /// Notifications go out one at a time and always carry the latest
    /// accepted set, so the client never receives an older set last.
    async fn publish_current(&self, uri: &Url) {
        let _gate = self.state.publish_gate.lock().await;
        let diagnostics = self
            .state
            .store
            .get(uri)
            .unwrap_or_default()
            .iter()
            .map(to_lsp_diagnostic)
            .collect();

        self.client
            .publish_diagnostics(uri.clone(), diagnostics, None)
            .await;
    }

    /// Logs a failed invocation and warns the user once per outage.
    async fn report_failure(&self, uri: &Url, e: &CriticError) {
        error!("Failed to lint {}: {}", uri, e);

        if e.is_spawn_failure()
            && !self.state.spawn_failure_reported.swap(true, Ordering::SeqCst)
        {
            self.client
                .show_message(
                    MessageType::WARNING,
                    format!("CriticLint: {}. Diagnostics will not update until it can run.", e),
                )
                .await;
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handler::handle_initialize(&self.state, params).await
    }

    async fn initialized(&self, _: InitializedParams) {
        handler::handle_initialized(&self.client).await;
    }

    async fn shutdown(&self) -> Result<()> {
        handler::handle_shutdown(&self.state).await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let (uri, language_id) = handler::handle_did_open(&self.state, params).await;
        self.spawn_lint(uri, language_id);
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let (uri, language_id) = handler::handle_did_save(&self.state, params).await;
        self.spawn_lint(uri, language_id);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = handler::handle_did_close(&self.state, params).await;
        self.publish_current(&uri).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        handler::handle_did_change_configuration(&self.state, params).await;
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        handler::handle_did_change_watched_files(&self.state, params).await;
    }
}

/// Starts the LSP server.
///
/// This function does not return unless an error occurs or the server shuts down.
pub async fn run() {
    info!("CriticLint LSP server starting...");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}

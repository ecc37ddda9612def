//! Document lifecycle handlers (open, save, close).

use tower_lsp::lsp_types::*;
use tracing::{debug, error};

use crate::state::{DocumentData, SharedState};

/// Handles the `textDocument/didOpen` notification.
///
/// Returns the URI and language identifier to lint.
pub async fn handle_did_open(
    state: &SharedState,
    params: DidOpenTextDocumentParams,
) -> (Url, Option<String>) {
    debug!("Document opened: {}", params.text_document.uri);

    let uri = params.text_document.uri;
    let language_id = params.text_document.language_id;

    match state.documents.write() {
        Ok(mut docs) => {
            docs.insert(
                uri.clone(),
                DocumentData {
                    language_id: language_id.clone(),
                },
            );
        }
        Err(e) => error!("Documents lock poisoned: {}", e),
    }

    (uri, Some(language_id))
}

/// Handles the `textDocument/didSave` notification.
///
/// The language identifier is only known for documents seen in `didOpen`.
pub async fn handle_did_save(
    state: &SharedState,
    params: DidSaveTextDocumentParams,
) -> (Url, Option<String>) {
    debug!("Document saved: {}", params.text_document.uri);

    let uri = params.text_document.uri;
    let language_id = match state.documents.read() {
        Ok(docs) => docs.get(&uri).map(|doc| doc.language_id.clone()),
        Err(e) => {
            error!("Documents lock poisoned: {}", e);
            None
        }
    };

    (uri, language_id)
}

/// Handles the `textDocument/didClose` notification.
///
/// Forgets the document and drops its diagnostics.
pub async fn handle_did_close(state: &SharedState, params: DidCloseTextDocumentParams) -> Url {
    debug!("Document closed: {}", params.text_document.uri);

    match state.documents.write() {
        Ok(mut docs) => {
            docs.remove(&params.text_document.uri);
        }
        Err(e) => error!("Documents lock poisoned: {}", e),
    }
    state.store.clear(&params.text_document.uri);

    params.text_document.uri
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::BackendState;
    use std::sync::Arc;

    fn open_params(uri: &Url, language_id: &str) -> DidOpenTextDocumentParams {
        DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: language_id.to_string(),
                version: 1,
                text: "print 1;\n".to_string(),
            },
        }
    }

    fn save_params(uri: &Url) -> DidSaveTextDocumentParams {
        DidSaveTextDocumentParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
            text: None,
        }
    }

    #[tokio::test]
    async fn test_save_reuses_language_from_open() {
        let state: SharedState = Arc::new(BackendState::default());
        let uri = Url::parse("file:///tmp/script").unwrap();

        handle_did_open(&state, open_params(&uri, "perl")).await;
        let (_, language_id) = handle_did_save(&state, save_params(&uri)).await;
        assert_eq!(language_id.as_deref(), Some("perl"));
    }

    #[tokio::test]
    async fn test_save_of_unknown_document_has_no_language() {
        let state: SharedState = Arc::new(BackendState::default());
        let uri = Url::parse("file:///tmp/script.pl").unwrap();

        let (_, language_id) = handle_did_save(&state, save_params(&uri)).await;
        assert_eq!(language_id, None);
    }

    #[tokio::test]
    async fn test_close_forgets_document() {
        let state: SharedState = Arc::new(BackendState::default());
        let uri = Url::parse("file:///tmp/script.pl").unwrap();

        handle_did_open(&state, open_params(&uri, "perl")).await;
        let closed = handle_did_close(
            &state,
            DidCloseTextDocumentParams {
                text_document: TextDocumentIdentifier { uri: uri.clone() },
            },
        )
        .await;

        assert_eq!(closed, uri);
        assert!(state.documents.read().unwrap().is_empty());
    }
}

//! Per-document diagnostic store.
//!
//! Holds the current diagnostic set of every open document. Each lint
//! invocation takes a [`Ticket`] before it starts and hands it back when
//! publishing; a result is accepted only if no newer invocation for the
//! same document has published already and the document has not been
//! closed since the ticket was issued.

use std::collections::HashMap;

use parking_lot::Mutex;
use tower_lsp::lsp_types::Url;

use criticlint_core::LintDiagnostic;

/// Claim on publishing one invocation's results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    uri: Url,
    seq: u64,
}

impl Ticket {
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Result of [`DiagnosticStore::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The set replaced the document's previous set.
    Published,
    /// A newer invocation already published for this document.
    Stale,
    /// The document was closed after the ticket was issued.
    Closed,
}

#[derive(Debug)]
struct Slot {
    /// First ticket issued in this open session.
    session_start: u64,
    /// Last ticket whose results were accepted.
    published: u64,
    diagnostics: Option<Vec<LintDiagnostic>>,
}

#[derive(Debug, Default)]
struct StoreInner {
    next_seq: u64,
    slots: HashMap<Url, Slot>,
}

/// Document-keyed table of current diagnostics.
#[derive(Debug, Default)]
pub struct DiagnosticStore {
    inner: Mutex<StoreInner>,
}

impl DiagnosticStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket for a new invocation on `uri`.
    pub fn begin(&self, uri: &Url) -> Ticket {
        let mut inner = self.inner.lock();
        inner.next_seq += 1;
        let seq = inner.next_seq;
        inner.slots.entry(uri.clone()).or_insert(Slot {
            session_start: seq,
            published: 0,
            diagnostics: None,
        });
        Ticket {
            uri: uri.clone(),
            seq,
        }
    }

    /// Replaces the document's set with `diagnostics` unless the ticket
    /// has been superseded.
    pub fn publish(&self, ticket: &Ticket, diagnostics: Vec<LintDiagnostic>) -> PublishOutcome {
        let mut inner = self.inner.lock();
        let Some(slot) = inner.slots.get_mut(&ticket.uri) else {
            return PublishOutcome::Closed;
        };
        if ticket.seq < slot.session_start {
            return PublishOutcome::Closed;
        }
        if ticket.seq <= slot.published {
            return PublishOutcome::Stale;
        }

        slot.published = ticket.seq;
        slot.diagnostics = Some(diagnostics);
        PublishOutcome::Published
    }

    /// Forgets the document. Returns whether it had an entry.
    pub fn clear(&self, uri: &Url) -> bool {
        self.inner.lock().slots.remove(uri).is_some()
    }

    /// Removes every entry.
    pub fn dispose(&self) {
        self.inner.lock().slots.clear();
    }

    /// Current diagnostic set of `uri`, if one has been published.
    pub fn get(&self, uri: &Url) -> Option<Vec<LintDiagnostic>> {
        self.inner
            .lock()
            .slots
            .get(uri)
            .and_then(|slot| slot.diagnostics.clone())
    }

    /// Number of documents with a published set.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .slots
            .values()
            .filter(|slot| slot.diagnostics.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use criticlint_core::{LintConfig, ViolationRecord};
    use pretty_assertions::assert_eq;

    fn uri(name: &str) -> Url {
        Url::parse(&format!("file:///tmp/{}", name)).unwrap()
    }

    fn diagnostics(messages: &[&str]) -> Vec<LintDiagnostic> {
        messages
            .iter()
            .map(|m| {
                let line = format!("5~|~1~|~1~|~{}~|~e~|~P~||~", m);
                let record = ViolationRecord::parse_line(&line).unwrap();
                LintDiagnostic::from_violation(&record, &LintConfig::default())
            })
            .collect()
    }

    #[test]
    fn test_publish_replaces_set() {
        let store = DiagnosticStore::new();
        let doc = uri("a.pl");

        let first = store.begin(&doc);
        assert_eq!(store.publish(&first, diagnostics(&["one", "two"])), PublishOutcome::Published);
        let second = store.begin(&doc);
        assert_eq!(store.publish(&second, diagnostics(&["three"])), PublishOutcome::Published);

        assert_eq!(store.get(&doc), Some(diagnostics(&["three"])));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_older_invocation_cannot_overwrite_newer() {
        let store = DiagnosticStore::new();
        let doc = uri("a.pl");

        let early = store.begin(&doc);
        let late = store.begin(&doc);
        assert_eq!(store.publish(&late, diagnostics(&["fresh"])), PublishOutcome::Published);
        assert_eq!(store.publish(&early, diagnostics(&["stale"])), PublishOutcome::Stale);

        assert_eq!(store.get(&doc), Some(diagnostics(&["fresh"])));
    }

    #[test]
    fn test_older_invocation_publishes_if_first_to_finish() {
        let store = DiagnosticStore::new();
        let doc = uri("a.pl");

        let early = store.begin(&doc);
        let late = store.begin(&doc);
        assert_eq!(store.publish(&early, diagnostics(&["early"])), PublishOutcome::Published);
        assert_eq!(store.publish(&late, diagnostics(&["late"])), PublishOutcome::Published);

        assert_eq!(store.get(&doc), Some(diagnostics(&["late"])));
    }

    #[test]
    fn test_publishing_same_set_twice_is_idempotent() {
        let store = DiagnosticStore::new();
        let doc = uri("a.pl");

        let ticket = store.begin(&doc);
        store.publish(&ticket, diagnostics(&["x"]));
        let once = store.get(&doc);

        assert_eq!(store.publish(&ticket, diagnostics(&["x"])), PublishOutcome::Stale);
        let again = store.begin(&doc);
        store.publish(&again, diagnostics(&["x"]));

        assert_eq!(store.get(&doc), once);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_documents_are_independent() {
        let store = DiagnosticStore::new();
        let a = uri("a.pl");
        let b = uri("b.pl");

        let ta = store.begin(&a);
        let tb = store.begin(&b);
        store.publish(&tb, diagnostics(&["b"]));
        store.publish(&ta, diagnostics(&["a"]));

        assert_eq!(store.get(&a), Some(diagnostics(&["a"])));
        assert_eq!(store.get(&b), Some(diagnostics(&["b"])));
    }

    #[test]
    fn test_clear_is_idempotent_and_works_without_entry() {
        let store = DiagnosticStore::new();
        let doc = uri("never-linted.pl");

        assert!(!store.clear(&doc));
        assert!(!store.clear(&doc));
        assert!(store.is_empty());
    }

    #[test]
    fn test_results_after_close_are_discarded() {
        let store = DiagnosticStore::new();
        let doc = uri("a.pl");

        let ticket = store.begin(&doc);
        assert!(store.clear(&doc));
        assert_eq!(store.publish(&ticket, diagnostics(&["late"])), PublishOutcome::Closed);
        assert_eq!(store.get(&doc), None);
    }

    #[test]
    fn test_results_from_previous_session_are_discarded_after_reopen() {
        let store = DiagnosticStore::new();
        let doc = uri("a.pl");

        let before_close = store.begin(&doc);
        store.clear(&doc);
        let after_reopen = store.begin(&doc);

        assert_eq!(
            store.publish(&before_close, diagnostics(&["old session"])),
            PublishOutcome::Closed
        );
        assert_eq!(store.get(&doc), None);
        assert_eq!(
            store.publish(&after_reopen, diagnostics(&["new session"])),
            PublishOutcome::Published
        );
        assert_eq!(store.get(&doc), Some(diagnostics(&["new session"])));
    }

    #[test]
    fn test_pending_invocation_has_no_entry() {
        let store = DiagnosticStore::new();
        let doc = uri("a.pl");

        let _ticket = store.begin(&doc);
        assert_eq!(store.get(&doc), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_dispose_clears_everything() {
        let store = DiagnosticStore::new();
        for name in ["a.pl", "b.pl", "c.pl"] {
            let ticket = store.begin(&uri(name));
            store.publish(&ticket, diagnostics(&[name]));
        }
        assert_eq!(store.len(), 3);

        store.dispose();
        assert!(store.is_empty());
        assert_eq!(store.get(&uri("a.pl")), None);
    }

    #[test]
    fn test_tickets_increase() {
        let store = DiagnosticStore::new();
        let first = store.begin(&uri("a.pl"));
        let second = store.begin(&uri("b.pl"));
        assert!(second.seq() > first.seq());
        assert_eq!(first.uri(), &uri("a.pl"));
    }
}

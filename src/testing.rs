//! Testing utilities for entity-feed
//!
//! Provides a scripted [`SearchBackend`] whose requests are observed and
//! answered by the test itself, in any order, plus helpers for building page
//! bodies.
//!
//! Only available when compiled with `cfg(test)`.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::ops::{Deref, RangeInclusive};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

use crate::backend::SearchBackend;
use crate::feed::TransportError;
use crate::query::PageRequest;

type Responder = oneshot::Sender<Result<Value, TransportError>>;

/// A request captured by [`ScriptedBackend`]
#[derive(Debug, Clone)]
pub struct ScriptedRequest {
    id: usize,
    request: PageRequest,
}

impl Deref for ScriptedRequest {
    type Target = PageRequest;

    fn deref(&self) -> &Self::Target {
        &self.request
    }
}

/// Backend that parks every request until the test answers it
///
/// # Examples
/// ```ignore
/// let backend = ScriptedBackend::new();
/// // ... controller issues a request ...
/// let request = backend.next_request().await;
/// backend.respond(&request, Ok(bank_page(1..=3, 3, false)));
/// ```
pub struct ScriptedBackend {
    requests_tx: mpsc::UnboundedSender<ScriptedRequest>,
    requests_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<ScriptedRequest>>,
    responders: Mutex<HashMap<usize, Responder>>,
    count: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        let (requests_tx, requests_rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            requests_tx,
            requests_rx: tokio::sync::Mutex::new(requests_rx),
            responders: Mutex::new(HashMap::new()),
            count: AtomicUsize::new(0),
        })
    }

    /// Wait for the next request the backend receives
    ///
    /// # Panics
    /// Panics if the request channel is closed.
    pub async fn next_request(&self) -> ScriptedRequest {
        self.requests_rx
            .lock()
            .await
            .recv()
            .await
            .expect("scripted backend request channel closed")
    }

    /// Answer a captured request. Answers to aborted requests are discarded.
    pub fn respond(&self, request: &ScriptedRequest, outcome: Result<Value, TransportError>) {
        let responder = self.responders.lock().unwrap().remove(&request.id);
        if let Some(responder) = responder {
            let _ = responder.send(outcome);
        }
    }

    /// Drop a captured request without answering it
    pub fn abandon(&self, request: &ScriptedRequest) {
        self.responders.lock().unwrap().remove(&request.id);
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn search(&self, request: PageRequest) -> Result<Value, TransportError> {
        let id = self.count.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.responders.lock().unwrap().insert(id, tx);
        let _ = self.requests_tx.send(ScriptedRequest { id, request });

        rx.await.unwrap_or(Err(TransportError::Closed))
    }
}

/// Body of a `/banks` page containing ids `ids`, named `Bank <id>`
pub fn bank_page(ids: RangeInclusive<u64>, total: u64, has_next: bool) -> Value {
    let banks: Vec<Value> = ids
        .map(|id| json!({"id": id, "name": format!("Bank {id}")}))
        .collect();
    json!({"banks": banks, "total": total, "has_next": has_next})
}

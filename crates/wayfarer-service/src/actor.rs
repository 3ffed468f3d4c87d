//! Store actor - serializes every command against one owned store
//!
//! Any number of UI surfaces hold a [`StoreHandle`] and send requests
//! concurrently. A single blocking task owns the [`PlaceStore`] and runs each
//! request to completion before taking the next, so the match-then-insert
//! inside `addTodoPlace` can never interleave with another command. Backend
//! writes happen on that task, off the async worker threads.

use crate::handlers::{dispatch, parse_request};
use crate::protocol::{Request, Response};
use crate::ServiceError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use wayfarer_domain::traits::{PersistenceBackend, PlaceSource};
use wayfarer_store::PlaceStore;

enum Message {
    Request {
        request: Request,
        reply: oneshot::Sender<Response>,
    },
    Shutdown,
}

/// Cloneable handle for sending requests to the store actor
///
/// The actor stops once every handle has been dropped or
/// [`StoreHandle::shutdown`] is called.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<Message>,
}

/// Start the store actor on the current tokio runtime
///
/// The actor runs on tokio's blocking pool. `capacity` bounds the number of
/// queued requests; senders wait when it is full. The join handle yields the
/// store back once the actor stops.
///
/// # Examples
///
/// ```
/// use wayfarer_service::{spawn_store_actor, Request};
/// use wayfarer_store::{MemoryBackend, PlaceStore};
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = PlaceStore::open(MemoryBackend::new()).unwrap();
/// let (handle, task) = spawn_store_actor(store, 16);
///
/// let response = handle.send(Request::GetStats).await;
/// assert!(response.success);
///
/// drop(handle);
/// let store = task.await.unwrap();
/// assert_eq!(store.stats().todo_count, 0);
/// # }
/// ```
pub fn spawn_store_actor<B>(
    store: PlaceStore<B>,
    capacity: usize,
) -> (StoreHandle, JoinHandle<PlaceStore<B>>)
where
    B: PersistenceBackend + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Message>(capacity.max(1));

    let task = tokio::task::spawn_blocking(move || {
        let mut store = store;
        info!("Store actor started");

        while let Some(message) = rx.blocking_recv() {
            let (request, reply) = match message {
                Message::Request { request, reply } => (request, reply),
                Message::Shutdown => break,
            };

            let action = request.action();
            let response = dispatch(&mut store, request);
            if reply.send(response).is_err() {
                debug!(action, "Caller dropped before the reply was sent");
            }
        }

        info!("Store actor stopped");
        store
    });

    (StoreHandle { tx }, task)
}

impl StoreHandle {
    /// Send a request and wait for its response
    ///
    /// Never fails: a stopped actor is reported as an error response.
    pub async fn send(&self, request: Request) -> Response {
        let (reply, rx) = oneshot::channel();

        if self.tx.send(Message::Request { request, reply }).await.is_err() {
            return Response::err(ServiceError::ActorStopped.to_string());
        }

        rx.await
            .unwrap_or_else(|_| Response::err(ServiceError::ActorStopped.to_string()))
    }

    /// Parse a raw JSON request and send it
    pub async fn send_json(&self, raw: &str) -> Response {
        match parse_request(raw) {
            Ok(request) => self.send(request).await,
            Err(e) => Response::err(e.to_string()),
        }
    }

    /// Send a request and decode a successful payload as `T`
    ///
    /// Requests without a payload decode from `null`, so `T = ()` or
    /// `T = Option<_>` work for them.
    pub async fn call<T: DeserializeOwned>(&self, request: Request) -> Result<T, ServiceError> {
        let response = self.send(request).await;

        if !response.success {
            return Err(ServiceError::Remote(
                response.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(serde_json::from_value(response.data.unwrap_or(Value::Null))?)
    }

    /// Check whatever place `source` currently shows
    ///
    /// Returns `None` when the source has no place to offer.
    pub async fn check_source<S>(&self, source: &S) -> Option<Response>
    where
        S: PlaceSource + ?Sized,
    {
        let place = source.current_place()?;
        Some(self.send(Request::CheckPlace { place }).await)
    }

    /// Ask the actor to stop once the requests queued so far are handled
    ///
    /// Requests sent afterwards get an error response.
    pub async fn shutdown(&self) {
        if self.tx.send(Message::Shutdown).await.is_err() {
            debug!("Store actor already stopped");
        }
    }

    /// Whether the actor is still accepting requests
    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }
}

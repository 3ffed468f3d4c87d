//! Request handlers - one store operation per request kind

use crate::import::{apply_import, ImportDocument};
use crate::protocol::{Request, Response};
use crate::ServiceError;
use serde_json::Value;
use tracing::{debug, error};
use wayfarer_domain::traits::PersistenceBackend;
use wayfarer_store::PlaceStore;

/// Parse one JSON request
pub fn parse_request(raw: &str) -> Result<Request, ServiceError> {
    serde_json::from_str(raw).map_err(|e| ServiceError::InvalidRequest(e.to_string()))
}

/// Run `request` against `store` and return its payload
pub fn handle_request<B: PersistenceBackend>(
    store: &mut PlaceStore<B>,
    request: Request,
) -> Result<Value, ServiceError> {
    let value = match request {
        Request::CheckPlace { place } => serde_json::to_value(store.check_place(&place))?,
        Request::AddTodoPlace { place } => Value::Bool(store.add_todo_place(place)?),
        Request::MarkAsVisited { place_id } => Value::Bool(store.mark_as_visited(&place_id)?),
        Request::RemoveTodoPlace { place_id } => Value::Bool(store.remove_todo_place(&place_id)?),
        Request::GetTodoPlaces => serde_json::to_value(store.todo_places())?,
        Request::GetVisitedPlaces => serde_json::to_value(store.visited_places())?,
        Request::UpdateSettings { settings } => {
            store.update_settings(&settings)?;
            serde_json::to_value(store.settings())?
        }
        Request::GetSettings => serde_json::to_value(store.settings())?,
        Request::GetStats => serde_json::to_value(store.stats())?,
        Request::ExportData => serde_json::to_value(store.export_snapshot())?,
        Request::ImportData { data } => {
            let document = ImportDocument::from_value(data)?;
            serde_json::to_value(apply_import(store, document)?)?
        }
        Request::ClearAll => {
            store.clear_all()?;
            Value::Null
        }
    };

    Ok(value)
}

/// Run `request` and convert the outcome into a [`Response`]
///
/// Errors never escape: they are logged and reported in the response.
pub fn dispatch<B: PersistenceBackend>(store: &mut PlaceStore<B>, request: Request) -> Response {
    let action = request.action();
    debug!(action, "Handling request");

    match handle_request(store, request) {
        Ok(data) => Response::ok(data),
        Err(e) => {
            error!(action, error = %e, "Request failed");
            Response::err(e.to_string())
        }
    }
}

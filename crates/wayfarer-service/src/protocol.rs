//! Request/response types exchanged with UI surfaces
//!
//! Requests are JSON objects tagged by `action`; responses always carry
//! `success` plus either `data` or `error`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wayfarer_domain::{PlaceObservation, SettingsPatch};

/// A command for the place store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Look an observation up in both collections
    CheckPlace {
        /// The observed place
        place: PlaceObservation,
    },

    /// Add an observation to the todo list unless already known
    AddTodoPlace {
        /// The observed place
        place: PlaceObservation,
    },

    /// Move a todo place to the visited list
    MarkAsVisited {
        /// Record id or provider identifier
        #[serde(rename = "placeId")]
        place_id: String,
    },

    /// Delete a todo place
    RemoveTodoPlace {
        /// Record id or provider identifier
        #[serde(rename = "placeId")]
        place_id: String,
    },

    /// List todo places
    GetTodoPlaces,

    /// List visited places
    GetVisitedPlaces,

    /// Merge a partial settings update
    UpdateSettings {
        /// Keys to change
        settings: SettingsPatch,
    },

    /// Read settings
    GetSettings,

    /// Collection sizes
    GetStats,

    /// Snapshot everything for an export file
    ExportData,

    /// Apply an export file
    ImportData {
        /// The parsed export document
        data: Value,
    },

    /// Erase all places and reset settings
    ClearAll,
}

impl Request {
    /// Action name, as it appears on the wire
    pub fn action(&self) -> &'static str {
        match self {
            Request::CheckPlace { .. } => "checkPlace",
            Request::AddTodoPlace { .. } => "addTodoPlace",
            Request::MarkAsVisited { .. } => "markAsVisited",
            Request::RemoveTodoPlace { .. } => "removeTodoPlace",
            Request::GetTodoPlaces => "getTodoPlaces",
            Request::GetVisitedPlaces => "getVisitedPlaces",
            Request::UpdateSettings { .. } => "updateSettings",
            Request::GetSettings => "getSettings",
            Request::GetStats => "getStats",
            Request::ExportData => "exportData",
            Request::ImportData { .. } => "importData",
            Request::ClearAll => "clearAll",
        }
    }
}

/// Reply to a [`Request`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Whether the request succeeded
    pub success: bool,

    /// Result payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// Create a success response
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: if data.is_null() { None } else { Some(data) },
            error: None,
        }
    }

    /// Create an error response
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

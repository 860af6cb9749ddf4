//! Wire protocol of the spreadsheet backend.
//!
//! Every call is one HTTP request to a single endpoint. The action, sheet
//! name, and auth token travel as query parameters; payloads travel as a JSON
//! body, which the backend only reads from POST requests. Responses are JSON:
//! either the result itself or `{ "error": "..." }`.

use std::fmt;

use serde_json::Value;
use url::Url;

/// Substring (compared case-insensitively) the backend uses when the
/// requested sheet does not exist yet.
pub const MISSING_SHEET_MARKER: &str = "sheet not found";

/// Backend action names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// List every row of a sheet.
    GetAll,
    /// Read one row by id.
    GetById,
    /// Append a row.
    Create,
    /// Merge fields into an existing row.
    Update,
    /// Remove a row.
    Delete,
    /// Create the sheet and its header row.
    Setup,
}

impl Action {
    /// Returns the query-parameter value for this action.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetAll => "getAll",
            Self::GetById => "getById",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Setup => "setup",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the request URL for one backend call.
#[must_use]
pub fn request_url(base: &Url, token: &str, sheet: &str, action: Action, id: Option<&str>) -> Url {
    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("token", token)
            .append_pair("sheet", sheet)
            .append_pair("action", action.as_str());
        if let Some(id) = id {
            pairs.append_pair("id", id);
        }
    }
    url
}

/// Splits a decoded response into its result or the backend's error message.
///
/// # Errors
///
/// Returns the backend message when the body is an object with a non-null
/// `error` field.
pub fn into_result(body: Value) -> Result<Value, String> {
    if let Value::Object(map) = &body
        && let Some(error) = map.get("error")
        && !error.is_null()
    {
        let message = match error {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        };
        return Err(message);
    }
    Ok(body)
}

/// Returns `true` when a backend error message means the sheet is missing.
#[must_use]
pub fn is_missing_sheet(message: &str) -> bool {
    message.to_lowercase().contains(MISSING_SHEET_MARKER)
}

/// Returns `true` only for an explicit `{ "success": true }` reply.
#[must_use]
pub fn is_explicit_success(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool) == Some(true)
}

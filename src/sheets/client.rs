//! Generic CRUD client for one remote sheet.
//!
//! The client holds no mutable state: it is a typed façade over the backend
//! protocol, created once per sheet and cloned freely. Reads come in two
//! flavours. The `try_` methods report every failure; [`get_all`] and
//! [`get_by_id`] degrade to empty/absent results so pages still render when
//! the backend is down or unconfigured. Writes always report failures, and
//! log them at error level with full detail.
//!
//! [`get_all`]: CollectionClient::get_all
//! [`get_by_id`]: CollectionClient::get_by_id

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::error::SheetsError;
use super::protocol::{self, Action};
use super::record::{Record, RecordData, Sheet};
use crate::config::SheetsConfig;

/// Time budget for each backend request, including reading the body.
pub const BACKEND_TIMEOUT: Duration = Duration::from_secs(8);

/// Outcome of a single request attempt.
enum AttemptError {
    /// The backend reported that the sheet does not exist.
    MissingSheet(String),
    /// Any other failure.
    Failed(SheetsError),
}

/// Typed client bound to the sheet named by `T::SHEET`.
pub struct CollectionClient<T> {
    http: Client,
    config: Option<Arc<SheetsConfig>>,
    timeout: Duration,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for CollectionClient<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.clone(),
            timeout: self.timeout,
            _record: PhantomData,
        }
    }
}

impl<T: RecordData> fmt::Debug for CollectionClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionClient")
            .field("sheet", &T::SHEET)
            .field("configured", &self.config.is_some())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl<T: RecordData> CollectionClient<T> {
    /// Creates a client for `T::SHEET`.
    ///
    /// Passing `None` for `config` yields a client whose reads return
    /// empty/absent results and whose writes fail with
    /// [`SheetsError::NotConfigured`].
    #[must_use]
    pub fn new(http: Client, config: Option<Arc<SheetsConfig>>) -> Self {
        Self {
            http,
            config,
            timeout: BACKEND_TIMEOUT,
            _record: PhantomData,
        }
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The sheet this client reads and writes.
    #[must_use]
    pub fn sheet(&self) -> Sheet {
        T::SHEET
    }

    /// Whether a backend URL is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Fetches every record in the sheet, in backend order.
    ///
    /// Returns an empty list on any failure, including a missing backend
    /// URL. Failures are logged.
    #[instrument(skip(self), fields(collection = %T::SHEET))]
    pub async fn get_all(&self) -> Vec<Record<T>> {
        if !self.is_configured() {
            debug!("backend not configured; returning no records");
            return Vec::new();
        }
        match self.try_get_all().await {
            Ok(records) => records,
            Err(error) => {
                warn!(error = %error, kind = %error.kind(), "listing failed; returning no records");
                Vec::new()
            }
        }
    }

    /// Fetches every record in the sheet, reporting failures.
    ///
    /// Rows that do not decode as `T` are skipped with a warning so one
    /// malformed row does not hide the rest of the sheet.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] on configuration, transport, timeout, or
    /// backend failure, or when the reply is not a JSON array.
    #[instrument(skip(self), fields(collection = %T::SHEET))]
    pub async fn try_get_all(&self) -> Result<Vec<Record<T>>, SheetsError> {
        let body = self.execute(Action::GetAll, None, None).await?;
        let rows: Vec<Value> = serde_json::from_value(body)
            .map_err(|e| SheetsError::decode(T::SHEET.as_str(), Action::GetAll, e))?;

        let total = rows.len();
        let records: Vec<Record<T>> = rows
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value(row) {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!(row = index, error = %error, "skipping undecodable row");
                    None
                }
            })
            .collect();
        debug!(total, decoded = records.len(), "listed records");
        Ok(records)
    }

    /// Fetches one record by id.
    ///
    /// Returns `None` on any failure: absent means "unknown", not "confirmed
    /// missing". Use [`try_get_by_id`](Self::try_get_by_id) to tell them apart.
    #[instrument(skip(self), fields(collection = %T::SHEET))]
    pub async fn get_by_id(&self, id: &str) -> Option<Record<T>> {
        if !self.is_configured() {
            debug!("backend not configured; record unknown");
            return None;
        }
        match self.try_get_by_id(id).await {
            Ok(record) => record,
            Err(error) => {
                warn!(error = %error, kind = %error.kind(), "lookup failed; treating record as absent");
                None
            }
        }
    }

    /// Fetches one record by id, reporting failures.
    ///
    /// A `null` reply maps to `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] on configuration, transport, timeout, or
    /// backend failure (including the backend's own not-found error).
    #[instrument(skip(self), fields(collection = %T::SHEET))]
    pub async fn try_get_by_id(&self, id: &str) -> Result<Option<Record<T>>, SheetsError> {
        let body = self.execute(Action::GetById, Some(id), None).await?;
        if body.is_null() {
            return Ok(None);
        }
        serde_json::from_value(body)
            .map(Some)
            .map_err(|e| SheetsError::decode(T::SHEET.as_str(), Action::GetById, e))
    }

    /// Stores a new record under a freshly generated id.
    ///
    /// Returns the backend's echo of the record. A bare `{ "success": true }`
    /// confirmation yields the record as sent.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] when the backend is unconfigured, unreachable,
    /// slow, or rejects the record.
    #[instrument(skip(self, data), fields(collection = %T::SHEET, id = tracing::field::Empty), err(Display))]
    pub async fn create(&self, data: T) -> Result<Record<T>, SheetsError> {
        let record = Record {
            id: Uuid::new_v4().to_string(),
            data,
        };
        tracing::Span::current().record("id", record.id.as_str());

        let payload = Self::payload(Action::Create, &record)?;
        let body = self.execute(Action::Create, None, Some(&payload)).await?;

        match serde_json::from_value::<Record<T>>(body.clone()) {
            Ok(created) => {
                info!(id = %created.id, "record created");
                Ok(created)
            }
            Err(_) if protocol::is_explicit_success(&body) => {
                info!(id = %record.id, "record created");
                Ok(record)
            }
            Err(e) => Err(SheetsError::decode(T::SHEET.as_str(), Action::Create, e)),
        }
    }

    /// Merges `patch` into the record with the given id.
    ///
    /// Any field may be overwritten, status included. Returns the updated
    /// record when the backend echoes it, `None` when it does not.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] when the backend is unconfigured, unreachable,
    /// slow, or rejects the update.
    #[instrument(skip(self, patch), fields(collection = %T::SHEET), err(Display))]
    pub async fn update<P>(&self, id: &str, patch: &P) -> Result<Option<Record<T>>, SheetsError>
    where
        P: Serialize + ?Sized,
    {
        let payload = Self::payload(Action::Update, patch)?;
        let body = self.execute(Action::Update, Some(id), Some(&payload)).await?;

        if body.is_null() {
            return Ok(None);
        }
        match serde_json::from_value::<Record<T>>(body.clone()) {
            Ok(updated) => {
                info!(id, "record updated");
                Ok(Some(updated))
            }
            Err(_) if protocol::is_explicit_success(&body) => {
                info!(id, "record updated");
                Ok(None)
            }
            Err(e) => Err(SheetsError::decode(T::SHEET.as_str(), Action::Update, e)),
        }
    }

    /// Deletes the record with the given id.
    ///
    /// Returns `true` only when the backend replies `{ "success": true }`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] when the backend is unconfigured, unreachable,
    /// slow, or reports an error.
    #[instrument(skip(self), fields(collection = %T::SHEET), err(Display))]
    pub async fn delete(&self, id: &str) -> Result<bool, SheetsError> {
        let body = self.execute(Action::Delete, Some(id), None).await?;
        let deleted = protocol::is_explicit_success(&body);
        if deleted {
            info!(id, "record deleted");
        } else {
            warn!(id, "backend did not confirm deletion");
        }
        Ok(deleted)
    }

    /// Provisions the sheet on the backend.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] when the backend is unconfigured or the setup
    /// request fails.
    #[instrument(skip(self), fields(collection = %T::SHEET), err(Display))]
    pub async fn setup(&self) -> Result<(), SheetsError> {
        let config = self.config()?;
        self.provision(config).await
    }

    fn config(&self) -> Result<&SheetsConfig, SheetsError> {
        self.config
            .as_deref()
            .ok_or_else(|| SheetsError::not_configured(T::SHEET.as_str(), Action::Setup))
    }

    fn payload<P>(action: Action, value: &P) -> Result<Value, SheetsError>
    where
        P: Serialize + ?Sized,
    {
        let sheet = T::SHEET.as_str();
        let payload =
            serde_json::to_value(value).map_err(|e| SheetsError::payload(sheet, action, e.to_string()))?;
        if payload.is_object() {
            Ok(payload)
        } else {
            Err(SheetsError::payload(sheet, action, "payload must be a JSON object"))
        }
    }

    /// Runs one action, provisioning the sheet and retrying once if the
    /// backend reports it missing.
    async fn execute(
        &self,
        action: Action,
        id: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Value, SheetsError> {
        let sheet = T::SHEET.as_str();
        let config = self
            .config
            .as_deref()
            .ok_or_else(|| SheetsError::not_configured(sheet, action))?;

        match self.attempt(config, action, id, body).await {
            Ok(value) => Ok(value),
            Err(AttemptError::Failed(error)) => Err(error),
            Err(AttemptError::MissingSheet(message)) => {
                info!(%action, message = %message, "sheet missing; provisioning before retry");
                self.provision(config).await?;
                match self.attempt(config, action, id, body).await {
                    Ok(value) => Ok(value),
                    Err(AttemptError::Failed(error)) => Err(error),
                    Err(AttemptError::MissingSheet(message)) => {
                        Err(SheetsError::backend(sheet, action, message))
                    }
                }
            }
        }
    }

    async fn provision(&self, config: &SheetsConfig) -> Result<(), SheetsError> {
        match self.attempt(config, Action::Setup, None, None).await {
            Ok(_) => {
                info!("sheet provisioned");
                Ok(())
            }
            Err(AttemptError::Failed(error)) => Err(error),
            Err(AttemptError::MissingSheet(message)) => Err(SheetsError::backend(
                T::SHEET.as_str(),
                Action::Setup,
                message,
            )),
        }
    }

    /// Sends exactly one HTTP request. A payload forces POST.
    async fn attempt(
        &self,
        config: &SheetsConfig,
        action: Action,
        id: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Value, AttemptError> {
        let sheet = T::SHEET.as_str();
        let url = protocol::request_url(&config.base_url, &config.token, sheet, action, id);

        let request = match body {
            Some(payload) => self.http.post(url).json(payload),
            None => self.http.get(url),
        };
        debug!(%action, method = if body.is_some() { "POST" } else { "GET" }, "sending backend request");

        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| AttemptError::Failed(SheetsError::transport(sheet, action, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Failed(SheetsError::http_status(
                sheet,
                action,
                status.as_u16(),
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AttemptError::Failed(SheetsError::transport(sheet, action, e)))?;
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| AttemptError::Failed(SheetsError::decode(sheet, action, e)))?;

        protocol::into_result(value).map_err(|message| {
            if protocol::is_missing_sheet(&message) {
                AttemptError::MissingSheet(message)
            } else {
                AttemptError::Failed(SheetsError::backend(sheet, action, message))
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        title: String,
    }

    impl RecordData for Note {
        const SHEET: Sheet = Sheet::Blog;
    }

    fn unconfigured() -> CollectionClient<Note> {
        CollectionClient::new(Client::new(), None)
    }

    #[tokio::test]
    async fn test_get_all_unconfigured_returns_empty() {
        assert!(unconfigured().get_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_unconfigured_returns_none() {
        assert!(unconfigured().get_by_id("x").await.is_none());
    }

    #[tokio::test]
    async fn test_create_unconfigured_fails() {
        let err = unconfigured()
            .create(Note {
                title: "t".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SheetsError::NotConfigured { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn test_update_rejects_non_object_patch() {
        let client = CollectionClient::<Note>::new(
            Client::new(),
            Some(Arc::new(SheetsConfig {
                base_url: url::Url::parse("http://127.0.0.1:9/exec").unwrap(),
                token: String::new(),
            })),
        );
        let err = client.update("1", &["not", "an", "object"]).await.unwrap_err();
        assert!(matches!(err, SheetsError::Payload { .. }), "got: {err}");
    }

    #[test]
    fn test_default_timeout_is_eight_seconds() {
        let client = unconfigured();
        assert_eq!(client.timeout, Duration::from_secs(8));
        let client = client.with_timeout(Duration::from_millis(50));
        assert_eq!(client.timeout, Duration::from_millis(50));
        assert_eq!(client.sheet(), Sheet::Blog);
    }
}

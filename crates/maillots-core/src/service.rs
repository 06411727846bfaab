//! Catalog operations exposed to clients.
//!
//! Each call runs its own load → mutate → persist cycle against the
//! backend; nothing is cached between calls. Concurrent updates are
//! last-write-wins.

use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::CredentialVerifier;
use crate::models::{scalar_to_string, CatalogEntry};
use crate::store::{CatalogBackend, CatalogStore, PersistOrder, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("wrong password")]
    Unauthorized,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("model \"{0}\" not found")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
        }
    }
}

/// Body of a tag update, as sent by the browser client.
///
/// Fields are kept as raw JSON so that shape problems surface as
/// [`ServiceError::InvalidInput`] after the credential check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTagsRequest {
    #[serde(rename = "modeloNo", default)]
    pub model_id: Value,
    #[serde(rename = "etiquetas", default)]
    pub tags: Value,
    #[serde(default)]
    pub password: Value,
}

impl UpdateTagsRequest {
    pub fn new(model_id: &str, tags: &[String], password: &str) -> Self {
        Self {
            model_id: Value::String(model_id.to_string()),
            tags: Value::Array(tags.iter().cloned().map(Value::String).collect()),
            password: Value::String(password.to_string()),
        }
    }

    /// A request from an arbitrary JSON body; non-objects become an empty request.
    pub fn from_json(body: Value) -> Self {
        match body {
            Value::Object(_) => serde_json::from_value(body).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    fn credential(&self) -> Option<&str> {
        self.password.as_str()
    }

    /// The model key, following the browser client's rules: falsy values
    /// (missing, `null`, `false`, `0`, `""`) are rejected, anything else is
    /// compared by its string form.
    fn model_key(&self) -> Result<String, ServiceError> {
        let missing = || ServiceError::InvalidInput("\"modeloNo\" is required".to_string());
        match &self.model_id {
            Value::Null | Value::Bool(false) => Err(missing()),
            Value::String(s) if s.is_empty() => Err(missing()),
            Value::Number(n) if n.as_f64().is_some_and(|f| f == 0.0) => Err(missing()),
            Value::Array(items) => Ok(items
                .iter()
                .map(|item| scalar_to_string(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(",")),
            Value::Object(_) => Ok("[object Object]".to_string()),
            other => Ok(scalar_to_string(other).unwrap_or_default()),
        }
    }

    fn tag_list(&self) -> Result<Vec<String>, ServiceError> {
        let invalid = || {
            ServiceError::InvalidInput("\"etiquetas\" must be an array of strings".to_string())
        };
        let items = self.tags.as_array().ok_or_else(invalid)?;
        items
            .iter()
            .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
            .collect()
    }
}

/// Read-all and update-tags over a [`CatalogBackend`].
#[derive(Clone)]
pub struct CatalogService {
    backend: Arc<dyn CatalogBackend>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl CatalogService {
    pub fn new(backend: Arc<dyn CatalogBackend>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { backend, verifier }
    }

    /// The persisted collection, in stored order.
    ///
    /// Missing or corrupt data yields an empty list; only real I/O
    /// failures are errors.
    pub async fn get_all(&self) -> Result<Vec<CatalogEntry>> {
        self.backend.load().await
    }

    /// Replace the tags of one entry and persist the collection unsorted.
    pub async fn update_tags(
        &self,
        request: &UpdateTagsRequest,
    ) -> Result<CatalogEntry, ServiceError> {
        let authorized = request
            .credential()
            .is_some_and(|candidate| self.verifier.verify(candidate));
        if !authorized {
            tracing::warn!(model = %request.model_id, "rejected tag update: wrong password");
            return Err(ServiceError::Unauthorized);
        }

        let model_id = request.model_key()?;
        let tags = request.tag_list()?;

        let mut store = CatalogStore::open(self.backend.clone()).await?;
        let updated = store.replace_tags(&model_id, tags)?.clone();
        store.persist(PersistOrder::AsIs).await?;

        tracing::info!(model = %model_id, tags = updated.tags.len(), "tags updated");
        Ok(updated)
    }
}

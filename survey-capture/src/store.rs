//! Client HTTP du record store (`/records`, `/health`)
//!
//! Les échecs réseau sont remontés à l'appelant et ne touchent jamais à la
//! session d'édition.

use std::fmt;

use geocapture::{normalize_named, GeometryPayload, NewRecord, NormalizationError};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ClientConfig;

/// Erreurs du record store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connexion impossible, timeout, etc.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Réponse non-2xx avec message du serveur
    #[error("Error: {message} (HTTP {status})")]
    Rejected { status: StatusCode, message: String },

    #[error("Record {0} not found")]
    NotFound(i64),

    /// Corps de réponse inattendu
    #[error("Unexpected response from record store: {0}")]
    Decode(String),
}

/// Enregistrement persisté côté serveur
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub owner_name: String,
    pub survey_date: String,
    pub geometry_type: String,
    pub coordinates: Value,
    pub srid: i32,
    #[serde(default)]
    pub notes: Option<String>,
    /// Géométrie reprojetée en WGS84 par le serveur
    #[serde(default)]
    pub geometry_geojson: Option<geojson::Geometry>,
}

impl Record {
    /// Géométrie canonique reconstruite depuis `geometry_type` + `coordinates`
    pub fn payload(&self) -> Result<GeometryPayload, NormalizationError> {
        normalize_named(&self.geometry_type, &self.coordinates)
    }
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    record: Record,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// État du serveur (`GET /health`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.database == "connected"
    }
}

/// Client du record store
#[derive(Clone)]
pub struct RecordStore {
    client: Client,
    base_url: String,
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl RecordStore {
    /// Crée le client à partir de la configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, &config.api_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Liste les enregistrements, filtrés par propriétaire (sous-chaîne)
    pub async fn list(&self, owner_name: Option<&str>) -> Result<Vec<Record>, StoreError> {
        let mut request = self.client.get(self.endpoint("records"));
        if let Some(owner) = owner_name.map(str::trim).filter(|o| !o.is_empty()) {
            request = request.query(&[("owner_name", owner)]);
        }

        let response = check_status(request.send().await?).await?;
        let records: Vec<Record> = decode(response).await?;
        debug!(count = records.len(), owner = ?owner_name, "Records fetched");
        Ok(records)
    }

    /// Crée un enregistrement
    pub async fn create(&self, record: &NewRecord) -> Result<Record, StoreError> {
        let response = self
            .client
            .post(self.endpoint("records"))
            .json(record)
            .send()
            .await?;

        let created: CreateResponse = decode(check_status(response).await?).await?;
        info!(id = created.record.id, owner = %created.record.owner_name, "Record created");
        Ok(created.record)
    }

    /// Récupère un enregistrement par identifiant
    pub async fn get(&self, id: i64) -> Result<Record, StoreError> {
        let response = self
            .client
            .get(self.endpoint(&format!("records/{}", id)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id));
        }

        decode(check_status(response).await?).await
    }

    /// État du serveur ; un 503 (base déconnectée) n'est pas une erreur
    pub async fn health(&self) -> Result<HealthStatus, StoreError> {
        let response = self.client.get(self.endpoint("health")).send().await?;
        if response.status() == StatusCode::SERVICE_UNAVAILABLE {
            return decode(response).await;
        }
        decode(check_status(response).await?).await
    }
}

/// Transforme une réponse non-2xx en `StoreError::Rejected`
async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status,
        message: error_message(&body),
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
}

/// Message `{"error": ...}` du serveur, ou le corps brut
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => "Unknown error".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

use std::time::Duration;

use serde::Deserialize;

/// Customer directory entry as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub customer_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory request failed: {0}")]
    Request(String),
    #[error("directory endpoint returned {0}")]
    Status(u16),
}

/// Thin client for the collaborator directory endpoints. Plain
/// request/response, no streaming; used only to establish launch context.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    base_url: String,
    client: reqwest::Client,
}

impl DirectoryClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| DirectoryError::Request(err.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, DirectoryError> {
        let response = self
            .client
            .get(format!("{}/customers", self.base_url))
            .send()
            .await
            .map_err(|err| DirectoryError::Request(err.to_string()))?;
        if !response.status().is_success() {
            return Err(DirectoryError::Status(response.status().as_u16()));
        }
        response
            .json()
            .await
            .map_err(|err| DirectoryError::Request(err.to_string()))
    }

    /// Create-or-get: the backend upserts by name and returns the row.
    pub async fn ensure_customer(&self, name: &str) -> Result<Customer, DirectoryError> {
        let response = self
            .client
            .post(format!("{}/customers", self.base_url))
            .json(&serde_json::json!({ "customer_name": name }))
            .send()
            .await
            .map_err(|err| DirectoryError::Request(err.to_string()))?;
        if !response.status().is_success() {
            return Err(DirectoryError::Status(response.status().as_u16()));
        }
        response
            .json()
            .await
            .map_err(|err| DirectoryError::Request(err.to_string()))
    }
}

//! Blob-storage client for hosting artifact images.
//!
//! Uploads a file into a named container and returns the public URL the
//! storage service assigns. Pass-through integration: one attempt, no
//! retries.

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

#[derive(Clone)]
pub struct StorageClient {
    client: Client,
    endpoint: String,
}

impl StorageClient {
    #[must_use]
    pub fn with_shared_client(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    /// Upload a file and return its public URL.
    pub async fn upload(&self, container: &str, filename: &str, data: Vec<u8>) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(data).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = format!("{}/{}", self.endpoint.trim_end_matches('/'), container);
        let response = self.client.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Storage API error: {} - {}", status, body));
        }

        let response: UploadResponse = response.json().await?;

        Ok(response.url)
    }
}

//! Thin HTTP client over the coordinator's endpoints.

use log::debug;
use protocol::{Contract, ErrorBody, JoinRequest, SyncRequest, UploadAck, UploadRequest};
use serde::de::DeserializeOwned;

use crate::error::{ClientErr, Result};

/// One coordinator endpoint set, addressed by base url.
#[derive(Debug, Clone)]
pub struct ServerApi {
    base_url: String,
    http: reqwest::Client,
}

impl ServerApi {
    /// Creates an api handle for a coordinator at `base_url`
    /// (e.g. `http://127.0.0.1:3197`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// `POST /join`.
    pub async fn join(&self, join_code: &str, client_identity: &str) -> Result<Contract> {
        let request = JoinRequest {
            join_code: join_code.to_string(),
            client_identity: client_identity.to_string(),
        };

        debug!(url = self.base_url.as_str(); "joining round");
        let response = self
            .http
            .post(format!("{}/join", self.base_url))
            .json(&request)
            .send()
            .await?;

        Self::handle(response).await
    }

    /// `POST /sync`.
    pub async fn sync(&self, join_code: &str) -> Result<Contract> {
        let request = SyncRequest {
            join_code: join_code.to_string(),
        };

        let response = self
            .http
            .post(format!("{}/sync", self.base_url))
            .json(&request)
            .send()
            .await?;

        Self::handle(response).await
    }

    /// `POST /upload`.
    pub async fn upload(&self, request: &UploadRequest) -> Result<UploadAck> {
        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .json(request)
            .send()
            .await?;

        Self::handle(response).await
    }

    /// Decodes a success body, or turns a non-2xx answer into a
    /// `Server` error carrying the coordinator's message.
    async fn handle<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.to_string(),
            };

            return Err(ClientErr::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

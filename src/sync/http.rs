//! HTTP implementation of [`BoardApi`] over `reqwest`.
//!
//! `GET <base>` returns the board; `POST <base>` with a JSON body submits a
//! message. Only the status of a `POST` response is inspected.

use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use wire::{Board, Message};

use super::BoardApi;
use super::types::SyncError;
use crate::config::ClientConfig;

pub struct HttpBoardApi {
    http: reqwest::Client,
    url: Url,
}

impl HttpBoardApi {
    /// Build a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::HttpClientBuild`] if the TLS backend or client
    /// builder fails.
    pub fn new(config: &ClientConfig) -> Result<Self, SyncError> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| SyncError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: config.api_url.as_url().clone() })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait::async_trait]
impl BoardApi for HttpBoardApi {
    async fn fetch_board(&self) -> Result<Board, SyncError> {
        debug!(url = %self.url, "GET board");
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(SyncError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(wire::decode_board(&bytes)?)
    }

    async fn post_message(&self, message: &Message) -> Result<(), SyncError> {
        let body = wire::encode_message(message)?;
        debug!(url = %self.url, user = %message.user, bytes = body.len(), "POST message");
        let response = self
            .http
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(url = %self.url, error = %e, "failed to read error response body");
                    String::new()
                }
            };
            return Err(SyncError::Status { status: status.as_u16(), body });
        }
        Ok(())
    }
}

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// GET with bearer token; the body is left unread.
    pub async fn get(&self, url: &str, token: &str) -> AppResult<reqwest::Response> {
        Self::send(self.client.get(url).header("Authorization", token)).await
    }

    /// GET with bearer token, returning the raw body text.
    pub async fn get_text(&self, url: &str, token: &str) -> AppResult<String> {
        let response = self.get(url, token).await?;
        Ok(response.text().await?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, token: &str) -> AppResult<T> {
        let text = self.get_text(url, token).await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn post_json<B: serde::Serialize>(
        &self,
        url: &str,
        token: &str,
        body: &B,
    ) -> AppResult<reqwest::Response> {
        Self::send(
            self.client
                .post(url)
                .header("Authorization", token)
                .json(body),
        )
        .await
    }

    /// POST without a body (claim/fulfill mutations).
    pub async fn post_empty(&self, url: &str, token: &str) -> AppResult<reqwest::Response> {
        Self::send(self.client.post(url).header("Authorization", token)).await
    }

    /// Unauthenticated PUT straight to a presigned target.
    pub async fn put_bytes(
        &self,
        url: &str,
        data: bytes::Bytes,
        content_type: &str,
    ) -> AppResult<()> {
        Self::send(
            self.client
                .put(url)
                .header("Content-Type", content_type)
                .body(data),
        )
        .await?;
        Ok(())
    }

    async fn send(request: RequestBuilder) -> AppResult<reqwest::Response> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("HTTP request failed: status={}, body={}", status, body);
            return Err(AppError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

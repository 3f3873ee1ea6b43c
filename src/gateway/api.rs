use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::IdToken;
use crate::config::Config;
use crate::error::AppResult;
use crate::http_client::HttpClient;
use crate::models::{
    DisplayUrl, NewFoodRequest, NewSurplus, PresignedUpload, ProfileUpdate, UploadTargetRequest,
    UserProfile,
};

use super::{Collection, Gateway};

/// Gateway backed by the REST API configured in [`Config`].
pub struct ApiGateway {
    config: Arc<Config>,
    http: HttpClient,
}

impl ApiGateway {
    pub fn new(config: Arc<Config>) -> AppResult<Self> {
        let http = HttpClient::new(config.request_timeout_secs)?;
        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        self.config.api_url(path)
    }
}

#[async_trait]
impl Gateway for ApiGateway {
    async fn fetch_profile(&self, token: &IdToken) -> AppResult<UserProfile> {
        self.http.get_json(&self.url("/users/me"), token.as_str()).await
    }

    async fn save_profile(&self, token: &IdToken, profile: &ProfileUpdate) -> AppResult<()> {
        self.http
            .post_json(&self.url("/users"), token.as_str(), profile)
            .await?;
        tracing::info!("Profile saved");
        Ok(())
    }

    async fn list(&self, token: &IdToken, collection: Collection) -> AppResult<String> {
        let response = self
            .http
            .get(&self.url(collection.path()), token.as_str())
            .await?;
        let body = body_or_empty(collection, response.text().await);
        tracing::debug!("GET {}: {} bytes", collection.path(), body.len());
        Ok(body)
    }

    async fn create_surplus(&self, token: &IdToken, surplus: &NewSurplus) -> AppResult<()> {
        self.http
            .post_json(&self.url("/surpluses"), token.as_str(), surplus)
            .await?;
        tracing::info!(
            "Surplus created: food_type={}, quantity={}, image_key={}",
            surplus.food_type,
            surplus.quantity,
            surplus.image_key
        );
        Ok(())
    }

    async fn claim_surplus(&self, token: &IdToken, surplus_id: &str) -> AppResult<()> {
        let path = format!("/surpluses/{}/claim", urlencoding::encode(surplus_id));
        self.http.post_empty(&self.url(&path), token.as_str()).await?;
        tracing::info!("Surplus claimed: surplus_id={}", surplus_id);
        Ok(())
    }

    async fn create_food_request(
        &self,
        token: &IdToken,
        request: &NewFoodRequest,
    ) -> AppResult<()> {
        self.http
            .post_json(&self.url("/food-requests"), token.as_str(), request)
            .await?;
        tracing::info!(
            "Food request created: food_type={}, quantity={}",
            request.food_type,
            request.quantity
        );
        Ok(())
    }

    async fn fulfill_request(&self, token: &IdToken, request_id: &str) -> AppResult<()> {
        let path = format!("/food-requests/{}/fulfill", urlencoding::encode(request_id));
        self.http.post_empty(&self.url(&path), token.as_str()).await?;
        tracing::info!("Food request fulfilled: request_id={}", request_id);
        Ok(())
    }

    async fn presign_upload(
        &self,
        token: &IdToken,
        content_type: &str,
    ) -> AppResult<PresignedUpload> {
        let body = UploadTargetRequest {
            content_type: content_type.to_string(),
        };
        let response = self
            .http
            .post_json(&self.url("/uploads"), token.as_str(), &body)
            .await?;
        let text = response.text().await?;
        let target: PresignedUpload = serde_json::from_str(&text)?;
        tracing::debug!("Presigned upload target issued: key={}", target.key);
        Ok(target)
    }

    async fn upload_image(
        &self,
        target: &PresignedUpload,
        data: bytes::Bytes,
        content_type: &str,
    ) -> AppResult<()> {
        let size = data.len();
        self.http
            .put_bytes(&target.upload_url, data, content_type)
            .await?;
        tracing::info!(
            "Image upload: bucket={}, key={}, size={}",
            self.config.image_bucket,
            target.key,
            size
        );
        Ok(())
    }

    async fn display_url(&self, token: &IdToken, key: &str) -> AppResult<String> {
        let path = format!("/display-url?key={}", urlencoding::encode(key));
        let display: DisplayUrl = self.http.get_json(&self.url(&path), token.as_str()).await?;
        Ok(display.url)
    }
}

/// A collection body that cannot be read is treated like an unparsable one:
/// the caller degrades it to an empty collection.
fn body_or_empty<E: std::fmt::Display>(collection: Collection, body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| {
        tracing::warn!("Failed to read {} body: {}", collection.path(), e);
        String::new()
    })
}

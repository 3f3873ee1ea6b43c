//! Remote data gateway: authenticated calls to the food network API.

pub mod api;

pub use api::ApiGateway;

use async_trait::async_trait;

use crate::auth::IdToken;
use crate::error::AppResult;
use crate::models::{
    NewFoodRequest, NewSurplus, PresignedUpload, ProfileUpdate, UserProfile,
};

/// Listing collections read on every dashboard refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Surpluses,
    FoodRequests,
    MyFoodRequests,
    MySurpluses,
}

impl Collection {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Surpluses => "/surpluses",
            Self::FoodRequests => "/food-requests",
            Self::MyFoodRequests => "/food-requests/me",
            Self::MySurpluses => "/surpluses/me",
        }
    }
}

/// Backend REST surface. Stateless request/response only.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `GET /users/me`
    async fn fetch_profile(&self, token: &IdToken) -> AppResult<UserProfile>;

    /// `POST /users`
    async fn save_profile(&self, token: &IdToken, profile: &ProfileUpdate) -> AppResult<()>;

    /// Raw body of a collection read; parsing is left to the caller.
    async fn list(&self, token: &IdToken, collection: Collection) -> AppResult<String>;

    /// `POST /surpluses`
    async fn create_surplus(&self, token: &IdToken, surplus: &NewSurplus) -> AppResult<()>;

    /// `POST /surpluses/{id}/claim`
    async fn claim_surplus(&self, token: &IdToken, surplus_id: &str) -> AppResult<()>;

    /// `POST /food-requests`
    async fn create_food_request(
        &self,
        token: &IdToken,
        request: &NewFoodRequest,
    ) -> AppResult<()>;

    /// `POST /food-requests/{id}/fulfill`
    async fn fulfill_request(&self, token: &IdToken, request_id: &str) -> AppResult<()>;

    /// `POST /uploads`
    async fn presign_upload(&self, token: &IdToken, content_type: &str)
        -> AppResult<PresignedUpload>;

    /// Plain PUT of image bytes to a presigned target, bypassing the backend.
    async fn upload_image(
        &self,
        target: &PresignedUpload,
        data: bytes::Bytes,
        content_type: &str,
    ) -> AppResult<()>;

    /// `GET /display-url?key=`
    async fn display_url(&self, token: &IdToken, key: &str) -> AppResult<String>;
}

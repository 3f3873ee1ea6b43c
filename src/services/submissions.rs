use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;

use crate::auth::TokenProvider;
use crate::error::{AppError, AppResult};
use crate::gateway::Gateway;
use crate::models::{Coordinates, NewFoodRequest, NewSurplus};
use crate::services::dashboard::Notice;

/// Image picked for a donation.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub data: Bytes,
    pub content_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct DonationDraft {
    pub food_type: String,
    pub quantity: String,
    pub expiration_date: String,
    pub address: String,
    pub position: Option<Coordinates>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, Default)]
pub struct RequestDraft {
    pub food_type: String,
    pub quantity: String,
    pub description: String,
    pub address: String,
    pub position: Option<Coordinates>,
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("{0}")]
    Invalid(&'static str),

    #[error("Submission failed. Please try again.")]
    Donation(#[source] AppError),

    #[error("Failed to submit request. Please try again.")]
    Request(#[source] AppError),
}

impl SubmissionError {
    pub fn notice(&self) -> Notice {
        Notice::error(self.to_string())
    }
}

fn parse_quantity(raw: &str) -> Result<u32, SubmissionError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|q| *q > 0)
        .ok_or(SubmissionError::Invalid("Please enter a valid quantity."))
}

fn require_food_type(raw: &str) -> Result<String, SubmissionError> {
    let food_type = raw.trim();
    if food_type.is_empty() {
        return Err(SubmissionError::Invalid("Please select a food type."));
    }
    Ok(food_type.to_string())
}

/// Donation and request posting, plus image URL lookup for listing cards.
pub struct Submissions {
    gateway: Arc<dyn Gateway>,
    tokens: Arc<dyn TokenProvider>,
}

impl Submissions {
    pub fn new(gateway: Arc<dyn Gateway>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { gateway, tokens }
    }

    /// Upload the image to a presigned target, then post the donation.
    pub async fn donate(&self, draft: DonationDraft) -> Result<Notice, SubmissionError> {
        let DonationDraft {
            food_type,
            quantity,
            expiration_date,
            address,
            position,
            image,
        } = draft;

        let image = image.ok_or(SubmissionError::Invalid("Please select an image to upload."))?;
        let position =
            position.ok_or(SubmissionError::Invalid("Please select a location on the map."))?;
        let food_type = require_food_type(&food_type)?;
        let quantity = parse_quantity(&quantity)?;

        let result: AppResult<()> = async move {
            let token = self.tokens.id_token().await?;
            let target = self
                .gateway
                .presign_upload(&token, &image.content_type)
                .await?;
            self.gateway
                .upload_image(&target, image.data, &image.content_type)
                .await?;

            let surplus = NewSurplus {
                food_type,
                quantity,
                expiration_date,
                address,
                image_key: target.key,
                coordinates: position,
            };
            self.gateway.create_surplus(&token, &surplus).await
        }
        .await;

        match result {
            Ok(()) => Ok(Notice::success("Donation submitted successfully! Thank you.")),
            Err(e) => {
                tracing::error!("Donation submission failed: {}", e);
                Err(SubmissionError::Donation(e))
            }
        }
    }

    pub async fn request_food(&self, draft: RequestDraft) -> Result<Notice, SubmissionError> {
        let food_type = require_food_type(&draft.food_type)?;
        let quantity = parse_quantity(&draft.quantity)?;

        let request = NewFoodRequest {
            food_type,
            quantity,
            description: draft.description,
            address: draft.address,
            coordinates: draft.position,
        };

        let result: AppResult<()> = async {
            let token = self.tokens.id_token().await?;
            self.gateway.create_food_request(&token, &request).await
        }
        .await;

        match result {
            Ok(()) => Ok(Notice::success("Food request submitted successfully!")),
            Err(e) => {
                tracing::error!("Request submission failed: {}", e);
                Err(SubmissionError::Request(e))
            }
        }
    }

    /// Viewable URL for a stored image key. Failures are logged and yield `None`.
    pub async fn image_url(&self, key: &str) -> Option<String> {
        let result = async {
            let token = self.tokens.id_token().await?;
            self.gateway.display_url(&token, key).await
        }
        .await;

        match result {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::error!("Error fetching display URL for key {}: {}", key, e);
                None
            }
        }
    }
}

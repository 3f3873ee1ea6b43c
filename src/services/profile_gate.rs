use regex::Regex;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

use crate::auth::TokenProvider;
use crate::error::{AppError, AppResult};
use crate::gateway::Gateway;
use crate::models::{ProfileUpdate, UserProfile};

/// Optional leading `+`, then at least 10 digits/spaces/dashes/parentheses
static RE_PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[\d\s()-]{10,}$").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Onboarding,
    Dashboard(UserProfile),
}

#[derive(Debug, Clone, Default)]
pub struct OnboardingForm {
    pub name: String,
    pub phone_number: String,
}

impl OnboardingForm {
    pub fn validate(&self) -> Result<ProfileUpdate, OnboardingError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(OnboardingError::MissingName);
        }
        let phone = self.phone_number.trim();
        if phone.is_empty() {
            return Err(OnboardingError::MissingPhone);
        }
        let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
        if !RE_PHONE.is_match(&compact) {
            return Err(OnboardingError::InvalidPhone);
        }
        Ok(ProfileUpdate {
            name: name.to_string(),
            phone_number: phone.to_string(),
        })
    }
}

#[derive(Error, Debug)]
pub enum OnboardingError {
    #[error("Please enter your name.")]
    MissingName,

    #[error("Please enter your phone number.")]
    MissingPhone,

    #[error("Please enter a valid phone number.")]
    InvalidPhone,

    #[error("Failed to save profile. Please try again.")]
    Save(#[source] AppError),
}

/// Keeps users without a display name out of the dashboard.
pub struct ProfileGate {
    gateway: Arc<dyn Gateway>,
    tokens: Arc<dyn TokenProvider>,
}

impl ProfileGate {
    pub fn new(gateway: Arc<dyn Gateway>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { gateway, tokens }
    }

    /// Fetch the profile; any failure routes to onboarding.
    pub async fn check(&self) -> GateDecision {
        match self.fetch().await {
            Ok(profile) if profile.is_complete() => {
                tracing::info!("Profile complete: points={}", profile.donation_points);
                GateDecision::Dashboard(profile)
            }
            Ok(_) => {
                tracing::info!("Profile has no name, routing to onboarding");
                GateDecision::Onboarding
            }
            Err(e) => {
                tracing::warn!("Profile fetch failed, routing to onboarding: {}", e);
                GateDecision::Onboarding
            }
        }
    }

    async fn fetch(&self) -> AppResult<UserProfile> {
        let token = self.tokens.id_token().await?;
        self.gateway.fetch_profile(&token).await
    }

    /// Save the onboarding form and re-check the profile once.
    pub async fn complete_onboarding(
        &self,
        form: &OnboardingForm,
    ) -> Result<GateDecision, OnboardingError> {
        let update = form.validate()?;

        let saved = async {
            let token = self.tokens.id_token().await?;
            self.gateway.save_profile(&token, &update).await
        }
        .await;

        if let Err(e) = saved {
            tracing::error!("Error updating profile: {}", e);
            return Err(OnboardingError::Save(e));
        }

        tracing::info!("Profile updated successfully");
        Ok(self.check().await)
    }
}

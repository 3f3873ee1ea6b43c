use std::sync::{Arc, Mutex, PoisonError};

use crate::auth::TokenProvider;
use crate::config::Config;
use crate::error::AppResult;
use crate::gateway::{ApiGateway, Gateway};
use crate::models::UserProfile;
use crate::services::dashboard::{Dashboard, Notice};
use crate::services::profile_gate::{GateDecision, OnboardingError, OnboardingForm, ProfileGate};
use crate::services::submissions::{DonationDraft, RequestDraft, SubmissionError, Submissions};

/// Authenticated session shell: profile gate in front of the dashboard.
pub struct App {
    pub gate: ProfileGate,
    pub dashboard: Dashboard,
    pub submissions: Submissions,
    profile: Mutex<Option<UserProfile>>,
}

impl App {
    pub fn new(gateway: Arc<dyn Gateway>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            gate: ProfileGate::new(gateway.clone(), tokens.clone()),
            dashboard: Dashboard::new(gateway.clone(), tokens.clone()),
            submissions: Submissions::new(gateway, tokens),
            profile: Mutex::new(None),
        }
    }

    /// Build an app talking to the configured API.
    pub fn connect(config: Arc<Config>, tokens: Arc<dyn TokenProvider>) -> AppResult<Self> {
        let gateway = ApiGateway::new(config)?;
        Ok(Self::new(Arc::new(gateway), tokens))
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.profile
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn points(&self) -> u64 {
        self.profile().map(|p| p.donation_points).unwrap_or(0)
    }

    /// Run the profile gate; on success, mount the dashboard (first load).
    pub async fn start(&self) -> GateDecision {
        let decision = self.recheck_profile().await;
        if matches!(decision, GateDecision::Dashboard(_)) {
            self.dashboard.load_all().await;
        }
        decision
    }

    pub async fn finish_onboarding(
        &self,
        form: &OnboardingForm,
    ) -> Result<GateDecision, OnboardingError> {
        let decision = self.gate.complete_onboarding(form).await?;
        self.remember(&decision);
        if matches!(decision, GateDecision::Dashboard(_)) {
            self.dashboard.load_all().await;
        }
        Ok(decision)
    }

    /// Post a donation; on success refresh the listings and the points balance.
    pub async fn donate(&self, draft: DonationDraft) -> Result<Notice, SubmissionError> {
        let notice = self.submissions.donate(draft).await?;
        self.dashboard.load_all().await;
        self.recheck_profile().await;
        Ok(notice)
    }

    pub async fn request_food(&self, draft: RequestDraft) -> Result<Notice, SubmissionError> {
        let notice = self.submissions.request_food(draft).await?;
        self.dashboard.load_all().await;
        Ok(notice)
    }

    async fn recheck_profile(&self) -> GateDecision {
        let decision = self.gate.check().await;
        self.remember(&decision);
        decision
    }

    fn remember(&self, decision: &GateDecision) {
        let profile = match decision {
            GateDecision::Dashboard(profile) => Some(profile.clone()),
            GateDecision::Onboarding => None,
        };
        *self.profile.lock().unwrap_or_else(PoisonError::into_inner) = profile;
    }
}

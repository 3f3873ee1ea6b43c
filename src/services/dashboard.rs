//! Dashboard coordinator: owns the listing/request view state and mediates
//! claim/fulfill mutations.
//!
//! Every refresh reads all four collections concurrently with one token and
//! replaces them wholesale. A refresh that resolves after a newer one started
//! is discarded (generation guard), so a stale response never overwrites
//! fresher state.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::auth::{IdToken, SessionProbe, TokenProvider};
use crate::error::{AppError, AppResult};
use crate::gateway::{Collection, Gateway};
use crate::models::{FoodRequest, Surplus};
use crate::services::normalizer::normalize_listings;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub surpluses: Vec<Surplus>,
    pub requests: Vec<FoodRequest>,
    pub my_requests: Vec<FoodRequest>,
    pub my_donations: Vec<Surplus>,
}

/// Diagnostic captured when a refresh fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadFailure {
    pub message: String,
    pub response_status: Option<u16>,
    pub response_text: Option<String>,
    pub session: SessionProbe,
}

impl LoadFailure {
    async fn capture(err: &AppError, tokens: &dyn TokenProvider) -> Self {
        Self {
            message: err.to_string(),
            response_status: err.status(),
            response_text: err.body().map(str::to_string),
            session: SessionProbe::probe(tokens).await,
        }
    }
}

impl std::fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "A network error has occurred.")?;
        write!(f, "Error: {}", self.message)?;
        if let Some(status) = self.response_status {
            write!(f, "\nHTTP status: {}", status)?;
        }
        if let Some(text) = self.response_text.as_deref().filter(|t| !t.is_empty()) {
            write!(f, "\nResponse body:\n{}", text)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(LoadFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Ready,
    Failed,
    /// A newer refresh started before this one resolved; its result was dropped.
    Superseded,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub phase: LoadPhase,
    pub collections: Collections,
    pub claiming_id: Option<String>,
    pub fulfilling_id: Option<String>,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient user notification produced by an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BusySlot {
    Claim,
    Fulfill,
}

impl BusySlot {
    fn cell<'a>(&self, state: &'a mut DashboardState) -> &'a mut Option<String> {
        match self {
            Self::Claim => &mut state.claiming_id,
            Self::Fulfill => &mut state.fulfilling_id,
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            Self::Claim => "Item claimed successfully!",
            Self::Fulfill => "Request fulfilled successfully!",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Self::Claim => "An error occurred while claiming.",
            Self::Fulfill => "An error occurred while fulfilling the request.",
        }
    }

    fn busy_message(&self) -> &'static str {
        match self {
            Self::Claim => "Another claim is already in progress.",
            Self::Fulfill => "Another request is already being fulfilled.",
        }
    }
}

/// Holds a busy slot for the lifetime of an action and clears it on drop.
struct BusyGuard<'a> {
    state: &'a Mutex<DashboardState>,
    slot: BusySlot,
}

impl<'a> BusyGuard<'a> {
    fn acquire(state: &'a Mutex<DashboardState>, slot: BusySlot, id: &str) -> Option<Self> {
        let mut guard = lock(state);
        let cell = slot.cell(&mut guard);
        if cell.is_some() {
            return None;
        }
        *cell = Some(id.to_string());
        Some(Self { state, slot })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.slot.cell(&mut lock(self.state)) = None;
    }
}

fn lock(state: &Mutex<DashboardState>) -> MutexGuard<'_, DashboardState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Dashboard {
    gateway: Arc<dyn Gateway>,
    tokens: Arc<dyn TokenProvider>,
    state: Mutex<DashboardState>,
}

impl Dashboard {
    pub fn new(gateway: Arc<dyn Gateway>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            gateway,
            tokens,
            state: Mutex::new(DashboardState::default()),
        }
    }

    pub fn snapshot(&self) -> DashboardState {
        lock(&self.state).clone()
    }

    pub fn phase(&self) -> LoadPhase {
        lock(&self.state).phase.clone()
    }

    pub fn collections(&self) -> Collections {
        lock(&self.state).collections.clone()
    }

    pub fn claiming_id(&self) -> Option<String> {
        lock(&self.state).claiming_id.clone()
    }

    pub fn fulfilling_id(&self) -> Option<String> {
        lock(&self.state).fulfilling_id.clone()
    }

    /// Re-read all four collections. Used for the initial load, manual retry
    /// and external refresh signals alike.
    pub async fn load_all(&self) -> LoadOutcome {
        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.phase = LoadPhase::Loading;
            state.generation
        };

        match self.fetch_collections().await {
            Ok(collections) => {
                let mut state = lock(&self.state);
                if state.generation != generation {
                    tracing::debug!("Discarding stale dashboard load: generation={}", generation);
                    return LoadOutcome::Superseded;
                }
                tracing::info!(
                    "Dashboard loaded: surpluses={}, requests={}, my_requests={}, my_donations={}",
                    collections.surpluses.len(),
                    collections.requests.len(),
                    collections.my_requests.len(),
                    collections.my_donations.len()
                );
                state.collections = collections;
                state.phase = LoadPhase::Ready;
                LoadOutcome::Ready
            }
            Err(err) => {
                let failure = LoadFailure::capture(&err, self.tokens.as_ref()).await;
                let mut state = lock(&self.state);
                if state.generation != generation {
                    tracing::debug!("Discarding stale dashboard failure: generation={}", generation);
                    return LoadOutcome::Superseded;
                }
                tracing::error!(
                    "Dashboard load failed: message={}, status={:?}, session={:?}",
                    failure.message,
                    failure.response_status,
                    failure.session
                );
                state.phase = LoadPhase::Failed(failure);
                LoadOutcome::Failed
            }
        }
    }

    async fn fetch_collections(&self) -> AppResult<Collections> {
        // One token per cycle; without it no read is issued.
        let token = self.tokens.id_token().await?;
        let gateway = self.gateway.as_ref();

        let (surpluses, requests, my_requests, my_donations) = tokio::try_join!(
            gateway.list(&token, Collection::Surpluses),
            gateway.list(&token, Collection::FoodRequests),
            gateway.list(&token, Collection::MyFoodRequests),
            gateway.list(&token, Collection::MySurpluses),
        )?;

        let raw_donations = parse_records(Collection::MySurpluses, &my_donations);

        Ok(Collections {
            surpluses: parse_collection(Collection::Surpluses, &surpluses),
            requests: parse_collection(Collection::FoodRequests, &requests),
            my_requests: parse_collection(Collection::MyFoodRequests, &my_requests),
            my_donations: normalize_listings(&raw_donations),
        })
    }

    /// Claim a donation, then reload everything.
    pub async fn claim(&self, surplus_id: &str) -> Notice {
        self.run_action(BusySlot::Claim, surplus_id, |token| async move {
            self.gateway.claim_surplus(&token, surplus_id).await
        })
        .await
    }

    /// Fulfil a food request, then reload everything.
    pub async fn fulfill(&self, request_id: &str) -> Notice {
        self.run_action(BusySlot::Fulfill, request_id, |token| async move {
            self.gateway.fulfill_request(&token, request_id).await
        })
        .await
    }

    async fn run_action<F, Fut>(&self, slot: BusySlot, id: &str, action: F) -> Notice
    where
        F: FnOnce(IdToken) -> Fut,
        Fut: Future<Output = AppResult<()>>,
    {
        let Some(_busy) = BusyGuard::acquire(&self.state, slot, id) else {
            tracing::warn!("{:?} rejected while another is in flight: id={}", slot, id);
            return Notice::error(slot.busy_message());
        };

        let result = match self.tokens.id_token().await {
            Ok(token) => action(token).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                tracing::info!("{:?} succeeded: id={}", slot, id);
                self.load_all().await;
                Notice::success(slot.success_message())
            }
            Err(err) => {
                tracing::error!("{:?} failed: id={}, error={}", slot, id, err);
                Notice::error(
                    err.backend_message()
                        .unwrap_or_else(|| slot.failure_message().to_string()),
                )
            }
        }
    }

    /// Log the current failure diagnostic for support and return it as JSON.
    pub fn print_debug(&self) -> Option<String> {
        let LoadPhase::Failed(failure) = self.phase() else {
            return None;
        };
        let json = serde_json::to_string_pretty(&failure).ok()?;
        tracing::info!("Dashboard debug object:\n{}", json);
        Some(json)
    }
}

/// Decode a collection body record by record. A record that cannot be read
/// is dropped on its own; the rest of the collection is kept.
fn parse_collection<T: DeserializeOwned>(collection: Collection, body: &str) -> Vec<T> {
    let records = parse_records(collection, body);
    let total = records.len();
    let items: Vec<T> = records
        .into_iter()
        .filter_map(|record| serde_json::from_value(record).ok())
        .collect();
    if items.len() < total {
        tracing::warn!(
            "Dropped {} unreadable records from {}",
            total - items.len(),
            collection.path()
        );
    }
    items
}

/// Split a collection body into raw records, degrading to an empty list
/// instead of failing.
fn parse_records(collection: Collection, body: &str) -> Vec<Value> {
    if let Ok(records) = serde_json::from_str::<Vec<Value>>(body) {
        return records;
    }

    // Second chance: `null`, or an array wrapped in a JSON string.
    match serde_json::from_str::<Option<String>>(body) {
        Ok(None) => return Vec::new(),
        Ok(Some(inner)) => {
            if let Ok(records) = serde_json::from_str::<Vec<Value>>(&inner) {
                return records;
            }
        }
        Err(_) => {}
    }

    tracing::warn!(
        "Unparsable {} response, using empty collection: {} bytes",
        collection.path(),
        body.len()
    );
    Vec::new()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::gateway::fake::{FakeGateway, FakeTokens};
    use crate::models::{
        ListingStatus, NewFoodRequest, NewSurplus, PresignedUpload, ProfileUpdate, UserProfile,
    };

    const SURPLUSES: &str = r#"[{"surplusId": "s-1", "foodType": "Rice", "quantity": 5, "status": "active"}]"#;
    const REQUESTS: &str = r#"[{"requestId": "r-1", "requesterId": "u-2", "foodType": "Milk", "quantity": 2, "status": "active", "createdAt": "2025-01-01T00:00:00Z"}]"#;
    const MY_DONATIONS: &str = r#"[{"surplusId": "s-9", "foodType": "Bread", "quantity": 3, "pickedBy": "Jane"}]"#;

    fn seeded_gateway() -> Arc<FakeGateway> {
        Arc::new(FakeGateway::with_bodies(&[
            (Collection::Surpluses, SURPLUSES),
            (Collection::FoodRequests, REQUESTS),
            (Collection::MyFoodRequests, REQUESTS),
            (Collection::MySurpluses, MY_DONATIONS),
        ]))
    }

    fn new_dashboard(gateway: Arc<FakeGateway>) -> Dashboard {
        Dashboard::new(gateway, Arc::new(FakeTokens::default()))
    }

    #[tokio::test]
    async fn test_load_all_populates_collections() {
        let gateway = seeded_gateway();
        let dashboard = new_dashboard(gateway.clone());
        assert_eq!(dashboard.phase(), LoadPhase::Idle);

        assert_eq!(dashboard.load_all().await, LoadOutcome::Ready);
        assert_eq!(dashboard.phase(), LoadPhase::Ready);

        let collections = dashboard.collections();
        assert_eq!(collections.surpluses[0].surplus_id, "s-1");
        assert_eq!(collections.requests[0].request_id, "r-1");
        assert_eq!(collections.my_requests.len(), 1);

        let donation = &collections.my_donations[0];
        assert_eq!(donation.claimer_info.as_ref().unwrap().name.as_deref(), Some("Jane"));
        assert_eq!(donation.effective_status(), ListingStatus::Claimed);
        assert_eq!(gateway.read_count(), 4);
    }

    #[tokio::test]
    async fn test_token_failure_fails_without_reads() {
        let gateway = seeded_gateway();
        let dashboard = Dashboard::new(gateway.clone(), Arc::new(FakeTokens::failing()));

        assert_eq!(dashboard.load_all().await, LoadOutcome::Failed);
        assert_eq!(gateway.read_count(), 0);

        let LoadPhase::Failed(failure) = dashboard.phase() else {
            panic!("expected failed phase");
        };
        assert!(failure.message.contains("not authenticated"));
        assert_eq!(failure.response_status, None);
        assert!(!failure.session.has_tokens);
    }

    #[tokio::test]
    async fn test_unparsable_collection_defaults_to_empty() {
        let gateway = Arc::new(FakeGateway::with_bodies(&[
            (Collection::Surpluses, SURPLUSES),
            (Collection::FoodRequests, REQUESTS),
            (Collection::MyFoodRequests, "<html>Internal Server Error</html>"),
            (Collection::MySurpluses, MY_DONATIONS),
        ]));
        let dashboard = new_dashboard(gateway);

        assert_eq!(dashboard.load_all().await, LoadOutcome::Ready);
        let collections = dashboard.collections();
        assert!(collections.my_requests.is_empty());
        assert_eq!(collections.surpluses.len(), 1);
        assert_eq!(collections.requests.len(), 1);
        assert_eq!(collections.my_donations.len(), 1);
    }

    #[tokio::test]
    async fn test_double_encoded_and_null_bodies() {
        let wrapped = serde_json::to_string(SURPLUSES).unwrap();
        let gateway = Arc::new(FakeGateway::with_bodies(&[
            (Collection::Surpluses, wrapped.as_str()),
            (Collection::FoodRequests, "null"),
            (Collection::MySurpluses, r#""not json""#),
        ]));
        let dashboard = new_dashboard(gateway);

        assert_eq!(dashboard.load_all().await, LoadOutcome::Ready);
        let collections = dashboard.collections();
        assert_eq!(collections.surpluses[0].surplus_id, "s-1");
        assert!(collections.requests.is_empty());
        assert!(collections.my_donations.is_empty());
    }

    #[tokio::test]
    async fn test_mixed_shape_records_are_kept() {
        let gateway = Arc::new(FakeGateway::with_bodies(&[
            (
                Collection::Surpluses,
                r#"[{"surplusId": "s-1", "foodType": "Rice", "quantity": 5},
                    {"surplusId": "s-2", "foodType": null, "quantity": 3},
                    "stray"]"#,
            ),
            (
                Collection::FoodRequests,
                r#"[{"requestId": "r-1", "foodType": "Milk", "quantity": 1.5, "createdAt": 123},
                    {"requestId": "r-2", "requesterId": null, "quantity": 2}]"#,
            ),
        ]));
        let dashboard = new_dashboard(gateway);

        assert_eq!(dashboard.load_all().await, LoadOutcome::Ready);
        let collections = dashboard.collections();

        let ids: Vec<&str> = collections.surpluses.iter().map(|s| s.surplus_id.as_str()).collect();
        assert_eq!(ids, vec!["s-1", "s-2"]);
        assert_eq!(collections.surpluses[1].food_type, "");
        assert_eq!(collections.surpluses[1].quantity, 3);

        assert_eq!(collections.requests.len(), 2);
        assert_eq!(collections.requests[0].quantity, 1);
        assert_eq!(collections.requests[0].created_at, None);
    }

    #[tokio::test]
    async fn test_read_failure_captures_diagnostic() {
        let gateway = seeded_gateway();
        gateway.failing_reads.lock().unwrap().insert(
            Collection::FoodRequests.path(),
            AppError::Http {
                status: 503,
                body: "Service Unavailable".to_string(),
            },
        );
        let dashboard = new_dashboard(gateway);

        assert_eq!(dashboard.load_all().await, LoadOutcome::Failed);
        let LoadPhase::Failed(failure) = dashboard.phase() else {
            panic!("expected failed phase");
        };
        assert_eq!(failure.response_status, Some(503));
        assert_eq!(failure.response_text.as_deref(), Some("Service Unavailable"));
        assert!(failure.session.has_tokens);
        assert!(failure.to_string().contains("HTTP status: 503"));

        let debug = dashboard.print_debug().unwrap();
        assert!(debug.contains("\"responseStatus\": 503"));
        assert!(debug.contains("\"hasTokens\": true"));

        // retry recovers
        assert_eq!(dashboard.load_all().await, LoadOutcome::Ready);
        assert!(dashboard.print_debug().is_none());
    }

    #[tokio::test]
    async fn test_claim_success_reloads_once_and_clears_busy() {
        let gateway = seeded_gateway();
        let dashboard = new_dashboard(gateway.clone());

        let notice = dashboard.claim("s-1").await;
        assert_eq!(notice, Notice::success("Item claimed successfully!"));
        assert_eq!(gateway.count("POST /surpluses/s-1/claim"), 1);
        assert_eq!(gateway.read_count(), 4);
        assert_eq!(dashboard.claiming_id(), None);
        assert_eq!(dashboard.phase(), LoadPhase::Ready);
    }

    #[tokio::test]
    async fn test_claim_failure_surfaces_backend_message() {
        let gateway = seeded_gateway();
        *gateway.claim_error.lock().unwrap() = Some(AppError::Http {
            status: 409,
            body: r#"{"error": "Already claimed"}"#.to_string(),
        });
        let dashboard = new_dashboard(gateway.clone());

        let notice = dashboard.claim("s-1").await;
        assert_eq!(notice, Notice::error("Already claimed"));
        assert_eq!(dashboard.claiming_id(), None);
        assert_eq!(gateway.read_count(), 0);
        assert_eq!(dashboard.phase(), LoadPhase::Idle);
    }

    #[tokio::test]
    async fn test_claim_failure_without_message_is_generic() {
        let gateway = seeded_gateway();
        *gateway.claim_error.lock().unwrap() = Some(AppError::Http {
            status: 500,
            body: "oops".to_string(),
        });
        let dashboard = new_dashboard(gateway);

        let notice = dashboard.claim("s-1").await;
        assert_eq!(notice, Notice::error("An error occurred while claiming."));
    }

    #[tokio::test]
    async fn test_fulfill_failure_surfaces_backend_message() {
        let gateway = seeded_gateway();
        *gateway.fulfill_error.lock().unwrap() = Some(AppError::Http {
            status: 409,
            body: r#"{"error": "Request already fulfilled"}"#.to_string(),
        });
        let dashboard = new_dashboard(gateway.clone());

        let notice = dashboard.fulfill("r-1").await;
        assert_eq!(notice, Notice::error("Request already fulfilled"));
        assert_eq!(gateway.count("POST /food-requests/r-1/fulfill"), 1);
        assert_eq!(dashboard.fulfilling_id(), None);
        assert_eq!(gateway.read_count(), 0);
    }

    #[tokio::test]
    async fn test_fulfill_success_and_missing_token() {
        let gateway = seeded_gateway();
        let dashboard = new_dashboard(gateway.clone());
        let notice = dashboard.fulfill("r-1").await;
        assert!(notice.is_success());
        assert_eq!(notice.message, "Request fulfilled successfully!");
        assert_eq!(gateway.count("POST /food-requests/r-1/fulfill"), 1);
        assert_eq!(dashboard.fulfilling_id(), None);

        let gateway = seeded_gateway();
        let dashboard = Dashboard::new(gateway.clone(), Arc::new(FakeTokens::failing()));
        let notice = dashboard.fulfill("r-1").await;
        assert_eq!(
            notice,
            Notice::error("An error occurred while fulfilling the request.")
        );
        assert_eq!(gateway.count("POST"), 0);
        assert_eq!(dashboard.fulfilling_id(), None);
    }

    #[tokio::test]
    async fn test_second_claim_rejected_while_busy() {
        let gateway = seeded_gateway();
        let dashboard = new_dashboard(gateway.clone());

        let held = BusyGuard::acquire(&dashboard.state, BusySlot::Claim, "s-1").unwrap();
        let notice = dashboard.claim("s-2").await;
        assert_eq!(notice, Notice::error("Another claim is already in progress."));
        assert_eq!(dashboard.claiming_id().as_deref(), Some("s-1"));
        assert_eq!(gateway.count("POST"), 0);

        // fulfil uses its own slot
        assert!(dashboard.fulfill("r-1").await.is_success());

        drop(held);
        assert_eq!(dashboard.claiming_id(), None);
    }

    /// Holds the first surplus read until released, to overlap two refreshes.
    struct HeldFirstRead {
        inner: FakeGateway,
        release: Notify,
        first: AtomicBool,
    }

    #[async_trait]
    impl Gateway for HeldFirstRead {
        async fn fetch_profile(&self, token: &IdToken) -> AppResult<UserProfile> {
            self.inner.fetch_profile(token).await
        }
        async fn save_profile(&self, token: &IdToken, profile: &ProfileUpdate) -> AppResult<()> {
            self.inner.save_profile(token, profile).await
        }
        async fn list(&self, token: &IdToken, collection: Collection) -> AppResult<String> {
            if collection == Collection::Surpluses {
                if self.first.swap(false, Ordering::SeqCst) {
                    self.release.notified().await;
                    return Ok(r#"[{"surplusId": "old"}]"#.to_string());
                }
                return Ok(r#"[{"surplusId": "new"}]"#.to_string());
            }
            self.inner.list(token, collection).await
        }
        async fn create_surplus(&self, token: &IdToken, s: &NewSurplus) -> AppResult<()> {
            self.inner.create_surplus(token, s).await
        }
        async fn claim_surplus(&self, token: &IdToken, id: &str) -> AppResult<()> {
            self.inner.claim_surplus(token, id).await
        }
        async fn create_food_request(&self, token: &IdToken, r: &NewFoodRequest) -> AppResult<()> {
            self.inner.create_food_request(token, r).await
        }
        async fn fulfill_request(&self, token: &IdToken, id: &str) -> AppResult<()> {
            self.inner.fulfill_request(token, id).await
        }
        async fn presign_upload(&self, token: &IdToken, ct: &str) -> AppResult<PresignedUpload> {
            self.inner.presign_upload(token, ct).await
        }
        async fn upload_image(
            &self,
            target: &PresignedUpload,
            data: bytes::Bytes,
            ct: &str,
        ) -> AppResult<()> {
            self.inner.upload_image(target, data, ct).await
        }
        async fn display_url(&self, token: &IdToken, key: &str) -> AppResult<String> {
            self.inner.display_url(token, key).await
        }
    }

    #[tokio::test]
    async fn test_stale_load_is_discarded() {
        let gateway = Arc::new(HeldFirstRead {
            inner: FakeGateway::default(),
            release: Notify::new(),
            first: AtomicBool::new(true),
        });
        let dashboard = Dashboard::new(gateway.clone(), Arc::new(FakeTokens::default()));

        let first = dashboard.load_all();
        let second = async {
            let outcome = dashboard.load_all().await;
            gateway.release.notify_one();
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, LoadOutcome::Superseded);
        assert_eq!(second, LoadOutcome::Ready);
        assert_eq!(dashboard.collections().surpluses[0].surplus_id, "new");
        assert_eq!(dashboard.phase(), LoadPhase::Ready);
    }
}

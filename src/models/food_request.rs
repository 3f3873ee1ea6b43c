use serde::{Deserialize, Serialize};

use super::{lenient, Attribution, Coordinates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Active,
    Fulfilled,
    #[serde(other)]
    Unknown,
}

/// A posted food-need record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRequest {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub request_id: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub requester_id: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub food_type: String,
    #[serde(default, deserialize_with = "lenient::quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub status: RequestStatus,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub coordinates: Option<Coordinates>,
    /// Fulfiller attribution, set once a donor fulfils the request.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub donor_info: Option<Attribution>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub requester_info: Option<Attribution>,
}

impl FoodRequest {
    pub fn location(&self) -> Option<Coordinates> {
        self.coordinates.filter(Coordinates::is_located)
    }

    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.created_at
            .as_deref()
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&chrono::Utc))
    }
}

/// Body of `POST /food-requests`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFoodRequest {
    pub food_type: String,
    pub quantity: u32,
    pub description: String,
    pub address: String,
    pub coordinates: Option<Coordinates>,
}

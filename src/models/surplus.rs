use serde::{Deserialize, Serialize};

use super::{lenient, Attribution, Coordinates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Claimed,
    Fulfilled,
    #[serde(other)]
    Unknown,
}

impl ListingStatus {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "claimed" => Self::Claimed,
            "fulfilled" => Self::Fulfilled,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Claimed => "claimed",
            Self::Fulfilled => "fulfilled",
            Self::Unknown => "unknown",
        }
    }
}

/// A posted surplus-food donation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surplus {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub surplus_id: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub food_type: String,
    #[serde(default, deserialize_with = "lenient::quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub expiration_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub donor_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub image_key: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub donor_info: Option<Attribution>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub claimer_info: Option<Attribution>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub status: Option<ListingStatus>,
}

impl Surplus {
    /// Status as shown to users. A claimant attribution never reads as active.
    pub fn effective_status(&self) -> ListingStatus {
        match self.status {
            Some(ListingStatus::Claimed) => ListingStatus::Claimed,
            Some(ListingStatus::Fulfilled) => ListingStatus::Fulfilled,
            _ if self.claimer_info.is_some() => ListingStatus::Claimed,
            Some(status) => status,
            None => ListingStatus::Active,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self.effective_status(),
            ListingStatus::Claimed | ListingStatus::Fulfilled
        )
    }

    pub fn location(&self) -> Option<Coordinates> {
        self.coordinates.filter(Coordinates::is_located)
    }
}

/// Body of `POST /surpluses`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSurplus {
    pub food_type: String,
    pub quantity: u32,
    pub expiration_date: String,
    pub address: String,
    pub image_key: String,
    pub coordinates: Coordinates,
}

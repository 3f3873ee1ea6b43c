pub mod food_request;
pub mod lenient;
pub mod profile;
pub mod surplus;
pub mod upload;

pub use food_request::*;
pub use profile::*;
pub use surplus::*;
pub use upload::*;

use serde::{Deserialize, Serialize};

/// Name/phone pair identifying a counterparty (donor, claimant, requester, fulfiller).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl Attribution {
    pub fn new(name: Option<String>, phone_number: Option<String>) -> Self {
        Self { name, phone_number }
    }
}

impl std::fmt::Display for Attribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({})",
            self.name.as_deref().unwrap_or("unknown"),
            self.phone_number.as_deref().unwrap_or("no phone")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// A zero latitude or longitude is treated as "not pinned".
    pub fn is_located(&self) -> bool {
        self.lat != 0.0 && self.lng != 0.0
    }
}

//! Listing normalizer: reconciles the donation shapes returned by different
//! backend versions into one canonical [`Surplus`].
//!
//! Claimant attribution is resolved by trying each [`AttributionSource`] in
//! [`ATTRIBUTION_PRECEDENCE`] order; the first source that matches wins, even
//! if a later one carries more detail. Status comes from the explicit `status`
//! field, then the `claimed` flag, then the `fulfilled` flag.
//!
//! Every function here is total: malformed input yields no attribution and an
//! unresolved status, never an error.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::models::{lenient, Attribution, ListingStatus, Surplus};

/// Places a backend may put "who claimed / picked up this donation".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributionSource {
    /// Already canonical `claimerInfo { name, phoneNumber }`.
    ClaimerInfo,
    ClaimedBy,
    PickedBy,
    Picker,
    /// Flat `claimer_name` / `claimerName` + `claimer_phone` / `claimerPhone`.
    ClaimerFields,
}

pub const ATTRIBUTION_PRECEDENCE: [AttributionSource; 5] = [
    AttributionSource::ClaimerInfo,
    AttributionSource::ClaimedBy,
    AttributionSource::PickedBy,
    AttributionSource::Picker,
    AttributionSource::ClaimerFields,
];

impl AttributionSource {
    pub fn extract(&self, raw: &Map<String, Value>) -> Option<Attribution> {
        match self {
            Self::ClaimerInfo => well_formed(raw.get("claimerInfo")?),
            Self::ClaimedBy => counterparty(raw.get("claimedBy")?),
            Self::PickedBy => counterparty(raw.get("pickedBy")?),
            Self::Picker => counterparty(raw.get("picker")?),
            Self::ClaimerFields => claimer_fields(raw),
        }
    }
}

/// Claimant attribution of a raw donation record.
pub fn resolve_attribution(raw: &Map<String, Value>) -> Option<Attribution> {
    ATTRIBUTION_PRECEDENCE
        .iter()
        .find_map(|source| source.extract(raw))
}

/// Status of a raw donation record; `None` means unresolved (displayed as active).
pub fn resolve_status(raw: &Map<String, Value>) -> Option<ListingStatus> {
    if let Some(status) = raw.get("status").filter(|v| truthy(v)) {
        return Some(match status {
            Value::String(s) => ListingStatus::parse(s),
            _ => ListingStatus::Unknown,
        });
    }
    if raw.get("claimed") == Some(&Value::Bool(true)) {
        Some(ListingStatus::Claimed)
    } else if raw.get("fulfilled") == Some(&Value::Bool(true)) {
        Some(ListingStatus::Fulfilled)
    } else {
        None
    }
}

/// Canonical listing from one raw record of unknown shape.
pub fn normalize_listing(raw: &Value) -> Surplus {
    let Some(map) = raw.as_object() else {
        return Surplus::default();
    };

    Surplus {
        surplus_id: text(map.get("surplusId")).unwrap_or_default(),
        food_type: text(map.get("foodType")).unwrap_or_default(),
        quantity: quantity(map.get("quantity")),
        expiration_date: text(map.get("expirationDate")),
        address: text(map.get("address")),
        donor_id: text(map.get("donorId")),
        coordinates: field(map, "coordinates"),
        image_key: text(map.get("imageKey")),
        donor_info: field(map, "donorInfo"),
        claimer_info: resolve_attribution(map),
        status: resolve_status(map),
    }
}

pub fn normalize_listings(raw: &[Value]) -> Vec<Surplus> {
    raw.iter().map(normalize_listing).collect()
}

fn well_formed(value: &Value) -> Option<Attribution> {
    let obj = value.as_object()?;
    let name = obj.get("name");
    let phone = obj.get("phoneNumber");
    if !name.is_some_and(truthy) && !phone.is_some_and(truthy) {
        return None;
    }
    Some(Attribution::new(text(name), text(phone)))
}

fn counterparty(value: &Value) -> Option<Attribution> {
    if !truthy(value) {
        return None;
    }
    match value {
        Value::Object(obj) => Some(Attribution::new(
            first_present(obj, &["name", "fullName"]),
            first_present(obj, &["phoneNumber", "phone"]),
        )),
        Value::Array(_) => Some(Attribution::default()),
        primitive => Some(Attribution::new(text(Some(primitive)), None)),
    }
}

fn claimer_fields(raw: &Map<String, Value>) -> Option<Attribution> {
    let named = ["claimer_name", "claimerName"]
        .iter()
        .any(|key| raw.get(*key).is_some_and(truthy));
    if !named {
        return None;
    }
    Some(Attribution::new(
        first_present(raw, &["claimer_name", "claimerName"]),
        first_present(raw, &["claimer_phone", "claimerPhone"]),
    ))
}

/// First key whose value is present and not null.
fn first_present(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| obj.get(*key).filter(|v| !v.is_null()))
        .and_then(|v| text(Some(v)))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn quantity(value: Option<&Value>) -> u32 {
    value.map(lenient::quantity_from_value).unwrap_or(0)
}

fn field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    obj.get(key)
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

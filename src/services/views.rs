use std::fmt;
use std::str::FromStr;

use crate::models::{Attribution, Coordinates, FoodRequest, RequestStatus, Surplus};
use crate::services::dashboard::DashboardState;

/// Map centre when nothing is pinned (Bengaluru).
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: 12.9716,
    lng: 77.5946,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Map,
    List,
    MyRequests,
    MyDonations,
}

impl ActiveView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::List => "list",
            Self::MyRequests => "my-requests",
            Self::MyDonations => "my-donations",
        }
    }
}

impl FromStr for ActiveView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "map" => Ok(Self::Map),
            "list" => Ok(Self::List),
            "my-requests" => Ok(Self::MyRequests),
            "my-donations" => Ok(Self::MyDonations),
            other => Err(format!("Unknown view: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Donation,
    Request,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub kind: MarkerKind,
    pub id: String,
    pub position: Coordinates,
    pub food_type: String,
    pub quantity: u32,
    pub by: Option<Attribution>,
    /// Pickup address for donations, reason for requests.
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapViewModel {
    pub center: Coordinates,
    pub markers: Vec<MapMarker>,
    pub claiming_id: Option<String>,
    pub fulfilling_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListViewModel {
    pub surpluses: Vec<Surplus>,
    pub claiming_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MyRequestsViewModel {
    pub active: Vec<FoodRequest>,
    pub history: Vec<FoodRequest>,
    /// Requests on record, including ones with an unrecognised status.
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MyDonationsViewModel {
    pub active: Vec<Surplus>,
    pub history: Vec<Surplus>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewModel {
    Map(MapViewModel),
    List(ListViewModel),
    MyRequests(MyRequestsViewModel),
    MyDonations(MyDonationsViewModel),
}

/// Project the coordinator's collections into the selected view.
pub fn select(view: ActiveView, state: &DashboardState) -> ViewModel {
    let collections = &state.collections;
    match view {
        ActiveView::Map => ViewModel::Map(map_view(
            &collections.surpluses,
            &collections.requests,
            state,
        )),
        ActiveView::List => ViewModel::List(ListViewModel {
            surpluses: collections.surpluses.clone(),
            claiming_id: state.claiming_id.clone(),
        }),
        ActiveView::MyRequests => {
            let (active, history): (Vec<FoodRequest>, Vec<FoodRequest>) = collections
                .my_requests
                .iter()
                .filter(|r| r.status != RequestStatus::Unknown)
                .cloned()
                .partition(|r| r.status == RequestStatus::Active);
            ViewModel::MyRequests(MyRequestsViewModel {
                active,
                history,
                total: collections.my_requests.len(),
            })
        }
        ActiveView::MyDonations => {
            let (history, active): (Vec<Surplus>, Vec<Surplus>) = collections
                .my_donations
                .iter()
                .cloned()
                .partition(Surplus::is_settled);
            ViewModel::MyDonations(MyDonationsViewModel { active, history })
        }
    }
}

fn map_view(
    surpluses: &[Surplus],
    requests: &[FoodRequest],
    state: &DashboardState,
) -> MapViewModel {
    let donations = surpluses.iter().filter_map(|s| {
        Some(MapMarker {
            kind: MarkerKind::Donation,
            id: s.surplus_id.clone(),
            position: s.location()?,
            food_type: s.food_type.clone(),
            quantity: s.quantity,
            by: s.donor_info.clone(),
            detail: s.address.clone(),
        })
    });
    let needs = requests.iter().filter_map(|r| {
        Some(MapMarker {
            kind: MarkerKind::Request,
            id: r.request_id.clone(),
            position: r.location()?,
            food_type: r.food_type.clone(),
            quantity: r.quantity,
            by: r.requester_info.clone(),
            detail: r.description.clone(),
        })
    });
    let markers: Vec<MapMarker> = donations.chain(needs).collect();

    MapViewModel {
        center: markers.first().map(|m| m.position).unwrap_or(DEFAULT_CENTER),
        markers,
        claiming_id: state.claiming_id.clone(),
        fulfilling_id: state.fulfilling_id.clone(),
    }
}

impl fmt::Display for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map(m) => fmt::Display::fmt(m, f),
            Self::List(l) => fmt::Display::fmt(l, f),
            Self::MyRequests(r) => fmt::Display::fmt(r, f),
            Self::MyDonations(d) => fmt::Display::fmt(d, f),
        }
    }
}

impl fmt::Display for MapViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Food Network Map (centre {:.4}, {:.4})", self.center.lat, self.center.lng)?;
        for marker in &self.markers {
            let (label, busy) = match marker.kind {
                MarkerKind::Donation => ("Donation", self.claiming_id.as_deref()),
                MarkerKind::Request => ("Request", self.fulfilling_id.as_deref()),
            };
            write!(
                f,
                "  [{}] {}: {} x{} @ {:.4}, {:.4}",
                marker.id,
                label,
                marker.food_type,
                marker.quantity,
                marker.position.lat,
                marker.position.lng
            )?;
            if let Some(by) = &marker.by {
                write!(f, " by {}", by)?;
            }
            if busy == Some(marker.id.as_str()) {
                write!(f, " (in progress)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for ListViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.surpluses.is_empty() {
            return writeln!(f, "No food surpluses are available at the moment. Check back soon!");
        }
        for s in &self.surpluses {
            write!(f, "[{}] {} (Qty: {})", s.surplus_id, s.food_type, s.quantity)?;
            if let Some(date) = &s.expiration_date {
                write!(f, ", expires {}", date)?;
            }
            if let Some(address) = &s.address {
                write!(f, ", {}", address)?;
            }
            if self.claiming_id.as_deref() == Some(s.surplus_id.as_str()) {
                write!(f, " (claiming...)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for MyRequestsViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return writeln!(f, "You have not made any food requests yet.");
        }
        writeln!(f, "Active ({})", self.active.len())?;
        for r in &self.active {
            writeln!(f, "  {} (Qty: {})", r.food_type, r.quantity)?;
        }
        writeln!(f, "History ({})", self.history.len())?;
        for r in &self.history {
            write!(f, "  {} (Qty: {})", r.food_type, r.quantity)?;
            if let Some(donor) = &r.donor_info {
                write!(f, ", fulfilled by {}", donor)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for MyDonationsViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.active.is_empty() && self.history.is_empty() {
            return writeln!(f, "You have not made any donations yet.");
        }
        writeln!(f, "Active ({})", self.active.len())?;
        for d in &self.active {
            writeln!(f, "  {} (Qty: {}) {}", d.food_type, d.quantity, d.effective_status().as_str())?;
        }
        writeln!(f, "History ({})", self.history.len())?;
        for d in &self.history {
            write!(f, "  {} (Qty: {}) {}", d.food_type, d.quantity, d.effective_status().as_str())?;
            match &d.claimer_info {
                Some(claimer) => writeln!(f, ", picked up by {}", claimer)?,
                None => writeln!(f, ", no pickup details available")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingStatus;
    use crate::services::dashboard::Collections;

    fn surplus(id: &str, coords: Option<(f64, f64)>) -> Surplus {
        Surplus {
            surplus_id: id.to_string(),
            food_type: "Rice".to_string(),
            quantity: 2,
            coordinates: coords.map(|(lat, lng)| Coordinates { lat, lng }),
            ..Default::default()
        }
    }

    fn request(id: &str, status: RequestStatus, coords: Option<(f64, f64)>) -> FoodRequest {
        FoodRequest {
            request_id: id.to_string(),
            food_type: "Milk".to_string(),
            quantity: 1,
            status,
            coordinates: coords.map(|(lat, lng)| Coordinates { lat, lng }),
            ..Default::default()
        }
    }

    fn state(collections: Collections) -> DashboardState {
        let mut state = DashboardState::default();
        state.collections = collections;
        state
    }

    #[test]
    fn test_active_view_parse() {
        assert_eq!("my-donations".parse::<ActiveView>(), Ok(ActiveView::MyDonations));
        assert_eq!(ActiveView::default(), ActiveView::Map);
        assert!("grid".parse::<ActiveView>().is_err());
    }

    #[test]
    fn test_map_only_located_items() {
        let state = state(Collections {
            surpluses: vec![
                surplus("s-1", None),
                surplus("s-2", Some((13.0, 77.6))),
                surplus("s-3", Some((0.0, 77.6))),
            ],
            requests: vec![request("r-1", RequestStatus::Active, Some((12.9, 77.5)))],
            ..Default::default()
        });

        let ViewModel::Map(map) = select(ActiveView::Map, &state) else {
            panic!("expected map");
        };
        let ids: Vec<&str> = map.markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["s-2", "r-1"]);
        assert_eq!(map.center, Coordinates { lat: 13.0, lng: 77.6 });
        assert_eq!(map.markers[1].kind, MarkerKind::Request);
    }

    #[test]
    fn test_map_default_centre() {
        let ViewModel::Map(map) = select(ActiveView::Map, &DashboardState::default()) else {
            panic!("expected map");
        };
        assert!(map.markers.is_empty());
        assert_eq!(map.center, DEFAULT_CENTER);
    }

    #[test]
    fn test_my_donations_partition() {
        let mut claimed = surplus("s-2", None);
        claimed.claimer_info = Some(Attribution::new(Some("Jane".to_string()), None));
        let mut fulfilled = surplus("s-3", None);
        fulfilled.status = Some(ListingStatus::Fulfilled);

        let state = state(Collections {
            my_donations: vec![surplus("s-1", None), claimed, fulfilled],
            ..Default::default()
        });

        let ViewModel::MyDonations(view) = select(ActiveView::MyDonations, &state) else {
            panic!("expected my donations");
        };
        assert_eq!(view.active.len(), 1);
        assert_eq!(view.history.len(), 2);
        let text = view.to_string();
        assert!(text.contains("picked up by Jane (no phone)"));
        assert!(text.contains("no pickup details available"));
    }

    #[test]
    fn test_my_requests_partition() {
        let state = state(Collections {
            my_requests: vec![
                request("r-1", RequestStatus::Active, None),
                request("r-2", RequestStatus::Fulfilled, None),
                request("r-3", RequestStatus::Unknown, None),
            ],
            ..Default::default()
        });

        let ViewModel::MyRequests(view) = select(ActiveView::MyRequests, &state) else {
            panic!("expected my requests");
        };
        assert_eq!(view.active[0].request_id, "r-1");
        assert_eq!(view.history[0].request_id, "r-2");
        assert_eq!(view.active.len() + view.history.len(), 2);
    }

    #[test]
    fn test_unrecognised_requests_still_count() {
        let state = state(Collections {
            my_requests: vec![request("r-7", RequestStatus::Unknown, None)],
            ..Default::default()
        });

        let view = select(ActiveView::MyRequests, &state);
        let text = view.to_string();
        assert!(!text.contains("You have not made any food requests yet."));
        assert!(text.contains("Active (0)"));

        let empty = select(ActiveView::MyRequests, &DashboardState::default());
        assert_eq!(empty.to_string(), "You have not made any food requests yet.\n");
    }

    #[test]
    fn test_empty_list_message() {
        let view = select(ActiveView::List, &DashboardState::default());
        assert_eq!(
            view.to_string(),
            "No food surpluses are available at the moment. Check back soon!\n"
        );
    }
}

pub mod dashboard;
pub mod normalizer;
pub mod profile_gate;
pub mod submissions;
pub mod views;

pub use dashboard::{Dashboard, LoadOutcome, LoadPhase, Notice};
pub use profile_gate::{GateDecision, ProfileGate};
pub use submissions::Submissions;
pub use views::ActiveView;

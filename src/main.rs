use std::sync::Arc;

use anyhow::Context;
use food_rescue_client::auth::{StaticTokenProvider, TokenProvider};
use food_rescue_client::services::dashboard::LoadPhase;
use food_rescue_client::services::profile_gate::{GateDecision, OnboardingForm};
use food_rescue_client::services::views::{self, ActiveView};
use food_rescue_client::{App, Config};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

enum Command {
    Show(ActiveView),
    Claim(String),
    Fulfill(String),
}

impl Command {
    /// View printed once the command has run. Requests live on the map.
    fn view(&self) -> ActiveView {
        match self {
            Self::Show(view) => *view,
            Self::Claim(_) => ActiveView::List,
            Self::Fulfill(_) => ActiveView::Map,
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Command> {
    match args.next().as_deref() {
        None => Ok(Command::Show(ActiveView::default())),
        Some("claim") => Ok(Command::Claim(args.next().context("claim needs a surplus id")?)),
        Some("fulfill") => Ok(Command::Fulfill(
            args.next().context("fulfill needs a request id")?,
        )),
        Some(view) => Ok(Command::Show(view.parse().map_err(anyhow::Error::msg)?)),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "food_rescue_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("FOOD_RESCUE_API_ENDPOINT must be set")?;
    let command = parse_args(std::env::args().skip(1))?;

    tracing::info!(
        "Starting food-rescue-client: endpoint={}, region={}",
        config.api_endpoint,
        config.region
    );

    let tokens: Arc<dyn TokenProvider> = Arc::new(StaticTokenProvider::from_env());
    let app = App::connect(Arc::new(config), tokens)?;

    if let GateDecision::Onboarding = app.start().await {
        let form = OnboardingForm {
            name: std::env::var("FOOD_RESCUE_PROFILE_NAME").unwrap_or_default(),
            phone_number: std::env::var("FOOD_RESCUE_PROFILE_PHONE").unwrap_or_default(),
        };
        match app.finish_onboarding(&form).await {
            Ok(GateDecision::Dashboard(_)) => {}
            Ok(GateDecision::Onboarding) => {
                println!("Welcome! Please complete your profile to continue.");
                return Ok(());
            }
            Err(e) => {
                println!("{}", e);
                return Ok(());
            }
        }
    }

    if let Some(profile) = app.profile() {
        println!(
            "Welcome, {}! Donation points: {}",
            profile.name.unwrap_or_default(),
            profile.donation_points
        );
    }

    match &command {
        Command::Show(_) => {}
        Command::Claim(id) => println!("{}", app.dashboard.claim(id).await.message),
        Command::Fulfill(id) => println!("{}", app.dashboard.fulfill(id).await.message),
    }
    let view = command.view();

    let state = app.dashboard.snapshot();
    match &state.phase {
        LoadPhase::Failed(failure) => {
            eprintln!("{}", failure);
            if let Some(debug) = app.dashboard.print_debug() {
                eprintln!("{}", debug);
            }
        }
        _ => println!("{}", views::select(view, &state)),
    }

    Ok(())
}

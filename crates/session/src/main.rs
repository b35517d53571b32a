use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vidbench_core::actions::Action;
use vidbench_session::cli::{self, Args};
use vidbench_session::config::SessionConfig;
use vidbench_session::{seed, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidbench_session=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let config = SessionConfig::from_env().context("Failed to load session configuration")?;
    tracing::info!(
        tick_ms = config.upload_tick.as_millis() as u64,
        completion_delay_ms = config.completion_delay.as_millis() as u64,
        max_step = config.max_step,
        "Loaded session configuration"
    );

    let args = Args::parse(std::env::args().skip(1))?;

    // --- Initial state ---
    let state = match &config.seed_path {
        Some(path) => seed::load_seed(path).await?,
        None => {
            tracing::info!("No SEED_PATH set, using demo state");
            seed::demo_state()
        }
    };

    let mut session = Session::new(state, &config);
    if !session
        .dispatch(Action::SelectProject(args.project_id.clone()))
        .is_applied()
    {
        anyhow::bail!("Unknown project '{}'", args.project_id);
    }

    // --- Uploads ---
    let uploaded = cli::run_uploads(&mut session, args.uploads).await;
    for item in &uploaded {
        tracing::info!(upload_id = %item.id, filename = %item.filename, "Upload settled");
    }

    if let Some(report) = session.delivery_readiness(&args.project_id) {
        let missing: Vec<&str> = report.missing_steps.iter().map(|s| s.label()).collect();
        tracing::info!(
            ready = report.ready,
            readiness_pct = report.readiness_pct,
            missing = ?missing,
            "Delivery readiness"
        );
    }

    let state = session.into_state();
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

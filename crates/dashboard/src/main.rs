use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidboard_dashboard::{DashboardConfig, DashboardSession};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidboard_dashboard=debug,vidboard_channel=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DashboardConfig::from_env();
    tracing::info!(?config, "Starting dashboard session");

    let session = DashboardSession::start(config);
    let mut updates = session.store().subscribe();

    // Headless render loop: log the job list on every store update.
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown requested");
                break;
            }
            update = updates.recv() => match update {
                Ok(update) => {
                    tracing::info!(job_id = %update.job_id, state = ?update.state, "Job updated");
                    for job in session.store().snapshot().await {
                        tracing::info!(
                            job_id = %job.job_id,
                            state = ?job.state,
                            downloads = job.downloads.len(),
                            transcripts = job.transcripts.len(),
                            "{}",
                            job.message,
                        );
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Render loop lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    session.close().await;
}

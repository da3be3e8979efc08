use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tag_cascade::azure::AzureClient;
use tag_cascade::cascade::CascadeEngine;
use tag_cascade::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tag_cascade=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = match AzureClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("failed to construct service client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match CascadeEngine::new().run(&client).await {
        Ok(report) => {
            tracing::info!(
                parents = report.parents.len(),
                updated = report.merged_count(),
                unchanged = report.unchanged_count(),
                failed = report.failed_count(),
                "cascade run complete"
            );
            if report.has_failures() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            tracing::error!("cascade run aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}

// Main entry point for invite-to-org

use invite_core::kernel::{OrganizationDeps, RemoteOrganizationClient};
use invite_core::{sync, Config};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::dispatcher::with_default(&invite_core::fallback_log_dispatch(), || {
                tracing::error!(error = %e, operation = e.operation(), "Unable to create config");
            });
            return ExitCode::FAILURE;
        }
    };

    // Logging is scoped to the run rather than installed process-wide
    let dispatch = config.log_dispatch();
    run(config).with_subscriber(dispatch).await
}

async fn run(config: Config) -> ExitCode {
    let cancel = CancellationToken::new();
    tokio::spawn(
        {
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted - cancelling in-flight requests");
                    cancel.cancel();
                }
            }
        }
        .with_current_subscriber(),
    );

    let deps = match OrganizationDeps::from_token(config.github_token.clone(), &config.api_url) {
        Ok(deps) => deps,
        Err(e) => {
            tracing::error!(error = %format_args!("{:#}", e), "Unable to create GitHub client");
            return ExitCode::FAILURE;
        }
    };
    let client = Arc::new(RemoteOrganizationClient::new(deps));

    match sync::run(&config, client, &cancel).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

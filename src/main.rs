//! mycv-backend - Entry Point
//!
//! Runs a console session driving the authentication and messages services.

use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{self, BufReader};

use mycv_backend::auth::{CredentialAuthenticator, InMemoryUserDirectory, SecretHasher};
use mycv_backend::config::AppConfig;
use mycv_backend::console::{Services, run_session};
use mycv_backend::error::AppError;
use mycv_backend::messages::{JsonFileMessageRepository, MessagesService};
use mycv_backend::utils::logging::setup_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    setup_logging(&config.startup.log_level);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    let (startup, hashing) = config.split();

    let authenticator = CredentialAuthenticator::new(
        Arc::new(InMemoryUserDirectory::new()),
        SecretHasher::new(&hashing)?,
    );
    let messages = MessagesService::new(Arc::new(JsonFileMessageRepository::new(
        startup.messages_path(),
    )));
    let services = Services::new(authenticator, messages);

    info!(
        "Console ready (messages stored in {})",
        startup.messages_path().display()
    );

    run_session(
        BufReader::new(io::stdin()),
        io::stdout(),
        &services,
        startup.max_input_length,
    )
    .await?;

    Ok(())
}

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use quake_feed::{FeedClient, FeedConfig, ReconnectConfig};
use quake_notifier::intensity::to_label;
use quake_notifier::{
    runner, Formatter, LoggingSender, NotificationSender, NotifierConfig, NotifierError,
    QuakeNotifier, SlackSender,
};
use slack_notify::SlackClient;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Route panics through tracing so they land in the same log stream.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|location| format!("{}:{}", location.file(), location.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let message = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(location = %location, "Panic: {}", message);
    }));
}

/// Wait for shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                (Err(e), _) | (_, Err(e)) => {
                    warn!("Failed to install signal handlers ({}), falling back to Ctrl+C", e);
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        error!("Failed to listen for Ctrl+C: {}", e);
                        std::future::pending::<()>().await;
                    }
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM"),
            _ = sigint.recv() => info!("Received SIGINT"),
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C");
    }
}

async fn build_sender(config: &NotifierConfig) -> Result<Box<dyn NotificationSender>, NotifierError> {
    match (&config.slack, config.dry_run) {
        (Some(slack), false) => {
            let client = SlackClient::new(slack.clone())?;
            client.check_auth().await?;
            Ok(Box::new(SlackSender::new(client)))
        }
        (_, true) => {
            info!("Dry run: notifications will be logged, not posted");
            Ok(Box::new(LoggingSender))
        }
        (None, false) => Err(NotifierError::MissingConfig("SLACK_BOT_TOKEN".to_string())),
    }
}

async fn run() -> Result<(), NotifierError> {
    let config = NotifierConfig::from_env()?;
    info!(
        "quake-notifier v{} starting (feed: {:?}, threshold: {})",
        quake_notifier::version(),
        config.environment,
        to_label(config.threshold)
    );

    let sender = build_sender(&config).await?;
    let notifier = QuakeNotifier::new(
        Formatter::new(config.image_base_url.clone()),
        config.threshold,
        sender,
    );
    let client = Arc::new(FeedClient::new(FeedConfig::new(config.environment), notifier));

    let task_client = Arc::clone(&client);
    let handle = tokio::spawn(async move {
        runner::run(&task_client, &ReconnectConfig::default(), shutdown_signal()).await
    });

    match handle.await {
        Ok(result) => result,
        Err(e) => {
            error!("Runner task failed: {}", e);
            client.disconnect();
            Err(NotifierError::Handler(format!("runner task failed: {}", e)))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();
    install_panic_hook();

    match run().await {
        Ok(()) => {
            info!("quake-notifier stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("quake-notifier failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

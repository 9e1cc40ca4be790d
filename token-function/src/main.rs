use anyhow::{bail, Result};
use error::ConfigError;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use token_function::{
    config::SECRET_VAR, self_test::SELF_TEST_SECRET, run_event_loop, run_self_test, FunctionConfig,
    TokenRouter,
};

fn init_tracing() {
    // stdout carries responses, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "token_function=info,auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn check_config(config: Result<FunctionConfig, ConfigError>) -> Result<FunctionConfig> {
    config.map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        anyhow::Error::from(e)
    })
}

async fn serve() -> Result<()> {
    let config = check_config(FunctionConfig::from_env())?;
    tracing::info!("Starting token function v{}", config.version);

    let router = TokenRouter::new(config);
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        handled = run_event_loop(&router, stdin, stdout) => {
            tracing::info!("Input closed after {} events", handled?);
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn self_test() -> Result<()> {
    let config = FunctionConfig::from_lookup(|key| {
        std::env::var(key)
            .ok()
            .or_else(|| (key == SECRET_VAR).then(|| SELF_TEST_SECRET.to_string()))
    });
    let router = TokenRouter::new(check_config(config)?);
    let now = chrono::Utc::now().timestamp();

    for response in run_self_test(&router, now)? {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Ok(())
}

fn print_help() {
    println!("Token function v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: token-function [COMMAND]");
    println!();
    println!("Commands:");
    println!("  (none)      Read one JSON event per line from stdin, write responses to stdout");
    println!("  self-test   Issue and verify a sample token, print both responses");
    println!("  --help, -h  Show this help");
    println!();
    println!("Environment:");
    println!("  JWT_SECRET             Signing secret (required)");
    println!("  TOKEN_NOT_BEFORE_SECS  Delay before an issued token is valid (default 2)");
    println!("  TOKEN_EXPIRES_IN_SECS  Lifetime of an issued token (default 5)");
    println!("  TOKEN_DATA_ENCODING    parsed | raw (default parsed)");
    println!("  RUST_LOG               Log filter (default token_function=info,auth=info)");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        None => serve().await,
        Some("self-test") => self_test(),
        Some("--help") | Some("-h") => {
            print_help();
            Ok(())
        }
        Some(other) => bail!("Unknown command: {other} (see --help)"),
    }
}

// `main.rs` only declares modules and delegates to `server::run()`. Config
// loading and logging setup happen here so `server` stays testable without
// touching the process environment.
mod config;
mod handlers;
mod logging;
mod metrics;
mod model;
mod random;
mod server;
mod state_client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::from_env()?;
    logging::init(config.log_format);
    server::run(config).await
}

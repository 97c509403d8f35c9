use storefront_hex::application::Storefront;
use storefront_hex::config::Config;
use storefront_hex::inbound::http::{HttpServer, HttpServerConfig};
use storefront_repo::{build_repo, Latency, LatencyProfile, Repo, RepoOptions};

fn repo_options(config: &Config) -> RepoOptions {
    let latency = match config.latency_ms {
        Some(ms) => LatencyProfile::uniform(Latency::from_millis(ms)),
        None => LatencyProfile::default(),
    };
    RepoOptions {
        latency,
        fixtures_dir: config.fixtures_dir.clone(),
        seed: config.seed,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for SERVER_PORT / STOREFRONT_* when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    let options = repo_options(&config);
    tracing::info!(seed = options.seed, latency = ?options.latency, "building store");
    let repo: Repo = build_repo(&options).await?;
    let storefront = Storefront::new(repo);

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(storefront, server_cfg).await?;
    http.run().await
}

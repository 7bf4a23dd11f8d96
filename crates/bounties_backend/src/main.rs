use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    http::{header, HeaderName, Method},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use bounties_registry::BountyRegistry;
use clap::Parser;
use config::Config;
use log::{debug, info, warn};
use tokio::sync::RwLock;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

mod api;
mod config;
mod error;
mod middleware;

#[derive(Clone, Default)]
pub struct AppState {
    /// Every mutating route holds the write lock for the whole operation,
    /// which totally orders concurrent calls against the registry.
    registry: Arc<RwLock<BountyRegistry>>,
}

#[derive(Parser, Debug)]
#[command(name = "bounties")]
#[command(bin_name = "bounties")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Flag to disable HTTPS
    #[arg(long)]
    no_https: bool,
    /// Address to listen on, overrides BOUNTIES_ADDR
    #[arg(long)]
    addr: Option<SocketAddr>,
}

pub fn app(app_state: AppState, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_headers([
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            HeaderName::from_static(middleware::CALLER_HEADER),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::list(config.cors_origins.clone()))
        .allow_credentials(true);

    Router::new()
        .merge(api::router())
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder().format_timestamp(None).init();

    let cli = Cli::parse();

    if dotenvy::dotenv().is_err() {
        warn!("Error reading .env file");
    } else {
        debug!("Loaded env vars from .env");
    }

    let mut config = Config::from_env()?;
    if let Some(addr) = cli.addr {
        config.addr = addr;
    }
    debug!("config {config:?}");

    let app = app(AppState::default(), &config);

    if cli.no_https {
        info!("Starting server on {} with HTTPS disabled...", config.addr);

        axum_server::bind(config.addr)
            .serve(app.into_make_service())
            .await?;
    } else {
        info!("Starting server on {} with HTTPS...", config.addr);

        let rustls_config = RustlsConfig::from_pem_file(&config.tls_cert, &config.tls_key)
            .await
            .with_context(|| {
                format!(
                    "Couldn't load TLS certificate {} and key {}",
                    config.tls_cert.display(),
                    config.tls_key.display()
                )
            })?;

        axum_server::bind_rustls(config.addr, rustls_config)
            .serve(app.into_make_service())
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{app, AppState, Cli};
    use crate::config::Config;

    #[test]
    fn routes_build() {
        let config = Config::from_lookup(|_| None).unwrap();
        let _ = app(AppState::default(), &config);
    }

    #[test]
    fn cli_flags() {
        let cli = Cli::parse_from(["bounties", "--no-https", "--addr", "127.0.0.1:4000"]);
        assert!(cli.no_https);
        assert_eq!(cli.addr.map(|a| a.port()), Some(4000));

        let cli = Cli::parse_from(["bounties"]);
        assert!(!cli.no_https);
        assert!(cli.addr.is_none());
    }
}

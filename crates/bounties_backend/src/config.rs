use std::{env, net::SocketAddr, path::PathBuf};

use anyhow::Context;
use axum::http::HeaderValue;

const DEFAULT_ORIGINS: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    /// Origins the web client is served from
    pub cors_origins: Vec<HeaderValue>,
    pub tls_cert: PathBuf,
    pub tls_key: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let addr = match lookup("BOUNTIES_ADDR") {
            Some(addr) => addr
                .parse()
                .with_context(|| format!("Invalid BOUNTIES_ADDR {addr}"))?,
            None => SocketAddr::from(([0, 0, 0, 0], 3001)),
        };

        let cors_origins = lookup("BOUNTIES_CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin {origin}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        // TODO resolve default certs against the working dir instead of the build-time crate dir
        let certs = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("certs");
        let tls_cert = lookup("BOUNTIES_TLS_CERT")
            .map(PathBuf::from)
            .unwrap_or_else(|| certs.join("cert.pem"));
        let tls_key = lookup("BOUNTIES_TLS_KEY")
            .map(PathBuf::from)
            .unwrap_or_else(|| certs.join("key.pem"));

        Ok(Config {
            addr,
            cors_origins,
            tls_cert,
            tls_key,
        })
    }
}

use axum::extract::{Extension, Query};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing::get};
use clap::Parser;
use geecache::transport::protocol::CONTENT_TYPE_VALUE;
use geecache::{Group, GetterFn, HttpPool, new_group};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Runs one cache node.
///
/// Example three-node setup:
///   geecache-node --port 8001
///   geecache-node --port 8002
///   geecache-node --port 8003 --api
#[derive(Parser, Debug)]
#[command(name = "geecache-node", version, about)]
struct NodeConfig {
    /// Port of the peer protocol server.
    #[arg(long, env = "GEECACHE_PORT", default_value_t = 8001)]
    port: u16,

    /// Full peer membership, including this node.
    #[arg(
        long,
        env = "GEECACHE_PEERS",
        value_delimiter = ',',
        default_value = "http://localhost:8001,http://localhost:8002,http://localhost:8003"
    )]
    peers: Vec<String>,

    /// Also start the public API server.
    #[arg(long, env = "GEECACHE_API")]
    api: bool,

    #[arg(long, env = "GEECACHE_API_PORT", default_value_t = 9999)]
    api_port: u16,

    /// Capacity of the local store in bytes (0 = unlimited).
    #[arg(long, env = "GEECACHE_CACHE_BYTES", default_value_t = 2 << 10)]
    cache_bytes: usize,

    /// Name of the demo cache group.
    #[arg(long, env = "GEECACHE_GROUP", default_value = "scores")]
    group: String,
}

#[derive(Deserialize)]
struct ApiParams {
    key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = NodeConfig::parse();

    // 1. Cache group backed by the slow database:
    let group = create_group(&config.group, config.cache_bytes);

    // 2. Peer pool:
    let self_addr = format!("http://localhost:{}", config.port);
    let pool = Arc::new(HttpPool::new(self_addr.clone()));
    pool.set(config.peers.clone());
    group.register_peers(pool.clone());

    tracing::info!("Node {} serving group '{}'", self_addr, config.group);
    tracing::info!("Peers: {:?}", config.peers);

    // 3. Public API:
    if config.api {
        let api_addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));
        let api = Router::new()
            .route("/api", get(handle_api_get))
            .layer(Extension(group.clone()));

        let listener = tokio::net::TcpListener::bind(api_addr).await?;
        tracing::info!("API server listening on {}", api_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, api).await {
                tracing::error!("API server stopped: {}", e);
            }
        });
    }

    // 4. Peer protocol server:
    let cache_addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(cache_addr).await?;
    tracing::info!("Cache server listening on {}", cache_addr);
    axum::serve(listener, pool.router()).await?;

    Ok(())
}

fn create_group(name: &str, cache_bytes: usize) -> Arc<Group> {
    let db: Arc<HashMap<String, String>> = Arc::new(HashMap::from([
        ("Tom".to_string(), "630".to_string()),
        ("Jack".to_string(), "589".to_string()),
        ("Sam".to_string(), "567".to_string()),
    ]));

    new_group(
        name,
        cache_bytes,
        GetterFn(move |key: String| {
            let db = db.clone();
            async move {
                tracing::info!("[SlowDB] search key {}", key);
                match db.get(&key) {
                    Some(value) => Ok(value.clone().into_bytes()),
                    None => Err(anyhow::anyhow!("{} not exist", key)),
                }
            }
        }),
    )
}

async fn handle_api_get(
    Extension(group): Extension<Arc<Group>>,
    Query(params): Query<ApiParams>,
) -> Response {
    let Some(key) = params.key else {
        return (StatusCode::BAD_REQUEST, "key is required").into_response();
    };

    match group.get(&key).await {
        Ok(view) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, CONTENT_TYPE_VALUE)],
            view.byte_slice(),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("API get {} failed: {}", key, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

use axum::extract::Extension;
use axum::http::Uri;
use std::sync::Arc;

use super::pool::HttpPool;
use super::protocol::PeerReply;

/// Axum entry point for `GET <base_path>*rest`. Hands the raw path to the pool
/// so group and key are decoded exactly once.
pub async fn handle_peer_request(
    Extension(pool): Extension<Arc<HttpPool>>,
    uri: Uri,
) -> PeerReply {
    pool.serve_path(uri.path()).await
}
